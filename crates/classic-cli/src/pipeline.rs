//! Export pipeline: a producer paging through the remote `action` table and a
//! consumer writing HTML, joined by a bounded queue.
//!
//! If a page cannot be fetched the queue is closed, whatever was already
//! queued is still written, and the fetch error is returned.

use std::io::Write;
use std::path::PathBuf;
use std::pin::pin;

use anyhow::Context;
use classic_core::{Action, ActionTemplate, derive};
use classic_store::{HtmlStore, RenderOutcome};
use classic_sync::{ActionSource, DEFAULT_PAGE_SIZE, actions};
use futures::TryStreamExt;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Records held between fetch and render before the producer waits.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Write one HTML file per action.
    Render,
    /// Print the filename each action would get; write nothing.
    Summary,
}

pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub mode: ExportMode,
    pub page_size: usize,
    pub queue_capacity: usize,
    pub template: ActionTemplate,
}

impl ExportConfig {
    pub fn new(output_dir: impl Into<PathBuf>, mode: ExportMode) -> Self {
        Self {
            output_dir: output_dir.into(),
            mode,
            page_size: DEFAULT_PAGE_SIZE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            template: ActionTemplate::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportStats {
    pub fetched: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Export every action `source` yields according to `config`.
///
/// Summary lines go to `summary_out`; nothing is written there in render mode.
pub async fn run<S, W>(
    source: &S,
    config: ExportConfig,
    summary_out: &mut W,
) -> anyhow::Result<ExportStats>
where
    S: ActionSource + ?Sized,
    W: Write,
{
    let store = HtmlStore::open(&config.output_dir, config.template)
        .await
        .context("preparing output directory")?;

    let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
    let (produced, mut stats) = tokio::join!(
        produce(source, config.page_size, config.mode, tx, summary_out),
        consume(&store, rx),
    );

    match produced {
        Ok(fetched) => {
            stats.fetched = fetched;
            info!(
                fetched = stats.fetched,
                written = stats.written,
                skipped = stats.skipped,
                failed = stats.failed,
                "export complete"
            );
            Ok(stats)
        }
        Err(e) => {
            error!(
                written = stats.written,
                skipped = stats.skipped,
                failed = stats.failed,
                "export aborted"
            );
            Err(e)
        }
    }
}

/// Drive the record source. `tx` is dropped on return, which closes the queue.
async fn produce<S, W>(
    source: &S,
    page_size: usize,
    mode: ExportMode,
    tx: mpsc::Sender<Action>,
    summary_out: &mut W,
) -> anyhow::Result<usize>
where
    S: ActionSource + ?Sized,
    W: Write,
{
    let mut records = pin!(actions(source, page_size));
    let mut fetched = 0;

    while let Some(action) = records.try_next().await.context("reading actions")? {
        fetched += 1;
        match mode {
            ExportMode::Summary => {
                writeln!(summary_out, "{}", derive(&action, classic_store::EXTENSION))
                    .context("writing summary")?;
            }
            ExportMode::Render => {
                if tx.send(action).await.is_err() {
                    anyhow::bail!("render queue closed before all actions were sent");
                }
            }
        }
    }
    Ok(fetched)
}

/// Render queued actions until the queue is closed and empty.
async fn consume(store: &HtmlStore, mut rx: mpsc::Receiver<Action>) -> ExportStats {
    let mut stats = ExportStats::default();
    while let Some(action) = rx.recv().await {
        match store.render(&action).await {
            Ok(RenderOutcome::Written(_)) => stats.written += 1,
            Ok(RenderOutcome::Skipped(_)) => stats.skipped += 1,
            Err(e) => {
                stats.failed += 1;
                error!(key = %action.key, error = %e, "render failed");
            }
        }
    }
    stats
}
