mod pipeline;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use classic_core::ActionTemplate;
use classic_sync::{Credentials, SalsaClient};
use pipeline::{ExportConfig, ExportMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "classic_actions_to_html",
    about = "Read Salsa Classic actions, correct DIA URLs and write their contents as HTML",
    version
)]
struct Cli {
    /// YAML file with login credentials (host, email, password)
    #[arg(long)]
    login: PathBuf,

    /// Show action dates, keys and titles. Does not write HTML
    #[arg(long)]
    summary: bool,

    /// Directory the HTML files are written to
    #[arg(long, env = "CLASSIC_OUTPUT_DIR", default_value = "html")]
    output_dir: PathBuf,

    /// Actions requested per page
    #[arg(long, default_value = "500")]
    page_size: NonZeroUsize,

    /// HTML template with {{title}}, {{key}} and {{description}} placeholders
    #[arg(long)]
    template: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("classic_actions_to_html v{}", env!("CARGO_PKG_VERSION"));

    let template = match &cli.template {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading template {}", path.display()))?;
            ActionTemplate::parse(&source)
                .with_context(|| format!("parsing template {}", path.display()))?
        }
        None => ActionTemplate::default(),
    };

    let credentials = Credentials::load(&cli.login)?;
    let client = SalsaClient::authenticate(&credentials)
        .await
        .with_context(|| format!("logging in to {}", credentials.base_url()))?;

    let mode = if cli.summary {
        ExportMode::Summary
    } else {
        ExportMode::Render
    };
    let mut config = ExportConfig::new(cli.output_dir, mode);
    config.page_size = cli.page_size.get();
    config.template = template;

    pipeline::run(&client, config, &mut std::io::stdout()).await?;
    Ok(())
}
