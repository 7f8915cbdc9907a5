//! HTML output directory for exported actions.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use classic_core::{Action, ActionTemplate, DateStamp, derive};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::StoreError;

/// Extension of every file the store writes.
pub const EXTENSION: &str = "html";

/// What [`HtmlStore::render`] did with an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Written(PathBuf),
    /// A file with the derived name was already present; nothing was written.
    Skipped(PathBuf),
}

impl RenderOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(p) | Self::Skipped(p) => p,
        }
    }
}

/// Writes actions as standalone HTML documents into a single directory.
///
/// Existing files are never overwritten, which makes a rerun over the same
/// directory skip everything already exported.
pub struct HtmlStore {
    dir: PathBuf,
    template: ActionTemplate,
}

impl HtmlStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub async fn open(
        dir: impl Into<PathBuf>,
        template: ActionTemplate,
    ) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        let meta = tokio::fs::metadata(&dir)
            .await
            .map_err(|source| StoreError::Stat {
                path: dir.clone(),
                source,
            })?;
        if !meta.is_dir() {
            return Err(StoreError::NotADirectory(dir));
        }
        info!(dir = %dir.display(), "output directory ready");
        Ok(Self { dir, template })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the action would be written to.
    pub fn target_path(&self, action: &Action) -> PathBuf {
        self.dir.join(derive(action, EXTENSION))
    }

    /// Write `action` unless its file already exists.
    pub async fn render(&self, action: &Action) -> Result<RenderOutcome, StoreError> {
        let path = self.target_path(action);

        if let DateStamp::Malformed = action.date_stamp() {
            warn!(
                key = %action.key,
                timestamp = action.timestamp().unwrap_or_default(),
                "unparseable timestamp, using zero date in filename"
            );
        }

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|source| StoreError::Stat {
                path: path.clone(),
                source,
            })?;
        if exists {
            info!(key = %action.key, "HTML already exists");
            return Ok(RenderOutcome::Skipped(path));
        }

        let document = self.template.render(action);

        // create_new closes the gap between the existence check and the write.
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                info!(key = %action.key, "HTML already exists");
                return Ok(RenderOutcome::Skipped(path));
            }
            Err(source) => return Err(StoreError::Write { path, source }),
        };

        let written = match file.write_all(document.as_bytes()).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(source) = written {
            return Err(StoreError::Write { path, source });
        }

        info!(path = %path.display(), "wrote");
        Ok(RenderOutcome::Written(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn action(key: &str, title: &str) -> Action {
        Action {
            key: key.into(),
            created_at: "Tue Oct 30 2018 09:04:08 GMT-0400 (EDT)".into(),
            title: title.into(),
            description: r#"<img src="cid:banner.jpg">"#.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn open_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("html");
        let store = HtmlStore::open(&dir, ActionTemplate::default()).await.unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[tokio::test]
    async fn open_accepts_existing_directory() {
        let tmp = TempDir::new().unwrap();
        HtmlStore::open(tmp.path(), ActionTemplate::default()).await.unwrap();
        HtmlStore::open(tmp.path(), ActionTemplate::default()).await.unwrap();
    }

    #[tokio::test]
    async fn open_rejects_file_in_the_way() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("html");
        std::fs::write(&file, b"not a dir").unwrap();
        assert!(HtmlStore::open(&file, ActionTemplate::default()).await.is_err());
    }

    #[tokio::test]
    async fn writes_document_with_scrubbed_description() {
        let tmp = TempDir::new().unwrap();
        let store = HtmlStore::open(tmp.path(), ActionTemplate::default()).await.unwrap();

        let outcome = store.render(&action("101", "Ban fracking")).await.unwrap();
        let expected = tmp.path().join("2018-10-30 - 101 - Ban fracking.html");
        assert_eq!(outcome, RenderOutcome::Written(expected.clone()));

        let html = std::fs::read_to_string(&expected).unwrap();
        assert!(html.contains("<title>Ban fracking</title>"));
        assert!(html.contains(r#"<img src="https:banner.jpg">"#));
        assert!(!html.contains("cid:"));
    }

    #[tokio::test]
    async fn existing_file_is_skipped_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        let store = HtmlStore::open(tmp.path(), ActionTemplate::default()).await.unwrap();
        let a = action("102", "Save the library");
        let path = store.target_path(&a);
        std::fs::write(&path, b"hand edited").unwrap();

        let outcome = store.render(&a).await.unwrap();
        assert_eq!(outcome, RenderOutcome::Skipped(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hand edited");
    }

    #[tokio::test]
    #[traced_test]
    async fn skip_is_logged_with_key() {
        let tmp = TempDir::new().unwrap();
        let store = HtmlStore::open(tmp.path(), ActionTemplate::default()).await.unwrap();
        let a = action("107", "Count every vote");
        store.render(&a).await.unwrap();
        assert!(!logs_contain("HTML already exists"));

        store.render(&a).await.unwrap();
        logs_assert(|lines: &[&str]| {
            let notices: Vec<&&str> = lines
                .iter()
                .filter(|l| l.contains("HTML already exists"))
                .collect();
            match notices.as_slice() {
                [line] if line.contains("107") => Ok(()),
                other => Err(format!("expected one notice naming 107, got {other:?}")),
            }
        });
    }

    #[tokio::test]
    #[traced_test]
    async fn malformed_timestamp_is_logged_with_key() {
        let tmp = TempDir::new().unwrap();
        let store = HtmlStore::open(tmp.path(), ActionTemplate::default()).await.unwrap();
        let a = Action {
            key: "106".into(),
            created_at: "30/10/2018".into(),
            title: "Recall".into(),
            ..Default::default()
        };

        let outcome = store.render(&a).await.unwrap();
        assert_eq!(
            outcome,
            RenderOutcome::Written(tmp.path().join("0001-01-01 - 106 - Recall.html"))
        );
        logs_assert(|lines: &[&str]| {
            let warned = lines.iter().any(|l| {
                l.contains("WARN")
                    && l.contains("unparseable timestamp")
                    && l.contains("106")
                    && l.contains("30/10/2018")
            });
            if warned {
                Ok(())
            } else {
                Err("no warning for key 106".to_string())
            }
        });
    }

    #[tokio::test]
    #[traced_test]
    async fn parsed_timestamp_is_not_warned_about() {
        let tmp = TempDir::new().unwrap();
        let store = HtmlStore::open(tmp.path(), ActionTemplate::default()).await.unwrap();
        store.render(&action("108", "Quiet")).await.unwrap();
        assert!(!logs_contain("unparseable timestamp"));
    }

    #[tokio::test]
    async fn second_render_skips() {
        let tmp = TempDir::new().unwrap();
        let store = HtmlStore::open(tmp.path(), ActionTemplate::default()).await.unwrap();
        let a = action("103", "Fund transit");
        assert!(matches!(store.render(&a).await.unwrap(), RenderOutcome::Written(_)));
        assert!(matches!(store.render(&a).await.unwrap(), RenderOutcome::Skipped(_)));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn custom_template_is_used() {
        let tmp = TempDir::new().unwrap();
        let template = ActionTemplate::parse("{{key}}:{{title}}").unwrap();
        let store = HtmlStore::open(tmp.path(), template).await.unwrap();
        let outcome = store.render(&action("104", "Vote")).await.unwrap();
        assert_eq!(std::fs::read_to_string(outcome.path()).unwrap(), "104:Vote");
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let store = HtmlStore::open(tmp.path(), ActionTemplate::default()).await.unwrap();
        // No filesystem accepts a 300-byte path segment.
        let a = action("105", &"x".repeat(300));
        let err = store.render(&a).await.unwrap_err();
        assert!(matches!(err, StoreError::Write { .. } | StoreError::Stat { .. }));
    }
}
