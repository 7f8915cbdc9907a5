use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("cannot read credentials file {path}: {source}")]
    CredentialsIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid credentials file {path}: {source}")]
    CredentialsYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("credentials file {path} is missing '{field}'")]
    CredentialsField { path: PathBuf, field: &'static str },
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[cfg(feature = "http")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("API error: {0}")]
    Api(String),
}
