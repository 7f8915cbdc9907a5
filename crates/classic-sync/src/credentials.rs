//! Login credentials for a Salsa Classic organization.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::SyncError;

/// The YAML login file:
///
/// ```yaml
/// host: salsa4.salsalabs.com
/// email: someone@example.org
/// password: hunter2
/// ```
///
/// `host` may also be a full base URL such as `https://org2.salsalabs.com`.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read and validate a YAML login file.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let data = std::fs::read_to_string(path).map_err(|source| SyncError::CredentialsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let creds: Credentials =
            serde_yaml::from_str(&data).map_err(|source| SyncError::CredentialsYaml {
                path: path.to_path_buf(),
                source,
            })?;
        for (field, value) in [
            ("host", &creds.host),
            ("email", &creds.email),
            ("password", &creds.password),
        ] {
            if value.trim().is_empty() {
                return Err(SyncError::CredentialsField {
                    path: path.to_path_buf(),
                    field,
                });
            }
        }
        Ok(creds)
    }

    /// API base URL derived from `host`, without a trailing slash.
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }
}
