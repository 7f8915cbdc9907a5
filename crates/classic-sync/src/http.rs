//! HTTP client for the Salsa Classic API.

use async_trait::async_trait;
use classic_core::Action;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{ActionSource, Credentials, SyncError};

/// Table every page is read from.
const ACTION_TABLE: &str = "action";

/// An authenticated session against a Salsa Classic node.
///
/// Salsa tracks the login with a session cookie, so the underlying client
/// keeps a cookie store for the lifetime of the session.
pub struct SalsaClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

impl SalsaClient {
    /// Log in with `credentials` and return a client bound to that session.
    pub async fn authenticate(credentials: &Credentials) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        let base_url = credentials.base_url();
        let url = format!("{base_url}/api/authenticate.sjs");

        info!(url = %url, email = %credentials.email, "authenticating");
        let resp = client
            .get(&url)
            .query(&[
                ("json", ""),
                ("email", credentials.email.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let auth: AuthResponse = serde_json::from_str(&resp.text().await?)?;
        if auth.status != "success" {
            let reason = if auth.message.is_empty() {
                format!("status '{}'", auth.status)
            } else {
                auth.message
            };
            return Err(SyncError::Auth(reason));
        }

        info!("authenticated");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Read up to `limit` rows of `table` starting at `offset`.
    pub async fn get_objects<T>(
        &self,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<T>, SyncError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/api/getObjects.sjs", self.base_url);
        let window = format!("{offset},{limit}");

        debug!(url = %url, table, offset, limit, "fetching page");
        let resp = self
            .client
            .get(&url)
            .query(&[("json", ""), ("object", table), ("limit", window.as_str())])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        // Salsa answers errors with 200 and an object where the array would be.
        let value: serde_json::Value = serde_json::from_str(&resp.text().await?)?;
        match value {
            serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
            other => Err(SyncError::Api(api_message(&other))),
        }
    }
}

fn api_message(value: &serde_json::Value) -> String {
    ["message", "error", "result"]
        .iter()
        .find_map(|k| value.get(k).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

#[async_trait]
impl ActionSource for SalsaClient {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Action>, SyncError> {
        self.get_objects(ACTION_TABLE, offset, limit).await
    }
}
