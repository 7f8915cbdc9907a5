//! Sync layer: credentials, the Salsa Classic HTTP client, and the paginated
//! action source built on top of it.

mod credentials;
mod error;
mod pager;

#[cfg(feature = "http")]
pub mod http;

pub use credentials::Credentials;
pub use error::SyncError;
pub use pager::{ActionSource, DEFAULT_PAGE_SIZE, actions};

#[cfg(feature = "http")]
pub use http::SalsaClient;
