//! Storage layer: one HTML file per exported action.

mod error;
pub use error::StoreError;

mod html;
pub use html::{EXTENSION, HtmlStore, RenderOutcome};
