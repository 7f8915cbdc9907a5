//! Core types for exporting Salsa Classic actions: the record itself,
//! filename derivation, legacy URL scrubbing and the HTML template.

pub mod action;
pub mod filename;
pub mod scrub;
pub mod template;

pub use action::{Action, DateStamp};
pub use filename::derive;
pub use scrub::scrub;
pub use template::{ActionTemplate, DEFAULT_TEMPLATE, TemplateError};
