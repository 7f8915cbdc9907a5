//! Filename derivation for exported actions.
//!
//! Every exported file is named `"<date> - <key> - <name>.<ext>"`:
//!
//! - `date` is the creation date (falling back to the modification date) as
//!   `YYYY-MM-DD`, `Unknown` when the record has neither, or `0001-01-01` when
//!   the timestamp does not parse.
//! - `key` is the action key with `/` replaced by a space.
//! - `name` is the title (falling back to the reference name), with `/`
//!   replaced by a space and anything tag-like (`<.+?>`) removed.

use std::sync::OnceLock;

use regex::Regex;

use crate::action::{Action, DateStamp};

/// Placeholder for a date or name that cannot be determined.
pub const UNKNOWN: &str = "Unknown";

/// Date component used when a timestamp is present but unparseable.
pub const ZERO_DATE: &str = "0001-01-01";

static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| Regex::new(r"<.+?>").unwrap())
}

/// Derive the output filename for `action` with the given extension.
pub fn derive(action: &Action, extension: &str) -> String {
    format!(
        "{} - {} - {}.{}",
        date_component(action),
        action.key.replace('/', " "),
        name_component(action),
        extension
    )
}

fn date_component(action: &Action) -> String {
    match action.date_stamp() {
        DateStamp::Parsed(date) => date.format("%Y-%m-%d").to_string(),
        DateStamp::Malformed => ZERO_DATE.to_string(),
        DateStamp::Missing => UNKNOWN.to_string(),
    }
}

fn name_component(action: &Action) -> String {
    let raw = if !action.title.is_empty() {
        action.title.as_str()
    } else {
        action.reference_name.as_str()
    };
    let cleaned = clean_name(raw);
    if cleaned.is_empty() {
        UNKNOWN.to_string()
    } else {
        cleaned
    }
}

/// Strip slashes and tag-like fragments so the name is safe as a path segment.
pub fn clean_name(raw: &str) -> String {
    let slashless = raw.replace('/', " ");
    tag_re().replace_all(&slashless, "").trim().to_string()
}
