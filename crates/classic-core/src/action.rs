//! The action record as returned by Salsa Classic's `getObjects` endpoint.

use chrono::{DateTime, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer};

/// Textual layout of `Date_Created` / `Last_Modified` once the leading day
/// name and the trailing zone abbreviation are removed. The full value reads
/// like `Tue Oct 30 2018 09:04:08 GMT-0400 (EDT)`.
const TIMESTAMP_FORMAT: &str = "%b %d %Y %H:%M:%S GMT%z";

/// A targeted, blind, MCTA or petition action.
///
/// Read-only once fetched; rendered at most once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Action {
    #[serde(rename = "action_KEY", default, deserialize_with = "lenient_string")]
    pub key: String,
    #[serde(rename = "Date_Created", default, deserialize_with = "lenient_string")]
    pub created_at: String,
    #[serde(rename = "Last_Modified", default, deserialize_with = "lenient_string")]
    pub modified_at: String,
    #[serde(rename = "Reference_Name", default, deserialize_with = "lenient_string")]
    pub reference_name: String,
    #[serde(rename = "Title", default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    pub description: String,
}

/// Outcome of reading the record's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStamp {
    Parsed(NaiveDate),
    /// A timestamp was present but did not match the expected layout.
    Malformed,
    Missing,
}

impl Action {
    /// The creation time, falling back to the modification time.
    pub fn timestamp(&self) -> Option<&str> {
        [self.created_at.as_str(), self.modified_at.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
    }

    /// Parse [`timestamp`](Self::timestamp) into a calendar date in the
    /// timestamp's own offset.
    pub fn date_stamp(&self) -> DateStamp {
        match self.timestamp() {
            None => DateStamp::Missing,
            Some(raw) => match parse_timestamp(raw) {
                Some(date) => DateStamp::Parsed(date),
                None => DateStamp::Malformed,
            },
        }
    }
}

/// The day name must be spelled correctly but need not match the date. The
/// zone abbreviation must be present; only the numeric offset is used.
fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let (day, rest) = raw.split_once(' ')?;
    if day.len() != 3 || day.parse::<Weekday>().is_err() {
        return None;
    }
    let (rest, zone) = rest.strip_suffix(')')?.rsplit_once(" (")?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    DateTime::parse_from_str(rest, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Accept strings, numbers, booleans and nulls; Salsa is not consistent about
/// which it sends for the same column.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}
