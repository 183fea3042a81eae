//! Helpers shared by the request payload builders

use chrono::NaiveDateTime;
use serde::Serializer;

/// Wire format of dates sent to the API, e.g. `2023-12-01T00:00:00`
pub const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// `Some(value)` unless the value is empty or whitespace.
///
/// Optional payload fields go through this so that an empty string is
/// omitted from the body instead of being sent.
pub fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Percent-encodes an id for use as a single path segment.
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id.trim()).into_owned()
}

/// Serializes an optional date as [`ISO_DATETIME_FORMAT`].
pub fn serialize_iso_datetime<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date) => serializer.serialize_str(&date.format(ISO_DATETIME_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}
