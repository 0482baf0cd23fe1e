//! Serde helpers shared by the schema types

use crate::core::timestamp::parse_str;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Deserialize an optional timestamp string through the timestamp parser
pub(crate) fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => parse_str(&text).map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}

/// Render a tracked path, mapping the root to an empty string
pub(crate) fn path_string(path: &serde_path_to_error::Path) -> String {
    let rendered = path.to_string();
    if rendered == "." {
        String::new()
    } else {
        rendered
    }
}

/// Join a path prefix with a path relative to it
pub(crate) fn join_path(prefix: &str, relative: &str) -> String {
    match (prefix.is_empty(), relative.is_empty() || relative == "<root>") {
        (_, true) => prefix.to_string(),
        (true, false) => relative.to_string(),
        (false, false) if relative.starts_with('[') => format!("{prefix}{relative}"),
        (false, false) => format!("{prefix}.{relative}"),
    }
}
