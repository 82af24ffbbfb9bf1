//! Data models for the club site
//!
//! Records are plain snapshots of backend state. The backend keys them by a
//! `_id` string and owns their whole lifecycle.

mod event;
mod faculty;
mod gallery;
mod team;
mod toast;

pub use event::*;
pub use faculty::*;
pub use gallery::*;
pub use team::*;
pub use toast::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decode a backend record.
///
/// Documents may carry the Mongo `_id` and a plain `id` side by side. The
/// models read either key, so `id` is dropped wherever `_id` is present,
/// nested objects included.
pub fn decode<T: DeserializeOwned>(mut record: Value) -> serde_json::Result<T> {
    strip_duplicate_ids(&mut record);
    serde_json::from_value(record)
}

fn strip_duplicate_ids(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.contains_key("_id") {
                map.remove("id");
            }
            map.values_mut().for_each(strip_duplicate_ids);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_duplicate_ids),
        _ => {}
    }
}

/// Treat an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Weak reference to an [`Event`], resolved by lookup only.
///
/// The backend sends either the bare id or a populated object, depending on
/// the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventRef {
    Id(String),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default)]
        title: Option<String>,
    },
}

impl EventRef {
    pub fn id(&self) -> &str {
        match self {
            EventRef::Id(id) => id,
            EventRef::Populated { id, .. } => id,
        }
    }

    /// Title carried by a populated reference
    pub fn title(&self) -> Option<&str> {
        match self {
            EventRef::Id(_) => None,
            EventRef::Populated { title, .. } => title.as_deref(),
        }
    }

    /// Look the referenced event up in a snapshot
    pub fn resolve<'a>(&self, events: &'a [Event]) -> Option<&'a Event> {
        events.iter().find(|e| e.id == self.id())
    }
}

/// Split comma-separated form input into a list.
///
/// Entries are trimmed and empty entries dropped, so `"rust, , go"` yields
/// `["rust", "go"]`.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Does `id` look like a backend object id (24 hex characters)?
pub fn is_object_id(id: &str) -> bool {
    id.len() == 24 && id.chars().all(|c| c.is_ascii_hexdigit())
}
