//! Backend seam
//!
//! The store and the toast engine only need "GET this path, give me JSON".
//! The HTTP client implements [`Backend`]; tests use in-memory fakes.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::models::decode;

/// Read access to the club REST API
pub trait Backend: Send + Sync {
    /// GET `path` (relative to the API base) and return the decoded body
    fn get_json(&self, path: &str) -> impl Future<Output = Result<Value>> + Send;
}

impl<B: Backend> Backend for Arc<B> {
    fn get_json(&self, path: &str) -> impl Future<Output = Result<Value>> + Send {
        (**self).get_json(path)
    }
}

/// One of the four cached collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Events,
    Team,
    Faculty,
    Gallery,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Events,
        Collection::Team,
        Collection::Faculty,
        Collection::Gallery,
    ];

    /// Public list endpoint
    pub fn path(&self) -> &'static str {
        match self {
            Collection::Events => "/events",
            Collection::Team => "/team",
            Collection::Faculty => "/faculty",
            Collection::Gallery => "/gallery?active=true",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Events => "events",
            Collection::Team => "team",
            Collection::Faculty => "faculty",
            Collection::Gallery => "gallery",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pull the item array out of a list response.
///
/// Looks at the `data` field first, then at the body itself, and falls back
/// to an empty list. Records that fail to decode are skipped.
pub fn extract_list<T: DeserializeOwned>(body: Value, source: &str) -> Vec<T> {
    let raw = match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    };

    raw.into_iter()
        .enumerate()
        .filter_map(|(index, item)| match decode(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(source, index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}
