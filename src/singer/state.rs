//! Sync state (bookmarks)
//!
//! ```json
//! {"bookmarks": {"subscriptions": {"replication_key": "date", "replication_key_value": "2021-01-31"}}}
//! ```
//!
//! Bookmarks record the newest replication-key value emitted per stream.
//! They are informational: report requests still use the configured dates.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct State {
    #[serde(default)]
    pub bookmarks: BTreeMap<String, Bookmark>,
    /// Anything else found in an input state, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    pub replication_key: String,
    pub replication_key_value: Value,
}

impl State {
    /// Read a state file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))
    }

    pub fn bookmark(&self, stream: &str) -> Option<&Bookmark> {
        self.bookmarks.get(stream)
    }

    /// Move a stream's bookmark forward to `value` if it is newer
    ///
    /// A bookmark on a different replication key is replaced.
    pub fn advance(&mut self, stream: &str, replication_key: &str, value: &Value) {
        if value.is_null() {
            return;
        }
        match self.bookmarks.get_mut(stream) {
            Some(bookmark)
                if bookmark.replication_key == replication_key
                    && compare(&bookmark.replication_key_value, value) != Some(Ordering::Less) => {}
            Some(bookmark) => {
                bookmark.replication_key = replication_key.to_string();
                bookmark.replication_key_value = value.clone();
            }
            None => {
                self.bookmarks.insert(
                    stream.to_string(),
                    Bookmark {
                        replication_key: replication_key.to_string(),
                        replication_key_value: value.clone(),
                    },
                );
            }
        }
    }
}

/// Order replication-key values of the same kind
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        _ => None,
    }
}
