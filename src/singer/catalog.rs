//! Stream catalog
//!
//! `--discover` prints the catalog of every stream; a catalog passed back
//! with `--catalog` selects which streams a sync runs.

use crate::appfigures::{STREAMS, StreamMetadata, find_stream};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub streams: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub tap_stream_id: String,
    pub stream: String,
    pub schema: Value,
    #[serde(default)]
    pub key_properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_method: Option<String>,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

/// Metadata attached to a stream (empty breadcrumb) or one of its properties
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataEntry {
    pub breadcrumb: Vec<String>,
    pub metadata: Map<String, Value>,
}

impl Catalog {
    /// Catalog of every stream, all selected
    pub fn discover() -> Self {
        Self {
            streams: STREAMS.iter().map(CatalogEntry::from_stream).collect(),
        }
    }

    /// Read a catalog file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))
    }

    pub fn entry(&self, stream: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|e| e.tap_stream_id == stream)
    }

    /// Known streams this catalog selects, in sync order
    ///
    /// Unknown entries are ignored with a warning.
    pub fn selected_streams(&self) -> Vec<&'static StreamMetadata> {
        for entry in &self.streams {
            if find_stream(&entry.tap_stream_id).is_none() {
                log::warn!("Ignoring unknown stream in catalog: {}", entry.tap_stream_id);
            }
        }

        STREAMS
            .iter()
            .filter(|s| self.entry(s.name).is_some_and(CatalogEntry::is_selected))
            .collect()
    }
}

impl CatalogEntry {
    pub fn from_stream(stream: &StreamMetadata) -> Self {
        let key_properties: Vec<String> =
            stream.primary_keys.iter().map(|k| k.to_string()).collect();

        let mut metadata = vec![MetadataEntry {
            breadcrumb: Vec::new(),
            metadata: stream_metadata(stream, &key_properties),
        }];
        for property in stream.schema.properties() {
            let automatic = stream.primary_keys.contains(&property.name)
                || stream.replication_key == Some(property.name);
            let mut entry = Map::new();
            entry.insert(
                "inclusion".to_string(),
                json!(if automatic { "automatic" } else { "available" }),
            );
            metadata.push(MetadataEntry {
                breadcrumb: vec!["properties".to_string(), property.name.to_string()],
                metadata: entry,
            });
        }

        Self {
            tap_stream_id: stream.name.to_string(),
            stream: stream.name.to_string(),
            schema: stream.schema.to_json_schema(),
            key_properties,
            replication_key: stream.replication_key.map(str::to_string),
            replication_method: Some(stream.replication_method().as_str().to_string()),
            metadata,
        }
    }

    /// Stream-level `selected` flag; absent means selected
    pub fn is_selected(&self) -> bool {
        self.metadata
            .iter()
            .find(|m| m.breadcrumb.is_empty())
            .and_then(|m| m.metadata.get("selected"))
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

fn stream_metadata(stream: &StreamMetadata, key_properties: &[String]) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("inclusion".to_string(), json!("available"));
    metadata.insert("selected".to_string(), json!(true));
    metadata.insert("table-key-properties".to_string(), json!(key_properties));
    metadata.insert(
        "forced-replication-method".to_string(),
        json!(stream.replication_method().as_str()),
    );
    if let Some(key) = stream.replication_key {
        metadata.insert("valid-replication-keys".to_string(), json!([key]));
    }
    metadata.insert("schema-name".to_string(), json!(stream.name));
    metadata
}
