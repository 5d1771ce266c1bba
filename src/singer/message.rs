//! Singer messages
//!
//! Every line written to stdout is one JSON message tagged by `type`.

use super::State;
use crate::appfigures::StreamMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Declares the shape of the records that follow for a stream
    Schema {
        stream: String,
        schema: Value,
        key_properties: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },
    /// One record of a stream
    Record {
        stream: String,
        record: Value,
        time_extracted: DateTime<Utc>,
    },
    /// Checkpoint to hand back on the next run
    State { value: Value },
}

impl Message {
    pub fn schema(stream: &StreamMetadata) -> Self {
        Self::Schema {
            stream: stream.name.to_string(),
            schema: stream.schema.to_json_schema(),
            key_properties: stream.primary_keys.iter().map(|k| k.to_string()).collect(),
            bookmark_properties: stream
                .replication_key
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }

    pub fn record(stream: &StreamMetadata, record: Value, time_extracted: DateTime<Utc>) -> Self {
        Self::Record {
            stream: stream.name.to_string(),
            record,
            time_extracted,
        }
    }

    pub fn state(state: &State) -> eyre::Result<Self> {
        Ok(Self::State {
            value: serde_json::to_value(state)?,
        })
    }
}
