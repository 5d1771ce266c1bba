//! Stream declarations
//!
//! A stream is one named category of records with its own endpoint, schema,
//! primary key and optional replication key.

use crate::schema::{PRODUCTS_SCHEMA, SUBSCRIPTIONS_SCHEMA, Schema};
use crate::transform::RecordsPath;

/// How a stream is kept up to date between syncs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicationMethod {
    /// The full current set is fetched every sync
    FullTable,
    /// Records carry a monotonically increasing replication key
    Incremental,
}

impl ReplicationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTable => "FULL_TABLE",
            Self::Incremental => "INCREMENTAL",
        }
    }
}

/// Static description of one stream
#[derive(Debug, Clone, Copy)]
pub struct StreamMetadata {
    pub name: &'static str,
    /// API path relative to the base URL
    pub path: &'static str,
    pub primary_keys: &'static [&'static str],
    pub replication_key: Option<&'static str>,
    pub records_path: RecordsPath,
    pub schema: Schema,
}

impl StreamMetadata {
    pub fn replication_method(&self) -> ReplicationMethod {
        match self.replication_key {
            Some(_) => ReplicationMethod::Incremental,
            None => ReplicationMethod::FullTable,
        }
    }
}

/// Apps and products in the account; full refresh every sync
pub const PRODUCTS: StreamMetadata = StreamMetadata {
    name: "products",
    path: "/products/mine",
    primary_keys: &["id"],
    replication_key: None,
    records_path: RecordsPath::Members,
    schema: PRODUCTS_SCHEMA,
};

/// Daily subscription metrics per product and country
pub const SUBSCRIPTIONS: StreamMetadata = StreamMetadata {
    name: "subscriptions",
    path: "/reports/subscriptions",
    primary_keys: &["date", "country", "product_id"],
    replication_key: Some("date"),
    records_path: RecordsPath::Elements,
    schema: SUBSCRIPTIONS_SCHEMA,
};

/// Every stream the tap exposes, in sync order
pub const STREAMS: &[StreamMetadata] = &[PRODUCTS, SUBSCRIPTIONS];

/// Look up a stream by name
pub fn find_stream(name: &str) -> Option<&'static StreamMetadata> {
    STREAMS.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    #[test]
    fn test_replication_methods() {
        assert_eq!(PRODUCTS.replication_method(), ReplicationMethod::FullTable);
        assert_eq!(SUBSCRIPTIONS.replication_method(), ReplicationMethod::Incremental);
        assert_eq!(SUBSCRIPTIONS.replication_method().as_str(), "INCREMENTAL");
    }

    #[test]
    fn test_keys_are_declared_in_schema() {
        for stream in STREAMS {
            for key in stream.primary_keys {
                let property = stream.schema.property(key).unwrap();
                assert!(property.required, "{}.{} must be required", stream.name, key);
            }
            if let Some(key) = stream.replication_key {
                assert!(stream.schema.property(key).is_some());
            }
        }
    }

    #[test]
    fn test_streams_match_registry() {
        for stream in STREAMS {
            let registered = SchemaRegistry::get(stream.name).unwrap();
            assert_eq!(registered.properties(), stream.schema.properties());
        }
    }

    #[test]
    fn test_find_stream() {
        assert_eq!(find_stream("subscriptions").unwrap().path, "/reports/subscriptions");
        assert!(find_stream("publishers").is_none());
    }
}
