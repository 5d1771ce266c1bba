//! tap-appfigures
//!
//! A Singer tap for the Appfigures API: products and daily subscription
//! report records, emitted as SCHEMA/RECORD/STATE messages on stdout.

pub mod appfigures;
pub mod cli;
pub mod client;
pub mod config;
pub mod etl;
pub mod schema;
pub mod singer;
pub mod transform;

// Re-exports for convenience
pub use appfigures::{PRODUCTS, STREAMS, SUBSCRIPTIONS, StreamMetadata};
pub use client::{AppFiguresClient, ApiTransport, Auth, RetryPolicy};
pub use config::TapConfig;
pub use etl::{Extractor, Loader, Pipeline, Transformer};
pub use schema::{Schema, SchemaRegistry};
pub use singer::{Catalog, Message, SingerWriter, State};
pub use transform::{RecordConformer, flatten_report};
