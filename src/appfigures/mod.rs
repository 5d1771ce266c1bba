//! Appfigures streams
//!
//! Declares the streams the tap exposes and the extractors that pull their
//! records from the API.

pub mod products;
mod stream;
pub mod subscriptions;

pub use stream::{
    PRODUCTS, ReplicationMethod, STREAMS, SUBSCRIPTIONS, StreamMetadata, find_stream,
};
