//! Singer protocol output
//!
//! Messages, the stdout writer, sync state and the discovery catalog.

mod catalog;
mod message;
mod state;
mod writer;

pub use catalog::{Catalog, CatalogEntry, MetadataEntry};
pub use message::Message;
pub use state::{Bookmark, State};
pub use writer::{SingerWriter, StreamLoader};
