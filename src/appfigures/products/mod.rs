//! Products stream
//!
//! Full-refresh stream of every app/product tracked in the account.

mod extractor;

pub use extractor::ProductsExtractor;
