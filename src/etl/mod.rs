//! Core ETL (Extract, Transform, Load) abstractions
//!
//! Every stream sync is expressed as a pipeline: an extractor pulls raw
//! records from the API, a transformer conforms them to the stream schema,
//! and a loader emits them downstream.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::Transformer;
