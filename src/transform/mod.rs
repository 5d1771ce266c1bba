//! Record transformations
//!
//! - [`flatten_report`]: nested subscriptions report to flat rows
//! - [`RecordsPath`]: locating records inside a response document
//! - [`RecordConformer`]: shaping records to their stream schema

mod record_conformer;
mod records_path;
mod report_flattener;

pub use record_conformer::RecordConformer;
pub use records_path::RecordsPath;
pub use report_flattener::{ReportRows, ReportShapeError, flatten_report};
