//! Subscriptions report stream
//!
//! Incremental stream (replication key `date`) of daily subscription
//! metrics, one row per product, country and day with activity.

mod extractor;
mod params;

pub use extractor::SubscriptionsExtractor;
pub use params::{GRANULARITY, GROUP_BY, REPORT_DATE_FORMAT, SubscriptionParams};
