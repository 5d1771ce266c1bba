//! Extractor trait for pulling records out of a source

use eyre::Result;

/// Extractor trait for extracting records from a source
///
/// Implementors define how to pull items from sources like:
/// - Appfigures REST endpoints
/// - Canned JSON documents in tests
///
/// # Example
/// ```no_run
/// use tap_appfigures::etl::Extractor;
/// use eyre::Result;
/// use serde_json::Value;
///
/// struct FixtureExtractor {
///     records: Vec<Value>,
/// }
///
/// impl Extractor for FixtureExtractor {
///     type Item = Value;
///
///     async fn extract(&self) -> Result<Vec<Self::Item>> {
///         Ok(self.records.clone())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The type of items extracted
    type Item: Send;

    /// Extract items from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (network, decoding, report shape, etc.)
    fn extract(&self) -> impl std::future::Future<Output = Result<Vec<Self::Item>>> + Send;
}
