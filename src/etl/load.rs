//! Loader trait for handing records to a destination

use eyre::Result;

/// Loader trait for loading data to a destination
///
/// Implementors define how to hand items to destinations such as the
/// Singer message stream on stdout.
///
/// # Example
/// ```no_run
/// use tap_appfigures::etl::Loader;
/// use eyre::Result;
/// use serde_json::Value;
///
/// struct CountingLoader;
///
/// impl Loader for CountingLoader {
///     type Item = Value;
///
///     async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
///         Ok(items.len())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// The type of items to load
    type Item: Send;

    /// Load items to the destination
    ///
    /// Returns the number of items successfully loaded
    ///
    /// # Errors
    /// Returns an error if loading fails (I/O, serialization, etc.)
    fn load(
        &self,
        items: Vec<Self::Item>,
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}
