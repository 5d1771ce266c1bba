//! The request capability streams depend on

use eyre::Result;
use serde_json::Value;

/// Sends a GET request and returns the decoded JSON body
///
/// Streams are written against this trait rather than a concrete HTTP
/// client, so tests can hand them canned documents.
///
/// # Example
/// ```no_run
/// use tap_appfigures::client::ApiTransport;
/// use eyre::Result;
/// use serde_json::{Value, json};
///
/// struct Canned(Value);
///
/// impl ApiTransport for Canned {
///     async fn get_json(&self, _path: &str, _query: &[(&str, String)]) -> Result<Value> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait ApiTransport: Send + Sync {
    /// GET `path` (relative to the API base URL) with the given query parameters
    ///
    /// # Errors
    /// Returns an error when the request ultimately fails or the body is not JSON
    fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> impl std::future::Future<Output = Result<Value>> + Send;
}

impl<T: ApiTransport> ApiTransport for &T {
    fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        (**self).get_json(path, query)
    }
}
