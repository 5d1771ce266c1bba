//! Transformer trait for record transformation

use eyre::Result;

/// Transformer trait for transforming data items
///
/// Implementors define how to transform items:
/// - Schema conformance (dropping undeclared fields, type coercion)
/// - Validation
///
/// # Example
/// ```no_run
/// use tap_appfigures::etl::Transformer;
/// use eyre::Result;
///
/// struct FieldRenamer {
///     from: String,
///     to: String,
/// }
///
/// impl Transformer for FieldRenamer {
///     type Input = serde_json::Value;
///     type Output = serde_json::Value;
///
///     fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
///         if let Some(obj) = input.as_object_mut() {
///             if let Some(value) = obj.remove(&self.from) {
///                 obj.insert(self.to.clone(), value);
///             }
///         }
///         Ok(input)
///     }
/// }
/// ```
pub trait Transformer: Send + Sync {
    /// Input item type
    type Input: Send;

    /// Output item type after transformation
    type Output: Send;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if transformation fails (validation, conversion, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Transform multiple items (default batch implementation)
    ///
    /// Stops at the first failing item.
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        inputs.into_iter().map(|i| self.transform(i)).collect()
    }
}
