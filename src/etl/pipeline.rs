//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use eyre::Result;

/// ETL Pipeline that orchestrates Extract, Transform, and Load operations
///
/// One pipeline runs one stream sync: a single sequential pass with no
/// internal concurrency.
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Item)
/// - `L`: Loader type (must load T::Output)
///
/// # Example
/// ```no_run
/// use tap_appfigures::etl::Pipeline;
/// # use tap_appfigures::etl::{Extractor, Transformer, Loader};
/// # use eyre::Result;
/// # struct MyExtractor;
/// # impl Extractor for MyExtractor {
/// #     type Item = i32;
/// #     async fn extract(&self) -> Result<Vec<Self::Item>> { Ok(vec![]) }
/// # }
/// # struct MyTransformer;
/// # impl Transformer for MyTransformer {
/// #     type Input = i32;
/// #     type Output = i32;
/// #     fn transform(&self, input: Self::Input) -> Result<Self::Output> { Ok(input) }
/// # }
/// # struct MyLoader;
/// # impl Loader for MyLoader {
/// #     type Item = i32;
/// #     async fn load(&self, items: Vec<Self::Item>) -> Result<usize> { Ok(items.len()) }
/// # }
///
/// # async fn example() -> Result<()> {
/// let pipeline = Pipeline::new(MyExtractor, MyTransformer, MyLoader).named("products");
///
/// let count = pipeline.run().await?;
/// println!("Synced {} records", count);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    name: &'static str,
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    L: Loader<Item = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            name: "pipeline",
            extractor,
            transformer,
            loader,
        }
    }

    /// Label the pipeline (used in log lines)
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Extract records from the source
    /// 2. Transform each record
    /// 3. Load records to the destination
    ///
    /// Returns the number of records loaded
    ///
    /// # Errors
    /// Returns an error if any stage fails
    pub async fn run(&self) -> Result<usize> {
        log::info!("Starting {} pipeline", self.name);

        log::debug!("Extracting {}...", self.name);
        let items = self.extractor.extract().await?;
        log::info!("Extracted {} {} record(s)", items.len(), self.name);

        if items.is_empty() {
            log::warn!("No {} records extracted, pipeline complete", self.name);
            return Ok(0);
        }

        log::debug!("Transforming {} records...", self.name);
        let transformed = self.transformer.transform_many(items)?;
        log::debug!("Transformed {} record(s)", transformed.len());

        log::debug!("Loading {} records...", self.name);
        let count = self.loader.load(transformed).await?;
        log::info!("Loaded {} {} record(s)", count, self.name);

        Ok(count)
    }
}
