//! Products API extractor
//!
//! Extracts the account's products via GET /products/mine

use crate::appfigures::PRODUCTS;
use crate::client::ApiTransport;
use crate::etl::Extractor;
use eyre::{Context, Result};
use serde_json::Value;

/// Extractor for the products stream
///
/// The endpoint returns an object keyed by product ID; every member value
/// is one product record, passed through as-is.
///
/// # Example
/// ```no_run
/// use tap_appfigures::appfigures::products::ProductsExtractor;
/// use tap_appfigures::client::{AppFiguresClient, Auth};
/// use tap_appfigures::etl::Extractor;
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("https://api.appfigures.com/v2")?;
/// let client = AppFiguresClient::try_new(url, Auth::Bearer("pat".into()), "tap-appfigures")?;
///
/// let products = ProductsExtractor::new(client).extract().await?;
/// # Ok(())
/// # }
/// ```
pub struct ProductsExtractor<T> {
    client: T,
}

impl<T: ApiTransport> ProductsExtractor<T> {
    pub fn new(client: T) -> Self {
        Self { client }
    }
}

impl<T: ApiTransport> Extractor for ProductsExtractor<T> {
    type Item = Value;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        log::debug!("Fetching products from {}", PRODUCTS.path);

        let document = self
            .client
            .get_json(PRODUCTS.path, &[])
            .await
            .with_context(|| "Failed to fetch products from Appfigures")?;

        let products = PRODUCTS.records_path.extract(document);
        log::info!("Fetched {} product(s)", products.len());

        Ok(products)
    }
}
