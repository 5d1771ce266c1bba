//! CLI helper functions

use crate::{
    appfigures::{
        PRODUCTS, STREAMS, SUBSCRIPTIONS, StreamMetadata, products::ProductsExtractor,
        subscriptions::{SubscriptionParams, SubscriptionsExtractor},
    },
    client::{AppFiguresClient, ApiTransport},
    config::TapConfig,
    etl::{Extractor, Pipeline},
    schema::CONFIG_SCHEMA,
    singer::{Catalog, SingerWriter, State},
    transform::RecordConformer,
};
use eyre::{Context, Result};
use serde_json::{Value, json};
use std::io::Write;
use std::path::Path;

/// Tap description printed by `--about`
pub fn about() -> Value {
    json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "capabilities": ["catalog", "discover", "state", "about"],
        "settings": CONFIG_SCHEMA.to_json_schema(),
        "streams": STREAMS.iter().map(|s| s.name).collect::<Vec<_>>(),
    })
}

/// Catalog printed by `--discover`
pub fn discover() -> Catalog {
    Catalog::discover()
}

/// Build the Appfigures client from validated settings
pub fn load_client(config: &TapConfig) -> Result<AppFiguresClient> {
    let url = config.api_url()?;
    AppFiguresClient::try_new(url, config.auth(), &config.user_agent())
        .context("Failed to create Appfigures client")
}

/// Read `--state` and `--catalog` inputs, when given
pub fn load_inputs(
    state: Option<&Path>,
    catalog: Option<&Path>,
) -> Result<(State, Option<Catalog>)> {
    let state = match state {
        Some(path) => {
            log::debug!("Reading state from {}", path.display());
            State::read(path)?
        }
        None => State::default(),
    };
    let catalog = catalog.map(Catalog::read).transpose()?;
    Ok((state, catalog))
}

/// Streams a sync runs: the catalog's selection, or every stream
pub fn selected_streams(catalog: Option<&Catalog>) -> Vec<&'static StreamMetadata> {
    match catalog {
        Some(catalog) => catalog.selected_streams(),
        None => STREAMS.iter().collect(),
    }
}

/// Sync one stream: SCHEMA, then its records, then STATE
///
/// Pipeline: extractor → RecordConformer → SingerWriter
async fn sync_stream<E, W>(
    stream: &StreamMetadata,
    extractor: E,
    writer: &SingerWriter<W>,
) -> Result<usize>
where
    E: Extractor<Item = Value>,
    W: Write + Send,
{
    writer.write_schema(stream)?;

    let conformer = RecordConformer::new(stream.name, stream.schema);
    let count = Pipeline::new(extractor, conformer, writer.stream_loader(stream))
        .named(stream.name)
        .run()
        .await
        .with_context(|| format!("Failed to sync stream '{}'", stream.name))?;

    writer.write_state()?;
    log::info!("✓ Synced {} {} record(s)", count, stream.name);
    Ok(count)
}

/// Sync the products stream (full table)
pub async fn sync_products<T, W>(client: &T, writer: &SingerWriter<W>) -> Result<usize>
where
    T: ApiTransport,
    W: Write + Send,
{
    sync_stream(&PRODUCTS, ProductsExtractor::new(client), writer).await
}

/// Sync the subscriptions report over the configured date range
pub async fn sync_subscriptions<T, W>(
    client: &T,
    config: &TapConfig,
    writer: &SingerWriter<W>,
) -> Result<usize>
where
    T: ApiTransport,
    W: Write + Send,
{
    let params = SubscriptionParams::from_config(config);
    sync_stream(
        &SUBSCRIPTIONS,
        SubscriptionsExtractor::new(client, params),
        writer,
    )
    .await
}

/// Sync the given streams in order, stopping at the first failure
///
/// Returns the total number of records written.
pub async fn sync<T, W>(
    client: &T,
    config: &TapConfig,
    streams: &[&StreamMetadata],
    writer: &SingerWriter<W>,
) -> Result<usize>
where
    T: ApiTransport,
    W: Write + Send,
{
    if streams.is_empty() {
        log::warn!("No streams selected, nothing to sync");
        return Ok(0);
    }

    let mut total = 0;
    for stream in streams {
        total += match stream.name {
            name if name == PRODUCTS.name => sync_products(client, writer).await?,
            name if name == SUBSCRIPTIONS.name => {
                sync_subscriptions(client, config, writer).await?
            }
            name => eyre::bail!("No extractor for stream '{}'", name),
        };
    }
    Ok(total)
}
