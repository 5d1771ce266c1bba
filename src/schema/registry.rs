//! Static schema tables for every record kind the tap emits

use super::{Property, PropertyType::*, Schema};

/// One app/product tracked in the Appfigures account
pub const PRODUCTS_SCHEMA: Schema = Schema::new(&[
    Property::required("id", Integer),
    Property::optional("name", String),
    Property::optional("developer", String),
    Property::optional("icon", String),
    Property::optional("vendor_identifier", String),
    Property::optional("ref_no", Integer),
    Property::optional("sku", String),
    Property::optional("store_id", Integer),
    Property::optional("store", String),
    Property::optional("release_date", Date),
    Property::optional("added_date", Date),
    Property::optional("updated_date", Date),
    Property::optional("version", String),
    Property::optional("type", String),
    // Self-reference to the parent product; informational only
    Property::optional("parent_id", Integer),
]);

/// One day's subscription metrics for one product in one country
pub const SUBSCRIPTIONS_SCHEMA: Schema = Schema::new(&[
    Property::required("product_id", Integer),
    Property::required("country", String),
    Property::required("date", Date),
    Property::optional("all_active_subscriptions", Integer),
    Property::optional("active_subscriptions", Integer),
    Property::optional("paying_subscriptions", Integer),
    Property::optional("actual_revenue", Number),
    Property::optional("mrr", Number),
    Property::optional("gross_mrr", Number),
    Property::optional("gross_revenue", Number),
    Property::optional("activations", Integer),
    Property::optional("cancelations", Integer),
    Property::optional("churn", Number),
    Property::optional("first_year_subscribers", Integer),
    Property::optional("non_first_year_subscribers", Integer),
    Property::optional("active_discounted_subscriptions", Integer),
    Property::optional("active_trials", Integer),
    Property::optional("new_trials", Integer),
    Property::optional("cancelled_trials", Integer),
    Property::optional("transitions_in", Integer),
    Property::optional("transitions_out", Integer),
    Property::optional("cancelled_subscriptions", Integer),
    Property::optional("new_subscriptions", Integer),
    Property::optional("trial_conversions", Integer),
    Property::optional("reactivations", Integer),
    Property::optional("renewals", Integer),
    Property::optional("active_grace", Integer),
    Property::optional("new_grace", Integer),
    Property::optional("grace_drop_off", Integer),
    Property::optional("grace_recovery", Integer),
    Property::optional("new_trial_grace", Integer),
    Property::optional("trial_grace_drop_off", Integer),
    Property::optional("trial_grace_recovery", Integer),
]);

/// Settings accepted by the tap (rendered by `--about`)
pub const CONFIG_SCHEMA: Schema = Schema::new(&[
    Property::required("pat", String)
        .with_description("The token to authenticate against the API service"),
    Property::optional("start_date", DateTime)
        .with_default("2016-01-01T00:00:00Z")
        .with_description("The earliest report date to sync"),
    Property::optional("end_date", DateTime).with_description("The latest report date to sync"),
    Property::optional("api_url", String)
        .with_default("https://api.appfigures.com/v2")
        .with_description("Base URL of the Appfigures API"),
    Property::optional("user_agent", String)
        .with_description("User-Agent header sent with every request"),
]);

/// Lookup of record schemas by stream name
pub struct SchemaRegistry;

impl SchemaRegistry {
    const ENTRIES: &'static [(&'static str, Schema)] = &[
        ("products", PRODUCTS_SCHEMA),
        ("subscriptions", SUBSCRIPTIONS_SCHEMA),
    ];

    /// Schema for the named stream
    pub fn get(stream: &str) -> Option<Schema> {
        Self::ENTRIES
            .iter()
            .find(|(name, _)| *name == stream)
            .map(|(_, schema)| *schema)
    }

    /// All (stream name, schema) pairs in sync order
    pub fn iter() -> impl Iterator<Item = (&'static str, Schema)> {
        Self::ENTRIES.iter().copied()
    }
}
