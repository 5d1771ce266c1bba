//! Subscriptions report extractor
//!
//! Extracts daily subscription metrics via GET /reports/subscriptions and
//! flattens the nested product → country → date report into rows.

use super::SubscriptionParams;
use crate::appfigures::SUBSCRIPTIONS;
use crate::client::ApiTransport;
use crate::etl::Extractor;
use crate::transform::flatten_report;
use eyre::{Context, Result};
use serde_json::Value;

/// Extractor for the subscriptions stream
///
/// Issues a single request for the configured date range; the report is not
/// paginated.
pub struct SubscriptionsExtractor<T> {
    client: T,
    params: SubscriptionParams,
}

impl<T: ApiTransport> SubscriptionsExtractor<T> {
    pub fn new(client: T, params: SubscriptionParams) -> Self {
        Self { client, params }
    }

    /// Decode a report document into flat rows
    fn parse_report(&self, report: &Value) -> Result<Vec<Value>> {
        let rows = flatten_report(report)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| "Failed to parse subscriptions report")?;
        Ok(SUBSCRIPTIONS.records_path.extract(Value::Array(rows)))
    }
}

impl<T: ApiTransport> Extractor for SubscriptionsExtractor<T> {
    type Item = Value;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        let query = self.params.to_query();
        log::debug!("Fetching subscriptions report {:?}", query);

        let report = self
            .client
            .get_json(SUBSCRIPTIONS.path, &query)
            .await
            .with_context(|| "Failed to fetch subscriptions report from Appfigures")?;

        let rows = self.parse_report(&report)?;
        log::info!(
            "Flattened subscriptions report into {} row(s) ({} to {})",
            rows.len(),
            self.params.start_date,
            self.params
                .end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "today".to_string())
        );

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Mutex;

    struct Canned {
        document: Value,
        queries: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl Canned {
        fn new(document: Value) -> Self {
            Self {
                document,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl ApiTransport for Canned {
        async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
            assert_eq!(path, "/reports/subscriptions");
            self.queries.lock().unwrap().push(
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            );
            Ok(self.document.clone())
        }
    }

    fn params() -> SubscriptionParams {
        SubscriptionParams::new(
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 2),
        )
    }

    #[tokio::test]
    async fn test_extract_flattens_report() {
        let transport = Canned::new(json!({
            "1": {"US": {"2021-01-01": {"mrr": 100}, "2021-01-02": {}}}
        }));

        let rows = SubscriptionsExtractor::new(&transport, params())
            .extract()
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![json!({"product_id": "1", "country": "US", "date": "2021-01-01", "mrr": 100})]
        );

        let queries = transport.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].contains(&("startDate".to_string(), "2021-01-01".to_string())));
        assert!(queries[0].contains(&("endDate".to_string(), "2021-01-02".to_string())));
        assert!(queries[0].contains(&("granularity".to_string(), "daily".to_string())));
    }

    #[tokio::test]
    async fn test_extract_empty_report() {
        let transport = Canned::new(json!({}));
        let rows = SubscriptionsExtractor::new(&transport, params())
            .extract()
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_report_is_fatal() {
        let transport = Canned::new(json!({"1": {"US": [1, 2, 3]}}));
        let err = SubscriptionsExtractor::new(&transport, params())
            .extract()
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to parse subscriptions report"));
        let cause = err.root_cause().to_string();
        assert!(cause.contains("$.1.US"), "unexpected cause: {}", cause);
    }
}
