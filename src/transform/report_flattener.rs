//! Subscriptions report flattener
//!
//! The subscriptions report groups metrics three levels deep:
//!
//! ```json
//! { "<product_id>": { "<country>": { "<date>": { "mrr": 100, ... } } } }
//! ```
//!
//! [`flatten_report`] turns that into one flat row per
//! (product, country, date) with a non-empty metrics bucket:
//!
//! ```json
//! { "product_id": "<product_id>", "country": "<country>", "date": "<date>", "mrr": 100, ... }
//! ```
//!
//! Rows come out in the iteration order of the source document. Empty
//! buckets are placeholders the API returns for days without activity and
//! never become rows. A date bucket is empty when it is `null`, `{}`, `[]`,
//! `false`, `""` or zero.

use serde_json::{Map, Value, map};
use thiserror::Error;

/// Report document did not have the expected nested shape
#[derive(Debug, Error, PartialEq)]
#[error("malformed subscriptions report at {path}: expected {expected}, found {found}")]
pub struct ReportShapeError {
    pub path: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl ReportShapeError {
    fn new(path: String, expected: &'static str, value: &Value) -> Self {
        Self {
            path,
            expected,
            found: kind_of(value),
        }
    }
}

/// Lazily flatten a nested subscriptions report into rows
///
/// The returned iterator yields one `Ok(row)` per non-empty date bucket, and
/// stops after yielding an `Err` the first time a level of the document is
/// not shaped as expected. Call again on the same document for a fresh pass.
///
/// # Example
/// ```
/// use tap_appfigures::transform::flatten_report;
/// use serde_json::json;
///
/// let report = json!({"1": {"US": {"2021-01-01": {"mrr": 100}, "2021-01-02": {}}}});
/// let rows: Vec<_> = flatten_report(&report).collect::<Result<_, _>>().unwrap();
///
/// assert_eq!(
///     rows,
///     vec![json!({"product_id": "1", "country": "US", "date": "2021-01-01", "mrr": 100})]
/// );
/// ```
pub fn flatten_report(report: &Value) -> ReportRows<'_> {
    match report.as_object() {
        Some(products) => ReportRows {
            products: Some(products.iter()),
            countries: None,
            dates: None,
            pending_error: None,
        },
        None => ReportRows {
            products: None,
            countries: None,
            dates: None,
            pending_error: Some(ReportShapeError::new(
                "$".to_string(),
                "object of products",
                report,
            )),
        },
    }
}

/// Iterator over flattened report rows, see [`flatten_report`]
pub struct ReportRows<'a> {
    products: Option<map::Iter<'a>>,
    countries: Option<(&'a str, map::Iter<'a>)>,
    dates: Option<(&'a str, &'a str, map::Iter<'a>)>,
    pending_error: Option<ReportShapeError>,
}

impl ReportRows<'_> {
    fn fail(&mut self, error: ReportShapeError) -> Option<Result<Value, ReportShapeError>> {
        self.products = None;
        self.countries = None;
        self.dates = None;
        Some(Err(error))
    }
}

impl Iterator for ReportRows<'_> {
    type Item = Result<Value, ReportShapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending_error.take() {
            return Some(Err(error));
        }

        loop {
            if let Some((product_id, country, dates)) = &mut self.dates {
                match dates.next() {
                    Some((date, bucket)) => {
                        if is_empty_bucket(bucket) {
                            log::trace!("Skipping empty bucket {}/{}/{}", product_id, country, date);
                            continue;
                        }
                        let Some(metrics) = bucket.as_object() else {
                            let path = format!("$.{}.{}.{}", product_id, country, date);
                            let error = ReportShapeError::new(path, "object of metrics", bucket);
                            return self.fail(error);
                        };
                        return Some(Ok(build_row(product_id, country, date, metrics)));
                    }
                    None => self.dates = None,
                }
            }

            if let Some((product_id, countries)) = &mut self.countries {
                match countries.next() {
                    Some((country, dates)) => match dates.as_object() {
                        Some(dates) => {
                            self.dates = Some((*product_id, country.as_str(), dates.iter()))
                        }
                        None => {
                            let path = format!("$.{}.{}", product_id, country);
                            let error = ReportShapeError::new(path, "object of dates", dates);
                            return self.fail(error);
                        }
                    },
                    None => self.countries = None,
                }
                continue;
            }

            let (product_id, countries) = self.products.as_mut()?.next()?;
            match countries.as_object() {
                Some(countries) => self.countries = Some((product_id.as_str(), countries.iter())),
                None => {
                    let path = format!("$.{}", product_id);
                    let error = ReportShapeError::new(path, "object of countries", countries);
                    return self.fail(error);
                }
            }
        }
    }
}

/// Buckets with no content are placeholders, not zero-filled days
fn is_empty_bucket(bucket: &Value) -> bool {
    match bucket {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

fn build_row(product_id: &str, country: &str, date: &str, metrics: &Map<String, Value>) -> Value {
    let mut row = Map::with_capacity(metrics.len() + 3);
    row.insert("product_id".to_string(), Value::String(product_id.to_string()));
    row.insert("country".to_string(), Value::String(country.to_string()));
    row.insert("date".to_string(), Value::String(date.to_string()));
    // Metric keys win over the grouping keys, matching a plain dict merge
    row.extend(metrics.iter().map(|(k, v)| (k.clone(), v.clone())));
    Value::Object(row)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn flatten(report: &Value) -> Vec<Value> {
        flatten_report(report)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn sample_report() -> Value {
        json!({
            "212": {
                "US": {
                    "2021-01-01": {"mrr": 100.5, "active_subscriptions": 10},
                    "2021-01-02": {},
                    "2021-01-03": {"mrr": 101.0, "active_subscriptions": 11}
                },
                "DE": {
                    "2021-01-01": {"mrr": 7.25, "churn": 0.1}
                }
            },
            "9": {
                "GB": {
                    "2021-01-01": null,
                    "2021-01-02": {"renewals": 3}
                },
                "FR": {}
            }
        })
    }

    #[test]
    fn test_skips_empty_date_bucket() {
        let report = json!({"1": {"US": {"2021-01-01": {"mrr": 100}, "2021-01-02": {}}}});
        assert_eq!(
            flatten(&report),
            vec![json!({"product_id": "1", "country": "US", "date": "2021-01-01", "mrr": 100})]
        );
    }

    #[test]
    fn test_empty_report() {
        assert!(flatten(&json!({})).is_empty());
    }

    #[test]
    fn test_two_products_each_tagged() {
        let report = json!({
            "1": {"US": {"2021-01-01": {"mrr": 1}}},
            "2": {"US": {"2021-01-01": {"mrr": 2}}}
        });
        let rows = flatten(&report);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["product_id"], "1");
        assert_eq!(rows[0]["mrr"], 1);
        assert_eq!(rows[1]["product_id"], "2");
        assert_eq!(rows[1]["mrr"], 2);
    }

    #[test]
    fn test_traversal_order() {
        let keys: Vec<(String, String, String)> = flatten(&sample_report())
            .iter()
            .map(|row| {
                (
                    row["product_id"].as_str().unwrap().to_string(),
                    row["country"].as_str().unwrap().to_string(),
                    row["date"].as_str().unwrap().to_string(),
                )
            })
            .collect();

        let expected = [
            ("212", "US", "2021-01-01"),
            ("212", "US", "2021-01-03"),
            ("212", "DE", "2021-01-01"),
            ("9", "GB", "2021-01-02"),
        ];
        let expected: Vec<(String, String, String)> = expected
            .iter()
            .map(|(p, c, d)| (p.to_string(), c.to_string(), d.to_string()))
            .collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_count_matches_non_empty_buckets() {
        let report = sample_report();
        let non_empty = report
            .as_object()
            .unwrap()
            .values()
            .flat_map(|countries| countries.as_object().unwrap().values())
            .flat_map(|dates| dates.as_object().unwrap().values())
            .filter(|bucket| !is_empty_bucket(bucket))
            .count();

        assert_eq!(flatten(&report).len(), non_empty);
    }

    #[test]
    fn test_key_triples_unique() {
        let rows = flatten(&sample_report());
        let triples: HashSet<String> = rows
            .iter()
            .map(|r| format!("{}|{}|{}", r["product_id"], r["country"], r["date"]))
            .collect();
        assert_eq!(triples.len(), rows.len());
    }

    #[test]
    fn test_regrouping_reconstructs_non_empty_subset() {
        let report = sample_report();
        let mut rebuilt = Map::new();
        for row in flatten(&report) {
            let mut row = row.as_object().unwrap().clone();
            let product = row.remove("product_id").unwrap();
            let country = row.remove("country").unwrap();
            let date = row.remove("date").unwrap();
            let countries = rebuilt
                .entry(product.as_str().unwrap())
                .or_insert_with(|| json!({}));
            let dates = countries
                .as_object_mut()
                .unwrap()
                .entry(country.as_str().unwrap())
                .or_insert_with(|| json!({}));
            dates
                .as_object_mut()
                .unwrap()
                .insert(date.as_str().unwrap().to_string(), Value::Object(row));
        }

        assert_eq!(
            Value::Object(rebuilt),
            json!({
                "212": {
                    "US": {
                        "2021-01-01": {"mrr": 100.5, "active_subscriptions": 10},
                        "2021-01-03": {"mrr": 101.0, "active_subscriptions": 11}
                    },
                    "DE": {"2021-01-01": {"mrr": 7.25, "churn": 0.1}}
                },
                "9": {"GB": {"2021-01-02": {"renewals": 3}}}
            })
        );
    }

    #[test]
    fn test_idempotent() {
        let report = sample_report();
        assert_eq!(flatten(&report), flatten(&report));
    }

    #[test]
    fn test_metric_values_copied_verbatim() {
        let report = json!({"5": {"JP": {"2022-02-02": {
            "gross_revenue": 12.345,
            "cancelations": 0,
            "unexpected_metric": "kept as-is"
        }}}});
        let rows = flatten(&report);
        assert_eq!(rows[0]["gross_revenue"], 12.345);
        assert_eq!(rows[0]["cancelations"], 0);
        assert_eq!(rows[0]["unexpected_metric"], "kept as-is");
    }

    #[test]
    fn test_non_object_top_level() {
        let report = json!([1, 2, 3]);
        let mut rows = flatten_report(&report);
        let err = rows.next().unwrap().unwrap_err();
        assert_eq!(err.path, "$");
        assert_eq!(err.found, "array");
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_falsy_scalar_buckets_skipped() {
        for placeholder in [json!(0), json!(0.0), json!(false), json!("")] {
            let report = json!({
                "1": {"US": {"2021-01-01": placeholder, "2021-01-02": {"mrr": 1}}}
            });
            assert_eq!(
                flatten(&report),
                vec![json!({"product_id": "1", "country": "US", "date": "2021-01-02", "mrr": 1})],
                "placeholder {} was not skipped",
                placeholder
            );
        }
    }

    #[test]
    fn test_non_object_country_level() {
        let report = json!({"1": {"US": "oops"}});
        let err = flatten_report(&report).next().unwrap().unwrap_err();
        assert_eq!(err.path, "$.1.US");
        assert_eq!(err.expected, "object of dates");
        assert_eq!(err.found, "string");
    }

    #[test]
    fn test_non_object_bucket_stops_iteration() {
        let report = json!({
            "1": {"US": {"2021-01-01": {"mrr": 1}, "2021-01-02": 42, "2021-01-03": {"mrr": 3}}}
        });
        let results: Vec<_> = flatten_report(&report).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert_eq!(err.path, "$.1.US.2021-01-02");
        assert_eq!(
            err.to_string(),
            "malformed subscriptions report at $.1.US.2021-01-02: expected object of metrics, found number"
        );
    }

    #[test]
    fn test_non_object_product_level() {
        let report = json!({"1": null});
        let err = flatten_report(&report).next().unwrap().unwrap_err();
        assert_eq!(err.path, "$.1");
        assert_eq!(err.found, "null");
    }
}
