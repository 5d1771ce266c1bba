//! Query parameters for the subscriptions report
//!
//! The whole configured date range is requested in one call, grouped by
//! product, date and country at daily granularity.

use crate::config::TapConfig;
use chrono::NaiveDate;

/// Dimensions the report is grouped by, outermost first
pub const GROUP_BY: &str = "product,date,country";
pub const GRANULARITY: &str = "daily";
/// Date format the reports API expects
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionParams {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl SubscriptionParams {
    pub fn new(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Report dates are the calendar dates of the configured timestamps, in their own offset
    pub fn from_config(config: &TapConfig) -> Self {
        Self::new(
            config.start_date.date_naive(),
            config.end_date.map(|end| end.date_naive()),
        )
    }

    /// Render as query pairs; `endDate` is omitted when not configured
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![(
            "startDate",
            self.start_date.format(REPORT_DATE_FORMAT).to_string(),
        )];
        if let Some(end) = self.end_date {
            query.push(("endDate", end.format(REPORT_DATE_FORMAT).to_string()));
        }
        query.push(("group_by", GROUP_BY.to_string()));
        query.push(("granularity", GRANULARITY.to_string()));
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_with_end_date() {
        let config = TapConfig::from_value(json!({
            "pat": "abc",
            "start_date": "2021-01-01T00:00:00Z",
            "end_date": "2021-01-31T12:30:00Z"
        }))
        .unwrap();

        let query = SubscriptionParams::from_config(&config).to_query();
        assert_eq!(
            query,
            vec![
                ("startDate", "2021-01-01".to_string()),
                ("endDate", "2021-01-31".to_string()),
                ("group_by", "product,date,country".to_string()),
                ("granularity", "daily".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_keeps_configured_offset() {
        let config = TapConfig::from_value(json!({
            "pat": "abc",
            "start_date": "2021-01-01T00:00:00+05:00",
            "end_date": "2021-01-31T23:00:00-08:00"
        }))
        .unwrap();

        let params = SubscriptionParams::from_config(&config);
        assert_eq!(params.start_date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(params.end_date, NaiveDate::from_ymd_opt(2021, 1, 31));
    }

    #[test]
    fn test_query_without_end_date() {
        let config = TapConfig::from_value(json!({"pat": "abc"})).unwrap();
        let query = SubscriptionParams::from_config(&config).to_query();

        assert_eq!(query[0], ("startDate", "2016-01-01".to_string()));
        assert!(query.iter().all(|(key, _)| *key != "endDate"));
        assert_eq!(query.len(), 3);
    }
}
