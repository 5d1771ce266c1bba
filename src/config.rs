//! Tap configuration
//!
//! Settings come from an optional config file (JSON, or YAML when the file
//! ends in `.yml`/`.yaml`) overlaid with `TAP_APPFIGURES_*` environment
//! variables. Example:
//!
//! ```json
//! {
//!   "pat": "xxxxxxxx",
//!   "start_date": "2021-01-01T00:00:00Z",
//!   "end_date": "2021-02-01T00:00:00Z"
//! }
//! ```

use crate::client::{Auth, DEFAULT_API_URL};
use crate::schema::CONFIG_SCHEMA;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Prefix of environment variables that override config file settings
pub const ENV_PREFIX: &str = "TAP_APPFIGURES_";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting 'pat' (personal access token)")]
    MissingToken,

    #[error("end_date {end} is before start_date {start}")]
    InvalidDateRange {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Validated tap settings
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Personal access token used as a bearer token
    #[serde(default)]
    pub pat: String,

    /// Earliest report date to sync; the offset is kept as configured
    #[serde(default = "default_start_date")]
    pub start_date: DateTime<FixedOffset>,

    /// Latest report date to sync; the API's default applies when unset
    #[serde(default)]
    pub end_date: Option<DateTime<FixedOffset>>,

    /// Base URL of the Appfigures API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_start_date() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
        .fixed_offset()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl TapConfig {
    /// Load settings from an optional file, then apply environment overrides.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// merged settings fail validation (e.g. no token).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => read_settings_file(path)?,
            None => Map::new(),
        };

        let overrides = env_overrides();
        if !overrides.is_empty() {
            log::debug!(
                "Applying environment overrides: {}",
                overrides.keys().cloned().collect::<Vec<_>>().join(", ")
            );
        }
        settings.extend(overrides);

        Ok(Self::from_value(Value::Object(settings))?)
    }

    /// Build and validate settings from a JSON value
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the value has the wrong shape or fails validation
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_value(value).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings before any request is issued
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pat.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if let Some(end) = self.end_date
            && end < self.start_date
        {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end,
            });
        }
        Url::parse(&self.api_url)
            .map_err(|e| ConfigError::Invalid(format!("api_url '{}': {}", self.api_url, e)))?;
        Ok(())
    }

    /// Parsed API base URL
    pub fn api_url(&self) -> Result<Url> {
        Url::parse(&self.api_url).with_context(|| format!("Invalid api_url: {}", self.api_url))
    }

    /// Authentication derived from the token
    pub fn auth(&self) -> Auth {
        Auth::from_token(Some(self.pat.clone()))
    }

    /// User-Agent header value
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("tap-appfigures/{}", env!("CARGO_PKG_VERSION")))
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("pat", &"<redacted>")
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("api_url", &self.api_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn read_settings_file(path: &Path) -> Result<Map<String, Value>> {
    log::debug!("Reading config from {}", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml" | "yaml")
    );
    let value: Value = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
    };

    match value {
        Value::Object(settings) => Ok(settings),
        Value::Null => Ok(Map::new()),
        _ => eyre::bail!("Config file {} must contain an object", path.display()),
    }
}

/// `TAP_APPFIGURES_<SETTING>` variables for every declared setting
fn env_overrides() -> Map<String, Value> {
    CONFIG_SCHEMA
        .properties()
        .iter()
        .filter_map(|property| {
            let var = format!("{}{}", ENV_PREFIX, property.name.to_uppercase());
            std::env::var(&var)
                .ok()
                .map(|value| (property.name.to_string(), Value::String(value)))
        })
        .collect()
}
