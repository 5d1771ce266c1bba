//! Property descriptors: one row of a schema table

use serde_json::{Map, Value, json};

/// Primitive semantic type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Integer,
    Number,
    String,
    /// Calendar date, `YYYY-MM-DD` with an optional time suffix
    Date,
    /// RFC 3339 timestamp
    DateTime,
}

impl PropertyType {
    /// JSON Schema `type` keyword for this property type
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String | Self::Date | Self::DateTime => "string",
        }
    }

    /// JSON Schema `format` keyword, if any
    pub fn format(&self) -> Option<&'static str> {
        match self {
            Self::Date => Some("date"),
            Self::DateTime => Some("date-time"),
            _ => None,
        }
    }

    /// Check whether a non-null JSON value is an instance of this type
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::String => value.is_string(),
            Self::Date => value.as_str().is_some_and(is_date),
            Self::DateTime => value.as_str().is_some_and(is_date_time),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.format() {
            Some(format) => write!(f, "{}", format),
            None => write!(f, "{}", self.json_type()),
        }
    }
}

/// Field descriptor: name, semantic type and nullability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub kind: PropertyType,
    /// Whether `null` is an accepted value
    pub nullable: bool,
    /// Whether the field must be present (and non-null) in every record
    pub required: bool,
    /// Default value rendered into the JSON Schema (config tables only)
    pub default: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl Property {
    /// An optional, nullable field
    pub const fn optional(name: &'static str, kind: PropertyType) -> Self {
        Self {
            name,
            kind,
            nullable: true,
            required: false,
            default: None,
            description: None,
        }
    }

    /// A field that must be present and non-null
    pub const fn required(name: &'static str, kind: PropertyType) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            required: true,
            default: None,
            description: None,
        }
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Render the JSON Schema fragment for this property
    pub fn to_json_schema(&self) -> Value {
        let mut schema = Map::new();
        let json_type = self.kind.json_type();
        if self.nullable {
            schema.insert("type".to_string(), json!([json_type, "null"]));
        } else {
            schema.insert("type".to_string(), json!(json_type));
        }
        if let Some(format) = self.kind.format() {
            schema.insert("format".to_string(), json!(format));
        }
        if let Some(default) = self.default {
            schema.insert("default".to_string(), json!(default));
        }
        if let Some(description) = self.description {
            schema.insert("description".to_string(), json!(description));
        }
        Value::Object(schema)
    }
}

fn is_date(s: &str) -> bool {
    // Accept a bare date or a date carrying a time component
    let date = s.get(..10).unwrap_or(s);
    let rest = s.get(10..).unwrap_or("");
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
        && (rest.is_empty() || rest.starts_with('T') || rest.starts_with(' '))
}

fn is_date_time(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_accepts() {
        assert!(PropertyType::Integer.accepts(&json!(42)));
        assert!(PropertyType::Integer.accepts(&json!(-1)));
        assert!(!PropertyType::Integer.accepts(&json!(4.5)));
        assert!(!PropertyType::Integer.accepts(&json!("42")));
    }

    #[test]
    fn test_number_accepts_integers_and_floats() {
        assert!(PropertyType::Number.accepts(&json!(42)));
        assert!(PropertyType::Number.accepts(&json!(0.25)));
        assert!(!PropertyType::Number.accepts(&json!("0.25")));
    }

    #[test]
    fn test_date_accepts() {
        assert!(PropertyType::Date.accepts(&json!("2021-01-01")));
        assert!(PropertyType::Date.accepts(&json!("2012-03-22T00:00:00")));
        assert!(!PropertyType::Date.accepts(&json!("2021-13-01")));
        assert!(!PropertyType::Date.accepts(&json!("yesterday")));
        assert!(!PropertyType::Date.accepts(&json!("2021-01-01garbage")));
        assert!(!PropertyType::Date.accepts(&json!(20210101)));
    }

    #[test]
    fn test_date_time_accepts() {
        assert!(PropertyType::DateTime.accepts(&json!("2016-01-01T00:00:00Z")));
        assert!(PropertyType::DateTime.accepts(&json!("2016-01-01T00:00:00+02:00")));
        assert!(PropertyType::DateTime.accepts(&json!("2016-01-01T00:00:00")));
        assert!(!PropertyType::DateTime.accepts(&json!("2016-01-01")));
    }

    #[test]
    fn test_nullable_json_schema() {
        let prop = Property::optional("release_date", PropertyType::Date);
        assert_eq!(
            prop.to_json_schema(),
            json!({"type": ["string", "null"], "format": "date"})
        );
    }

    #[test]
    fn test_required_json_schema() {
        let prop = Property::required("pat", PropertyType::String)
            .with_description("The token to authenticate against the API service");
        assert_eq!(
            prop.to_json_schema(),
            json!({
                "type": "string",
                "description": "The token to authenticate against the API service"
            })
        );
    }
}
