//! Record conformer
//!
//! Shapes raw API records to the declared stream schema before they are
//! emitted: undeclared fields are dropped, numeric strings are coerced to
//! the declared numeric type, and the result is validated.

use crate::etl::Transformer;
use crate::schema::{PropertyType, Schema};
use eyre::{Result, eyre};
use serde_json::{Number, Value};
use std::collections::HashSet;
use std::sync::Mutex;

/// Transformer that conforms records to a [`Schema`]
///
/// # Example
/// ```
/// use tap_appfigures::etl::Transformer;
/// use tap_appfigures::schema::SUBSCRIPTIONS_SCHEMA;
/// use tap_appfigures::transform::RecordConformer;
/// use serde_json::json;
///
/// let conformer = RecordConformer::new("subscriptions", SUBSCRIPTIONS_SCHEMA);
/// let row = json!({"product_id": "1", "country": "US", "date": "2021-01-01", "mrr": 100});
///
/// let conformed = conformer.transform(row).unwrap();
/// assert_eq!(conformed["product_id"], 1);
/// ```
pub struct RecordConformer {
    stream: &'static str,
    schema: Schema,
    dropped: Mutex<HashSet<String>>,
}

impl RecordConformer {
    pub fn new(stream: &'static str, schema: Schema) -> Self {
        Self {
            stream,
            schema,
            dropped: Mutex::new(HashSet::new()),
        }
    }

    /// Warn the first time a given undeclared field is dropped
    fn note_dropped(&self, field: &str) {
        let Ok(mut dropped) = self.dropped.lock() else {
            return;
        };
        if dropped.insert(field.to_string()) {
            log::warn!(
                "Dropping field '{}' from {} records: not declared in schema",
                field,
                self.stream
            );
        }
    }
}

impl Transformer for RecordConformer {
    type Input = Value;
    type Output = Value;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        let fields = match input {
            Value::Object(fields) => fields,
            other => eyre::bail!("{} record is not a JSON object: {}", self.stream, other),
        };

        let mut record = serde_json::Map::with_capacity(fields.len());
        for (name, value) in fields {
            match self.schema.property(&name) {
                Some(property) => {
                    record.insert(name, coerce(property.kind, value));
                }
                None => self.note_dropped(&name),
            }
        }

        let record = Value::Object(record);
        self.schema
            .validate(&record)
            .map_err(|e| eyre!("Invalid {} record: {}", self.stream, e))?;

        log::trace!("Conformed {} record: {}", self.stream, record);
        Ok(record)
    }
}

/// Coerce values that carry a number in a different representation
///
/// Anything that does not convert cleanly is returned unchanged so that
/// validation reports it.
fn coerce(kind: PropertyType, value: Value) -> Value {
    match (kind, value) {
        (PropertyType::Integer, Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(n) => Value::Number(n.into()),
            Err(_) => Value::String(s),
        },
        (PropertyType::Integer, Value::Number(n)) if !n.is_i64() && !n.is_u64() => {
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    Value::Number((f as i64).into())
                }
                _ => Value::Number(n),
            }
        }
        (PropertyType::Number, Value::String(s)) => {
            match s.trim().parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => Value::Number(n),
                None => Value::String(s),
            }
        }
        (_, value) => value,
    }
}
