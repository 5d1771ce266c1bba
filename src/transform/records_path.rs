//! Record extraction from decoded response documents
//!
//! Streams declare where their records live with a small JSONPath
//! expression. Only the two forms the Appfigures endpoints need are
//! supported.

use eyre::Result;
use serde_json::Value;

/// Location of the records inside a response document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordsPath {
    /// `$.*` - every member value of the top-level object (or element of a top-level array)
    Members,
    /// `$[*]` - every element of the top-level array
    Elements,
}

impl RecordsPath {
    /// Parse a JSONPath expression
    ///
    /// # Errors
    /// Returns an error for any expression other than `$.*` or `$[*]`
    pub fn parse(expression: &str) -> Result<Self> {
        match expression.trim() {
            "$.*" => Ok(Self::Members),
            "$[*]" => Ok(Self::Elements),
            other => eyre::bail!("Unsupported records path expression: {}", other),
        }
    }

    /// The JSONPath expression for this path
    pub fn expression(&self) -> &'static str {
        match self {
            Self::Members => "$.*",
            Self::Elements => "$[*]",
        }
    }

    /// Pull the records out of a document
    ///
    /// Documents that do not contain anything at the path yield no records.
    pub fn extract(&self, document: Value) -> Vec<Value> {
        match (self, document) {
            (Self::Members, Value::Object(members)) => members.into_iter().map(|(_, v)| v).collect(),
            (_, Value::Array(elements)) => elements,
            (path, other) => {
                log::debug!(
                    "No records at {} in {} document",
                    path.expression(),
                    if other.is_object() { "object" } else { "scalar" }
                );
                Vec::new()
            }
        }
    }
}

impl std::str::FromStr for RecordsPath {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RecordsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression())
    }
}
