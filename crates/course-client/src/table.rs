//! Tabular projection of the backend's `{"data": [...]}` envelope.
//!
//! A [`Table`] is an ordered list of [`Record`]s whose column set is the
//! union of all record keys in first-seen order. Field reads go through
//! typed accessors that report a missing or mistyped field as an error
//! instead of panicking.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// Exclusive bound of the `i64` range as a float (2^63).
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Wire envelope returned by every tabular endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    /// Row objects; absent or `null` means no rows.
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

/// One row of a table: field name to scalar value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Returns the raw value of a field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Iterates field names in wire order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn require(&self, field: &str) -> Result<&Value> {
        match self.0.get(field) {
            None | Some(Value::Null) => Err(ClientError::missing_field(field)),
            Some(value) => Ok(value),
        }
    }

    /// Reads an integer field. Numeric strings and whole floats in range are accepted.
    #[allow(clippy::cast_possible_truncation)]
    pub fn get_i64(&self, field: &str) -> Result<i64> {
        match self.require(field)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(f))
                        .map(|f| f as i64)
                })
                .ok_or_else(|| ClientError::field_type(field, "integer")),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| ClientError::field_type(field, "integer")),
            _ => Err(ClientError::field_type(field, "integer")),
        }
    }

    /// Reads a text field.
    pub fn get_str(&self, field: &str) -> Result<&str> {
        match self.require(field)? {
            Value::String(s) => Ok(s),
            _ => Err(ClientError::field_type(field, "string")),
        }
    }

    /// Reads a boolean field. Integer `1`/`0` (SQL bit columns) are accepted.
    pub fn get_bool(&self, field: &str) -> Result<bool> {
        match self.require(field)? {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Ok(true),
                Some(0) => Ok(false),
                _ => Err(ClientError::field_type(field, "boolean")),
            },
            _ => Err(ClientError::field_type(field, "boolean")),
        }
    }

    /// Returns a field formatted for display, or an empty string when absent.
    #[must_use]
    pub fn get_display(&self, field: &str) -> String {
        self.0.get(field).map(display_value).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Formats a cell value the way tables show it.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
    }
}

/// Ordered rows with a column superset inferred from their keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// Builds a table from records, collecting columns in first-seen order.
    #[must_use]
    pub fn from_records(rows: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.to_string());
                }
            }
        }
        Self { columns, rows }
    }

    /// Builds a table from the JSON values of an envelope's `data` array.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Decode` if any element is not a JSON object.
    pub fn from_values(endpoint: &str, values: Vec<Value>) -> Result<Self> {
        let rows = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(map) => Ok(Record(map)),
                other => Err(ClientError::decode(
                    endpoint,
                    format!("row {index} is not an object: {other}"),
                )),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_records(rows))
    }

    /// Decodes an envelope body into a table.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Decode` if the body is not a JSON object with
    /// an optional `data` array of objects.
    pub fn from_envelope_str(endpoint: &str, body: &str) -> Result<Self> {
        // Deserializing the struct directly would also accept a top-level array.
        let object: Map<String, Value> = serde_json::from_str(body)
            .map_err(|e| ClientError::decode(endpoint, e.to_string()))?;
        let envelope: Envelope = serde_json::from_value(Value::Object(object))
            .map_err(|e| ClientError::decode(endpoint, e.to_string()))?;
        Self::from_values(endpoint, envelope.data.unwrap_or_default())
    }

    /// Column names in first-seen order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in wire order.
    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// The first row, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Record> {
        self.rows.first()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
