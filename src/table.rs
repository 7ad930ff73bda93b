//! Tabular projection of API responses
//!
//! [`Table`] flattens a list of JSON objects into rows and columns for
//! analysis or export. Columns are the union of all keys, ordered by first
//! appearance across rows; a row without a given key holds `None` in that
//! column, so no row is ever dropped for being incomplete. Scalars are kept
//! as-is, nested objects and arrays are kept as JSON values.
//!
//! # Example
//!
//! ```
//! use mainstay_sdk::Table;
//! use serde_json::json;
//!
//! let table = Table::from_value(&json!([{"a": 1, "b": 2}, {"a": 3}]), "results").unwrap();
//! assert_eq!(table.columns(), ["a", "b"]);
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.get(1, "b"), None);
//! ```

use crate::errors::{Error, Result};
use crate::models::Record;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Rows and columns derived from a list of JSON objects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<Value>>>,
}

impl Table {
    /// Build a table from records
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
        I::IntoIter: Clone,
    {
        let records = records.into_iter();

        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for record in records.clone() {
            for key in record.keys() {
                if !index.contains_key(key) {
                    let _ = index.insert(key.clone(), columns.len());
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .map(|record| {
                let mut row = vec![None; columns.len()];
                for (key, value) in record {
                    row[index[key]] = Some(value.clone());
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Build a table from a raw response
    ///
    /// * an object holding an array under `key` uses that array
    /// * an object without `key` yields an empty table
    /// * a bare array is used directly
    ///
    /// # Errors
    ///
    /// `Error::Deserialize` if the selected value is not an array of objects.
    pub fn from_value(value: &Value, key: &str) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(map) => match map.get(key) {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(Error::Deserialize(format!(
                        "expected '{}' to be an array, got {}",
                        key,
                        type_name(other)
                    )))
                }
                None => {
                    debug!(key, "Response has no such key, returning empty table");
                    return Ok(Self::default());
                }
            },
            other => {
                return Err(Error::Deserialize(format!(
                    "expected an object or array, got {}",
                    type_name(other)
                )))
            }
        };

        let records = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_object().ok_or_else(|| {
                    Error::Deserialize(format!(
                        "row {} is {}, expected an object",
                        i,
                        type_name(item)
                    ))
                })
            })
            .collect::<Result<Vec<&Record>>>()?;

        Ok(Self::from_records(records.iter().copied()))
    }

    /// Column names in first-seen order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows; each has one cell per column, `None` where the key was absent
    pub fn rows(&self) -> &[Vec<Option<Value>>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` in the named column; `None` if absent or out of range
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)?.as_ref()
    }

    /// Write as CSV with a header row
    ///
    /// Missing cells and JSON `null` are written as empty fields, strings
    /// unquoted, and nested values as compact JSON.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        // No columns means nothing to write, not even a header
        if self.columns.is_empty() {
            return Ok(());
        }
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| cell_text(cell.as_ref())))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Save as a CSV file, replacing any existing file
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Export(format!("{}: {}", path.display(), e)))?;
        self.write_csv(file)?;
        debug!(path = %path.display(), rows = self.len(), "Saved table");
        Ok(())
    }
}

fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
