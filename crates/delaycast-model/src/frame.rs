//! Named-column tables fed to a model

use delaycast_core::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }
}

/// A rectangular table with named columns
#[derive(Debug, Clone, Default)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Create an empty frame with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a single-row frame from any record that serializes to a flat object
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self> {
        let value = serde_json::to_value(record)
            .map_err(|e| Error::validation(format!("cannot tabulate input: {}", e)))?;

        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::validation(format!(
                    "expected an object with named fields, got {}",
                    json_type(&other)
                )))
            }
        };

        let mut columns = Vec::with_capacity(object.len());
        let mut row = Vec::with_capacity(object.len());
        for (column, value) in object {
            let cell = match value {
                Value::Number(n) => Cell::Number(n.as_f64().ok_or_else(|| {
                    Error::validation(format!("column '{}' is not representable as f64", column))
                })?),
                Value::String(s) => Cell::Text(s),
                Value::Bool(b) => Cell::Number(if b { 1.0 } else { 0.0 }),
                other => {
                    return Err(Error::validation(format!(
                        "column '{}' has unsupported {} value",
                        column,
                        json_type(&other)
                    )))
                }
            };
            columns.push(column);
            row.push(cell);
        }

        let mut frame = Self::new(columns);
        frame.push_row(row)?;
        Ok(frame)
    }

    /// Append a row; its width must match the column count
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::validation(format!(
                "row has {} cells but frame has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn json_type(value: &Value) -> &'static str {
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

    #[test]
    fn record_becomes_single_row() {
        let frame = Frame::from_record(&json!({"carrier": "UA", "distance": 1068})).unwrap();
        assert_eq!(frame.len(), 1);

        let row = frame.rows().next().unwrap();
        let carrier = frame.column_index("carrier").unwrap();
        let distance = frame.column_index("distance").unwrap();
        assert_eq!(row[carrier], Cell::Text("UA".into()));
        assert_eq!(row[distance], Cell::Number(1068.0));
    }

    #[test]
    fn non_objects_are_rejected() {
        let err = Frame::from_record(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("array"));
        assert!(Frame::from_record(&json!({"nested": {"a": 1}})).is_err());
        assert!(Frame::from_record(&json!({"missing": null})).is_err());
    }

    #[test]
    fn row_width_is_checked() {
        let mut frame = Frame::new(vec!["a".into(), "b".into()]);
        assert!(frame.push_row(vec![Cell::Number(1.0)]).is_err());
        assert!(frame.push_row(vec![Cell::Number(1.0), Cell::Text("x".into())]).is_ok());
        assert_eq!(frame.len(), 1);
    }
}
