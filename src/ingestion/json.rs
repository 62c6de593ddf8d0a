//! Record-oriented JSON decoding.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object (one row): `{"a":1}`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Columns are the union of object keys in first-seen order. A row missing a key gets
//! [`Value::Null`] in that column.

use std::fs;
use std::path::Path;

use serde_json::Map;

use crate::error::DecodeError;
use crate::types::{Table, Value};

/// Read a JSON file into a [`Table`].
pub fn read_json_from_path(path: impl AsRef<Path>) -> Result<Table, DecodeError> {
    let text = fs::read_to_string(path)?;
    read_json_from_str(&text)
}

/// Read JSON from an in-memory string into a [`Table`].
pub fn read_json_from_str(input: &str) -> Result<Table, DecodeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::shape("json input is empty"));
    }

    // First try parsing as a single JSON value (array or object).
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => records_to_table(&items),
        Ok(v @ serde_json::Value::Object(_)) => records_to_table(std::slice::from_ref(&v)),
        Ok(_) => Err(DecodeError::shape(
            "json must be an object, an array of objects, or NDJSON",
        )),
        Err(first_err) => {
            // Only multi-line input can be NDJSON; otherwise report the original error.
            if !trimmed.contains('\n') {
                return Err(first_err.into());
            }
            let mut values = Vec::new();
            for line in trimmed.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                values.push(serde_json::from_str::<serde_json::Value>(line)?);
            }
            records_to_table(&values)
        }
    }
}

fn records_to_table(values: &[serde_json::Value]) -> Result<Table, DecodeError> {
    let mut records: Vec<&Map<String, serde_json::Value>> = Vec::with_capacity(values.len());
    let mut columns: Vec<String> = Vec::new();

    for (idx0, v) in values.iter().enumerate() {
        let obj = v
            .as_object()
            .ok_or_else(|| DecodeError::shape(format!("row {} is not a json object", idx0 + 1)))?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
        records.push(obj);
    }

    let rows = records
        .into_iter()
        .map(|obj| {
            columns
                .iter()
                .map(|c| obj.get(c).map(convert_json_value).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int64(i)
            } else {
                n.as_f64().map(Value::Float64).unwrap_or_else(|| Value::Utf8(n.to_string()))
            }
        }
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        // Nested structures are kept as their JSON text.
        other => Value::Utf8(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::read_json_from_str;
    use crate::types::Value;

    #[test]
    fn columns_keep_first_seen_key_order() {
        let t = read_json_from_str(r#"[{"b":1,"a":2},{"c":3,"a":4}]"#).unwrap();
        assert_eq!(t.columns, vec!["b", "a", "c"]);
        assert_eq!(t.rows[0], vec![Value::Int64(1), Value::Int64(2), Value::Null]);
        assert_eq!(t.rows[1], vec![Value::Null, Value::Int64(4), Value::Int64(3)]);
    }

    #[test]
    fn single_object_is_one_row() {
        let t = read_json_from_str(r#"{"id":1,"name":"Ada"}"#).unwrap();
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.rows[0][1], Value::Utf8("Ada".to_string()));
    }

    #[test]
    fn nested_values_are_kept_as_json_text() {
        let t = read_json_from_str(r#"[{"id":1,"user":{"name":"Ada"}}]"#).unwrap();
        assert_eq!(t.rows[0][1], Value::Utf8(r#"{"name":"Ada"}"#.to_string()));
    }

    #[test]
    fn empty_array_is_an_empty_table() {
        let t = read_json_from_str("[]").unwrap();
        assert!(t.columns.is_empty());
        assert_eq!(t.row_count(), 0);
    }

    #[test]
    fn scalar_rows_are_rejected() {
        let err = read_json_from_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("row 1 is not a json object"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(read_json_from_str("not json at all").is_err());
        assert!(read_json_from_str("   ").is_err());
    }
}
