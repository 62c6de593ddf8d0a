//! Delimited text decoding (`.csv` and tab-delimited `.txt`).

use std::path::Path;

use crate::error::DecodeError;
use crate::types::{Table, Value};

/// Delimiter used by the CSV reader.
pub const CSV_DELIMITER: u8 = b',';
/// Delimiter used by the TXT reader.
pub const TXT_DELIMITER: u8 = b'\t';

/// Read a delimited text file into a [`Table`].
///
/// Rules:
///
/// - The first record is the header row and names the columns, exactly as written.
/// - A row shorter than the header is padded with [`Value::Null`].
/// - A row longer than the header is a [`DecodeError::Shape`] error.
/// - Cell values are inferred (see [`infer_value`]).
pub fn read_delimited_from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Table, DecodeError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)?;
    read_delimited_from_reader(&mut rdr)
}

/// Read delimited data from an existing CSV reader.
///
/// Short rows are only padded when `rdr` was built with `flexible(true)`; otherwise the csv
/// reader rejects them itself.
pub fn read_delimited_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> Result<Table, DecodeError> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(DecodeError::shape("no columns to parse (missing header row)"));
    }
    let columns: Vec<String> = headers.iter().map(str::to_owned).collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > columns.len() {
            return Err(DecodeError::shape(format!(
                "row {} has {} fields, header has {}",
                idx0 + 1,
                record.len(),
                columns.len()
            )));
        }
        let mut row: Vec<Value> = record.iter().map(infer_value).collect();
        row.resize(columns.len(), Value::Null);
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

/// Infer a typed [`Value`] from a raw text cell.
///
/// Empty (or whitespace-only) cells are `Null`; otherwise integers, floats and
/// `true`/`false` are recognized before falling back to a string.
pub fn infer_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Value::Int64(v);
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return Value::Float64(v);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Utf8(trimmed.to_owned()),
    }
}
