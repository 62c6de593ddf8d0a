#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::DecodeError;
use crate::types::{Table, Value};

/// Read the first sheet of an Excel document (`.xlsx`, `.xls`, ...) into a [`Table`].
///
/// Behavior:
/// - Uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Every following row (up to the last used row) is a data row
pub fn read_excel_from_path(path: impl AsRef<Path>) -> Result<Table, DecodeError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DecodeError::shape("workbook has no sheets"))?;
    let range = workbook.worksheet_range(&sheet)?;

    read_sheet_range(&sheet, &range)
}

fn read_sheet_range(sheet: &str, range: &calamine::Range<Data>) -> Result<Table, DecodeError> {
    let (header_row_idx, columns) = find_header(range).ok_or_else(|| {
        DecodeError::shape(format!(
            "sheet '{sheet}' has no non-empty rows (no header row found)"
        ))
    })?;

    let rows = range
        .rows()
        .skip(header_row_idx + 1)
        .map(|row| {
            (0..columns.len())
                .map(|idx| convert_cell(row.get(idx).unwrap_or(&Data::Empty)))
                .collect()
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn find_header(range: &calamine::Range<Data>) -> Option<(usize, Vec<String>)> {
    range.rows().enumerate().find_map(|(idx0, row)| {
        let non_empty = row.iter().any(|c| !matches!(c, Data::Empty));
        non_empty.then(|| (idx0, row.iter().map(cell_to_header_string).collect()))
    })
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}
