//! Parquet decoding.

use std::fs::File;
use std::path::Path;

use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::DecodeError;
use crate::types::{Table, Value};

/// Read a Parquet file into a [`Table`].
///
/// Notes:
/// - Columns are the top-level schema fields, in schema order
/// - Uses the Parquet record API (`RowIter`), so every row is materialised and counted
pub fn read_parquet_from_path(path: impl AsRef<Path>) -> Result<Table, DecodeError> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;
    read_parquet_from_reader(reader)
}

fn read_parquet_from_reader(reader: SerializedFileReader<File>) -> Result<Table, DecodeError> {
    let columns: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row_res in reader.into_iter() {
        let row = row_res?;
        rows.push(row.get_column_iter().map(|(_, f)| convert_parquet_field(f)).collect());
    }

    Ok(Table::new(columns, rows))
}

fn convert_parquet_field(f: &Field) -> Value {
    match f {
        Field::Null => Value::Null,
        Field::Bool(b) => Value::Bool(*b),
        Field::Byte(v) => Value::Int64(i64::from(*v)),
        Field::Short(v) => Value::Int64(i64::from(*v)),
        Field::Int(v) => Value::Int64(i64::from(*v)),
        Field::Long(v) => Value::Int64(*v),
        Field::UByte(v) => Value::Int64(i64::from(*v)),
        Field::UShort(v) => Value::Int64(i64::from(*v)),
        Field::UInt(v) => Value::Int64(i64::from(*v)),
        Field::ULong(v) => i64::try_from(*v)
            .map(Value::Int64)
            .unwrap_or_else(|_| Value::Utf8(v.to_string())),
        Field::Float(v) => Value::Float64(f64::from(*v)),
        Field::Double(v) => Value::Float64(*v),
        Field::Str(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}
