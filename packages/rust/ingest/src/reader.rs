//! Delimited-file reading and per-column type inference.

use std::path::Path;

use vendormetrics_shared::{Column, ColumnType, DataTable, Result, Value, VendorMetricsError};

/// Read a delimited file into a [`DataTable`].
///
/// The first record supplies column names. Field counts are strictly
/// enforced, so a record with the wrong arity fails the whole file.
/// Column types are inferred from the data: INTEGER if every non-empty
/// cell parses as an integer, REAL if every non-empty cell parses as a
/// number, TEXT otherwise. Empty cells load as NULL.
pub fn read_delimited(path: &Path) -> Result<DataTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| VendorMetricsError::ingest(path, e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| VendorMetricsError::ingest(path, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(VendorMetricsError::ingest(path, "file has no header row"));
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| VendorMetricsError::ingest(path, e.to_string()))?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    let types: Vec<ColumnType> = (0..headers.len())
        .map(|idx| infer_column_type(raw_rows.iter().map(|row| row[idx].as_str())))
        .collect();

    let columns = headers
        .into_iter()
        .zip(types.iter())
        .map(|(name, ty)| Column::new(name, *ty))
        .collect();

    let mut table = DataTable::new(columns);
    for raw in raw_rows {
        let row = raw
            .into_iter()
            .zip(types.iter())
            .map(|(cell, ty)| convert_cell(&cell, *ty))
            .collect();
        table.push_row(row);
    }

    Ok(table)
}

/// Infer the narrowest column type that fits every non-empty cell.
fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut ty = ColumnType::Integer;
    for cell in cells {
        if cell.is_empty() {
            continue;
        }
        if ty == ColumnType::Integer && cell.parse::<i64>().is_err() {
            ty = ColumnType::Real;
        }
        if ty == ColumnType::Real && cell.parse::<f64>().is_err() {
            return ColumnType::Text;
        }
    }
    ty
}

fn convert_cell(cell: &str, ty: ColumnType) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match ty {
        // Parses cannot fail here: inference already proved every
        // non-empty cell fits the column type.
        ColumnType::Integer => Value::Integer(cell.parse().unwrap_or_default()),
        ColumnType::Real => Value::Real(cell.parse().unwrap_or_default()),
        ColumnType::Text => Value::Text(cell.to_string()),
    }
}
