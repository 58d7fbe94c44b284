//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, DataType}};

/// Reads a reference table from `path`. Every column is read as text so codes keep
/// their leading zeros; numeric columns are cast on extraction.
pub(crate) fn read_table(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Reads a reference table from CSV text.
pub(crate) fn read_table_str(csv: &str) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(csv.as_bytes()))
        .finish()
        .context("[io::csv::read] Failed to read CSV from string")
}

/// Extract a column as trimmed text; blanks are `None`.
pub(crate) fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let col = df.column(name)
        .with_context(|| format!("[io::csv::read] Missing column '{name}'"))?
        .cast(&DataType::String)?;
    Ok(col.str()?
        .into_iter()
        .map(|opt| opt.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect())
}

/// Extract a column as floats; unparsable cells are `None`.
pub(crate) fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = df.column(name)
        .with_context(|| format!("[io::csv::read] Missing column '{name}'"))?
        .cast(&DataType::Float64)?;
    Ok(col.f64()?.into_iter().collect())
}
