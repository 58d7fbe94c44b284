//! Tab-separated writing operations.

use std::{fs::OpenOptions, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom, QuoteStyle}, series::Series};

use crate::{common::ensure_parent_exists, error::ParcelError, types::ValuedRow};

/// Append a DataFrame to `path` as headerless tab-separated records.
/// The file is created if needed and never truncated. Fields are never quoted,
/// so empty codes stay empty.
pub(crate) fn append_tsv(df: &mut DataFrame, path: &Path) -> Result<()> {
    ensure_parent_exists(path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("[io::csv::write] Failed to open {} for append", path.display()))?;
    CsvWriter::new(file)
        .include_header(false)
        .with_separator(b'\t')
        .with_quote_style(QuoteStyle::Never)
        .finish(df)
        .with_context(|| format!("[io::csv::write] Failed to append records to {:?}", path))
}

/// Lay valued rows out in card column order.
pub(crate) fn cards_frame(rows: &[ValuedRow]) -> Result<DataFrame> {
    let text = |f: fn(&ValuedRow) -> &str| rows.iter().map(f).collect::<Vec<_>>();
    let float = |f: fn(&ValuedRow) -> Option<f64>| rows.iter().map(f).collect::<Vec<_>>();

    let df = DataFrame::new(vec![
        Series::new("pin".into(), text(|r| r.key().pin.id())).into(),
        Series::new("soil_type".into(), text(|r| &r.key().soil_type)).into(),
        Series::new("slope".into(), text(|r| &r.key().slope)).into(),
        Series::new("landuse_type".into(), text(|r| &r.key().landuse_type)).into(),
        Series::new("part_acres".into(), rows.iter().map(ValuedRow::part_acres).collect::<Vec<_>>()).into(),
        Series::new("productivity_index".into(), float(|r| r.productivity_index)).into(),
        Series::new("favorability".into(), rows.iter().map(|r| r.favorability.map(|f| f.as_str())).collect::<Vec<_>>()).into(),
        Series::new("adj_PI".into(), float(|r| r.adjusted_pi)).into(),
        Series::new("eav".into(), float(|r| r.eav)).into(),
        Series::new("eav_adj".into(), float(|r| r.eav_adj)).into(),
        Series::new("value".into(), float(|r| r.value)).into(),
    ])?;
    Ok(df)
}

/// One error-table record: pin, kind, gross acres, allocated acres, message.
/// Acreages are null for kinds that never computed them.
pub(crate) fn error_frame(err: &ParcelError) -> Result<DataFrame> {
    let (gross, allocated) = match err {
        ParcelError::AcreageMismatch { gross_acres, allocated_acres, .. } => (Some(*gross_acres), Some(*allocated_acres)),
        _ => (None, None),
    };
    let df = DataFrame::new(vec![
        Series::new("pin".into(), [err.pin().id()]).into(),
        Series::new("kind".into(), [err.kind()]).into(),
        Series::new("gross_acres".into(), [gross]).into(),
        Series::new("allocated_acres".into(), [allocated]).into(),
        Series::new("message".into(), [err.to_string()]).into(),
    ])?;
    Ok(df)
}
