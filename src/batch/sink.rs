use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    io::csv::{append_tsv, cards_frame},
    types::ValuedRow,
};

/// Destination for the valued rows of completed parcels.
/// Each call carries every row of one parcel.
pub trait RowSink {
    fn append(&mut self, rows: &[ValuedRow]) -> Result<()>;
}

impl<R: RowSink + ?Sized> RowSink for &mut R {
    fn append(&mut self, rows: &[ValuedRow]) -> Result<()> { (**self).append(rows) }
}

impl RowSink for Vec<ValuedRow> {
    fn append(&mut self, rows: &[ValuedRow]) -> Result<()> {
        self.extend_from_slice(rows);
        Ok(())
    }
}

/// Appends rows to a headerless tab-separated file. Existing content is kept.
#[derive(Debug, Clone)]
pub struct TsvSink {
    path: PathBuf,
}

impl TsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    #[inline] pub fn path(&self) -> &Path { &self.path }
}

impl RowSink for TsvSink {
    fn append(&mut self, rows: &[ValuedRow]) -> Result<()> {
        if rows.is_empty() { return Ok(()) }
        append_tsv(&mut cards_frame(rows)?, &self.path)
            .with_context(|| format!("[batch::sink] Failed to append {} rows", rows.len()))
    }
}
