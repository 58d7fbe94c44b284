use std::path::Path;

use ahash::AHashMap;
use anyhow::Result;
use polars::frame::DataFrame;

use crate::io::csv::{float_column, read_table, read_table_str, text_column};

/// Soil map symbol -> productivity index.
#[derive(Debug, Clone, Default)]
pub struct ProductivityTable {
    index: AHashMap<String, f64>,
}

impl ProductivityTable {
    pub fn from_csv_file(path: &Path) -> Result<Self> {
        super::with_path(read_table(path).and_then(|df| Self::from_frame(&df)), path)
    }

    pub fn from_csv_str(csv: &str) -> Result<Self> {
        Self::from_frame(&read_table_str(csv)?)
    }

    /// Expects `map_symbol` and `productivity_index` columns. Rows missing either are skipped.
    fn from_frame(df: &DataFrame) -> Result<Self> {
        let symbols = text_column(df, "map_symbol")?;
        let values = float_column(df, "productivity_index")?;
        Ok(symbols.into_iter().zip(values)
            .filter_map(|(symbol, value)| Some((symbol?, value?)))
            .collect())
    }

    /// Productivity index for a soil type.
    #[inline] pub fn get(&self, soil_type: &str) -> Option<f64> { self.index.get(soil_type).copied() }

    #[inline] pub fn len(&self) -> usize { self.index.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.index.is_empty() }
}

impl FromIterator<(String, f64)> for ProductivityTable {
    /// Later entries for the same symbol are ignored.
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut index = AHashMap::new();
        for (symbol, value) in iter { index.entry(symbol).or_insert(value); }
        Self { index }
    }
}
