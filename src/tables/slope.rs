use std::path::Path;

use ahash::AHashMap;
use anyhow::Result;
use polars::frame::DataFrame;

use crate::{
    io::csv::{float_column, read_table, read_table_str, text_column},
    types::Favorability,
};

/// Favorability class and the productivity coefficients for one erosion code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeEntry {
    pub favorability: Favorability,
    pub coeff_fav: Option<f64>,
    pub coeff_unf: Option<f64>,
}

impl SlopeEntry {
    /// Coefficient that applies to this entry's class.
    #[inline]
    pub fn coefficient(&self) -> Option<f64> {
        match self.favorability {
            Favorability::Favorable => self.coeff_fav,
            Favorability::Unfavorable => self.coeff_unf,
        }
    }
}

/// Slope/erosion code -> favorability coefficients.
#[derive(Debug, Clone, Default)]
pub struct SlopeTable {
    entries: AHashMap<String, SlopeEntry>,
}

impl SlopeTable {
    pub fn from_csv_file(path: &Path) -> Result<Self> {
        super::with_path(read_table(path).and_then(|df| Self::from_frame(&df)), path)
    }

    pub fn from_csv_str(csv: &str) -> Result<Self> {
        Self::from_frame(&read_table_str(csv)?)
    }

    /// Expects `erosion_code`, `favorability`, `coeff_fav` and `coeff_unf` columns.
    /// A blank erosion code keys soils that carry no slope.
    fn from_frame(df: &DataFrame) -> Result<Self> {
        let codes = text_column(df, "erosion_code")?;
        let labels = text_column(df, "favorability")?;
        let fav = float_column(df, "coeff_fav")?;
        let unf = float_column(df, "coeff_unf")?;

        let mut entries = AHashMap::with_capacity(codes.len());
        for (((code, label), coeff_fav), coeff_unf) in codes.into_iter().zip(labels).zip(fav).zip(unf) {
            entries.entry(code.unwrap_or_default()).or_insert(SlopeEntry {
                favorability: Favorability::from_label(label.as_deref()),
                coeff_fav,
                coeff_unf,
            });
        }
        Ok(Self { entries })
    }

    /// Entry for a slope code ("" for soils without slope).
    #[inline] pub fn get(&self, slope: &str) -> Option<&SlopeEntry> { self.entries.get(slope) }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl FromIterator<(String, SlopeEntry)> for SlopeTable {
    fn from_iter<I: IntoIterator<Item = (String, SlopeEntry)>>(iter: I) -> Self {
        let mut entries = AHashMap::new();
        for (code, entry) in iter { entries.entry(code).or_insert(entry); }
        Self { entries }
    }
}
