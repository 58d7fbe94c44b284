use std::{collections::BTreeMap, path::Path};

use anyhow::Result;
use polars::frame::DataFrame;

use crate::io::csv::{float_column, read_table, read_table_str};

/// Lowest average PI with a published EAV; lower indices are interpolated.
const EAV_BASE_PI: i64 = 82;
/// EAV published for PI 82.
const EAV_AT_BASE: f64 = 199.29;
/// EAV published for PI 87, used for the per-point slope below 82.
const EAV_AT_BASE_PLUS_5: f64 = 207.47;

/// Integer average productivity index -> equalized assessed value per acre.
#[derive(Debug, Clone, Default)]
pub struct EavTable {
    values: BTreeMap<i64, f64>,
}

impl EavTable {
    pub fn from_csv_file(path: &Path) -> Result<Self> {
        super::with_path(read_table(path).and_then(|df| Self::from_frame(&df)), path)
    }

    pub fn from_csv_str(csv: &str) -> Result<Self> {
        Self::from_frame(&read_table_str(csv)?)
    }

    /// Expects `avg_PI` and `eav` columns. Non-integral indices are skipped.
    fn from_frame(df: &DataFrame) -> Result<Self> {
        let indices = float_column(df, "avg_PI")?;
        let values = float_column(df, "eav")?;
        Ok(Self::from_base(indices.into_iter().zip(values).filter_map(|(pi, eav)| {
            let pi = pi.filter(|pi| pi.is_finite() && pi.fract() == 0.0)?;
            Some((pi as i64, eav?))
        })))
    }

    /// Build from published bands, then add interpolated entries for PI 1..=81
    /// wherever the published table has none.
    pub fn from_base(base: impl IntoIterator<Item = (i64, f64)>) -> Self {
        let mut values = BTreeMap::new();
        for (pi, eav) in base { values.entry(pi).or_insert(eav); }
        for pi in 1..EAV_BASE_PI {
            values.entry(pi).or_insert_with(|| interpolated_eav(pi));
        }
        Self { values }
    }

    /// EAV for an integer PI.
    #[inline] pub fn get(&self, pi: i64) -> Option<f64> { self.values.get(&pi).copied() }

    /// EAV for a rounded adjusted PI. Non-integral or non-finite input has no band.
    pub fn lookup(&self, adjusted_pi: f64) -> Option<f64> {
        (adjusted_pi.is_finite() && adjusted_pi.fract() == 0.0)
            .then(|| self.get(adjusted_pi as i64))
            .flatten()
    }

    #[inline] pub fn len(&self) -> usize { self.values.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

/// Linear extension of the published bands below PI 82.
#[inline]
pub(crate) fn interpolated_eav(pi: i64) -> f64 {
    EAV_AT_BASE - ((EAV_AT_BASE_PLUS_5 - EAV_AT_BASE) / 5.0) * (EAV_BASE_PI - pi) as f64
}
