//! Reference tables used to price allocated acreage.
//!
//! All three are loaded once per run and shared read-only by every parcel.

mod eav;
mod productivity;
mod slope;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use eav::EavTable;
pub use productivity::ProductivityTable;
pub use slope::{SlopeEntry, SlopeTable};

/// Locations of the reference CSV files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePaths {
    pub productivity: PathBuf,
    pub slope_erosion: PathBuf,
    pub eav: PathBuf,
}

impl Default for TablePaths {
    fn default() -> Self {
        Self {
            productivity: "resources/soil_PI_2021.csv".into(),
            slope_erosion: "resources/soil_slope_erosion_2021.csv".into(),
            eav: "resources/eav_2021.csv".into(),
        }
    }
}

/// Productivity, slope/erosion and EAV tables.
#[derive(Debug, Clone)]
pub struct LookupTables {
    pub productivity: ProductivityTable,
    pub slopes: SlopeTable,
    pub eav: EavTable,
}

impl LookupTables {
    pub fn new(productivity: ProductivityTable, slopes: SlopeTable, eav: EavTable) -> Self {
        Self { productivity, slopes, eav }
    }

    /// Load all three tables from CSV files.
    pub fn load(paths: &TablePaths) -> Result<Self> {
        let tables = Self::new(
            ProductivityTable::from_csv_file(&paths.productivity).context("[tables] productivity index")?,
            SlopeTable::from_csv_file(&paths.slope_erosion).context("[tables] slope/erosion")?,
            EavTable::from_csv_file(&paths.eav).context("[tables] equalized assessed value")?,
        );
        info!(
            soils = tables.productivity.len(),
            slopes = tables.slopes.len(),
            eav_bands = tables.eav.len(),
            "loaded lookup tables"
        );
        Ok(tables)
    }

    /// Build all three tables from CSV text.
    pub fn from_csv_strs(productivity: &str, slope_erosion: &str, eav: &str) -> Result<Self> {
        Ok(Self::new(
            ProductivityTable::from_csv_str(productivity).context("[tables] productivity index")?,
            SlopeTable::from_csv_str(slope_erosion).context("[tables] slope/erosion")?,
            EavTable::from_csv_str(eav).context("[tables] equalized assessed value")?,
        ))
    }
}

/// Fail with the file name when a table cannot be read.
pub(crate) fn with_path<T>(result: Result<T>, path: &Path) -> Result<T> {
    result.with_context(|| format!("[tables] Failed to load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PI_CSV: &str = "map_symbol,productivity_index\n152A,144\n";
    const SLOPE_CSV: &str = "erosion_code,favorability,coeff_fav,coeff_unf\nA,Favorable,1.0,0.95\n";
    const EAV_CSV: &str = "avg_PI,eav\n144,638.69\n";

    #[test]
    fn loads_from_files_and_strings_alike() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = TablePaths {
            productivity: tmp.path().join("pi.csv"),
            slope_erosion: tmp.path().join("se.csv"),
            eav: tmp.path().join("eav.csv"),
        };
        std::fs::write(&paths.productivity, PI_CSV).unwrap();
        std::fs::write(&paths.slope_erosion, SLOPE_CSV).unwrap();
        std::fs::write(&paths.eav, EAV_CSV).unwrap();

        let from_files = LookupTables::load(&paths).unwrap();
        let from_strs = LookupTables::from_csv_strs(PI_CSV, SLOPE_CSV, EAV_CSV).unwrap();

        assert_eq!(from_files.productivity.get("152A"), from_strs.productivity.get("152A"));
        assert_eq!(from_files.slopes.get("A"), from_strs.slopes.get("A"));
        assert_eq!(from_files.eav.get(144), Some(638.69));
        assert_eq!(from_files.eav.len(), from_strs.eav.len());
    }

    #[test]
    fn load_error_names_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = TablePaths {
            productivity: tmp.path().join("missing_pi.csv"),
            ..TablePaths::default()
        };
        let err = LookupTables::load(&paths).unwrap_err();
        assert!(format!("{err:#}").contains("missing_pi.csv"));
    }
}
