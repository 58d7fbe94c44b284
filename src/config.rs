//! Run configuration.
//!
//! Loaded once from TOML (every field optional) and passed explicitly into the
//! pipeline. Command-line flags override individual fields before validation.

use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{batch::ErrorMode, error::ConfigError, tables::TablePaths};

/// Feature-service endpoints and request policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Query endpoint of the parcel layer.
    pub parcels_url: String,
    /// Query endpoint of the soil layer.
    pub soils_url: String,
    /// Query endpoint of the land-use layer.
    pub landuse_url: String,
    /// Planar spatial reference every query is answered in.
    pub wkid: u32,
    pub timeout_secs: u64,
    /// Extra attempts after a failed request.
    pub retries: u32,
    /// Upper bound on pages fetched for one truncated query.
    pub max_pages: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            parcels_url: "https://maps.co.kendall.il.us/server/rest/services/Hosted/Current_Cadastral_Features/FeatureServer/1/query".into(),
            soils_url: "https://maps.co.kendall.il.us/server/rest/services/Hosted/Assessor_Soils/FeatureServer/0/query".into(),
            landuse_url: "https://maps.co.kendall.il.us/server/rest/services/Hosted/Assessor_Landuse/FeatureServer/0/query".into(),
            wkid: 3435,
            timeout_secs: 30,
            retries: 2,
            max_pages: 100,
        }
    }
}

/// Settings for one assessment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Largest fractional gap between allocated and gross acreage that is closed
    /// by proportional scaling instead of being reported.
    pub acre_tolerance: f64,
    pub error_mode: ErrorMode,
    pub tables: TablePaths,
    pub source: SourceConfig,
    /// Error table appended to in `write` mode.
    pub error_table: PathBuf,
    /// Where overlap SVGs for mismatched parcels go. None disables them.
    pub diagnostics_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            acre_tolerance: 0.05,
            error_mode: ErrorMode::Warn,
            tables: TablePaths::default(),
            source: SourceConfig::default(),
            error_table: "farm_errors.tsv".into(),
            diagnostics_dir: None,
        }
    }
}

impl Config {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("[config] Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("[config] Invalid configuration in {}", path.display()))
    }

    /// Reject settings that would make every parcel's result meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.acre_tolerance.is_finite() || self.acre_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.acre_tolerance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.source.wkid, 3435);
        assert_eq!(config.error_mode, ErrorMode::Warn);
    }

    #[test]
    fn overrides_nested_fields() {
        let config = Config::from_toml_str(r#"
            acre_tolerance = 0.01
            error_mode = "write"
            error_table = "out/errors.tsv"
            diagnostics_dir = "out/diag"

            [tables]
            eav = "tables/eav.csv"

            [source]
            retries = 0
        "#).unwrap();

        assert_eq!(config.acre_tolerance, 0.01);
        assert_eq!(config.error_mode, ErrorMode::Write);
        assert_eq!(config.error_table, PathBuf::from("out/errors.tsv"));
        assert_eq!(config.diagnostics_dir, Some(PathBuf::from("out/diag")));
        assert_eq!(config.tables.eav, PathBuf::from("tables/eav.csv"));
        assert_eq!(config.tables.productivity, TablePaths::default().productivity);
        assert_eq!(config.source.retries, 0);
        assert_eq!(config.source.timeout_secs, 30);
    }

    #[test]
    fn rejects_unknown_error_mode() {
        let err = Config::from_toml_str(r#"error_mode = "panic""#).unwrap_err();
        assert!(format!("{err:#}").contains("unrecognized error mode 'panic'"));
    }

    #[test]
    fn rejects_negative_tolerance() {
        let err = Config::from_toml_str("acre_tolerance = -0.1").unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::InvalidTolerance(-0.1)));
    }

    #[test]
    fn load_reads_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("farmcards.toml");
        fs::write(&path, "error_mode = \"halt\"\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().error_mode, ErrorMode::Halt);
        assert!(Config::load(&tmp.path().join("missing.toml")).is_err());
    }
}
