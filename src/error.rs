//! Error kinds raised while assessing parcels.
//!
//! `ParcelError` covers the per-parcel conditions that skip one parcel and let the
//! batch continue (unless the error mode halts). `ConfigError` covers settings that
//! make the whole run meaningless and are rejected before any parcel is touched.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Pin;

/// A reportable condition that stops one parcel from producing rows.
#[derive(Debug, Clone, Error)]
pub enum ParcelError {
    #[error("no features found for parcel {pin}")]
    NoFeaturesFound { pin: Pin },

    #[error("parcel {pin} has no gross acreage")]
    MissingOrZeroAcreage { pin: Pin },

    #[error("acreage mismatch for parcel {pin}: gross {gross_acres:.4} vs allocated {allocated_acres:.4}")]
    AcreageMismatch {
        pin: Pin,
        gross_acres: f64,
        allocated_acres: f64,
        diagnostic: Option<PathBuf>,
    },

    #[error("feature source unavailable for parcel {pin}: {message}")]
    SourceUnavailable { pin: Pin, message: String },
}

impl ParcelError {
    /// Parcel the condition was raised for.
    pub fn pin(&self) -> &Pin {
        match self {
            Self::NoFeaturesFound { pin }
            | Self::MissingOrZeroAcreage { pin }
            | Self::AcreageMismatch { pin, .. }
            | Self::SourceUnavailable { pin, .. } => pin,
        }
    }

    /// Stable short name used in error tables and skip records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoFeaturesFound { .. } => "no_features",
            Self::MissingOrZeroAcreage { .. } => "no_acreage",
            Self::AcreageMismatch { .. } => "acreage_mismatch",
            Self::SourceUnavailable { .. } => "source_unavailable",
        }
    }
}

/// Invalid run settings. Always fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unrecognized error mode '{0}' (expected warn, write, halt or ignore)")]
    InvalidErrorMode(String),

    #[error("acre tolerance must be a finite, non-negative fraction (got {0})")]
    InvalidTolerance(f64),
}
