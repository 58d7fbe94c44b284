use std::{fmt, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    config::Config,
    error::{ConfigError, ParcelError},
    io::csv::{append_tsv, error_frame},
};

/// How per-parcel conditions are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ErrorMode {
    /// Log and continue.
    #[default]
    Warn,
    /// Append a record to the error table and continue.
    Write,
    /// Abort the batch on the first condition.
    Halt,
    /// Skip the acreage check; other conditions are logged.
    Ignore,
}

impl ErrorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Write => "write",
            Self::Halt => "halt",
            Self::Ignore => "ignore",
        }
    }

    /// Whether allocated acreage is reconciled against gross acreage.
    #[inline] pub fn checks_acreage(&self) -> bool { *self != Self::Ignore }

    /// Build the sink for this mode.
    pub fn sink(&self, config: &Config) -> Box<dyn ErrorSink> {
        match self {
            Self::Warn | Self::Ignore => Box::new(WarnSink),
            Self::Write => Box::new(WriteSink::new(config.error_table.clone())),
            Self::Halt => Box::new(HaltSink),
        }
    }
}

impl FromStr for ErrorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "write" => Ok(Self::Write),
            "halt" => Ok(Self::Halt),
            "ignore" => Ok(Self::Ignore),
            _ => Err(ConfigError::InvalidErrorMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for ErrorMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<ErrorMode> for String {
    fn from(mode: ErrorMode) -> Self { mode.as_str().to_string() }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Destination for per-parcel conditions.
/// Returning an error aborts the batch.
pub trait ErrorSink {
    fn report(&mut self, err: &ParcelError) -> Result<()>;
}

impl<E: ErrorSink + ?Sized> ErrorSink for Box<E> {
    fn report(&mut self, err: &ParcelError) -> Result<()> { (**self).report(err) }
}

impl<E: ErrorSink + ?Sized> ErrorSink for &mut E {
    fn report(&mut self, err: &ParcelError) -> Result<()> { (**self).report(err) }
}

/// Logs each condition at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct WarnSink;

impl ErrorSink for WarnSink {
    fn report(&mut self, err: &ParcelError) -> Result<()> {
        match err {
            ParcelError::AcreageMismatch { diagnostic: Some(path), .. } => {
                warn!(pin = %err.pin(), kind = err.kind(), diagnostic = %path.display(), "{err}");
            }
            _ => warn!(pin = %err.pin(), kind = err.kind(), "{err}"),
        }
        Ok(())
    }
}

/// Appends each condition to a tab-separated error table.
#[derive(Debug, Clone)]
pub struct WriteSink {
    path: PathBuf,
}

impl WriteSink {
    pub fn new(path: PathBuf) -> Self { Self { path } }

    #[inline] pub fn path(&self) -> &PathBuf { &self.path }
}

impl ErrorSink for WriteSink {
    fn report(&mut self, err: &ParcelError) -> Result<()> {
        append_tsv(&mut error_frame(err)?, &self.path)
            .with_context(|| format!("[batch::report] Failed to record error for parcel {}", err.pin()))
    }
}

/// Stops the batch on the first condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaltSink;

impl ErrorSink for HaltSink {
    fn report(&mut self, err: &ParcelError) -> Result<()> {
        Err(anyhow::Error::new(err.clone()).context(format!("[batch] Halted at parcel {}", err.pin())))
    }
}
