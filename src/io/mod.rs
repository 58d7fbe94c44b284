//! IO module for format-specific reading and writing operations.
//!
//! # Format Modules
//!
//! - `csv` - reference tables in, tab-separated cards and error records out
//! - `geojson` - feature collections returned by sources or stored locally
//! - `svg` - overlap diagnostics for parcels that fail reconciliation

pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod svg;
