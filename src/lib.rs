#![doc = "Farmland assessment cards: parcel, soil and land-use overlay priced through productivity tables"]
mod assess;
mod batch;
mod common;
mod config;
mod error;
mod geom;
mod io;
mod source;
mod tables;
mod types;

#[doc(inline)]
pub use assess::{AssessOptions, Assessor, LanduseClass, Reconciliation, WASTELAND_EAV, allocate, allocated_acres, reconcile, value_row, value_rows};

#[doc(inline)]
pub use batch::{BatchOutcome, ErrorMode, ErrorSink, HaltSink, RowSink, TsvSink, WarnSink, WriteSink, dedup_pins, run_batch};

#[doc(inline)]
pub use config::{Config, SourceConfig};

#[doc(inline)]
pub use error::{ConfigError, ParcelError};

#[doc(inline)]
pub use geom::overlay;

#[doc(inline)]
pub use source::{FeatureSource, LANDUSE_FILE, Layer, LocalSource, PARCELS_FILE, SOILS_FILE};

#[cfg(feature = "arcgis")]
#[doc(inline)]
pub use source::ArcGisSource;

#[doc(inline)]
pub use tables::{EavTable, LookupTables, ProductivityTable, SlopeEntry, SlopeTable, TablePaths};

#[doc(inline)]
pub use types::{
    AllocatedRow, Favorability, Feature, FeatureCollection, LanduseFeature, Parcel, Pin, RowKey, SoilFeature, SubRegion, ValuedRow,
};
