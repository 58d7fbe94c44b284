//! Geometry/attribute sources.
//!
//! The pipeline only needs two query shapes: the parcel features for one identifier,
//! and every feature of a layer intersecting an envelope. `ArcGisSource` answers them
//! from a feature service, `LocalSource` from collections held in memory.

#[cfg(feature = "arcgis")]
mod arcgis;
mod local;

use std::fmt;

use anyhow::Result;
use geo::Rect;

#[cfg(feature = "arcgis")]
pub use arcgis::ArcGisSource;
pub use local::{LANDUSE_FILE, LocalSource, PARCELS_FILE, SOILS_FILE};

use crate::types::{FeatureCollection, Pin};

/// Attribute layers overlaid on parcels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Soils,
    Landuse,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Soils => "soils",
            Layer::Landuse => "landuse",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Provider of parcel, soil and land-use features in one planar spatial reference.
pub trait FeatureSource {
    /// Features of the parcel identified by `pin`. An empty collection means no match.
    fn parcels(&self, pin: &Pin) -> Result<FeatureCollection>;

    /// Every feature of `layer` whose geometry intersects `envelope`.
    fn features_in(&self, layer: Layer, envelope: &Rect<f64>) -> Result<FeatureCollection>;
}

impl<S: FeatureSource + ?Sized> FeatureSource for &S {
    fn parcels(&self, pin: &Pin) -> Result<FeatureCollection> { (**self).parcels(pin) }

    fn features_in(&self, layer: Layer, envelope: &Rect<f64>) -> Result<FeatureCollection> {
        (**self).features_in(layer, envelope)
    }
}

impl<S: FeatureSource + ?Sized> FeatureSource for Box<S> {
    fn parcels(&self, pin: &Pin) -> Result<FeatureCollection> { (**self).parcels(pin) }

    fn features_in(&self, layer: Layer, envelope: &Rect<f64>) -> Result<FeatureCollection> {
        (**self).features_in(layer, envelope)
    }
}
