use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    config::Config,
    error::ParcelError,
    geom::overlay,
    io::svg::write_overlap_svg,
    source::{FeatureSource, Layer},
    tables::LookupTables,
    types::{FeatureCollection, LanduseFeature, Parcel, Pin, SoilFeature, ValuedRow},
};
use super::{Reconciliation, allocate, reconcile, value_rows};

/// Per-parcel settings derived from the run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessOptions {
    pub acre_tolerance: f64,
    /// When false, allocated rows pass through unscaled and never raise a mismatch.
    pub check_acreage: bool,
    pub diagnostics_dir: Option<PathBuf>,
}

impl AssessOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            acre_tolerance: config.acre_tolerance,
            check_acreage: config.error_mode.checks_acreage(),
            diagnostics_dir: config.diagnostics_dir.clone(),
        }
    }
}

impl Default for AssessOptions {
    fn default() -> Self { Self::from_config(&Config::default()) }
}

/// Runs the fetch, overlay, allocation and valuation steps for single parcels.
#[derive(Debug)]
pub struct Assessor<'a, S> {
    source: S,
    tables: &'a LookupTables,
    options: AssessOptions,
}

impl<'a, S: FeatureSource> Assessor<'a, S> {
    pub fn new(source: S, tables: &'a LookupTables, options: AssessOptions) -> Self {
        Self { source, tables, options }
    }

    #[inline] pub fn options(&self) -> &AssessOptions { &self.options }

    /// Valued rows for one parcel, or the condition that stopped it.
    pub fn assess(&self, pin: &Pin) -> Result<Vec<ValuedRow>, ParcelError> {
        let parcels = self.source.parcels(pin).map_err(|err| unavailable(pin, err))?;
        let parcel = Parcel::from_features(pin, &parcels)?;
        let envelope = parcel.envelope().ok_or_else(|| ParcelError::NoFeaturesFound { pin: pin.clone() })?;

        let soils = self.fetch(pin, Layer::Soils, &envelope)?
            .iter()
            .filter_map(SoilFeature::from_feature)
            .collect::<Vec<_>>();
        let landuse = self.fetch(pin, Layer::Landuse, &envelope)?
            .iter()
            .filter_map(LanduseFeature::from_feature)
            .collect::<Vec<_>>();

        let regions = overlay(&parcel, &soils, &landuse);
        let mut rows = allocate(&parcel, &regions);

        if self.options.check_acreage {
            match reconcile(parcel.gross_acres, &mut rows, self.options.acre_tolerance) {
                Reconciliation::Exact => {}
                Reconciliation::Scaled { factor } => {
                    debug!(%pin, factor, "scaled allocation to gross acreage");
                }
                Reconciliation::Mismatch { allocated } => {
                    let diagnostic = self.write_diagnostic(&parcel, &soils, &landuse, allocated);
                    return Err(ParcelError::AcreageMismatch {
                        pin: pin.clone(),
                        gross_acres: parcel.gross_acres,
                        allocated_acres: allocated,
                        diagnostic,
                    });
                }
            }
        }

        debug!(%pin, gross_acres = parcel.gross_acres, rows = rows.len(), "parcel allocated");
        Ok(value_rows(rows, self.tables))
    }

    fn fetch(&self, pin: &Pin, layer: Layer, envelope: &geo::Rect<f64>) -> Result<FeatureCollection, ParcelError> {
        self.source.features_in(layer, envelope)
            .map_err(|err| unavailable(pin, err.context(format!("querying {layer}"))))
    }

    /// Write `<pin>_overlap.svg` if a diagnostics directory is configured.
    /// A failed write is logged and does not change the parcel's outcome.
    fn write_diagnostic(
        &self,
        parcel: &Parcel,
        soils: &[SoilFeature],
        landuse: &[LanduseFeature],
        allocated: f64,
    ) -> Option<PathBuf> {
        let dir = self.options.diagnostics_dir.as_deref()?;
        let path = diagnostic_path(dir, &parcel.pin);
        let caption = format!(
            "{}: gross {:.4} ac, allocated {:.4} ac",
            parcel.pin, parcel.gross_acres, allocated,
        );
        match write_overlap_svg(&path, parcel, soils, landuse, &caption) {
            Ok(()) => Some(path),
            Err(err) => {
                warn!(pin = %parcel.pin, error = %format!("{err:#}"), "failed to write overlap diagnostic");
                None
            }
        }
    }
}

fn diagnostic_path(dir: &Path, pin: &Pin) -> PathBuf {
    dir.join(format!("{}_overlap.svg", pin.id()))
}

fn unavailable(pin: &Pin, err: anyhow::Error) -> ParcelError {
    ParcelError::SourceUnavailable { pin: pin.clone(), message: format!("{err:#}") }
}
