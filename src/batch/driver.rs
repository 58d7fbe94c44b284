use anyhow::Result;
use ahash::AHashSet;
use tracing::{debug, info};

use crate::{
    assess::Assessor,
    source::FeatureSource,
    types::Pin,
};
use super::{ErrorSink, RowSink};

/// Summary of a completed batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Distinct parcels attempted.
    pub parcels: usize,
    /// Rows handed to the row sink.
    pub rows: usize,
    /// Parcels that produced no rows, with the kind of condition raised.
    pub skipped: Vec<(Pin, &'static str)>,
    /// Set once any parcel raised a reportable condition.
    pub warnings: bool,
}

impl BatchOutcome {
    #[inline] pub fn is_clean(&self) -> bool { !self.warnings }
}

/// Distinct pins by normalized id, in first-seen order.
pub fn dedup_pins(pins: impl IntoIterator<Item = Pin>) -> Vec<Pin> {
    let mut seen = AHashSet::new();
    pins.into_iter().filter(|pin| seen.insert(pin.clone())).collect()
}

/// Assess every pin in order, appending each parcel's rows once it fully succeeds.
///
/// Per-parcel conditions go to `errors`; if the sink returns an error the batch
/// stops there and the error is returned. Rows already appended stay written.
pub fn run_batch<S, E, R>(
    pins: impl IntoIterator<Item = Pin>,
    assessor: &Assessor<'_, S>,
    errors: &mut E,
    rows: &mut R,
) -> Result<BatchOutcome>
where
    S: FeatureSource,
    E: ErrorSink + ?Sized,
    R: RowSink + ?Sized,
{
    let pins = dedup_pins(pins);
    let mut outcome = BatchOutcome::default();
    info!(parcels = pins.len(), "starting batch");

    for pin in pins {
        outcome.parcels += 1;
        match assessor.assess(&pin) {
            Ok(valued) => {
                rows.append(&valued)?;
                outcome.rows += valued.len();
                debug!(%pin, rows = valued.len(), "parcel complete");
            }
            Err(err) => {
                outcome.warnings = true;
                outcome.skipped.push((pin, err.kind()));
                errors.report(&err)?;
            }
        }
    }

    info!(
        parcels = outcome.parcels,
        rows = outcome.rows,
        skipped = outcome.skipped.len(),
        "batch complete"
    );
    Ok(outcome)
}
