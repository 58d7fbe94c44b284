use std::collections::BTreeMap;

use crate::{
    common::round_to,
    types::{AllocatedRow, Parcel, RowKey, SubRegion},
};

/// Decimal places kept for part acres.
const ACRE_DECIMALS: i32 = 4;

/// Convert sub-region areas into acres of the parcel's gross acreage.
///
/// Each region receives `area / raw_area * gross_acres`; regions sharing a key are
/// summed, the sums rounded to 4 decimals, and non-positive rows dropped. Rows come
/// back ordered by key.
pub fn allocate(parcel: &Parcel, regions: &[SubRegion]) -> Vec<AllocatedRow> {
    let raw_area = parcel.raw_area();
    if raw_area <= 0.0 { return Vec::new() }

    let mut acres: BTreeMap<&RowKey, f64> = BTreeMap::new();
    for region in regions {
        *acres.entry(&region.key).or_default() += region.area / raw_area * parcel.gross_acres;
    }

    acres.into_iter()
        .map(|(key, part_acres)| AllocatedRow { key: key.clone(), part_acres: round_to(part_acres, ACRE_DECIMALS) })
        .filter(|row| row.part_acres > 0.0)
        .collect()
}

/// Total acres allocated across rows.
#[inline]
pub fn allocated_acres(rows: &[AllocatedRow]) -> f64 {
    rows.iter().map(|row| row.part_acres).sum()
}

/// Outcome of checking allocated acres against gross acres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reconciliation {
    /// Allocation already equals the gross acreage.
    Exact,
    /// Rows were scaled by `factor` (gross / allocated) to close a gap within tolerance.
    Scaled { factor: f64 },
    /// The gap exceeds tolerance; rows are left untouched.
    Mismatch { allocated: f64 },
}

/// Reconcile `rows` against `gross_acres`.
///
/// With `pct_off = gross / allocated`, a gap where `|1 - pct_off| <= tolerance` is
/// closed by scaling every row by `pct_off` and re-rounding. Under- and
/// over-allocation are treated alike. Nothing allocated at all is always a mismatch.
pub fn reconcile(gross_acres: f64, rows: &mut Vec<AllocatedRow>, tolerance: f64) -> Reconciliation {
    let allocated = allocated_acres(rows);
    if allocated <= 0.0 { return Reconciliation::Mismatch { allocated } }

    let diff = gross_acres - allocated;
    if diff == 0.0 { return Reconciliation::Exact }

    let pct_off = gross_acres / allocated;
    if (1.0 - pct_off).abs() > tolerance {
        return Reconciliation::Mismatch { allocated };
    }

    for row in rows.iter_mut() {
        row.part_acres = round_to(row.part_acres * pct_off, ACRE_DECIMALS);
    }
    rows.retain(|row| row.part_acres > 0.0);
    Reconciliation::Scaled { factor: pct_off }
}
