//! Per-parcel assessment: acreage allocation, reconciliation and valuation.

mod allocate;
mod parcel;
mod value;

pub use allocate::{Reconciliation, allocate, allocated_acres, reconcile};
pub use parcel::{AssessOptions, Assessor};
pub use value::{LanduseClass, WASTELAND_EAV, value_row, value_rows};
