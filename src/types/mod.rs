mod feature;
mod parcel;
mod pin;
mod rows;

pub use feature::{Feature, FeatureCollection};
pub use parcel::{LanduseFeature, Parcel, SoilFeature};
pub(crate) use parcel::{GROSS_ACRES_FIELD, PIN_FIELD};
pub use pin::Pin;
pub use rows::{AllocatedRow, Favorability, RowKey, SubRegion, ValuedRow};
