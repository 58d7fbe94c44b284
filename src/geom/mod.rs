mod bbox;
mod index;
mod overlay;

use bbox::BoundingBox;
pub(crate) use index::SpatialIndex;
pub use overlay::overlay;
