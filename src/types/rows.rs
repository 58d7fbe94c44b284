use std::fmt;

use geo::MultiPolygon;

use super::Pin;

/// Grouping key shared by sub-regions and output rows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    pub pin: Pin,
    pub soil_type: String,
    pub slope: String,
    pub landuse_type: String,
}

/// Parcel ∩ soil ∩ land-use piece.
#[derive(Debug, Clone)]
pub struct SubRegion {
    pub key: RowKey,
    pub geometry: MultiPolygon<f64>,
    pub area: f64,
}

/// Acreage allocated to one (pin, soil, slope, land use) combination.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatedRow {
    pub key: RowKey,
    pub part_acres: f64,
}

/// Slope/erosion class controlling which productivity coefficient applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Favorability {
    Favorable,
    Unfavorable,
}

impl Favorability {
    /// Only the exact label "Favorable" is favorable.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some("Favorable") => Self::Favorable,
            _ => Self::Unfavorable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorable => "Favorable",
            Self::Unfavorable => "Unfavorable",
        }
    }
}

impl fmt::Display for Favorability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Allocated row priced through the lookup tables.
/// Lookup-derived fields are `None` when a join found no match.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuedRow {
    pub row: AllocatedRow,
    pub productivity_index: Option<f64>,
    pub favorability: Option<Favorability>,
    pub adjusted_pi: Option<f64>,
    pub eav: Option<f64>,
    pub eav_adj: Option<f64>,
    pub value: Option<f64>,
}

impl ValuedRow {
    #[inline] pub fn key(&self) -> &RowKey { &self.row.key }

    #[inline] pub fn part_acres(&self) -> f64 { self.row.part_acres }
}
