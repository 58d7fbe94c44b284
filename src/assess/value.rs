use std::fmt;

use crate::{
    common::round_to,
    tables::LookupTables,
    types::{AllocatedRow, ValuedRow},
};

/// Flat per-acre value of contributory wasteland, independent of soil.
pub const WASTELAND_EAV: f64 = 33.22;

/// Farmland class of a two-character land-use code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanduseClass {
    Cropland,
    PermanentPasture,
    OtherFarmland,
    ContributoryWasteland,
    Other,
}

impl LanduseClass {
    pub fn from_code(code: &str) -> Self {
        match code {
            "02" => Self::Cropland,
            "03" => Self::PermanentPasture,
            "04" => Self::OtherFarmland,
            "05" => Self::ContributoryWasteland,
            _ => Self::Other,
        }
    }

    /// Per-acre value for this class given the soil-derived EAV.
    /// Wasteland and non-farm classes never depend on `eav`.
    pub fn adjust(&self, eav: Option<f64>) -> Option<f64> {
        match self {
            Self::Cropland => eav,
            Self::PermanentPasture => eav.map(|eav| eav / 3.0),
            Self::OtherFarmland => eav.map(|eav| eav / 6.0),
            Self::ContributoryWasteland => Some(WASTELAND_EAV),
            Self::Other => Some(0.0),
        }
    }
}

impl fmt::Display for LanduseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cropland => "cropland",
            Self::PermanentPasture => "permanent pasture",
            Self::OtherFarmland => "other farmland",
            Self::ContributoryWasteland => "contributory wasteland",
            Self::Other => "non-farm",
        })
    }
}

/// Price one allocated row. Unmatched lookups leave the dependent fields `None`.
pub fn value_row(row: AllocatedRow, tables: &LookupTables) -> ValuedRow {
    let productivity_index = tables.productivity.get(&row.key.soil_type);
    let slope = tables.slopes.get(&row.key.slope);

    let adjusted_pi = match (productivity_index, slope.and_then(|entry| entry.coefficient())) {
        (Some(pi), Some(coefficient)) => Some(round_to(pi * coefficient, 0)),
        _ => None,
    };
    let eav = adjusted_pi.and_then(|pi| tables.eav.lookup(pi));
    let eav_adj = LanduseClass::from_code(&row.key.landuse_type).adjust(eav);
    let value = eav_adj.map(|per_acre| row.part_acres * per_acre);

    ValuedRow {
        productivity_index,
        favorability: slope.map(|entry| entry.favorability),
        adjusted_pi,
        eav,
        eav_adj,
        value,
        row,
    }
}

/// Price every allocated row; none are dropped.
pub fn value_rows(rows: Vec<AllocatedRow>, tables: &LookupTables) -> Vec<ValuedRow> {
    rows.into_iter().map(|row| value_row(row, tables)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::approx_eq,
        types::{Favorability, Pin, RowKey},
    };

    fn tables() -> LookupTables {
        LookupTables::from_csv_strs(
            "map_symbol,productivity_index\n152A,144\n67A,125\n330A,105\n",
            "erosion_code,favorability,coeff_fav,coeff_unf\n,Favorable,1.00,1.00\nA,Favorable,1.00,0.95\nC2,Unfavorable,0.92,0.83\n",
            "avg_PI,eav\n144,638.69\n138,580.53\n104,336.44\n82,199.29\n87,207.47\n",
        ).unwrap()
    }

    fn row(soil: &str, slope: &str, landuse: &str, part_acres: f64) -> AllocatedRow {
        AllocatedRow {
            key: RowKey { pin: Pin::new("01-01"), soil_type: soil.into(), slope: slope.into(), landuse_type: landuse.into() },
            part_acres,
        }
    }

    #[test]
    fn cropland_takes_full_eav() {
        let valued = value_row(row("152A", "A", "02", 40.0), &tables());
        assert_eq!(valued.productivity_index, Some(144.0));
        assert_eq!(valued.favorability, Some(Favorability::Favorable));
        assert_eq!(valued.adjusted_pi, Some(144.0));
        assert_eq!(valued.eav, Some(638.69));
        assert_eq!(valued.eav_adj, Some(638.69));
        assert!(approx_eq(valued.value.unwrap(), 40.0 * 638.69, 1e-9));
    }

    #[test]
    fn unfavorable_slope_uses_its_coefficient() {
        // 125 * 0.83 = 103.75 -> 104
        let valued = value_row(row("67A", "C2", "02", 1.0), &tables());
        assert_eq!(valued.favorability, Some(Favorability::Unfavorable));
        assert_eq!(valued.adjusted_pi, Some(104.0));
        assert_eq!(valued.eav, Some(336.44));
    }

    #[test]
    fn adjusted_index_rounds_to_nearest() {
        // 105 * 0.83 = 87.15 -> 87
        let valued = value_row(row("330A", "C2", "04", 1.0), &tables());
        assert_eq!(valued.adjusted_pi, Some(87.0));
        assert_eq!(valued.eav, Some(207.47));

        // Favorable slope keeps the index whole: 105 * 1.00
        let valued = value_row(row("330A", "A", "04", 1.0), &tables());
        assert_eq!(valued.adjusted_pi, Some(105.0));
        assert_eq!(valued.eav, None);
    }

    #[test]
    fn adjusted_index_rounds_ties_to_even() {
        let tables = LookupTables::from_csv_strs(
            "map_symbol,productivity_index\nX,137\nY,139\n",
            "erosion_code,favorability,coeff_fav,coeff_unf\nH,Favorable,0.5,0.5\n",
            "avg_PI,eav\n68,1\n70,2\n",
        ).unwrap();
        // 68.5 -> 68, 69.5 -> 70
        assert_eq!(value_row(row("X", "H", "02", 1.0), &tables).adjusted_pi, Some(68.0));
        assert_eq!(value_row(row("Y", "H", "02", 1.0), &tables).adjusted_pi, Some(70.0));
    }

    #[test]
    fn missing_slope_joins_blank_code() {
        let valued = value_row(row("152A", "", "02", 1.0), &tables());
        assert_eq!(valued.adjusted_pi, Some(144.0));
    }

    #[test]
    fn pasture_and_other_farmland_are_fractions() {
        let tables = tables();
        let pasture = value_row(row("152A", "A", "03", 3.0), &tables);
        assert!(approx_eq(pasture.eav_adj.unwrap(), 638.69 / 3.0, 1e-9));
        assert!(approx_eq(pasture.value.unwrap(), 638.69, 1e-9));

        let other = value_row(row("152A", "A", "04", 6.0), &tables);
        assert!(approx_eq(other.eav_adj.unwrap(), 638.69 / 6.0, 1e-9));
    }

    #[test]
    fn wasteland_is_flat_regardless_of_soil() {
        let valued = value_row(row("unknown", "zz", "05", 2.5), &tables());
        assert_eq!(valued.productivity_index, None);
        assert_eq!(valued.eav, None);
        assert_eq!(valued.eav_adj, Some(WASTELAND_EAV));
        assert!(approx_eq(valued.value.unwrap(), 2.5 * 33.22, 1e-9));
    }

    #[test]
    fn unknown_landuse_is_worth_nothing() {
        for code in ["01", "06", "99", ""] {
            let valued = value_row(row("152A", "A", code, 10.0), &tables());
            assert_eq!(valued.eav, Some(638.69));
            assert_eq!(valued.eav_adj, Some(0.0), "code {code:?}");
            assert_eq!(valued.value, Some(0.0));
        }
    }

    #[test]
    fn unmatched_lookups_flow_through_as_none() {
        let tables = tables();
        let no_soil = value_row(row("nope", "A", "02", 1.0), &tables);
        assert_eq!(no_soil.productivity_index, None);
        assert_eq!(no_soil.adjusted_pi, None);
        assert_eq!(no_soil.eav_adj, None);
        assert_eq!(no_soil.value, None);

        let no_slope = value_row(row("152A", "Q", "03", 1.0), &tables);
        assert_eq!(no_slope.productivity_index, Some(144.0));
        assert_eq!(no_slope.favorability, None);
        assert_eq!(no_slope.adjusted_pi, None);
        assert_eq!(no_slope.value, None);
    }

    #[test]
    fn low_indices_use_interpolated_eav() {
        let tables = LookupTables::from_csv_strs(
            "map_symbol,productivity_index\nLOW,60\n",
            "erosion_code,favorability,coeff_fav,coeff_unf\nA,Favorable,1.0,1.0\n",
            "avg_PI,eav\n82,199.29\n",
        ).unwrap();
        let valued = value_row(row("LOW", "A", "02", 1.0), &tables);
        assert!(approx_eq(valued.eav.unwrap(), 199.29 - 1.636 * 22.0, 1e-9));
    }

    #[test]
    fn every_row_survives() {
        let rows = vec![row("152A", "A", "02", 1.0), row("nope", "nope", "99", 2.0)];
        assert_eq!(value_rows(rows, &tables()).len(), 2);
    }
}
