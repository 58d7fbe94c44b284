use geo::{Area, BooleanOps, BoundingRect, MultiPolygon};
use tracing::debug;

use crate::types::{LanduseFeature, Parcel, RowKey, SoilFeature, SubRegion};
use super::SpatialIndex;

/// Split a parcel into sub-regions by soil, then by land use.
///
/// The overlay is ordered: parcel ∩ soil pieces are computed first and each piece is
/// then cut by the land-use polygons it touches. Zero-area slivers are dropped, so
/// the result covers at most the parcel; areas the soil or land-use layers leave
/// uncovered simply produce no sub-region.
pub fn overlay(parcel: &Parcel, soils: &[SoilFeature], landuse: &[LanduseFeature]) -> Vec<SubRegion> {
    let Some(envelope) = parcel.envelope() else { return Vec::new() };

    let soil_index = SpatialIndex::new(soils.iter().map(|soil| &soil.geometry));
    let soil_pieces = soil_index.query(&envelope).into_iter()
        .filter_map(|i| {
            let piece = parcel.geometry.intersection(&soils[i].geometry);
            (piece.unsigned_area() > 0.0).then_some((&soils[i], piece))
        })
        .collect::<Vec<(&SoilFeature, MultiPolygon<f64>)>>();

    let landuse_index = SpatialIndex::new(landuse.iter().map(|feature| &feature.geometry));
    let mut regions = Vec::new();
    for (soil, piece) in &soil_pieces {
        let Some(bounds) = piece.bounding_rect() else { continue };
        for j in landuse_index.query(&bounds) {
            let geometry = piece.intersection(&landuse[j].geometry);
            let area = geometry.unsigned_area();
            if area <= 0.0 { continue }

            regions.push(SubRegion {
                key: RowKey {
                    pin: parcel.pin.clone(),
                    soil_type: soil.soil_type.clone(),
                    slope: soil.slope.clone(),
                    landuse_type: landuse[j].landuse_type.clone(),
                },
                geometry,
                area,
            });
        }
    }

    debug!(
        pin = %parcel.pin,
        soil_candidates = soil_index.len(),
        soil_pieces = soil_pieces.len(),
        regions = regions.len(),
        "overlay complete"
    );
    regions
}
