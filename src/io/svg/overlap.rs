//! Overlap diagnostic: parcel boundary over its soil and land-use pieces.

use std::path::Path;

use anyhow::{Result, anyhow};
use geo::{BooleanOps, MultiPolygon};

use crate::types::{LanduseFeature, Parcel, SoilFeature};
use super::{SvgWriter, draw_paths, fit_projection, golden_angle_color};

/// Render `parcel` with the soil and land-use features clipped to it.
/// Soil pieces are filled per soil type; land use is drawn as dashed outlines.
pub(crate) fn write_overlap_svg(
    path: &Path,
    parcel: &Parcel,
    soils: &[SoilFeature],
    landuse: &[LanduseFeature],
    caption: &str,
) -> Result<()> {
    let bounds = parcel.envelope()
        .ok_or_else(|| anyhow!("[io::svg] Parcel {} has empty geometry", parcel.pin))?;
    let (height, project) = fit_projection(&bounds, 800.0, 16.0);

    let mut soil_types = soils.iter().map(|soil| soil.soil_type.as_str()).collect::<Vec<_>>();
    soil_types.sort_unstable();
    soil_types.dedup();

    let soil_pieces = soils.iter()
        .map(|soil| (soil, soil.geometry.intersection(&parcel.geometry)))
        .filter(|(_, piece)| !piece.0.is_empty())
        .collect::<Vec<_>>();
    let soil_fills = soil_pieces.iter()
        .map(|(soil, _)| {
            let idx = soil_types.binary_search(&soil.soil_type.as_str()).unwrap_or_default();
            golden_angle_color(idx).to_string()
        })
        .collect::<Vec<_>>();
    let landuse_pieces = landuse.iter()
        .map(|feature| feature.geometry.intersection(&parcel.geometry))
        .filter(|piece| !piece.0.is_empty())
        .collect::<Vec<MultiPolygon<f64>>>();

    let mut writer = SvgWriter::new(path)?;
    writer.write_header(800.0, height.ceil(), &bounds)?;
    writer.write_styles()?;
    draw_paths(&mut writer, &soil_pieces.iter().map(|(_, piece)| piece).collect::<Vec<_>>(), "soil", Some(&soil_fills), &project)?;
    draw_paths(&mut writer, &landuse_pieces.iter().collect::<Vec<_>>(), "landuse", None, &project)?;
    draw_paths(&mut writer, &[&parcel.geometry], "parcel", None, &project)?;
    writer.write_caption(caption)?;
    writer.write_footer()
}
