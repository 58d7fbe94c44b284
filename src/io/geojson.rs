//! GeoJSON feature collections, as returned by feature services with `f=geojson`.

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{Feature, FeatureCollection};

/// One response page. `exceeded_transfer_limit` is set when the service truncated
/// the result and more pages are available.
#[derive(Debug)]
pub(crate) struct GeoJsonPage {
    pub(crate) collection: FeatureCollection,
    pub(crate) exceeded_transfer_limit: bool,
}

/// Read a feature collection from GeoJSON bytes.
pub(crate) fn read_geojson_bytes(bytes: &[u8]) -> Result<GeoJsonPage> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson] Failed to parse GeoJSON bytes")?;

    // Services report query failures as a 200 response with an error object.
    if let Some(error) = value.get("error") {
        let message = error.get("message").and_then(Value::as_str).unwrap_or("unknown error");
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        bail!("[io::geojson] Service returned error {code}: {message}");
    }

    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson] Missing 'features' array"))?;

    let mut parsed = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
            debug!(idx, "skipping feature without geometry");
            continue;
        };
        let Some(geometry) = parse_geometry(geometry).with_context(|| format!("[io::geojson] Invalid geometry in feature {idx}"))? else {
            debug!(idx, "skipping non-areal feature");
            continue;
        };
        let properties = match feature.get("properties") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        parsed.push(Feature::new(geometry, properties));
    }

    let exceeded_transfer_limit = value.get("exceededTransferLimit").and_then(Value::as_bool)
        .or_else(|| value.pointer("/properties/exceededTransferLimit").and_then(Value::as_bool))
        .unwrap_or(false);

    Ok(GeoJsonPage {
        collection: FeatureCollection::new(parsed, parse_wkid(&value)),
        exceeded_transfer_limit,
    })
}

/// Read a feature collection from a GeoJSON file.
pub(crate) fn read_geojson_file(path: &Path) -> Result<FeatureCollection> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::geojson] Failed to read GeoJSON file: {}", path.display()))?;
    Ok(read_geojson_bytes(&bytes)
        .with_context(|| format!("[io::geojson] Failed to load {}", path.display()))?
        .collection)
}

/// Spatial reference from a named `crs` member, e.g. "EPSG:3435".
fn parse_wkid(value: &Value) -> Option<u32> {
    let name = value.pointer("/crs/properties/name")?.as_str()?;
    name.rsplit(|c: char| c == ':' || c == '/').next()?.parse().ok()
}

/// Parse a Polygon or MultiPolygon geometry; other geometry types are `None`.
fn parse_geometry(geometry: &Value) -> Result<Option<MultiPolygon<f64>>> {
    let coords = geometry["coordinates"].as_array();
    match (geometry["type"].as_str(), coords) {
        (Some("Polygon"), Some(rings)) => Ok(Some(MultiPolygon(vec![parse_polygon_coords(rings)?]))),
        (Some("MultiPolygon"), Some(polygons)) => {
            let polygons = polygons.iter()
                .map(|polygon| polygon.as_array()
                    .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon is not an array"))
                    .and_then(|rings| parse_polygon_coords(rings)))
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(MultiPolygon(polygons)))
        }
        (Some("Polygon" | "MultiPolygon"), None) => bail!("missing coordinates"),
        _ => Ok(None),
    }
}

/// Parse polygon rings: the first is the exterior, the rest are holes.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: ring is not an array"))
            .and_then(|coords| parse_ring_coords(coords))
    });

    let exterior = rings.next().ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring of [x, y] pairs, closing it if needed.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len() + 1);

    for pair in coords {
        let pair = pair.as_array().ok_or_else(|| anyhow!("Invalid coordinate: not an array"))?;
        let x = pair.first().and_then(Value::as_f64)
            .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
        let y = pair.get(1).and_then(Value::as_f64)
            .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
        points.push(Coord { x, y });
    }

    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}
