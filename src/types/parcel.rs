use geo::{Area, BooleanOps, BoundingRect, MultiPolygon, Rect};

use crate::error::ParcelError;
use super::{Feature, FeatureCollection, Pin};

/// Attribute names used by the parcel, soil and land-use layers.
pub(crate) const PIN_FIELD: &str = "pin";
pub(crate) const GROSS_ACRES_FIELD: &str = "gross_acres";
pub(crate) const SOIL_TYPE_FIELD: &str = "soil_type";
pub(crate) const SLOPE_FIELD: &str = "slope";
pub(crate) const LANDUSE_FIELD: &str = "landuse_type";

/// A taxable parcel with its authoritative acreage.
#[derive(Debug, Clone)]
pub struct Parcel {
    pub pin: Pin,
    pub gross_acres: f64,
    pub geometry: MultiPolygon<f64>,
}

impl Parcel {
    /// Build a parcel from the features returned for `pin`.
    /// Multiple features are parts of the same parcel; the first present acreage wins.
    pub fn from_features(pin: &Pin, collection: &FeatureCollection) -> Result<Self, ParcelError> {
        if collection.is_empty() {
            return Err(ParcelError::NoFeaturesFound { pin: pin.clone() });
        }

        let gross_acres = collection.iter()
            .find_map(|feature| feature.number(GROSS_ACRES_FIELD))
            .filter(|acres| acres.is_finite() && *acres > 0.0)
            .ok_or_else(|| ParcelError::MissingOrZeroAcreage { pin: pin.clone() })?;

        let geometry = collection.iter()
            .map(|feature| feature.geometry.clone())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| MultiPolygon(vec![]));

        Ok(Self { pin: pin.clone(), gross_acres, geometry })
    }

    /// Planar area of the parcel geometry, in squared spatial-reference units.
    #[inline] pub fn raw_area(&self) -> f64 { self.geometry.unsigned_area() }

    /// Axis-aligned envelope used to fetch overlapping soil and land-use features.
    #[inline] pub fn envelope(&self) -> Option<Rect<f64>> { self.geometry.bounding_rect() }
}

/// Soil polygon with its map symbol and slope/erosion code.
#[derive(Debug, Clone)]
pub struct SoilFeature {
    pub soil_type: String,
    pub slope: String, // "" when the layer has no slope, so it still groups and joins
    pub geometry: MultiPolygon<f64>,
}

impl SoilFeature {
    /// Returns `None` for features without a soil type.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        Some(Self {
            soil_type: feature.text(SOIL_TYPE_FIELD)?,
            slope: feature.text(SLOPE_FIELD).unwrap_or_default(),
            geometry: feature.geometry.clone(),
        })
    }
}

/// Land-use polygon keyed by its two-character code.
#[derive(Debug, Clone)]
pub struct LanduseFeature {
    pub landuse_type: String,
    pub geometry: MultiPolygon<f64>,
}

impl LanduseFeature {
    /// Returns `None` for features without a land-use code.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        Some(Self { landuse_type: landuse_code(feature)?, geometry: feature.geometry.clone() })
    }
}

/// Zero-pad the land-use attribute to a two-character key ("2" -> "02").
fn landuse_code(feature: &Feature) -> Option<String> {
    match feature.number(LANDUSE_FIELD) {
        Some(code) if code.is_finite() => Some(format!("{:02}", code.round() as i64)),
        _ => feature.text(LANDUSE_FIELD).map(|code| format!("{code:0>2}")),
    }
}

#[cfg(test)]
mod tests {
    use geo::{MultiPolygon, Rect, coord};
    use serde_json::{Value, json};

    use super::*;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Rect::new(coord! { x: x, y: y }, coord! { x: x + size, y: y + size }).to_polygon()])
    }

    fn feature(properties: Value, geometry: MultiPolygon<f64>) -> Feature {
        let Value::Object(properties) = properties else { panic!("properties must be an object") };
        Feature::new(geometry, properties)
    }

    #[test]
    fn parcel_requires_features() {
        let pin = Pin::new("1");
        let err = Parcel::from_features(&pin, &FeatureCollection::default()).unwrap_err();
        assert!(matches!(err, ParcelError::NoFeaturesFound { .. }));
    }

    #[test]
    fn parcel_requires_positive_acreage() {
        let pin = Pin::new("1");
        for acres in [json!(null), json!(0.0), json!(-3.0)] {
            let collection = FeatureCollection::new(vec![
                feature(json!({ "pin": "1", "gross_acres": acres }), square(0.0, 0.0, 10.0)),
            ], None);
            let err = Parcel::from_features(&pin, &collection).unwrap_err();
            assert!(matches!(err, ParcelError::MissingOrZeroAcreage { .. }));
        }
    }

    #[test]
    fn parcel_parts_are_unioned() {
        let pin = Pin::new("1");
        let collection = FeatureCollection::new(vec![
            feature(json!({ "gross_acres": 20.0 }), square(0.0, 0.0, 10.0)),
            feature(json!({ "gross_acres": 20.0 }), square(10.0, 0.0, 10.0)),
        ], Some(3435));

        let parcel = Parcel::from_features(&pin, &collection).unwrap();
        assert_eq!(parcel.gross_acres, 20.0);
        assert!((parcel.raw_area() - 200.0).abs() < 1e-9);

        let envelope = parcel.envelope().unwrap();
        assert_eq!(envelope.min(), coord! { x: 0.0, y: 0.0 });
        assert_eq!(envelope.max(), coord! { x: 20.0, y: 10.0 });
    }

    #[test]
    fn soil_slope_defaults_to_empty() {
        let soil = SoilFeature::from_feature(&feature(json!({ "soil_type": "152A", "slope": null }), square(0.0, 0.0, 1.0))).unwrap();
        assert_eq!(soil.soil_type, "152A");
        assert_eq!(soil.slope, "");

        assert!(SoilFeature::from_feature(&feature(json!({ "slope": "B" }), square(0.0, 0.0, 1.0))).is_none());
    }

    #[test]
    fn landuse_codes_are_zero_padded() {
        let code = |value: Value| {
            LanduseFeature::from_feature(&feature(json!({ "landuse_type": value }), square(0.0, 0.0, 1.0)))
                .map(|landuse| landuse.landuse_type)
        };
        assert_eq!(code(json!(2)).as_deref(), Some("02"));
        assert_eq!(code(json!(5.0)).as_deref(), Some("05"));
        assert_eq!(code(json!("3")).as_deref(), Some("03"));
        assert_eq!(code(json!(12)).as_deref(), Some("12"));
        assert_eq!(code(json!("W")).as_deref(), Some("0W"));
        assert_eq!(code(json!(null)), None);
    }
}
