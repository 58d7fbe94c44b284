use geo::{BoundingRect, Coord, MultiPolygon, Rect};
use serde_json::{Map, Value};

/// One feature from a source layer: areal geometry plus a flat attribute record.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: MultiPolygon<f64>,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: MultiPolygon<f64>, properties: Map<String, Value>) -> Self {
        Self { geometry, properties }
    }

    /// Attribute as text. Numbers are formatted, integral floats without a fraction.
    /// Null, missing and blank values are `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Some(i.to_string()),
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", f as i64)),
                (None, Some(f)) => Some(f.to_string()),
                _ => None,
            },
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Attribute as a number. Numeric strings are parsed.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Features returned by one source query, in the spatial reference `wkid`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    pub wkid: Option<u32>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>, wkid: Option<u32>) -> Self {
        Self { features, wkid }
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Feature> { self.features.iter() }

    /// Append the features of another page of the same query.
    pub fn extend(&mut self, other: FeatureCollection) {
        if self.wkid.is_none() { self.wkid = other.wkid }
        self.features.extend(other.features);
    }

    /// Bounding rectangle of all feature geometries.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features.iter()
            .filter_map(|feature| feature.geometry.bounding_rect())
            .reduce(|a, b| Rect::new(
                Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            ))
    }
}
