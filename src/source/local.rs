use std::path::Path;

use anyhow::{Context, Result};
use geo::{Intersects, Rect};
use tracing::info;

use crate::{
    geom::SpatialIndex,
    io::geojson::read_geojson_file,
    types::{FeatureCollection, PIN_FIELD, Pin},
};
use super::{FeatureSource, Layer};

/// File names read by [`LocalSource::from_dir`].
pub const PARCELS_FILE: &str = "parcels.geojson";
pub const SOILS_FILE: &str = "soils.geojson";
pub const LANDUSE_FILE: &str = "landuse.geojson";

/// One layer with its spatial index.
#[derive(Debug, Clone)]
struct IndexedLayer {
    collection: FeatureCollection,
    index: SpatialIndex,
}

impl IndexedLayer {
    fn new(collection: FeatureCollection) -> Self {
        let index = SpatialIndex::new(collection.iter().map(|feature| &feature.geometry));
        Self { collection, index }
    }

    fn intersecting(&self, envelope: &Rect<f64>) -> FeatureCollection {
        let features = self.index.query(envelope).into_iter()
            .map(|i| &self.collection.features[i])
            .filter(|feature| feature.geometry.intersects(envelope))
            .cloned()
            .collect();
        FeatureCollection::new(features, self.collection.wkid)
    }
}

/// Feature source backed by in-memory collections (e.g. an offline extract of the
/// parcel, soil and land-use layers).
#[derive(Debug, Clone)]
pub struct LocalSource {
    parcels: FeatureCollection,
    soils: IndexedLayer,
    landuse: IndexedLayer,
}

impl LocalSource {
    pub fn new(parcels: FeatureCollection, soils: FeatureCollection, landuse: FeatureCollection) -> Self {
        Self { parcels, soils: IndexedLayer::new(soils), landuse: IndexedLayer::new(landuse) }
    }

    /// Load `parcels.geojson`, `soils.geojson` and `landuse.geojson` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let load = |name: &str| read_geojson_file(&dir.join(name))
            .with_context(|| format!("[source::local] Failed to load {name} from {}", dir.display()));

        let source = Self::new(load(PARCELS_FILE)?, load(SOILS_FILE)?, load(LANDUSE_FILE)?);
        info!(
            dir = %dir.display(),
            parcels = source.parcels.len(),
            soils = source.soils.collection.len(),
            landuse = source.landuse.collection.len(),
            "loaded local features"
        );
        Ok(source)
    }
}

impl FeatureSource for LocalSource {
    fn parcels(&self, pin: &Pin) -> Result<FeatureCollection> {
        let features = self.parcels.iter()
            .filter(|feature| feature.text(PIN_FIELD).is_some_and(|text| Pin::new(&text) == *pin))
            .cloned()
            .collect();
        Ok(FeatureCollection::new(features, self.parcels.wkid))
    }

    fn features_in(&self, layer: Layer, envelope: &Rect<f64>) -> Result<FeatureCollection> {
        Ok(match layer {
            Layer::Soils => self.soils.intersecting(envelope),
            Layer::Landuse => self.landuse.intersecting(envelope),
        })
    }
}

#[cfg(test)]
mod tests {
    use geo::{MultiPolygon, Polygon, coord, polygon};
    use serde_json::{Value, json};

    use super::*;
    use crate::types::Feature;

    fn feature(properties: Value, polygon: Polygon<f64>) -> Feature {
        let Value::Object(properties) = properties else { panic!("properties must be an object") };
        Feature::new(MultiPolygon(vec![polygon]), properties)
    }

    fn source() -> LocalSource {
        let parcels = FeatureCollection::new(vec![
            feature(json!({ "pin": "01-02-300-004", "gross_acres": 40.0 }), Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 }).to_polygon()),
            feature(json!({ "pin": "01-02-300-005", "gross_acres": 10.0 }), Rect::new(coord! { x: 10.0, y: 0.0 }, coord! { x: 20.0, y: 10.0 }).to_polygon()),
        ], Some(3435));
        let soils = FeatureCollection::new(vec![
            feature(json!({ "soil_type": "152A" }), Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 5.0, y: 5.0 }).to_polygon()),
            // Bounding box overlaps the query corner, the triangle itself does not.
            feature(json!({ "soil_type": "tri" }), polygon![(x: 9.0, y: 20.0), (x: 30.0, y: 20.0), (x: 30.0, y: 9.0)]),
        ], Some(3435));
        LocalSource::new(parcels, soils, FeatureCollection::default())
    }

    #[test]
    fn parcels_match_normalized_pin() {
        let source = source();
        let found = source.parcels(&Pin::new("0102300004")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.wkid, Some(3435));
        assert!(source.parcels(&Pin::new("99")).unwrap().is_empty());
    }

    #[test]
    fn envelope_query_tests_true_geometry() {
        let source = source();
        let envelope = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 });
        let soils = source.features_in(Layer::Soils, &envelope).unwrap();
        assert_eq!(soils.len(), 1);
        assert_eq!(soils.features[0].text("soil_type").as_deref(), Some("152A"));
        assert!(source.features_in(Layer::Landuse, &envelope).unwrap().is_empty());
    }

    #[test]
    fn from_dir_reads_three_layers() {
        let tmp = tempfile::tempdir().unwrap();
        let square = json!({ "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]] });
        let layer = |props: Value| json!({ "type": "FeatureCollection", "features": [
            { "type": "Feature", "geometry": square, "properties": props }
        ] });
        std::fs::write(tmp.path().join(PARCELS_FILE), layer(json!({ "pin": "7", "gross_acres": 1 })).to_string()).unwrap();
        std::fs::write(tmp.path().join(SOILS_FILE), layer(json!({ "soil_type": "152A" })).to_string()).unwrap();
        std::fs::write(tmp.path().join(LANDUSE_FILE), layer(json!({ "landuse_type": 2 })).to_string()).unwrap();

        let source = LocalSource::from_dir(tmp.path()).unwrap();
        assert_eq!(source.parcels(&Pin::new("7")).unwrap().len(), 1);

        let envelope = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 });
        assert_eq!(source.features_in(Layer::Landuse, &envelope).unwrap().len(), 1);
    }

    #[test]
    fn from_dir_names_missing_layer() {
        let tmp = tempfile::tempdir().unwrap();
        let err = LocalSource::from_dir(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains(PARCELS_FILE));
    }
}
