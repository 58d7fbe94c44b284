use geo::{BoundingRect, MultiPolygon, Rect};
use rstar::{RTree, AABB};

use super::BoundingBox;

/// R-tree over feature bounding boxes, answering envelope queries with feature indices.
#[derive(Debug, Clone)]
pub(crate) struct SpatialIndex {
    rtree: RTree<BoundingBox>,
}

impl SpatialIndex {
    /// Index geometries by position. Empty geometries are never returned by queries.
    pub(crate) fn new<'a>(geometries: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                geometries.into_iter().enumerate()
                    .filter_map(|(i, geometry)| Some(BoundingBox::new(i, geometry.bounding_rect()?)))
                    .collect()
            ),
        }
    }

    /// Indices of geometries whose bounding box intersects `envelope`, in ascending order.
    pub(crate) fn query(&self, envelope: &Rect<f64>) -> Vec<usize> {
        let search = AABB::from_corners(envelope.min().into(), envelope.max().into());
        let mut hits = self.rtree.locate_in_envelope_intersecting(&search)
            .map(|bbox| bbox.idx())
            .collect::<Vec<_>>();
        hits.sort_unstable();
        hits
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.rtree.size() }
}

#[cfg(test)]
mod tests {
    use geo::coord;

    use super::*;

    fn square(x: f64, y: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Rect::new(coord! { x: x, y: y }, coord! { x: x + 1.0, y: y + 1.0 }).to_polygon()])
    }

    #[test]
    fn query_returns_sorted_hits() {
        let shapes = [square(5.0, 5.0), square(0.0, 0.0), MultiPolygon(vec![]), square(0.5, 0.5)];
        let index = SpatialIndex::new(&shapes);
        assert_eq!(index.len(), 3);

        let hits = index.query(&Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 2.0, y: 2.0 }));
        assert_eq!(hits, vec![1, 3]);

        // Touching envelopes count as intersecting.
        let hits = index.query(&Rect::new(coord! { x: 6.0, y: 6.0 }, coord! { x: 7.0, y: 7.0 }));
        assert_eq!(hits, vec![0]);

        assert!(index.query(&Rect::new(coord! { x: 20.0, y: 20.0 }, coord! { x: 21.0, y: 21.0 })).is_empty());
    }
}
