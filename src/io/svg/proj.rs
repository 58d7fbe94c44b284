use std::io::Write;

use anyhow::Result;
use geo::{Coord, CoordsIter, LineString, MultiPolygon, Rect};

/// Projection function: planar x/y -> SVG coords (x,y)
pub(crate) type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// Fit `bounds` into a `width` pixel wide canvas with `margin` on every side.
/// Returns the canvas height and the projection (y axis flipped).
pub(crate) fn fit_projection(bounds: &Rect<f64>, width: f64, margin: f64) -> (f64, Box<Projection>) {
    let span_x = bounds.width().max(f64::EPSILON);
    let span_y = bounds.height().max(f64::EPSILON);
    let scale = (width - 2.0 * margin) / span_x;
    let height = span_y * scale + 2.0 * margin;

    let (min_x, max_y) = (bounds.min().x, bounds.max().y);
    let project = move |c: &Coord<f64>| (margin + (c.x - min_x) * scale, margin + (max_y - c.y) * scale);
    (height, Box::new(project))
}

/// Draw each MultiPolygon as one path with the given class and optional fill.
pub(crate) fn draw_paths(
    writer: &mut impl Write,
    polygons: &[&MultiPolygon<f64>],
    class: &str,
    fills: Option<&[String]>,
    project: &Projection,
) -> Result<()> {
    for (i, polygon) in polygons.iter().enumerate() {
        let d = multipolygon_to_path(polygon, project);
        match fills.and_then(|fills| fills.get(i)) {
            Some(fill) => writeln!(writer, r#"<path class="{class}" fill-rule="evenodd" d="{d}" style="fill:{fill}"/>"#)?,
            None => writeln!(writer, r#"<path class="{class}" fill-rule="evenodd" d="{d}"/>"#)?,
        }
    }
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), project));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, project));
        }
    }

    out
}

/// Build a compact SVG path string for a LineString (ring).
fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter()
        .map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}
