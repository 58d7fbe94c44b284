//! SVG writing operations.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};

use crate::common::ensure_parent_exists;

pub(crate) struct SvgWriter {
    writer: BufWriter<File>
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl Write for SvgWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.writer.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.writer.flush() }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> { self.writer.write_all(buf) }
}

impl SvgWriter {
    /// Create a new SVG writer to a file path
    pub(crate) fn new(path: &Path) -> Result<Self> {
        ensure_parent_exists(path)?;
        let file = File::create(path)
            .with_context(|| format!("[io::svg] Failed to create {}", path.display()))?;

        Ok(Self { writer: BufWriter::new(file) })
    }

    /// Write the XML declaration and opening <svg> tag, recording the planar bounds drawn.
    pub(crate) fn write_header(&mut self, width: f64, height: f64, bounds: &geo::Rect) -> Result<()> {
        writeln!(self, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
        writeln!(self, r##"<svg xmlns="http://www.w3.org/2000/svg"
        width="{width}" height="{height}"
        viewBox="0 0 {width} {height}"
        data-x-min="{x_min}" data-x-max="{x_max}"
        data-y-min="{y_min}" data-y-max="{y_max}">"##,
            x_min = bounds.min().x,
            x_max = bounds.max().x,
            y_min = bounds.min().y,
            y_max = bounds.max().y,
        )?;
        writeln!(self, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
        Ok(())
    }

    /// Write styles for soil fills, land-use outlines and the parcel boundary.
    pub(crate) fn write_styles(&mut self) -> Result<()> {
        writeln!(self, r##"<defs>
<style>
    .soil {{ stroke: #374151; stroke-width: 0.4; fill-opacity: 0.75; }}
    .landuse {{ fill: none; stroke: #2563eb; stroke-width: 1.2; stroke-dasharray: 4 3; }}
    .parcel {{ fill: none; stroke: #dc2626; stroke-width: 2; vector-effect: non-scaling-stroke; }}
</style>
</defs>"##)?;
        Ok(())
    }

    /// Write a text line at the top-left corner.
    pub(crate) fn write_caption(&mut self, text: &str) -> Result<()> {
        let escaped = text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;");
        writeln!(self, r##"<text x="8" y="18" font-family="sans-serif" font-size="13">{escaped}</text>"##)?;
        Ok(())
    }

    /// Write the closing </svg> tag and flush.
    pub(crate) fn write_footer(&mut self) -> Result<()> {
        writeln!(self, "</svg>")?;
        self.flush()?;
        Ok(())
    }
}
