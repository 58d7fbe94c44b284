//! SVG format writing operations for overlap diagnostics.

mod color;
mod overlap;
mod proj;
mod writer;

pub(crate) use color::*;
pub(crate) use overlap::*;
pub(crate) use proj::*;
pub(crate) use writer::*;
