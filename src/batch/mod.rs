//! Batch processing: error reporting, row output and the driver loop.

mod driver;
mod report;
mod sink;

pub use driver::{BatchOutcome, dedup_pins, run_batch};
pub use report::{ErrorMode, ErrorSink, HaltSink, WarnSink, WriteSink};
pub use sink::{RowSink, TsvSink};
