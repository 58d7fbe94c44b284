mod fs;
mod round;

pub(crate) use fs::*;
pub(crate) use round::*;
