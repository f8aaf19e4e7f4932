//! Live frame sources and the single-still capturer.

pub(crate) mod frame;
pub(crate) mod source;
