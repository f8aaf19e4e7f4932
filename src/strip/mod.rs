//! Strip composition: geometry, style, decoding, and the raster surface the compositor paints
//! onto.

pub(crate) mod compositor;
pub(crate) mod decode;
pub(crate) mod layout;
pub(crate) mod style;
pub(crate) mod surface;
pub(crate) mod text;
