use std::sync::Arc;

use rayon::prelude::*;

use crate::capture::frame::ImageBuffer;
use crate::foundation::error::{BoothError, BoothResult};

/// Decoded straight-alpha RGBA8 raster, ready to draw.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub rgba: Arc<image::RgbaImage>,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}

impl From<image::RgbaImage> for DecodedImage {
    fn from(rgba: image::RgbaImage) -> Self {
        Self {
            rgba: Arc::new(rgba),
        }
    }
}

/// Decode the image at position `index` of a strip.
pub fn decode_image(index: usize, image: &ImageBuffer) -> BoothResult<DecodedImage> {
    let dyn_img =
        image::load_from_memory(image.bytes()).map_err(|e| BoothError::decode(index, e))?;
    Ok(DecodedImage::from(dyn_img.into_rgba8()))
}

/// Decode every image on the rayon pool and return them in input order.
///
/// All decodes finish before this returns. When several fail, the error for the lowest index is
/// reported.
pub fn decode_all(images: &[ImageBuffer]) -> BoothResult<Vec<DecodedImage>> {
    let results = images
        .par_iter()
        .enumerate()
        .map(|(i, img)| decode_image(i, img))
        .collect::<Vec<_>>();
    results.into_iter().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/strip/decode.rs"]
mod tests;
