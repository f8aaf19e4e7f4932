use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;

use crate::capture::source::FrameSource;
use crate::foundation::error::{BoothError, BoothResult};

/// JPEG quality used for captured stills.
pub const CAPTURE_JPEG_QUALITY: u8 = 90;

/// An encoded still image plus its natural pixel size.
///
/// Cloning is cheap; the encoded bytes are shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    bytes: Arc<[u8]>,
}

impl ImageBuffer {
    /// Wrap already-encoded bytes, reading the dimensions from the image header.
    pub fn from_encoded(bytes: impl Into<Vec<u8>>) -> BoothResult<Self> {
        let bytes: Vec<u8> = bytes.into();
        let (width, height) = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .context("sniff image format")?
            .into_dimensions()
            .context("read image dimensions")?;
        Ok(Self {
            width,
            height,
            bytes: bytes.into(),
        })
    }

    /// Encode an RGBA frame as a JPEG still. Alpha is dropped.
    pub fn encode_jpeg(frame: &image::RgbaImage, quality: u8) -> BoothResult<Self> {
        let (width, height) = frame.dimensions();
        let rgb = image::DynamicImage::ImageRgba8(frame.clone()).into_rgb8();

        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality)
            .encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| BoothError::encode(format!("jpeg encode {width}x{height}: {e}")))?;

        Ok(Self {
            width,
            height,
            bytes: buf.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Grab the source's current frame, mirror it horizontally and encode it.
///
/// Runs synchronously against one snapshot. The output keeps the frame's native size.
pub fn capture<S: FrameSource + ?Sized>(source: &mut S) -> BoothResult<ImageBuffer> {
    let frame = source.current_frame().ok_or(BoothError::NoFrameAvailable)?;
    if frame.width() == 0 || frame.height() == 0 {
        return Err(BoothError::NoFrameAvailable);
    }

    let mirrored = image::imageops::flip_horizontal(&frame);
    let still = ImageBuffer::encode_jpeg(&mirrored, CAPTURE_JPEG_QUALITY)?;

    tracing::debug!(
        width = still.width(),
        height = still.height(),
        bytes = still.bytes().len(),
        "captured still"
    );
    Ok(still)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/frame.rs"]
mod tests;
