use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;

use crate::capture::frame::ImageBuffer;
use crate::foundation::error::{BoothError, BoothResult};
use crate::strip::decode::{DecodedImage, decode_all};
use crate::strip::layout::StripLayout;
use crate::strip::style::StripStyle;
use crate::strip::surface::{CpuSurface, RasterSurface, TextAlign};
use crate::strip::text::{FontFace, resolve_font};

/// The finished, encoded strip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeArtifact {
    pub width: u32,
    pub height: u32,
    bytes: Arc<[u8]>,
}

impl CompositeArtifact {
    pub const MIME_TYPE: &'static str = "image/jpeg";
    pub const EXTENSION: &'static str = "jpg";

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn save(&self, path: &Path) -> BoothResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("write strip '{}'", path.display()))?;
        Ok(())
    }
}

/// Lays captured photos out into a styled strip.
pub struct StripCompositor {
    style: StripStyle,
    font: Option<FontFace>,
}

impl StripCompositor {
    /// Validate `style` and resolve its font once, up front.
    pub fn new(style: StripStyle) -> BoothResult<Self> {
        style.validate()?;
        let font = resolve_font(style.font_path.as_deref(), style.system_fonts)?;
        Ok(Self { style, font })
    }

    pub fn style(&self) -> &StripStyle {
        &self.style
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Compose a strip dated today (local time).
    pub fn compose(&self, images: &[ImageBuffer]) -> BoothResult<CompositeArtifact> {
        self.compose_on(images, chrono::Local::now().date_naive())
    }

    /// Compose a strip with an explicit header date. Identical inputs give identical bytes.
    #[tracing::instrument(skip_all, fields(photos = images.len(), date = %date))]
    pub fn compose_on(
        &self,
        images: &[ImageBuffer],
        date: NaiveDate,
    ) -> BoothResult<CompositeArtifact> {
        if images.is_empty() {
            return Err(BoothError::EmptyInput);
        }
        let layout = StripLayout::for_count(images.len() as u32)?;

        // Every decode is joined, in capture order, before the first draw call.
        let decoded = decode_all(images)?;

        let mut surface = CpuSurface::new(layout.width, layout.height(), self.font.as_ref())?;
        self.paint(&mut surface, &decoded, &layout, date)?;
        let bytes = surface.export_jpeg(self.style.jpeg_quality)?;

        tracing::info!(
            width = layout.width,
            height = layout.height(),
            bytes = bytes.len(),
            "strip composed"
        );
        Ok(CompositeArtifact {
            width: layout.width,
            height: layout.height(),
            bytes: bytes.into(),
        })
    }

    /// Draw a strip onto any surface. `photos.len()` must equal `layout.count`.
    pub fn paint<R: RasterSurface + ?Sized>(
        &self,
        surface: &mut R,
        photos: &[DecodedImage],
        layout: &StripLayout,
        date: NaiveDate,
    ) -> BoothResult<()> {
        if photos.is_empty() {
            return Err(BoothError::EmptyInput);
        }
        if photos.len() != layout.count as usize {
            return Err(BoothError::validation(format!(
                "layout is for {} photos, got {}",
                layout.count,
                photos.len()
            )));
        }
        let s = &self.style;

        surface.fill_vertical_gradient(layout.canvas_rect(), &s.gradient)?;
        surface.stroke_rect(
            layout.border_rect(s.outer_border.inset),
            s.outer_border.color,
            s.outer_border.line_width,
        );
        surface.stroke_rect(
            layout.border_rect(s.inner_border.inset),
            s.inner_border.color,
            s.inner_border.line_width,
        );

        surface.draw_text(&s.title_text, layout.title_anchor(), TextAlign::Center, &s.title)?;
        let date_text = date.format(&s.date_format).to_string();
        surface.draw_text(&date_text, layout.date_anchor(), TextAlign::Center, &s.date)?;

        for (i, photo) in photos.iter().enumerate() {
            let i = i as u32;
            surface.fill_rect(layout.slot_rect(i), s.photo_background);
            let dest = layout.photo_rect(i, photo.width(), photo.height());
            surface.draw_image(photo, dest)?;
            surface.draw_text(
                &(i + 1).to_string(),
                layout.index_anchor(i),
                TextAlign::Right,
                &s.index_label,
            )?;
        }

        surface.draw_text(
            &s.footer_text,
            layout.footer_anchor(),
            TextAlign::Center,
            &s.footer,
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strip/compositor.rs"]
mod tests;
