use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use kurbo::{Point, Rect};

use crate::foundation::color::Rgba8;
use crate::foundation::error::{BoothError, BoothResult};
use crate::strip::decode::DecodedImage;
use crate::strip::style::TextStyle;
use crate::strip::text::{FontFace, TextBrush, TextShaper};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// 2D drawing target the compositor paints a strip onto.
///
/// Draw calls are applied in call order; later calls paint over earlier ones.
pub trait RasterSurface {
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, rect: Rect, color: Rgba8);

    /// Fill `rect` with a top-to-bottom gradient through evenly spaced `stops`.
    fn fill_vertical_gradient(&mut self, rect: Rect, stops: &[Rgba8]) -> BoothResult<()>;

    fn stroke_rect(&mut self, rect: Rect, color: Rgba8, line_width: f64);

    /// Draw `image` scaled to cover `dest` exactly.
    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> BoothResult<()>;

    /// Draw a single line with its baseline at `anchor.y`; `align` picks which end of the line
    /// sits at `anchor.x`.
    fn draw_text(
        &mut self,
        text: &str,
        anchor: Point,
        align: TextAlign,
        style: &TextStyle,
    ) -> BoothResult<()>;

    /// Rasterize everything drawn so far and encode it as JPEG.
    fn export_jpeg(&mut self, quality: u8) -> BoothResult<Vec<u8>>;
}

/// CPU surface powered by `vello_cpu`, with Parley for text.
pub struct CpuSurface {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    text: Option<TextShaper>,
}

impl CpuSurface {
    pub fn new(width: u32, height: u32, font: Option<&FontFace>) -> BoothResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| BoothError::validation(format!("surface width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| BoothError::validation(format!("surface height {height} exceeds u16")))?;
        if w == 0 || h == 0 {
            return Err(BoothError::validation("surface must be at least 1x1"));
        }
        let text = font.map(TextShaper::new).transpose()?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
            text,
        })
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    fn reset_transforms(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    /// Render the recorded scene and return straight-alpha RGBA8 bytes.
    pub fn render_rgba8(&mut self) -> Vec<u8> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        let mut bytes = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut bytes);
        bytes
    }
}

impl RasterSurface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.reset_transforms();
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, stops: &[Rgba8]) -> BoothResult<()> {
        let w = rect.width().round().max(1.0) as u32;
        let h = rect.height().round().max(1.0) as u32;
        let bytes = vertical_gradient_premul(stops, w, h)?;
        let paint = image_from_premul(&bytes, w, h)?;

        self.reset_transforms();
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((rect.x0, rect.y0)));
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
        self.reset_transforms();
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba8, line_width: f64) {
        if line_width <= 0.0 {
            return;
        }
        self.reset_transforms();
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(line_width));
        self.ctx.stroke_rect(&rect_to_cpu(rect));
    }

    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> BoothResult<()> {
        let w = dest.width().round().max(1.0) as u32;
        let h = dest.height().round().max(1.0) as u32;

        // Resample once on the CPU; the paint sampler does not filter large downscales.
        let scaled = if (w, h) == image.rgba.dimensions() {
            image.rgba.as_ref().clone()
        } else {
            image::imageops::resize(
                image.rgba.as_ref(),
                w,
                h,
                image::imageops::FilterType::Triangle,
            )
        };

        let mut premul = scaled.into_raw();
        premultiply_rgba8_in_place(&mut premul);
        let paint = image_from_premul(&premul, w, h)?;

        self.reset_transforms();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            dest.x0.round(),
            dest.y0.round(),
        )));
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
        self.reset_transforms();
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        anchor: Point,
        align: TextAlign,
        style: &TextStyle,
    ) -> BoothResult<()> {
        let Some(shaper) = self.text.as_mut() else {
            return Ok(());
        };
        let layout = shaper.layout_line(text, style.size_px, TextBrush::from(style.color))?;
        let Some(first) = layout.lines().next() else {
            return Ok(());
        };
        let baseline = f64::from(first.metrics().baseline);
        let width = f64::from(layout.width());
        let dx = match align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -width / 2.0,
            TextAlign::Right => -width,
        };

        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            anchor.x + dx,
            anchor.y - baseline,
        )));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let shaped_with = run.run().font();
                let font = shaper.font_for_run(
                    shaped_with.data.id(),
                    shaped_with.data.data(),
                    shaped_with.index,
                );
                let TextBrush([r, g, b, a]) = run.style().brush;
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.reset_transforms();
        Ok(())
    }

    fn export_jpeg(&mut self, quality: u8) -> BoothResult<Vec<u8>> {
        let rgba = self.render_rgba8();
        let (w, h) = self.size();
        let rgb = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect::<Vec<u8>>();

        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality)
            .encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
            .map_err(|e| BoothError::encode(format!("jpeg encode {w}x{h}: {e}")))?;
        Ok(out)
    }
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

/// Premultiplied RGBA8 pixels of a vertical gradient through evenly spaced `stops`.
pub(crate) fn vertical_gradient_premul(stops: &[Rgba8], w: u32, h: u32) -> BoothResult<Vec<u8>> {
    if stops.is_empty() {
        return Err(BoothError::validation("gradient needs at least one stop"));
    }
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    let h1 = (h.max(1) - 1) as f32;
    let segments = (stops.len() - 1) as f32;
    for y in 0..h {
        let t = if h1 <= 0.0 { 0.0 } else { (y as f32) / h1 };
        let c = if stops.len() == 1 {
            stops[0]
        } else {
            let pos = t * segments;
            let seg = (pos.floor() as usize).min(stops.len() - 2);
            stops[seg].lerp(stops[seg + 1], pos - seg as f32)
        };
        let px = c.premultiplied();
        let row = (y as usize) * (w as usize) * 4;
        for x in 0..w as usize {
            bytes[row + x * 4..row + x * 4 + 4].copy_from_slice(&px);
        }
    }
    Ok(bytes)
}

fn image_from_premul(bytes: &[u8], width: u32, height: u32) -> BoothResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BoothError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BoothError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(BoothError::validation("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strip/surface.rs"]
mod tests;
