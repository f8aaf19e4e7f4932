use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{BoothError, BoothResult};

/// Raw font bytes plus the face index inside the file (non-zero for collections).
#[derive(Clone, Debug)]
pub struct FontFace {
    pub(crate) bytes: Arc<Vec<u8>>,
    pub(crate) index: u32,
}

impl FontFace {
    pub fn from_file(path: &Path) -> BoothResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Ok(Self {
            bytes: Arc::new(bytes),
            index: 0,
        })
    }

    /// Find a bold sans-serif face among the installed system fonts.
    pub fn system_bold_sans() -> Option<Self> {
        use usvg::fontdb::{Database, Family, Query, Weight};

        let mut db = Database::new();
        db.load_system_fonts();

        let families = [
            Family::Name("Arial"),
            Family::Name("Helvetica"),
            Family::Name("DejaVu Sans"),
            Family::Name("Liberation Sans"),
            Family::SansSerif,
        ];
        let id = db
            .query(&Query {
                families: &families,
                weight: Weight::BOLD,
                ..Query::default()
            })
            .or_else(|| db.faces().next().map(|f| f.id))?;

        db.with_face_data(id, |data, index| Self {
            bytes: Arc::new(data.to_vec()),
            index,
        })
    }
}

/// Resolve the font for strip text: explicit file first, then system fonts if allowed.
pub(crate) fn resolve_font(
    path: Option<&Path>,
    system_fonts: bool,
) -> BoothResult<Option<FontFace>> {
    if let Some(p) = path {
        return FontFace::from_file(p).map(Some);
    }
    if !system_fonts {
        return Ok(None);
    }
    let face = FontFace::system_bold_sans();
    if face.is_none() {
        tracing::warn!("no system font found; strip text will not be drawn");
    }
    Ok(face)
}

/// Brush carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush(pub(crate) [u8; 4]);

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self([c.r, c.g, c.b, c.a])
    }
}

/// Parley contexts bound to a single registered font family.
///
/// Runs may be shaped with a fallback face; each run is drawn with the face that shaped it.
pub(crate) struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
    /// Draw-side fonts keyed by (blob id, face index) of the shaping font.
    run_fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl TextShaper {
    pub(crate) fn new(face: &FontFace) -> BoothResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            BoothError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| BoothError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            run_fonts: HashMap::new(),
        })
    }

    /// Font to draw a glyph run with, given the blob id, bytes and face index of the font that
    /// shaped it.
    pub(crate) fn font_for_run(
        &mut self,
        blob_id: u64,
        bytes: &[u8],
        index: u32,
    ) -> vello_cpu::peniko::FontData {
        self.run_fonts
            .entry((blob_id, index))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.to_vec()),
                    index,
                )
            })
            .clone()
    }

    /// Shape one unwrapped line of text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrush,
    ) -> BoothResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(BoothError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strip/text.rs"]
mod tests;
