use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;
use crate::foundation::error::{BoothError, BoothResult};

/// Color and size of one text element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextStyle {
    pub size_px: f32,
    pub color: Rgba8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderStyle {
    pub color: Rgba8,
    pub line_width: f64,
    /// Distance from the canvas edge to the stroked rectangle.
    pub inset: f64,
}

/// Look of a strip. The defaults reproduce the classic purple/pink/cyan strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StripStyle {
    /// Top, middle and bottom gradient stops.
    pub gradient: [Rgba8; 3],
    pub outer_border: BorderStyle,
    pub inner_border: BorderStyle,
    pub photo_background: Rgba8,

    pub title_text: String,
    pub title: TextStyle,
    /// `chrono` format string for the header date.
    pub date_format: String,
    pub date: TextStyle,
    pub index_label: TextStyle,
    pub footer_text: String,
    pub footer: TextStyle,

    pub jpeg_quality: u8,

    /// Font file used for every text element. When unset, a bold sans-serif system font is
    /// looked up if `system_fonts` is on; otherwise text is not drawn.
    pub font_path: Option<PathBuf>,
    pub system_fonts: bool,
}

const YELLOW: Rgba8 = Rgba8::rgb(0xFB, 0xBF, 0x24);

impl Default for StripStyle {
    fn default() -> Self {
        Self {
            gradient: [
                Rgba8::rgb(0x8B, 0x5C, 0xF6),
                Rgba8::rgb(0xEC, 0x48, 0x99),
                Rgba8::rgb(0x06, 0xB6, 0xD4),
            ],
            outer_border: BorderStyle {
                color: YELLOW,
                line_width: 8.0,
                inset: 4.0,
            },
            inner_border: BorderStyle {
                color: Rgba8::WHITE,
                line_width: 2.0,
                inset: 12.0,
            },
            photo_background: Rgba8::WHITE,
            title_text: "PHOTOBOOTH".to_owned(),
            title: TextStyle {
                size_px: 24.0,
                color: Rgba8::WHITE,
            },
            date_format: "%-m/%-d/%Y".to_owned(),
            date: TextStyle {
                size_px: 14.0,
                color: YELLOW,
            },
            index_label: TextStyle {
                size_px: 16.0,
                color: YELLOW,
            },
            footer_text: "✨ TOTALLY RAD ✨".to_owned(),
            footer: TextStyle {
                size_px: 12.0,
                color: Rgba8::WHITE,
            },
            jpeg_quality: 90,
            font_path: None,
            system_fonts: true,
        }
    }
}

impl StripStyle {
    /// Same look, but no text at all. Useful where fonts vary between machines.
    pub fn without_text(mut self) -> Self {
        self.font_path = None;
        self.system_fonts = false;
        self
    }

    pub fn validate(&self) -> BoothResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(BoothError::validation("jpeg_quality must be in 1..=100"));
        }
        for (name, t) in [
            ("title", self.title),
            ("date", self.date),
            ("index_label", self.index_label),
            ("footer", self.footer),
        ] {
            if !t.size_px.is_finite() || t.size_px <= 0.0 {
                return Err(BoothError::validation(format!(
                    "{name}.size_px must be finite and > 0"
                )));
            }
        }
        for (name, b) in [
            ("outer_border", self.outer_border),
            ("inner_border", self.inner_border),
        ] {
            if !(b.line_width.is_finite() && b.line_width >= 0.0) {
                return Err(BoothError::validation(format!(
                    "{name}.line_width must be finite and >= 0"
                )));
            }
            if !(b.inset.is_finite() && b.inset >= 0.0) {
                return Err(BoothError::validation(format!(
                    "{name}.inset must be finite and >= 0"
                )));
            }
        }
        // chrono reports bad specifiers only while formatting.
        if chrono::format::StrftimeItems::new(&self.date_format)
            .any(|item| matches!(item, chrono::format::Item::Error))
        {
            return Err(BoothError::validation(format!(
                "invalid date_format \"{}\"",
                self.date_format
            )));
        }
        Ok(())
    }
}
