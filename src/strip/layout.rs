use kurbo::{Point, Rect};

use crate::foundation::error::{BoothError, BoothResult};

/// Geometry of a strip holding `count` photos. A pure function of `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub count: u32,
    pub width: u32,
    pub photo_slot_height: u32,
    pub padding: u32,
    pub header_height: u32,
    pub footer_height: u32,
}

/// Gap kept between a photo and the edge of its white slot, summed over both sides.
const PHOTO_MARGIN: f64 = 16.0;

impl StripLayout {
    pub const WIDTH: u32 = 400;
    pub const PHOTO_SLOT_HEIGHT: u32 = 300;
    pub const PADDING: u32 = 20;
    pub const HEADER_HEIGHT: u32 = 60;
    pub const FOOTER_HEIGHT: u32 = 40;

    pub fn for_count(count: u32) -> BoothResult<Self> {
        if count == 0 {
            return Err(BoothError::EmptyInput);
        }
        Ok(Self {
            count,
            width: Self::WIDTH,
            photo_slot_height: Self::PHOTO_SLOT_HEIGHT,
            padding: Self::PADDING,
            header_height: Self::HEADER_HEIGHT,
            footer_height: Self::FOOTER_HEIGHT,
        })
    }

    /// `header + footer + n * slot + (n + 1) * padding`, saturating.
    pub fn height(&self) -> u32 {
        let n = self.count;
        self.header_height
            .saturating_add(self.footer_height)
            .saturating_add(n.saturating_mul(self.photo_slot_height))
            .saturating_add(n.saturating_add(1).saturating_mul(self.padding))
    }

    pub fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height()))
    }

    /// Top edge of slot `i` (0-based).
    pub fn slot_top(&self, i: u32) -> f64 {
        f64::from(self.header_height)
            + f64::from(self.padding)
            + f64::from(i) * f64::from(self.photo_slot_height + self.padding)
    }

    /// White background rectangle of slot `i`.
    pub fn slot_rect(&self, i: u32) -> Rect {
        let y = self.slot_top(i);
        let p = f64::from(self.padding);
        Rect::new(
            p,
            y,
            f64::from(self.width) - p,
            y + f64::from(self.photo_slot_height),
        )
    }

    /// Largest area a photo may cover inside a slot.
    pub fn photo_box(&self) -> (f64, f64) {
        (
            f64::from(self.width) - 2.0 * f64::from(self.padding) - PHOTO_MARGIN,
            f64::from(self.photo_slot_height) - PHOTO_MARGIN,
        )
    }

    /// Where a `src_w x src_h` photo lands in slot `i`: fitted into [`Self::photo_box`] with its
    /// aspect ratio kept, centered horizontally on the strip and vertically in the slot.
    pub fn photo_rect(&self, i: u32, src_w: u32, src_h: u32) -> Rect {
        let (box_w, box_h) = self.photo_box();
        let (w, h) = fit_within(f64::from(src_w), f64::from(src_h), box_w, box_h);
        let x = (f64::from(self.width) - w) / 2.0;
        let y = self.slot_top(i) + (f64::from(self.photo_slot_height) - h) / 2.0;
        Rect::new(x, y, x + w, y + h)
    }

    /// Stroke rectangle of a border drawn `inset` pixels in from every canvas edge.
    pub fn border_rect(&self, inset: f64) -> Rect {
        self.canvas_rect().inset(-inset)
    }

    pub fn title_anchor(&self) -> Point {
        Point::new(f64::from(self.width) / 2.0, 40.0)
    }

    pub fn date_anchor(&self) -> Point {
        Point::new(f64::from(self.width) / 2.0, 55.0)
    }

    /// Right-aligned baseline anchor of the 1-based index label in slot `i`.
    pub fn index_anchor(&self, i: u32) -> Point {
        Point::new(f64::from(self.width) - 30.0, self.slot_top(i) + 25.0)
    }

    pub fn footer_anchor(&self) -> Point {
        Point::new(
            f64::from(self.width) / 2.0,
            f64::from(self.height()) - 20.0,
        )
    }
}

/// Scale `src_w x src_h` to fit inside `box_w x box_h`, keeping the aspect ratio.
///
/// A source wider than the box is clamped to the box width; anything else is clamped to the
/// box height. Degenerate sources fill the box.
pub fn fit_within(src_w: f64, src_h: f64, box_w: f64, box_h: f64) -> (f64, f64) {
    if !(src_w > 0.0 && src_h > 0.0) {
        return (box_w, box_h);
    }
    let aspect = src_w / src_h;
    if aspect > box_w / box_h {
        (box_w, box_w / aspect)
    } else {
        (box_h * aspect, box_h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strip/layout.rs"]
mod tests;
