use super::*;

fn runs_of(layout: &parley::Layout<TextBrush>) -> Vec<(u64, Vec<u8>, u32)> {
    let mut out = Vec::new();
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let font = run.run().font();
            out.push((font.data.id(), font.data.data().to_vec(), font.index));
        }
    }
    out
}

#[test]
fn each_glyph_run_is_drawn_with_the_face_that_shaped_it() {
    let Some(face) = FontFace::system_bold_sans() else {
        return;
    };
    let mut shaper = TextShaper::new(&face).unwrap();
    // U+2728 is missing from most sans faces and may come from a fallback font.
    let layout = shaper
        .layout_line("✨ TOTALLY RAD ✨", 12.0, TextBrush::default())
        .unwrap();

    let runs = runs_of(&layout);
    assert!(!runs.is_empty());
    for (id, bytes, index) in runs {
        let drawn = shaper.font_for_run(id, &bytes, index);
        assert_eq!(drawn.index, index);
        assert!(drawn.data.data() == bytes.as_slice());
    }
}

#[test]
fn run_fonts_are_cached_per_blob_and_face() {
    let Some(face) = FontFace::system_bold_sans() else {
        return;
    };
    let mut shaper = TextShaper::new(&face).unwrap();
    let a = shaper.font_for_run(7, &face.bytes, 0);
    let b = shaper.font_for_run(7, &face.bytes, 0);
    let c = shaper.font_for_run(7, &face.bytes, 1);

    assert_eq!(a.data.id(), b.data.id());
    assert_ne!(a.index, c.index);
}

#[test]
fn layout_rejects_bad_sizes() {
    let Some(face) = FontFace::system_bold_sans() else {
        return;
    };
    let mut shaper = TextShaper::new(&face).unwrap();
    assert!(shaper.layout_line("x", 0.0, TextBrush::default()).is_err());
    assert!(shaper.layout_line("x", f32::NAN, TextBrush::default()).is_err());
}

#[test]
fn resolve_font_without_sources_is_none() {
    assert!(resolve_font(None, false).unwrap().is_none());
    assert!(resolve_font(Some(Path::new("target/no/such/font.ttf")), true).is_err());
}
