use super::*;

fn pixel(bytes: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]
}

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= tol)
}

#[test]
fn new_rejects_oversized_and_empty_surfaces() {
    assert!(CpuSurface::new(70_000, 10, None).is_err());
    assert!(CpuSurface::new(10, 70_000, None).is_err());
    assert!(CpuSurface::new(0, 10, None).is_err());

    let s = CpuSurface::new(400, 1400, None).unwrap();
    assert_eq!(s.size(), (400, 1400));
    assert!(!s.has_text());
}

#[test]
fn fill_rect_covers_exactly_the_rect() {
    let mut s = CpuSurface::new(8, 8, None).unwrap();
    s.fill_rect(Rect::new(2.0, 2.0, 6.0, 6.0), Rgba8::rgb(10, 200, 30));
    let px = s.render_rgba8();

    assert_eq!(pixel(&px, 8, 3, 3), [10, 200, 30, 255]);
    assert_eq!(pixel(&px, 8, 0, 0)[3], 0);
    assert_eq!(pixel(&px, 8, 7, 7)[3], 0);
}

#[test]
fn later_draws_paint_over_earlier_ones() {
    let mut s = CpuSurface::new(4, 4, None).unwrap();
    s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Rgba8::WHITE);
    s.fill_rect(Rect::new(0.0, 0.0, 2.0, 4.0), Rgba8::rgb(0, 0, 0));
    let px = s.render_rgba8();

    assert_eq!(pixel(&px, 4, 1, 1), [0, 0, 0, 255]);
    assert_eq!(pixel(&px, 4, 3, 1), [255, 255, 255, 255]);
}

#[test]
fn gradient_rows_interpolate_between_stops() {
    let stops = [Rgba8::rgb(0, 0, 0), Rgba8::rgb(200, 100, 0), Rgba8::WHITE];
    let bytes = vertical_gradient_premul(&stops, 2, 5).unwrap();

    assert_eq!(pixel(&bytes, 2, 0, 0), [0, 0, 0, 255]);
    assert!(close(pixel(&bytes, 2, 1, 2), [200, 100, 0, 255], 1));
    assert_eq!(pixel(&bytes, 2, 0, 4), [255, 255, 255, 255]);
    assert!(close(pixel(&bytes, 2, 0, 1), [100, 50, 0, 255], 1));

    assert!(vertical_gradient_premul(&[], 2, 2).is_err());
    let single = vertical_gradient_premul(&[Rgba8::WHITE], 1, 3).unwrap();
    assert!(single.iter().all(|&b| b == 255));
}

#[test]
fn gradient_fill_lands_on_surface() {
    let mut s = CpuSurface::new(6, 11, None).unwrap();
    s.fill_vertical_gradient(
        Rect::new(0.0, 0.0, 6.0, 11.0),
        &[Rgba8::rgb(255, 0, 0), Rgba8::rgb(0, 0, 255)],
    )
    .unwrap();
    let px = s.render_rgba8();

    assert!(close(pixel(&px, 6, 3, 0), [255, 0, 0, 255], 2));
    assert!(close(pixel(&px, 6, 3, 10), [0, 0, 255, 255], 2));
    assert!(close(pixel(&px, 6, 3, 5), [128, 0, 128, 255], 3));
}

#[test]
fn stroke_rect_draws_only_the_outline() {
    let mut s = CpuSurface::new(20, 20, None).unwrap();
    s.stroke_rect(Rect::new(4.0, 4.0, 16.0, 16.0), Rgba8::rgb(255, 0, 0), 2.0);
    let px = s.render_rgba8();

    assert_eq!(pixel(&px, 20, 10, 4), [255, 0, 0, 255]);
    assert_eq!(pixel(&px, 20, 4, 10), [255, 0, 0, 255]);
    assert_eq!(pixel(&px, 20, 10, 10)[3], 0);
    assert_eq!(pixel(&px, 20, 0, 0)[3], 0);
}

#[test]
fn zero_width_stroke_is_a_no_op() {
    let mut s = CpuSurface::new(8, 8, None).unwrap();
    s.stroke_rect(Rect::new(1.0, 1.0, 7.0, 7.0), Rgba8::WHITE, 0.0);
    assert!(s.render_rgba8().iter().all(|&b| b == 0));
}

#[test]
fn draw_image_scales_into_dest() {
    let red = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
    let mut s = CpuSurface::new(10, 10, None).unwrap();
    s.draw_image(&DecodedImage::from(red), Rect::new(3.0, 3.0, 7.0, 7.0))
        .unwrap();
    let px = s.render_rgba8();

    assert_eq!(pixel(&px, 10, 3, 3), [255, 0, 0, 255]);
    assert_eq!(pixel(&px, 10, 6, 6), [255, 0, 0, 255]);
    assert_eq!(pixel(&px, 10, 2, 2)[3], 0);
    assert_eq!(pixel(&px, 10, 7, 7)[3], 0);
}

#[test]
fn text_without_font_is_skipped() {
    let mut s = CpuSurface::new(8, 8, None).unwrap();
    let style = TextStyle {
        size_px: 12.0,
        color: Rgba8::WHITE,
    };
    s.draw_text("HI", Point::new(4.0, 6.0), TextAlign::Center, &style)
        .unwrap();
    assert!(s.render_rgba8().iter().all(|&b| b == 0));
}

#[test]
fn export_jpeg_round_trips_size() {
    let mut s = CpuSurface::new(33, 17, None).unwrap();
    s.fill_rect(Rect::new(0.0, 0.0, 33.0, 17.0), Rgba8::WHITE);
    let bytes = s.export_jpeg(90).unwrap();

    let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (33, 17));
    let px = decoded.into_rgb8().get_pixel(16, 8).0;
    assert!(px.iter().all(|&c| c >= 250));
}

#[test]
fn premultiply_then_unpremultiply_is_stable_for_opaque() {
    let mut px = vec![12, 34, 56, 255, 200, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![12, 34, 56, 255, 0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![12, 34, 56, 255, 0, 0, 0, 0]);
}
