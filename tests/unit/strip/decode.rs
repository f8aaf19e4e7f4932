use std::io::Cursor;

use super::*;
use crate::capture::source::test_pattern;

fn png(width: u32, height: u32) -> ImageBuffer {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(test_pattern(width, height))
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    ImageBuffer::from_encoded(buf).unwrap()
}

#[test]
fn decode_png_is_lossless() {
    let decoded = decode_image(0, &png(9, 5)).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (9, 5));
    assert_eq!(decoded.rgba.as_ref(), &test_pattern(9, 5));
}

#[test]
fn decode_all_preserves_input_order() {
    let images = (1..=12u32).map(|w| png(w * 3, 4)).collect::<Vec<_>>();
    let decoded = decode_all(&images).unwrap();
    assert_eq!(
        decoded.iter().map(|d| d.width()).collect::<Vec<_>>(),
        (1..=12u32).map(|w| w * 3).collect::<Vec<_>>()
    );
}

#[test]
fn decode_all_reports_first_broken_index() {
    let mut images = vec![png(4, 4), png(5, 5), png(6, 6), png(7, 7)];
    // Keep a valid header so the buffer constructs, but cut the pixel data.
    for i in [1usize, 3] {
        let bytes = images[i].bytes();
        images[i] = ImageBuffer::from_encoded(bytes[..bytes.len() / 2].to_vec()).unwrap();
    }

    match decode_all(&images) {
        Err(BoothError::ImageDecodeFailure { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected decode failure, got {other:?}"),
    }
}
