use std::io::Cursor;

use super::*;

fn encode_png(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_rgb_png_is_lossless() {
    let src = RgbImage::from_raw(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
    let buf = encode_png(image::DynamicImage::ImageRgb8(src.clone()));
    assert_eq!(decode_image(&buf).unwrap(), src);
}

#[test]
fn decode_drops_alpha_and_keeps_stored_color() {
    let src = image::RgbaImage::from_raw(2, 1, vec![100, 50, 200, 128, 7, 8, 9, 0]).unwrap();
    let buf = encode_png(image::DynamicImage::ImageRgba8(src));
    let out = decode_image(&buf).unwrap();
    assert_eq!(out.as_raw().as_slice(), &[100, 50, 200, 7, 8, 9]);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, SlideError::Decode(_)));
}

#[test]
fn missing_file_is_a_decode_error() {
    let path = std::env::temp_dir().join("slidereel_missing_file_for_decode_test.png");
    assert!(matches!(load_image(&path), Err(SlideError::Decode(_))));
    assert!(matches!(probe_dimensions(&path), Err(SlideError::Decode(_))));
}
