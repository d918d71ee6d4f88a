use std::io::Cursor;

use super::*;

fn png_bytes(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();
    let buf = png_bytes(image::DynamicImage::ImageRgba8(img));

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn decode_background_surfaces_invalid_image() {
    let err = decode_background(b"\x00\x01\x02").unwrap_err();
    assert!(matches!(err, crate::foundation::error::LekhaError::InvalidImage(_)));
}

#[test]
fn decode_background_is_opaque_rgb() {
    let img = image::RgbImage::from_pixel(4, 2, image::Rgb([10, 20, 30]));
    let buf = png_bytes(image::DynamicImage::ImageRgb8(img));
    let decoded = decode_background(&buf).unwrap();
    assert_eq!(decoded.dimensions(), (4, 2));
    assert_eq!(decoded.get_pixel(0, 0), &image::Rgb([10, 20, 30]));
}

#[test]
fn compress_background_bounds_longer_edge() {
    let img = image::RgbImage::new(400, 100);
    let out = compress_background(img, 200);
    assert_eq!(out.dimensions(), (200, 50));
}

#[test]
fn compress_background_leaves_small_images_alone() {
    let img = image::RgbImage::new(120, 80);
    let out = compress_background(img, 200);
    assert_eq!(out.dimensions(), (120, 80));
}

#[test]
fn rgb_to_prepared_is_fully_opaque() {
    let img = image::RgbImage::from_pixel(2, 1, image::Rgb([5, 6, 7]));
    let prepared = rgb_to_prepared(&img);
    assert_eq!(prepared.width, 2);
    assert_eq!(prepared.height, 1);
    assert_eq!(prepared.rgba8_premul.as_slice(), &[5, 6, 7, 255, 5, 6, 7, 255]);
}
