use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{LekhaError, LekhaResult};

/// Prepared raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
///
/// Used for embedded question images; callers treat failure as degradable
/// (log and omit the image).
pub fn decode_image(bytes: &[u8]) -> LekhaResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Decode a background upload into the fixed opaque 3-channel source format.
///
/// Unlike question images, an undecodable background is bad input and must
/// surface distinctly as [`LekhaError::InvalidImage`].
pub fn decode_background(bytes: &[u8]) -> LekhaResult<image::RgbImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| LekhaError::invalid_image(format!("background image is not decodable: {e}")))?;
    Ok(dyn_img.to_rgb8())
}

/// Downsize an oversized source background before caching, preserving aspect
/// ratio, so very large uploads do not pin memory for the whole session.
pub fn compress_background(img: image::RgbImage, max_dimension: u32) -> image::RgbImage {
    let (w, h) = img.dimensions();
    let largest = w.max(h);
    if max_dimension == 0 || largest <= max_dimension {
        return img;
    }
    let ratio = f64::from(max_dimension) / f64::from(largest);
    let nw = ((f64::from(w) * ratio).round() as u32).max(1);
    let nh = ((f64::from(h) * ratio).round() as u32).max(1);
    tracing::debug!(from = ?(w, h), to = ?(nw, nh), "compressing oversized background");
    image::imageops::resize(&img, nw, nh, image::imageops::FilterType::Lanczos3)
}

/// Expand an opaque RGB image into the premultiplied RGBA8 prepared form.
pub fn rgb_to_prepared(img: &image::RgbImage) -> PreparedImage {
    let (width, height) = img.dimensions();
    let mut rgba8_premul = Vec::with_capacity(width as usize * height as usize * 4);
    for px in img.pixels() {
        rgba8_premul.extend_from_slice(&[px.0[0], px.0[1], px.0[2], 255]);
    }
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
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

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
