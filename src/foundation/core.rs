use crate::foundation::error::{LekhaError, LekhaResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output resolution of a rendered slide.
///
/// Layout is resolution-invariant: every geometric and typographic base
/// quantity is multiplied by [`Resolution::scale`], so a preview slide is a
/// half-size replica of the full slide up to rounding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// 1920x1080, scale 1.0.
    #[default]
    Full,
    /// 960x540, scale 0.5.
    Preview,
}

impl Resolution {
    pub fn width(self) -> u32 {
        match self {
            Resolution::Full => 1920,
            Resolution::Preview => 960,
        }
    }

    pub fn height(self) -> u32 {
        match self {
            Resolution::Full => 1080,
            Resolution::Preview => 540,
        }
    }

    pub fn scale(self) -> f64 {
        match self {
            Resolution::Full => 1.0,
            Resolution::Preview => 0.5,
        }
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb`, `#rrggbbaa`, or the same without the leading `#`.
    pub fn from_hex(s: &str) -> LekhaResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(LekhaError::validation(format!("invalid hex color '{s}'")));
        }
        let parse = |range: std::ops::Range<usize>| -> LekhaResult<u8> {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| LekhaError::validation(format!("invalid hex color '{s}'")))
        };
        match hex.len() {
            6 => Ok(Self {
                r: parse(0..2)?,
                g: parse(2..4)?,
                b: parse(4..6)?,
                a: 255,
            }),
            8 => Ok(Self {
                r: parse(0..2)?,
                g: parse(2..4)?,
                b: parse(4..6)?,
                a: parse(6..8)?,
            }),
            _ => Err(LekhaError::validation(format!("invalid hex color '{s}'"))),
        }
    }
}

/// Default slide palette.
pub mod palette {
    use super::Rgba8;

    pub const YELLOW: Rgba8 = Rgba8::rgb(240, 200, 60);
    pub const MINT: Rgba8 = Rgba8::rgb(100, 220, 180);
    pub const ORANGE: Rgba8 = Rgba8::rgb(255, 180, 80);
    pub const OFF_WHITE: Rgba8 = Rgba8::rgb(240, 245, 250);
    pub const DARK: Rgba8 = Rgba8::rgb(30, 40, 50);
}

/// A finished slide raster in premultiplied RGBA8.
///
/// The canvas is fully opaque by construction (the background fill covers it),
/// so premultiplied and straight bytes coincide and [`SlideFrame::to_rgb8`] is
/// a plain channel drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl SlideFrame {
    /// Export as an opaque 3-channel image for downstream deck assembly.
    pub fn to_rgb8(&self) -> image::RgbImage {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        image::RgbImage::from_raw(self.width, self.height, out)
            .unwrap_or_else(|| image::RgbImage::new(self.width, self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
