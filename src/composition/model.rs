use crate::foundation::core::{Rgba8, palette};

/// One exam-style question record, as produced by the upstream parser.
///
/// `pointers` order is the authoritative vertical stacking order and is never
/// reordered by the renderer.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Question {
    /// Question number shown in the stem prefix.
    pub number: u32,
    /// Stem text; may embed `$...$` / `$$...$$` math segments.
    pub question: String,
    /// Ordered `(label, body)` answer pointers.
    #[serde(default)]
    pub pointers: Vec<Pointer>,
    /// Optional embedded raster (encoded bytes, any format `image` decodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
}

/// A labeled answer pointer. Serialized as the upstream two-element array
/// form: `["Definition:", "SCM is the proactive use..."]`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Pointer {
    /// Highlighted label, e.g. `"A)"` or `"Definition:"`.
    pub label: String,
    /// Body text; may embed math segments.
    pub body: String,
}

impl Pointer {
    pub fn new(label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            body: body.into(),
        }
    }
}

impl From<(String, String)> for Pointer {
    fn from((label, body): (String, String)) -> Self {
        Self { label, body }
    }
}

impl From<Pointer> for (String, String) {
    fn from(p: Pointer) -> Self {
        (p.label, p.body)
    }
}

/// Fixed named set of selectable typefaces.
///
/// Each variant maps to a typeface file name resolved against the configured
/// font directory; see [`crate::assets::fonts::FontCache`] for the fallback
/// chain when a file is missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Chalk-style display face used by the original deck theme.
    #[default]
    Chalkboard,
    /// Rounded comic face.
    Comic,
    /// Geometric sans.
    Poppins,
    /// Wide-coverage sans, also the bundled known-good fallback.
    Dejavu,
}

impl FontFamily {
    /// Typeface file name under the font directory.
    pub fn file_name(self) -> &'static str {
        match self {
            FontFamily::Chalkboard => "Chalkboard.ttc",
            FontFamily::Comic => "ComicNeue-Regular.ttf",
            FontFamily::Poppins => "Poppins-Regular.ttf",
            FontFamily::Dejavu => "DejaVuSans.ttf",
        }
    }
}

/// Horizontal region of the canvas available to question and pointer text.
///
/// Header elements are positioned by their own coordinates and are not
/// affected by the region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentRegion {
    /// Entire canvas width.
    #[default]
    Full,
    LeftHalf,
    RightHalf,
    LeftThird,
    CenterThird,
    RightThird,
}

impl ContentRegion {
    /// Fractional `(offset, width)` of the canvas this region spans.
    pub fn span(self) -> (f64, f64) {
        match self {
            ContentRegion::Full => (0.0, 1.0),
            ContentRegion::LeftHalf => (0.0, 0.5),
            ContentRegion::RightHalf => (0.5, 0.5),
            ContentRegion::LeftThird => (0.0, 1.0 / 3.0),
            ContentRegion::CenterThird => (1.0 / 3.0, 1.0 / 3.0),
            ContentRegion::RightThird => (2.0 / 3.0, 1.0 / 3.0),
        }
    }
}

/// Flat rendering options with independently-defaulted keys.
///
/// Unknown JSON keys are ignored; absence of a key is never an error. All
/// pixel quantities are expressed at full resolution and scaled uniformly for
/// preview rendering.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    /// Typeface selector from the fixed named set.
    pub font_family: FontFamily,
    /// Base heading point size (instructor name; the question stem derives
    /// from it at a 0.8 ratio).
    pub font_size_heading: f64,
    /// Base body point size (pointers, subtitle, labels).
    pub font_size_body: f64,
    /// Multiplier applied to all font sizes.
    pub content_scale: f64,

    /// Shared text color fallback (hex), consulted before hard-coded defaults.
    pub font_text_color: Option<String>,
    /// Question-stem color override (hex).
    pub font_question_color: Option<String>,
    /// Pointer/options color override (hex).
    pub font_options_color: Option<String>,

    /// Global offset added to the left margin.
    pub pos_x: f64,
    /// Global offset added to the top margin.
    pub pos_y: f64,

    pub instructor_name: String,
    pub subtitle: String,
    pub badge_text: String,
    pub watermark_text: String,

    pub render_instructor: bool,
    pub render_subtitle: bool,
    pub render_badge: bool,

    pub instructor_x: Option<f64>,
    pub instructor_y: Option<f64>,
    pub instructor_size: Option<f64>,
    pub instructor_color: Option<String>,
    /// Degrees, clockwise-positive.
    pub instructor_rotation: f64,

    pub subtitle_x: Option<f64>,
    pub subtitle_y: Option<f64>,
    pub subtitle_size: Option<f64>,
    pub subtitle_color: Option<String>,
    pub subtitle_rotation: f64,

    pub badge_x: Option<f64>,
    pub badge_y: Option<f64>,
    /// Box size ratio relative to the 350x70 baseline badge.
    pub badge_size: f64,
    pub badge_bg_color: Option<String>,
    pub badge_color: Option<String>,
    pub badge_rotation: f64,

    /// Region that narrows the horizontal space for stem and pointer text.
    pub content_region: ContentRegion,
    /// Extra pixels inserted between answer pointers.
    pub pointer_spacing: f64,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            font_family: FontFamily::default(),
            font_size_heading: 60.0,
            font_size_body: 28.0,
            content_scale: 1.0,
            font_text_color: None,
            font_question_color: None,
            font_options_color: None,
            pos_x: 0.0,
            pos_y: 0.0,
            instructor_name: String::new(),
            subtitle: String::new(),
            badge_text: String::new(),
            watermark_text: String::new(),
            render_instructor: true,
            render_subtitle: true,
            render_badge: true,
            instructor_x: None,
            instructor_y: None,
            instructor_size: None,
            instructor_color: None,
            instructor_rotation: 0.0,
            subtitle_x: None,
            subtitle_y: None,
            subtitle_size: None,
            subtitle_color: None,
            subtitle_rotation: 0.0,
            badge_x: None,
            badge_y: None,
            badge_size: 1.0,
            badge_bg_color: None,
            badge_color: None,
            badge_rotation: 0.0,
            content_region: ContentRegion::default(),
            pointer_spacing: 0.0,
        }
    }
}

impl SlideConfig {
    /// Question-stem color: explicit override, then shared text color, then
    /// the palette default.
    pub fn question_color(&self) -> Rgba8 {
        parse_color(self.font_question_color.as_deref())
            .or_else(|| parse_color(self.font_text_color.as_deref()))
            .unwrap_or(palette::ORANGE)
    }

    /// Pointer/options color with the same fallback chain.
    pub fn options_color(&self) -> Rgba8 {
        parse_color(self.font_options_color.as_deref())
            .or_else(|| parse_color(self.font_text_color.as_deref()))
            .unwrap_or(palette::OFF_WHITE)
    }
}

/// Parse an optional hex color; malformed values degrade to `None` with a
/// warning rather than failing slide generation.
pub fn parse_color(hex: Option<&str>) -> Option<Rgba8> {
    let hex = hex?;
    match Rgba8::from_hex(hex) {
        Ok(c) => Some(c),
        Err(err) => {
            tracing::warn!(%hex, %err, "ignoring malformed color option");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
