use kurbo::Affine;

use crate::{
    assets::fonts::{FontHandle, TextShaper},
    foundation::core::Rgba8,
    math::MathTypesetter,
    render::surface::Surface,
};

/// Horizontal gap after an inline formula tile, in pixels.
const MATH_TILE_GAP: f64 = 8.0;
/// Extra line height reserved above/below a formula tile, in pixels.
const MATH_TILE_MARGIN: f64 = 4.0;
/// Line advance as a multiple of the font size.
const LINE_FACTOR: f64 = 1.2;

/// Commands that mark a delimiter-free string as a formula. A string with no
/// `$` delimiters but containing one of these is wrapped as a single inline
/// math segment.
const MATH_TRIGGERS: &[&str] = &[
    "\\frac", "\\sqrt", "\\sum", "\\int", "\\times", "\\div", "\\pm", "\\leq", "\\geq", "\\neq",
    "\\alpha", "\\beta", "\\gamma", "\\theta", "\\pi", "\\infty",
];

/// One parsed piece of a rich string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Math { formula: String, display: bool },
}

/// True when a delimiter-free string should be treated as a formula.
pub fn looks_like_math(text: &str) -> bool {
    MATH_TRIGGERS.iter().any(|t| text.contains(t))
}

/// Split `text` on `$$...$$` and `$...$` delimiters, preserving literal
/// segments between them. A dangling `$` with no closing delimiter is kept
/// as literal text. A string with no `$` at all that [`looks_like_math`]
/// becomes one inline math segment.
pub fn split_segments(text: &str) -> Vec<Segment> {
    if !text.contains('$') {
        if looks_like_math(text) {
            return vec![Segment::Math {
                formula: text.to_owned(),
                display: false,
            }];
        }
        if text.is_empty() {
            return Vec::new();
        }
        return vec![Segment::Text(text.to_owned())];
    }

    let mut segments = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('$') {
        let display = rest[open..].starts_with("$$");
        let delim = if display { "$$" } else { "$" };
        let body_start = open + delim.len();
        let Some(close_rel) = rest[body_start..].find(delim) else {
            // Unmatched delimiter: everything from here on is literal.
            break;
        };
        if open > 0 {
            segments.push(Segment::Text(rest[..open].to_owned()));
        }
        let formula = &rest[body_start..body_start + close_rel];
        if !formula.is_empty() {
            segments.push(Segment::Math {
                formula: formula.to_owned(),
                display,
            });
        }
        rest = &rest[body_start + close_rel + delim.len()..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_owned()));
    }
    segments
}

/// Greedy left-to-right, top-to-bottom layout of mixed prose and formulas.
///
/// Borrows the shared shaper and typesetter; construct one per draw batch.
pub struct RichText<'a> {
    pub shaper: &'a mut TextShaper,
    pub math: &'a MathTypesetter,
}

struct Cursor {
    origin_x: f64,
    right: f64,
    x: f64,
    y: f64,
    line_height: f64,
    base_line_height: f64,
    drew: bool,
}

impl Cursor {
    fn wrap(&mut self) {
        self.y += self.line_height;
        self.x = self.origin_x;
        self.line_height = self.base_line_height;
    }

    /// Wrap before placing something `width` wide, unless the line is empty.
    fn fit(&mut self, width: f64) {
        if self.x > self.origin_x && self.x + width > self.right {
            self.wrap();
        }
    }
}

impl RichText<'_> {
    /// Draw `text` starting at `(x, y)`, wrapping at `x + max_width`.
    /// Returns the total vertical extent consumed; zero when nothing drew.
    pub fn draw(
        &mut self,
        surface: &mut Surface,
        text: &str,
        handle: Option<&FontHandle>,
        size_px: f64,
        color: Rgba8,
        x: f64,
        y: f64,
        max_width: f64,
    ) -> f64 {
        let segments = split_segments(text);
        if segments.is_empty() {
            return 0.0;
        }

        let base = size_px * LINE_FACTOR;
        let mut cursor = Cursor {
            origin_x: x,
            right: x + max_width,
            x,
            y,
            line_height: base,
            base_line_height: base,
            drew: false,
        };
        let space_w = self.space_width(handle, size_px);

        for segment in &segments {
            match segment {
                Segment::Text(run) => {
                    self.draw_words(surface, run, handle, size_px, color, space_w, &mut cursor);
                }
                Segment::Math { formula, display } => {
                    match self.math.render(formula, handle, size_px, color) {
                        Some(tile) => {
                            cursor.fit(tile.width);
                            surface.draw_pixmap(
                                tile.pixmap.clone(),
                                Affine::translate((cursor.x, cursor.y)),
                            );
                            cursor.x += tile.width + MATH_TILE_GAP;
                            cursor.line_height =
                                cursor.line_height.max(tile.height + MATH_TILE_MARGIN);
                            cursor.drew = true;
                        }
                        None => {
                            // Typesetting failed: show the delimited source.
                            let delim = if *display { "$$" } else { "$" };
                            let literal = format!("{delim}{formula}{delim}");
                            self.draw_words(
                                surface, &literal, handle, size_px, color, space_w, &mut cursor,
                            );
                        }
                    }
                }
            }
        }

        if cursor.drew {
            (cursor.y - y) + cursor.line_height
        } else {
            0.0
        }
    }

    fn draw_words(
        &mut self,
        surface: &mut Surface,
        run: &str,
        handle: Option<&FontHandle>,
        size_px: f64,
        color: Rgba8,
        space_w: f64,
        cursor: &mut Cursor,
    ) {
        for (i, line) in run.split('\n').enumerate() {
            if i > 0 {
                cursor.wrap();
                cursor.drew = true;
            }
            for word in line.split_whitespace() {
                let layout = self.shaper.shape(word, handle, size_px, color);
                let width = f64::from(layout.width());
                cursor.fit(width);
                if let Some(handle) = handle {
                    surface.draw_layout(&layout, &handle.data, cursor.x, cursor.y);
                }
                cursor.x += width + space_w;
                cursor.drew = true;
            }
        }
    }

    fn space_width(&mut self, handle: Option<&FontHandle>, size_px: f64) -> f64 {
        // Trailing whitespace is excluded from layout width, so measure the
        // space between two glyphs instead.
        let narrow = f64::from(self.shaper.shape("nn", handle, size_px, Rgba8::default()).width());
        let wide = f64::from(self.shaper.shape("n n", handle, size_px, Rgba8::default()).width());
        let w = wide - narrow;
        if w > 0.0 { w } else { size_px * 0.25 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/rich_text.rs"]
mod tests;
