use std::sync::Arc;

use crate::{
    assets::fonts::{FontHandle, TextShaper},
    foundation::core::Rgba8,
    math::layout::{LayoutCtx, layout_node},
    math::parse,
    render::surface::Surface,
};

/// Transparent padding around a rendered tile, in pixels.
const TILE_PAD: f64 = 2.0;

/// A rendered formula: transparent premultiplied tile plus baseline depth.
#[derive(Clone)]
pub struct MathTile {
    /// Transparent tile holding the typeset expression.
    pub pixmap: Arc<vello_cpu::Pixmap>,
    /// Tile width in pixels.
    pub width: f64,
    /// Tile height in pixels.
    pub height: f64,
    /// Offset of the expression baseline from the tile's vertical center
    /// (positive = baseline below center), for baseline-correct inline
    /// placement by callers.
    pub depth: f64,
}

impl std::fmt::Debug for MathTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathTile")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .finish()
    }
}

/// The typesetting engine proper: parses, lays out, and paints a formula.
///
/// Owns stateful shaping contexts and is not safe for concurrent use; all
/// access goes through the serializing lock in
/// [`MathTypesetter`](crate::math::MathTypesetter).
pub struct MathEngine {
    shaper: TextShaper,
}

impl Default for MathEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MathEngine {
    pub fn new() -> Self {
        Self {
            shaper: TextShaper::new(),
        }
    }

    /// Render `formula` (already normalized, without `$` delimiters) at
    /// `size_px`. `None` on any parse or raster failure; callers draw the
    /// literal text instead.
    pub fn render(
        &mut self,
        formula: &str,
        handle: Option<&FontHandle>,
        size_px: f64,
        color: Rgba8,
    ) -> Option<MathTile> {
        let node = match parse::parse(formula) {
            Ok(node) => node,
            Err(err) => {
                tracing::debug!(%formula, %err, "math parse failed, falling back to literal text");
                return None;
            }
        };

        let mut cx = LayoutCtx {
            shaper: &mut self.shaper,
            handle,
            color,
        };
        let laid = layout_node(&node, size_px, &mut cx);
        if laid.width <= 0.0 || laid.ascent + laid.descent <= 0.0 {
            return None;
        }

        let width = (laid.width + 2.0 * TILE_PAD).ceil();
        let height = (laid.ascent + laid.descent + 2.0 * TILE_PAD).ceil();
        let mut surface = match Surface::new(width as u32, height as u32) {
            Ok(s) => s,
            Err(err) => {
                tracing::debug!(%err, "math tile surface allocation failed");
                return None;
            }
        };

        let baseline = TILE_PAD + laid.ascent;
        if let Some(handle) = handle {
            for atom in &laid.atoms {
                surface.draw_layout(
                    &atom.layout,
                    &handle.data,
                    TILE_PAD + atom.x,
                    baseline + atom.baseline - atom.ascent,
                );
            }
        }
        for rule in &laid.rules {
            surface.fill_rect(
                kurbo::Rect::new(
                    TILE_PAD + rule.x,
                    baseline + rule.y,
                    TILE_PAD + rule.x + rule.width,
                    baseline + rule.y + rule.height,
                ),
                color,
            );
        }

        Some(MathTile {
            pixmap: Arc::new(surface.into_pixmap()),
            width,
            height,
            depth: baseline - height / 2.0,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/math/engine.rs"]
mod tests;
