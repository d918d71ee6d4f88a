//! Center-preserving rotated drawing.
//!
//! Rotated labels and badges render onto a temporary transparent canvas
//! sized to their rotation diagonal, then paste back so the unrotated
//! bounding box center stays fixed on the target. Angles are clockwise
//! degrees; in the y-down raster frame a positive affine rotation already
//! turns clockwise, so they pass through unnegated.

use std::sync::Arc;

use kurbo::Affine;

use crate::{
    assets::fonts::{FontHandle, TextShaper},
    foundation::core::{Rgba8, palette},
    foundation::error::LekhaResult,
    render::surface::Surface,
};

/// Badge outline width in pixels.
const BADGE_OUTLINE: f64 = 3.0;
/// Badge corner radius as a fraction of badge height.
const BADGE_RADIUS_RATIO: f64 = 10.0 / 70.0;
/// Extra margin around the rotation canvas, in pixels.
const ROTATE_MARGIN: f64 = 4.0;

/// Draw `text` with its unrotated top-left at `(x, y)`, rotated `angle_deg`
/// clockwise about its own center.
pub fn draw_rotated_text(
    surface: &mut Surface,
    shaper: &mut TextShaper,
    text: &str,
    handle: Option<&FontHandle>,
    size_px: f64,
    color: Rgba8,
    x: f64,
    y: f64,
    angle_deg: f64,
) -> LekhaResult<()> {
    let Some(handle) = handle else {
        return Ok(());
    };
    let layout = shaper.shape(text, Some(handle), size_px, color);
    let (w, h) = (f64::from(layout.width()), f64::from(layout.height()));
    if angle_deg == 0.0 {
        surface.draw_layout(&layout, &handle.data, x, y);
        return Ok(());
    }

    let side = canvas_side(w, h);
    let mut work = Surface::new(side, side)?;
    let side = f64::from(side);
    work.draw_layout(&layout, &handle.data, (side - w) / 2.0, (side - h) / 2.0);
    paste_rotated(surface, work, x + w / 2.0, y + h / 2.0, angle_deg);
    Ok(())
}

/// Draw a rounded badge box with centered label text, rotated `angle_deg`
/// clockwise about the box center. `(x, y)` is the unrotated top-left.
#[allow(clippy::too_many_arguments)]
pub fn draw_rotated_badge(
    surface: &mut Surface,
    shaper: &mut TextShaper,
    text: &str,
    handle: Option<&FontHandle>,
    size_px: f64,
    bg: Rgba8,
    fg: Rgba8,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    angle_deg: f64,
) -> LekhaResult<()> {
    if angle_deg == 0.0 {
        paint_badge(surface, shaper, text, handle, size_px, bg, fg, x, y, width, height);
        return Ok(());
    }

    let side = canvas_side(width, height);
    let mut work = Surface::new(side, side)?;
    let side = f64::from(side);
    paint_badge(
        &mut work,
        shaper,
        text,
        handle,
        size_px,
        bg,
        fg,
        (side - width) / 2.0,
        (side - height) / 2.0,
        width,
        height,
    );
    paste_rotated(surface, work, x + width / 2.0, y + height / 2.0, angle_deg);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn paint_badge(
    surface: &mut Surface,
    shaper: &mut TextShaper,
    text: &str,
    handle: Option<&FontHandle>,
    size_px: f64,
    bg: Rgba8,
    fg: Rgba8,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) {
    let radius = height * BADGE_RADIUS_RATIO;
    // Outline drawn as an outer fill under an inset background fill.
    surface.fill_rounded_rect(kurbo::Rect::new(x, y, x + width, y + height), radius, palette::DARK);
    surface.fill_rounded_rect(
        kurbo::Rect::new(
            x + BADGE_OUTLINE,
            y + BADGE_OUTLINE,
            x + width - BADGE_OUTLINE,
            y + height - BADGE_OUTLINE,
        ),
        (radius - BADGE_OUTLINE).max(0.0),
        bg,
    );
    if let Some(handle) = handle {
        let layout = shaper.shape(text, Some(handle), size_px, fg);
        let (tw, th) = (f64::from(layout.width()), f64::from(layout.height()));
        surface.draw_layout(&layout, &handle.data, x + (width - tw) / 2.0, y + (height - th) / 2.0);
    }
}

/// Square working canvas side that fits a `w`×`h` box at any rotation.
fn canvas_side(w: f64, h: f64) -> u32 {
    ((w * w + h * h).sqrt() + 2.0 * ROTATE_MARGIN).ceil().max(1.0) as u32
}

/// Paste `work` rotated clockwise by `angle_deg` so its center lands on
/// `(cx, cy)`.
fn paste_rotated(surface: &mut Surface, work: Surface, cx: f64, cy: f64, angle_deg: f64) {
    let side = work.width();
    let pixmap = Arc::new(work.into_pixmap());
    let transform = Affine::translate((cx, cy))
        * Affine::rotate(angle_deg.to_radians())
        * Affine::translate((-side / 2.0, -side / 2.0));
    surface.draw_pixmap(pixmap, transform);
}

#[cfg(test)]
#[path = "../../tests/unit/render/rotate.rs"]
mod tests;
