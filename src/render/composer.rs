//! Top-level slide orchestration.

use std::sync::Arc;

use kurbo::Affine;

use crate::{
    assets::{decode, fonts},
    composition::model::{Question, SlideConfig, parse_color},
    foundation::core::{Resolution, Rgba8, SlideFrame, palette},
    foundation::error::LekhaResult,
    layout::RichText,
    render::pipeline::SlideServices,
    render::rotate,
    render::surface::Surface,
};

// Base geometry at full resolution; everything scales uniformly.
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 80.0;
const MARGIN_TOP: f64 = 60.0;
/// Stem top relative to the top margin.
const STEM_OFFSET: f64 = 200.0;
/// Gap between the stem's last line and the answer label.
const ANSWER_LABEL_GAP: f64 = 40.0;
/// Gap between the answer label and the first pointer row.
const POINTER_START_GAP: f64 = 60.0;
/// Indent from the bullet to the pointer label.
const POINTER_INDENT: f64 = 40.0;
/// Gap between a pointer label and its body text.
const BODY_GAP: f64 = 10.0;
/// Fixed vertical gap between pointer rows.
const ROW_GAP: f64 = 10.0;
/// Stem size as a fraction of the heading size.
const STEM_RATIO: f64 = 0.8;
/// Badge box at `badge_size = 1.0`.
const BADGE_WIDTH: f64 = 350.0;
const BADGE_HEIGHT: f64 = 70.0;
const BADGE_FONT_SIZE: f64 = 24.0;
/// Label size exceeds the body size by this much.
const LABEL_SIZE_BUMP: f64 = 2.0;
/// Question image bound as a fraction of canvas width and height.
const IMAGE_MAX_FRAC: f64 = 0.45;
/// Gap between wrapped text and an embedded question image.
const IMAGE_TEXT_GAP: f64 = 20.0;
/// Watermark inset from the bottom edge.
const WATERMARK_BOTTOM: f64 = 40.0;
const SUBTITLE_OFFSET_Y: f64 = 70.0;

/// Per-worker slide renderer. Owns its own shaping contexts; caches and the
/// formula typesetter are shared through [`SlideServices`].
pub struct SlideComposer {
    services: Arc<SlideServices>,
    shaper: fonts::TextShaper,
}

impl SlideComposer {
    pub fn new(services: Arc<SlideServices>) -> Self {
        Self {
            services,
            shaper: fonts::TextShaper::new(),
        }
    }

    fn font_at(&self, config: &SlideConfig, size_px: f64) -> Option<fonts::FontHandle> {
        fonts::resolve_font(
            &self.services.fonts,
            &self.services.font_dir,
            config.font_family,
            size_px,
        )
    }

    /// Render one question onto a fresh copy of the background and return
    /// the finished frame.
    #[tracing::instrument(skip_all, fields(number = question.number))]
    pub fn generate(
        &mut self,
        question: &Question,
        background: &image::RgbImage,
        config: &SlideConfig,
        resolution: Resolution,
        background_id: &str,
        use_cache: bool,
    ) -> LekhaResult<SlideFrame> {
        let s = resolution.scale();
        let (canvas_w, canvas_h) = (f64::from(resolution.width()), f64::from(resolution.height()));

        let prepared =
            self.services
                .backgrounds
                .get(background_id, background, resolution, use_cache);
        let mut surface = Surface::new(resolution.width(), resolution.height())?;
        surface.draw_prepared(&prepared, Affine::IDENTITY)?;

        let heading_size = config.font_size_heading * config.content_scale * s;
        let body_size = config.font_size_body * config.content_scale * s;
        let stem_size = heading_size * STEM_RATIO;
        let label_size = (config.font_size_body + LABEL_SIZE_BUMP) * config.content_scale * s;

        let question_color = config.question_color();
        let options_color = config.options_color();

        // Content column: named fractional region, then margins and the
        // global position offset inside it.
        let (region_off, region_frac) = config.content_region.span();
        let content_x = canvas_w * region_off + (MARGIN_LEFT + config.pos_x) * s;
        let mut content_right = canvas_w * (region_off + region_frac) - MARGIN_RIGHT * s;

        // Embedded question image, top-right of the content column. A bad
        // image is dropped, never fatal.
        let stem_y = (MARGIN_TOP + STEM_OFFSET + config.pos_y) * s;
        if let Some(bytes) = &question.image {
            match decode::decode_image(bytes) {
                Ok(img) => {
                    let (iw, ih) = (f64::from(img.width), f64::from(img.height));
                    let fit = (canvas_w * IMAGE_MAX_FRAC / iw)
                        .min(canvas_h * IMAGE_MAX_FRAC / ih)
                        .min(1.0);
                    let img_x = content_right - iw * fit;
                    surface.draw_prepared(
                        &img,
                        Affine::translate((img_x, stem_y)) * Affine::scale(fit),
                    )?;
                    content_right = img_x - IMAGE_TEXT_GAP * s;
                }
                Err(err) => {
                    tracing::warn!(number = question.number, %err, "question image dropped");
                }
            }
        }

        self.draw_header(&mut surface, config, s, canvas_w)?;

        // Question stem.
        let stem = format!("Ques {} => {}", question.number, question.question);
        let stem_font = self.font_at(config, stem_size);
        let max_width = (content_right - content_x).max(1.0);
        let consumed = RichText {
            shaper: &mut self.shaper,
            math: &self.services.math,
        }
        .draw(
            &mut surface,
            &stem,
            stem_font.as_ref(),
            stem_size,
            question_color,
            content_x,
            stem_y,
            max_width,
        );

        let label_font = self.font_at(config, label_size);
        let body_font = self.font_at(config, body_size);
        self.draw_pointers(
            &mut surface,
            question,
            config,
            s,
            content_x,
            content_right,
            stem_y + consumed,
            body_size,
            label_size,
            options_color,
            &label_font,
            &body_font,
        );

        if !config.watermark_text.is_empty() {
            let wm_font = self.font_at(config, body_size);
            if let Some(handle) = &wm_font {
                let layout = self.shaper.shape(
                    &config.watermark_text,
                    Some(handle),
                    body_size,
                    question_color,
                );
                let (w, h) = (f64::from(layout.width()), f64::from(layout.height()));
                surface.draw_layout(
                    &layout,
                    &handle.data,
                    canvas_w - MARGIN_RIGHT * s - w,
                    canvas_h - WATERMARK_BOTTOM * s - h,
                );
            }
        }

        Ok(surface.finish())
    }

    fn draw_header(
        &mut self,
        surface: &mut Surface,
        config: &SlideConfig,
        s: f64,
        canvas_w: f64,
    ) -> LekhaResult<()> {
        if config.render_instructor && !config.instructor_name.is_empty() {
            let size = config.instructor_size.unwrap_or(config.font_size_heading)
                * config.content_scale
                * s;
            let color = parse_color(config.instructor_color.as_deref()).unwrap_or(palette::YELLOW);
            let x = config.instructor_x.unwrap_or(MARGIN_LEFT) * s;
            let y = config.instructor_y.unwrap_or(MARGIN_TOP) * s;
            let handle = self.font_at(config, size);
            rotate::draw_rotated_text(
                surface,
                &mut self.shaper,
                &config.instructor_name,
                handle.as_ref(),
                size,
                color,
                x,
                y,
                config.instructor_rotation,
            )?;
        }

        if config.render_subtitle && !config.subtitle.is_empty() {
            let size =
                config.subtitle_size.unwrap_or(config.font_size_body) * config.content_scale * s;
            let color = parse_color(config.subtitle_color.as_deref()).unwrap_or(palette::MINT);
            let x = config.subtitle_x.unwrap_or(MARGIN_LEFT) * s;
            let y = config.subtitle_y.unwrap_or(MARGIN_TOP + SUBTITLE_OFFSET_Y) * s;
            let handle = self.font_at(config, size);
            rotate::draw_rotated_text(
                surface,
                &mut self.shaper,
                &config.subtitle,
                handle.as_ref(),
                size,
                color,
                x,
                y,
                config.subtitle_rotation,
            )?;
        }

        if config.render_badge && !config.badge_text.is_empty() {
            let w = BADGE_WIDTH * config.badge_size * s;
            let h = BADGE_HEIGHT * config.badge_size * s;
            let size = BADGE_FONT_SIZE * config.badge_size * config.content_scale * s;
            let bg = parse_color(config.badge_bg_color.as_deref()).unwrap_or(palette::ORANGE);
            let fg = parse_color(config.badge_color.as_deref()).unwrap_or(palette::DARK);
            let x = config
                .badge_x
                .map(|x| x * s)
                .unwrap_or(canvas_w - MARGIN_RIGHT * s - w);
            let y = config.badge_y.unwrap_or(MARGIN_TOP) * s;
            let handle = self.font_at(config, size);
            rotate::draw_rotated_badge(
                surface,
                &mut self.shaper,
                &config.badge_text,
                handle.as_ref(),
                size,
                bg,
                fg,
                x,
                y,
                w,
                h,
                config.badge_rotation,
            )?;
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_pointers(
        &mut self,
        surface: &mut Surface,
        question: &Question,
        config: &SlideConfig,
        s: f64,
        content_x: f64,
        content_right: f64,
        stem_bottom: f64,
        body_size: f64,
        label_size: f64,
        options_color: Rgba8,
        label_font: &Option<fonts::FontHandle>,
        body_font: &Option<fonts::FontHandle>,
    ) {
        // The label is drawn even when no pointers follow it.
        let answer_y = stem_bottom + ANSWER_LABEL_GAP * s;
        if let Some(handle) = label_font {
            let layout = self.shaper.shape("Answer –", Some(handle), label_size, options_color);
            surface.draw_layout(&layout, &handle.data, content_x, answer_y);
        }
        if question.pointers.is_empty() {
            return;
        }

        let mut y = answer_y + POINTER_START_GAP * s;
        for pointer in &question.pointers {
            // The upstream parser emits bare option letters with no body for
            // options it failed to extract; they are dropped here rather
            // than drawn as empty rows. This also hides genuinely malformed
            // records, so it is a likely latent bug worth revisiting.
            if pointer.body.trim().is_empty() && is_bare_option_label(&pointer.label) {
                tracing::debug!(number = question.number, label = %pointer.label, "skipping empty option pointer");
                continue;
            }

            if let Some(handle) = label_font {
                let bullet = self.shaper.shape("•", Some(handle), label_size, options_color);
                surface.draw_layout(&bullet, &handle.data, content_x, y);
            }
            let label_x = content_x + POINTER_INDENT * s;
            let label_width = if let Some(handle) = label_font {
                let layout =
                    self.shaper.shape(&pointer.label, Some(handle), label_size, options_color);
                let width = f64::from(layout.width());
                surface.draw_layout(&layout, &handle.data, label_x, y);
                width
            } else {
                self.shaper.measure(&pointer.label, None, label_size).width
            };

            // Body shares the label's row; wrapped lines indent to the body
            // column rather than back to the bullet.
            let body_x = label_x + label_width + BODY_GAP * s;
            let consumed = RichText {
                shaper: &mut self.shaper,
                math: &self.services.math,
            }
            .draw(
                surface,
                &pointer.body,
                body_font.as_ref(),
                body_size,
                options_color,
                body_x,
                y,
                (content_right - body_x).max(1.0),
            );

            let row_height = consumed.max(label_size * 1.2);
            y += row_height + (ROW_GAP + config.pointer_spacing) * s;
        }
    }
}

/// True for labels like `A)`, `b.`, or `C:` with nothing else in them.
fn is_bare_option_label(label: &str) -> bool {
    let trimmed = label.trim().trim_end_matches([')', '.', ':']);
    trimmed.chars().count() == 1 && trimmed.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composer.rs"]
mod tests;
