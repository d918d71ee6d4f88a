use std::sync::Arc;

use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Rgba8, SlideFrame},
    foundation::error::{LekhaError, LekhaResult},
};

/// Slide-private painting target.
///
/// Wraps a `vello_cpu` render context; ops are recorded in draw order and
/// rasterized once in [`Surface::finish`] / [`Surface::into_pixmap`]. One
/// surface per slide (or per rotation working canvas); surfaces are never
/// shared between workers.
pub struct Surface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> LekhaResult<Self> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| LekhaError::validation("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| LekhaError::validation("surface height exceeds u16"))?;
        Ok(Self {
            width: width_u16,
            height: height_u16,
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
        })
    }

    pub fn width(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.height)
    }

    /// Paint a prepared image under `transform` (its own alpha is the mask).
    pub fn draw_prepared(&mut self, img: &PreparedImage, transform: kurbo::Affine) -> LekhaResult<()> {
        let pixmap = prepared_to_pixmap(img)?;
        self.draw_pixmap(Arc::new(pixmap), transform);
        Ok(())
    }

    /// Paint an already rasterized tile under `transform`.
    pub fn draw_pixmap(&mut self, pixmap: Arc<vello_cpu::Pixmap>, transform: kurbo::Affine) {
        let (w, h) = (f64::from(pixmap.width()), f64::from(pixmap.height()));
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(pixmap),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    }

    /// Fill glyph runs of a shaped layout with the layout's own brush colors,
    /// top-left anchored at `(x, y)`.
    pub fn draw_layout(
        &mut self,
        layout: &parley::Layout<Rgba8>,
        font: &vello_cpu::peniko::FontData,
        x: f64,
        y: f64,
    ) {
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((x, y)));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Fill an axis-aligned rounded rectangle.
    pub fn fill_rounded_rect(&mut self, rect: kurbo::Rect, radius: f64, color: Rgba8) {
        use vello_cpu::kurbo::Shape;

        let rr = vello_cpu::kurbo::RoundedRect::new(rect.x0, rect.y0, rect.x1, rect.y1, radius);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&rr.to_path(0.1));
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: kurbo::Rect, color: Rgba8) {
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
    }

    /// Rasterize recorded ops into a transparent-backed pixmap.
    pub fn into_pixmap(mut self) -> vello_cpu::Pixmap {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        pixmap
    }

    /// Rasterize into a finished slide frame.
    pub fn finish(self) -> SlideFrame {
        let (width, height) = (u32::from(self.width), u32::from(self.height));
        let pixmap = self.into_pixmap();
        SlideFrame {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }
}

/// Convert prepared premultiplied bytes into a paint-side pixmap.
pub fn prepared_to_pixmap(img: &PreparedImage) -> LekhaResult<vello_cpu::Pixmap> {
    let w: u16 = img
        .width
        .try_into()
        .map_err(|_| LekhaError::validation("image width exceeds u16"))?;
    let h: u16 = img
        .height
        .try_into()
        .map_err(|_| LekhaError::validation("image height exceeds u16"))?;
    if img.rgba8_premul.len() != img.width as usize * img.height as usize * 4 {
        return Err(LekhaError::validation("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(img.width as usize * img.height as usize);
    for px in img.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
