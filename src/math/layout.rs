use crate::{
    assets::fonts::{FontHandle, TextShaper, metrics_of},
    foundation::core::Rgba8,
    math::parse::Node,
};

/// Script glyphs shrink to this fraction of the surrounding size.
const SCRIPT_RATIO: f64 = 0.7;
/// Fraction children shrink slightly relative to the surrounding size.
const FRAC_RATIO: f64 = 0.85;
/// Height of the math axis (fraction bar center) above the baseline, in ems.
const AXIS_EM: f64 = 0.25;

/// A shaped glyph run positioned relative to the expression baseline.
///
/// `baseline` is the run's own baseline offset from the parent baseline,
/// y-down; `ascent` is the run's height above its own baseline.
pub struct Atom {
    pub layout: parley::Layout<Rgba8>,
    pub x: f64,
    pub baseline: f64,
    pub ascent: f64,
}

/// A filled rectangle (fraction bar, radical overline) relative to the
/// expression baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Laid-out expression: positioned atoms and rules plus overall extents.
pub struct MathLayout {
    pub atoms: Vec<Atom>,
    pub rules: Vec<RuleBox>,
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl MathLayout {
    fn empty() -> Self {
        Self {
            atoms: Vec::new(),
            rules: Vec::new(),
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
        }
    }

    /// Merge `child` into `self` translated by `(dx, dy)` (dy shifts the
    /// child's baseline, y-down). Does not advance `self.width`.
    fn merge(&mut self, child: MathLayout, dx: f64, dy: f64) {
        for mut atom in child.atoms {
            atom.x += dx;
            atom.baseline += dy;
            self.atoms.push(atom);
        }
        for mut rule in child.rules {
            rule.x += dx;
            rule.y += dy;
            self.rules.push(rule);
        }
        self.ascent = self.ascent.max(child.ascent - dy);
        self.descent = self.descent.max(child.descent + dy);
        self.width = self.width.max(dx + child.width);
    }
}

/// Shared shaping state for one layout pass.
pub struct LayoutCtx<'a> {
    pub shaper: &'a mut TextShaper,
    pub handle: Option<&'a FontHandle>,
    pub color: Rgba8,
}

/// Lay out `node` at `size_px`, producing baseline-relative boxes.
pub fn layout_node(node: &Node, size_px: f64, cx: &mut LayoutCtx<'_>) -> MathLayout {
    match node {
        Node::Run(s) => layout_run(s, size_px, cx),
        Node::Row(items) => {
            let mut out = MathLayout::empty();
            let mut x = 0.0;
            for item in items {
                let child = layout_node(item, size_px, cx);
                let advance = child.width;
                out.merge(child, x, 0.0);
                x += advance;
            }
            out.width = out.width.max(x);
            out
        }
        Node::Space(em) => {
            let mut out = MathLayout::empty();
            out.width = em * size_px;
            out
        }
        Node::Frac(num, den) => layout_frac(num, den, size_px, cx),
        Node::Sqrt(inner) => layout_sqrt(inner, size_px, cx),
        Node::Script { base, sup, sub } => layout_script(base, sup.as_deref(), sub.as_deref(), size_px, cx),
    }
}

fn layout_run(text: &str, size_px: f64, cx: &mut LayoutCtx<'_>) -> MathLayout {
    if text.is_empty() {
        return MathLayout::empty();
    }
    let layout = cx.shaper.shape(text, cx.handle, size_px, cx.color);
    let m = metrics_of(&layout);
    MathLayout {
        atoms: vec![Atom {
            layout,
            x: 0.0,
            baseline: 0.0,
            ascent: m.ascent,
        }],
        rules: Vec::new(),
        width: m.width,
        ascent: m.ascent,
        descent: (m.height - m.ascent).max(0.0),
    }
}

fn layout_frac(num: &Node, den: &Node, size_px: f64, cx: &mut LayoutCtx<'_>) -> MathLayout {
    let child_size = size_px * FRAC_RATIO;
    let num_l = layout_node(num, child_size, cx);
    let den_l = layout_node(den, child_size, cx);

    let axis = AXIS_EM * size_px;
    let gap = 0.1 * size_px;
    let rule_h = (0.045 * size_px).max(1.0);
    let pad = 0.1 * size_px;
    let width = num_l.width.max(den_l.width) + 2.0 * pad;

    let rule_y = -axis - rule_h / 2.0;
    let num_dy = rule_y - gap - num_l.descent;
    let den_dy = rule_y + rule_h + gap + den_l.ascent;

    let mut out = MathLayout::empty();
    let num_dx = (width - num_l.width) / 2.0;
    let den_dx = (width - den_l.width) / 2.0;
    out.merge(num_l, num_dx, num_dy);
    out.merge(den_l, den_dx, den_dy);
    out.rules.push(RuleBox {
        x: pad / 2.0,
        y: rule_y,
        width: width - pad,
        height: rule_h,
    });
    out.ascent = out.ascent.max(-rule_y);
    out.descent = out.descent.max(rule_y + rule_h);
    out.width = width;
    out
}

fn layout_sqrt(inner: &Node, size_px: f64, cx: &mut LayoutCtx<'_>) -> MathLayout {
    let inner_l = layout_node(inner, size_px, cx);
    let rad_l = layout_run("√", size_px, cx);

    let rule_h = (0.045 * size_px).max(1.0);
    let gap = 0.08 * size_px;
    let bar_y = -(inner_l.ascent.max(rad_l.ascent) + gap);

    let mut out = MathLayout::empty();
    let rad_w = rad_l.width;
    out.merge(rad_l, 0.0, 0.0);
    out.merge(inner_l, rad_w, 0.0);
    let total = out.width + 0.05 * size_px;
    out.rules.push(RuleBox {
        x: rad_w * 0.8,
        y: bar_y,
        width: total - rad_w * 0.8,
        height: rule_h,
    });
    out.ascent = out.ascent.max(-bar_y + rule_h);
    out.width = total;
    out
}

fn layout_script(
    base: &Node,
    sup: Option<&Node>,
    sub: Option<&Node>,
    size_px: f64,
    cx: &mut LayoutCtx<'_>,
) -> MathLayout {
    let base_l = layout_node(base, size_px, cx);
    let script_size = size_px * SCRIPT_RATIO;
    let sup_l = sup.map(|n| layout_node(n, script_size, cx));
    let sub_l = sub.map(|n| layout_node(n, script_size, cx));

    let mut out = MathLayout::empty();
    let base_w = base_l.width;
    out.merge(base_l, 0.0, 0.0);

    let kern = 0.02 * size_px;
    let mut script_w: f64 = 0.0;
    if let Some(sup_l) = sup_l {
        script_w = script_w.max(sup_l.width);
        out.merge(sup_l, base_w + kern, -0.45 * size_px);
    }
    if let Some(sub_l) = sub_l {
        script_w = script_w.max(sub_l.width);
        out.merge(sub_l, base_w + kern, 0.25 * size_px);
    }
    out.width = base_w + if script_w > 0.0 { kern + script_w } else { 0.0 };
    out
}

#[cfg(test)]
#[path = "../../tests/unit/math/layout.rs"]
mod tests;
