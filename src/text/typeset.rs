use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::scene::display::{Baseline, FontFamily, FontSpec, TextAlign, TextOp};

/// Vertical font metrics in pixels, both positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    pub ascent: f64,
    pub descent: f64,
}

/// Glyphs of one placed line, in the line's local space (origin on the baseline at the left
/// edge). `transform` maps that space to the device.
#[derive(Clone, Debug)]
pub struct PlacedText {
    pub transform: Affine,
    pub glyphs: PlacedGlyphs,
}

#[derive(Clone, Debug)]
pub enum PlacedGlyphs {
    Outline {
        font: vello_cpu::peniko::FontData,
        size: f32,
        glyphs: Vec<vello_cpu::Glyph>,
    },
    /// Solid boxes standing in for glyphs when no font file is available.
    Blocks(Vec<Rect>),
}

/// 8-bit coverage raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize)],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Pixel centres on a `step` grid whose coverage exceeds `threshold`.
    pub fn sample(&self, step: u32, threshold: u8) -> Vec<Point> {
        let step = step.max(1);
        let mut out = Vec::new();
        for y in (0..self.height).step_by(step as usize) {
            for x in (0..self.width).step_by(step as usize) {
                if self.get(x, y) > threshold {
                    out.push(Point::new(f64::from(x), f64::from(y)));
                }
            }
        }
        out
    }
}

/// Offset from the op origin to the left end of the baseline.
pub fn anchor_offset(
    align: TextAlign,
    baseline: Baseline,
    width: f64,
    metrics: LineMetrics,
) -> Vec2 {
    let x = match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => -width * 0.5,
        TextAlign::Right => -width,
    };
    let y = match baseline {
        Baseline::Alphabetic => 0.0,
        Baseline::Middle => (metrics.ascent - metrics.descent) * 0.5,
        Baseline::Top => metrics.ascent,
    };
    Vec2::new(x, y)
}

/// Shaping, measurement and rasterization of single lines.
pub trait Typesetter {
    /// Advance width of `text`, without letter spacing.
    fn measure(&mut self, text: &str, font: FontSpec) -> f64;

    fn metrics(&mut self, font: FontSpec) -> LineMetrics;

    fn line_height(&mut self, font: FontSpec) -> f64 {
        let m = self.metrics(font);
        (m.ascent + m.descent) * 1.2
    }

    /// Lay out `op` for drawing. `None` when nothing would be drawn.
    fn place(&mut self, op: &TextOp) -> Option<PlacedText>;

    /// Rasterize `runs` into an alpha mask so callers can sample glyph pixels.
    fn coverage(&mut self, width: u32, height: u32, runs: &[TextOp]) -> AlphaMask {
        rasterize_coverage(self, width, height, runs)
    }
}

fn rasterize_coverage<T: Typesetter + ?Sized>(
    ts: &mut T,
    width: u32,
    height: u32,
    runs: &[TextOp],
) -> AlphaMask {
    let mut mask = AlphaMask::new(width, height);
    let (Ok(w16), Ok(h16)) = (u16::try_from(width), u16::try_from(height)) else {
        tracing::warn!(width, height, "coverage raster too large");
        return mask;
    };
    if w16 == 0 || h16 == 0 {
        return mask;
    }
    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    for op in runs {
        let Some(placed) = ts.place(op) else {
            continue;
        };
        fill_placed(&mut ctx, &placed);
    }
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);
    for (dst, px) in mask
        .data
        .iter_mut()
        .zip(pixmap.data_as_u8_slice().chunks_exact(4))
    {
        *dst = px[3];
    }
    mask
}

/// Fill already placed glyphs with the context's current paint.
pub(crate) fn fill_placed(ctx: &mut vello_cpu::RenderContext, placed: &PlacedText) {
    ctx.set_transform(vello_cpu::kurbo::Affine::new(placed.transform.as_coeffs()));
    match &placed.glyphs {
        PlacedGlyphs::Outline { font, size, glyphs } => {
            ctx.glyph_run(font)
                .font_size(*size)
                .fill_glyphs(glyphs.iter().cloned());
        }
        PlacedGlyphs::Blocks(rects) => {
            for r in rects {
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1));
            }
        }
    }
}

/// Font-free typesetter with fixed advances and box glyphs.
///
/// Deterministic across machines; used when no font files are found and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockTypesetter;

impl BlockTypesetter {
    fn advance(font: FontSpec) -> f64 {
        let ratio = match font.family {
            FontFamily::Serif => 0.5,
            FontFamily::Sans => 0.55,
            FontFamily::Mono => 0.6,
        };
        let bold = if font.bold { 0.05 } else { 0.0 };
        font.size * (ratio + bold)
    }
}

impl Typesetter for BlockTypesetter {
    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        text.chars().count() as f64 * Self::advance(font)
    }

    fn metrics(&mut self, font: FontSpec) -> LineMetrics {
        LineMetrics {
            ascent: font.size * 0.8,
            descent: font.size * 0.2,
        }
    }

    fn place(&mut self, op: &TextOp) -> Option<PlacedText> {
        let adv = Self::advance(op.font);
        let n = op.text.chars().count();
        if n == 0 || adv <= 0.0 {
            return None;
        }
        let width = n as f64 * adv + op.letter_spacing * n as f64;
        let metrics = self.metrics(op.font);
        let anchor = anchor_offset(op.align, op.baseline, width, metrics);
        let cap = op.font.size * 0.7;
        let rects = op
            .text
            .chars()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(i, _)| {
                let x = i as f64 * (adv + op.letter_spacing);
                Rect::new(x + adv * 0.1, -cap, x + adv * 0.9, 0.0)
            })
            .collect::<Vec<_>>();
        if rects.is_empty() {
            return None;
        }
        let mut transform = op.transform * Affine::translate(op.origin.to_vec2() + anchor);
        if op.font.italic {
            transform *= Affine::skew(-0.2, 0.0);
        }
        Some(PlacedText {
            transform,
            glyphs: PlacedGlyphs::Blocks(rects),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/typeset.rs"]
mod tests;
