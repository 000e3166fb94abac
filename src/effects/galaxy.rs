use kurbo::BezPath;

use crate::effects::text::GALAXY_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Viewport};
use crate::input::pointer::PointerState;
use crate::scene::display::{Composite, FontSpec, PassSpec, StrokeStyle, TextOp};
use crate::scene::painter::Painter;

const COUNT: usize = 150;
const INNER: f64 = 50.0;
const TILT: f64 = 0.005;
const LINK_REACH: usize = 10;
const LINK_DIST_SQ: f64 = 4000.0;
const DEPTH: f64 = 500.0;
/// How far a held press draws the disc in.
const SQUEEZE: f64 = 0.6;

#[derive(Clone, Debug)]
struct Star {
    word: &'static str,
    angle: f64,
    radius: f64,
    speed: f64,
    size: f64,
    color: Color,
    pos: Point,
    z: f64,
}

/// Colour by fraction of the disc radius: cream core, gold, orchid, royal blue rim.
fn band_color(t: f64) -> Color {
    match t {
        t if t < 0.2 => Color::hex(0xfffdd0),
        t if t < 0.4 => Color::hex(0xffd700),
        t if t < 0.7 => Color::hex(0xba55d3),
        _ => Color::hex(0x4169e1),
    }
}

/// A tilted spiral disc of words; the pointer leans it and a press pulls it inward.
#[derive(Default)]
pub(crate) struct Galaxy {
    vp: Viewport,
    stars: Vec<Star>,
    pull: f64,
}

impl Galaxy {
    pub(crate) fn pull(&self) -> f64 {
        self.pull
    }
}

impl Effect for Galaxy {
    fn id(&self) -> EffectId {
        EffectId::Galaxy
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        self.vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Galaxy);
        let words: Vec<&'static str> = GALAXY_TEXT.split(' ').collect();
        let half = self.vp.w().min(self.vp.h()) / 2.0;
        let c = self.vp.center();
        self.stars = (0..COUNT)
            .map(|i| {
                let angle = rng.angle();
                let radius = INNER + rng.unit().powi(2) * (half - INNER).max(0.0);
                Star {
                    word: words[i % words.len()],
                    angle: angle + rng.unit() * 0.5,
                    radius,
                    speed: 0.002 + 0.5 / radius,
                    size: rng.range(10.0, 18.0),
                    color: band_color(radius / half),
                    pos: c,
                    z: 0.0,
                }
            })
            .collect();
        self.pull = 0.0;
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        let target = if pointer.down { 1.0 } else { 0.0 };
        self.pull += (target - self.pull) * 0.05;

        let c = self.vp.center();
        let lean = (pointer.pos - c) * TILT;
        let (sx, cx) = lean.x.sin_cos();
        let (sy, cy) = lean.y.sin_cos();
        let hub = c.lerp(pointer.pos, self.pull * 0.5);
        let squeeze = 1.0 - self.pull * SQUEEZE;
        let spin = 1.0 + self.pull * 2.0;

        for s in &mut self.stars {
            s.angle += s.speed * spin;
            let r = s.radius * squeeze;
            let (sin, cos) = s.angle.sin_cos();
            let (x, y, z) = (cos * r, sin * r * 0.6, sin * r * 0.5);
            let ty = y * cy - z * sy;
            let tz = y * sy + z * cy;
            let tx = x * cx - tz * sx;
            s.z = x * sx + tz * cx;
            s.pos = Point::new(hub.x + tx, hub.y + ty);
        }
        // Far to near.
        self.stars.sort_by(|a, b| a.z.total_cmp(&b.z));
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::rgba(10, 10, 15, 0.4));
        painter.pass(PassSpec::screen().composite(Composite::Lighter), |p| {
            let mut links = BezPath::new();
            for (i, a) in self.stars.iter().enumerate() {
                if a.z < 0.0 {
                    continue;
                }
                for b in &self.stars[i + 1..(i + LINK_REACH).min(self.stars.len())] {
                    if (a.pos - b.pos).hypot2() < LINK_DIST_SQ {
                        links.move_to(a.pos);
                        links.line_to(b.pos);
                    }
                }
            }
            p.stroke_path(links, Color::rgba(150, 200, 255, 0.15), StrokeStyle::new(0.5));

            for s in &self.stars {
                let scale = (s.z + DEPTH) / DEPTH;
                if scale <= 0.0 {
                    continue;
                }
                let alpha = scale.clamp(0.1, 1.0);
                let font = FontSpec::sans((s.size * scale).max(8.0));
                p.text(
                    TextOp::new(s.word, s.pos, font)
                        .centered()
                        .color(s.color.with_alpha(alpha)),
                );
            }
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/galaxy.rs"]
mod tests;
