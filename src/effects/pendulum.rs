use kurbo::BezPath;

use crate::effects::text::TEXT_CONTENT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, glyph};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Vec2, Viewport};
use crate::foundation::math::{closest_on_segment, lerp};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{FontSpec, GradientStop, Paint, StrokeStyle};
use crate::scene::painter::Painter;
use crate::text::layout::{FlowOptions, flow_layout};

const FONT_SIZE: f64 = 14.0;
const LINE_HEIGHT: f64 = 20.0;
const SEGMENTS: usize = 25;
const SEGMENT_LENGTH: f64 = 20.0;
const INFLUENCE: f64 = 90.0;
const RETURN_STRENGTH: f64 = 0.03;
const CHAOS: f64 = 5.0;
const SWIRL: f64 = 0.8;
const DRAG: f64 = 0.92;
const PIVOT_Y: f64 = -50.0;

#[derive(Clone, Debug)]
struct Particle {
    ch: char,
    pos: Point,
    origin: Point,
    vel: Vec2,
}

/// A swinging luminous rope that scatters the essay as it passes.
#[derive(Default)]
pub(crate) struct Pendulum {
    vp: Viewport,
    rng: EffectRng,
    rope: Vec<Point>,
    pivot_x: f64,
    particles: Vec<Particle>,
    time: f64,
}

impl Pendulum {
    fn font() -> FontSpec {
        FontSpec::serif(FONT_SIZE)
    }

    fn rope_path(&self) -> BezPath {
        let pts = &self.rope;
        let mut path = BezPath::new();
        let Some(&first) = pts.first() else {
            return path;
        };
        path.move_to(first);
        for i in 1..SEGMENTS - 2 {
            let mid = pts[i].midpoint(pts[i + 1]);
            path.quad_to(pts[i], mid);
        }
        path.quad_to(pts[SEGMENTS - 2], pts[SEGMENTS - 1]);
        path
    }
}

impl Effect for Pendulum {
    fn id(&self) -> EffectId {
        EffectId::Pendulum
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let cx = vp.w() * 0.5;
        self.rope = (0..SEGMENTS)
            .map(|i| Point::new(cx, i as f64 * SEGMENT_LENGTH - 100.0))
            .collect();
        self.pivot_x = cx;
        self.time = 0.0;

        let opts = FlowOptions::margins(vp.w(), vp.h(), 30.0, 0.1, 0.15, LINE_HEIGHT)
            .centered()
            .char_gap(1.0);
        self.particles = flow_layout(TEXT_CONTENT, Self::font(), opts, ctx.typesetter)
            .into_iter()
            .map(|g| Particle {
                ch: g.ch,
                pos: g.pos,
                origin: g.pos,
                vel: Vec2::ZERO,
            })
            .collect();
        self.rng = ctx.rng(EffectId::Pendulum);
        self.vp = vp;
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        if self.rope.len() < SEGMENTS {
            return;
        }
        let rng = &mut self.rng;
        self.time += 0.015;
        let t = self.time;

        // The pivot drifts toward the pointer so the rope can be steered.
        let target_x = if pointer.inside { pointer.pos.x } else { self.vp.w() * 0.5 };
        self.pivot_x = lerp(self.pivot_x, target_x, 0.05);

        let drive = (t * 1.2).sin() * 1.3 + (t * 0.5).cos() * 0.6;
        self.rope[0] = Point::new(self.pivot_x, PIVOT_Y);
        for i in 1..SEGMENTS {
            let prev = self.rope[i - 1];
            let lag = drive - i as f64 * 0.06 * (t * 0.8).sin();
            let target = Point::new(
                prev.x + lag.sin() * SEGMENT_LENGTH,
                prev.y + lag.cos() * SEGMENT_LENGTH,
            );
            let stiffness = 0.3 - i as f64 * 0.008;
            let cur = &mut self.rope[i];
            cur.x += (target.x - cur.x) * stiffness;
            cur.y += (target.y - cur.y) * stiffness + 1.5;
        }

        for p in &mut self.particles {
            let mut best = f64::INFINITY;
            let mut closest = p.pos;
            for seg in self.rope.windows(2) {
                let (a, b) = (seg[0], seg[1]);
                if p.pos.y < a.y.min(b.y) - 50.0 || p.pos.y > a.y.max(b.y) + 50.0 {
                    continue;
                }
                let c = closest_on_segment(p.pos, a, b);
                let d2 = (p.pos - c).hypot2();
                if d2 < best {
                    best = d2;
                    closest = c;
                }
            }

            if best < INFLUENCE * INFLUENCE {
                let dist = best.sqrt();
                let n = (closest - p.pos) / if dist > 0.0 { dist } else { 1.0 };
                p.vel += Vec2::new(-n.y, n.x) * SWIRL;
                let push = (1.0 - dist / INFLUENCE) * 0.8;
                p.vel -= n * push;
                p.vel += Vec2::new(rng.signed(CHAOS * push), rng.signed(CHAOS * push));
            } else {
                let d = p.origin - p.pos;
                let force = RETURN_STRENGTH.min(d.hypot() * 0.001);
                p.vel += d * force;
            }
            p.vel *= DRAG;
            p.pos += p.vel;
        }
    }

    fn draw(&self, painter: &mut Painter) {
        let Some(&tail) = self.rope.last() else {
            return;
        };
        painter.fill_all(Color::rgba(245, 245, 245, 0.35));

        let gradient = Paint::Linear {
            start: Point::new(self.pivot_x, 0.0),
            end: tail,
            stops: vec![
                GradientStop::new(0.0, Color::rgba(200, 200, 200, 0.0)),
                GradientStop::new(0.5, Color::rgba(217, 34, 34, 0.4)),
                GradientStop::new(1.0, Color::rgba(217, 34, 34, 0.8)),
            ],
        };
        let rope = self.rope_path();
        painter.glow(15.0, Color::rgba(200, 50, 50, 0.5), |p| {
            p.stroke_path(rope, gradient, StrokeStyle::round(2.0));
            p.fill_circle(tail, 4.0, Color::hex(0xD92222));
        });

        let font = Self::font();
        let mut fast = Vec::new();
        for p in &self.particles {
            let speed = p.vel.x.abs() + p.vel.y.abs();
            let displaced = (p.pos.x - p.origin.x).abs() + (p.pos.y - p.origin.y).abs();
            if displaced <= 1.0 {
                painter.text(glyph(p.ch, p.pos, font, Color::BLACK));
                continue;
            }
            let color = Color::BLACK.with_alpha((1.0 - speed * 0.1).max(0.3));
            if speed > 3.0 {
                fast.push(glyph(p.ch, p.pos, font, color));
            } else {
                painter.text(glyph(p.ch, p.pos, font, color));
            }
        }
        if !fast.is_empty() {
            painter.glow(2.0, Color::rgba(0, 0, 0, 0.2), |p| {
                fast.into_iter().for_each(|op| p.text(op));
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pendulum.rs"]
mod tests;
