use std::f64::consts::FRAC_PI_2;

use crate::effects::text::VELOCITY_WORDS;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, place};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{FontSpec, StrokeStyle, TextOp};
use crate::scene::painter::Painter;

const COUNT: usize = 150;
const FOCAL: f64 = 400.0;
const BASE_SPEED: f64 = 0.05;
const MAX_WARP: f64 = 4.0;
/// Depth below which a word leaves a streak.
const STREAK_DEPTH: f64 = 1.0;
const MAX_FONT: f64 = 300.0;

#[derive(Clone, Debug)]
struct Star {
    x: f64,
    y: f64,
    z: f64,
    word: &'static str,
}

impl Star {
    fn spawn(rng: &mut EffectRng, far: bool) -> Self {
        let a = rng.angle();
        let r = rng.range(0.1, 2.1);
        Star {
            x: a.cos() * r,
            y: a.sin() * r,
            z: if far { rng.range(2.0, 7.0) } else { rng.range(0.0, 5.0) },
            word: rng.pick(VELOCITY_WORDS).copied().unwrap_or("FAST"),
        }
    }

    fn project(&self, z: f64, vanish: Point) -> Point {
        Point::new(self.x / z * FOCAL + vanish.x, self.y / z * FOCAL + vanish.y)
    }
}

/// Words rushing out of a vanishing point.
#[derive(Default)]
pub(crate) struct Velocity {
    vp: Viewport,
    rng: EffectRng,
    stars: Vec<Star>,
    /// Pointer in normalized device coordinates.
    steer: Vec2,
    vanish: Point,
    warp: f64,
}

impl Velocity {
    pub(crate) fn warp(&self) -> f64 {
        self.warp
    }
}

impl Effect for Velocity {
    fn id(&self) -> EffectId {
        EffectId::Velocity
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        self.vp = ctx.viewport;
        self.rng = ctx.rng(EffectId::Velocity);
        let rng = &mut self.rng;
        self.stars = (0..COUNT).map(|_| Star::spawn(rng, false)).collect();
        self.steer = Vec2::ZERO;
        self.vanish = self.vp.center();
        self.warp = 1.0;
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        let c = self.vp.center();
        if pointer.inside {
            self.steer = Vec2::new(
                pointer.pos.x / self.vp.w() * 2.0 - 1.0,
                pointer.pos.y / self.vp.h() * 2.0 - 1.0,
            );
        }
        let target = c + Vec2::new(self.steer.x * c.x, self.steer.y * c.y) * 0.2;
        self.vanish = self.vanish.lerp(target, 0.1);
        self.warp = if pointer.down {
            (self.warp * 1.05).min(MAX_WARP)
        } else {
            1.0 + (self.warp - 1.0) * 0.95
        };

        let steer = self.steer * 0.05;
        let speed = BASE_SPEED * self.warp;
        let rng = &mut self.rng;
        for s in &mut self.stars {
            s.z -= speed;
            s.z -= (5.0 - s.z) * 0.01;
            let parallax = 0.1 / s.z.max(0.1);
            s.x -= steer.x * parallax;
            s.y -= steer.y * parallax;
            let escaped = s.z <= 0.01 || (s.x / s.z).abs() > 10.0 || (s.y / s.z).abs() > 10.0;
            if escaped || 10.0 / s.z > MAX_FONT {
                *s = Star::spawn(rng, true);
            }
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::rgba(0, 5, 10, 0.4));
        let v = self.vanish;
        for s in self.stars.iter().filter(|s| s.z > 0.01) {
            let p = s.project(s.z, v);
            let scale = 1.0 / s.z;
            let size = 10.0 * scale;
            if size > MAX_FONT {
                continue;
            }
            let alpha = (scale * 0.5).min(1.0);
            // Doppler tint by depth.
            let color = if s.z > 3.0 {
                Color::rgba(0, 100, 255, alpha)
            } else if s.z < 0.5 {
                Color::rgba(255, 50, 50, alpha)
            } else {
                Color::rgba(200, 240, 255, alpha)
            };
            let spin = (p.y - v.y).atan2(p.x - v.x) + FRAC_PI_2;
            painter.text(
                TextOp::new(s.word, Point::ZERO, FontSpec::sans(size).bold())
                    .centered()
                    .color(color)
                    .transform(place(p, spin)),
            );
            if s.z < STREAK_DEPTH * self.warp {
                let tail = s.project(s.z + 0.1 * self.warp, v);
                painter.stroke_line(p, tail, color, StrokeStyle::new(size * 0.1));
            }
        }
    }

    fn status(&self) -> Option<String> {
        (self.warp > 1.5).then(|| format!("WARP {:.1}", self.warp))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/velocity.rs"]
mod tests;
