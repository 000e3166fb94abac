use std::f64::consts::{FRAC_PI_2, TAU};

use crate::effects::text::CHASM_WORDS;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, place};
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Point, Vec2, Viewport};
use crate::foundation::math::angle_delta;
use crate::foundation::rng::EffectRng;
use crate::input::pointer::{PointerEvent, PointerState};
use crate::scene::display::{FontSpec, GradientStop, Paint, StrokeStyle, TextOp};
use crate::scene::painter::Painter;

const CHASM_RADIUS: f64 = 60.0;
const EVENT_HORIZON: f64 = 180.0;
const GRAB_RADIUS_SQ: f64 = 1600.0;

#[derive(Clone, Debug)]
struct Body {
    word: &'static str,
    pos: Point,
    vel: Vec2,
    angle: f64,
}

/// Tidal distortion of a word at `dist` from the centre: (stretch, thinness, alpha).
fn tidal(dist: f64) -> (f64, f64, f64) {
    if dist >= EVENT_HORIZON {
        return (1.0, 1.0, 1.0);
    }
    let t = ((dist - CHASM_RADIUS) / (EVENT_HORIZON - CHASM_RADIUS)).max(0.0);
    (1.0 + (1.0 - t) * 4.0, 0.2 + t * 0.8, t)
}

/// Words spiral into a chasm and are torn apart on the way in.
#[derive(Default)]
pub(crate) struct Chasm {
    vp: Viewport,
    rng: EffectRng,
    bodies: Vec<Body>,
    /// Grabbed body and where the press started.
    grab: Option<(usize, Point)>,
    cursor: Point,
    swallowed: u64,
}

impl Chasm {
    pub(crate) fn swallowed(&self) -> u64 {
        self.swallowed
    }

    fn respawn(&mut self, i: usize) {
        let c = self.vp.center();
        let a = self.rng.angle();
        let r = self.vp.w().max(self.vp.h()) * 0.7;
        let tangent = a + FRAC_PI_2;
        let b = &mut self.bodies[i];
        b.pos = c + Vec2::new(a.cos(), a.sin()) * r;
        b.vel = Vec2::new(tangent.cos(), tangent.sin()) * 4.0;
        self.swallowed += 1;
    }
}

impl Effect for Chasm {
    fn id(&self) -> EffectId {
        EffectId::Chasm
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Chasm);
        let c = vp.center();
        self.bodies = CHASM_WORDS
            .iter()
            .map(|&word| {
                let a = rng.unit() * TAU;
                let d = rng.range(300.0, 800.0);
                Body {
                    word,
                    pos: c + Vec2::new(a.cos(), a.sin()) * d,
                    vel: Vec2::new(rng.signed(1.0), rng.signed(1.0)),
                    angle: a + FRAC_PI_2,
                }
            })
            .collect();
        self.rng = rng;
        self.grab = None;
        self.cursor = c;
        self.swallowed = 0;
        self.vp = vp;
    }

    fn pointer(&mut self, event: &PointerEvent, _state: &PointerState) {
        match *event {
            PointerEvent::Down { x, y, .. } => {
                let at = Point::new(x, y);
                self.cursor = at;
                self.grab = self
                    .bodies
                    .iter()
                    .position(|b| (b.pos - at).hypot2() < GRAB_RADIUS_SQ)
                    .map(|i| (i, at));
            }
            PointerEvent::Move { x, y } => self.cursor = Point::new(x, y),
            PointerEvent::Up { x, y } => {
                if let Some((i, from)) = self.grab.take() {
                    self.bodies[i].vel = (Point::new(x, y) - from) * 0.2;
                }
            }
            PointerEvent::Leave => self.grab = None,
        }
    }

    fn step(&mut self, _tick: &Tick, _pointer: &PointerState) {
        let c = self.vp.center();
        let held = self.grab.map(|(i, _)| i);
        let mut swallowed = Vec::new();
        for (i, b) in self.bodies.iter_mut().enumerate() {
            if held == Some(i) {
                b.vel = (self.cursor - b.pos) * 0.1;
                b.pos += b.vel;
            } else {
                let d = c - b.pos;
                let dist = d.hypot();
                let pull = 800.0 / (dist + 10.0) * 0.05;
                if dist > 0.0 {
                    b.vel += d / dist * pull;
                }
                b.vel *= 0.99;
                b.pos += b.vel;
                let heading = b.vel.y.atan2(b.vel.x);
                b.angle += angle_delta(b.angle, heading) * 0.1;
            }
            if (c - b.pos).hypot() < CHASM_RADIUS {
                swallowed.push(i);
            }
        }
        for i in swallowed {
            if held == Some(i) {
                self.grab = None;
            }
            self.respawn(i);
        }
    }

    fn draw(&self, painter: &mut Painter) {
        let c = self.vp.center();
        painter.fill_all(Paint::Radial {
            center: c,
            r0: CHASM_RADIUS,
            r1: self.vp.w(),
            stops: vec![
                GradientStop::new(0.0, Color::hex(0x000000)),
                GradientStop::new(0.2, Color::hex(0x1a1a1a)),
                GradientStop::new(1.0, Color::hex(0x050505)),
            ],
        });
        painter.fill_circle(c, CHASM_RADIUS, Color::BLACK);
        painter.stroke_circle(
            c,
            CHASM_RADIUS + 5.0,
            Color::WHITE.with_alpha(0.2),
            StrokeStyle::new(2.0),
        );

        let font = FontSpec::sans(24.0).bold();
        let held = self.grab.map(|(i, _)| i);
        for (i, b) in self.bodies.iter().enumerate() {
            let dist = (c - b.pos).hypot();
            let (stretch, thin, alpha) = tidal(dist);
            let color = if dist < EVENT_HORIZON {
                let gb = (255.0 * alpha).floor() as u8;
                Color::rgba(255, gb, gb, alpha)
            } else if held == Some(i) {
                Color::WHITE
            } else {
                Color::rgba(200, 200, 200, alpha)
            };
            let tf = place(b.pos, b.angle) * Affine::scale_non_uniform(stretch, thin);
            painter.text(TextOp::new(b.word, Point::ZERO, font).centered().color(color).transform(tf));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/chasm.rs"]
mod tests;
