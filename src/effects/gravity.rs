use kurbo::Shape;

use crate::effects::text::GRAVITY_WORDS;
use crate::effects::{place, Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rect, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::{PointerEvent, PointerState};
use crate::scene::display::{FontSpec, GradientStop, Paint, TextOp};
use crate::scene::painter::Painter;

const GRAVITY: f64 = 0.4;
const FRICTION: f64 = 0.96;
const BOUNCE: f64 = 0.5;
const FLOOR_FRICTION: f64 = 0.9;
const FLOOR: f64 = 40.0;
const BODY_H: f64 = 30.0;
const RESTITUTION: f64 = 0.3;
const BLAST_RADIUS: f64 = 400.0;
const HOT_SPEED: f64 = 5.0;
const INK: Color = Color::new(0.102, 0.102, 0.102, 1.0);
const HOT: Color = Color::new(0.851, 0.133, 0.133, 1.0);

#[derive(Clone, Debug)]
struct Body {
    word: &'static str,
    pos: Point,
    vel: Vec2,
    angle: f64,
    spin: f64,
    width: f64,
    mass: f64,
}

impl Body {
    fn radius(&self) -> f64 {
        self.width / 2.2
    }
}

/// Heavy words piling up on a floor; holding the pointer opens a black hole.
#[derive(Default)]
pub(crate) struct Gravity {
    vp: Viewport,
    rng: EffectRng,
    bodies: Vec<Body>,
    well: Option<Point>,
}

impl Gravity {
    fn font() -> FontSpec {
        FontSpec::sans(32.0).bold()
    }

    fn resolve_collisions(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            for j in i + 1..n {
                let (head, tail) = self.bodies.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                let min_dist = a.radius() + b.radius();
                let d = a.pos - b.pos;
                if d.hypot2() >= min_dist * min_dist {
                    continue;
                }
                let dist = d.hypot();
                let normal = if dist > 0.0 { d / dist } else { d };
                let overlap = min_dist - dist;
                let total = a.mass + b.mass;
                a.pos += normal * (overlap * b.mass / total);
                b.pos -= normal * (overlap * a.mass / total);

                let along = (a.vel - b.vel).dot(normal);
                if along < 0.0 {
                    let impulse = -(1.0 + RESTITUTION) * along / (1.0 / a.mass + 1.0 / b.mass);
                    a.vel += normal * (impulse / a.mass);
                    b.vel -= normal * (impulse / b.mass);
                    a.spin += self.rng.signed(0.05);
                    b.spin += self.rng.signed(0.05);
                }
            }
        }
    }

    /// Shove every body within reach of `at` outward.
    fn explode(&mut self, at: Point) {
        for b in &mut self.bodies {
            let d = b.pos - at;
            let dist = d.hypot();
            if dist < BLAST_RADIUS {
                let force = (BLAST_RADIUS - dist) * 0.15;
                let a = d.y.atan2(d.x);
                b.vel += Vec2::new(a.cos(), a.sin()) * force;
                b.spin += self.rng.signed(1.0);
            }
        }
        tracing::trace!(x = at.x, y = at.y, "gravity well released");
    }

    pub(crate) fn resting(&self) -> usize {
        let floor = self.vp.h() - FLOOR - BODY_H / 2.0;
        self.bodies
            .iter()
            .filter(|b| (b.pos.y - floor).abs() < 1.0 && b.vel.y == 0.0)
            .count()
    }
}

impl Effect for Gravity {
    fn id(&self) -> EffectId {
        EffectId::Gravity
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Gravity);
        self.bodies = GRAVITY_WORDS
            .iter()
            .map(|&word| {
                let width = ctx.measure(word, Self::font());
                Body {
                    word,
                    pos: Point::new(
                        rng.unit() * (vp.w() - width).max(0.0),
                        -rng.unit() * 800.0 - 100.0,
                    ),
                    vel: Vec2::new(rng.signed(2.0), 0.0),
                    angle: rng.signed(1.0),
                    spin: rng.signed(0.1),
                    width,
                    mass: (width * 0.05).max(0.01),
                }
            })
            .collect();
        self.rng = rng;
        self.well = None;
        self.vp = vp;
    }

    fn pointer(&mut self, event: &PointerEvent, _state: &PointerState) {
        if let PointerEvent::Up { x, y } = *event {
            self.explode(Point::new(x, y));
        }
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        self.well = pointer.down.then_some(pointer.pos);
        self.resolve_collisions();

        let (w, h) = (self.vp.w(), self.vp.h());
        let floor = h - FLOOR - BODY_H / 2.0;
        for b in &mut self.bodies {
            match self.well {
                Some(m) => {
                    let d = m - b.pos;
                    let force = 300.0 / (d.hypot() + 10.0);
                    let a = d.y.atan2(d.x);
                    b.vel += Vec2::new(a.cos(), a.sin()) * force;
                    b.vel *= 0.9;
                    b.spin += self.rng.signed(0.05);
                }
                None => {
                    b.vel.y += GRAVITY;
                    b.vel *= FRICTION;
                    b.spin *= 0.95;
                }
            }
            b.pos += b.vel;
            b.angle += b.spin;

            if b.pos.y > floor {
                b.pos.y = floor;
                b.vel.y *= -BOUNCE;
                b.vel.x *= FLOOR_FRICTION;
                if b.vel.y.abs() < GRAVITY {
                    b.vel.y = 0.0;
                }
            }
            let half = b.width / 2.0;
            if b.pos.x - half < 0.0 {
                b.pos.x = half;
                b.vel.x *= -BOUNCE;
            }
            if b.pos.x + half > w {
                b.pos.x = w - half;
                b.vel.x *= -BOUNCE;
            }
        }
    }

    fn draw(&self, painter: &mut Painter) {
        let (w, h) = (self.vp.w(), self.vp.h());
        painter.fill_all(Color::hex(0xf5f5f5));

        if let Some(m) = self.well {
            painter.fill_circle(m, 20.0, Color::BLACK.with_alpha(0.1));
            painter.fill_circle(
                m,
                800.0,
                Paint::Radial {
                    center: m,
                    r0: 20.0,
                    r1: 400.0,
                    stops: vec![
                        GradientStop::new(0.0, Color::BLACK.with_alpha(0.1)),
                        GradientStop::new(1.0, Color::TRANSPARENT),
                    ],
                },
            );
        }

        let font = Self::font();
        for b in &self.bodies {
            let tf = place(b.pos, b.angle);
            let shadow = Rect::from_center_size(Point::new(3.0, 3.0), (b.width, BODY_H));
            painter.fill_path_tf(shadow.to_path(0.1), Color::BLACK.with_alpha(0.15), tf);
            let color = if self.well.is_some() {
                Color::BLACK
            } else if b.vel.x.abs() + b.vel.y.abs() > HOT_SPEED {
                HOT
            } else {
                INK
            };
            painter.text(
                TextOp::new(b.word, Point::ZERO, font)
                    .centered()
                    .transform(tf)
                    .color(color),
            );
        }

        painter.fill_rect(Rect::new(0.0, h - FLOOR, w, h), Color::hex(0x111111));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gravity.rs"]
mod tests;
