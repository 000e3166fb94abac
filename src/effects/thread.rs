use crate::effects::text::THREAD_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Vec2};
use crate::input::pointer::PointerState;
use crate::scene::display::{FontSpec, StrokeStyle, TextOp};
use crate::scene::painter::Painter;

const SPACING: f64 = 60.0;
const MARGIN: f64 = 100.0;
const LINK_DIST: f64 = 120.0;
const REACH: f64 = 200.0;
const SPRING: f64 = 0.05;
const DAMPING: f64 = 0.9;
const SKIP_CHANCE: f64 = 0.2;
/// Displacement past which a knot turns red.
const STRAIN: f64 = 20.0;
/// Displacement past which its threads start to redden.
const TENSION: f64 = 30.0;
const SWAY: f64 = 2.0;
const CRIMSON: Color = Color::new(0.851, 0.133, 0.133, 1.0);

#[derive(Clone, Debug)]
struct Knot {
    word: &'static str,
    pos: Point,
    origin: Point,
    vel: Vec2,
}

impl Knot {
    fn displacement(&self) -> f64 {
        (self.pos - self.origin).hypot()
    }
}

/// A hexagonal web of words tied together by threads that redden under tension.
#[derive(Default)]
pub(crate) struct Thread {
    knots: Vec<Knot>,
}

impl Thread {
    fn thread_color(strain: f64, alpha: f64) -> Color {
        if strain > TENSION {
            let t = ((strain - TENSION) / 50.0).min(1.0);
            Color::rgba(220, 20, 60, alpha * t + 0.1)
        } else {
            Color::rgba(200, 200, 200, alpha)
        }
    }

    pub(crate) fn strained(&self) -> usize {
        self.knots.iter().filter(|k| k.displacement() > STRAIN).count()
    }
}

impl Effect for Thread {
    fn id(&self) -> EffectId {
        EffectId::Thread
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Thread);
        let mut words = THREAD_TEXT.split(' ').cycle();
        let row_step = SPACING * (60f64).to_radians().sin();
        self.knots.clear();

        let mut row = 0;
        let mut y = MARGIN;
        while y < vp.h() - MARGIN {
            row += 1;
            let shift = if row % 2 == 0 { SPACING / 2.0 } else { 0.0 };
            let mut x = MARGIN;
            while x < vp.w() - MARGIN {
                if rng.chance(SKIP_CHANCE) {
                    x += SPACING;
                    continue;
                }
                let origin = Point::new(x + shift, y);
                let jitter = Vec2::new(rng.signed(20.0), rng.signed(20.0));
                self.knots.push(Knot {
                    word: words.next().unwrap_or("*"),
                    pos: origin + jitter,
                    origin,
                    vel: Vec2::ZERO,
                });
                x += SPACING;
            }
            y += row_step;
        }
        tracing::debug!(knots = self.knots.len(), "web spun");
    }

    fn step(&mut self, tick: &Tick, pointer: &PointerState) {
        let mouse = pointer.inside.then_some(pointer.pos);
        for k in &mut self.knots {
            let sway = Vec2::new((tick.time + k.origin.y * 0.01).sin() * SWAY, 0.0);
            k.vel += (k.origin + sway - k.pos) * SPRING;
            if let Some(m) = mouse {
                let d = k.pos - m;
                let dist = d.hypot();
                if dist < REACH && dist > 0.0 {
                    k.vel += d / dist * ((1.0 - dist / REACH) * 2.0);
                }
            }
            k.vel *= DAMPING;
            k.pos += k.vel;
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::WHITE);
        let style = StrokeStyle::new(1.0);
        for (i, a) in self.knots.iter().enumerate() {
            for b in &self.knots[i + 1..] {
                let dist = (a.pos - b.pos).hypot();
                if dist >= LINK_DIST {
                    continue;
                }
                let strain = a.displacement().max(b.displacement());
                let color = Self::thread_color(strain, 1.0 - dist / LINK_DIST);
                painter.stroke_line(a.pos, b.pos, color, style);
            }
        }

        let font = FontSpec::sans(10.0);
        for k in &self.knots {
            let color = if k.displacement() > STRAIN { CRIMSON } else { Color::BLACK };
            painter.text(TextOp::new(k.word, k.pos, font).centered().color(color));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/thread.rs"]
mod tests;
