use crate::effects::text::TEXT_CONTENT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, glyph};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Vec2, Viewport};
use crate::input::pointer::PointerState;
use crate::scene::display::FontSpec;
use crate::scene::painter::Painter;

const FONT_SIZE: f64 = 11.0;
const SPACING_X: f64 = 14.0;
const SPACING_Y: f64 = 18.0;
const SPRING: f64 = 0.05;
const FRICTION: f64 = 0.92;
const RADIUS: f64 = 150.0;
const FORCE: f64 = 0.6;

#[derive(Clone, Debug)]
struct Cell {
    ch: char,
    origin: Point,
    pos: Point,
    vel: Vec2,
}

/// A terminal-like character grid that flows with the pointer and springs home.
#[derive(Default)]
pub(crate) struct Fluid {
    vp: Viewport,
    cells: Vec<Cell>,
    drag: Vec2,
}

impl Effect for Fluid {
    fn id(&self) -> EffectId {
        EffectId::Fluid
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let cols = (vp.w() / SPACING_X).ceil() as usize;
        let rows = (vp.h() / SPACING_Y).ceil() as usize;
        let text: Vec<char> = TEXT_CONTENT
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let mut chars = text.iter().copied().cycle();
        self.cells = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| (x, y)))
            .filter_map(|(x, y)| {
                let origin = Point::new(
                    x as f64 * SPACING_X + SPACING_X / 2.0,
                    y as f64 * SPACING_Y + SPACING_Y / 2.0,
                );
                Some(Cell {
                    ch: chars.next()?,
                    origin,
                    pos: origin,
                    vel: Vec2::ZERO,
                })
            })
            .collect();
        self.drag = Vec2::ZERO;
        self.vp = vp;
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        let v = pointer.velocity();
        if v.hypot2() > 0.0 {
            self.drag = v;
        }
        let m = pointer.pos;
        for c in &mut self.cells {
            c.vel += (c.origin - c.pos) * SPRING;
            let d = c.pos - m;
            let dist = d.hypot();
            if pointer.inside && dist < RADIUS && dist > 0.0 {
                let force = (1.0 - dist / RADIUS) * FORCE;
                c.vel += self.drag * (force * 0.5) + d / dist * (force * 2.0);
            }
            c.vel *= FRICTION;
            c.pos += c.vel;
        }
        self.drag *= 0.8;
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::hex(0x080808));
        let font = FontSpec::mono(FONT_SIZE);
        let visible = self.vp.rect().inflate(20.0, 20.0);
        for c in &self.cells {
            if !visible.contains(c.pos) {
                continue;
            }
            let speed = c.vel.x.abs() + c.vel.y.abs();
            let color = if speed > 1.0 {
                Color::rgba(100, 255, 218, 0.5 + (speed * 0.1).min(1.0) * 0.5)
            } else {
                Color::hex(0x444444)
            };
            painter.text(glyph(c.ch, c.pos, font, color));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fluid.rs"]
mod tests;
