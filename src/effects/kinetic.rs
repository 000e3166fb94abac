use crate::effects::text::KINETIC_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Vec2};
use crate::input::pointer::PointerState;
use crate::scene::display::{FontSpec, TextOp};
use crate::scene::painter::Painter;

const CELL_W: f64 = 30.0;
const CELL_H: f64 = 20.0;
const REACH: f64 = 250.0;
const SPOTLIGHT: f64 = 80.0;
const PUSH: f64 = 40.0;
const EASE: f64 = 0.1;

#[derive(Clone, Debug)]
struct Cell {
    word: &'static str,
    pos: Point,
    origin: Point,
    stretch: f64,
}

/// A typewriter grid of words rippling with a slow wave and swelling under the pointer.
#[derive(Default)]
pub(crate) struct Kinetic {
    cells: Vec<Cell>,
    base_size: f64,
    pointer: Option<Point>,
}

impl Kinetic {
    fn highlight(stretch: f64) -> Color {
        let t = (stretch - 1.2) / 1.5;
        Color::rgb(255, (255.0 - t * 50.0) as u8, (200.0 - t * 100.0) as u8)
    }
}

impl Effect for Kinetic {
    fn id(&self) -> EffectId {
        EffectId::Kinetic
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let words: Vec<&'static str> = KINETIC_TEXT.split(' ').collect();
        let cols = ((vp.w() / CELL_W).floor() as usize).max(1);
        let rows = ((vp.h() / CELL_H).floor() as usize).max(1);
        let (cw, ch) = (vp.w() / cols as f64, vp.h() / rows as f64);
        self.cells = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| (x, y)))
            .map(|(x, y)| {
                let origin = Point::new((x as f64 + 0.5) * cw, (y as f64 + 0.5) * ch);
                Cell {
                    word: words[(x + y * cols) % words.len()],
                    pos: origin,
                    origin,
                    stretch: 1.0,
                }
            })
            .collect();
        self.base_size = cw.min(ch) * 0.5;
        self.pointer = None;
    }

    fn step(&mut self, tick: &Tick, pointer: &PointerState) {
        self.pointer = pointer.inside.then_some(pointer.pos);
        let time = tick.time * 2.0;
        for c in &mut self.cells {
            let wave = (c.origin.x * 0.02 + c.origin.y * 0.02 + time).sin() * 3.0;
            let (mut shift, mut scale) = (Vec2::ZERO, 1.0);
            if let Some(m) = self.pointer {
                let d = m - c.origin;
                let dist = d.hypot();
                if dist < REACH && dist > 0.0 {
                    let power = (1.0 - dist / REACH).powi(2);
                    shift = -d / dist * (PUSH * power);
                    scale = 1.0 + power * 1.5;
                }
            }
            let target = c.origin + shift + Vec2::new(0.0, wave);
            c.pos += (target - c.pos) * EASE;
            c.stretch += (scale - c.stretch) * EASE;
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::hex(0x1a1a1a));
        for c in &self.cells {
            let size = self.base_size * c.stretch;
            if size < 2.0 {
                continue;
            }
            let color = if c.stretch > 1.2 {
                Self::highlight(c.stretch)
            } else if self
                .pointer
                .is_some_and(|m| (m - c.origin).hypot() < SPOTLIGHT)
            {
                Color::hex(0xeeeeee)
            } else {
                Color::hex(0x666666)
            };
            painter.text(
                TextOp::new(c.word, c.pos, FontSpec::mono(size).bold())
                    .centered()
                    .color(color),
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/kinetic.rs"]
mod tests;
