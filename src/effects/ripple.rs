use crate::effects::text::RIPPLE_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, glyph, glyph_tf};
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Point};
use crate::input::pointer::{PointerEvent, PointerState};
use crate::scene::display::{Composite, FontSpec, PassSpec};
use crate::scene::painter::Painter;
use crate::text::layout::wrap_words;

const CELL: f64 = 12.0;
const DAMPING: f64 = 0.97;
const IMPULSE: f64 = 400.0;
const SPLASH: f64 = 600.0;
/// Heights below this draw the plain glyph.
const CALM: f64 = 0.1;
const CHANNELS: [(u8, u8, u8, f64); 3] = [(255, 0, 0, 0.15), (0, 255, 0, 0.10), (0, 0, 255, 0.05)];

#[derive(Clone, Debug)]
struct Letter {
    ch: char,
    pos: Point,
}

/// Classic two-buffer water ripple under a chromatic headline.
#[derive(Default)]
pub(crate) struct Ripple {
    cols: usize,
    rows: usize,
    current: Vec<f64>,
    previous: Vec<f64>,
    letters: Vec<Letter>,
    font_size: f64,
}

impl Ripple {
    fn height_at(&self, p: Point) -> f64 {
        let (x, y) = ((p.x / CELL).floor(), (p.y / CELL).floor());
        if x < 0.0 || y < 0.0 || x >= self.cols as f64 || y >= self.rows as f64 {
            return 0.0;
        }
        self.current[y as usize * self.cols + x as usize]
    }

    fn disturb(&mut self, p: Point, radius: i64, strength: f64) {
        let (cx, cy) = ((p.x / CELL).floor() as i64, (p.y / CELL).floor() as i64);
        for y in cy - radius..=cy + radius {
            for x in cx - radius..=cx + radius {
                if x < 0 || y < 0 || x >= self.cols as i64 || y >= self.rows as i64 {
                    continue;
                }
                self.previous[y as usize * self.cols + x as usize] = strength;
            }
        }
    }

    pub(crate) fn energy(&self) -> f64 {
        self.current.iter().map(|h| h.abs()).sum()
    }
}

impl Effect for Ripple {
    fn id(&self) -> EffectId {
        EffectId::Ripple
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        self.cols = (vp.w() / CELL).ceil() as usize;
        self.rows = (vp.h() / CELL).ceil() as usize;
        self.current = vec![0.0; self.cols * self.rows];
        self.previous = vec![0.0; self.cols * self.rows];

        let size = (vp.w() / 15.0).min(60.0);
        let font = FontSpec::serif(size).bold();
        let lines = wrap_words(RIPPLE_TEXT, vp.w() * 0.7, font, ctx.typesetter);
        let start_y = vp.h() / 2.0 - lines.len() as f64 * size * 0.8;
        self.letters.clear();
        for (i, line) in lines.iter().enumerate() {
            let mut x = vp.w() / 2.0 - ctx.measure(line, font) / 2.0;
            let y = start_y + i as f64 * size * 1.2;
            for ch in line.chars() {
                let cw = ctx.measure(ch.encode_utf8(&mut [0u8; 4]), font);
                if !ch.is_whitespace() {
                    self.letters.push(Letter {
                        ch,
                        pos: Point::new(x + cw / 2.0, y),
                    });
                }
                x += cw;
            }
        }
        self.font_size = size;
    }

    fn pointer(&mut self, event: &PointerEvent, _state: &PointerState) {
        if self.current.is_empty() {
            return;
        }
        match *event {
            PointerEvent::Move { x, y } => self.disturb(Point::new(x, y), 2, IMPULSE),
            PointerEvent::Down { x, y, .. } => self.disturb(Point::new(x, y), 4, SPLASH),
            _ => {}
        }
    }

    fn step(&mut self, _tick: &Tick, _pointer: &PointerState) {
        let cols = self.cols;
        for y in 1..self.rows.saturating_sub(1) {
            for x in 1..cols.saturating_sub(1) {
                let i = y * cols + x;
                let p = &self.previous;
                let h = (p[i - 1] + p[i + 1] + p[i - cols] + p[i + cols]) / 2.0 - self.current[i];
                self.current[i] = h * DAMPING;
            }
        }
        std::mem::swap(&mut self.current, &mut self.previous);
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::hex(0xf5f5f5));
        let font = FontSpec::serif(self.font_size).bold();

        let mut calm = Vec::new();
        let mut rippled = Vec::new();
        for l in &self.letters {
            let h = self.height_at(l.pos);
            if h.abs() > CALM {
                rippled.push((l, h));
            } else {
                calm.push(glyph(l.ch, l.pos, font, Color::BLACK));
            }
        }
        calm.into_iter().for_each(|op| painter.text(op));

        // Each channel multiplies onto what is already there.
        for (r, g, b, mult) in CHANNELS {
            if rippled.is_empty() {
                break;
            }
            let color = Color::rgba(r, g, b, 0.5);
            painter.pass(PassSpec::screen().composite(Composite::Multiply), |p| {
                for &(l, h) in &rippled {
                    let tf = Affine::translate((l.pos.x + h * mult, l.pos.y + h * mult))
                        * Affine::scale(1.0 + h * 0.002);
                    p.text(glyph_tf(l.ch, tf, font, color));
                }
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/ripple.rs"]
mod tests;
