use crate::effects::text::TEXT_CONTENT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, glyph};
use crate::foundation::color::Color;
use crate::foundation::core::Point;
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::FontSpec;
use crate::scene::painter::Painter;

const FONT_SIZE: f64 = 10.0;
const CHAR_W: f64 = 6.0;
const LINE_H: f64 = 10.0;
const MARGIN: usize = 4;
const BRUSH: i64 = 5;
/// Chance a grain moves in a given step.
const MOVE_PROB: f64 = 0.9;

#[derive(Clone, Debug)]
struct Grain {
    ch: char,
    x: usize,
    y: usize,
    active: bool,
}

/// Falling-sand automaton over a column-major grid of grain indices.
#[derive(Default)]
pub(crate) struct Erosion {
    rng: EffectRng,
    cols: usize,
    rows: usize,
    grid: Vec<Option<usize>>,
    grains: Vec<Grain>,
    active: Vec<usize>,
}

impl Erosion {
    fn cell(&self, x: usize, y: usize) -> Option<usize> {
        self.grid[x * self.rows + y]
    }

    fn is_free(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_none()
    }

    fn relocate(&mut self, gi: usize, nx: usize, ny: usize) {
        let (ox, oy) = (self.grains[gi].x, self.grains[gi].y);
        self.grid[ox * self.rows + oy] = None;
        self.grid[nx * self.rows + ny] = Some(gi);
        self.grains[gi].x = nx;
        self.grains[gi].y = ny;
        // Whatever rested on the vacated cell loses its support.
        if oy > 0 {
            for x in ox.saturating_sub(1)..=(ox + 1).min(self.cols - 1) {
                self.wake(x, oy - 1);
            }
        }
    }

    fn wake(&mut self, x: usize, y: usize) {
        let Some(gi) = self.cell(x, y) else {
            return;
        };
        if !self.grains[gi].active {
            self.grains[gi].active = true;
            self.active.push(gi);
        }
    }

    fn wake_around(&mut self, p: Point) {
        let gx = (p.x / CHAR_W).floor() as i64;
        let gy = (p.y / LINE_H).floor() as i64;
        for i in -BRUSH..=BRUSH {
            for j in -BRUSH..=BRUSH {
                if i * i + j * j > BRUSH * BRUSH {
                    continue;
                }
                let (x, y) = (gx + i, gy + j);
                if x < 0 || y < 0 || x >= self.cols as i64 || y >= self.rows as i64 {
                    continue;
                }
                self.wake(x as usize, y as usize);
            }
        }
    }

    pub(crate) fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl Effect for Erosion {
    fn id(&self) -> EffectId {
        EffectId::Erosion
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        self.cols = (vp.w() / CHAR_W).floor() as usize;
        self.rows = (vp.h() / LINE_H).floor().max(1.0) as usize;
        self.grid = vec![None; self.cols * self.rows];
        self.grains.clear();
        self.active.clear();
        let text: Vec<char> = TEXT_CONTENT.replace('\n', " ").chars().collect();
        let mut chars = text.iter().copied().cycle();
        for y in MARGIN..self.rows.saturating_sub(MARGIN) {
            for x in MARGIN..self.cols.saturating_sub(MARGIN) {
                let Some(ch) = chars.next() else {
                    break;
                };
                if ch == ' ' {
                    continue;
                }
                self.grid[x * self.rows + y] = Some(self.grains.len());
                self.grains.push(Grain {
                    ch,
                    x,
                    y,
                    active: false,
                });
            }
        }
        self.rng = ctx.rng(EffectId::Erosion);
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        if self.grid.is_empty() {
            return;
        }
        if pointer.inside {
            self.wake_around(pointer.pos);
        }

        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            let gi = self.active[i];
            if self.rng.unit() > MOVE_PROB {
                continue;
            }
            let Grain { x, y, .. } = self.grains[gi];
            if y + 1 >= self.rows {
                // Resting on the floor.
                self.grains[gi].active = false;
                self.active.swap_remove(i);
                continue;
            }
            if self.is_free(x, y + 1) {
                self.relocate(gi, x, y + 1);
                continue;
            }
            let left = x > 0 && self.is_free(x - 1, y + 1);
            let right = x + 1 < self.cols && self.is_free(x + 1, y + 1);
            match (left, right) {
                (true, true) => {
                    let nx = if self.rng.chance(0.5) { x - 1 } else { x + 1 };
                    self.relocate(gi, nx, y + 1);
                }
                (true, false) => self.relocate(gi, x - 1, y + 1),
                (false, true) => self.relocate(gi, x + 1, y + 1),
                (false, false) => {
                    // Surrounded: sleep until the brush wakes it again.
                    self.grains[gi].active = false;
                    self.active.swap_remove(i);
                }
            }
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::hex(0xe8e6e1));
        let font = FontSpec::serif(FONT_SIZE);
        for g in &self.grains {
            let pos = Point::new(
                g.x as f64 * CHAR_W + CHAR_W / 2.0,
                g.y as f64 * LINE_H + LINE_H / 2.0,
            );
            let color = if g.active {
                Color::hex(0x111111)
            } else {
                Color::hex(0x333333)
            };
            painter.text(glyph(g.ch, pos, font, color));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/erosion.rs"]
mod tests;
