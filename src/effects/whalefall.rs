use kurbo::BezPath;

use crate::effects::text::THREAD_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, glyph};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Viewport};
use crate::input::pointer::{PointerButton, PointerEvent, PointerState};
use crate::scene::display::{FontSpec, StrokeStyle};
use crate::scene::painter::Painter;

const SPACING: f64 = 18.0;
const ROW_SPACING: f64 = SPACING * 1.5;
const ITERATIONS: usize = 3;
const GRAVITY: f64 = 0.15;
const FRICTION: f64 = 0.98;
const TEAR_THRESHOLD: f64 = SPACING * 4.0;
const CUT_RADIUS_SQ: f64 = 225.0;
const FLOOR_GAP: f64 = 20.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Mode {
    #[default]
    Weave,
    Tear,
}

#[derive(Clone, Debug)]
struct Knot {
    pos: Point,
    prev: Point,
    pinned: bool,
    ch: char,
}

#[derive(Clone, Copy, Debug)]
struct Link {
    a: usize,
    b: usize,
    rest: f64,
    broken: bool,
}

/// Verlet cloth woven from letters. Drag it, or switch to the blade and cut it apart.
#[derive(Default)]
pub(crate) struct Textile {
    vp: Viewport,
    knots: Vec<Knot>,
    links: Vec<Link>,
    mode: Mode,
    blade: Option<Point>,
}

impl Textile {
    pub(crate) fn link_count(&self) -> usize {
        self.links.len()
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    fn integrate(&mut self, pointer: &PointerState) {
        let m = pointer.pos;
        let mv = pointer.velocity();
        let floor = self.vp.h() - FLOOR_GAP;
        let pressing = pointer.down && pointer.inside;
        for k in self.knots.iter_mut().filter(|k| !k.pinned) {
            let vel = (k.pos - k.prev) * FRICTION;
            k.prev = k.pos;
            k.pos += vel;
            k.pos.y += GRAVITY;

            let d = k.pos - m;
            let dist = d.hypot();
            if pressing && dist > 0.0 {
                match self.mode {
                    // The blade nudges fibres aside so the cut is visible.
                    Mode::Tear if dist < 20.0 => {
                        k.pos += d / dist * ((20.0 - dist) / 10.0);
                    }
                    Mode::Weave if dist < 50.0 => {
                        let force = (50.0 - dist) / 50.0;
                        k.pos += mv * (force * 0.8) + d / dist * (force * 2.0);
                    }
                    _ => {}
                }
            }

            if k.pos.y > floor {
                k.pos.y = floor;
                k.prev.x = k.pos.x - (k.pos.x - k.prev.x) * 0.5;
            }
        }
    }

    fn solve(&mut self, pointer: &PointerState) {
        let cutting = self.mode == Mode::Tear && pointer.down && pointer.inside;
        let m = pointer.pos;
        for _ in 0..ITERATIONS {
            for link in self.links.iter_mut().rev().filter(|l| !l.broken) {
                let (p1, p2) = (self.knots[link.a].pos, self.knots[link.b].pos);
                let d = p1 - p2;
                let dist = d.hypot();
                let severed = cutting && (p1.midpoint(p2) - m).hypot2() < CUT_RADIUS_SQ;
                if dist > TEAR_THRESHOLD || severed {
                    link.broken = true;
                    continue;
                }
                if dist <= f64::EPSILON {
                    continue;
                }
                let offset = d * ((link.rest - dist) / dist * 0.5);
                if !self.knots[link.a].pinned {
                    self.knots[link.a].pos += offset;
                }
                if !self.knots[link.b].pinned {
                    self.knots[link.b].pos -= offset;
                }
            }
        }
        self.links.retain(|l| !l.broken);
    }
}

impl Effect for Textile {
    fn id(&self) -> EffectId {
        EffectId::Whalefall
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let cols = (vp.w() / SPACING).ceil() as usize + 2;
        let rows = (vp.h() / SPACING / 1.5).ceil().max(1.0) as usize;
        let mut chars = THREAD_TEXT.chars().cycle();
        self.knots = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| (x, y)))
            .map(|(x, y)| {
                let pos = Point::new((x as f64 - 1.0) * SPACING, y as f64 * ROW_SPACING - 50.0);
                Knot {
                    pos,
                    prev: pos,
                    pinned: y == 0,
                    ch: chars.next().unwrap_or('.'),
                }
            })
            .collect();

        let idx = |x: usize, y: usize| y * cols + x;
        self.links.clear();
        for y in 0..rows {
            for x in 0..cols {
                if x + 1 < cols {
                    self.links.push(Link {
                        a: idx(x, y),
                        b: idx(x + 1, y),
                        rest: SPACING,
                        broken: false,
                    });
                }
                if y + 1 < rows {
                    self.links.push(Link {
                        a: idx(x, y),
                        b: idx(x, y + 1),
                        rest: ROW_SPACING,
                        broken: false,
                    });
                }
            }
        }
        self.mode = Mode::Weave;
        self.blade = None;
        self.vp = vp;
    }

    fn pointer(&mut self, event: &PointerEvent, _state: &PointerState) {
        if let PointerEvent::Down {
            button: PointerButton::Secondary,
            ..
        } = event
        {
            self.mode = Mode::Tear;
        }
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        self.integrate(pointer);
        self.solve(pointer);
        self.blade = (self.mode == Mode::Tear && pointer.inside).then_some(pointer.pos);
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::hex(0x0a0a0a));

        let mut threads = BezPath::new();
        for l in &self.links {
            threads.move_to(self.knots[l.a].pos);
            threads.line_to(self.knots[l.b].pos);
        }
        if !self.links.is_empty() {
            painter.stroke_path(threads, Color::rgba(100, 200, 255, 0.15), StrokeStyle::new(1.0));
        }

        let font = FontSpec::mono(14.0);
        let visible = self.vp.rect().inflate(20.0, 20.0);
        let ink = Color::hex(0xe0e0e0);
        for k in self.knots.iter().filter(|k| visible.contains(k.pos)) {
            painter.text(glyph(k.ch, k.pos, font, ink));
        }
        if let Some(at) = self.blade {
            draw_blade(painter, at);
        }
    }

    fn status(&self) -> Option<String> {
        Some(
            match self.mode {
                Mode::Weave => "WEAVE",
                Mode::Tear => "DECONSTRUCT",
            }
            .to_owned(),
        )
    }
}

fn draw_blade(painter: &mut Painter, at: Point) {
    let red = Color::hex(0xff4444);
    let style = StrokeStyle::new(2.0);
    painter.stroke_circle(at, 15.0, red, style);
    painter.stroke_line(
        Point::new(at.x - 20.0, at.y),
        Point::new(at.x + 20.0, at.y),
        red,
        style,
    );
    painter.stroke_line(
        Point::new(at.x, at.y - 20.0),
        Point::new(at.x, at.y + 20.0),
        red,
        style,
    );
}

#[cfg(test)]
#[path = "../../tests/unit/effects/whalefall.rs"]
mod tests;
