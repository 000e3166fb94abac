use std::f64::consts::PI;

use kurbo::BezPath;

use crate::effects::text::SYNTAX_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, glyph_tf, place};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rect, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{FontSpec, StrokeStyle, TextOp};
use crate::scene::painter::Painter;

const WIRE_COUNT: usize = 6;
const WIRE_SPACING: f64 = 70.0;
const POINTS_PER_WIRE: usize = 40;
const DAMPING: f64 = 0.94;
const PLUCK_RADIUS: f64 = 40.0;
const RELEASE_SPEED: f64 = 4.0;
const SYMBOLS: [char; 9] = ['∑', '∫', '∞', '≠', '≈', '∇', '∂', '∅', '∏'];

#[derive(Clone, Copy, Debug)]
struct WirePoint {
    x: f64,
    rest_y: f64,
    dy: f64,
    vel: f64,
}

impl WirePoint {
    fn pos(&self) -> Point {
        Point::new(self.x, self.rest_y + self.dy)
    }
}

#[derive(Clone, Debug)]
struct Wire {
    points: Vec<WirePoint>,
    tension: f64,
}

impl Wire {
    /// Position, slope angle and transverse speed at parameter `t` in `0..=1`.
    fn sample(&self, t: f64) -> (Point, f64, f64) {
        let last = self.points.len() - 1;
        let f = t.clamp(0.0, 1.0) * last as f64;
        let i = (f.floor() as usize).min(last);
        let s = f - i as f64;
        let (p1, p2) = (self.points[i], self.points[(i + 1).min(last)]);
        let (a, b) = (p1.pos(), p2.pos());
        let d = b - a;
        (a.lerp(b, s), d.y.atan2(d.x), p1.vel * (1.0 - s) + p2.vel * s)
    }

    fn path(&self) -> BezPath {
        let pts: Vec<Point> = self.points.iter().map(WirePoint::pos).collect();
        let n = pts.len();
        let mut path = BezPath::new();
        path.move_to(pts[0]);
        for i in 1..n - 2 {
            path.quad_to(pts[i], pts[i].midpoint(pts[i + 1]));
        }
        path.quad_to(pts[n - 2], pts[n - 1]);
        path
    }
}

#[derive(Clone, Debug)]
struct Note {
    ch: char,
    wire: usize,
    t: f64,
    pos: Point,
    vel: Vec2,
    angle: f64,
    floating: bool,
}

/// Letters strung along vibrating wires. Pluck a wire hard enough and they fly off.
#[derive(Default)]
pub(crate) struct Syntax {
    vp: Viewport,
    rng: EffectRng,
    wires: Vec<Wire>,
    notes: Vec<Note>,
}

impl Syntax {
    pub(crate) fn floating(&self) -> usize {
        self.notes.iter().filter(|n| n.floating).count()
    }

    fn pluck(&mut self, pointer: &PointerState) {
        let m = pointer.pos;
        let push = pointer.velocity().y.abs() * 0.5 + 2.0;
        for wire in &mut self.wires {
            let n = wire.points.len();
            for p in &mut wire.points[1..n - 1] {
                let d = p.pos() - m;
                if d.hypot() < PLUCK_RADIUS {
                    let dir = if d.y > 0.0 { 1.0 } else { -1.0 };
                    p.vel += dir * push * 0.2;
                    p.dy += dir * 2.0;
                }
            }
        }
    }
}

impl Effect for Syntax {
    fn id(&self) -> EffectId {
        EffectId::Syntax
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Syntax);
        let c = vp.center();
        let rect_w = (vp.w() * 0.85).min(600.0);
        let start_y = c.y - (WIRE_COUNT as f64 * WIRE_SPACING) / 2.0 + 50.0;
        let start_x = c.x - rect_w / 2.0 - 50.0;
        let wire_w = rect_w + 100.0;

        self.wires = (0..WIRE_COUNT)
            .map(|i| {
                let bias = rng.signed(60.0);
                let freq = rng.range(2.0, 4.0);
                let points = (0..=POINTS_PER_WIRE)
                    .map(|j| {
                        let t = j as f64 / POINTS_PER_WIRE as f64;
                        let sag = (t * PI).sin() * bias;
                        let noise = (t * PI * freq).sin() * 5.0;
                        WirePoint {
                            x: start_x + t * wire_w,
                            rest_y: start_y + i as f64 * WIRE_SPACING + sag + noise,
                            dy: 0.0,
                            vel: 0.0,
                        }
                    })
                    .collect();
                Wire {
                    points,
                    tension: rng.range(0.05, 0.1),
                }
            })
            .collect();

        let mut notes = Vec::new();
        let (mut wire, mut t) = (0usize, 0.05);
        for word in SYNTAX_TEXT.split(' ') {
            if t + word.chars().count() as f64 * 0.02 > 0.95 {
                wire = (wire + 1) % WIRE_COUNT;
                t = 0.05;
            }
            for ch in word.chars() {
                let ch = if rng.chance(0.15) {
                    SYMBOLS[rng.index(SYMBOLS.len())]
                } else {
                    ch
                };
                notes.push(Note {
                    ch,
                    wire,
                    t,
                    pos: Point::ZERO,
                    vel: Vec2::ZERO,
                    angle: 0.0,
                    floating: false,
                });
                t += 0.015;
            }
            t += 0.02;
        }
        self.notes = notes;
        self.rng = rng;
        self.vp = vp;
        // Seat every letter on its wire before the first frame.
        for note in &mut self.notes {
            let (pos, angle, _) = self.wires[note.wire].sample(note.t);
            note.pos = pos;
            note.angle = angle;
        }
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        for wire in &mut self.wires {
            let n = wire.points.len();
            for i in 1..n - 1 {
                let lap = wire.points[i - 1].dy + wire.points[i + 1].dy - 2.0 * wire.points[i].dy;
                let p = &mut wire.points[i];
                p.vel = (p.vel + wire.tension * lap) * DAMPING;
                p.dy += p.vel;
            }
        }
        if pointer.inside {
            self.pluck(pointer);
        }
        for wire in &mut self.wires {
            let n = wire.points.len();
            wire.points[0].dy = 0.0;
            wire.points[n - 1].dy = 0.0;
        }

        let rng = &mut self.rng;
        for note in &mut self.notes {
            let (home, slope, wire_vel) = self.wires[note.wire].sample(note.t);
            if !note.floating {
                note.pos = home;
                note.angle = slope;
                if wire_vel.abs() > RELEASE_SPEED {
                    note.floating = true;
                    note.vel = Vec2::new(rng.signed(5.0), wire_vel * 1.5);
                    note.angle += rng.signed(1.0);
                }
                continue;
            }
            note.pos += note.vel;
            note.vel.y += 0.15;
            note.vel.x *= 0.99;
            note.angle += note.vel.x * 0.05;
            let to_home = home - note.pos;
            note.vel += to_home * 0.005;
            if to_home.hypot2() < 100.0 && note.vel.y.abs() < 2.0 {
                note.floating = false;
            }
        }
    }

    fn draw(&self, painter: &mut Painter) {
        let c = self.vp.center();
        let (rw, rh) = ((self.vp.w() * 0.8).min(500.0), (self.vp.h() * 0.8).min(700.0));
        let (rx, ry) = (c.x - rw / 2.0, c.y - rh / 2.0);

        painter.fill_all(Color::hex(0xf5f5f5));
        painter.fill_rect(
            Rect::new(rx + 20.0, ry + 20.0, rx + rw + 20.0, ry + rh + 20.0),
            Color::BLACK.with_alpha(0.05),
        );
        painter.fill_rect(Rect::new(rx, ry, rx + rw, ry + rh), Color::hex(0x89cff0));

        let title = FontSpec::mono(36.0);
        let ink = Color::hex(0x222222);
        for (word, dy, bold) in [("SYNTAX", 100.0, true), ("OF", 60.0, false), ("FREEDOM", 20.0, true)] {
            let font = if bold { title.bold() } else { title };
            painter.text(TextOp::new(word, Point::new(rx + 30.0, ry + rh - dy), font).color(ink));
        }

        if self.wires.is_empty() {
            return;
        }
        let mut strings = BezPath::new();
        for wire in &self.wires {
            strings.extend(wire.path().elements().iter().copied());
        }
        painter.stroke_path(strings, Color::hex(0x333333), StrokeStyle::new(1.5));

        let font = FontSpec::mono(16.0);
        for note in &self.notes {
            painter.text(glyph_tf(note.ch, place(note.pos, note.angle), font, Color::hex(0x111111)));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/syntax.rs"]
mod tests;
