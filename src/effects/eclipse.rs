use kurbo::BezPath;

use crate::effects::text::ECLIPSE_WORDS;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{Composite, FontSpec, GradientStop, Paint, PassSpec, TextOp};
use crate::scene::painter::Painter;

const COLS: usize = 4;
const ROWS: usize = 3;
const LIGHT_RADIUS: f64 = 700.0;
const SHADOW_LEN: f64 = 3000.0;
const PUSH_RADIUS: f64 = 400.0;
const DUST: usize = 150;

#[derive(Clone, Debug)]
struct Block {
    word: &'static str,
    pos: Point,
    origin: Point,
    vel: Vec2,
    half: Vec2,
}

impl Block {
    fn corners(&self) -> [Point; 4] {
        let (hx, hy) = (self.half.x, self.half.y);
        [
            self.pos + Vec2::new(-hx, -hy),
            self.pos + Vec2::new(hx, -hy),
            self.pos + Vec2::new(hx, hy),
            self.pos + Vec2::new(-hx, hy),
        ]
    }

    /// Shadow volume cast by the word's box away from `light`.
    fn shadow(&self, light: Point) -> BezPath {
        let corners = self.corners();
        let cast = |c: Point| {
            let a = (c.y - light.y).atan2(c.x - light.x);
            c + Vec2::new(a.cos(), a.sin()) * SHADOW_LEN
        };
        let mut path = BezPath::new();
        for (i, &c) in corners.iter().enumerate() {
            let next = corners[(i + 1) % 4];
            path.move_to(c);
            path.line_to(cast(c));
            path.line_to(cast(next));
            path.line_to(next);
            path.close_path();
        }
        path
    }
}

#[derive(Clone, Debug)]
struct Mote {
    pos: Point,
    vel: Vec2,
    size: f64,
    alpha: f64,
}

/// A grid of heavy words casting long shadows from a light held by the pointer.
#[derive(Default)]
pub(crate) struct Eclipse {
    vp: Viewport,
    blocks: Vec<Block>,
    dust: Vec<Mote>,
    light: Point,
    font_size: f64,
}

impl Effect for Eclipse {
    fn id(&self) -> EffectId {
        EffectId::Eclipse
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let mut rng: EffectRng = ctx.rng(EffectId::Eclipse);
        let (cell_w, cell_h) = (vp.w() / COLS as f64, vp.h() / ROWS as f64);
        self.font_size = (vp.w() / 5.0).min(80.0);
        let font = FontSpec::sans(self.font_size).bold();

        self.blocks.clear();
        for i in 0..COLS {
            for j in 0..ROWS {
                let word = ECLIPSE_WORDS[(i + j * COLS) % ECLIPSE_WORDS.len()];
                let width = ctx.measure(word, font);
                let pos = Point::new(
                    (i as f64 + 0.5) * cell_w + rng.signed(80.0),
                    (j as f64 + 0.5) * cell_h + rng.signed(80.0),
                );
                self.blocks.push(Block {
                    word,
                    pos,
                    origin: pos,
                    vel: Vec2::ZERO,
                    half: Vec2::new(width / 2.0, self.font_size * 0.35),
                });
            }
        }
        self.dust = (0..DUST)
            .map(|_| Mote {
                pos: Point::new(rng.unit() * vp.w(), rng.unit() * vp.h()),
                vel: Vec2::new(rng.signed(0.5), rng.signed(0.5)),
                size: rng.unit() * 2.0,
                alpha: rng.unit() * 0.5,
            })
            .collect();
        self.light = vp.center();
        self.vp = vp;
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        if pointer.inside {
            self.light = pointer.pos;
        }
        let light = self.light;
        for b in &mut self.blocks {
            let d = b.pos - light;
            let dist = d.hypot();
            if dist > 0.0 {
                b.vel += d / dist * ((PUSH_RADIUS - dist) * 0.05).max(0.0);
            }
            b.vel += (b.origin - b.pos) * 0.05;
            b.vel *= 0.9;
            b.pos += b.vel;
        }

        let (w, h) = (self.vp.w(), self.vp.h());
        for m in &mut self.dust {
            m.pos += m.vel;
            if m.pos.x < 0.0 {
                m.pos.x = w;
            } else if m.pos.x > w {
                m.pos.x = 0.0;
            }
            if m.pos.y < 0.0 {
                m.pos.y = h;
            } else if m.pos.y > h {
                m.pos.y = 0.0;
            }
        }
    }

    fn draw(&self, painter: &mut Painter) {
        let light = self.light;
        painter.fill_all(Color::hex(0x050505));
        painter.pass(PassSpec::screen().composite(Composite::Screen), |p| {
            p.fill_all(Paint::Radial {
                center: light,
                r0: 0.0,
                r1: LIGHT_RADIUS,
                stops: vec![
                    GradientStop::new(0.0, Color::rgba(255, 255, 240, 0.85)),
                    GradientStop::new(0.2, Color::rgba(255, 255, 255, 0.3)),
                    GradientStop::new(1.0, Color::TRANSPARENT),
                ],
            });
        });

        for b in &self.blocks {
            let d = b.pos - light;
            let a = d.y.atan2(d.x);
            painter.fill_path(
                b.shadow(light),
                Paint::Linear {
                    start: b.pos,
                    end: b.pos + Vec2::new(a.cos(), a.sin()) * 800.0,
                    stops: vec![
                        GradientStop::new(0.0, Color::BLACK),
                        GradientStop::new(1.0, Color::BLACK.with_alpha(0.0)),
                    ],
                },
            );
        }

        let font = FontSpec::sans(self.font_size).bold();
        for b in &self.blocks {
            let brightness = (1.0 - (light - b.pos).hypot() / 800.0).max(0.1);
            let v = (20.0 + brightness * 30.0) as u8;
            painter.text(
                TextOp::new(b.word, b.pos, font)
                    .centered()
                    .color(Color::rgb(v, v, v)),
            );
        }

        for m in &self.dust {
            let dist = (m.pos - light).hypot();
            if dist < LIGHT_RADIUS {
                let alpha = (1.0 - dist / LIGHT_RADIUS) * m.alpha * 0.5;
                painter.fill_circle(m.pos, m.size, Color::rgba(200, 200, 200, alpha));
            }
        }

        let c = self.vp.center();
        painter.fill_all(Paint::Radial {
            center: c,
            r0: self.vp.h() * 0.4,
            r1: self.vp.h(),
            stops: vec![
                GradientStop::new(0.0, Color::TRANSPARENT),
                GradientStop::new(1.0, Color::BLACK.with_alpha(0.8)),
            ],
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/eclipse.rs"]
mod tests;
