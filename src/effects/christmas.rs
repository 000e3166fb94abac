use kurbo::BezPath;

use crate::effects::text::CHRISTMAS_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{FontSpec, StrokeStyle, TextOp};
use crate::scene::painter::Painter;

const LAYERS: usize = 14;
const TOP_MARGIN: f64 = 80.0;
const SPREAD: f64 = 35.0;
const LAYER_HEIGHT: f64 = 45.0;
const GRAVITY: f64 = 0.5;
const FRICTION: f64 = 0.96;
const ITERATIONS: usize = 4;
const WIND_RADIUS: f64 = 150.0;
const SNOWFLAKES: usize = 100;
const BERRY: Color = Color::new(0.851, 0.133, 0.133, 1.0);

#[derive(Clone, Debug)]
struct Node {
    pos: Point,
    prev: Point,
    fixed: bool,
    layer: usize,
    word: &'static str,
}

#[derive(Clone, Copy, Debug)]
struct Spring {
    a: usize,
    b: usize,
    rest: f64,
    stiffness: f64,
}

#[derive(Clone, Debug)]
struct Flake {
    pos: Point,
    vel: Vec2,
    size: f64,
    /// Extra sideways drift from the pointer, fading out.
    gust: f64,
}

/// Push on `p` away from the pointer, fading linearly to zero at the wind radius.
fn wind(p: Point, pointer: Option<Point>) -> Option<Vec2> {
    let m = pointer?;
    let d = p - m;
    let dist = d.hypot();
    (dist < WIND_RADIUS && dist > 0.0).then(|| d / dist * ((1.0 - dist / WIND_RADIUS) * 2.0))
}

/// A triangular lattice of festive words hanging from a star, swaying in the pointer's wind.
#[derive(Default)]
pub(crate) struct Christmas {
    vp: Viewport,
    rng: EffectRng,
    nodes: Vec<Node>,
    springs: Vec<Spring>,
    snow: Vec<Flake>,
}

impl Christmas {
    fn connect(&mut self, a: usize, b: usize) {
        let rest = (self.nodes[a].pos - self.nodes[b].pos).hypot();
        let stiffness = 0.15 + self.rng.unit() * 0.1;
        self.springs.push(Spring {
            a,
            b,
            rest,
            stiffness,
        });
    }

    fn build(&mut self) {
        let cx = self.vp.center().x;
        self.nodes.clear();
        self.springs.clear();
        for layer in 0..LAYERS {
            let count = layer + 1;
            let start_x = cx - count as f64 * SPREAD / 2.0 + SPREAD / 2.0;
            let row_start = self.nodes.len();
            let prev_start = row_start.saturating_sub(layer);
            for i in 0..count {
                let pos = Point::new(start_x + i as f64 * SPREAD, TOP_MARGIN + layer as f64 * LAYER_HEIGHT);
                let kick = self.rng.signed(5.0);
                let word = self.rng.pick(CHRISTMAS_TEXT).copied().unwrap_or("JOY");
                let idx = self.nodes.len();
                self.nodes.push(Node {
                    pos,
                    prev: pos + Vec2::new(kick, 0.0),
                    fixed: layer == 0,
                    layer,
                    word,
                });

                if layer > 0 {
                    let ratio = i as f64 / (count - 1).max(1) as f64;
                    let parent = prev_start + (ratio * (layer - 1) as f64).round() as usize;
                    self.connect(idx, parent);
                    // Cross-bracing to the parent's neighbours.
                    if parent > prev_start {
                        self.connect(idx, parent - 1);
                    }
                    if parent + 1 < row_start {
                        self.connect(idx, parent + 1);
                    }
                }
                if i > 0 {
                    self.connect(idx, idx - 1);
                }
            }
        }
    }

    fn relax(&mut self) {
        for _ in 0..ITERATIONS {
            for s in &self.springs {
                let d = self.nodes[s.a].pos - self.nodes[s.b].pos;
                let dist = d.hypot();
                let dist = if dist > 0.0 { dist } else { 0.1 };
                let offset = d * ((s.rest - dist) / dist * s.stiffness * 0.5);
                if !self.nodes[s.a].fixed {
                    self.nodes[s.a].pos += offset;
                }
                if !self.nodes[s.b].fixed {
                    self.nodes[s.b].pos -= offset;
                }
            }
        }
    }

    pub(crate) fn star(&self) -> Option<Point> {
        self.nodes.first().map(|n| n.pos)
    }
}

impl Effect for Christmas {
    fn id(&self) -> EffectId {
        EffectId::Christmas
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        self.vp = ctx.viewport;
        self.rng = ctx.rng(EffectId::Christmas);
        self.build();
        let (w, h) = (self.vp.w(), self.vp.h());
        let rng = &mut self.rng;
        self.snow = (0..SNOWFLAKES)
            .map(|_| Flake {
                pos: Point::new(rng.unit() * w, rng.unit() * h),
                vel: Vec2::new(rng.signed(1.0), rng.range(1.0, 3.0)),
                size: rng.unit() * 3.0,
                gust: 0.0,
            })
            .collect();
        tracing::debug!(nodes = self.nodes.len(), springs = self.springs.len(), "tree built");
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        let mouse = pointer.inside.then_some(pointer.pos);
        for n in self.nodes.iter_mut().filter(|n| !n.fixed) {
            let vel = (n.pos - n.prev) * FRICTION;
            n.prev = n.pos;
            n.pos += vel + Vec2::new(0.0, GRAVITY);
            if let Some(push) = wind(n.pos, mouse) {
                n.pos += push * 5.0;
            }
        }
        self.relax();

        let (w, h) = (self.vp.w(), self.vp.h());
        for s in &mut self.snow {
            if let Some(push) = wind(s.pos, mouse) {
                s.gust += push.x * 2.0;
            }
            s.gust *= 0.95;
            s.pos.y += s.vel.y;
            s.pos.x += s.vel.x + (s.pos.y * 0.01).sin() + s.gust;
            if s.pos.y > h {
                s.pos.y = -10.0;
            }
            if s.pos.x > w {
                s.pos.x = 0.0;
            }
            if s.pos.x < 0.0 {
                s.pos.x = w;
            }
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::hex(0xf0f0f0));
        let flake = Color::rgba(200, 200, 210, 0.6);
        for s in self.snow.iter().filter(|s| s.size > 0.05) {
            painter.fill_circle(s.pos, s.size, flake);
        }

        let mut lattice = BezPath::new();
        for s in &self.springs {
            lattice.move_to(self.nodes[s.a].pos);
            lattice.line_to(self.nodes[s.b].pos);
        }
        painter.stroke_path(lattice, BERRY.with_alpha(0.4), StrokeStyle::new(1.0));

        for n in &self.nodes {
            let moved = n.pos - n.prev;
            let size = (10.0 + (moved.x.abs() + moved.y.abs()) * 2.0).min(16.0);
            let alpha = 1.0 - n.layer as f64 / (LAYERS + 5) as f64;
            painter.text(
                TextOp::new(n.word, n.pos, FontSpec::serif(size))
                    .centered()
                    .color(Color::BLACK.with_alpha(alpha)),
            );
        }

        if let Some(top) = self.star() {
            painter.glow_text(
                TextOp::new("\u{2605}", top - Vec2::new(0.0, 15.0), FontSpec::serif(30.0))
                    .centered()
                    .color(BERRY),
                10.0,
                BERRY,
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/christmas.rs"]
mod tests;
