use std::collections::VecDeque;

use kurbo::BezPath;

use crate::effects::text::KINTSUGI_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Point, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{FontSpec, PassSpec, StrokeStyle, Target, TextOp};
use crate::scene::painter::Painter;

const COLS: usize = 6;
const ROWS: usize = 5;
const HEAL_RADIUS: f64 = 150.0;
const HEAL_RATE: f64 = 0.02;
const TRAIL_LEN: usize = 50;
/// Only every fifth trail point is checked for healing.
const TRAIL_STRIDE: usize = 5;
/// Seams are glowed in this many strength bands.
const SEAM_BANDS: usize = 5;
const CARD: u8 = 0;
const GOLD: Color = Color::new(1.0, 0.843, 0.0, 1.0);
const GOLDENROD: Color = Color::new(0.855, 0.647, 0.125, 1.0);

#[derive(Clone, Debug)]
struct Shard {
    poly: [Point; 3],
    home: Point,
    pos: Point,
    angle: f64,
    vel: Vec2,
    spin: f64,
    healed: f64,
}

impl Shard {
    fn new(poly: [Point; 3], rng: &mut EffectRng) -> Self {
        let home = Point::new(
            (poly[0].x + poly[1].x + poly[2].x) / 3.0,
            (poly[0].y + poly[1].y + poly[2].y) / 3.0,
        );
        let angle = rng.signed(0.5);
        let dist = rng.range(50.0, 150.0);
        let dir = rng.angle();
        Self {
            poly,
            home,
            pos: home + Vec2::new(dir.cos(), dir.sin()) * dist,
            angle,
            vel: Vec2::new(rng.signed(0.5), rng.signed(0.5)),
            spin: rng.signed(0.002),
            healed: 0.0,
        }
    }

    /// Card space to screen: the piece is carried from its home to `pos` and turned.
    fn transform(&self) -> Affine {
        Affine::translate(self.pos.to_vec2())
            * Affine::rotate(self.angle)
            * Affine::translate(-self.home.to_vec2())
    }

    fn outline(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.poly[0]);
        path.line_to(self.poly[1]);
        path.line_to(self.poly[2]);
        path.close_path();
        path
    }
}

/// Perturbed grid corners, with the border kept straight so the pieces tile the card.
fn shatter(w: f64, h: f64, rng: &mut EffectRng) -> Vec<[Point; 3]> {
    let (cw, ch) = (w / COLS as f64, h / ROWS as f64);
    let grid: Vec<Vec<Point>> = (0..=ROWS)
        .map(|y| {
            (0..=COLS)
                .map(|x| {
                    let base = Point::new(x as f64 * cw, y as f64 * ch);
                    if x == 0 || x == COLS || y == 0 || y == ROWS {
                        base
                    } else {
                        base + Vec2::new(rng.signed(cw * 0.8), rng.signed(ch * 0.8))
                    }
                })
                .collect()
        })
        .collect();

    let mut tris = Vec::with_capacity(COLS * ROWS * 2);
    for y in 0..ROWS {
        for x in 0..COLS {
            let (a, b) = (grid[y][x], grid[y][x + 1]);
            let (c, d) = (grid[y + 1][x + 1], grid[y + 1][x]);
            if rng.chance(0.5) {
                tris.push([a, b, c]);
                tris.push([a, c, d]);
            } else {
                tris.push([a, b, d]);
                tris.push([b, c, d]);
            }
        }
    }
    tris
}

/// A broken text card whose shards are mended with gold wherever the brush passes.
#[derive(Default)]
pub(crate) struct Kintsugi {
    vp: Viewport,
    shards: Vec<Shard>,
    trail: VecDeque<Point>,
}

impl Kintsugi {
    fn draw_card(&self, p: &mut Painter) {
        p.fill_all(Color::hex(0x1a1a1a));
        let lines: Vec<&str> = KINTSUGI_TEXT.split('\n').collect();
        let line_height = 40.0;
        let top = (self.vp.h() - lines.len() as f64 * line_height) / 2.0;
        let cx = self.vp.center().x;
        for (i, line) in lines.iter().enumerate() {
            let (font, color) = if i == 1 {
                (FontSpec::serif(28.0).italic(), Color::WHITE)
            } else {
                (FontSpec::serif(20.0), Color::hex(0xcccccc))
            };
            let at = Point::new(cx, top + i as f64 * line_height);
            p.text(TextOp::new(line.trim(), at, font).centered().color(color));
        }
    }

    fn trail_path(&self) -> Option<BezPath> {
        let pts: Vec<Point> = self.trail.iter().copied().collect();
        let (&first, &last) = (pts.first()?, pts.last()?);
        if pts.len() < 2 {
            return None;
        }
        let mut path = BezPath::new();
        path.move_to(first);
        for w in pts[1..].windows(2) {
            path.quad_to(w[0], w[0].midpoint(w[1]));
        }
        path.line_to(last);
        Some(path)
    }

    pub(crate) fn mended(&self) -> usize {
        self.shards.iter().filter(|s| s.healed >= 1.0).count()
    }
}

impl Effect for Kintsugi {
    fn id(&self) -> EffectId {
        EffectId::Kintsugi
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        self.vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Kintsugi);
        self.shards = shatter(self.vp.w(), self.vp.h(), &mut rng)
            .into_iter()
            .map(|poly| Shard::new(poly, &mut rng))
            .collect();
        self.trail.clear();
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        let brush = pointer.inside.then_some(pointer.pos);
        if let Some(m) = brush {
            self.trail.push_back(m);
            if self.trail.len() > TRAIL_LEN {
                self.trail.pop_front();
            }
        }

        for s in &mut self.shards {
            let near_brush = brush.is_some_and(|m| (m - s.pos).hypot() < HEAL_RADIUS);
            let near_trail = self
                .trail
                .iter()
                .step_by(TRAIL_STRIDE)
                .any(|t| (*t - s.pos).hypot() < HEAL_RADIUS);
            if near_brush || near_trail {
                s.healed = (s.healed + HEAL_RATE).min(1.0);
            }

            if s.healed < 1.0 {
                s.pos += s.vel;
                s.angle += s.spin;
            }
            if s.healed > 0.0 {
                let pull = 0.1 * s.healed;
                s.pos += (s.home - s.pos) * pull;
                s.angle -= s.angle * pull;
                s.vel *= 0.9;
                s.spin *= 0.9;
            }
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.pass(PassSpec::offscreen(CARD).clearing().priming(), |p| {
            self.draw_card(p);
        });

        painter.fill_all(Color::hex(0x111111));
        for s in &self.shards {
            let tf = s.transform();
            painter.clip(s.outline(), tf, |p| {
                p.image(Target::Offscreen(CARD), tf, 1.0);
            });
        }

        let mut bands: Vec<Vec<&Shard>> = vec![Vec::new(); SEAM_BANDS];
        for s in self.shards.iter().filter(|s| s.healed > 0.01) {
            let band = ((s.healed * SEAM_BANDS as f64).ceil() as usize).clamp(1, SEAM_BANDS) - 1;
            bands[band].push(s);
        }
        for (i, band) in bands.iter().enumerate().filter(|(_, b)| !b.is_empty()) {
            let strength = (i + 1) as f64 / SEAM_BANDS as f64;
            painter.glow(10.0 * strength, GOLD, |p| {
                for s in band {
                    p.stroke_path_tf(
                        s.outline(),
                        GOLD.with_alpha(s.healed),
                        StrokeStyle::new(2.0 * s.healed),
                        s.transform(),
                    );
                }
            });
        }

        if let Some(path) = self.trail_path() {
            painter.glow(15.0, GOLDENROD, |p| {
                p.stroke_path(path, GOLD, StrokeStyle::round(3.0));
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/kintsugi.rs"]
mod tests;
