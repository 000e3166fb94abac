use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

use crate::effects::text::SPORE_CHARS;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, glyph_tf, place};
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Point, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::{PointerEvent, PointerState};
use crate::scene::display::FontSpec;
use crate::scene::painter::Painter;

pub(crate) const MAX_SPORES: usize = 2000;
const ROOT_RADIUS: f64 = 20.0;
/// Floating spores only stick to roots once the colony is this large.
const COLONY: usize = 50;
const BLAST_RADIUS: f64 = 150.0;
const SPROUT_CHANCE: f64 = 0.002;
const SPROUT_DIST: f64 = 14.0;

#[derive(Clone, Debug)]
struct Seed {
    ch: char,
    pos: Point,
    vel: Vec2,
    angle: f64,
    scale: f64,
    rooted: bool,
}

/// Buckets rooted spores by `ROOT_RADIUS` cells for neighbour lookups.
#[derive(Default)]
struct RootGrid {
    cells: HashMap<(i64, i64), Vec<Point>>,
}

impl RootGrid {
    fn key(p: Point) -> (i64, i64) {
        (
            (p.x / ROOT_RADIUS).floor() as i64,
            (p.y / ROOT_RADIUS).floor() as i64,
        )
    }

    fn insert(&mut self, p: Point) {
        self.cells.entry(Self::key(p)).or_default().push(p);
    }

    fn near(&self, p: Point) -> bool {
        let (cx, cy) = Self::key(p);
        (cx - 1..=cx + 1)
            .flat_map(|x| (cy - 1..=cy + 1).map(move |y| (x, y)))
            .filter_map(|k| self.cells.get(&k))
            .flatten()
            .any(|r| (*r - p).hypot2() < ROOT_RADIUS * ROOT_RADIUS)
    }
}

/// Letters drift from the pointer, settle, and grow into colonies.
#[derive(Default)]
pub(crate) struct Spore {
    vp: Viewport,
    rng: EffectRng,
    spores: Vec<Seed>,
    chars: Vec<char>,
}

impl Spore {
    fn spawn(&mut self, pos: Point, rooted: bool) -> Seed {
        let rng = &mut self.rng;
        Seed {
            ch: self.chars.get(rng.index(self.chars.len())).copied().unwrap_or('*'),
            pos,
            vel: Vec2::new(rng.signed(1.5), rng.signed(1.5) + 0.5),
            angle: rng.signed(0.5),
            scale: if rooted { 0.0 } else { 1.0 },
            rooted,
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.spores.len()
    }

    pub(crate) fn rooted(&self) -> usize {
        self.spores.iter().filter(|s| s.rooted).count()
    }

    fn blast(&mut self, at: Point) {
        let rng = &mut self.rng;
        for s in self.spores.iter_mut().filter(|s| s.rooted) {
            let d = s.pos - at;
            let dist = d.hypot();
            if dist < BLAST_RADIUS && dist > 0.0 {
                s.rooted = false;
                s.vel = Vec2::new(d.x / dist * 5.0 + rng.signed(2.0), d.y / dist * 5.0 - 5.0);
            }
        }
    }
}

impl Effect for Spore {
    fn id(&self) -> EffectId {
        EffectId::Spore
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        self.vp = ctx.viewport;
        self.rng = ctx.rng(EffectId::Spore);
        self.spores.clear();
        self.chars = SPORE_CHARS.chars().collect();
    }

    fn pointer(&mut self, event: &PointerEvent, _state: &PointerState) {
        if let PointerEvent::Down { x, y, .. } = *event {
            self.blast(Point::new(x, y));
        }
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        if pointer.inside {
            for _ in 0..2 {
                let jitter = Vec2::new(self.rng.signed(20.0), self.rng.signed(20.0));
                let s = self.spawn(pointer.pos + jitter, false);
                self.spores.push(s);
            }
        }

        let floor = self.vp.h() - 20.0;
        let width = self.vp.w();
        let crowded = self.spores.len() > COLONY;
        let mut roots = RootGrid::default();
        for s in self.spores.iter().filter(|s| s.rooted) {
            roots.insert(s.pos);
        }

        let mut sprouts = Vec::new();
        let rng = &mut self.rng;
        for s in &mut self.spores {
            if s.rooted {
                if s.scale < 1.0 {
                    s.scale += 0.1;
                }
                if rng.chance(SPROUT_CHANCE) {
                    let a = -FRAC_PI_2 + rng.signed(2.0);
                    let at = s.pos + Vec2::new(a.cos(), a.sin()) * SPROUT_DIST;
                    if at.y < floor {
                        sprouts.push(at);
                    }
                }
                continue;
            }
            s.pos += s.vel;
            s.vel.y += 0.02;
            s.vel *= 0.98;
            s.vel.x += rng.signed(0.1);

            let mut root = false;
            if s.pos.y > floor {
                s.pos.y = floor;
                root = true;
            }
            if !root && crowded && roots.near(s.pos) {
                root = true;
            }
            if root {
                s.rooted = true;
                s.vel = Vec2::ZERO;
                s.scale = 0.1;
                roots.insert(s.pos);
            }
        }
        self.spores.retain(|s| s.rooted || (0.0..=width).contains(&s.pos.x));
        for at in sprouts {
            let s = self.spawn(at, true);
            self.spores.push(s);
        }
        if self.spores.len() > MAX_SPORES {
            let excess = self.spores.len() - MAX_SPORES;
            self.spores.drain(..excess);
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::hex(0xf5f5f5));
        let font = FontSpec::mono(14.0);
        for s in self.spores.iter().filter(|s| s.scale > 0.0) {
            let alpha = if s.rooted { 1.0 } else { 0.6 };
            let tf = place(s.pos, s.angle) * Affine::scale(s.scale);
            painter.text(glyph_tf(s.ch, tf, font, Color::rgba(30, 40, 30, alpha)));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/spore.rs"]
mod tests;
