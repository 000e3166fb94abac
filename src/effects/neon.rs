use std::f64::consts::TAU;

use crate::effects::text::NEON_CHARS;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::{PointerEvent, PointerState};
use crate::scene::display::{Composite, FontSpec, PassSpec, StrokeStyle, TextOp};
use crate::scene::painter::Painter;

const COL_WIDTH: f64 = 24.0;
const WAVE_SPEED: f64 = 15.0;
const WAVE_MAX: f64 = 400.0;
const WAVE_FRONT: f64 = 50.0;
const REPEL_RADIUS: f64 = 100.0;
const BASE_BRIGHTNESS: f64 = 0.5;
/// Head halos are batched per hue band of this many degrees.
const HUE_BAND: f64 = 30.0;

#[derive(Clone, Debug)]
struct Drop {
    x: f64,
    y: f64,
    speed: f64,
    chars: Vec<char>,
    hue: f64,
    brightness: f64,
    size: f64,
}

#[derive(Clone, Debug)]
struct Spark {
    pos: Point,
    vel: Vec2,
    ch: char,
    color: Color,
    life: f64,
    max_life: f64,
    size: f64,
}

#[derive(Clone, Copy, Debug)]
struct Shockwave {
    center: Point,
    radius: f64,
    force: f64,
}

/// Cyberpunk code rain. A press detonates sparks and a shockwave that shoves the columns.
#[derive(Default)]
pub(crate) struct Neon {
    vp: Viewport,
    rng: EffectRng,
    glyphs: Vec<char>,
    drops: Vec<Drop>,
    sparks: Vec<Spark>,
    waves: Vec<Shockwave>,
}

impl Neon {
    fn random_char(&mut self) -> char {
        self.glyphs
            .get(self.rng.index(self.glyphs.len()))
            .copied()
            .unwrap_or('0')
    }

    fn detonate(&mut self, at: Point) {
        let count = self.rng.range(60.0, 100.0).floor() as usize;
        let hue = self.rng.range(0.0, 360.0);
        for i in 0..count {
            let a = TAU * i as f64 / count as f64;
            let speed = self.rng.range(3.0, 15.0);
            let life = self.rng.range(50.0, 100.0);
            let vel = Vec2::new(
                a.cos() * speed * self.rng.range(0.8, 1.2),
                a.sin() * speed * self.rng.range(0.8, 1.2),
            );
            let ch = self.random_char();
            let color = Color::hsla(hue + self.rng.range(0.0, 40.0), 1.0, 0.75, 1.0);
            let size = self.rng.range(16.0, 32.0);
            self.sparks.push(Spark {
                pos: at,
                vel,
                ch,
                color,
                life,
                max_life: life,
                size,
            });
        }
        self.waves.push(Shockwave {
            center: at,
            radius: 10.0,
            force: 20.0,
        });
    }

    pub(crate) fn sparks(&self) -> usize {
        self.sparks.len()
    }

    pub(crate) fn shockwaves(&self) -> usize {
        self.waves.len()
    }

    fn recycle(rng: &mut EffectRng, d: &mut Drop, width: f64) {
        d.y = -200.0 - rng.range(0.0, 500.0);
        d.speed = rng.range(4.0, 10.0);
        d.x = rng.index((width / COL_WIDTH).floor().max(1.0) as usize) as f64 * COL_WIDTH;
        let r = rng.unit();
        d.hue = if r < 0.33 {
            rng.range(300.0, 340.0)
        } else if r < 0.66 {
            rng.range(170.0, 210.0)
        } else {
            rng.range(120.0, 160.0)
        };
        d.brightness = BASE_BRIGHTNESS;
    }
}

impl Effect for Neon {
    fn id(&self) -> EffectId {
        EffectId::Neon
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        self.vp = ctx.viewport;
        self.rng = ctx.rng(EffectId::Neon);
        self.glyphs = NEON_CHARS.chars().collect();
        self.sparks.clear();
        self.waves.clear();

        let columns = (self.vp.w() / COL_WIDTH).floor() as usize;
        self.drops = Vec::with_capacity(columns);
        for i in 0..columns {
            let len = self.rng.range(12.0, 37.0).floor() as usize;
            let chars = (0..len).map(|_| self.random_char()).collect();
            let rng = &mut self.rng;
            let hue = if rng.chance(0.5) {
                300.0
            } else if rng.chance(0.5) {
                190.0
            } else {
                270.0
            };
            self.drops.push(Drop {
                x: i as f64 * COL_WIDTH,
                y: -rng.range(0.0, 1200.0),
                speed: rng.range(4.0, 10.0),
                chars,
                hue,
                brightness: rng.range(0.3, 0.7),
                size: rng.range(14.0, 24.0),
            });
        }
    }

    fn pointer(&mut self, event: &PointerEvent, _state: &PointerState) {
        if let PointerEvent::Down { x, y, .. } = *event {
            self.detonate(Point::new(x, y));
        }
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        for w in &mut self.waves {
            w.radius += WAVE_SPEED;
            w.force *= 0.9;
        }
        self.waves.retain(|w| w.radius <= WAVE_MAX);

        let (width, height) = (self.vp.w(), self.vp.h());
        let rng = &mut self.rng;
        for d in &mut self.drops {
            d.y += d.speed;
            for w in &self.waves {
                let off = Vec2::new(d.x - w.center.x, d.y - w.center.y);
                let dist = off.hypot();
                let from_front = (dist - w.radius).abs();
                if from_front < WAVE_FRONT && dist < w.radius + WAVE_FRONT {
                    let blast = w.force * (1.0 - from_front / WAVE_FRONT) * 1.5;
                    let a = off.y.atan2(off.x);
                    d.x += a.cos() * blast;
                    d.y += a.sin() * blast;
                    d.brightness = 2.0;
                }
            }
            if d.y - d.chars.len() as f64 * d.size > height {
                Self::recycle(rng, d, width);
            }
            if pointer.inside {
                let off = Vec2::new(d.x - pointer.pos.x, d.y - pointer.pos.y);
                let dist = off.hypot();
                if dist < REPEL_RADIUS && dist > 0.0 {
                    d.x += off.x / dist * 5.0;
                    d.brightness = 1.5;
                }
            }
            if d.brightness > BASE_BRIGHTNESS {
                d.brightness *= 0.95;
            }
            for c in &mut d.chars {
                if rng.chance(0.02) {
                    *c = self.glyphs.get(rng.index(self.glyphs.len())).copied().unwrap_or(*c);
                }
            }
        }

        for s in &mut self.sparks {
            s.life -= 1.0;
            s.pos += s.vel;
            s.vel.y += 0.1;
            s.vel *= 0.95;
        }
        self.sparks.retain(|s| s.life > 0.0);
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::rgba(5, 5, 8, 0.2));
        let height = self.vp.h();

        painter.pass(PassSpec::screen().composite(Composite::Lighter), |p| {
            for w in &self.waves {
                let k = 1.0 - w.radius / WAVE_MAX;
                p.stroke_circle(
                    w.center,
                    w.radius,
                    Color::WHITE.with_alpha(0.1 * k),
                    StrokeStyle::new((50.0 * k).max(0.0)),
                );
            }

            let mut heads: Vec<(i64, TextOp)> = Vec::new();
            for d in &self.drops {
                let font = FontSpec::mono(d.size).bold();
                let len = d.chars.len() as f64;
                for (i, &ch) in d.chars.iter().enumerate() {
                    let y = d.y - i as f64 * d.size;
                    if y > height + 50.0 || y < -50.0 {
                        continue;
                    }
                    let alpha = (1.0 - i as f64 / len) * d.brightness;
                    if alpha < 0.05 {
                        continue;
                    }
                    let op = TextOp::new(ch.to_string(), Point::new(d.x, y), font);
                    if i == 0 {
                        let band = (d.hue / HUE_BAND).round() as i64;
                        heads.push((band, op.color(Color::WHITE)));
                    } else {
                        p.text(op.color(Color::hsla(d.hue, 0.9, 0.6, alpha)));
                    }
                }
            }
            heads.sort_by_key(|(band, _)| *band);
            for band in heads.chunk_by(|a, b| a.0 == b.0) {
                let halo = Color::hsla(band[0].0 as f64 * HUE_BAND, 1.0, 0.6, 1.0);
                p.glow(10.0, halo, |p| {
                    band.iter().for_each(|(_, op)| p.text(op.clone()));
                });
            }

            for s in &self.sparks {
                let op = TextOp::new(s.ch.to_string(), s.pos, FontSpec::mono(s.size).bold())
                    .color(s.color.with_alpha(s.life / s.max_life));
                p.glow_text(op, 15.0, s.color);
            }
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/neon.rs"]
mod tests;
