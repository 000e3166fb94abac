use std::collections::BTreeMap;
use std::f64::consts::TAU;

use crate::effects::text::BLOOM_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, glyph_tf, place};
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::math::smoothstep;
use crate::input::pointer::PointerState;
use crate::scene::display::FontSpec;
use crate::scene::painter::Painter;
use crate::text::layout::{FlowOptions, flow_layout};

const FONT_SIZE: f64 = 18.0;
const LINE_HEIGHT: f64 = 32.0;
const RADIUS: f64 = 180.0;
const EASE: f64 = 0.1;
/// Pink, red, orange, peach, lavender, sky.
const HUES: [f64; 6] = [340.0, 360.0, 20.0, 40.0, 260.0, 200.0];
const CHARCOAL: Color = Color::new(0.165, 0.165, 0.165, 1.0);
/// Halo blur is bucketed to this step so blooming glyphs share passes.
const BLUR_STEP: f64 = 3.0;

#[derive(Clone, Debug)]
struct Petal {
    ch: char,
    origin: Point,
    color: Color,
    phase: f64,
    bloom: f64,
    rotation: f64,
    scale: f64,
}

impl Petal {
    fn offset(&self) -> Vec2 {
        Vec2::new(self.phase.cos(), self.phase.sin()) * (self.bloom * 10.0)
    }
}

/// A paragraph that blossoms in pastel around the pointer.
#[derive(Default)]
pub(crate) struct Bloom {
    petals: Vec<Petal>,
}

impl Bloom {
    pub(crate) fn blooming(&self) -> usize {
        self.petals.iter().filter(|p| p.bloom > 0.05).count()
    }
}

impl Effect for Bloom {
    fn id(&self) -> EffectId {
        EffectId::Bloom
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Bloom);
        let opts = FlowOptions::margins(vp.w(), vp.h(), 50.0, 0.15, 0.2, LINE_HEIGHT).centered();
        let glyphs = flow_layout(BLOOM_TEXT, FontSpec::serif(FONT_SIZE), opts, ctx.typesetter);
        self.petals = glyphs
            .into_iter()
            .map(|g| {
                let hue = HUES[rng.index(HUES.len())];
                let sat = rng.range(0.7, 1.0);
                let light = rng.range(0.7, 0.9);
                Petal {
                    ch: g.ch,
                    origin: g.pos,
                    color: Color::hsla(hue, sat, light, 1.0),
                    phase: rng.unit() * TAU,
                    bloom: 0.0,
                    rotation: 0.0,
                    scale: 1.0,
                }
            })
            .collect();
    }

    fn step(&mut self, tick: &Tick, pointer: &PointerState) {
        for p in &mut self.petals {
            let target = if pointer.inside {
                let dist = (pointer.pos - p.origin).hypot();
                smoothstep(0.0, 1.0, 1.0 - dist / RADIUS)
            } else {
                0.0
            };
            p.bloom += (target - p.bloom) * EASE;
            let sway = p.bloom * ((tick.time * 3.0 + p.phase).sin() * 0.5 + 0.2);
            p.rotation += (sway - p.rotation) * EASE;
            p.scale += (1.0 + p.bloom * 1.5 - p.scale) * EASE;
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::hex(0xfdfbf7));
        let font = FontSpec::serif(FONT_SIZE);
        let mut open: BTreeMap<i64, Vec<&Petal>> = BTreeMap::new();
        for p in &self.petals {
            if p.bloom > 0.05 {
                let band = (p.bloom * 15.0 / BLUR_STEP).round() as i64;
                open.entry(band).or_default().push(p);
            } else {
                let tf = place(p.origin + p.offset(), p.rotation) * Affine::scale(p.scale);
                painter.text(glyph_tf(p.ch, tf, font, CHARCOAL));
            }
        }
        for (band, petals) in open {
            painter.halo(band as f64 * BLUR_STEP, |painter| {
                for p in petals {
                    let tf = place(p.origin + p.offset(), p.rotation) * Affine::scale(p.scale);
                    painter.text(glyph_tf(p.ch, tf, font, p.color));
                }
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/bloom.rs"]
mod tests;
