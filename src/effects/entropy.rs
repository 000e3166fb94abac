use std::f64::consts::TAU;

use crate::effects::text::TEXT_CONTENT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::{PointerEvent, PointerState};
use crate::scene::display::{Baseline, FontSpec, TextOp};
use crate::scene::painter::Painter;
use crate::text::layout::{FlowOptions, flow_layout};

const FONT_SIZE: f64 = 12.0;
const NOISE_SCALE: f64 = 0.003;
const INTERACTION_RADIUS: f64 = 120.0;
const MESSAGE: &str = "IRREVERSIBLE";
const MESSAGE_STEP: u32 = 4;
/// Seconds without pointer movement before the message assembles.
const SETTLE_AFTER: f64 = 1.2;
const REVEAL_HOLD: f64 = 3.5;

/// The life cycle of the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Phase {
    #[default]
    Idle,
    Chaos,
    Assembling,
    Revealed,
    Returning,
}

impl Phase {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Phase::Idle => "Order",
            Phase::Chaos => "Disorder",
            Phase::Assembling => "Convergence",
            Phase::Revealed => "Truth",
            Phase::Returning => "Acceptance",
        }
    }
}

#[derive(Clone, Debug)]
struct Mote {
    ch: char,
    pos: Point,
    origin: Point,
    message: Point,
    vel: Vec2,
    energy: f64,
    friction: f64,
}

fn flow(p: Point, time: f64) -> Vec2 {
    let a = ((p.x * NOISE_SCALE).sin() + (p.y * NOISE_SCALE).cos() + time * 0.5) * TAU;
    Vec2::new(a.cos(), a.sin())
}

/// A page that scatters under the pointer, spells a word once left alone, then heals.
#[derive(Default)]
pub(crate) struct Entropy {
    rng: EffectRng,
    motes: Vec<Mote>,
    phase: Phase,
    pointer: Point,
    now: f64,
    last_touch: f64,
    phase_since: f64,
    flow_time: f64,
}

impl Entropy {
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "entropy phase");
        self.phase = phase;
        self.phase_since = self.now;
    }

    fn share_within(&self, target: impl Fn(&Mote) -> Point, radius_sq: f64) -> f64 {
        if self.motes.is_empty() {
            return 1.0;
        }
        let close = self
            .motes
            .iter()
            .filter(|m| (target(m) - m.pos).hypot2() < radius_sq)
            .count();
        close as f64 / self.motes.len() as f64
    }

    fn advance_phase(&mut self) {
        match self.phase {
            Phase::Chaos if self.now - self.last_touch > SETTLE_AFTER => {
                self.enter(Phase::Assembling);
            }
            Phase::Assembling if self.share_within(|m| m.message, 100.0) > 0.8 => {
                self.enter(Phase::Revealed);
            }
            Phase::Revealed if self.now - self.phase_since > REVEAL_HOLD => {
                self.enter(Phase::Returning);
            }
            Phase::Returning if self.share_within(|m| m.origin, 25.0) > 0.95 => {
                self.enter(Phase::Idle);
            }
            _ => {}
        }
    }
}

impl Effect for Entropy {
    fn id(&self) -> EffectId {
        EffectId::Entropy
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp: Viewport = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Entropy);
        let font = FontSpec::serif(FONT_SIZE);
        let lh = FONT_SIZE * 1.6;
        let opts = FlowOptions::margins(vp.w(), vp.h(), 40.0, 0.15, 0.15, lh).paragraph_gap(lh * 0.5);
        let glyphs = flow_layout(TEXT_CONTENT.trim(), font, opts, ctx.typesetter);

        let word = TextOp::new(MESSAGE, vp.center(), FontSpec::sans(120.0).bold()).centered();
        let mut targets = ctx
            .typesetter
            .coverage(vp.width, vp.height, &[word])
            .sample(MESSAGE_STEP, 128);
        rng.shuffle(&mut targets);

        self.motes = glyphs
            .into_iter()
            .enumerate()
            .map(|(i, g)| {
                let message = if targets.is_empty() {
                    vp.center() + Vec2::new(rng.signed(200.0), rng.signed(100.0))
                } else {
                    targets[i % targets.len()]
                };
                Mote {
                    ch: g.ch,
                    pos: g.pos,
                    origin: g.pos,
                    message,
                    vel: Vec2::ZERO,
                    energy: 0.0,
                    friction: rng.range(0.90, 0.96),
                }
            })
            .collect();
        self.rng = rng;
        self.phase = Phase::Idle;
        self.pointer = Point::new(-1000.0, -1000.0);
        self.now = 0.0;
        self.last_touch = 0.0;
        self.phase_since = 0.0;
        self.flow_time = 0.0;
    }

    fn pointer(&mut self, event: &PointerEvent, _state: &PointerState) {
        let (PointerEvent::Move { x, y } | PointerEvent::Down { x, y, .. }) = *event else {
            return;
        };
        self.pointer = Point::new(x, y);
        self.last_touch = self.now;
        if matches!(self.phase, Phase::Idle | Phase::Returning) {
            self.enter(Phase::Chaos);
        }
    }

    fn step(&mut self, tick: &Tick, _pointer: &PointerState) {
        self.now = tick.time;
        self.flow_time += 0.005;
        self.advance_phase();

        let phase = self.phase;
        let (m, time) = (self.pointer, self.flow_time);
        let rng = &mut self.rng;
        for p in &mut self.motes {
            match phase {
                Phase::Chaos => {
                    let d = m - p.pos;
                    let dist = d.hypot();
                    if dist < INTERACTION_RADIUS && dist > 0.0 {
                        let force = 1.0 - dist / INTERACTION_RADIUS;
                        p.vel -= d / dist * (force * 3.0);
                        p.energy = (p.energy + 0.2).min(1.0);
                    }
                    let strength = 0.5 + p.energy * 2.0;
                    p.vel += flow(p.pos, time) * (strength * 0.1);
                    p.energy *= 0.99;
                }
                Phase::Assembling => {
                    p.vel += (p.message - p.pos) * 0.035;
                    p.vel += Vec2::new(rng.signed(0.5), rng.signed(0.5));
                }
                Phase::Revealed => {
                    p.vel += (p.message - p.pos) * 0.15;
                    p.vel += Vec2::new(rng.signed(0.1), rng.signed(0.1));
                }
                Phase::Returning => {
                    p.vel += (p.origin - p.pos) * 0.012;
                    p.vel *= 0.85;
                }
                Phase::Idle => {
                    p.vel += (p.origin - p.pos) * 0.1;
                    p.vel *= 0.8;
                }
            }
            p.vel *= match phase {
                Phase::Assembling | Phase::Revealed => 0.82,
                _ => p.friction,
            };
            p.pos += p.vel;
        }
    }

    fn draw(&self, painter: &mut Painter) {
        let fade = if self.phase == Phase::Chaos { 0.3 } else { 0.6 };
        painter.fill_all(Color::rgba(245, 245, 245, fade));
        let font = FontSpec::serif(FONT_SIZE);
        for p in &self.motes {
            let speed = p.vel.x.abs() + p.vel.y.abs();
            let color = if self.phase != Phase::Revealed && speed > 2.0 {
                Color::BLACK.with_alpha((1.0 - speed * 0.1).max(0.4))
            } else {
                Color::BLACK
            };
            painter.text(
                TextOp::new(p.ch.to_string(), p.pos, font)
                    .baseline(Baseline::Top)
                    .color(color),
            );
        }
    }

    fn status(&self) -> Option<String> {
        Some(self.phase.label().to_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/entropy.rs"]
mod tests;
