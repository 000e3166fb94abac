//! Pointer-driven typography effects.
//!
//! Every effect owns its particles and its random stream. The gallery drives exactly one
//! effect at a time: `reset` on init/resize/restart, `pointer` for each input event, `step`
//! once per fixed 60 Hz tick, and `draw` whenever a frame is rendered.

pub(crate) mod projection;
pub(crate) mod text;

mod bloom;
mod chasm;
mod christmas;
mod eclipse;
mod ember;
mod entropy;
mod erosion;
mod fluid;
mod galaxy;
mod gravity;
mod harmonic;
mod kinetic;
mod kintsugi;
mod lens;
mod neon;
mod noir;
mod orb;
mod pendulum;
mod ripple;
mod signal;
mod spore;
mod syntax;
mod temporal;
mod thread;
mod vapor;
mod velocity;
mod whalefall;

use std::fmt;
use std::str::FromStr;

use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Point, Viewport};
use crate::foundation::error::KinetypeError;
use crate::foundation::rng::EffectRng;
use crate::input::pointer::{PointerEvent, PointerState};
use crate::scene::display::{FontSpec, TextOp};
use crate::scene::painter::Painter;
use crate::text::typeset::Typesetter;

/// Simulation rate of every effect.
pub const SIM_HZ: f64 = 60.0;

/// One fixed simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub index: u64,
    /// Simulated seconds since the effect was reset.
    pub time: f64,
    pub dt: f64,
}

impl Tick {
    pub fn nth(index: u64) -> Self {
        Self {
            index,
            time: index as f64 / SIM_HZ,
            dt: 1.0 / SIM_HZ,
        }
    }
}

/// What an effect may look at while (re)building itself.
pub struct LayoutCtx<'a> {
    pub viewport: Viewport,
    pub typesetter: &'a mut dyn Typesetter,
    seed: u64,
    generation: u64,
}

impl<'a> LayoutCtx<'a> {
    pub fn new(
        viewport: Viewport,
        typesetter: &'a mut dyn Typesetter,
        seed: u64,
        generation: u64,
    ) -> Self {
        Self {
            viewport,
            typesetter,
            seed,
            generation,
        }
    }

    /// Random stream for `id` in this generation.
    pub fn rng(&self, id: EffectId) -> EffectRng {
        EffectRng::derive(self.seed, id.as_str(), self.generation)
    }

    pub fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        self.typesetter.measure(text, font)
    }
}

pub trait Effect {
    fn id(&self) -> EffectId;

    /// Rebuild all state for `ctx.viewport`. Called on init, resize and restart.
    fn reset(&mut self, ctx: &mut LayoutCtx<'_>);

    /// Edge-triggered input. Continuous input is read from `state` in [`Effect::step`].
    fn pointer(&mut self, _event: &PointerEvent, _state: &PointerState) {}

    fn step(&mut self, tick: &Tick, pointer: &PointerState);

    fn draw(&self, painter: &mut Painter);

    /// Short HUD label, if the effect has one.
    fn status(&self) -> Option<String> {
        None
    }
}

macro_rules! effect_ids {
    ($($variant:ident => $id:literal),+ $(,)?) => {
        /// Stable page identifiers.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum EffectId {
            $($variant),+
        }

        impl EffectId {
            pub const ALL: &'static [EffectId] = &[$(EffectId::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(EffectId::$variant => $id),+
                }
            }
        }
    };
}

effect_ids! {
    Ember => "ember",
    Fluid => "fluid",
    Erosion => "erosion",
    Whalefall => "whalefall",
    Temporal => "temporal",
    Orb => "orb",
    Lens => "lens",
    Kinetic => "kinetic",
    Signal => "signal",
    Vapor => "vapor",
    Bloom => "bloom",
    Noir => "noir",
    Pendulum => "pendulum",
    Syntax => "syntax",
    Entropy => "entropy",
    Ripple => "ripple",
    Spore => "spore",
    Chasm => "chasm",
    Neon => "neon",
    Eclipse => "eclipse",
    Velocity => "velocity",
    Gravity => "gravity",
    Christmas => "christmas",
    Thread => "thread",
    Kintsugi => "kintsugi",
    Galaxy => "galaxy",
    Harmonic => "harmonic",
}

impl Default for EffectId {
    fn default() -> Self {
        EffectId::Pendulum
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectId {
    type Err = KinetypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        EffectId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == needle)
            .ok_or_else(|| KinetypeError::validation(format!("unknown page '{s}'")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

/// Whether an effect draws through the 3D camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Flat,
    Volumetric,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct EffectInfo {
    pub id: EffectId,
    pub label: &'static str,
    pub desc: &'static str,
    pub theme: Theme,
    pub kind: EffectKind,
    #[serde(serialize_with = "serialize_hex")]
    pub background: Color,
}

fn serialize_hex<S: serde::Serializer>(c: &Color, s: S) -> Result<S::Ok, S::Error> {
    let [r, g, b, _] = c.to_rgba8();
    s.serialize_str(&format!("#{r:02x}{g:02x}{b:02x}"))
}

const fn info(
    id: EffectId,
    label: &'static str,
    desc: &'static str,
    theme: Theme,
    kind: EffectKind,
    bg: u32,
) -> EffectInfo {
    EffectInfo {
        id,
        label,
        desc,
        theme,
        kind,
        background: Color::new(
            ((bg >> 16) & 0xff) as f32 / 255.0,
            ((bg >> 8) & 0xff) as f32 / 255.0,
            (bg & 0xff) as f32 / 255.0,
            1.0,
        ),
    }
}

use EffectKind::{Flat, Volumetric};
use Theme::{Dark, Light};

/// Page catalog in menu order, indexed by [`EffectId`].
static CATALOG: [EffectInfo; 27] = [
    info(EffectId::Ember, "EMBER", "Irreversible loss", Dark, Flat, 0x050100),
    info(EffectId::Fluid, "FLUID", "Magnetic grid flow", Dark, Flat, 0x080808),
    info(EffectId::Erosion, "EROSION", "Structural collapse", Light, Flat, 0xe6e4e0),
    info(EffectId::Whalefall, "TEXTILE", "Woven fabric simulation", Dark, Flat, 0x0a0a0a),
    info(EffectId::Temporal, "TEMPORAL", "Sands of time", Dark, Volumetric, 0x000000),
    info(EffectId::Orb, "ORB", "Periodic elements", Dark, Flat, 0x080808),
    info(EffectId::Lens, "LENS", "Liquid glass", Light, Flat, 0xf8f8f8),
    info(EffectId::Kinetic, "KINETIC", "Typography wave", Dark, Flat, 0x080808),
    info(EffectId::Signal, "SIGNAL", "Digital interference", Dark, Flat, 0x05050a),
    info(EffectId::Vapor, "VAPOR", "Window condensation", Dark, Flat, 0x020617),
    info(EffectId::Bloom, "BLOOM", "Floral growth", Light, Flat, 0xf8f8f8),
    info(EffectId::Noir, "NOIR", "Smoky cinema", Dark, Flat, 0x080808),
    info(EffectId::Pendulum, "IMPRESSION", "Time erases memory", Light, Flat, 0xf5f5f5),
    info(EffectId::Syntax, "SYNTAX", "Freedom of lines", Light, Flat, 0xf5f5f5),
    info(EffectId::Entropy, "ENTROPY", "Order to chaos", Light, Flat, 0xf5f5f5),
    info(EffectId::Ripple, "RIPPLE", "Reflection in water", Light, Flat, 0xf5f5f5),
    info(EffectId::Spore, "SPORE", "Organic growth", Light, Flat, 0xf5f5f5),
    info(EffectId::Chasm, "CHASM", "Infinite abyss", Dark, Flat, 0x050505),
    info(EffectId::Neon, "NEON", "Cyberpunk rain", Dark, Flat, 0x05050a),
    info(EffectId::Eclipse, "ECLIPSE", "Shadow & Light", Dark, Flat, 0x080808),
    info(EffectId::Velocity, "VELOCITY", "Warp speed", Dark, Flat, 0x05050a),
    info(EffectId::Gravity, "GRAVITY", "Weight of words", Light, Flat, 0xe6e4e0),
    info(EffectId::Christmas, "CHRISTMAS", "Festive lattice", Light, Flat, 0xf5f5f5),
    info(EffectId::Thread, "THREAD", "Woven words", Light, Flat, 0xf5f5f5),
    info(EffectId::Kintsugi, "KINTSUGI", "Golden repair", Dark, Flat, 0x080808),
    info(EffectId::Galaxy, "GALAXY", "Constellation of thought", Dark, Flat, 0x05050a),
    info(EffectId::Harmonic, "HARMONIC", "Resonance", Dark, Volumetric, 0x020205),
];

pub fn catalog() -> &'static [EffectInfo] {
    &CATALOG
}

impl EffectId {
    /// Ids are declared in menu order, so the id is its catalog row.
    pub fn info(self) -> &'static EffectInfo {
        &CATALOG[self as usize]
    }
}

pub fn create_effect(id: EffectId) -> Box<dyn Effect> {
    match id {
        EffectId::Vapor => Box::new(vapor::Vapor::default()),
        EffectId::Ember => Box::new(ember::Ember::default()),
        EffectId::Fluid => Box::new(fluid::Fluid::default()),
        EffectId::Erosion => Box::new(erosion::Erosion::default()),
        EffectId::Whalefall => Box::new(whalefall::Textile::default()),
        EffectId::Pendulum => Box::new(pendulum::Pendulum::default()),
        EffectId::Syntax => Box::new(syntax::Syntax::default()),
        EffectId::Entropy => Box::new(entropy::Entropy::default()),
        EffectId::Ripple => Box::new(ripple::Ripple::default()),
        EffectId::Spore => Box::new(spore::Spore::default()),
        EffectId::Chasm => Box::new(chasm::Chasm::default()),
        EffectId::Neon => Box::new(neon::Neon::default()),
        EffectId::Eclipse => Box::new(eclipse::Eclipse::default()),
        EffectId::Velocity => Box::new(velocity::Velocity::default()),
        EffectId::Bloom => Box::new(bloom::Bloom::default()),
        EffectId::Noir => Box::new(noir::Noir::default()),
        EffectId::Orb => Box::new(orb::Orb::default()),
        EffectId::Signal => Box::new(signal::Signal::default()),
        EffectId::Lens => Box::new(lens::Lens::default()),
        EffectId::Kinetic => Box::new(kinetic::Kinetic::default()),
        EffectId::Temporal => Box::new(temporal::Temporal::default()),
        EffectId::Gravity => Box::new(gravity::Gravity::default()),
        EffectId::Christmas => Box::new(christmas::Christmas::default()),
        EffectId::Thread => Box::new(thread::Thread::default()),
        EffectId::Kintsugi => Box::new(kintsugi::Kintsugi::default()),
        EffectId::Galaxy => Box::new(galaxy::Galaxy::default()),
        EffectId::Harmonic => Box::new(harmonic::Harmonic::default()),
    }
}

/// A single glyph centred on `pos`.
pub(crate) fn glyph(ch: char, pos: Point, font: FontSpec, color: Color) -> TextOp {
    TextOp::new(ch.to_string(), pos, font).color(color).centered()
}

/// A glyph centred on the origin of `tf`, for rotated or scaled letters.
pub(crate) fn glyph_tf(ch: char, tf: Affine, font: FontSpec, color: Color) -> TextOp {
    TextOp::new(ch.to_string(), Point::ZERO, font)
        .color(color)
        .centered()
        .transform(tf)
}

/// Translation then rotation, the canvas `translate(); rotate()` pair.
pub(crate) fn place(pos: Point, angle: f64) -> Affine {
    Affine::translate(pos.to_vec2()) * Affine::rotate(angle)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mod.rs"]
mod tests;
