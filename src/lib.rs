//! Kinetype is a headless gallery of pointer-driven kinetic typography effects.
//!
//! Each page is a small particle or physics simulation over text. A [`Session`] drives one
//! [`Gallery`] with a scripted pointer at a fixed 60 Hz, rasterizes every frame on the CPU
//! and streams it into a [`FrameSink`]:
//!
//! - Build a [`SessionConfig`] (or load one from JSON)
//! - Create a [`Session`] and [`Session::run`] it into a PNG sequence, memory, or `ffmpeg`
//! - Or render one frame with [`render_frame`], or every page side by side with [`render_sheet`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod effects;
pub(crate) mod input;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod text;

/// Session configuration document.
pub mod config;
/// Frame sinks.
pub mod encode;
/// Page shell around the live effect.
pub mod gallery;
/// Headless session driver.
pub mod session;

pub use crate::foundation::color::{Color, ColorDef};
pub use crate::foundation::core::{
    Affine, BezPath, Fps, FrameIndex, Point, Rect, Rgba8Premul, Vec2, Viewport,
};
pub use crate::foundation::error::{KinetypeError, KinetypeResult};

pub use crate::config::SessionConfig;
pub use crate::effects::{
    Effect, EffectId, EffectInfo, EffectKind, LayoutCtx, SIM_HZ, Theme, Tick, catalog,
    create_effect,
};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig, write_png};
pub use crate::gallery::{Gallery, MenuLayout};
pub use crate::input::pointer::{PointerButton, PointerEvent, PointerState};
pub use crate::input::script::{
    PathShape, PointerPath, PointerScript, PressSpan, ScriptUnits, ScriptedEvent,
};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::CpuRenderer;
pub use crate::scene::display::{
    Baseline, Composite, DrawOp, FontFamily, FontSpec, Paint, Pass, PassSpec, Scene,
    StrokeStyle, Target, TextAlign, TextOp,
};
pub use crate::scene::painter::Painter;
pub use crate::session::{RunStats, Session, render_frame, render_sheet};
pub use crate::text::fonts::{FONT_DIR_ENV, FontBook, FontSources};
pub use crate::text::typeset::{BlockTypesetter, Typesetter};
