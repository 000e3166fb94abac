//! Headless driver: scripted pointer in, rendered frames out.
//!
//! Simulation runs at a fixed 60 Hz regardless of the output frame rate. Each output frame
//! first fires its scripted events, then runs the steps it owes, then draws and renders.

use rayon::prelude::*;

use crate::config::SessionConfig;
use crate::effects::EffectId;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Viewport};
use crate::foundation::error::{KinetypeError, KinetypeResult};
use crate::gallery::Gallery;
use crate::input::script::PointerScript;
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuRenderer;
use crate::scene::painter::Painter;
use crate::text::fonts::FontBook;
use crate::text::typeset::Typesetter;

/// Counters returned by [`Session::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub steps: u64,
}

pub struct Session {
    config: SessionConfig,
    script: PointerScript,
    viewport: Viewport,
    gallery: Gallery,
    renderer: CpuRenderer,
    next_frame: u64,
    steps_done: u64,
}

impl Session {
    /// Validate `config` and build the gallery with `fonts` as the typesetter.
    pub fn new(config: SessionConfig, fonts: Box<dyn Typesetter>) -> KinetypeResult<Self> {
        config.validate()?;
        let renderer = CpuRenderer::with_typesetter(config.viewport(), fonts)?;
        Self::with_renderer(config, renderer)
    }

    /// Load fonts from `config.fonts`, falling back to block glyphs when none are found.
    pub fn from_config(config: SessionConfig) -> KinetypeResult<Self> {
        let fonts = FontBook::load(&config.fonts)?;
        Self::new(config, Box::new(fonts))
    }

    /// Reuse an existing renderer (and its typesetter). Its surfaces are cleared.
    pub fn with_renderer(config: SessionConfig, mut renderer: CpuRenderer) -> KinetypeResult<Self> {
        config.validate()?;
        let viewport = config.viewport();
        renderer.resize(viewport)?;
        renderer.reset_surfaces();
        let gallery = Gallery::new(&config, renderer.typesetter_mut());
        Ok(Self {
            script: config.pointer_script(),
            config,
            viewport,
            gallery,
            renderer,
            next_frame: 0,
            steps_done: 0,
        })
    }

    pub fn into_renderer(self) -> CpuRenderer {
        self.renderer
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Index of the frame the next call to [`Session::next_frame`] renders.
    pub fn frame_index(&self) -> FrameIndex {
        FrameIndex(self.next_frame)
    }

    pub fn steps_done(&self) -> u64 {
        self.steps_done
    }

    pub fn select(&mut self, id: EffectId) {
        self.gallery.select(id, self.renderer.typesetter_mut());
    }

    pub fn restart(&mut self) {
        self.gallery.restart(self.renderer.typesetter_mut());
    }

    pub fn toggle_menu(&mut self) {
        self.gallery.toggle_menu();
    }

    /// Advance the simulation through the next output frame and render it.
    pub fn next_frame(&mut self) -> KinetypeResult<FrameRGBA> {
        let frame = self.next_frame;
        for event in self.script.events_for(frame, self.viewport) {
            self.gallery.pointer(&event, self.renderer.typesetter_mut());
        }

        let owed = self.config.steps_through(frame);
        while self.steps_done < owed {
            self.gallery.step();
            self.steps_done += 1;
        }

        if self.gallery.take_stale_surfaces() {
            self.renderer.reset_surfaces();
        }
        let mut painter = Painter::new(self.viewport);
        self.gallery.draw(&mut painter);
        let out = self
            .renderer
            .render(&painter.finish(), self.gallery.background())?;
        self.next_frame += 1;
        Ok(out)
    }

    /// Render the remaining frames into `sink`.
    #[tracing::instrument(skip(self, sink), fields(page = %self.gallery.current(), frames = self.config.frames))]
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> KinetypeResult<RunStats> {
        sink.begin(SinkConfig {
            width: self.viewport.width,
            height: self.viewport.height,
            fps: self.config.fps,
            bg_rgba: self.gallery.background().to_rgba8(),
        })?;
        let start_steps = self.steps_done;
        let mut frames = 0;
        while self.next_frame < self.config.frames {
            let idx = self.frame_index();
            let frame = self.next_frame()?;
            sink.push_frame(idx, &frame)?;
            frames += 1;
        }
        sink.end()?;
        let stats = RunStats {
            frames,
            steps: self.steps_done - start_steps,
        };
        tracing::debug!(?stats, "session finished");
        Ok(stats)
    }
}

/// Render frame `index` by replaying the session from frame zero.
///
/// Persistent surfaces carry trails between frames, so every earlier frame is rendered too.
pub fn render_frame(config: &SessionConfig, index: u64) -> KinetypeResult<FrameRGBA> {
    if index >= config.frames {
        return Err(KinetypeError::validation(format!(
            "frame {index} is outside the session's {} frames",
            config.frames
        )));
    }
    let mut session = Session::from_config(config.clone())?;
    replay_to(&mut session, index)
}

fn replay_to(session: &mut Session, index: u64) -> KinetypeResult<FrameRGBA> {
    loop {
        let last = session.frame_index().0 == index;
        let frame = session.next_frame()?;
        if last {
            return Ok(frame);
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> KinetypeResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(KinetypeError::validation("threads must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| KinetypeError::render(format!("failed to build rayon thread pool: {e}")))
}

/// Render the last frame of `config` for every page in `pages` and tile them row-major.
///
/// Pages run in parallel, each worker owning one renderer; tile order follows `pages`.
#[tracing::instrument(skip(config, pages), fields(pages = pages.len()))]
pub fn render_sheet(
    config: &SessionConfig,
    pages: &[EffectId],
    columns: usize,
    threads: Option<usize>,
) -> KinetypeResult<FrameRGBA> {
    config.validate()?;
    if pages.is_empty() {
        return Err(KinetypeError::validation("contact sheet needs at least one page"));
    }
    if columns == 0 {
        return Err(KinetypeError::validation("contact sheet columns must be >= 1"));
    }
    // Surfaces bad explicit font paths before any worker starts.
    FontBook::load(&config.fonts)?;

    let vp = config.viewport();
    let cols = columns.min(pages.len());
    let rows = pages.len().div_ceil(cols);
    let sheet_w = u32::try_from(cols)
        .ok()
        .and_then(|c| c.checked_mul(vp.width))
        .ok_or_else(|| KinetypeError::validation("contact sheet too wide"))?;
    let sheet_h = u32::try_from(rows)
        .ok()
        .and_then(|r| r.checked_mul(vp.height))
        .ok_or_else(|| KinetypeError::validation("contact sheet too tall"))?;
    let last = config.frames - 1;

    let pool = build_thread_pool(threads)?;
    let tiles = pool.install(|| {
        pages
            .par_iter()
            .enumerate()
            .map_init(
                || None::<CpuRenderer>,
                |slot, (i, &page)| -> KinetypeResult<(usize, FrameRGBA)> {
                    let renderer = match slot.take() {
                        Some(r) => r,
                        None => {
                            let fonts = FontBook::load(&config.fonts).unwrap_or_else(|e| {
                                tracing::warn!(error = %e, "worker font load failed");
                                FontBook::empty()
                            });
                            CpuRenderer::with_typesetter(vp, Box::new(fonts))?
                        }
                    };
                    let page_config = SessionConfig {
                        page,
                        ..config.clone()
                    };
                    let mut session = Session::with_renderer(page_config, renderer)?;
                    let frame = replay_to(&mut session, last)?;
                    *slot = Some(session.into_renderer());
                    Ok((i, frame))
                },
            )
            .collect::<Vec<_>>()
    });

    let mut sheet = FrameRGBA::new(sheet_w, sheet_h);
    for tile in tiles {
        let (i, frame) = tile?;
        let (col, row) = ((i % cols) as u32, (i / cols) as u32);
        sheet.blit(&frame, col * vp.width, row * vp.height);
    }
    Ok(sheet)
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
