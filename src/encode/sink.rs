use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{KinetypeError, KinetypeResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    /// Straight-alpha RGBA8 used to flatten translucent pixels for opaque formats.
    pub bg_rgba: [u8; 4],
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`FrameIndex`] order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> KinetypeResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KinetypeResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> KinetypeResult<()>;
}

/// Reject a frame index that does not move forward.
pub(crate) fn check_order(last: &mut Option<FrameIndex>, idx: FrameIndex) -> KinetypeResult<()> {
    if let Some(prev) = *last {
        if idx <= prev {
            return Err(KinetypeError::encode(format!(
                "frame {} pushed after frame {}",
                idx.0, prev.0
            )));
        }
    }
    *last = Some(idx);
    Ok(())
}

fn check_size(cfg: &SinkConfig, frame: &FrameRGBA) -> KinetypeResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(KinetypeError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// Keeps every frame in memory. For tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    last: Option<FrameIndex>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<(FrameIndex, FrameRGBA)> {
        self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> KinetypeResult<()> {
        self.cfg = Some(cfg);
        self.last = None;
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KinetypeResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| KinetypeError::encode("in-memory sink not started"))?;
        check_size(cfg, frame)?;
        check_order(&mut self.last, idx)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> KinetypeResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    last: Option<FrameIndex>,
    written: usize,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            last: None,
            written: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", idx.0))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> KinetypeResult<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory '{}'", self.dir.display())
        })?;
        self.cfg = Some(cfg);
        self.last = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KinetypeResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| KinetypeError::encode("png sink not started"))?;
        check_size(cfg, frame)?;
        check_order(&mut self.last, idx)?;
        let path = self.frame_path(idx);
        write_png(&path, frame)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> KinetypeResult<()> {
        tracing::debug!(dir = %self.dir.display(), frames = self.written, "png sequence done");
        self.cfg = None;
        Ok(())
    }
}

/// Save one frame as a straight-alpha RGBA PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> KinetypeResult<()> {
    super::ffmpeg::ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &frame.to_straight(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
