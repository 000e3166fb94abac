use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig, check_order};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{KinetypeError, KinetypeResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Spawns the system `ffmpeg` and streams raw RGBA frames into its stdin.
///
/// Output is h264 in yuv420p, so both dimensions must be even.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
}

/// A spawned `ffmpeg` process between `begin` and `end`.
struct Encoder {
    process: Child,
    input: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
    cfg: SinkConfig,
    opaque: Vec<u8>,
    last: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
        }
    }

    fn check_output(&self, cfg: &SinkConfig) -> KinetypeResult<()> {
        Fps::new(cfg.fps.num, cfg.fps.den)?;
        if cfg.width == 0 || cfg.height == 0 {
            return Err(KinetypeError::validation("mp4 output needs a non-empty frame"));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(KinetypeError::validation(format!(
                "mp4 output is yuv420p, so {}x{} must be even in both dimensions",
                cfg.width, cfg.height
            )));
        }
        let out = &self.opts.out_path;
        ensure_parent_dir(out)?;
        if !self.opts.overwrite && out.exists() {
            return Err(KinetypeError::validation(format!(
                "refusing to overwrite '{}'",
                out.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(KinetypeError::encode(
                "mp4 output needs `ffmpeg` on PATH; render to a directory for PNG frames instead",
            ));
        }
        Ok(())
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> KinetypeResult<()> {
        if self.encoder.is_some() {
            return Err(KinetypeError::encode("ffmpeg sink already started"));
        }
        self.check_output(&cfg)?;

        let mut process = Command::new("ffmpeg")
            .args(encoder_args(&cfg, &self.opts))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| KinetypeError::encode(format!("spawn ffmpeg: {e}")))?;
        let (Some(input), Some(mut errors)) = (process.stdin.take(), process.stderr.take()) else {
            return Err(KinetypeError::encode("ffmpeg pipes were not opened"));
        };
        // ffmpeg blocks once its stderr pipe fills, so read it concurrently.
        let stderr = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            errors.read_to_end(&mut bytes).map(|_| bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.encoder = Some(Encoder {
            process,
            input,
            stderr,
            opaque: vec![0; (cfg.width as usize) * (cfg.height as usize) * 4],
            cfg,
            last: None,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KinetypeResult<()> {
        let enc = self
            .encoder
            .as_mut()
            .ok_or_else(|| KinetypeError::encode("ffmpeg sink is not running"))?;
        let (w, h) = (enc.cfg.width, enc.cfg.height);
        if (frame.width, frame.height) != (w, h) {
            return Err(KinetypeError::validation(format!(
                "frame {} is {}x{}, the encoder expects {w}x{h}",
                idx.0, frame.width, frame.height
            )));
        }
        check_order(&mut enc.last, idx)?;
        flatten_to_opaque_rgba8(&mut enc.opaque, &frame.data, frame.premultiplied, enc.cfg.bg_rgba)?;
        enc.input
            .write_all(&enc.opaque)
            .map_err(|e| KinetypeError::encode(format!("write frame {} to ffmpeg: {e}", idx.0)))
    }

    fn end(&mut self) -> KinetypeResult<()> {
        let Encoder {
            mut process,
            input,
            stderr,
            ..
        } = self
            .encoder
            .take()
            .ok_or_else(|| KinetypeError::encode("ffmpeg sink is not running"))?;
        // Closing stdin is the end-of-stream signal.
        drop(input);
        let status = process
            .wait()
            .map_err(|e| KinetypeError::encode(format!("wait for ffmpeg: {e}")))?;
        let log = stderr
            .join()
            .map_err(|_| KinetypeError::encode("ffmpeg stderr reader panicked"))?
            .map_err(|e| KinetypeError::encode(format!("read ffmpeg stderr: {e}")))?;
        if !status.success() {
            return Err(KinetypeError::encode(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        tracing::debug!(out = %self.opts.out_path.display(), "ffmpeg finished");
        Ok(())
    }
}

/// Command line for one h264 encode reading raw RGBA frames from stdin.
///
/// Frames are flattened to opaque straight RGBA before they are written, so the input
/// format is plain `rgba`.
fn encoder_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<OsString> {
    let overwrite = if opts.overwrite { "-y" } else { "-n" };
    let mut args = vec![OsString::from(overwrite)];
    let size: &str = &format!("{}x{}", cfg.width, cfg.height);
    let rate: &str = &format!("{}/{}", cfg.fps.num, cfg.fps.den);
    let input = [
        "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba", "-s", size, "-r", rate,
        "-i", "pipe:0",
    ];
    let output = ["-an", "-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart"];
    for a in input.into_iter().chain(output) {
        args.push(a.into());
    }
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Composite `src` over an opaque background into `dst`.
pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> KinetypeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(KinetypeError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let [bg_r, bg_g, bg_b, _] = bg_rgba.map(u16::from);
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        let over = |c: u8, bg: u16| {
            let c = u16::from(c);
            let c = if src_is_premul { c } else { mul_div255_u16(c, a) };
            (c + mul_div255_u16(bg, inv)).min(255) as u8
        };
        d[0] = over(s[0], bg_r);
        d[1] = over(s[1], bg_g);
        d[2] = over(s[2], bg_b);
        d[3] = 255;
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> KinetypeResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// `true` when `ffmpeg -version` runs successfully from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
