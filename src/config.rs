use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::effects::EffectId;
use crate::foundation::color::ColorDef;
use crate::foundation::core::{Fps, MAX_VIEWPORT_EDGE, Viewport};
use crate::foundation::error::{KinetypeError, KinetypeResult};
use crate::input::script::PointerScript;
use crate::text::fonts::FontSources;

/// Everything a headless session needs: output format, page, fonts and pointer input.
///
/// Every field has a default, so `{}` is a valid document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    /// Output frames to produce.
    pub frames: u64,
    pub seed: u64,
    pub page: EffectId,
    pub fonts: FontSources,
    /// Scripted input; a default orbit with one press when absent.
    pub pointer: Option<PointerScript>,
    /// Replaces the page's catalog background.
    pub background: Option<ColorDef>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: Fps::default(),
            frames: 180,
            seed: 1,
            page: EffectId::default(),
            fonts: FontSources::default(),
            pointer: None,
            background: None,
        }
    }
}

impl SessionConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> KinetypeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| KinetypeError::validation(format!("parse session config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> KinetypeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            KinetypeError::validation(format!("open session config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> KinetypeResult<()> {
        Viewport::new(self.width, self.height)?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.frames == 0 {
            return Err(KinetypeError::validation("frames must be > 0"));
        }
        if let Some(script) = &self.pointer {
            script.validate()?;
        }
        Ok(())
    }

    /// Output viewport, clamped into the accepted range so it is usable before validation.
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width.clamp(1, MAX_VIEWPORT_EDGE),
            height: self.height.clamp(1, MAX_VIEWPORT_EDGE),
        }
    }

    pub fn pointer_script(&self) -> PointerScript {
        self.pointer
            .clone()
            .unwrap_or_else(|| PointerScript::default_for(self.frames))
    }

    /// Change the output length without moving the default pointer script, which is
    /// derived from the configured length.
    pub fn set_frames(&mut self, frames: u64) {
        if self.pointer.is_none() {
            self.pointer = Some(PointerScript::default_for(self.frames));
        }
        self.frames = frames;
    }

    /// Simulation steps owed by the end of output frame `frame`.
    pub fn steps_through(&self, frame: u64) -> u64 {
        let secs = self.fps.frames_to_secs(frame + 1);
        (secs * crate::effects::SIM_HZ).round() as u64
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
