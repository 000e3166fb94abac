use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::{KinetypeError, KinetypeResult};
use crate::input::pointer::{PointerButton, PointerEvent};
use std::f64::consts::TAU;

/// Coordinate space used by a [`PointerScript`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptUnits {
    /// `0..1` fractions of the viewport width/height.
    #[default]
    Normalized,
    /// Viewport pixels.
    Pixels,
}

/// One explicit event fired at the start of an output frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptedEvent {
    pub frame: u64,
    pub event: PointerEvent,
}

/// Frame span (end exclusive) during which the pointer is held down.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PressSpan {
    pub start: u64,
    pub end: u64,
    #[serde(default)]
    pub secondary: bool,
}

/// Generated pointer motion.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PathShape {
    Sweep {
        from: [f64; 2],
        to: [f64; 2],
    },
    Orbit {
        center: [f64; 2],
        radius: f64,
        /// Frames per revolution.
        period: f64,
    },
    Lissajous {
        center: [f64; 2],
        amp: [f64; 2],
        freq: [f64; 2],
        /// Frames per base cycle.
        period: f64,
    },
}

/// A generated track active over `start..end` output frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerPath {
    pub start: u64,
    pub end: u64,
    #[serde(flatten)]
    pub shape: PathShape,
    #[serde(default)]
    pub press: Vec<PressSpan>,
}

/// Scripted pointer input replacing a live mouse.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerScript {
    #[serde(default)]
    pub units: ScriptUnits,
    #[serde(default)]
    pub events: Vec<ScriptedEvent>,
    #[serde(default)]
    pub paths: Vec<PointerPath>,
}

impl PointerScript {
    /// A slow orbit around the centre with one press in the middle third.
    pub fn default_for(frames: u64) -> Self {
        let frames = frames.max(1);
        Self {
            units: ScriptUnits::Normalized,
            events: Vec::new(),
            paths: vec![PointerPath {
                start: 0,
                end: frames,
                shape: PathShape::Orbit {
                    center: [0.5, 0.5],
                    radius: 0.22,
                    period: 240.0,
                },
                press: vec![PressSpan {
                    start: frames / 3,
                    end: frames / 2,
                    secondary: false,
                }],
            }],
        }
    }

    pub fn validate(&self) -> KinetypeResult<()> {
        for e in &self.events {
            if !e.event.is_finite() {
                return Err(KinetypeError::validation(format!(
                    "pointer event at frame {} has non-finite coordinates",
                    e.frame
                )));
            }
        }
        for (i, p) in self.paths.iter().enumerate() {
            if p.end <= p.start {
                return Err(KinetypeError::validation(format!(
                    "pointer path {i} must have end > start"
                )));
            }
            let period_ok = match p.shape {
                PathShape::Sweep { .. } => true,
                PathShape::Orbit { period, .. } | PathShape::Lissajous { period, .. } => {
                    period.is_finite() && period > 0.0
                }
            };
            if !period_ok {
                return Err(KinetypeError::validation(format!(
                    "pointer path {i} period must be finite and > 0"
                )));
            }
            for s in &p.press {
                if s.end <= s.start {
                    return Err(KinetypeError::validation(format!(
                        "pointer path {i} press span must have end > start"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Events that fire at `frame`, explicit events first, then generated tracks.
    pub fn events_for(&self, frame: u64, viewport: Viewport) -> Vec<PointerEvent> {
        let mut out: Vec<PointerEvent> = self
            .events
            .iter()
            .filter(|e| e.frame == frame)
            .map(|e| self.scale_event(e.event, viewport))
            .collect();

        for path in &self.paths {
            if frame < path.start || frame >= path.end {
                let held = path.press.iter().any(|s| s.start < frame && s.end >= frame);
                if frame == path.end && held {
                    // Path ended mid-press: release where it stopped.
                    let p = self.scale(path_position(path, frame - 1 - path.start), viewport);
                    out.push(PointerEvent::Up { x: p.x, y: p.y });
                }
                continue;
            }
            let p = self.scale(path_position(path, frame - path.start), viewport);
            out.push(PointerEvent::Move { x: p.x, y: p.y });
            for span in &path.press {
                if frame == span.start {
                    out.push(PointerEvent::Down {
                        x: p.x,
                        y: p.y,
                        button: if span.secondary {
                            PointerButton::Secondary
                        } else {
                            PointerButton::Primary
                        },
                    });
                } else if frame == span.end {
                    out.push(PointerEvent::Up { x: p.x, y: p.y });
                }
            }
        }
        out
    }

    fn scale(&self, p: Point, viewport: Viewport) -> Point {
        match self.units {
            ScriptUnits::Normalized => Point::new(p.x * viewport.w(), p.y * viewport.h()),
            ScriptUnits::Pixels => p,
        }
    }

    fn scale_event(&self, event: PointerEvent, viewport: Viewport) -> PointerEvent {
        match event {
            PointerEvent::Move { x, y } => {
                let p = self.scale(Point::new(x, y), viewport);
                PointerEvent::Move { x: p.x, y: p.y }
            }
            PointerEvent::Down { x, y, button } => {
                let p = self.scale(Point::new(x, y), viewport);
                PointerEvent::Down {
                    x: p.x,
                    y: p.y,
                    button,
                }
            }
            PointerEvent::Up { x, y } => {
                let p = self.scale(Point::new(x, y), viewport);
                PointerEvent::Up { x: p.x, y: p.y }
            }
            PointerEvent::Leave => PointerEvent::Leave,
        }
    }
}

/// Position along a path `local` frames after its start, in script units.
fn path_position(path: &PointerPath, local: u64) -> Point {
    let t = local as f64;
    match path.shape {
        PathShape::Sweep { from, to } => {
            let span = (path.end - path.start).saturating_sub(1).max(1) as f64;
            let k = (t / span).clamp(0.0, 1.0);
            Point::new(from[0] + (to[0] - from[0]) * k, from[1] + (to[1] - from[1]) * k)
        }
        PathShape::Orbit {
            center,
            radius,
            period,
        } => {
            let a = t / period * TAU;
            Point::new(center[0] + a.cos() * radius, center[1] + a.sin() * radius)
        }
        PathShape::Lissajous {
            center,
            amp,
            freq,
            period,
        } => {
            let a = t / period * TAU;
            Point::new(
                center[0] + (a * freq[0]).sin() * amp[0],
                center[1] + (a * freq[1]).sin() * amp[1],
            )
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/script.rs"]
mod tests;
