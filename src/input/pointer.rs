use crate::foundation::core::{Point, Vec2, Viewport};

/// Which button started a press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
}

/// A single pointer or touch event in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Move {
        x: f64,
        y: f64,
    },
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
    },
    Up {
        x: f64,
        y: f64,
    },
    Leave,
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match *self {
            PointerEvent::Move { x, y }
            | PointerEvent::Down { x, y, .. }
            | PointerEvent::Up { x, y } => Some(Point::new(x, y)),
            PointerEvent::Leave => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position()
            .is_none_or(|p| p.x.is_finite() && p.y.is_finite())
    }
}

/// Accumulated pointer state, updated from events and settled once per simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub pos: Point,
    pub last: Point,
    pub down: bool,
    pub inside: bool,
    pub button: PointerButton,
}

impl PointerState {
    pub fn new(viewport: Viewport) -> Self {
        let c = viewport.center();
        Self {
            pos: c,
            last: c,
            down: false,
            inside: false,
            button: PointerButton::Primary,
        }
    }

    pub fn apply(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Move { x, y } => {
                if !self.inside {
                    // Entering: no velocity spike from the stale position.
                    self.last = Point::new(x, y);
                }
                self.pos = Point::new(x, y);
                self.inside = true;
            }
            PointerEvent::Down { x, y, button } => {
                if !self.inside {
                    self.last = Point::new(x, y);
                }
                self.pos = Point::new(x, y);
                self.inside = true;
                self.down = true;
                self.button = button;
            }
            PointerEvent::Up { x, y } => {
                self.pos = Point::new(x, y);
                self.down = false;
            }
            PointerEvent::Leave => {
                self.inside = false;
                self.down = false;
            }
        }
    }

    /// Movement since the last [`PointerState::settle`].
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.last
    }

    pub fn settle(&mut self) {
        self.last = self.pos;
    }

    pub fn secondary_down(&self) -> bool {
        self.down && self.button == PointerButton::Secondary
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/pointer.rs"]
mod tests;
