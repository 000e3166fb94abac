use kurbo::{BezPath, Shape};

use crate::effects::text::SIGNAL_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rect, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{Baseline, Composite, FontSpec, PassSpec, TextOp};
use crate::scene::painter::Painter;

const FONT_SIZE: f64 = 40.0;
const WORDS_PER_ROW: usize = 10;
const INFLUENCE: f64 = 150.0;
const SPIKE_CHANCE: f64 = 0.01;
const NOISE_CHANCE: f64 = 0.1;
const CRUISE: f64 = 2.0;
const PHOSPHOR: Color = Color::new(0.133, 0.667, 0.6, 1.0);

#[derive(Clone, Debug)]
struct Row {
    text: String,
    width: f64,
    y: f64,
    speed: f64,
    offset: f64,
    tear: f64,
    split: f64,
    flicker: f64,
}

/// Scrolling error logs that tear and split under the pointer.
#[derive(Default)]
pub(crate) struct Signal {
    vp: Viewport,
    rng: EffectRng,
    rows: Vec<Row>,
    frame: u64,
    noise: Option<Rect>,
}

impl Signal {
    fn font() -> FontSpec {
        FontSpec::mono(FONT_SIZE).bold()
    }

    pub(crate) fn torn(&self) -> usize {
        self.rows.iter().filter(|r| r.split > 1.0).count()
    }
}

impl Effect for Signal {
    fn id(&self) -> EffectId {
        EffectId::Signal
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Signal);
        let count = (vp.h() / FONT_SIZE).ceil() as usize + 2;
        self.rows = (0..count)
            .map(|i| {
                let words: Vec<&str> = (0..WORDS_PER_ROW)
                    .map(|_| rng.pick(SIGNAL_TEXT).copied().unwrap_or("NO_SIGNAL"))
                    .collect();
                let text = words.join("   ");
                let width = ctx.measure(&text, Self::font()).max(1.0);
                Row {
                    text,
                    width,
                    y: i as f64 * FONT_SIZE,
                    speed: rng.range(0.5, 2.5),
                    offset: -rng.range(0.0, 1000.0),
                    tear: 0.0,
                    split: 0.0,
                    flicker: 1.0,
                }
            })
            .collect();
        self.rng = rng;
        self.frame = 0;
        self.noise = None;
        self.vp = vp;
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        self.frame += 1;
        let rng = &mut self.rng;
        for row in &mut self.rows {
            row.offset -= row.speed;
            let mut interference = if pointer.inside {
                (1.0 - (pointer.pos.y - row.y).abs() / INFLUENCE).max(0.0)
            } else {
                0.0
            };
            if rng.chance(SPIKE_CHANCE) {
                interference = 1.0;
            }
            if interference > 0.1 {
                row.tear = rng.signed(100.0) * interference;
                row.split = interference * 20.0;
                if rng.chance(0.1) {
                    row.speed = rng.signed(20.0);
                }
            } else {
                row.tear *= 0.8;
                row.split *= 0.8;
                row.speed += (CRUISE - row.speed) * 0.1;
            }
            if row.offset < -row.width {
                row.offset = 0.0;
            }
            if row.offset > 0.0 {
                row.offset = -row.width;
            }
            row.flicker = rng.range(0.8, 1.0);
        }

        let (w, h) = (self.vp.w(), self.vp.h());
        self.noise = rng.chance(NOISE_CHANCE).then(|| {
            Rect::from_origin_size(
                Point::new(rng.unit() * w, rng.unit() * h),
                (rng.unit() * 200.0, rng.unit() * 50.0),
            )
        });
    }

    fn draw(&self, painter: &mut Painter) {
        let (w, h) = (self.vp.w(), self.vp.h());
        painter.fill_all(Color::hex(0x050505));
        let font = Self::font();
        let line = |text: &str, x: f64, y: f64, color: Color| {
            TextOp::new(text, Point::new(x, y), font)
                .baseline(Baseline::Top)
                .color(color)
        };

        for row in &self.rows {
            let x = row.offset + row.tear;
            if row.split > 1.0 {
                let s = row.split;
                painter.pass(PassSpec::screen().composite(Composite::Screen), |p| {
                    for (dx, color) in [
                        (-s, Color::rgba(255, 0, 0, 0.8)),
                        (0.0, Color::rgba(0, 255, 0, 0.8)),
                        (s, Color::rgba(0, 0, 255, 0.8)),
                    ] {
                        p.text(line(&row.text, x + dx, row.y, color));
                        p.text(line(&row.text, x + dx + row.width, row.y, color));
                    }
                });
            } else {
                let color = PHOSPHOR.with_alpha(row.flicker);
                painter.text(line(&row.text, x, row.y, color));
                painter.text(line(&row.text, x + row.width, row.y, color));
            }
        }

        let mut scanlines = BezPath::new();
        let mut y = 0.0;
        while y < h {
            scanlines.extend(Rect::new(0.0, y, w, y + 2.0).path_elements(0.1));
            y += 4.0;
        }
        painter.fill_path(scanlines, Color::BLACK.with_alpha(0.3));

        let bar = (self.frame as f64 * 5.0) % h;
        painter.fill_rect(Rect::new(0.0, bar, w, bar + 50.0), Color::WHITE.with_alpha(0.05));
        if let Some(block) = self.noise {
            painter.fill_rect(block, Color::WHITE);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/signal.rs"]
mod tests;
