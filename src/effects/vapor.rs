use kurbo::{Circle, Shape};

use crate::effects::text::VAPOR_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, BezPath, Point, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{
    Composite, FontSpec, GradientStop, Paint, PassSpec, StrokeStyle, Target, TextOp,
};
use crate::scene::painter::Painter;

const SHARP: u8 = 0;
const BLURRED: u8 = 1;
const FOG: u8 = 2;

const BOKEH: usize = 30;
const DROPS: usize = 50;
const FOG_BLUR: f64 = 12.0;
const REFOG_ALPHA: f64 = 0.005;
const BRUSH: f64 = 25.0;
const LINE_HEIGHT: f64 = 40.0;

#[derive(Clone, Debug)]
struct Bokeh {
    center: Point,
    radius: f64,
    color: Color,
}

#[derive(Clone, Debug)]
struct Drop {
    pos: Point,
    vy: f64,
    size: f64,
    trail: f64,
}

impl Drop {
    fn spawn(rng: &mut EffectRng, vp: Viewport) -> Self {
        Self {
            pos: Point::new(rng.unit() * vp.w(), rng.unit() * vp.h()),
            vy: rng.range(2.0, 5.0),
            size: rng.range(2.0, 5.0),
            trail: rng.range(5.0, 20.0),
        }
    }
}

/// A fogged window over a rainy poem.
///
/// Three offscreen layers: the sharp scene, its blurred copy, and a fog mask that the
/// pointer and rain erase while it slowly condenses back.
#[derive(Default)]
pub(crate) struct Vapor {
    vp: Viewport,
    rng: EffectRng,
    bokeh: Vec<Bokeh>,
    drops: Vec<Drop>,
    wipe: Option<Point>,
}

impl Vapor {
    fn draw_sharp(&self, p: &mut Painter) {
        let (w, h) = (self.vp.w(), self.vp.h());
        p.fill_all(Paint::Linear {
            start: Point::ZERO,
            end: Point::new(0.0, h),
            stops: vec![
                GradientStop::new(0.0, Color::hex(0x0f172a)),
                GradientStop::new(1.0, Color::hex(0x020617)),
            ],
        });
        for b in &self.bokeh {
            p.fill_circle(b.center, b.radius, b.color);
        }
        let lines: Vec<&str> = VAPOR_TEXT.split('\n').collect();
        let start_y = (h - lines.len() as f64 * LINE_HEIGHT) / 2.0;
        let font = FontSpec::serif(24.0);
        for (i, line) in lines.iter().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let at = Point::new(w / 2.0, start_y + i as f64 * LINE_HEIGHT);
            p.text(TextOp::new(line, at, font).centered().color(Color::hex(0xe2e8f0)));
        }
    }
}

impl Effect for Vapor {
    fn id(&self) -> EffectId {
        EffectId::Vapor
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Vapor);
        self.bokeh = (0..BOKEH)
            .map(|_| Bokeh {
                center: Point::new(rng.unit() * vp.w(), rng.unit() * vp.h()),
                radius: rng.range(20.0, 100.0),
                color: if rng.chance(0.5) {
                    Color::rgba(56, 189, 248, 0.05)
                } else {
                    Color::rgba(168, 85, 247, 0.05)
                },
            })
            .collect();
        self.drops = (0..DROPS).map(|_| Drop::spawn(&mut rng, vp)).collect();
        self.wipe = None;
        self.rng = rng;
        self.vp = vp;
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        self.wipe = pointer.inside.then_some(pointer.pos);
        let (w, h) = (self.vp.w(), self.vp.h());
        for d in &mut self.drops {
            d.pos.y += d.vy;
            d.pos.x += self.rng.signed(0.5);
            if d.pos.y > h {
                d.pos.y = -20.0;
                d.pos.x = self.rng.unit() * w;
            }
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.pass(PassSpec::offscreen(SHARP).clearing().priming(), |p| self.draw_sharp(p));
        painter.pass(
            PassSpec::offscreen(BLURRED).clearing().priming().blur(FOG_BLUR),
            |p| p.image(Target::Offscreen(SHARP), Affine::IDENTITY, 1.0),
        );
        painter.pass(PassSpec::offscreen(FOG).clearing().priming(), |p| {
            p.fill_all(Color::WHITE);
        });

        painter.pass(PassSpec::offscreen(FOG), |p| {
            p.fill_all(Color::WHITE.with_alpha(REFOG_ALPHA));
        });
        painter.pass(
            PassSpec::offscreen(FOG).composite(Composite::DestinationOut),
            |p| {
                if let Some(m) = self.wipe {
                    let brush = Paint::Radial {
                        center: m,
                        r0: BRUSH * 0.2,
                        r1: BRUSH,
                        stops: vec![
                            GradientStop::new(0.0, Color::BLACK),
                            GradientStop::new(1.0, Color::BLACK.with_alpha(0.0)),
                        ],
                    };
                    p.fill_circle(m, BRUSH, brush);
                }
                for d in &self.drops {
                    p.stroke_line(
                        d.pos,
                        Point::new(d.pos.x, d.pos.y - d.trail),
                        Color::BLACK.with_alpha(0.5),
                        StrokeStyle::round(d.size),
                    );
                }
            },
        );

        // Blurred scene, kept only where fog remains, over the sharp scene.
        painter.pass(PassSpec::screen().clearing(), |p| {
            p.image(Target::Offscreen(BLURRED), Affine::IDENTITY, 1.0);
        });
        painter.pass(PassSpec::screen().composite(Composite::DestinationIn), |p| {
            p.image(Target::Offscreen(FOG), Affine::IDENTITY, 1.0);
        });
        painter.pass(PassSpec::screen().composite(Composite::DestinationOver), |p| {
            p.image(Target::Offscreen(SHARP), Affine::IDENTITY, 1.0);
        });

        // Drops act as small clear lenses.
        let mut lenses = BezPath::new();
        for d in &self.drops {
            lenses.extend(Circle::new(d.pos, d.size).path_elements(0.1));
        }
        painter.clip(lenses, Affine::IDENTITY, |p| {
            p.image(Target::Offscreen(SHARP), Affine::IDENTITY, 1.0);
        });
        for d in &self.drops {
            painter.stroke_circle(d.pos, d.size, Color::WHITE.with_alpha(0.3), StrokeStyle::new(1.0));
            painter.fill_circle(
                d.pos - (d.size * 0.3, d.size * 0.3),
                d.size * 0.2,
                Color::WHITE.with_alpha(0.6),
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/vapor.rs"]
mod tests;
