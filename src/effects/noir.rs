use crate::effects::text::NOIR_TEXT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Point, Rect, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{Baseline, FontSpec, GradientStop, Paint, PassSpec, Target, TextOp};
use crate::scene::painter::Painter;
use crate::text::layout::{FlowOptions, flow_layout};

const FONT_SIZE: f64 = 24.0;
const LINE_HEIGHT: f64 = 40.0;
const SPOTLIGHT: f64 = 250.0;
const INK: Color = Color::new(0.878, 0.878, 0.878, 1.0);
const GRAIN_SLOT: u8 = 0;
const GRAIN_OPACITY: f64 = 0.05;
/// One grain speck per this many square pixels.
const GRAIN_DENSITY: f64 = 60.0;

#[derive(Clone, Debug)]
struct Wisp {
    ch: char,
    pos: Point,
    origin: Point,
    vel: Vec2,
    alpha: f64,
}

/// Italic prose that only exists inside a spotlight, smoking upward when lit.
#[derive(Default)]
pub(crate) struct Noir {
    vp: Viewport,
    rng: EffectRng,
    wisps: Vec<Wisp>,
    grain: Vec<(Point, bool)>,
    light: Option<Point>,
}

impl Noir {
    pub(crate) fn visible(&self) -> usize {
        self.wisps.iter().filter(|w| w.alpha >= 0.02).count()
    }
}

impl Effect for Noir {
    fn id(&self) -> EffectId {
        EffectId::Noir
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Noir);
        let font = FontSpec::serif(FONT_SIZE).italic();
        let opts = FlowOptions::margins(vp.w(), vp.h(), 60.0, 0.2, 0.2, LINE_HEIGHT).bottom(vp.h() - 100.0);
        self.wisps = flow_layout(NOIR_TEXT, font, opts, ctx.typesetter)
            .into_iter()
            .map(|g| Wisp {
                ch: g.ch,
                pos: g.pos,
                origin: g.pos,
                vel: Vec2::ZERO,
                alpha: 0.0,
            })
            .collect();
        let specks = (vp.w() * vp.h() / GRAIN_DENSITY) as usize;
        self.grain = (0..specks)
            .map(|_| (Point::new(rng.unit() * vp.w(), rng.unit() * vp.h()), rng.chance(0.5)))
            .collect();
        self.rng = rng;
        self.light = None;
        self.vp = vp;
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        self.light = pointer.inside.then_some(pointer.pos);
        let rng = &mut self.rng;
        for w in &mut self.wisps {
            let lit = self.light.and_then(|m| {
                let d = m - w.pos;
                let dist = d.hypot();
                (dist < SPOTLIGHT).then_some((d, dist))
            });
            let target = match lit {
                Some((_, dist)) => 0.2 + (1.0 - dist / SPOTLIGHT) * 0.8,
                None => 0.05,
            };
            w.alpha += (target - w.alpha) * 0.05;

            if let Some((d, dist)) = lit {
                let intensity = 1.0 - dist / SPOTLIGHT;
                w.vel.x += rng.signed(0.5) * intensity;
                w.vel.y -= 0.5 * intensity;
                if dist > 0.0 {
                    w.vel -= d / dist * (0.2 * intensity);
                }
            }
            let spring = if lit.is_some() { 0.01 } else { 0.05 };
            w.vel += (w.origin - w.pos) * spring;
            w.vel *= 0.9;
            w.pos += w.vel;
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.pass(PassSpec::offscreen(GRAIN_SLOT).clearing().priming(), |p| {
            for &(at, light) in &self.grain {
                let c = if light { Color::WHITE } else { Color::BLACK };
                p.fill_rect(Rect::from_origin_size(at, (1.0, 1.0)), c);
            }
        });

        painter.fill_all(Color::hex(0x080808));
        if let Some(m) = self.light {
            painter.fill_all(Paint::Radial {
                center: m,
                r0: 0.0,
                r1: SPOTLIGHT,
                stops: vec![
                    GradientStop::new(0.0, Color::WHITE.with_alpha(0.08)),
                    GradientStop::new(1.0, Color::TRANSPARENT),
                ],
            });
        }

        let font = FontSpec::serif(FONT_SIZE).italic();
        for w in self.wisps.iter().filter(|w| w.alpha >= 0.02) {
            painter.text(
                TextOp::new(w.ch.to_string(), w.pos, font)
                    .baseline(Baseline::Top)
                    .color(INK.with_alpha(w.alpha)),
            );
        }

        painter.pass(PassSpec::overlay(), |p| {
            p.image(Target::Offscreen(GRAIN_SLOT), Affine::IDENTITY, GRAIN_OPACITY);
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/noir.rs"]
mod tests;
