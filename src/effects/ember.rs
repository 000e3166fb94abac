use crate::effects::text::TEXT_CONTENT;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick, glyph};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rect, Vec2};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::FontSpec;
use crate::scene::painter::Painter;

const FONT_SIZE: f64 = 12.0;
const CHAR_SPACING: f64 = 7.0;
const LINE_HEIGHT: f64 = 14.0;
const MARGIN_X: f64 = 20.0;
const MARGIN_Y: f64 = 40.0;
const HEAT_RADIUS_SQ: f64 = 400.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Stable,
    Burning,
    Ash,
}

#[derive(Clone, Debug)]
struct Cinder {
    ch: char,
    pos: Point,
    vel: Vec2,
    /// 1 fresh, <= 0 gone for good.
    life: f64,
    phase: Phase,
    heat: f64,
    delay: f64,
    jitter: Vec2,
    bright: bool,
    spark: bool,
}

/// A page of text that chars, burns and floats away as ash.
#[derive(Default)]
pub(crate) struct Ember {
    rng: EffectRng,
    cinders: Vec<Cinder>,
    flicker: f64,
}

impl Ember {
    pub(crate) fn alive(&self) -> usize {
        self.cinders.iter().filter(|c| c.life > 0.0).count()
    }
}

impl Effect for Ember {
    fn id(&self) -> EffectId {
        EffectId::Ember
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let mut rng = ctx.rng(EffectId::Ember);
        let text: Vec<char> = TEXT_CONTENT.replace('\n', " ").repeat(10).chars().collect();
        let mut cinders = Vec::new();
        let mut idx = 0usize;
        let mut y = MARGIN_Y;
        while y < vp.h() - MARGIN_Y {
            let mut x = MARGIN_X;
            while x < vp.w() - MARGIN_X {
                if idx >= text.len() {
                    idx = 0;
                }
                let ch = text[idx];
                idx += 1;
                if ch != ' ' {
                    cinders.push(Cinder {
                        ch,
                        pos: Point::new(x, y),
                        vel: Vec2::ZERO,
                        life: 1.0,
                        phase: Phase::Stable,
                        heat: 0.0,
                        delay: rng.unit() * 20.0,
                        jitter: Vec2::ZERO,
                        bright: false,
                        spark: false,
                    });
                }
                x += CHAR_SPACING;
            }
            y += LINE_HEIGHT;
        }
        self.cinders = cinders;
        self.rng = rng;
        self.flicker = 0.0;
    }

    fn step(&mut self, tick: &Tick, pointer: &PointerState) {
        let rng = &mut self.rng;
        self.flicker = rng.unit() * 0.02;
        let time = tick.time * 2.0;
        let m = if pointer.inside {
            pointer.pos
        } else {
            Point::new(-1000.0, -1000.0)
        };

        for c in &mut self.cinders {
            if c.life <= 0.0 {
                continue;
            }
            match c.phase {
                Phase::Stable => {
                    if (m - c.pos).hypot2() < HEAT_RADIUS_SQ {
                        c.heat += 0.2;
                        if c.heat > 0.8 {
                            c.phase = Phase::Burning;
                        }
                    } else {
                        c.heat = (c.heat - 0.01).max(0.0);
                    }
                }
                Phase::Burning => {
                    c.delay -= 1.0;
                    if c.delay <= 0.0 {
                        c.phase = Phase::Ash;
                        c.vel = Vec2::new(rng.signed(1.0), -0.5 - rng.unit());
                    }
                }
                Phase::Ash => {}
            }

            match c.phase {
                Phase::Stable => {
                    c.jitter = if c.heat > 0.0 {
                        Vec2::new(rng.signed(c.heat * 2.0), rng.signed(c.heat * 2.0))
                    } else {
                        Vec2::ZERO
                    };
                }
                Phase::Burning => {
                    c.bright = rng.chance(0.5);
                    c.jitter = Vec2::new(rng.signed(2.0), rng.signed(2.0));
                }
                Phase::Ash => {
                    c.pos.x += c.vel.x + (c.pos.y * 0.05 + time).sin() * 0.5;
                    c.pos.y += c.vel.y;
                    c.vel.y -= 0.02;
                    c.life -= 0.008;
                    c.spark = c.life > 0.5 && rng.chance(0.05);
                }
            }
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::rgba(5, 1, 0, 0.2 + self.flicker));

        let font = FontSpec::mono(FONT_SIZE);
        let mut warm = Vec::new();
        let mut burning = Vec::new();
        for c in self.cinders.iter().filter(|c| c.life > 0.0) {
            match c.phase {
                Phase::Stable => {
                    let color = match c.heat {
                        h if h > 0.9 => Color::WHITE,
                        h if h > 0.6 => Color::hex(0xff4400),
                        h if h > 0.3 => Color::hex(0x552211),
                        _ => Color::hex(0x333333),
                    };
                    let op = glyph(c.ch, c.pos + c.jitter, font, color);
                    if c.heat > 0.5 {
                        warm.push(op);
                    } else {
                        painter.text(op);
                    }
                }
                Phase::Burning => {
                    let color = if c.bright {
                        Color::WHITE
                    } else {
                        Color::hex(0xff8800)
                    };
                    burning.push(glyph(c.ch, c.pos + c.jitter, font, color));
                }
                Phase::Ash => {
                    let size = FONT_SIZE * c.life;
                    if size > 0.5 {
                        painter.fill_circle(c.pos, size / 3.0, Color::rgba(80, 80, 80, c.life));
                        if c.spark {
                            painter.fill_rect(
                                Rect::new(c.pos.x, c.pos.y, c.pos.x + 1.5, c.pos.y + 1.5),
                                Color::rgba(255, 100, 0, c.life),
                            );
                        }
                    }
                }
            }
        }
        let orange = Color::hex(0xff4400);
        if !warm.is_empty() {
            painter.glow(8.0, orange, |p| warm.into_iter().for_each(|op| p.text(op)));
        }
        if !burning.is_empty() {
            painter.glow(15.0, orange, |p| burning.into_iter().for_each(|op| p.text(op)));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/ember.rs"]
mod tests;
