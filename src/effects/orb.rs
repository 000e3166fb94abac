use std::f64::consts::PI;

use glam::DVec3;

use crate::effects::text::ORB_CHARS;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Vec2, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::{PointerEvent, PointerState};
use crate::scene::display::{FontSpec, GradientStop, Paint, StrokeStyle, TextOp};
use crate::scene::painter::Painter;

const COUNT: usize = 180;
const MAX_RADIUS: f64 = 280.0;
const PERSPECTIVE: f64 = 1000.0;
const IDLE_SPIN: Vec2 = Vec2::new(0.003, 0.001);
const RELEASE_SPIN: Vec2 = Vec2::new(0.02, 0.005);
const MESH_REACH: usize = 12;
const MESH_DIST_SQ: f64 = 3600.0;

#[derive(Clone, Debug)]
struct Element {
    symbol: &'static str,
    base: DVec3,
    bold: bool,
}

#[derive(Clone, Debug)]
struct Projected {
    pos: Point,
    depth: f64,
    scale: f64,
    alpha: f64,
    symbol: &'static str,
    bold: bool,
}

/// Unit vectors spread evenly over a sphere.
pub(crate) fn fibonacci_sphere(n: usize) -> Vec<DVec3> {
    let golden = PI * (3.0 - 5f64.sqrt());
    (0..n)
        .map(|i| {
            let y = 1.0 - i as f64 / (n.max(2) - 1) as f64 * 2.0;
            let r = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden * i as f64;
            DVec3::new(theta.cos() * r, y, theta.sin() * r)
        })
        .collect()
}

/// A sphere of element symbols that collapses into a red-hot core while pressed.
#[derive(Default)]
pub(crate) struct Orb {
    vp: Viewport,
    rng: EffectRng,
    radius: f64,
    elements: Vec<Element>,
    /// Pitch and yaw.
    rotation: Vec2,
    momentum: Vec2,
    pulse: f64,
    collapse: f64,
    held: bool,
    projected: Vec<Projected>,
}

impl Orb {
    pub(crate) fn collapse(&self) -> f64 {
        self.collapse
    }

    fn project(&mut self) {
        let c = self.vp.center();
        let (sy, cy) = self.rotation.y.sin_cos();
        let (sx, cx) = self.rotation.x.sin_cos();
        let shrink = 1.0 - self.collapse * 0.8;
        let mut out = Vec::with_capacity(self.elements.len());
        for e in &self.elements {
            let wave = (self.pulse - e.base.y * 0.01).sin();
            let crest = if wave > 0.8 { (wave - 0.8) * 40.0 } else { 0.0 };
            let swell = crest * (1.0 - self.collapse);
            let jitter = self.collapse * self.rng.signed(50.0);
            let mut p = e.base * shrink + DVec3::splat(jitter);
            let len = p.length();
            if len > 0.001 {
                p *= (len + swell) / len;
            }
            let rx = p.x * cy - p.z * sy;
            let rz = p.x * sy + p.z * cy;
            let ry = p.y * cx - rz * sx;
            let rz = p.y * sx + rz * cx;
            let scale = PERSPECTIVE / (PERSPECTIVE + rz);
            out.push(Projected {
                pos: Point::new(rx * scale + c.x, ry * scale + c.y),
                depth: rz,
                scale,
                alpha: ((scale - 0.6) * 2.5).max(0.05),
                symbol: e.symbol,
                bold: e.bold,
            });
        }
        // Back to front.
        out.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        self.projected = out;
    }
}

impl Effect for Orb {
    fn id(&self) -> EffectId {
        EffectId::Orb
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        self.vp = ctx.viewport;
        self.rng = ctx.rng(EffectId::Orb);
        self.radius = (self.vp.w().min(self.vp.h()) * 0.35).min(MAX_RADIUS);
        let rng = &mut self.rng;
        let radius = self.radius;
        self.elements = fibonacci_sphere(COUNT)
            .into_iter()
            .map(|u| Element {
                symbol: rng.pick(ORB_CHARS).copied().unwrap_or("H"),
                base: u * radius,
                // Alternate latitude bands are set bold.
                bold: ((u.y.abs() * 5.0).floor() as i64) % 2 == 0,
            })
            .collect();
        self.rotation = Vec2::ZERO;
        self.momentum = IDLE_SPIN;
        self.pulse = 0.0;
        self.collapse = 0.0;
        self.held = false;
        self.project();
    }

    fn pointer(&mut self, event: &PointerEvent, _state: &PointerState) {
        match event {
            PointerEvent::Down { .. } => self.held = true,
            PointerEvent::Up { .. } | PointerEvent::Leave => {
                if self.held {
                    self.momentum = RELEASE_SPIN;
                }
                self.held = false;
            }
            PointerEvent::Move { .. } => {}
        }
    }

    fn step(&mut self, _tick: &Tick, pointer: &PointerState) {
        self.pulse += 0.02;
        if self.held {
            let drag = pointer.velocity() * 0.005;
            self.rotation.y += 0.1 + drag.x;
            self.rotation.x += drag.y;
            self.collapse += (1.0 - self.collapse) * 0.05;
        } else {
            self.rotation.y += self.momentum.x;
            self.rotation.x += self.momentum.y;
            self.collapse *= 0.9;
        }
        self.project();
    }

    fn draw(&self, painter: &mut Painter) {
        let c = self.vp.center();
        painter.fill_all(Color::hex(0x020205));
        painter.fill_circle(
            c,
            self.radius * 1.5,
            Paint::Radial {
                center: c,
                r0: 10.0,
                r1: self.radius * 1.2,
                stops: vec![
                    GradientStop::new(0.0, Color::rgba(0, 255, 255, 0.15)),
                    GradientStop::new(0.4, Color::rgba(0, 100, 255, 0.05)),
                    GradientStop::new(1.0, Color::TRANSPARENT),
                ],
            },
        );

        let nodes = &self.projected;
        let reach_sq = MESH_DIST_SQ * (1.0 - self.collapse * 0.9);
        let limit = nodes.len() * 7 / 10;
        for (i, a) in nodes.iter().enumerate().take(limit) {
            if a.alpha < 0.2 {
                continue;
            }
            for b in &nodes[i + 1..(i + MESH_REACH).min(nodes.len())] {
                let d2 = (a.pos - b.pos).hypot2();
                if d2 < reach_sq {
                    let alpha = (a.alpha + b.alpha) / 2.0 * (1.0 - d2 / reach_sq) * 0.4;
                    painter.stroke_line(
                        a.pos,
                        b.pos,
                        Color::rgba(100, 220, 255, alpha),
                        StrokeStyle::round(0.8),
                    );
                }
            }
        }

        let hot = self.collapse > 0.5;
        let heat = (self.collapse * 255.0).floor() as u8;
        let mut bright = Vec::new();
        for n in nodes.iter().filter(|n| n.alpha > 0.1) {
            let size = 12.0 * n.scale * (1.0 - self.collapse * 0.5);
            let font = if n.bold { FontSpec::sans(size).bold() } else { FontSpec::sans(size) };
            let color = if hot {
                Color::rgba(255, 255 - heat, 100, n.alpha)
            } else {
                Color::hsla(190.0, 0.8, 0.5 + (n.alpha * 50.0).floor() / 100.0, n.alpha)
            };
            let op = TextOp::new(n.symbol, n.pos, font).centered().color(color);
            if hot || n.alpha > 0.8 {
                bright.push(op);
            } else {
                painter.text(op);
            }
        }
        let (blur, halo) = if hot {
            (20.0 * self.collapse, Color::rgb(255, 0, 0))
        } else {
            (10.0, Color::rgb(0, 255, 255))
        };
        painter.glow(blur, halo, |p| bright.into_iter().for_each(|op| p.text(op)));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/orb.rs"]
mod tests;
