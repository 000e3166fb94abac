use std::f64::consts::TAU;

use glam::DVec3;
use kurbo::{BezPath, Rect, Shape};

use crate::effects::projection::Camera;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Point, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{FontSpec, TextOp};
use crate::scene::painter::Painter;

const CANVAS_W: u32 = 1000;
const CANVAS_H: u32 = 500;
const CONTENT_W: f64 = 800.0;
const MOUSE_RADIUS: f64 = 4.0;
const SHARD: f64 = 0.04;
/// Shards are filled in this many shades of gold.
const SHADES: usize = 8;
const DARK_GOLD: Color = Color::new(0.333, 0.2, 0.0, 1.0);
const BRIGHT_GOLD: Color = Color::new(1.0, 0.8, 0.0, 1.0);

#[derive(Clone, Debug)]
struct Grain {
    home: DVec3,
    pos: DVec3,
    vel: DVec3,
    spring: f64,
    drag: f64,
    phase: f64,
}

/// The title rendered as gold sand, stirred by the pointer and a phantom pendulum.
#[derive(Default)]
pub(crate) struct Temporal {
    vp: Viewport,
    camera: Camera,
    rng: EffectRng,
    grains: Vec<Grain>,
    narrow: bool,
    world_w: f64,
    time: f64,
}

impl Temporal {
    pub(crate) fn grain_count(&self) -> usize {
        self.grains.len()
    }

    /// Where the pendulum bob is at `time`, in world units.
    fn pendulum(&self, time: f64) -> DVec3 {
        let x = (time * 0.5).sin() * self.world_w * 0.4;
        let lift = if self.narrow { 1.0 } else { 2.0 };
        DVec3::new(x, (time * 0.5).cos() * -2.0 + lift, 0.0)
    }

    fn displaced(&self) -> f64 {
        let n = self.grains.len().max(1) as f64;
        self.grains.iter().map(|g| (g.pos - g.home).length()).sum::<f64>() / n
    }
}

impl Effect for Temporal {
    fn id(&self) -> EffectId {
        EffectId::Temporal
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        let vp = ctx.viewport;
        let camera = Camera::default();
        let (world_w, _) = camera.world_viewport(vp.aspect());
        let narrow = world_w < 10.0;
        let mut rng = ctx.rng(EffectId::Temporal);

        let (cx, cy) = (f64::from(CANVAS_W) / 2.0, f64::from(CANVAS_H) / 2.0);
        let runs = [
            TextOp::new("TEMPORAL", Point::new(cx, cy - 50.0), FontSpec::serif(150.0).bold()).centered(),
            TextOp::new("The Sands of Time", Point::new(cx, cy + 80.0), FontSpec::serif(40.0).italic())
                .centered(),
        ];
        let step = if narrow { 6 } else { 4 };
        let scale = world_w * 0.85 / CONTENT_W;
        self.grains = ctx
            .typesetter
            .coverage(CANVAS_W, CANVAS_H, &runs)
            .sample(step, 128)
            .into_iter()
            .map(|p| {
                let home = DVec3::new((p.x - cx) * scale, -(p.y - cy) * scale, 0.0);
                Grain {
                    home,
                    pos: home,
                    vel: DVec3::ZERO,
                    spring: rng.range(0.015, 0.045),
                    drag: rng.range(0.90, 0.95),
                    phase: rng.unit() * TAU,
                }
            })
            .collect();
        tracing::debug!(grains = self.grains.len(), "temporal sand sampled");
        self.rng = rng;
        self.camera = camera;
        self.narrow = narrow;
        self.world_w = world_w;
        self.time = 0.0;
        self.vp = vp;
    }

    fn step(&mut self, tick: &Tick, pointer: &PointerState) {
        let time = tick.time;
        self.time = time;
        let mouse = pointer
            .inside
            .then(|| self.camera.pointer_to_world(pointer.pos, self.vp));
        let bob = self.pendulum(time);
        let bob_radius = if self.narrow { 3.0 } else { 5.0 };

        let rng = &mut self.rng;
        for g in &mut self.grains {
            if let Some(m) = mouse {
                let d = (m - g.pos).truncate();
                let dist = d.length();
                if dist < MOUSE_RADIUS && dist > 0.0 {
                    let force = (1.0 - dist / MOUSE_RADIUS) * 2.0;
                    let push = d / dist * force * 0.5;
                    g.vel.x -= push.x;
                    g.vel.y -= push.y;
                    g.vel.z += rng.unit() * force * 0.5;
                }
            }

            let d = (bob - g.pos).truncate();
            let dist = d.length();
            if dist < bob_radius {
                let force = 1.0 - dist / bob_radius;
                let a = d.y.atan2(d.x);
                g.vel.x += -a.sin() * force * 0.3 + rng.signed(0.5);
                g.vel.y += a.cos() * force * 0.3 + rng.signed(0.5);
                g.vel.z += force * 0.5;
            }

            g.vel.x += (time * 2.0 + g.pos.y * 0.05).sin() * 0.002;
            g.vel.y += (time * 1.5 + g.pos.x * 0.05).cos() * 0.002;
            g.vel += (g.home - g.pos) * g.spring;
            g.vel *= g.drag;
            g.pos += g.vel;
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(Color::hex(0x050505));
        let (_, world_h) = self.camera.world_viewport(self.vp.aspect());
        let px_per_unit = self.vp.h() / world_h;
        let base = if self.narrow { 1.5 } else { 1.0 };

        let mut shades: Vec<BezPath> = vec![BezPath::new(); SHADES];
        for g in &self.grains {
            let Some((at, persp)) = self.camera.project(g.pos, self.vp) else {
                continue;
            };
            let speed = g.vel.truncate().length();
            let scale = (1.0 - g.pos.z.abs() * 0.05).max(0.1) * base;
            let side = (SHARD * px_per_unit * persp * scale).max(0.75);
            // Tumble sets how much light the flake catches.
            let tumble = speed * 5.0 + self.time;
            let spin = speed * 3.0 + g.phase;
            let light = ((tumble.cos() * spin.cos()).abs() * (SHADES - 1) as f64).round() as usize;
            let rect = Rect::from_center_size(Point::ZERO, (side, side * (0.25 + 0.75 * spin.cos().abs())));
            let tf = Affine::translate(at.to_vec2()) * Affine::rotate(speed * 2.0 + g.phase);
            shades[light.min(SHADES - 1)].extend(tf * rect.to_path(0.1));
        }
        for (i, path) in shades.into_iter().enumerate() {
            if path.elements().is_empty() {
                continue;
            }
            let shade = DARK_GOLD.lerp(BRIGHT_GOLD, i as f64 / (SHADES - 1) as f64);
            painter.fill_path(path, shade);
        }
    }

    fn status(&self) -> Option<String> {
        (self.displaced() > 0.5).then(|| "ERODING".to_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/temporal.rs"]
mod tests;
