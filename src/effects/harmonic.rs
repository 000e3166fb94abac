use std::f64::consts::TAU;

use glam::DVec3;
use kurbo::{BezPath, Circle, Shape};

use crate::effects::projection::Camera;
use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Viewport};
use crate::foundation::rng::EffectRng;
use crate::input::pointer::PointerState;
use crate::scene::display::{Composite, FontSpec, PassSpec, TextOp};
use crate::scene::painter::Painter;

const COUNT: usize = 4000;
const TURNS: f64 = 10.0;
const LENGTH: f64 = 40.0;
const PULL_RADIUS: f64 = 8.0;
const POINT_SIZE: f64 = 0.4;
const FOG_NEAR: f64 = 10.0;
const FOG_FAR: f64 = 50.0;
/// Spiral colour is quantized into this many steps along z.
const HUE_STEPS: usize = 8;
/// Cyan highlight levels per hue step.
const CYAN_STEPS: usize = 3;
const FOG_STEPS: usize = 4;
const BUCKETS: usize = HUE_STEPS * CYAN_STEPS;
const STAR_COUNT: usize = 3000;
const INDIGO: Color = Color::new(0.310, 0.275, 0.898, 1.0);
const PINK: Color = Color::new(0.925, 0.282, 0.600, 1.0);
const CYAN: Color = Color::new(0.133, 0.827, 0.933, 1.0);
const SPACE: Color = Color::new(0.008, 0.008, 0.020, 1.0);

#[derive(Clone, Debug)]
struct Mote {
    angle: f64,
    radius: f64,
    speed: f64,
    base_z: f64,
    phase: f64,
    bucket: usize,
    pos: DVec3,
    size: f64,
    /// Caught by the pointer this step.
    lit: bool,
}

fn bucket_color(bucket: usize) -> Color {
    let (hue, cyan) = (bucket / CYAN_STEPS, bucket % CYAN_STEPS);
    let along = hue as f64 / (HUE_STEPS - 1) as f64;
    let highlight = cyan as f64 / (CYAN_STEPS - 1) as f64 * 0.3;
    INDIGO.lerp(PINK, along).lerp(CYAN, highlight)
}

/// Scene heartbeat: a slow breath with a quicker flutter on top.
fn heartbeat(time: f64) -> f64 {
    (time * 2.0).sin() * 0.1 + (time * 8.0).sin() * 0.05 + 1.0
}

fn fog(distance: f64) -> f64 {
    ((distance - FOG_NEAR) / (FOG_FAR - FOG_NEAR)).clamp(0.0, 1.0)
}

/// A breathing spiral tube of light drifting through deep space.
#[derive(Default)]
pub(crate) struct Harmonic {
    vp: Viewport,
    rng: EffectRng,
    camera: Camera,
    motes: Vec<Mote>,
    stars: Vec<DVec3>,
    narrow: bool,
    time: f64,
}

impl Harmonic {
    fn sway(time: f64) -> Camera {
        let base = Camera::default();
        Camera::at(DVec3::new(
            (time * 0.1).sin() * 2.0,
            (time * 0.15).cos() * 2.0,
            base.position.z,
        ))
    }

    /// Pixels per world unit at the `z = 0` plane.
    fn px_per_unit(&self) -> f64 {
        let (_, world_h) = self.camera.world_viewport(self.vp.aspect());
        self.vp.h() / world_h
    }

    pub(crate) fn excited(&self) -> usize {
        self.motes.iter().filter(|m| m.lit).count()
    }

    fn draw_stars(&self, painter: &mut Painter) {
        let mut dust = BezPath::new();
        for &s in &self.stars {
            if let Some((at, _)) = self.camera.project(s, self.vp) {
                dust.extend(Circle::new(at, 0.6).path_elements(0.1));
            }
        }
        painter.fill_path(dust, Color::WHITE.with_alpha(0.5));
    }

    fn draw_motes(&self, painter: &mut Painter) {
        let unit = self.px_per_unit();
        let point = if self.narrow { 0.3 } else { POINT_SIZE };
        let mut paths: Vec<BezPath> = vec![BezPath::new(); BUCKETS * FOG_STEPS];
        for m in &self.motes {
            let Some((at, persp)) = self.camera.project(m.pos, self.vp) else {
                continue;
            };
            let haze = fog((m.pos - self.camera.position).length());
            if haze >= 1.0 {
                continue;
            }
            let level = ((haze * FOG_STEPS as f64) as usize).min(FOG_STEPS - 1);
            let r = (point * m.size / 1.6 * unit * persp * 0.5).max(0.5);
            paths[m.bucket * FOG_STEPS + level].extend(Circle::new(at, r).path_elements(0.1));
        }
        painter.halo(8.0, |p| {
            for (i, path) in paths.into_iter().enumerate() {
                if path.elements().is_empty() {
                    continue;
                }
                let (bucket, level) = (i / FOG_STEPS, i % FOG_STEPS);
                let clear = 1.0 - (level as f64 + 0.5) / FOG_STEPS as f64;
                p.fill_path(path, bucket_color(bucket).with_alpha(0.8 * clear));
            }
        });
    }

    fn draw_titles(&self, painter: &mut Painter) {
        let unit = self.px_per_unit();
        let t = self.time;
        let (title, subtitle) = if self.narrow { (1.2, 0.5) } else { (2.5, 0.8) };
        let lines = [
            ("Resonance", 1.0, 2.0, 0.1, FontSpec::serif(title), Color::WHITE.with_alpha(0.9), 0.1),
            (
                "THE UNIVERSE BREATHES WITH YOU",
                -1.5,
                3.0,
                0.2,
                FontSpec::sans(subtitle),
                CYAN.with_alpha(0.6),
                0.3,
            ),
        ];
        for (text, y, speed, tilt, font, color, spacing) in lines {
            let drift = (t * speed / 4.0).sin();
            let anchor = DVec3::new(0.0, y + drift / 10.0 * 0.5, 0.0);
            let Some((at, persp)) = self.camera.project(anchor, self.vp) else {
                continue;
            };
            let px = font.size * unit * persp;
            let haze = 1.0 - fog((anchor - self.camera.position).length());
            painter.text(
                TextOp::new(text, at, font.sized(px))
                    .centered()
                    .letter_spacing(px * spacing)
                    .transform(Affine::rotate_about(drift / 20.0 * tilt, at))
                    .color(color.mul_alpha(haze)),
            );
        }
    }
}

impl Effect for Harmonic {
    fn id(&self) -> EffectId {
        EffectId::Harmonic
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        self.vp = ctx.viewport;
        self.camera = Self::sway(0.0);
        let (world_w, _) = Camera::default().world_viewport(self.vp.aspect());
        self.narrow = world_w < 10.0;
        let mut rng = ctx.rng(EffectId::Harmonic);

        self.motes = (0..COUNT)
            .map(|i| {
                let f = i as f64 / COUNT as f64;
                let angle = f * TAU * TURNS;
                let radius = rng.range(3.0, 5.0);
                let base_z = f * LENGTH - LENGTH / 2.0;
                let hue = ((f * (HUE_STEPS - 1) as f64).round() as usize).min(HUE_STEPS - 1);
                let cyan = rng.index(CYAN_STEPS);
                Mote {
                    angle,
                    radius,
                    speed: rng.range(0.02, 0.04),
                    base_z,
                    phase: rng.angle(),
                    bucket: hue * CYAN_STEPS + cyan,
                    pos: DVec3::new(angle.cos() * radius, angle.sin() * radius * 0.5, base_z),
                    size: rng.unit() * 2.0,
                    lit: false,
                }
            })
            .collect();

        self.stars = (0..STAR_COUNT)
            .map(|_| {
                let r = 100.0 + rng.unit() * 50.0;
                let theta = rng.angle();
                let phi = (rng.unit() * 2.0 - 1.0).acos();
                DVec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()) * r
            })
            .collect();
        self.rng = rng;
        self.time = 0.0;
    }

    fn step(&mut self, tick: &Tick, pointer: &PointerState) {
        let time = tick.time;
        self.time = time;
        let beat = heartbeat(time);
        let mouse = pointer
            .inside
            .then(|| Camera::default().pointer_to_world(pointer.pos, self.vp));

        let rng = &mut self.rng;
        for m in &mut self.motes {
            let a = m.angle + time * m.speed;
            let mut x = a.cos() * m.radius * beat;
            let mut y = a.sin() * m.radius * beat + (time + m.phase).sin() * 0.5;
            let z = m.base_z;

            let near = mouse.and_then(|w| {
                let (dx, dy) = (w.x - x, w.y - y);
                let dist = dx.hypot(dy);
                (dist < PULL_RADIUS).then_some((dx, dy, dist))
            });
            m.lit = near.is_some();
            match near {
                Some((dx, dy, dist)) => {
                    let force = 1.0 - dist / PULL_RADIUS;
                    x += dx * force * 0.1;
                    y += dy * force * 0.1;
                    m.size = (rng.unit() * 3.0 + 2.0) * beat;
                }
                None => m.size = ((time * 3.0 + m.phase).sin() + 2.0) * 0.8,
            }
            y += (z * 0.5 + time).sin() * 1.5;
            m.pos = DVec3::new(x, y, z);
        }
        self.camera = Self::sway(time);
    }

    fn draw(&self, painter: &mut Painter) {
        painter.fill_all(SPACE);
        self.draw_stars(painter);
        painter.pass(PassSpec::screen().composite(Composite::Lighter), |p| {
            self.draw_motes(p);
        });
        self.draw_titles(painter);
    }

    fn status(&self) -> Option<String> {
        (self.excited() > 0).then(|| "RESONATING".to_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/harmonic.rs"]
mod tests;
