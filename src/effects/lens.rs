use std::f64::consts::{FRAC_PI_4, TAU};

use kurbo::BezPath;

use crate::effects::{Effect, EffectId, LayoutCtx, Tick};
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Point, Rect, Vec2, Viewport};
use crate::input::pointer::PointerState;
use crate::scene::display::{
    Composite, FontSpec, GradientStop, Paint, PassSpec, StrokeStyle, Target, TextOp,
};
use crate::scene::painter::Painter;

const BLOB_RADIUS: f64 = 160.0;
const POINT_COUNT: usize = 12;
const STIFFNESS: f64 = 0.08;
const DAMPING: f64 = 0.82;
const MAGNIFICATION: f64 = 1.3;
const FRINGE: f64 = 8.0;
const BACKDROP: u8 = 0;
const GLASS: u8 = 1;
const RIM: u8 = 2;

#[derive(Clone, Copy, Debug)]
struct Vertex {
    pos: Point,
    vel: Vec2,
    angle: f64,
}

/// Closed quadratic curve through the midpoints of `points`.
fn blob_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return path;
    };
    path.move_to(last.midpoint(first));
    for (i, &p) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        path.quad_to(p, p.midpoint(next));
    }
    path.close_path();
    path
}

/// A soft glass blob that trails the pointer and magnifies the poster beneath it.
#[derive(Default)]
pub(crate) struct Lens {
    vp: Viewport,
    center: Point,
    target: Point,
    verts: Vec<Vertex>,
}

impl Lens {
    fn outline(&self) -> BezPath {
        let pts: Vec<Point> = self.verts.iter().map(|v| v.pos).collect();
        blob_path(&pts)
    }

    fn draw_backdrop(&self, p: &mut Painter) {
        let (w, h) = (self.vp.w(), self.vp.h());
        let c = self.vp.center();
        p.fill_all(Color::hex(0xf2f2f2));
        let mut grid = BezPath::new();
        let mut x = 0.0;
        while x < w {
            grid.move_to((x, 0.0));
            grid.line_to((x, h));
            x += 60.0;
        }
        p.stroke_path(grid, Color::BLACK.with_alpha(0.03), StrokeStyle::new(1.0));

        let heavy = FontSpec::sans(120.0).bold();
        p.text(
            TextOp::new("LIQUID", c - Vec2::new(0.0, 80.0), heavy)
                .centered()
                .letter_spacing(-5.0)
                .color(Color::BLACK),
        );
        p.text(
            TextOp::new("FORM", c + Vec2::new(0.0, 80.0), heavy)
                .centered()
                .letter_spacing(-5.0)
                .color(Color::BLACK.with_alpha(0.1)),
        );
        let ink = Color::hex(0x111111);
        p.text(
            TextOp::new("THE AESTHETICS OF FLOW", c, FontSpec::serif(24.0))
                .centered()
                .letter_spacing(2.0)
                .color(ink),
        );
        p.stroke_circle(c + Vec2::new(-300.0, -200.0), 40.0, ink, StrokeStyle::new(2.0));
        p.fill_rect(Rect::from_origin_size(c + Vec2::new(280.0, 180.0), (20.0, 20.0)), ink);
    }

    /// Backdrop sampled around the lens centre and spread over the lens box.
    fn magnify(&self, shift: f64) -> Affine {
        let c = self.center;
        Affine::translate(c.to_vec2())
            * Affine::scale(MAGNIFICATION)
            * Affine::translate(-c.to_vec2() - Vec2::new(shift, 0.0))
    }
}

impl Effect for Lens {
    fn id(&self) -> EffectId {
        EffectId::Lens
    }

    fn reset(&mut self, ctx: &mut LayoutCtx<'_>) {
        self.vp = ctx.viewport;
        self.center = self.vp.center();
        self.target = self.center;
        self.verts = (0..POINT_COUNT)
            .map(|i| {
                let angle = TAU * i as f64 / POINT_COUNT as f64;
                Vertex {
                    pos: self.center + Vec2::new(angle.cos(), angle.sin()) * BLOB_RADIUS,
                    vel: Vec2::ZERO,
                    angle,
                }
            })
            .collect();
    }

    fn step(&mut self, tick: &Tick, pointer: &PointerState) {
        if pointer.inside {
            self.target = pointer.pos;
        }
        self.center += (self.target - self.center) * 0.1;
        let time = tick.time * 2.0;
        for (i, v) in self.verts.iter_mut().enumerate() {
            let radius = BLOB_RADIUS + (time + i as f64).sin() * 10.0;
            let ideal = self.center + Vec2::new(v.angle.cos(), v.angle.sin()) * radius;
            v.vel += (ideal - v.pos) * STIFFNESS;
            v.vel *= DAMPING;
            v.pos += v.vel;
        }
    }

    fn draw(&self, painter: &mut Painter) {
        painter.pass(PassSpec::offscreen(BACKDROP).clearing().priming(), |p| {
            self.draw_backdrop(p);
        });

        // Refraction: the magnified backdrop twice, fringed left and right.
        painter.pass(PassSpec::offscreen(GLASS).clearing(), |p| {
            p.fill_all(Color::hex(0xf8f8f8));
        });
        let multiply = PassSpec::offscreen(GLASS).composite(Composite::Multiply);
        painter.pass(multiply, |p| {
            p.image(Target::Offscreen(BACKDROP), self.magnify(-FRINGE), 1.0);
        });
        painter.pass(multiply.opacity(0.8), |p| {
            p.image(Target::Offscreen(BACKDROP), self.magnify(FRINGE), 1.0);
        });

        let outline = self.outline();
        painter.clear(Target::Offscreen(RIM));
        painter.pass(PassSpec::offscreen(RIM), |p| {
            p.glow(10.0, Color::WHITE, |p| {
                p.stroke_path(
                    outline.clone(),
                    Color::WHITE.with_alpha(0.8),
                    StrokeStyle::new(2.0),
                );
            });
        });

        let c = self.center;
        painter.pass(PassSpec::screen().clearing(), |p| {
            p.image(Target::Offscreen(BACKDROP), Affine::IDENTITY, 1.0);
        });
        painter.clip(outline.clone(), Affine::IDENTITY, |p| {
            p.image(Target::Offscreen(GLASS), Affine::IDENTITY, 1.0);
            let shrink = Affine::translate(c.to_vec2())
                * Affine::scale(0.85)
                * Affine::translate(-c.to_vec2());
            p.fill_path_tf(
                outline.clone(),
                Paint::Linear {
                    start: c - Vec2::new(100.0, 100.0),
                    end: c + Vec2::new(50.0, 50.0),
                    stops: vec![
                        GradientStop::new(0.0, Color::WHITE.with_alpha(0.7)),
                        GradientStop::new(0.5, Color::WHITE.with_alpha(0.1)),
                        GradientStop::new(1.0, Color::WHITE.with_alpha(0.0)),
                    ],
                },
                shrink,
            );
            p.stroke_path(outline.clone(), Color::BLACK.with_alpha(0.1), StrokeStyle::new(4.0));
            p.image(Target::Offscreen(RIM), Affine::IDENTITY, 1.0);
        });

        // Wet highlight.
        painter.pass(PassSpec::screen().blur(5.0), |p| {
            let spot = c - Vec2::new(BLOB_RADIUS, BLOB_RADIUS) * 0.4;
            p.fill_ellipse(spot, (40.0, 20.0), FRAC_PI_4, Color::WHITE.with_alpha(0.9));
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/lens.rs"]
mod tests;
