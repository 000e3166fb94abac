use crate::foundation::color::Color;
use crate::foundation::core::{Affine, BezPath, Point, Rect, Viewport};
use crate::scene::display::{
    DrawOp, Pass, PassSpec, Paint, Scene, StrokeStyle, Target, TextOp,
};
use kurbo::{Circle, Ellipse, Line, Shape};

const PATH_TOLERANCE: f64 = 0.1;

/// Immediate-mode recorder that builds a [`Scene`].
///
/// Consecutive ops with the same [`PassSpec`] share a pass, so per-glyph drawing does not
/// multiply offscreen work in the renderer.
pub struct Painter {
    viewport: Viewport,
    spec: PassSpec,
    transform: Affine,
    passes: Vec<Pass>,
    recording: Vec<Vec<DrawOp>>,
}

impl Painter {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            spec: PassSpec::screen(),
            transform: Affine::IDENTITY,
            passes: Vec::new(),
            recording: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn spec(&self) -> PassSpec {
        self.spec
    }

    /// Start a fresh pass; following ops land on `spec`.
    pub fn begin(&mut self, spec: PassSpec) {
        self.spec = spec;
        self.passes.push(Pass {
            spec,
            ops: Vec::new(),
        });
    }

    /// Run `f` inside a pass, restoring the previous spec afterwards.
    pub fn pass(&mut self, spec: PassSpec, f: impl FnOnce(&mut Painter)) {
        let prev = self.spec;
        self.begin(spec);
        f(self);
        self.spec = prev;
    }

    /// Clear a persistent target to transparent.
    pub fn clear(&mut self, target: Target) {
        self.passes.push(Pass {
            spec: PassSpec::new(target, Default::default()).clearing(),
            ops: Vec::new(),
        });
    }

    /// Compose `tf` onto the current transform for the duration of `f`.
    pub fn with_transform(&mut self, tf: Affine, f: impl FnOnce(&mut Painter)) {
        let prev = self.transform;
        self.transform = prev * tf;
        f(self);
        self.transform = prev;
    }

    pub fn push(&mut self, op: DrawOp) {
        if let Some(rec) = self.recording.last_mut() {
            rec.push(op);
            return;
        }
        match self.passes.last_mut() {
            Some(last) if last.spec == self.spec => last.ops.push(op),
            _ => self.passes.push(Pass {
                spec: self.spec,
                ops: vec![op],
            }),
        }
    }

    pub fn fill_path(&mut self, path: BezPath, paint: impl Into<Paint>) {
        self.fill_path_tf(path, paint, Affine::IDENTITY);
    }

    pub fn fill_path_tf(&mut self, path: BezPath, paint: impl Into<Paint>, tf: Affine) {
        let paint = paint.into();
        if paint.is_invisible() {
            return;
        }
        let transform = self.transform * tf;
        self.push(DrawOp::Fill {
            path,
            paint,
            transform,
        });
    }

    pub fn fill_rect(&mut self, rect: Rect, paint: impl Into<Paint>) {
        self.fill_path(rect.to_path(PATH_TOLERANCE), paint);
    }

    /// Fill the whole viewport.
    pub fn fill_all(&mut self, paint: impl Into<Paint>) {
        let rect = self.viewport.rect();
        let prev = self.transform;
        self.transform = Affine::IDENTITY;
        self.fill_rect(rect, paint);
        self.transform = prev;
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, paint: impl Into<Paint>) {
        if radius <= 0.0 || !radius.is_finite() {
            return;
        }
        self.fill_path(Circle::new(center, radius).to_path(PATH_TOLERANCE), paint);
    }

    pub fn fill_ellipse(
        &mut self,
        center: Point,
        radii: (f64, f64),
        rotation: f64,
        paint: impl Into<Paint>,
    ) {
        let e = Ellipse::new(center, radii, rotation);
        self.fill_path(e.to_path(PATH_TOLERANCE), paint);
    }

    pub fn stroke_path(&mut self, path: BezPath, paint: impl Into<Paint>, style: StrokeStyle) {
        self.stroke_path_tf(path, paint, style, Affine::IDENTITY);
    }

    pub fn stroke_path_tf(
        &mut self,
        path: BezPath,
        paint: impl Into<Paint>,
        style: StrokeStyle,
        tf: Affine,
    ) {
        let paint = paint.into();
        if paint.is_invisible() || style.width <= 0.0 {
            return;
        }
        let transform = self.transform * tf;
        self.push(DrawOp::Stroke {
            path,
            paint,
            style,
            transform,
        });
    }

    pub fn stroke_line(&mut self, a: Point, b: Point, paint: impl Into<Paint>, style: StrokeStyle) {
        self.stroke_path(Line::new(a, b).to_path(PATH_TOLERANCE), paint, style);
    }

    pub fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        paint: impl Into<Paint>,
        style: StrokeStyle,
    ) {
        if radius <= 0.0 || !radius.is_finite() {
            return;
        }
        self.stroke_path(Circle::new(center, radius).to_path(PATH_TOLERANCE), paint, style);
    }

    pub fn stroke_rect(&mut self, rect: Rect, paint: impl Into<Paint>, style: StrokeStyle) {
        self.stroke_path(rect.to_path(PATH_TOLERANCE), paint, style);
    }

    pub fn text(&mut self, op: TextOp) {
        if op.text.is_empty() || op.color.is_invisible() || op.font.size <= 0.0 {
            return;
        }
        let transform = self.transform * op.transform;
        self.push(DrawOp::Text(TextOp { transform, ..op }));
    }

    /// Draw a persistent surface through `tf`.
    pub fn image(&mut self, source: Target, tf: Affine, alpha: f64) {
        if alpha <= 0.0 {
            return;
        }
        let transform = self.transform * tf;
        self.push(DrawOp::Image {
            source,
            transform,
            alpha: alpha.min(1.0) as f32,
        });
    }

    /// Ops recorded by `f` are masked by `path`.
    pub fn clip(&mut self, path: BezPath, tf: Affine, f: impl FnOnce(&mut Painter)) {
        let transform = self.transform * tf;
        let ops = self.record(f);
        if ops.is_empty() {
            return;
        }
        self.push(DrawOp::Clip {
            path,
            transform,
            ops,
        });
    }

    /// Canvas-style shadow: a blurred copy tinted `color` under the ops of `f`.
    ///
    /// `blur` follows `shadowBlur`, so the gaussian sigma is half of it. Inside a clip the
    /// halo is dropped and only the sharp ops are drawn.
    pub fn glow(&mut self, blur: f64, color: Color, f: impl FnOnce(&mut Painter)) {
        let ops = self.record(f);
        if blur > 0.0 && !color.is_invisible() && self.recording.is_empty() {
            let halo: Vec<DrawOp> = ops.iter().map(|o| o.tinted(color)).collect();
            self.passes.push(Pass {
                spec: self.spec.blur(blur * 0.5),
                ops: halo,
            });
        }
        for op in ops {
            self.push(op);
        }
    }

    /// Glow where every op is haloed in its own colour (`shadowColor == fillStyle`).
    pub fn halo(&mut self, blur: f64, f: impl FnOnce(&mut Painter)) {
        let ops = self.record(f);
        if blur > 0.0 && self.recording.is_empty() {
            self.passes.push(Pass {
                spec: self.spec.blur(blur * 0.5),
                ops: ops.clone(),
            });
        }
        for op in ops {
            self.push(op);
        }
    }

    /// Text with a canvas-style glow.
    pub fn glow_text(&mut self, op: TextOp, blur: f64, color: Color) {
        self.glow(blur, color, |p| p.text(op));
    }

    fn record(&mut self, f: impl FnOnce(&mut Painter)) -> Vec<DrawOp> {
        self.recording.push(Vec::new());
        f(self);
        self.recording.pop().unwrap_or_default()
    }

    pub fn finish(self) -> Scene {
        Scene {
            passes: self
                .passes
                .into_iter()
                .filter(|p| p.spec.clear || !p.ops.is_empty())
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/painter.rs"]
mod tests;
