use crate::foundation::color::Color;
use crate::foundation::core::{Affine, BezPath, Point, Rect};
use kurbo::Shape;

/// Surface a pass draws into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// The persistent effect canvas. Survives between frames, so trails accumulate.
    Screen,
    /// A persistent per-effect buffer (`0..OFFSCREEN_SLOTS`).
    Offscreen(u8),
    /// Drawn on the output frame only; never persisted.
    Overlay,
}

/// Number of persistent offscreen slots available to an effect.
pub const OFFSCREEN_SLOTS: u8 = 4;

/// Porter-Duff / separable blend used when a pass lands on its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Composite {
    #[default]
    SourceOver,
    Lighter,
    Multiply,
    Screen,
    DestinationOut,
    DestinationIn,
    DestinationOver,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f64, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0) as f32,
            color,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    Radial {
        center: Point,
        r0: f64,
        r1: f64,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    pub fn is_invisible(&self) -> bool {
        match self {
            Paint::Solid(c) => c.is_invisible(),
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => {
                stops.iter().all(|s| s.color.is_invisible())
            }
        }
    }

    /// Replace every colour with `tint`, keeping each stop's alpha.
    pub fn tinted(&self, tint: Color) -> Paint {
        let retint = |c: Color| tint.with_alpha(f64::from(c.a) * f64::from(tint.a));
        match self {
            Paint::Solid(c) => Paint::Solid(retint(*c)),
            Paint::Linear { start, end, stops } => Paint::Linear {
                start: *start,
                end: *end,
                stops: stops
                    .iter()
                    .map(|s| GradientStop {
                        offset: s.offset,
                        color: retint(s.color),
                    })
                    .collect(),
            },
            Paint::Radial {
                center,
                r0,
                r1,
                stops,
            } => Paint::Radial {
                center: *center,
                r0: *r0,
                r1: *r1,
                stops: stops
                    .iter()
                    .map(|s| GradientStop {
                        offset: s.offset,
                        color: retint(s.color),
                    })
                    .collect(),
            },
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub cap: LineCap,
}

impl StrokeStyle {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            cap: LineCap::Butt,
        }
    }

    pub fn round(width: f64) -> Self {
        Self {
            width,
            cap: LineCap::Round,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFamily {
    #[default]
    Serif,
    Sans,
    Mono,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn serif(size: f64) -> Self {
        Self {
            family: FontFamily::Serif,
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn sans(size: f64) -> Self {
        Self {
            family: FontFamily::Sans,
            ..Self::serif(size)
        }
    }

    pub fn mono(size: f64) -> Self {
        Self {
            family: FontFamily::Mono,
            ..Self::serif(size)
        }
    }

    pub fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    pub fn sized(self, size: f64) -> Self {
        Self { size, ..self }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Baseline {
    #[default]
    Alphabetic,
    Middle,
    Top,
}

/// One line of text placed at `origin` in the op's local space.
#[derive(Clone, Debug, PartialEq)]
pub struct TextOp {
    pub text: String,
    pub origin: Point,
    pub font: FontSpec,
    pub align: TextAlign,
    pub baseline: Baseline,
    pub color: Color,
    pub transform: Affine,
    pub letter_spacing: f64,
}

impl TextOp {
    pub fn new(text: impl Into<String>, origin: Point, font: FontSpec) -> Self {
        Self {
            text: text.into(),
            origin,
            font,
            align: TextAlign::Left,
            baseline: Baseline::Alphabetic,
            color: Color::BLACK,
            transform: Affine::IDENTITY,
            letter_spacing: 0.0,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn centered(self) -> Self {
        self.align(TextAlign::Center).baseline(Baseline::Middle)
    }

    pub fn transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn letter_spacing(mut self, spacing: f64) -> Self {
        self.letter_spacing = spacing;
        self
    }

    /// Loose device-space bounds; glyph metrics are not known here.
    pub fn approx_bounds(&self) -> Rect {
        let size = self.font.size.abs();
        let n = self.text.chars().count() as f64;
        let w = n * (size * 0.75 + self.letter_spacing.abs());
        let local = Rect::new(
            self.origin.x - w,
            self.origin.y - size * 1.5,
            self.origin.x + w,
            self.origin.y + size * 1.5,
        );
        self.transform.transform_rect_bbox(local)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Fill {
        path: BezPath,
        paint: Paint,
        transform: Affine,
    },
    Stroke {
        path: BezPath,
        paint: Paint,
        style: StrokeStyle,
        transform: Affine,
    },
    Text(TextOp),
    /// Draws a whole persistent surface through `transform`.
    Image {
        source: Target,
        transform: Affine,
        alpha: f32,
    },
    /// Ops masked by `path` (in `transform` space).
    Clip {
        path: BezPath,
        transform: Affine,
        ops: Vec<DrawOp>,
    },
}

impl DrawOp {
    /// Conservative device-space bounds, or `None` when the op may cover everything.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            DrawOp::Fill {
                path, transform, ..
            } => Some(transform.transform_rect_bbox(path.bounding_box())),
            DrawOp::Stroke {
                path,
                style,
                transform,
                ..
            } => {
                let b = transform.transform_rect_bbox(path.bounding_box());
                let scale = transform.as_coeffs()[0]
                    .abs()
                    .max(transform.as_coeffs()[3].abs())
                    .max(1.0);
                Some(b.inflate(style.width * scale, style.width * scale))
            }
            DrawOp::Text(t) => Some(t.approx_bounds()),
            DrawOp::Image { .. } => None,
            DrawOp::Clip {
                path, transform, ..
            } => Some(transform.transform_rect_bbox(path.bounding_box())),
        }
    }

    /// Recolour for shadow/glow halos.
    pub fn tinted(&self, tint: Color) -> DrawOp {
        match self {
            DrawOp::Fill {
                path,
                paint,
                transform,
            } => DrawOp::Fill {
                path: path.clone(),
                paint: paint.tinted(tint),
                transform: *transform,
            },
            DrawOp::Stroke {
                path,
                paint,
                style,
                transform,
            } => DrawOp::Stroke {
                path: path.clone(),
                paint: paint.tinted(tint),
                style: *style,
                transform: *transform,
            },
            DrawOp::Text(t) => DrawOp::Text(TextOp {
                color: tint.with_alpha(f64::from(t.color.a) * f64::from(tint.a)),
                ..t.clone()
            }),
            DrawOp::Image { .. } => self.clone(),
            DrawOp::Clip {
                path,
                transform,
                ops,
            } => DrawOp::Clip {
                path: path.clone(),
                transform: *transform,
                ops: ops.iter().map(|o| o.tinted(tint)).collect(),
            },
        }
    }
}

/// How a pass lands on its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassSpec {
    pub target: Target,
    pub composite: Composite,
    pub opacity: f32,
    /// Gaussian sigma in pixels applied to the pass before compositing.
    pub blur: f32,
    /// Clear the target to transparent before compositing.
    pub clear: bool,
    /// Run only while the target is fresh, i.e. on the first frame after its persistent
    /// pixels were (re)allocated. Used to build static layers once.
    pub prime: bool,
}

impl PassSpec {
    pub fn new(target: Target, composite: Composite) -> Self {
        Self {
            target,
            composite,
            opacity: 1.0,
            blur: 0.0,
            clear: false,
            prime: false,
        }
    }

    pub fn screen() -> Self {
        Self::new(Target::Screen, Composite::SourceOver)
    }

    pub fn overlay() -> Self {
        Self::new(Target::Overlay, Composite::SourceOver)
    }

    pub fn offscreen(slot: u8) -> Self {
        Self::new(Target::Offscreen(slot), Composite::SourceOver)
    }

    pub fn composite(self, composite: Composite) -> Self {
        Self { composite, ..self }
    }

    pub fn opacity(self, opacity: f64) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0) as f32,
            ..self
        }
    }

    pub fn blur(self, sigma: f64) -> Self {
        Self {
            blur: sigma.max(0.0) as f32,
            ..self
        }
    }

    pub fn clearing(self) -> Self {
        Self {
            clear: true,
            ..self
        }
    }

    pub fn priming(self) -> Self {
        Self {
            prime: true,
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pass {
    pub spec: PassSpec,
    pub ops: Vec<DrawOp>,
}

/// A frame's worth of drawing, in submission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub passes: Vec<Pass>,
}

impl Scene {
    pub fn op_count(&self) -> usize {
        self.passes.iter().map(|p| p.ops.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.iter().all(|p| p.ops.is_empty() && !p.spec.clear)
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        fn walk<'a>(ops: &'a [DrawOp], out: &mut Vec<&'a TextOp>) {
            for op in ops {
                match op {
                    DrawOp::Text(t) => out.push(t),
                    DrawOp::Clip { ops, .. } => walk(ops, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        for p in &self.passes {
            walk(&p.ops, &mut out);
        }
        out.into_iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/display.rs"]
mod tests;
