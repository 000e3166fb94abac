use kurbo::Shape;

use crate::foundation::color::Color;
use crate::foundation::core::{Affine, BezPath, Rect, Viewport};
use crate::foundation::error::{KinetypeError, KinetypeResult};
use crate::render::backend::FrameRGBA;
use crate::render::pixel::{
    PixelRect, affine_to_cpu, bezpath_to_cpu, blur_reach, blur_region, clear_pixmap_to_transparent,
    composite_region, fill_premul, mask_apply_alpha, premul_over_opacity, rasterize_gradient,
    rgba_premul_to_image,
};
use crate::render::surface_pool::{SurfacePool, SurfacePoolOpts};
use crate::scene::display::{
    Composite, DrawOp, LineCap, OFFSCREEN_SLOTS, Paint, Pass, Scene, StrokeStyle, Target,
};
use crate::text::fonts::FontBook;
use crate::text::typeset::{Typesetter, fill_placed};

const STROKE_TOLERANCE: f64 = 0.1;

/// CPU backend powered by `vello_cpu`.
///
/// Owns the persistent effect surfaces: the screen canvas keeps last frame's pixels so
/// translucent fills produce trails, and offscreen slots keep effect-private buffers.
pub struct CpuRenderer {
    viewport: Viewport,
    ctx: Option<vello_cpu::RenderContext>,
    screen: vello_cpu::Pixmap,
    offscreen: Vec<Option<vello_cpu::Pixmap>>,
    overlay: vello_cpu::Pixmap,
    /// Persistent targets that have not been through a frame yet.
    fresh: Vec<Target>,
    pool: SurfacePool,
    typesetter: Box<dyn Typesetter>,
}

fn all_persistent() -> Vec<Target> {
    std::iter::once(Target::Screen)
        .chain((0..OFFSCREEN_SLOTS).map(Target::Offscreen))
        .collect()
}

fn new_pixmap(viewport: Viewport) -> KinetypeResult<vello_cpu::Pixmap> {
    let w: u16 = viewport
        .width
        .try_into()
        .map_err(|_| KinetypeError::render("viewport width exceeds u16"))?;
    let h: u16 = viewport
        .height
        .try_into()
        .map_err(|_| KinetypeError::render("viewport height exceeds u16"))?;
    Ok(vello_cpu::Pixmap::new(w, h))
}

fn is_finite_rect(r: Rect) -> bool {
    r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()
}

fn stroke_outline(path: &BezPath, style: StrokeStyle) -> BezPath {
    let (cap, join) = match style.cap {
        LineCap::Butt => (kurbo::Cap::Butt, kurbo::Join::Miter),
        LineCap::Round => (kurbo::Cap::Round, kurbo::Join::Round),
    };
    let stroke = kurbo::Stroke::new(style.width)
        .with_caps(cap)
        .with_join(join);
    kurbo::stroke(
        path.iter(),
        &stroke,
        &kurbo::StrokeOpts::default(),
        STROKE_TOLERANCE,
    )
}

impl CpuRenderer {
    pub fn new(viewport: Viewport) -> KinetypeResult<Self> {
        Self::with_typesetter(viewport, Box::new(FontBook::empty()))
    }

    pub fn with_typesetter(
        viewport: Viewport,
        typesetter: Box<dyn Typesetter>,
    ) -> KinetypeResult<Self> {
        Ok(Self {
            viewport,
            ctx: None,
            screen: new_pixmap(viewport)?,
            offscreen: (0..OFFSCREEN_SLOTS).map(|_| None).collect(),
            overlay: new_pixmap(viewport)?,
            fresh: all_persistent(),
            pool: SurfacePool::new(SurfacePoolOpts::default()),
            typesetter,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn typesetter_mut(&mut self) -> &mut dyn Typesetter {
        self.typesetter.as_mut()
    }

    /// Reallocate surfaces for a new size. Persistent pixels are lost.
    pub fn resize(&mut self, viewport: Viewport) -> KinetypeResult<()> {
        if viewport == self.viewport {
            return Ok(());
        }
        self.viewport = viewport;
        self.screen = new_pixmap(viewport)?;
        self.overlay = new_pixmap(viewport)?;
        self.offscreen.iter_mut().for_each(|s| *s = None);
        self.fresh = all_persistent();
        self.pool.clear();
        self.ctx = None;
        Ok(())
    }

    /// Clear every persistent surface.
    pub fn reset_surfaces(&mut self) {
        clear_pixmap_to_transparent(&mut self.screen);
        clear_pixmap_to_transparent(&mut self.overlay);
        self.offscreen.iter_mut().for_each(|s| *s = None);
        self.fresh = all_persistent();
    }

    /// Premultiplied bytes of a surface, if it exists.
    pub fn surface_bytes(&self, target: Target) -> Option<&[u8]> {
        self.surface(target).map(|p| p.data_as_u8_slice())
    }

    fn surface(&self, target: Target) -> Option<&vello_cpu::Pixmap> {
        match target {
            Target::Screen => Some(&self.screen),
            Target::Overlay => Some(&self.overlay),
            Target::Offscreen(i) => self.offscreen.get(usize::from(i)).and_then(Option::as_ref),
        }
    }

    fn target_mut(&mut self, target: Target) -> KinetypeResult<&mut vello_cpu::Pixmap> {
        match target {
            Target::Screen => Ok(&mut self.screen),
            Target::Overlay => Ok(&mut self.overlay),
            Target::Offscreen(i) => {
                let viewport = self.viewport;
                let slot = self.offscreen.get_mut(usize::from(i)).ok_or_else(|| {
                    KinetypeError::render(format!("offscreen slot {i} out of range"))
                })?;
                if slot.is_none() {
                    *slot = Some(new_pixmap(viewport)?);
                }
                slot.as_mut()
                    .ok_or_else(|| KinetypeError::render("offscreen slot unavailable"))
            }
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> KinetypeResult<R>,
    ) -> KinetypeResult<R> {
        let width = self.screen.width();
        let height = self.screen.height();
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx);
        self.ctx = Some(ctx);
        out
    }

    /// Execute `scene` against the persistent surfaces and compose the output frame.
    #[tracing::instrument(skip(self, scene), fields(passes = scene.passes.len()))]
    pub fn render(&mut self, scene: &Scene, background: Color) -> KinetypeResult<FrameRGBA> {
        clear_pixmap_to_transparent(&mut self.overlay);
        let fresh = std::mem::take(&mut self.fresh);
        for pass in &scene.passes {
            if pass.spec.prime && !fresh.contains(&pass.spec.target) {
                continue;
            }
            self.run_pass(pass)?;
        }

        let mut frame = FrameRGBA::new(self.viewport.width, self.viewport.height);
        fill_premul(&mut frame.data, background.to_rgba8_premul().to_array());
        premul_over_opacity(&mut frame.data, self.screen.data_as_u8_slice(), 1.0);
        premul_over_opacity(&mut frame.data, self.overlay.data_as_u8_slice(), 1.0);
        Ok(frame)
    }

    fn pass_region(&self, pass: &Pass) -> Option<PixelRect> {
        let (w, h) = (self.viewport.width, self.viewport.height);
        if pass.spec.composite == Composite::DestinationIn {
            // Everything outside the source is erased.
            return Some(PixelRect::full(w, h));
        }
        let mut region: Option<PixelRect> = None;
        for op in &pass.ops {
            let r = match op.bounds() {
                Some(b) if is_finite_rect(b) => PixelRect::from_rect(b, w, h),
                Some(_) => None,
                None => Some(PixelRect::full(w, h)),
            };
            if let Some(r) = r {
                region = Some(region.map_or(r, |acc| acc.union(r)));
            }
        }
        region.map(|r| r.inflate(blur_reach(pass.spec.blur) + 1, w, h))
    }

    fn run_pass(&mut self, pass: &Pass) -> KinetypeResult<()> {
        if pass.spec.clear {
            clear_pixmap_to_transparent(self.target_mut(pass.spec.target)?);
        }
        if pass.ops.is_empty() {
            return Ok(());
        }
        let Some(region) = self.pass_region(pass) else {
            return Ok(());
        };
        let (w, h) = (self.viewport.width, self.viewport.height);

        let mut layer = self.pool.borrow(w, h)?;
        clear_pixmap_to_transparent(&mut layer);
        let rastered = self.with_ctx_mut(|this, ctx| this.raster_ops(ctx, &pass.ops, &mut layer));
        if let Err(e) = rastered {
            self.pool.release(layer);
            return Err(e);
        }
        if pass.spec.blur > 0.0 {
            blur_region(layer.data_as_u8_slice_mut(), w, region, pass.spec.blur)?;
        }
        let target = self.target_mut(pass.spec.target)?;
        composite_region(
            target.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
            w,
            region,
            pass.spec.composite,
            pass.spec.opacity,
        )?;
        self.pool.release(layer);
        Ok(())
    }

    /// Rasterize `ops` source-over into `out`, which must be transparent on entry.
    fn raster_ops(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        ops: &[DrawOp],
        out: &mut vello_cpu::Pixmap,
    ) -> KinetypeResult<()> {
        let (w, h) = (self.viewport.width, self.viewport.height);
        let mut out_empty = true;
        let mut pending = false;
        ctx.reset();
        for op in ops {
            let DrawOp::Clip {
                path,
                transform,
                ops: inner,
            } = op
            else {
                pending |= self.draw_op(ctx, op)?;
                continue;
            };
            if pending {
                self.flush_onto(ctx, out, &mut out_empty)?;
                pending = false;
            }
            if !transform.is_finite() || !is_finite_rect(path.bounding_box()) {
                continue;
            }

            let mut layer = self.pool.borrow(w, h)?;
            clear_pixmap_to_transparent(&mut layer);
            self.raster_ops(ctx, inner, &mut layer)?;

            let mut mask = self.pool.borrow(w, h)?;
            clear_pixmap_to_transparent(&mut mask);
            ctx.reset();
            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_path(&bezpath_to_cpu(path));
            ctx.flush();
            ctx.render_to_pixmap(&mut mask);
            ctx.reset();

            mask_apply_alpha(layer.data_as_u8_slice_mut(), mask.data_as_u8_slice());
            premul_over_opacity(out.data_as_u8_slice_mut(), layer.data_as_u8_slice(), 1.0);
            out_empty = false;
            self.pool.release(layer);
            self.pool.release(mask);
        }
        if pending {
            self.flush_onto(ctx, out, &mut out_empty)?;
        }
        Ok(())
    }

    fn flush_onto(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        out: &mut vello_cpu::Pixmap,
        out_empty: &mut bool,
    ) -> KinetypeResult<()> {
        ctx.flush();
        if *out_empty {
            ctx.render_to_pixmap(out);
        } else {
            let mut tmp = self.pool.borrow(self.viewport.width, self.viewport.height)?;
            clear_pixmap_to_transparent(&mut tmp);
            ctx.render_to_pixmap(&mut tmp);
            premul_over_opacity(out.data_as_u8_slice_mut(), tmp.data_as_u8_slice(), 1.0);
            self.pool.release(tmp);
        }
        ctx.reset();
        *out_empty = false;
        Ok(())
    }

    /// Record one op into `ctx`. Returns whether anything was recorded.
    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
    ) -> KinetypeResult<bool> {
        match op {
            DrawOp::Fill {
                path,
                paint,
                transform,
            } => self.fill_with_paint(ctx, path, paint, *transform),
            DrawOp::Stroke {
                path,
                paint,
                style,
                transform,
            } => {
                if !transform.is_finite() || !is_finite_rect(path.bounding_box()) {
                    return Ok(false);
                }
                let outline = stroke_outline(path, *style);
                self.fill_with_paint(ctx, &outline, paint, *transform)
            }
            DrawOp::Text(t) => {
                if !t.transform.is_finite() || !t.origin.is_finite() || !t.font.size.is_finite() {
                    return Ok(false);
                }
                let Some(placed) = self.typesetter.place(t) else {
                    return Ok(false);
                };
                let [r, g, b, a] = t.color.to_rgba8();
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                fill_placed(ctx, &placed);
                Ok(true)
            }
            DrawOp::Image {
                source,
                transform,
                alpha,
            } => {
                if !transform.is_finite() {
                    return Ok(false);
                }
                let Some(src) = self.surface(*source) else {
                    return Ok(false);
                };
                let (w, h) = (u32::from(src.width()), u32::from(src.height()));
                let image = rgba_premul_to_image(src.data_as_u8_slice(), w, h)?;
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(image);
                let layered = *alpha < 1.0;
                if layered {
                    ctx.push_opacity_layer(*alpha);
                }
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
                if layered {
                    ctx.pop_layer();
                }
                Ok(true)
            }
            // Clips are split out by `raster_ops`.
            DrawOp::Clip { .. } => Ok(false),
        }
    }

    fn fill_with_paint(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        path: &BezPath,
        paint: &Paint,
        transform: Affine,
    ) -> KinetypeResult<bool> {
        let local = path.bounding_box();
        if !transform.is_finite() || !is_finite_rect(local) {
            return Ok(false);
        }
        match paint {
            Paint::Solid(c) => {
                let [r, g, b, a] = c.to_rgba8();
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            }
            Paint::Linear { .. } | Paint::Radial { .. } => {
                if transform.determinant().abs() < 1e-12 {
                    return Ok(false);
                }
                let device = transform.transform_rect_bbox(local);
                let Some(region) =
                    PixelRect::from_rect(device, self.viewport.width, self.viewport.height)
                else {
                    return Ok(false);
                };
                let inverse = transform.inverse();
                let Some(bytes) = rasterize_gradient(paint, inverse, region) else {
                    return Ok(false);
                };
                let image = rgba_premul_to_image(&bytes, region.width(), region.height())?;
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint(image);
                ctx.set_paint_transform(affine_to_cpu(
                    inverse * Affine::translate((f64::from(region.x0), f64::from(region.y0))),
                ));
            }
        }
        ctx.fill_path(&bezpath_to_cpu(path));
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
