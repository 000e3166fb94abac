use std::sync::Arc;

use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{KinetypeError, KinetypeResult};
use crate::foundation::math::mul_div255_u8;
use crate::scene::display::{Composite, GradientStop, Paint};

/// Largest gaussian kernel radius evaluated at full resolution.
const MAX_KERNEL_RADIUS: u32 = 48;

/// Integer pixel region, half-open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: width,
            y1: height,
        }
    }

    /// Pixels touched by `rect`, clipped to the surface. `None` when nothing remains.
    pub fn from_rect(rect: Rect, width: u32, height: u32) -> Option<Self> {
        if !(rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite())
        {
            return Some(Self::full(width, height));
        }
        let x0 = rect.x0.floor().max(0.0).min(f64::from(width)) as u32;
        let y0 = rect.y0.floor().max(0.0).min(f64::from(height)) as u32;
        let x1 = rect.x1.ceil().max(0.0).min(f64::from(width)) as u32;
        let y1 = rect.y1.ceil().max(0.0).min(f64::from(height)) as u32;
        (x1 > x0 && y1 > y0).then_some(Self { x0, y0, x1, y1 })
    }

    pub fn width(self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(self) -> u32 {
        self.y1 - self.y0
    }

    pub fn inflate(self, px: u32, width: u32, height: u32) -> Self {
        Self {
            x0: self.x0.saturating_sub(px),
            y0: self.y0.saturating_sub(px),
            x1: self.x1.saturating_add(px).min(width),
            y1: self.y1.saturating_add(px).min(height),
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    fn row_range(self, y: u32, width: u32) -> std::ops::Range<usize> {
        let start = ((y as usize) * (width as usize) + self.x0 as usize) * 4;
        start..start + (self.width() as usize) * 4
    }
}

pub(crate) fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

pub(crate) fn fill_premul(bytes: &mut [u8], rgba: [u8; 4]) {
    for px in bytes.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &crate::foundation::core::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> KinetypeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| KinetypeError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| KinetypeError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(KinetypeError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> KinetypeResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

// --- blur ---

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> KinetypeResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(KinetypeError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(KinetypeError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for (c, a) in acc.iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(*a);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for (c, a) in acc.iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(*a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

/// Pixel radius a blur of `sigma` reaches.
pub(crate) fn blur_reach(sigma: f32) -> u32 {
    (sigma.max(0.0) * 3.0).ceil() as u32
}

/// Gaussian blur of `region` in place.
///
/// Wide blurs run on a 2x/4x box-downsampled copy and are upsampled bilinearly, which keeps the
/// kernel within [`MAX_KERNEL_RADIUS`].
pub(crate) fn blur_region(
    bytes: &mut [u8],
    width: u32,
    region: PixelRect,
    sigma: f32,
) -> KinetypeResult<()> {
    if sigma <= 0.0 || region.width() == 0 || region.height() == 0 {
        return Ok(());
    }
    let factor: u32 = if sigma <= 6.0 {
        1
    } else if sigma <= 12.0 {
        2
    } else {
        4
    };
    let rw = region.width();
    let rh = region.height();
    let mut local = vec![0u8; (rw as usize) * (rh as usize) * 4];
    for y in 0..rh {
        let src = region.row_range(region.y0 + y, width);
        let dst = (y as usize) * (rw as usize) * 4;
        local[dst..dst + (rw as usize) * 4].copy_from_slice(&bytes[src]);
    }

    let sw = rw.div_ceil(factor);
    let sh = rh.div_ceil(factor);
    let mut small = if factor == 1 {
        local.clone()
    } else {
        downsample_box(&local, rw, rh, factor)
    };
    let s_sigma = sigma / factor as f32;
    let radius = blur_reach(s_sigma).min(MAX_KERNEL_RADIUS);
    let kernel = gaussian_kernel_q16(radius, s_sigma)?;
    if kernel.len() > 1 {
        let mut tmp = vec![0u8; small.len()];
        horizontal_blur_q16(&small, &mut tmp, sw, sh, &kernel);
        vertical_blur_q16(&tmp, &mut small, sw, sh, &kernel);
    }
    let blurred = if factor == 1 {
        small
    } else {
        upsample_bilinear(&small, sw, sh, rw, rh, factor)
    };

    for y in 0..rh {
        let dst = region.row_range(region.y0 + y, width);
        let src = (y as usize) * (rw as usize) * 4;
        bytes[dst].copy_from_slice(&blurred[src..src + (rw as usize) * 4]);
    }
    Ok(())
}

fn downsample_box(src: &[u8], w: u32, h: u32, f: u32) -> Vec<u8> {
    let sw = w.div_ceil(f);
    let sh = h.div_ceil(f);
    let mut out = vec![0u8; (sw as usize) * (sh as usize) * 4];
    for sy in 0..sh {
        for sx in 0..sw {
            let mut acc = [0u32; 4];
            let mut n = 0u32;
            for y in (sy * f)..((sy + 1) * f).min(h) {
                for x in (sx * f)..((sx + 1) * f).min(w) {
                    let idx = ((y as usize) * (w as usize) + x as usize) * 4;
                    for (c, a) in acc.iter_mut().enumerate() {
                        *a += u32::from(src[idx + c]);
                    }
                    n += 1;
                }
            }
            let o = ((sy as usize) * (sw as usize) + sx as usize) * 4;
            for (c, a) in acc.iter().enumerate() {
                out[o + c] = ((a + n / 2) / n.max(1)) as u8;
            }
        }
    }
    out
}

fn upsample_bilinear(src: &[u8], sw: u32, sh: u32, w: u32, h: u32, f: u32) -> Vec<u8> {
    let mut out = vec![0u8; (w as usize) * (h as usize) * 4];
    let fetch = |x: i64, y: i64, c: usize| -> f32 {
        let x = x.clamp(0, i64::from(sw) - 1) as usize;
        let y = y.clamp(0, i64::from(sh) - 1) as usize;
        f32::from(src[(y * sw as usize + x) * 4 + c])
    };
    let inv = 1.0 / f as f32;
    for y in 0..h {
        let fy = (y as f32 + 0.5) * inv - 0.5;
        let y0 = fy.floor();
        let ty = fy - y0;
        for x in 0..w {
            let fx = (x as f32 + 0.5) * inv - 0.5;
            let x0 = fx.floor();
            let tx = fx - x0;
            let (xi, yi) = (x0 as i64, y0 as i64);
            let o = ((y as usize) * (w as usize) + x as usize) * 4;
            for c in 0..4 {
                let top = fetch(xi, yi, c) * (1.0 - tx) + fetch(xi + 1, yi, c) * tx;
                let bot = fetch(xi, yi + 1, c) * (1.0 - tx) + fetch(xi + 1, yi + 1, c) * tx;
                out[o + c] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

// --- compositing ---

/// Composite premultiplied `src` onto `dst` inside `region` (both full-surface buffers).
pub(crate) fn composite_region(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    region: PixelRect,
    mode: Composite,
    opacity: f32,
) -> KinetypeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(KinetypeError::render(
            "composite expects equal-length rgba8 buffers",
        ));
    }
    let opacity = opacity.clamp(0.0, 1.0);
    // Blend dispatch happens once per row, never per pixel.
    for y in region.y0..region.y1 {
        let r = region.row_range(y, width);
        let (d, s) = (&mut dst[r.clone()], &src[r]);
        match mode {
            Composite::SourceOver => premul_over_opacity(d, s, opacity),
            Composite::Lighter => lighter(d, s, opacity),
            Composite::Multiply => blend_over(d, s, opacity, |s, d| s * d),
            Composite::Screen => blend_over(d, s, opacity, |s, d| s + d - s * d),
            Composite::DestinationOut => destination_out(d, s, opacity),
            Composite::DestinationIn => destination_in(d, s, opacity),
            Composite::DestinationOver => destination_over(d, s, opacity),
        }
    }
    Ok(())
}

fn opacity_u16(opacity: f32) -> u16 {
    ((opacity * 255.0).round() as i32).clamp(0, 255) as u16
}

pub(crate) fn premul_over_opacity(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = opacity_u16(opacity);
    if op == 0 {
        return;
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);
        d[3] = sa.saturating_add(mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            d[c] = sc.saturating_add(mul_div255_u8(u16::from(d[c]), inv));
        }
    }
}

fn lighter(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = opacity_u16(opacity);
    if op == 0 {
        return;
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        for c in 0..4 {
            d[c] = d[c].saturating_add(mul_div255_u8(u16::from(s[c]), op));
        }
    }
}

fn destination_out(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = opacity_u16(opacity);
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let keep = 255u16 - u16::from(sa);
        for c in d.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), keep);
        }
    }
}

fn destination_in(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = opacity_u16(opacity);
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        // Canvas semantics: opacity scales the source, so it also scales what survives.
        let sa = u16::from(mul_div255_u8(u16::from(s[3]), op));
        for c in d.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), sa);
        }
    }
}

fn destination_over(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = opacity_u16(opacity);
    if op == 0 {
        return;
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let inv = 255u16 - u16::from(d[3]);
        if inv == 0 {
            continue;
        }
        for c in 0..4 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            d[c] = d[c].saturating_add(mul_div255_u8(u16::from(sc), inv));
        }
    }
}

#[inline(always)]
fn blend_over<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    if opacity <= 0.0 {
        return;
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let sa = (f32::from(s[3]) / 255.0) * opacity;
        let da = f32::from(d[3]) / 255.0;
        for c in 0..3 {
            let sp = (f32::from(s[c]) / 255.0) * opacity;
            let dp = f32::from(d[c]) / 255.0;
            let sc = if sa > 0.0 { (sp / sa).clamp(0.0, 1.0) } else { 0.0 };
            let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out = (sp * (1.0 - da) + dp * (1.0 - sa) + b * sa * da).clamp(0.0, 1.0);
            d[c] = (out * 255.0).round() as u8;
        }
        let out_a = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);
        d[3] = (out_a * 255.0).round() as u8;
    }
}

/// Scale `layer` by the alpha of `mask`.
pub(crate) fn mask_apply_alpha(layer: &mut [u8], mask: &[u8]) {
    for (l, m) in layer.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        let w = u16::from(m[3]);
        if w == 255 {
            continue;
        }
        for c in l.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), w);
        }
    }
}

// --- gradients ---

fn sample_stops(stops: &[GradientStop], t: f32) -> [f32; 4] {
    let premul = |s: &GradientStop| {
        let c = s.color;
        [c.r * c.a, c.g * c.a, c.b * c.a, c.a]
    };
    let Some(first) = stops.first() else {
        return [0.0; 4];
    };
    if t <= first.offset {
        return premul(first);
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let k = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            let (pa, pb) = (premul(a), premul(b));
            return std::array::from_fn(|i| pa[i] + (pb[i] - pa[i]) * k);
        }
    }
    stops.last().map(premul).unwrap_or([0.0; 4])
}

/// Evaluate a gradient paint over `region` in device space.
///
/// `inverse` maps device pixels back into the paint's local space. Returns tightly packed
/// premultiplied RGBA8 of `region`'s size, or `None` for solid paints.
pub(crate) fn rasterize_gradient(
    paint: &Paint,
    inverse: Affine,
    region: PixelRect,
) -> Option<Vec<u8>> {
    let mut stops = match paint {
        Paint::Solid(_) => return None,
        Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => stops.clone(),
    };
    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    let param: Box<dyn Fn(Point) -> f64> = match paint {
        Paint::Linear { start, end, .. } => {
            let d = *end - *start;
            let len2 = d.hypot2();
            let start = *start;
            Box::new(move |p: Point| {
                if len2 <= f64::EPSILON {
                    0.0
                } else {
                    (p - start).dot(d) / len2
                }
            })
        }
        Paint::Radial { center, r0, r1, .. } => {
            let (c, r0, r1) = (*center, *r0, *r1);
            Box::new(move |p: Point| {
                let span = r1 - r0;
                if span.abs() <= f64::EPSILON {
                    if (p - c).hypot() <= r1 { 1.0 } else { 0.0 }
                } else {
                    ((p - c).hypot() - r0) / span
                }
            })
        }
        Paint::Solid(_) => return None,
    };

    let (w, h) = (region.width() as usize, region.height() as usize);
    let mut out = vec![0u8; w * h * 4];
    for y in 0..h {
        for x in 0..w {
            let dev = Point::new(
                f64::from(region.x0) + x as f64 + 0.5,
                f64::from(region.y0) + y as f64 + 0.5,
            );
            let t = param(inverse * dev).clamp(0.0, 1.0) as f32;
            let c = sample_stops(&stops, t);
            let o = (y * w + x) * 4;
            for i in 0..4 {
                out[o + i] = (c[i] * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pixel.rs"]
mod tests;
