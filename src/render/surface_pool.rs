use std::collections::HashMap;

use crate::foundation::error::{KinetypeError, KinetypeResult};

/// Pool limits for scratch pixmaps.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SurfacePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub(crate) max_pool_bytes: usize,
    /// Maximum number of retained pixmaps per size.
    pub(crate) max_surfaces_per_bucket: usize,
}

impl Default for SurfacePoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            max_surfaces_per_bucket: 6,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct SurfacePoolStats {
    pub(crate) retained_surfaces: usize,
    pub(crate) retained_bytes: usize,
    pub(crate) alloc_surfaces: u64,
    pub(crate) dropped_on_release: u64,
}

fn byte_len(w: u16, h: u16) -> usize {
    usize::from(w)
        .saturating_mul(usize::from(h))
        .saturating_mul(4)
}

/// Bounded reuse of scratch pixmaps between passes and frames.
///
/// Borrowed pixmaps carry stale pixels; callers clear what they need.
pub(crate) struct SurfacePool {
    opts: SurfacePoolOpts,
    stats: SurfacePoolStats,
    buckets: HashMap<(u16, u16), Vec<vello_cpu::Pixmap>>,
}

impl SurfacePool {
    pub(crate) fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            opts,
            stats: SurfacePoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    pub(crate) fn stats(&self) -> SurfacePoolStats {
        self.stats.clone()
    }

    pub(crate) fn borrow(&mut self, width: u32, height: u32) -> KinetypeResult<vello_cpu::Pixmap> {
        let w: u16 = width
            .try_into()
            .map_err(|_| KinetypeError::render(format!("surface width exceeds u16: {width}")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| KinetypeError::render(format!("surface height exceeds u16: {height}")))?;
        if let Some(p) = self.buckets.get_mut(&(w, h)).and_then(Vec::pop) {
            self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(byte_len(w, h));
            return Ok(p);
        }
        self.stats.alloc_surfaces = self.stats.alloc_surfaces.saturating_add(1);
        Ok(vello_cpu::Pixmap::new(w, h))
    }

    pub(crate) fn release(&mut self, pixmap: vello_cpu::Pixmap) {
        let key = (pixmap.width(), pixmap.height());
        let bytes = byte_len(key.0, key.1);
        if self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        let bucket = self.buckets.entry(key).or_default();
        if bucket.len() >= self.opts.max_surfaces_per_bucket {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        bucket.push(pixmap);
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }

    /// Drop every retained pixmap, e.g. after a resize.
    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
        self.stats.retained_surfaces = 0;
        self.stats.retained_bytes = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface_pool.rs"]
mod tests;
