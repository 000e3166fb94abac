use crate::foundation::math::Fnv1a64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded random stream owned by one effect instance.
///
/// Every effect gets its own stream derived from the session seed, the effect label and the
/// restart generation, so replays are bit-for-bit reproducible.
#[derive(Debug, Clone)]
pub struct EffectRng {
    inner: StdRng,
}

impl Default for EffectRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl EffectRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn derive(seed: u64, label: &str, generation: u64) -> Self {
        let mut h = Fnv1a64::new();
        h.write_u64(seed);
        h.write_str(label);
        h.write_u64(generation);
        Self::new(h.finish())
    }

    /// Uniform in `0..1`.
    pub fn unit(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Uniform in `-scale/2..scale/2`.
    pub fn signed(&mut self, scale: f64) -> f64 {
        (self.unit() - 0.5) * scale
    }

    /// Uniform in `lo..hi`; returns `lo` for empty ranges.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.inner.random_range(lo..hi)
    }

    /// Uniform index in `0..n`; `n` must be non-zero.
    pub fn index(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.inner.random_range(0..n)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.index(items.len()))
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    pub fn angle(&mut self) -> f64 {
        self.unit() * std::f64::consts::TAU
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.inner.random_range(0..=i);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
