//! Seeded random source shared by selection and layout

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random selector for reproducible stochastic choices
///
/// Every random decision of a run flows through one selector, so a fixed seed
/// reproduces the same editions as long as draws happen in the same order.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform sample in `[min, max)`
    pub fn between(&mut self, min: f64, max: f64) -> f64 {
        self.unit().mul_add(max - min, min)
    }

    /// Uniform sample in `[-span / 2, span / 2)`
    pub fn centered(&mut self, span: f64) -> f64 {
        (self.unit() - 0.5) * span
    }

    /// Uniform index below `len`, `None` when `len` is zero
    pub fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| ((self.unit() * len as f64) as usize).min(len - 1))
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Cumulative weighted selection
    ///
    /// Draws `U * total` and subtracts weights in order until the remainder
    /// goes negative. Returns `None` for an empty slice or a total weight that
    /// is not positive. Negative and non-finite weights count as zero.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let sanitized = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let total: f64 = weights.iter().copied().map(sanitized).sum();
        if total <= 0.0 || !total.is_finite() {
            return None;
        }

        let mut remainder = self.unit() * total;
        for (i, &weight) in weights.iter().enumerate() {
            remainder -= sanitized(weight);
            if remainder < 0.0 {
                return Some(i);
            }
        }

        // Rounding left a sliver; settle on the last selectable candidate
        weights.iter().rposition(|&w| sanitized(w) > 0.0)
    }
}
