//! Random source for board generation and sound cue jitter.
//!
//! Wraps `rand`'s `SmallRng`, which runs fine under WASM. Unseeded games draw
//! entropy through `getrandom` (the browser crypto API on wasm32); a config
//! seed makes boards reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Draws tile orientations for new boards and jitter for rotation cues.
///
/// Seeded for deterministic boards in tests and replays, or created from
/// system entropy for real play.
pub struct WasmRng {
    inner: SmallRng,
}

impl WasmRng {
    /// Create from system entropy (browser crypto.getRandomValues or OS).
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic behavior.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is given, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::new(),
        }
    }

    /// Generate a random usize in [0, max).
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// A uniformly random starting orientation in 0..4.
    #[inline(always)]
    pub fn orientation(&mut self) -> u32 {
        self.inner.random_range(0..4)
    }

    /// Uniform float in [0, max).
    pub fn gen_f64(&mut self, max: f64) -> f64 {
        self.inner.random::<f64>() * max
    }
}

impl Default for WasmRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_deterministic() {
        let mut rng1 = WasmRng::from_seed(42);
        let mut rng2 = WasmRng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(rng1.gen_range(1000), rng2.gen_range(1000));
            assert_eq!(rng1.orientation(), rng2.orientation());
        }
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = WasmRng::from_seed(123);
        for _ in 0..1000 {
            assert!(rng.gen_range(10) < 10);
            assert!(rng.orientation() < 4);
            let f = rng.gen_f64(40.0);
            assert!((0.0..40.0).contains(&f));
        }
    }
}
