//! Random source threaded through generation and drawing.
//!
//! Every random draw made while building or painting a frame goes through
//! one [`RandomSource`], in a fixed order. Reseeding that source with the
//! same value reproduces the same tree bit-for-bit.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// A stream of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn float64(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn float64(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Builds the random source for a run.
///
/// A `seed` of `0` means "different every run" and draws the initial state
/// from the operating system; any other value gives a reproducible stream.
pub fn seeded(seed: u64) -> StdRng {
    if seed == 0 {
        StdRng::from_os_rng()
    } else {
        StdRng::seed_from_u64(seed)
    }
}
