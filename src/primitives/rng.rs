//! Randomness providers for field-element sampling.
//!
//! Every engine draws its ephemeral values (polynomial coefficients, nonces,
//! encryption randomness, challenges) through [`RandomSource`], so test and
//! demo builds can swap the operating-system generator for a seeded or fixed
//! one without touching protocol code.

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::rngs::{OsRng, StdRng};
use rand::SeedableRng;

/// Uniform sampler over integer ranges.
pub trait RandomSource: Send {
    /// Draws a value uniformly from `[low, high)`.
    ///
    /// Returns `low` when the range is empty.
    fn sample_range(&mut self, low: &BigUint, high: &BigUint) -> BigUint;

    /// Draws a value uniformly from `[0, bound)`.
    fn sample_below(&mut self, bound: &BigUint) -> BigUint {
        self.sample_range(&BigUint::zero(), bound)
    }

    /// Returns `true` if draws come from a cryptographically secure source.
    fn is_secure(&self) -> bool {
        false
    }
}

/// Cryptographically secure random number generator.
///
/// This is a thin wrapper around `OsRng`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new cryptographically secure random number generator.
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl RandomSource for SecureRng {
    fn sample_range(&mut self, low: &BigUint, high: &BigUint) -> BigUint {
        if low >= high {
            return low.clone();
        }
        self.0.gen_biguint_range(low, high)
    }

    fn is_secure(&self) -> bool {
        true
    }
}

/// Deterministic generator seeded from a `u64`.
///
/// Reproducible across runs; never use outside tests and demos.
#[derive(Clone, Debug)]
pub struct SeededRng(StdRng);

impl SeededRng {
    /// Creates a generator from the given seed.
    pub fn from_seed(seed: u64) -> Self {
        tracing::warn!(seed, "using seeded randomness; output is reproducible");
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRng {
    fn sample_range(&mut self, low: &BigUint, high: &BigUint) -> BigUint {
        if low >= high {
            return low.clone();
        }
        self.0.gen_biguint_range(low, high)
    }
}

/// Replays a fixed list of constants.
///
/// Each draw takes the next constant (cycling) and maps it into the requested
/// range: the constant itself if it already lies in range, otherwise
/// `low + v mod (high - low)`.
#[derive(Clone, Debug)]
pub struct FixedSource {
    values: Vec<BigUint>,
    cursor: usize,
}

impl FixedSource {
    /// Creates a source cycling through `values`.
    ///
    /// An empty list behaves like a single zero.
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<BigUint>,
    {
        let mut values: Vec<BigUint> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            values.push(BigUint::zero());
        }
        tracing::warn!(count = values.len(), "using fixed randomness constants");
        Self { values, cursor: 0 }
    }
}

impl RandomSource for FixedSource {
    fn sample_range(&mut self, low: &BigUint, high: &BigUint) -> BigUint {
        let v = &self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);

        if low >= high {
            return low.clone();
        }
        if v >= low && v < high {
            return v.clone();
        }
        low + v % (high - low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u32) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn secure_rng_stays_in_range() {
        let mut rng = SecureRng::new();
        for _ in 0..200 {
            let v = rng.sample_range(&big(5), &big(9));
            assert!(v >= big(5) && v < big(9));
        }
        assert!(rng.is_secure());
    }

    #[test]
    fn empty_range_returns_low() {
        let mut rng = SecureRng::new();
        assert_eq!(rng.sample_range(&big(7), &big(7)), big(7));
        assert_eq!(rng.sample_range(&big(7), &big(3)), big(7));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = SeededRng::from_seed(42);
        let mut b = SeededRng::from_seed(42);
        for _ in 0..20 {
            assert_eq!(a.sample_below(&big(1000)), b.sample_below(&big(1000)));
        }
        assert!(!a.is_secure());
    }

    #[test]
    fn fixed_source_cycles_and_maps_into_range() {
        let mut src = FixedSource::new([3u32, 2, 17]);
        assert_eq!(src.sample_range(&big(1), &big(22)), big(3));
        assert_eq!(src.sample_range(&big(0), &big(22)), big(2));
        // 17 is outside [1, 5): 1 + 17 mod 4 = 2
        assert_eq!(src.sample_range(&big(1), &big(5)), big(2));
        assert_eq!(src.sample_range(&big(1), &big(22)), big(3));
    }

    #[test]
    fn fixed_source_empty_list_yields_low() {
        let mut src = FixedSource::new(Vec::<u32>::new());
        assert_eq!(src.sample_range(&big(1), &big(10)), big(1));
    }
}
