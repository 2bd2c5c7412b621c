//! Injectable random source for every probabilistic rule.
//!
//! All randomness in the rules engine (dodge, crit, enemy policy, escape,
//! upgrade rolls) is drawn through [`RandomSource`], which callers pass in
//! explicitly. Production code seeds a [`PcgRng`] from entropy; tests use a
//! fixed seed or script exact draws with [`SequenceRng`].
//!
//! # Determinism
//!
//! Given the same seed a [`PcgRng`] produces the same sequence, so a whole
//! battle or upgrade run can be replayed from `(seed, commands)`.

use core::ops::Range;

/// Seedable uniform random provider.
///
/// Only [`next_u32`](Self::next_u32) is required; every other draw is derived
/// from [`next_float`](Self::next_float) so test doubles can script outcomes
/// by overriding that single method.
pub trait RandomSource {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`.
    fn next_float(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform integer in `range` (end exclusive).
    ///
    /// # Panics
    ///
    /// Panics if `range` is empty.
    fn next_int(&mut self, range: Range<u32>) -> u32 {
        assert!(range.start < range.end, "next_int called with empty range");
        let span = range.end - range.start;
        let offset = (self.next_float() * f64::from(span)) as u32;
        range.start + offset.min(span - 1)
    }

    /// Bernoulli trial: `true` with probability `p`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside `[0, 1]`.
    fn chance(&mut self, p: f64) -> bool {
        assert!(
            (0.0..=1.0).contains(&p),
            "probability must be within [0, 1], got {p}"
        );
        self.next_float() < p
    }

    /// Picks an index with probability proportional to its weight.
    ///
    /// # Panics
    ///
    /// Panics if `weights` is empty or sums to zero.
    fn weighted_choice(&mut self, weights: &[u32]) -> usize {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        assert!(total > 0, "weighted_choice requires a positive total weight");

        let roll = (self.next_float() * total as f64) as u64;
        let mut cumulative = 0u64;
        for (index, &weight) in weights.iter().enumerate() {
            cumulative += u64::from(weight);
            if roll < cumulative {
                return index;
            }
        }
        // Float rounding can land exactly on `total`; fall back to the last
        // non-zero bucket.
        weights.iter().rposition(|&w| w > 0).unwrap_or(0)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_float(&mut self) -> f64 {
        (**self).next_float()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_float(&mut self) -> f64 {
        (**self).next_float()
    }
}

// ============================================================================
// PCG
// ============================================================================

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 64-bit LCG state, 32-bit permuted output.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator whose sequence is fully determined by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            state: Self::pcg_step(seed.wrapping_add(Self::INCREMENT)),
        }
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RandomSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

/// Derives an independent stream seed from a session seed.
///
/// Use a distinct `stream` per consumer (battles, forge rolls, loot) and
/// increment `nonce` for every new battle or roll sequence.
pub fn derive_seed(session_seed: u64, nonce: u64, stream: u32) -> u64 {
    // SplitMix64 / FxHash multipliers
    let mut hash = session_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(stream).wrapping_mul(0x517cc1b727220a95);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

// ============================================================================
// Scripted source
// ============================================================================

/// Deterministic double that replays a fixed list of floats.
///
/// Every derived draw (`chance`, `next_int`, `weighted_choice`) consumes one
/// value, so a test can state exactly which branch each roll takes. The list
/// wraps around when exhausted.
#[derive(Clone, Debug)]
pub struct SequenceRng {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRng {
    /// # Panics
    ///
    /// Panics if `values` is empty or contains a value outside `[0, 1)`.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.into_iter().collect();
        assert!(!values.is_empty(), "SequenceRng needs at least one value");
        assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "SequenceRng values must be within [0, 1)"
        );
        Self { values, cursor: 0 }
    }

    /// Source that returns `value` for every draw.
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }

    /// Number of draws consumed so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_float() * 4_294_967_296.0) as u32
    }

    fn next_float(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
