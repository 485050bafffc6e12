//! Deterministic, stream-separated RNG wrappers.
//!
//! # Determinism strategy
//!
//! Every randomized component draws from its own `SmallRng`, seeded by:
//!
//!   seed = run_seed XOR stream_tag XOR (key * MIXING_CONSTANT)
//!
//! where `stream_tag` separates travel-time noise, heuristic move selection,
//! and demand sampling, and `key` is a stable hash of the vehicle group the
//! draws belong to.  The mixing constant is the 64-bit fractional part of the
//! golden ratio, which spreads consecutive keys uniformly across the seed
//! space.  This means:
//!
//! - Groups never share RNG state (no contention, no ordering dependency).
//! - Planning groups in parallel produces the same per-group draws as a
//!   sequential run.
//! - Changing the heuristic does not perturb the travel-time noise stream, so
//!   sweeps over sequencing strategies compare like with like.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── RngStream ─────────────────────────────────────────────────────────────────

/// Which family of random draws a [`StreamRng`] feeds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RngStream {
    /// Sampled ("actual") travel durations.
    TravelTime,
    /// Tabu move selection and genetic operators.
    Heuristic,
    /// Request generation around centers.
    Demand,
}

impl RngStream {
    #[inline]
    fn tag(self) -> u64 {
        match self {
            RngStream::TravelTime => 0x5452_4156_454c_0001,
            RngStream::Heuristic  => 0x4845_5552_4953_0002,
            RngStream::Demand     => 0x4445_4d41_4e44_0003,
        }
    }
}

/// Fold a sequence of integers into one stable 64-bit key.
///
/// Used to derive a group key from (center, slot, class, vehicle index).
/// Unlike `std::hash`, the result is identical across processes and
/// platforms.
pub fn mix_key(parts: &[u64]) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for &p in parts {
        h ^= p;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
        h ^= h >> 29;
    }
    h
}

// ── StreamRng ─────────────────────────────────────────────────────────────────

/// Seeded RNG owned by exactly one randomized computation.
///
/// Each vehicle group builds its own instance, and
/// nothing draws from process-wide randomness.
#[derive(Clone, Debug)]
pub struct StreamRng(SmallRng);

impl StreamRng {
    /// Seed from the run seed and a stream, with no group key.
    pub fn new(seed: u64, stream: RngStream) -> Self {
        StreamRng(SmallRng::seed_from_u64(seed ^ stream.tag()))
    }

    /// Seed from the run seed, a stream, and a group key.
    pub fn for_key(seed: u64, stream: RngStream, key: u64) -> Self {
        let mixed = seed ^ stream.tag() ^ key.wrapping_mul(MIXING_CONSTANT);
        StreamRng(SmallRng::seed_from_u64(mixed))
    }

    /// Expose the inner `SmallRng` for use with `rand` / `rand_distr`
    /// distribution types (`dist.sample(rng.inner())`).
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Two distinct values drawn uniformly from `range` (which must hold at
    /// least two values), returned in ascending order.
    pub fn distinct_pair(&mut self, range: std::ops::Range<usize>) -> (usize, usize) {
        debug_assert!(range.len() >= 2);
        let a = self.0.gen_range(range.clone());
        let mut b = self.0.gen_range(range.start..range.end - 1);
        if b >= a {
            b += 1;
        }
        if a < b { (a, b) } else { (b, a) }
    }
}
