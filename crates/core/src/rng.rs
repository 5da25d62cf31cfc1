//! Seeded pseudo-random streams and stateless named rolls.

use std::fmt::Display;

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

const NAMED_ROLL_DOMAIN: u64 = 0x5EC7_0A11_D1CE_0001;
const UNIT_SCALE: f64 = 1.0 / (1_u64 << 53) as f64;

/// Stable 64-bit seed for an arbitrary string.
pub fn string_to_seed(text: &str) -> u64 {
    xxh3_64(text.as_bytes())
}

/// Stateless roll in `[0, 1)` keyed by a descriptive string.
///
/// Two calls with the same key always agree, regardless of how many other
/// rolls happened in between.
pub fn hash_to_unit(key: &str) -> f64 {
    unit_from_bits(xxh3_64_with_seed(key.as_bytes(), NAMED_ROLL_DOMAIN))
}

fn unit_from_bits(bits: u64) -> f64 {
    (bits >> 11) as f64 * UNIT_SCALE
}

/// Maps a `[0, 1)` roll onto an index below `len`. `len` must be non-zero.
pub fn index_for_roll(roll: f64, len: usize) -> usize {
    debug_assert!(len > 0);
    ((roll * len as f64) as usize).min(len.saturating_sub(1))
}

/// Isolated pseudo-random stream. Two instances built from the same seed yield
/// identical sequences.
#[derive(Clone, Debug)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_key(key: &str) -> Self {
        Self::new(string_to_seed(key))
    }

    pub fn next_f64(&mut self) -> f64 {
        unit_from_bits(self.inner.next_u64())
    }

    pub fn below(&mut self, len: usize) -> usize {
        index_for_roll(self.next_f64(), len)
    }

    /// Uniform integer in `min..=max`.
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        let span = u64::from(max - min) + 1;
        min + (self.next_f64() * span as f64) as u32
    }

    /// Fisher-Yates from the back, one draw per swap.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

/// Builds named-roll keys that share a common prefix, e.g. `"<base>:binary"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollKey {
    base: String,
}

impl RollKey {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn child(&self, part: impl Display) -> Self {
        Self { base: format!("{}:{part}", self.base) }
    }

    pub fn roll(&self, part: &str) -> f64 {
        hash_to_unit(&format!("{}:{part}", self.base))
    }

    pub fn value(&self) -> f64 {
        hash_to_unit(&self.base)
    }
}
