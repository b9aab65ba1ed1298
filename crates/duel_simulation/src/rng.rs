//! Random sources for reaction rolls.
//!
//! Dodge-chance checks draw from a `ReactionRng` resource so tests can swap the
//! seeded ChaCha stream for a scripted sequence.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Uniform draw в `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&mut self) -> f32;
}

/// Детерминистичный RNG (seeded ChaCha8)
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl RandomSource for DeterministicRng {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Fixed sequence of draws. Once exhausted the last value repeats.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<f32>,
    last: f32,
    draws: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            last: 0.0,
            draws: 0,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new([value])
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        self.draws += 1;
        if let Some(value) = self.values.pop_front() {
            self.last = value;
        }
        self.last
    }
}

/// Resource: random source for dodge-chance rolls.
#[derive(Resource)]
pub struct ReactionRng {
    source: Box<dyn RandomSource>,
    draws: u64,
}

impl ReactionRng {
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            draws: 0,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(DeterministicRng::new(seed))
    }

    pub fn scripted(values: impl IntoIterator<Item = f32>) -> Self {
        Self::new(ScriptedRandom::new(values))
    }

    /// Total number of draws since creation (used by tests).
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for ReactionRng {
    fn next_unit(&mut self) -> f32 {
        self.draws += 1;
        self.source.next_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_rng_same_seed() {
        let mut a = DeterministicRng::new(7);
        let mut b = DeterministicRng::new(7);
        for _ in 0..32 {
            let x = a.next_unit();
            assert_eq!(x, b.next_unit());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_scripted_random_repeats_last() {
        let mut rng = ScriptedRandom::new([0.1, 0.9]);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.next_unit(), 0.9);
        assert_eq!(rng.next_unit(), 0.9);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_reaction_rng_counts_draws() {
        let mut rng = ReactionRng::scripted([0.5]);
        rng.next_unit();
        rng.next_unit();
        assert_eq!(rng.draws(), 2);
    }
}
