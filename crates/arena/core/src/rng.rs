//! Random sources for the simulation.
//!
//! Every random draw in a battle (critical/dodge/block rolls, random
//! targeting, spawn jitter) comes from one per-session [`RandomSource`]. The
//! source is passed in explicitly, so a session is reproducible from its seed
//! and tests can script exact outcomes.
//!
//! # Determinism
//!
//! [`SessionRng`] wraps a seeded `StdRng`: the same seed yields the same
//! stream for the same build of this crate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws used by the engine.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Bernoulli trial: succeeds when the draw is strictly below `probability`.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index requires a non-empty range");
        ((self.next_unit() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Seeded per-session stream.
#[derive(Clone, Debug)]
pub struct SessionRng {
    seed: u64,
    rng: StdRng,
}

impl SessionRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a fresh seed from OS entropy. The seed stays readable through
    /// [`SessionRng::seed`] so the battle can be replayed later.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SessionRng {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Lets callers pin roll outcomes: a draw of `0.0` makes every non-zero
/// chance succeed, a draw of `0.99` makes almost every chance fail.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        let mut draws = draws.into();
        if draws.is_empty() {
            draws.push(0.5);
        }
        for draw in &mut draws {
            *draw = draw.clamp(0.0, 1.0 - f64::EPSILON);
        }
        Self { draws, cursor: 0 }
    }

    /// Source that returns `value` forever.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw
    }
}
