//! # random.rs
//!
//! Defines the random source that decides combats.
//!
//! The source is always handed to a game by its owner. Any `rand` generator
//! works as one, and `ScriptedRolls` replays a fixed sequence for tests.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::collections::VecDeque;

use crate::constants::*;

pub trait RandomSource {
    /// A uniform value in `[0, 1)`.
    fn roll(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn roll(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Generator seeded with `seed`, or with the engine's fixed seed if `None`.
pub fn seeded(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or(RNG_SEED))
}

/// Replays its rolls in order, starting over after the last one.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    rolls: VecDeque<f64>,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        let rolls: VecDeque<f64> = rolls.into_iter().collect();
        assert!(!rolls.is_empty(), "A roll script needs at least one roll");

        ScriptedRolls { rolls }
    }
}

impl RandomSource for ScriptedRolls {
    fn roll(&mut self) -> f64 {
        let roll = self.rolls[0];
        self.rolls.rotate_left(1);
        roll
    }
}
