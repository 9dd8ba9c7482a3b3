//! Number guess: find a hidden number from high/low hints

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use crate::policy::Tuned;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuessConfig {
    pub min: u32,
    pub max: u32,
    /// Distance from the target that still counts as correct
    pub tolerance: Tuned<u32>,
    /// Points for a first-try hit; every extra attempt costs one (floor 1)
    pub par_points: u32,
}

impl Default for GuessConfig {
    fn default() -> Self {
        Self {
            min: 1,
            max: 100,
            tolerance: Tuned::new(0, 10),
            par_points: 10,
        }
    }
}

impl GuessConfig {
    /// Accepted guesses; never empty
    pub fn range(&self) -> RangeInclusive<u32> {
        self.min..=self.max.max(self.min)
    }
}

/// Reply to one guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hint {
    High,
    Low,
    Correct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessState {
    pub target: u32,
    /// Every accepted guess with its reply, oldest first
    pub attempts: Vec<(u32, Hint)>,
}

impl GuessState {
    pub fn new(config: &GuessConfig, rng: &mut impl Rng) -> Self {
        Self {
            target: rng.random_range(config.range()),
            attempts: Vec::new(),
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.attempts.last(), Some((_, Hint::Correct)))
    }

    pub fn hint(&self, value: u32, config: &GuessConfig, privileged: bool) -> Hint {
        if value.abs_diff(self.target) <= config.tolerance.pick(privileged) {
            Hint::Correct
        } else if value > self.target {
            Hint::High
        } else {
            Hint::Low
        }
    }

    /// Apply a guess. Out-of-range guesses, and guesses after the number was
    /// found, are ignored (`None`).
    pub fn guess(&mut self, value: u32, config: &GuessConfig, privileged: bool) -> Option<Vec<GameEvent>> {
        if !config.range().contains(&value) {
            log::debug!("Guess {} outside {:?}", value, config.range());
            return None;
        }
        if self.is_solved() {
            return None;
        }
        let hint = self.hint(value, config, privileged);
        self.attempts.push((value, hint));
        if hint != Hint::Correct {
            return Some(Vec::new());
        }
        let misses = u32::try_from(self.attempts.len() - 1).unwrap_or(u32::MAX);
        let points = config.par_points.saturating_sub(misses).max(1);
        Some(vec![GameEvent::Scored(points), GameEvent::Won])
    }
}
