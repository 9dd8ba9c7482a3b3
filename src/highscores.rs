//! Best score per game
//!
//! In-memory only; lives as long as the process.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::GameId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    best: BTreeMap<GameId, u64>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, game: GameId, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        let best = self.best.entry(game).or_insert(0);
        if score > *best {
            log::info!("New best for {}: {}", game.name(), score);
            *best = score;
            true
        } else {
            false
        }
    }

    pub fn best(&self, game: GameId) -> Option<u64> {
        self.best.get(&game).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    /// Games with a recorded best, in `GameId` order
    pub fn iter(&self) -> impl Iterator<Item = (GameId, u64)> + '_ {
        self.best.iter().map(|(g, s)| (*g, *s))
    }
}
