//! Discrete events reported by the engines
//!
//! Engines never touch the session directly. They emit events and the
//! session turns them into score, lives and phase changes.

use serde::{Deserialize, Serialize};

/// Something that happened during one tick or intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Add points to the session score
    Scored(u32),
    /// A body reflected off a wall, paddle or obstacle
    Bounced,
    /// The player lost a life (session ends when lives reach zero)
    LifeLost,
    /// Fatal collision or boundary exit
    Crashed,
    /// Player reached the win condition
    Won,
    /// Opponent reached the win condition
    Lost,
    /// Board filled with no winner
    Draw,
    /// Session countdown expired
    TimeUp,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    PlayerWon,
    OpponentWon,
    Draw,
    Crashed,
    OutOfLives,
    TimeUp,
}

impl Outcome {
    /// Outcome that a terminal event implies, if any
    pub fn from_event(event: GameEvent) -> Option<Outcome> {
        match event {
            GameEvent::Crashed => Some(Outcome::Crashed),
            GameEvent::Won => Some(Outcome::PlayerWon),
            GameEvent::Lost => Some(Outcome::OpponentWon),
            GameEvent::Draw => Some(Outcome::Draw),
            GameEvent::TimeUp => Some(Outcome::TimeUp),
            GameEvent::Scored(_) | GameEvent::Bounced | GameEvent::LifeLost => None,
        }
    }

    pub fn is_win(self) -> bool {
        self == Outcome::PlayerWon
    }
}
