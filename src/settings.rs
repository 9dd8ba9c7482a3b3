//! Engine settings and per-game tuning
//!
//! Loaded from a JSON file. Every field has a default, so a partial file
//! only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{FRAME_HZ, MAX_FRAME_SECS, MAX_SUBSTEPS};
use crate::sim::{
    BreakoutConfig, FlappyConfig, GuessConfig, PongConfig, SimonConfig, SnakeConfig,
    TicTacToeConfig, TypingConfig,
};

/// Access code accepted by the privileged-mode unlock
pub const DEFAULT_UNLOCK_CODE: &str = "adminispro";

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tuning for every game in the hub
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub breakout: BreakoutConfig,
    pub pong: PongConfig,
    pub flappy: FlappyConfig,
    pub snake: SnakeConfig,
    pub tictactoe: TicTacToeConfig,
    pub simon: SimonConfig,
    pub typing: TypingConfig,
    pub guess: GuessConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Cadence ===
    /// Tick rate of frame-driven games
    pub frame_hz: u32,
    /// Maximum ticks run per pump
    pub max_substeps: u32,
    /// Elapsed time clamp per pump (seconds)
    pub max_frame_secs: f32,

    /// RNG seed; `None` lets the runner pick one
    pub seed: Option<u64>,

    /// Code the authentication collaborator checks before enabling
    /// privileged mode
    pub unlock_code: String,

    pub games: GameSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_hz: FRAME_HZ,
            max_substeps: MAX_SUBSTEPS,
            max_frame_secs: MAX_FRAME_SECS,
            seed: None,
            unlock_code: DEFAULT_UNLOCK_CODE.to_string(),
            games: GameSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Seconds per tick for frame-driven games
    pub fn frame_dt(&self) -> f32 {
        crate::frame_dt(self.frame_hz)
    }
}
