//! Arcade Core - session engine for a hub of arcade mini-games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collisions, motion, grid, search, phases)
//! - `policy`: Privileged-mode flag and per-rule overrides
//! - `session`: Per-game aggregate root, intents and snapshots
//! - `scheduler`: Frame scheduler (one pending tick, synchronous cancel)
//! - `settings`: Data-driven game configuration
//! - `highscores`: In-memory best score per game

pub mod highscores;
pub mod policy;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use policy::{PrivilegedMode, Tuned};
pub use scheduler::FrameScheduler;
pub use session::{ContinuousConfig, GameConfig, GameId, GameSession, Intent, Session, Snapshot, View};
pub use settings::{Settings, SettingsError};

/// Engine configuration constants
pub mod consts {
    /// Default frame cadence for continuous games (60 Hz)
    pub const FRAME_HZ: u32 = 60;
    /// Maximum ticks run per pump to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Elapsed time clamp per pump (seconds)
    pub const MAX_FRAME_SECS: f32 = 0.1;
}

/// Seconds per tick for a given frame rate
#[inline]
pub fn frame_dt(hz: u32) -> f32 {
    1.0 / hz.max(1) as f32
}
