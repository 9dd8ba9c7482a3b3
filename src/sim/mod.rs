//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step per tick
//! - Seeded RNG only, passed in by the caller
//! - Stable iteration order (storage order)
//! - No rendering, timing or platform dependencies

pub mod breakout;
pub mod collision;
pub mod event;
pub mod flappy;
pub mod grid;
pub mod guess;
pub mod motion;
pub mod phase;
pub mod pong;
pub mod search;
pub mod sequence;
pub mod typing;

pub use breakout::{BreakoutConfig, BreakoutState};
pub use collision::{Aabb, circle_aabb_overlap, circle_circle_overlap, paddle_deflection, reflect_velocity};
pub use event::{GameEvent, Outcome};
pub use flappy::{FlappyConfig, FlappyState, Pipe};
pub use grid::{Direction, SnakeConfig, SnakeState, respawn_target};
pub use guess::{GuessConfig, GuessState, Hint};
pub use motion::{Body, ControlInput, Field, Obstacle, Walls};
pub use phase::{Phase, PhaseMachine, Shape};
pub use pong::{PongConfig, PongState};
pub use search::{Board, Mark, Terminal, TicTacToeConfig, TicTacToeState, best_move, choose_move, minimax, sandbag_move};
pub use sequence::{Choice, SimonConfig, SimonState};
pub use typing::{TypingConfig, TypingState};
