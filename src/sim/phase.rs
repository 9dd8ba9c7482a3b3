//! Session phase state machine
//!
//! One transition table per game shape. The privileged policy never touches
//! this module: it only changes which rule fires inside a transition that is
//! already legal here.

use serde::{Deserialize, Serialize};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Created, never started
    Idle,
    /// Sequence games: pattern playback, input ignored
    Showing,
    /// Active gameplay
    Playing,
    /// Run ended without a win
    GameOver,
    /// Run ended with a win
    Won,
}

impl Phase {
    /// Phases in which the scheduler keeps ticking
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Playing | Phase::Showing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver | Phase::Won)
    }
}

/// Engine shape, which selects the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Ball/paddle/bird games
    Continuous,
    /// Directional actor on a grid
    Grid,
    /// Turn-based board vs. search opponent
    Search,
    /// Pattern playback then reproduction
    Sequence,
    /// Countdown-bounded keystroke game
    Timed,
    /// Hidden value found from hints; the only way out is a win
    Guess,
}

impl Shape {
    /// Phase entered by `start()`
    pub fn entry_phase(self) -> Phase {
        match self {
            Shape::Sequence => Phase::Showing,
            _ => Phase::Playing,
        }
    }

    /// Legal in-session transitions (everything except `start()`)
    pub fn allows(self, from: Phase, to: Phase) -> bool {
        use Phase::*;
        match (self, from, to) {
            (Shape::Sequence, Showing, Playing) => true,
            (Shape::Sequence, Playing, Showing) => true,
            (Shape::Sequence, Playing, GameOver) => true,
            (Shape::Continuous | Shape::Grid | Shape::Search, Playing, GameOver | Won) => true,
            (Shape::Timed, Playing, GameOver) => true,
            (Shape::Guess, Playing, Won) => true,
            _ => false,
        }
    }
}

/// Phase holder that enforces the table for one shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseMachine {
    shape: Shape,
    phase: Phase,
}

impl PhaseMachine {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            phase: Phase::Idle,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The only edge into `Playing`/`Showing` from `Idle` or a terminal phase.
    /// Also restarts a session that is still running.
    pub fn start(&mut self) -> Phase {
        self.phase = self.shape.entry_phase();
        log::info!("{:?} session started in {:?}", self.shape, self.phase);
        self.phase
    }

    /// Request a transition; illegal requests leave the phase untouched
    pub fn transition(&mut self, to: Phase) -> bool {
        if self.phase == to {
            return false;
        }
        if !self.shape.allows(self.phase, to) {
            log::debug!("{:?}: ignoring {:?} -> {:?}", self.shape, self.phase, to);
            return false;
        }
        log::info!("{:?}: {:?} -> {:?}", self.shape, self.phase, to);
        self.phase = to;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Phase; 5] = [
        Phase::Idle,
        Phase::Showing,
        Phase::Playing,
        Phase::GameOver,
        Phase::Won,
    ];
    const SHAPES: [Shape; 6] = [
        Shape::Continuous,
        Shape::Grid,
        Shape::Search,
        Shape::Sequence,
        Shape::Timed,
        Shape::Guess,
    ];

    #[test]
    fn test_starts_idle() {
        let m = PhaseMachine::new(Shape::Continuous);
        assert_eq!(m.phase(), Phase::Idle);
    }

    #[test]
    fn test_no_transition_skips_playing() {
        for shape in SHAPES {
            for to in ALL {
                assert!(!shape.allows(Phase::Idle, to), "{shape:?} Idle -> {to:?}");
                assert!(!shape.allows(Phase::GameOver, to), "{shape:?} GameOver -> {to:?}");
                assert!(!shape.allows(Phase::Won, to), "{shape:?} Won -> {to:?}");
            }
        }
    }

    #[test]
    fn test_terminal_only_from_playing() {
        for shape in SHAPES {
            for from in ALL {
                if from != Phase::Playing {
                    assert!(!shape.allows(from, Phase::GameOver));
                    assert!(!shape.allows(from, Phase::Won));
                }
            }
        }
    }

    #[test]
    fn test_sequence_loops_showing_playing() {
        let mut m = PhaseMachine::new(Shape::Sequence);
        assert_eq!(m.start(), Phase::Showing);
        assert!(m.transition(Phase::Playing));
        assert!(m.transition(Phase::Showing));
        assert!(m.transition(Phase::Playing));
        // Sequence games never win
        assert!(!m.transition(Phase::Won));
        assert!(m.transition(Phase::GameOver));
        assert!(!m.transition(Phase::Playing));
        assert_eq!(m.start(), Phase::Showing);
    }

    #[test]
    fn test_terminal_is_sticky_until_start() {
        let mut m = PhaseMachine::new(Shape::Grid);
        m.start();
        assert!(m.transition(Phase::GameOver));
        assert!(!m.transition(Phase::Won));
        assert!(!m.transition(Phase::Playing));
        assert_eq!(m.phase(), Phase::GameOver);
        assert_eq!(m.start(), Phase::Playing);
    }

    #[test]
    fn test_showing_only_for_sequence() {
        for shape in [Shape::Continuous, Shape::Grid, Shape::Search, Shape::Timed, Shape::Guess] {
            assert_eq!(shape.entry_phase(), Phase::Playing);
            assert!(!shape.allows(Phase::Playing, Phase::Showing));
        }
    }

    #[test]
    fn test_guess_only_wins() {
        let mut m = PhaseMachine::new(Shape::Guess);
        assert_eq!(m.start(), Phase::Playing);
        assert!(!m.transition(Phase::GameOver));
        assert!(m.transition(Phase::Won));
        assert_eq!(m.phase(), Phase::Won);
    }
}
