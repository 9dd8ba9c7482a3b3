//! Sequence reproduction (Simon): playback in `Showing`, input in `Playing`

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::policy::Tuned;

/// Simon tuning (seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimonConfig {
    pub colors: usize,
    /// Pause before the first colour lights
    pub lead_in_secs: f32,
    pub lit_secs: Tuned<f32>,
    pub gap_secs: Tuned<f32>,
    pub round_points: u32,
}

impl Default for SimonConfig {
    fn default() -> Self {
        Self {
            colors: 4,
            lead_in_secs: 0.5,
            lit_secs: Tuned::new(0.5, 0.8),
            gap_secs: Tuned::new(0.2, 0.4),
            round_points: 1,
        }
    }
}

/// Result of one player choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Correct, more of the sequence to go
    Advance,
    /// Correct and the whole sequence reproduced
    RoundComplete,
    Wrong,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimonState {
    pub sequence: Vec<usize>,
    /// Next index the player must reproduce
    pub cursor: usize,
    /// Time spent in the current playback
    pub playback: f32,
    /// Colour currently lit during playback
    pub lit: Option<usize>,
}

impl SimonState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a random colour and rewind playback
    pub fn extend(&mut self, config: &SimonConfig, rng: &mut impl Rng) {
        self.sequence.push(rng.random_range(0..config.colors.max(1)));
        self.cursor = 0;
        self.playback = 0.0;
        self.lit = None;
    }

    /// Advance playback by `dt`. Returns true once every colour has been shown.
    /// Timings are read each call, so a policy change applies mid-playback.
    pub fn advance_playback(&mut self, dt: f32, config: &SimonConfig, privileged: bool) -> bool {
        self.playback += dt;
        let lit = config.lit_secs.pick(privileged);
        let slot = lit + config.gap_secs.pick(privileged);
        let t = self.playback - config.lead_in_secs;
        if t < 0.0 {
            self.lit = None;
            return false;
        }
        if slot <= 0.0 {
            self.lit = None;
            return true;
        }

        let index = (t / slot) as usize;
        if index >= self.sequence.len() {
            self.lit = None;
            return true;
        }
        let into_slot = t - index as f32 * slot;
        self.lit = (into_slot < lit).then(|| self.sequence[index]);
        false
    }

    /// Player picks `color`. `None` for a colour that does not exist.
    /// Privileged: any existing colour counts as correct.
    pub fn choose(&mut self, color: usize, config: &SimonConfig, privileged: bool) -> Option<Choice> {
        if color >= config.colors {
            return None;
        }
        let expected = *self.sequence.get(self.cursor)?;
        if !privileged && color != expected {
            return Some(Choice::Wrong);
        }
        self.cursor += 1;
        if self.cursor == self.sequence.len() {
            Some(Choice::RoundComplete)
        } else {
            Some(Choice::Advance)
        }
    }
}
