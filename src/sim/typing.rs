//! Timed typing game: type as many words as possible before the countdown ends

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;

pub const WORDS: [&str; 32] = [
    "cyber", "neon", "arcade", "pixel", "game", "level", "score", "power", "speed", "fast", "type",
    "quick", "flash", "code", "hack", "data", "byte", "grid", "zone", "wave", "rush", "bolt",
    "dash", "zoom", "fury", "blaze", "storm", "pulse", "spark", "glow", "beam", "laser",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub duration_secs: f32,
    /// Longest input buffer; further keys are ignored
    pub max_input: usize,
    /// Word pool; the built-in list is used when empty
    pub words: Vec<String>,
    /// Privileged auto-complete kicks in after this many matching chars
    pub autocomplete_after: usize,
    pub word_points: u32,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30.0,
            max_input: 32,
            words: WORDS.iter().map(|w| w.to_string()).collect(),
            autocomplete_after: 2,
            word_points: 1,
        }
    }
}

impl TypingConfig {
    fn pick_word(&self, rng: &mut impl Rng) -> String {
        if self.words.is_empty() {
            WORDS[rng.random_range(0..WORDS.len())].to_string()
        } else {
            self.words[rng.random_range(0..self.words.len())].clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingState {
    pub word: String,
    pub buffer: String,
    pub words_done: u32,
    /// Characters of completed words
    pub chars: u32,
    pub elapsed: f32,
}

impl TypingState {
    pub fn new(config: &TypingConfig, rng: &mut impl Rng) -> Self {
        Self {
            word: config.pick_word(rng),
            buffer: String::new(),
            words_done: 0,
            chars: 0,
            elapsed: 0.0,
        }
    }

    pub fn remaining(&self, config: &TypingConfig) -> f32 {
        (config.duration_secs - self.elapsed).max(0.0)
    }

    /// Words per minute over the elapsed time (5 chars per word)
    pub fn wpm(&self) -> u32 {
        if self.elapsed <= 0.0 {
            return 0;
        }
        ((self.chars as f32 / 5.0) / (self.elapsed / 60.0)).round() as u32
    }

    /// Run the countdown; emits `TimeUp` on the tick it expires
    pub fn advance(&mut self, dt: f32, config: &TypingConfig) -> Vec<GameEvent> {
        if self.elapsed >= config.duration_secs {
            return Vec::new();
        }
        self.elapsed = (self.elapsed + dt).min(config.duration_secs);
        if self.elapsed >= config.duration_secs {
            vec![GameEvent::TimeUp]
        } else {
            Vec::new()
        }
    }

    /// Type one character. `None` when the key is ignored.
    pub fn key(
        &mut self,
        c: char,
        config: &TypingConfig,
        privileged: bool,
        rng: &mut impl Rng,
    ) -> Option<Vec<GameEvent>> {
        if c.is_control() || self.buffer.chars().count() >= config.max_input {
            return None;
        }
        self.buffer.extend(c.to_lowercase());

        let autocomplete = privileged
            && self.buffer.chars().count() >= config.autocomplete_after
            && self.word.starts_with(self.buffer.as_str());
        if autocomplete || self.buffer == self.word {
            return Some(self.complete_word(config, rng));
        }
        Some(Vec::new())
    }

    pub fn backspace(&mut self) -> bool {
        self.buffer.pop().is_some()
    }

    fn complete_word(&mut self, config: &TypingConfig, rng: &mut impl Rng) -> Vec<GameEvent> {
        self.words_done += 1;
        self.chars += self.word.chars().count() as u32;
        self.word = config.pick_word(rng);
        self.buffer.clear();
        vec![GameEvent::Scored(config.word_points)]
    }
}
