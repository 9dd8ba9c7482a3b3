//! Game session: the aggregate root for one game instance
//!
//! A `GameSession` owns its engine state, phase machine, RNG and frame
//! scheduler. The only thing it shares is the privileged-mode handle, which
//! it reads once per tick or intent. Callers drive it with four operations:
//! `start`, `submit_intent`, `tick` (or `pump`, which ticks on the
//! scheduler's cadence) and `set_privileged`.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::policy::PrivilegedMode;
use crate::scheduler::FrameScheduler;
use crate::settings::Settings;
use crate::sim::sequence::Choice;
use crate::sim::{
    Aabb, Body, BreakoutConfig, BreakoutState, ControlInput, Direction, FlappyConfig,
    FlappyState, GameEvent, GuessConfig, GuessState, Hint, Mark, Outcome, Phase, PhaseMachine,
    Pipe, PongConfig, PongState, Shape, SimonConfig, SimonState, SnakeConfig, SnakeState,
    TicTacToeConfig, TicTacToeState, TypingConfig, TypingState, breakout, flappy, grid, pong,
};

/// Games served by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameId {
    Breakout,
    Pong,
    Flappy,
    Snake,
    TicTacToe,
    Simon,
    Typing,
    Guess,
}

impl GameId {
    pub const ALL: [GameId; 8] = [
        GameId::Breakout,
        GameId::Pong,
        GameId::Flappy,
        GameId::Snake,
        GameId::TicTacToe,
        GameId::Simon,
        GameId::Typing,
        GameId::Guess,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GameId::Breakout => "breakout",
            GameId::Pong => "pong",
            GameId::Flappy => "flappy",
            GameId::Snake => "snake",
            GameId::TicTacToe => "tictactoe",
            GameId::Simon => "simon",
            GameId::Typing => "typing",
            GameId::Guess => "guess",
        }
    }
}

/// Continuous rule sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContinuousConfig {
    Breakout(BreakoutConfig),
    Pong(PongConfig),
    Flappy(FlappyConfig),
}

/// Which engine a session runs, with its tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameConfig {
    Continuous(ContinuousConfig),
    Grid(SnakeConfig),
    Search(TicTacToeConfig),
    Sequence(SimonConfig),
    Timed(TypingConfig),
    Guess(GuessConfig),
}

impl GameConfig {
    /// Tuning for `game` taken from the settings
    pub fn from_settings(game: GameId, settings: &Settings) -> Self {
        let games = &settings.games;
        match game {
            GameId::Breakout => GameConfig::Continuous(ContinuousConfig::Breakout(games.breakout.clone())),
            GameId::Pong => GameConfig::Continuous(ContinuousConfig::Pong(games.pong.clone())),
            GameId::Flappy => GameConfig::Continuous(ContinuousConfig::Flappy(games.flappy.clone())),
            GameId::Snake => GameConfig::Grid(games.snake.clone()),
            GameId::TicTacToe => GameConfig::Search(games.tictactoe.clone()),
            GameId::Simon => GameConfig::Sequence(games.simon.clone()),
            GameId::Typing => GameConfig::Timed(games.typing.clone()),
            GameId::Guess => GameConfig::Guess(games.guess.clone()),
        }
    }

    pub fn game(&self) -> GameId {
        match self {
            GameConfig::Continuous(ContinuousConfig::Breakout(_)) => GameId::Breakout,
            GameConfig::Continuous(ContinuousConfig::Pong(_)) => GameId::Pong,
            GameConfig::Continuous(ContinuousConfig::Flappy(_)) => GameId::Flappy,
            GameConfig::Grid(_) => GameId::Snake,
            GameConfig::Search(_) => GameId::TicTacToe,
            GameConfig::Sequence(_) => GameId::Simon,
            GameConfig::Timed(_) => GameId::Typing,
            GameConfig::Guess(_) => GameId::Guess,
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            GameConfig::Continuous(_) => Shape::Continuous,
            GameConfig::Grid(_) => Shape::Grid,
            GameConfig::Search(_) => Shape::Search,
            GameConfig::Sequence(_) => Shape::Sequence,
            GameConfig::Timed(_) => Shape::Timed,
            GameConfig::Guess(_) => Shape::Guess,
        }
    }
}

/// Raw player input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Pointer position in field coordinates
    Pointer { x: f32, y: f32 },
    /// Primary button / tap
    Press,
    Direction(Direction),
    /// Board cell
    Move(usize),
    /// Colour pad
    Choose(usize),
    Key(char),
    Backspace,
    Guess(u32),
}

/// Per-game render data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum View {
    Breakout {
        ball: Body,
        paddle: Body,
        /// Active bricks only
        bricks: Vec<Aabb>,
    },
    Pong {
        ball: Body,
        player: Body,
        opponent: Body,
        player_points: u32,
        opponent_points: u32,
    },
    Flappy {
        bird: Body,
        pipes: Vec<Pipe>,
    },
    Snake {
        body: Vec<IVec2>,
        heading: Direction,
        target: IVec2,
        grid_size: i32,
    },
    TicTacToe {
        cells: [Option<Mark>; 9],
        awaiting_reply: bool,
        winning_line: Option<[usize; 3]>,
    },
    Simon {
        lit: Option<usize>,
        round: usize,
        progress: usize,
    },
    Typing {
        word: String,
        buffer: String,
        words_done: u32,
        wpm: u32,
    },
    Guess {
        /// Accepted guesses with their hints, oldest first
        attempts: Vec<(u32, Hint)>,
        min: u32,
        max: u32,
    },
}

/// Immutable per-tick state for a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub game: GameId,
    pub phase: Phase,
    pub outcome: Option<Outcome>,
    pub score: u64,
    pub lives: u32,
    /// Countdown in seconds, for timed games
    pub timer: Option<f32>,
    pub privileged: bool,
    pub tick: u64,
    pub view: View,
}

/// Session-scoped counters; reset by `start()`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    machine: PhaseMachine,
    pub score: u64,
    pub lives: u32,
    pub timer: Option<f32>,
    pub outcome: Option<Outcome>,
    pub ticks: u64,
}

impl Session {
    fn new(shape: Shape) -> Self {
        Self {
            machine: PhaseMachine::new(shape),
            score: 0,
            lives: 0,
            timer: None,
            outcome: None,
            ticks: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }
}

/// Engine state paired with its tuning
#[derive(Debug, Clone)]
enum Engine {
    Breakout(BreakoutConfig, BreakoutState),
    Pong(PongConfig, PongState),
    Flappy(FlappyConfig, FlappyState),
    Snake(SnakeConfig, SnakeState),
    TicTacToe(TicTacToeConfig, TicTacToeState),
    Simon(SimonConfig, SimonState),
    Typing(TypingConfig, TypingState),
    Guess(GuessConfig, GuessState),
}

impl Engine {
    fn new(config: &GameConfig, rng: &mut Pcg32) -> Self {
        match config {
            GameConfig::Continuous(ContinuousConfig::Breakout(c)) => {
                Engine::Breakout(c.clone(), BreakoutState::new(c))
            }
            GameConfig::Continuous(ContinuousConfig::Pong(c)) => {
                Engine::Pong(c.clone(), PongState::new(c, rng))
            }
            GameConfig::Continuous(ContinuousConfig::Flappy(c)) => {
                Engine::Flappy(c.clone(), FlappyState::new(c))
            }
            GameConfig::Grid(c) => Engine::Snake(c.clone(), SnakeState::new(c)),
            GameConfig::Search(c) => Engine::TicTacToe(c.clone(), TicTacToeState::new()),
            GameConfig::Sequence(c) => Engine::Simon(c.clone(), SimonState::new()),
            GameConfig::Timed(c) => Engine::Typing(c.clone(), TypingState::new(c, rng)),
            GameConfig::Guess(c) => Engine::Guess(c.clone(), GuessState::new(c, rng)),
        }
    }

    fn starting_lives(&self, privileged: bool) -> u32 {
        match self {
            Engine::Breakout(c, _) => c.lives.pick(privileged),
            Engine::Pong(c, _) => c.win_score,
            _ => 1,
        }
    }

    fn view(&self) -> View {
        match self {
            Engine::Breakout(_, s) => View::Breakout {
                ball: s.ball,
                paddle: s.paddle,
                bricks: s.bricks.iter().filter(|b| b.active).map(|b| b.bounds).collect(),
            },
            Engine::Pong(_, s) => View::Pong {
                ball: s.ball,
                player: s.player,
                opponent: s.opponent,
                player_points: s.player_points,
                opponent_points: s.opponent_points,
            },
            Engine::Flappy(_, s) => View::Flappy {
                bird: s.bird,
                pipes: s.pipes.clone(),
            },
            Engine::Snake(c, s) => View::Snake {
                body: s.body.iter().copied().collect(),
                heading: s.heading,
                target: s.target,
                grid_size: c.grid_size,
            },
            Engine::TicTacToe(_, s) => View::TicTacToe {
                cells: *s.board.cells(),
                awaiting_reply: s.awaiting_reply,
                winning_line: s.winning_line,
            },
            Engine::Simon(_, s) => View::Simon {
                lit: s.lit,
                round: s.sequence.len(),
                progress: s.cursor,
            },
            Engine::Typing(_, s) => View::Typing {
                word: s.word.clone(),
                buffer: s.buffer.clone(),
                words_done: s.words_done,
                wpm: s.wpm(),
            },
            Engine::Guess(c, s) => View::Guess {
                attempts: s.attempts.clone(),
                min: *c.range().start(),
                max: *c.range().end(),
            },
        }
    }
}

pub struct GameSession {
    config: GameConfig,
    session: Session,
    engine: Engine,
    policy: PrivilegedMode,
    scheduler: FrameScheduler,
    rng: Pcg32,
    /// Controls latched since the previous tick
    input: ControlInput,
    best: u64,
    frame_dt: f32,
    max_substeps: u32,
    max_frame_secs: f32,
}

impl GameSession {
    pub fn new(config: GameConfig, policy: PrivilegedMode, settings: &Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let engine = Engine::new(&config, &mut rng);
        Self {
            session: Session::new(config.shape()),
            config,
            engine,
            policy,
            scheduler: FrameScheduler::new(),
            rng,
            input: ControlInput::default(),
            best: 0,
            frame_dt: settings.frame_dt(),
            max_substeps: settings.max_substeps.max(1),
            max_frame_secs: settings.max_frame_secs.max(0.0),
        }
    }

    pub fn game(&self) -> GameId {
        self.config.game()
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Best score reached by any run of this session
    pub fn best_score(&self) -> u64 {
        self.best
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Writes the shared flag; every session holding the handle sees it
    pub fn set_privileged(&self, enabled: bool) {
        self.policy.set(enabled);
    }

    /// Reset everything and enter the shape's entry phase
    pub fn start(&mut self) {
        self.scheduler.cancel();
        let privileged = self.policy.is_enabled();

        self.engine = Engine::new(&self.config, &mut self.rng);
        self.input = ControlInput::default();
        let shape = self.config.shape();
        self.session = Session::new(shape);
        self.session.lives = self.engine.starting_lives(privileged);
        if let Engine::Typing(c, s) = &self.engine {
            self.session.timer = Some(s.remaining(c));
        }
        if let Engine::Simon(c, s) = &mut self.engine {
            s.extend(c, &mut self.rng);
        }
        self.session.machine.start();

        // Turn-based shapes only tick on demand
        if !matches!(shape, Shape::Search | Shape::Guess) {
            self.scheduler.arm(self.tick_interval());
        }
    }

    /// Apply one input. Invalid or out-of-phase intents are ignored;
    /// returns whether the intent was accepted.
    pub fn submit_intent(&mut self, intent: Intent) -> bool {
        let phase = self.phase();
        if phase != Phase::Playing {
            log::debug!("{}: ignoring {:?} in {:?}", self.game().name(), intent, phase);
            return false;
        }
        let privileged = self.policy.is_enabled();
        let mut replay = false;

        let events = match (&mut self.engine, intent) {
            (
                Engine::Breakout(..) | Engine::Pong(..) | Engine::Flappy(..),
                Intent::Pointer { x, y },
            ) => {
                self.input.pointer = Some(Vec2::new(x, y));
                Some(Vec::new())
            }
            (Engine::Breakout(..) | Engine::Pong(..) | Engine::Flappy(..), Intent::Press) => {
                self.input.press = true;
                Some(Vec::new())
            }
            (Engine::Snake(_, s), Intent::Direction(d)) => s.set_direction(d).then(Vec::new),
            (Engine::TicTacToe(c, s), Intent::Move(index)) => s.player_move(index, c),
            (Engine::Simon(c, s), Intent::Choose(color)) => match s.choose(color, c, privileged) {
                Some(Choice::Advance) => Some(Vec::new()),
                Some(Choice::RoundComplete) => {
                    s.extend(c, &mut self.rng);
                    replay = true;
                    Some(vec![GameEvent::Scored(c.round_points)])
                }
                Some(Choice::Wrong) => Some(vec![GameEvent::Crashed]),
                None => None,
            },
            (Engine::Typing(c, s), Intent::Key(ch)) => s.key(ch, c, privileged, &mut self.rng),
            (Engine::Typing(_, s), Intent::Backspace) => s.backspace().then(Vec::new),
            (Engine::Guess(c, s), Intent::Guess(value)) => s.guess(value, c, privileged),
            _ => None,
        };

        let Some(events) = events else {
            log::debug!("{}: ignoring invalid {:?}", self.game().name(), intent);
            return false;
        };
        self.apply_events(&events);

        if self.phase() == Phase::Playing {
            if replay {
                self.session.machine.transition(Phase::Showing);
                self.scheduler.arm(self.frame_dt);
            } else if let Engine::TicTacToe(c, s) = &self.engine {
                if s.awaiting_reply {
                    self.scheduler.arm(c.reply_delay_secs);
                }
            }
        }
        true
    }

    /// Advance one step. Outside an active phase this only returns the
    /// current snapshot.
    pub fn tick(&mut self) -> Snapshot {
        if !self.phase().is_active() {
            return self.snapshot();
        }
        let privileged = self.policy.is_enabled();
        let dt = self.tick_interval();
        self.session.ticks += 1;

        let events = match &mut self.engine {
            Engine::Breakout(c, s) => {
                let (next, events) = breakout::step(s, &self.input, c, privileged);
                *s = next;
                events
            }
            Engine::Pong(c, s) => {
                let (next, events) = pong::step(s, &self.input, c, privileged, &mut self.rng);
                *s = next;
                events
            }
            Engine::Flappy(c, s) => {
                let (next, events) = flappy::step(s, &self.input, c, privileged, &mut self.rng);
                *s = next;
                events
            }
            Engine::Snake(c, s) => {
                let (next, events) = grid::step(s, c, privileged, &mut self.rng);
                *s = next;
                events
            }
            Engine::TicTacToe(c, s) => s.opponent_reply(c, privileged),
            Engine::Simon(c, s) => {
                if self.session.machine.phase() == Phase::Showing
                    && s.advance_playback(dt, c, privileged)
                {
                    s.cursor = 0;
                    self.session.machine.transition(Phase::Playing);
                }
                Vec::new()
            }
            Engine::Typing(c, s) => {
                let events = s.advance(dt, c);
                self.session.timer = Some(s.remaining(c));
                events
            }
            Engine::Guess(..) => Vec::new(),
        };
        self.input.press = false;
        self.apply_events(&events);

        if self.phase().is_active() {
            let wants_tick = match &self.engine {
                Engine::TicTacToe(_, s) => s.awaiting_reply,
                Engine::Simon(_, _) => self.phase() == Phase::Showing,
                Engine::Guess(..) => false,
                _ => true,
            };
            if wants_tick {
                self.scheduler.arm(self.tick_interval());
            }
        }
        self.snapshot()
    }

    /// Run the ticks that came due in `elapsed` seconds, at most
    /// `max_substeps` of them; the elapsed time is clamped first.
    pub fn pump(&mut self, elapsed: f32) -> Vec<Snapshot> {
        let mut budget = if elapsed.is_finite() {
            elapsed.clamp(0.0, self.max_frame_secs)
        } else {
            0.0
        };
        let mut frames = Vec::new();
        while frames.len() < self.max_substeps as usize && self.scheduler.poll(&mut budget) {
            frames.push(self.tick());
        }
        frames
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            game: self.game(),
            phase: self.phase(),
            outcome: self.session.outcome,
            score: self.session.score,
            lives: self.session.lives,
            timer: self.session.timer,
            privileged: self.policy.is_enabled(),
            tick: self.session.ticks,
            view: self.engine.view(),
        }
    }

    /// Delay until the next tick for the current game state
    fn tick_interval(&self) -> f32 {
        match &self.engine {
            Engine::Snake(c, _) => c.interval_secs(self.session.score),
            Engine::TicTacToe(c, _) => c.reply_delay_secs,
            _ => self.frame_dt,
        }
    }

    fn apply_events(&mut self, events: &[GameEvent]) {
        for &event in events {
            match event {
                GameEvent::Scored(points) => {
                    self.session.score += u64::from(points);
                    self.best = self.best.max(self.session.score);
                }
                GameEvent::Bounced => {}
                GameEvent::LifeLost => {
                    self.session.lives = self.session.lives.saturating_sub(1);
                    if self.session.lives == 0 {
                        self.finish(Outcome::OutOfLives);
                    }
                }
                other => {
                    if let Some(outcome) = Outcome::from_event(other) {
                        self.finish(outcome);
                    }
                }
            }
            if self.phase().is_terminal() {
                break;
            }
        }
    }

    /// Enter the terminal phase for `outcome` and stop ticking
    fn finish(&mut self, outcome: Outcome) {
        let to = if outcome.is_win() { Phase::Won } else { Phase::GameOver };
        if self.session.machine.transition(to) {
            self.scheduler.cancel();
            self.session.outcome = Some(outcome);
            log::info!(
                "{} finished: {:?} with score {}",
                self.game().name(),
                outcome,
                self.session.score
            );
        }
    }
}
