//! Arcade Core headless runner
//!
//! Plays every game with a simple autopilot and logs the results.
//!
//! Usage: `arcade-core [settings.json] [--unlock CODE]`

use arcade_core::sim::{Direction, Hint, Phase};
use arcade_core::{GameConfig, GameId, GameSession, HighScores, Intent, PrivilegedMode, Settings, View};
use glam::IVec2;

/// Simulated time budget per game (seconds)
const RUN_SECS: f32 = 60.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut settings_path = None;
    let mut unlock = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--unlock" {
            unlock = args.next();
        } else {
            settings_path = Some(arg);
        }
    }

    let settings = match settings_path {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!("Arcade Core starting (seed {})", seed);

    let policy = PrivilegedMode::default();
    if let Some(code) = unlock {
        policy.unlock(&code, &settings.unlock_code);
    }

    let mut scores = HighScores::new();
    for (i, game) in GameId::ALL.into_iter().enumerate() {
        let config = GameConfig::from_settings(game, &settings);
        let mut session = GameSession::new(config, policy.clone(), &settings, seed.wrapping_add(i as u64));
        let snapshot = run(&mut session, &settings);
        log::info!(
            "{:>9}: {:?} {:?} score {} after {} ticks",
            game.name(),
            snapshot.phase,
            snapshot.outcome,
            snapshot.score,
            snapshot.tick
        );
        scores.record(game, session.best_score());
    }

    for (game, best) in scores.iter() {
        log::info!("Best {}: {}", game.name(), best);
    }
}

/// Drive one session on the frame clock until it ends or time runs out
fn run(session: &mut GameSession, settings: &Settings) -> arcade_core::Snapshot {
    let dt = settings.frame_dt();
    let mut pilot = Autopilot::default();
    session.start();

    let mut elapsed = 0.0;
    while elapsed < RUN_SECS && !session.phase().is_terminal() {
        let snapshot = session.snapshot();
        for intent in pilot.decide(&snapshot, settings) {
            session.submit_intent(intent);
        }
        session.pump(dt);
        elapsed += dt;
    }
    session.snapshot()
}

/// Naive per-game player
#[derive(Default)]
struct Autopilot {
    /// Simon colours seen during playback
    shown: Vec<usize>,
    last_lit: Option<usize>,
    /// Typing: frames until the next key
    cooldown: u32,
}

impl Autopilot {
    fn decide(&mut self, snapshot: &arcade_core::Snapshot, settings: &Settings) -> Vec<Intent> {
        match &snapshot.view {
            View::Breakout { ball, .. } => {
                let c = ball.center();
                vec![Intent::Pointer { x: c.x, y: c.y }]
            }
            View::Pong { ball, .. } => {
                let c = ball.center();
                vec![Intent::Pointer { x: c.x, y: c.y }]
            }
            View::Flappy { bird, pipes } => {
                let flappy = &settings.games.flappy;
                let target = pipes
                    .iter()
                    .find(|p| p.x + flappy.pipe_width > bird.pos.x)
                    .map(|p| p.gap_top + flappy.pipe_gap * 0.6)
                    .unwrap_or(flappy.field.height * 0.5);
                if bird.pos.y + bird.size.y > target && bird.vel.y >= 0.0 {
                    vec![Intent::Press]
                } else {
                    Vec::new()
                }
            }
            View::Snake {
                body,
                heading,
                target,
                ..
            } => steer(body[0], *heading, *target).map(Intent::Direction).into_iter().collect(),
            View::TicTacToe {
                cells,
                awaiting_reply,
                ..
            } => {
                if *awaiting_reply {
                    return Vec::new();
                }
                let pick = if cells[4].is_none() {
                    Some(4)
                } else {
                    cells.iter().position(Option::is_none)
                };
                pick.map(Intent::Move).into_iter().collect()
            }
            View::Simon { lit, progress, .. } => match snapshot.phase {
                Phase::Showing => {
                    if *progress == 0 && lit.is_some() && *lit != self.last_lit {
                        self.shown.extend(*lit);
                    }
                    self.last_lit = *lit;
                    Vec::new()
                }
                Phase::Playing => {
                    let intents: Vec<Intent> = self.shown.drain(..).map(Intent::Choose).collect();
                    self.last_lit = None;
                    intents
                }
                _ => Vec::new(),
            },
            View::Typing { word, buffer, .. } => {
                if self.cooldown > 0 {
                    self.cooldown -= 1;
                    return Vec::new();
                }
                self.cooldown = 12;
                if !word.starts_with(buffer.as_str()) {
                    return vec![Intent::Backspace];
                }
                word.chars().nth(buffer.chars().count()).map(Intent::Key).into_iter().collect()
            }
            View::Guess { attempts, min, max } => {
                // Bisect the interval the hints leave open
                let (mut lo, mut hi) = (*min, *max);
                for &(value, hint) in attempts {
                    match hint {
                        Hint::High => hi = hi.min(value.saturating_sub(1)),
                        Hint::Low => lo = lo.max(value + 1),
                        Hint::Correct => return Vec::new(),
                    }
                }
                vec![Intent::Guess(lo + hi.saturating_sub(lo) / 2)]
            }
        }
    }
}

/// Greedy step toward `target` that never reverses
fn steer(head: IVec2, heading: Direction, target: IVec2) -> Option<Direction> {
    let delta = target - head;
    let wanted = if delta.x > 0 {
        Direction::Right
    } else if delta.x < 0 {
        Direction::Left
    } else if delta.y > 0 {
        Direction::Down
    } else if delta.y < 0 {
        Direction::Up
    } else {
        return None;
    };
    if wanted == heading.opposite() {
        // Sidestep first
        return Some(match heading {
            Direction::Left | Direction::Right => Direction::Down,
            Direction::Up | Direction::Down => Direction::Right,
        });
    }
    (wanted != heading).then_some(wanted)
}
