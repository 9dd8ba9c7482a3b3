//! Pong: player paddle on the left, search-free AI paddle on the right

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::circle_aabb_overlap;
use super::event::GameEvent;
use super::motion::{Body, ControlInput, Field, Walls, clamp_controller, integrate, reflect_off_walls};
use crate::policy::Tuned;

/// Pong tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    pub field: Field,
    pub paddle_size: Vec2,
    /// Distance between each paddle and its goal line
    pub paddle_inset: f32,
    pub ball_size: f32,
    pub serve_speed: f32,
    /// Horizontal speed multiplier applied on every paddle return
    pub return_boost: f32,
    /// Vertical jitter added on a return, uniform in ±jitter/2
    pub return_jitter: f32,
    /// Points needed to win; also the player's starting lives
    pub win_score: u32,
    /// Opponent paddle speed (pixels per tick)
    pub opponent_speed: Tuned<f32>,
    /// Opponent ignores the ball while it is this close to its target
    pub opponent_dead_zone: Tuned<f32>,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            field: Field::new(600.0, 400.0),
            paddle_size: Vec2::new(15.0, 80.0),
            paddle_inset: 30.0,
            ball_size: 15.0,
            serve_speed: 5.0,
            return_boost: 1.05,
            return_jitter: 2.0,
            win_score: 5,
            opponent_speed: Tuned::new(5.0, 2.0),
            opponent_dead_zone: Tuned::new(0.0, 50.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PongState {
    pub ball: Body,
    pub player: Body,
    pub opponent: Body,
    pub player_points: u32,
    pub opponent_points: u32,
}

impl PongState {
    pub fn new(config: &PongConfig, rng: &mut impl Rng) -> Self {
        let field = config.field;
        let mid_y = (field.height - config.paddle_size.y) / 2.0;
        let opponent_x = field.width - config.paddle_inset - config.paddle_size.x;
        Self {
            ball: serve(config, 1.0, rng),
            player: Body::fixed(Vec2::new(config.paddle_inset, mid_y), config.paddle_size),
            opponent: Body::fixed(Vec2::new(opponent_x, mid_y), config.paddle_size),
            player_points: 0,
            opponent_points: 0,
        }
    }
}

/// Ball from the centre toward `direction` (+1 right, -1 left)
fn serve(config: &PongConfig, direction: f32, rng: &mut impl Rng) -> Body {
    let speed = config.serve_speed;
    let vy = (rng.random::<f32>() - 0.5) * speed * 2.0;
    Body::new(
        Vec2::new(config.field.width / 2.0, config.field.height / 2.0),
        Vec2::new(speed * direction, vy),
        Vec2::splat(config.ball_size),
    )
}

/// Opponent AI: chase the ball's top edge, limited speed, optional dead zone
fn track_ball(paddle_y: f32, ball_y: f32, config: &PongConfig, privileged: bool) -> f32 {
    let speed = config.opponent_speed.pick(privileged);
    let dead_zone = config.opponent_dead_zone.pick(privileged);
    let target = ball_y - config.paddle_size.y / 2.0;
    let diff = target - paddle_y;
    let next = if diff.abs() <= dead_zone {
        paddle_y
    } else if diff.abs() > speed {
        paddle_y + diff.signum() * speed
    } else {
        target
    };
    next.clamp(0.0, (config.field.height - config.paddle_size.y).max(0.0))
}

/// Whether the ball meets `paddle`, either by overlap or by crossing its
/// face since the previous tick
fn returns(prev_ball: &Body, ball: &Body, paddle: &Body, face_x: f32) -> bool {
    if circle_aabb_overlap(ball.center(), ball.radius(), &paddle.aabb()) {
        return true;
    }
    let (before, after) = (prev_ball.center().x - face_x, ball.center().x - face_x);
    let crossed = before.signum() != after.signum();
    let aabb = paddle.aabb();
    crossed && ball.pos.y + ball.size.y >= aabb.min.y && ball.pos.y <= aabb.max.y
}

/// Advance one tick
pub fn step(
    prev: &PongState,
    input: &ControlInput,
    config: &PongConfig,
    privileged: bool,
    rng: &mut impl Rng,
) -> (PongState, Vec<GameEvent>) {
    let mut next = prev.clone();
    let mut events = Vec::new();
    let field = config.field;

    if let Some(pointer) = input.pointer {
        next.player.pos.y = clamp_controller(pointer.y, config.paddle_size.y, field.height);
    }
    next.opponent.pos.y = track_ball(prev.opponent.pos.y, prev.ball.pos.y, config, privileged);

    integrate(&mut next.ball);
    if reflect_off_walls(&mut next.ball, &field, Walls::TOP_AND_BOTTOM).any() {
        events.push(GameEvent::Bounced);
    }

    let jitter = config.return_jitter;
    let player_face = next.player.pos.x + next.player.size.x;
    if prev.ball.vel.x < 0.0 && returns(&prev.ball, &next.ball, &next.player, player_face) {
        next.ball.vel.x = -prev.ball.vel.x * config.return_boost;
        next.ball.vel.y += (rng.random::<f32>() - 0.5) * jitter;
        next.ball.pos.x = player_face;
        events.push(GameEvent::Bounced);
    }

    let opponent_face = next.opponent.pos.x;
    if prev.ball.vel.x > 0.0 && returns(&prev.ball, &next.ball, &next.opponent, opponent_face) {
        next.ball.vel.x = -prev.ball.vel.x * config.return_boost;
        next.ball.vel.y += (rng.random::<f32>() - 0.5) * jitter;
        next.ball.pos.x = opponent_face - next.ball.size.x;
        events.push(GameEvent::Bounced);
    }

    // Goal lines are terminal
    let right_goal = field.max_pos(next.ball.size).x;
    if next.ball.pos.x <= 0.0 {
        next.opponent_points += 1;
        next.ball = serve(config, -1.0, rng);
        events.push(GameEvent::LifeLost);
    } else if next.ball.pos.x >= right_goal {
        next.player_points += 1;
        next.ball = serve(config, 1.0, rng);
        events.push(GameEvent::Scored(1));
        if next.player_points >= config.win_score {
            events.push(GameEvent::Won);
        }
    }

    (next, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (PongConfig, PongState, Pcg32) {
        let config = PongConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let state = PongState::new(&config, &mut rng);
        (config, state, rng)
    }

    #[test]
    fn test_initial_layout() {
        let (config, state, _) = setup();
        assert_eq!(state.player.pos, Vec2::new(30.0, 160.0));
        assert_eq!(state.opponent.pos, Vec2::new(555.0, 160.0));
        assert_eq!(state.ball.vel.x, config.serve_speed);
        assert!(state.ball.vel.y.abs() <= config.serve_speed);
    }

    #[test]
    fn test_player_return_boosts_speed() {
        let (config, mut state, mut rng) = setup();
        state.player.pos.y = 160.0;
        state.ball = Body::new(Vec2::new(47.0, 190.0), Vec2::new(-5.0, 0.0), Vec2::splat(15.0));
        let (next, events) = step(&state, &ControlInput::default(), &config, false, &mut rng);
        assert!(events.contains(&GameEvent::Bounced));
        assert!((next.ball.vel.x - 5.25).abs() < 1e-4);
        assert!(next.ball.vel.y.abs() <= 1.0);
        assert_eq!(next.ball.pos.x, 45.0);
    }

    #[test]
    fn test_return_only_when_moving_toward_paddle() {
        let (config, mut state, mut rng) = setup();
        state.ball = Body::new(Vec2::new(40.0, 190.0), Vec2::new(5.0, 0.0), Vec2::splat(15.0));
        let (next, _) = step(&state, &ControlInput::default(), &config, false, &mut rng);
        assert_eq!(next.ball.vel.x, 5.0);
    }

    #[test]
    fn test_miss_costs_a_life_and_reserves_left() {
        let (config, mut state, mut rng) = setup();
        state.player.pos.y = 0.0;
        let input = ControlInput {
            pointer: Some(Vec2::new(0.0, 0.0)),
            press: false,
        };
        state.ball = Body::new(Vec2::new(3.0, 300.0), Vec2::new(-5.0, 0.0), Vec2::splat(15.0));
        let (next, events) = step(&state, &input, &config, false, &mut rng);
        assert!(events.contains(&GameEvent::LifeLost));
        assert_eq!(next.opponent_points, 1);
        assert!(next.ball.vel.x < 0.0);
        assert_eq!(next.ball.pos, Vec2::new(300.0, 200.0));
    }

    #[test]
    fn test_player_point_and_win() {
        let (config, mut state, mut rng) = setup();
        state.player_points = config.win_score - 1;
        state.opponent.pos.y = 0.0;
        state.ball = Body::new(Vec2::new(583.0, 350.0), Vec2::new(5.0, 0.0), Vec2::splat(15.0));
        // Opponent cannot reach from the top before the ball crosses
        let (next, events) = step(&state, &ControlInput::default(), &config, false, &mut rng);
        assert!(events.contains(&GameEvent::Scored(1)));
        assert!(events.contains(&GameEvent::Won));
        assert_eq!(next.player_points, config.win_score);
    }

    #[test]
    fn test_opponent_tracking_normal_vs_privileged() {
        let config = PongConfig::default();
        // Far from target: normal moves 5, privileged moves 2
        assert_eq!(track_ball(0.0, 200.0, &config, false), 5.0);
        assert_eq!(track_ball(0.0, 200.0, &config, true), 2.0);
        // Close to target: normal snaps, privileged sits in its dead zone
        assert_eq!(track_ball(157.0, 200.0, &config, false), 160.0);
        assert_eq!(track_ball(130.0, 200.0, &config, true), 130.0);
        // Never leaves the field
        assert_eq!(track_ball(318.0, 1000.0, &config, false), 320.0);
    }

    #[test]
    fn test_same_seed_same_rally() {
        let config = PongConfig::default();
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        let mut sa = PongState::new(&config, &mut a);
        let mut sb = PongState::new(&config, &mut b);
        for _ in 0..600 {
            sa = step(&sa, &ControlInput::default(), &config, false, &mut a).0;
            sb = step(&sb, &ControlInput::default(), &config, false, &mut b).0;
        }
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_paddle_taller_than_field_stays_at_top() {
        let config = PongConfig {
            paddle_size: Vec2::new(15.0, 500.0),
            ..PongConfig::default()
        };
        assert_eq!(track_ball(0.0, 200.0, &config, false), 0.0);
        let mut rng = Pcg32::seed_from_u64(7);
        let state = PongState::new(&config, &mut rng);
        let (next, _) = step(&state, &ControlInput::default(), &config, false, &mut rng);
        assert_eq!(next.opponent.pos.y, 0.0);
    }
}
