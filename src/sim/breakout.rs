//! Breakout: paddle at the bottom, bricks at the top

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, paddle_deflection};
use super::event::GameEvent;
use super::motion::{
    Body, ControlInput, Field, Obstacle, Walls, all_cleared, clamp_controller, consume_first,
    integrate, reflect_off_walls,
};
use crate::policy::Tuned;

/// Breakout tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    pub field: Field,
    pub paddle_size: Vec2,
    /// Gap between the paddle's bottom edge and the field floor
    pub paddle_lift: f32,
    pub ball_size: f32,
    pub ball_spawn: Vec2,
    pub ball_velocity: Vec2,
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_size: Vec2,
    pub brick_gap: f32,
    pub brick_top: f32,
    pub brick_points: u32,
    pub lives: Tuned<u32>,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            field: Field::new(480.0, 400.0),
            paddle_size: Vec2::new(80.0, 12.0),
            paddle_lift: 20.0,
            ball_size: 10.0,
            ball_spawn: Vec2::new(240.0, 350.0),
            ball_velocity: Vec2::new(4.0, -4.0),
            brick_rows: 4,
            brick_cols: 8,
            brick_size: Vec2::new(55.0, 20.0),
            brick_gap: 4.0,
            brick_top: 40.0,
            brick_points: 10,
            lives: Tuned::new(3, 99),
        }
    }
}

impl BreakoutConfig {
    /// Top edge of the paddle
    fn paddle_top(&self) -> f32 {
        self.field.height - self.paddle_lift - self.paddle_size.y
    }

    fn spawn_ball(&self) -> Body {
        Body::new(self.ball_spawn, self.ball_velocity, Vec2::splat(self.ball_size))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutState {
    pub ball: Body,
    pub paddle: Body,
    pub bricks: Vec<Obstacle>,
}

impl BreakoutState {
    pub fn new(config: &BreakoutConfig) -> Self {
        let paddle_x = (config.field.width - config.paddle_size.x) / 2.0;
        Self {
            ball: config.spawn_ball(),
            paddle: Body::fixed(Vec2::new(paddle_x, config.paddle_top()), config.paddle_size),
            bricks: build_bricks(config),
        }
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }
}

/// Centred brick wall, row-major (row 0 at the top)
fn build_bricks(config: &BreakoutConfig) -> Vec<Obstacle> {
    let pitch = config.brick_size + Vec2::splat(config.brick_gap);
    let start_x = (config.field.width - config.brick_cols as f32 * pitch.x) / 2.0;
    let mut bricks = Vec::with_capacity((config.brick_rows * config.brick_cols) as usize);
    for row in 0..config.brick_rows {
        for col in 0..config.brick_cols {
            let pos = Vec2::new(
                start_x + col as f32 * pitch.x,
                config.brick_top + row as f32 * pitch.y,
            );
            bricks.push(Obstacle::new(Aabb::from_pos_size(pos, config.brick_size)));
        }
    }
    bricks
}

/// Advance one tick
pub fn step(
    prev: &BreakoutState,
    input: &ControlInput,
    config: &BreakoutConfig,
    privileged: bool,
) -> (BreakoutState, Vec<GameEvent>) {
    let mut next = prev.clone();
    let mut events = Vec::new();
    let field = config.field;

    if let Some(pointer) = input.pointer {
        next.paddle.pos.x = clamp_controller(pointer.x, config.paddle_size.x, field.width);
    }

    integrate(&mut next.ball);
    if reflect_off_walls(&mut next.ball, &field, Walls::SIDES_AND_TOP).any() {
        events.push(GameEvent::Bounced);
    }

    // Paddle: only while falling, recomputed from where the ball struck
    let paddle = next.paddle.aabb();
    let ball = next.ball.aabb();
    let rest_y = paddle.min.y - next.ball.size.y;
    if prev.ball.vel.y > 0.0
        && ball.min.y >= rest_y
        && ball.min.y <= paddle.max.y
        && ball.max.x >= paddle.min.x
        && ball.min.x <= paddle.max.x
    {
        let ratio = (next.ball.center().x - paddle.min.x) / paddle.width();
        next.ball.vel = paddle_deflection(ratio, prev.ball.speed(), 1.0);
        next.ball.pos.y = rest_y;
        events.push(GameEvent::Bounced);
    }

    if consume_first(&next.ball, &mut next.bricks).is_some() {
        next.ball.vel.y = -next.ball.vel.y;
        events.push(GameEvent::Scored(config.brick_points));
    }

    // Floor is terminal
    let floor = field.max_pos(next.ball.size).y;
    if next.ball.pos.y >= floor {
        if privileged {
            next.ball.pos.y = floor;
            next.ball.vel.y = -next.ball.vel.y.abs();
            events.push(GameEvent::Bounced);
        } else {
            next.ball = config.spawn_ball();
            events.push(GameEvent::LifeLost);
        }
    }

    if all_cleared(&next.bricks) {
        events.push(GameEvent::Won);
    }

    (next, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cfg() -> BreakoutConfig {
        BreakoutConfig::default()
    }

    #[test]
    fn test_initial_layout() {
        let config = cfg();
        let state = BreakoutState::new(&config);
        assert_eq!(state.bricks.len(), 32);
        assert_eq!(state.bricks[0].bounds.min, Vec2::new(4.0, 40.0));
        assert_eq!(state.bricks[31].bounds.min, Vec2::new(4.0 + 7.0 * 59.0, 40.0 + 3.0 * 24.0));
        assert_eq!(state.paddle.pos, Vec2::new(200.0, 368.0));
    }

    #[test]
    fn test_paddle_hit_center_goes_straight_up() {
        let config = cfg();
        let mut state = BreakoutState::new(&config);
        state.bricks.clear();
        state.bricks.push(Obstacle::new(Aabb::from_pos_size(Vec2::ZERO, Vec2::splat(1.0))));
        // Ball centred over the paddle, about to land
        state.ball = Body::new(Vec2::new(235.0, 355.0), Vec2::new(0.0, 4.0), Vec2::splat(10.0));
        let (next, events) = step(&state, &ControlInput::default(), &config, false);
        assert!(events.contains(&GameEvent::Bounced));
        assert_eq!(next.ball.pos.y, 358.0);
        assert!(next.ball.vel.x.abs() < 1e-4);
        assert!((next.ball.vel.y + 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_paddle_ignored_while_rising() {
        let config = cfg();
        let mut state = BreakoutState::new(&config);
        state.ball = Body::new(Vec2::new(235.0, 362.0), Vec2::new(0.0, -4.0), Vec2::splat(10.0));
        let (next, _) = step(&state, &ControlInput::default(), &config, false);
        assert_eq!(next.ball.vel, Vec2::new(0.0, -4.0));
        assert_eq!(next.ball.pos.y, 358.0);
    }

    #[test]
    fn test_paddle_edge_deflects_sideways() {
        let config = cfg();
        let mut state = BreakoutState::new(&config);
        // Ball centre at the paddle's right edge
        state.ball = Body::new(Vec2::new(275.0, 355.0), Vec2::new(0.0, 4.0), Vec2::splat(10.0));
        let (next, _) = step(&state, &ControlInput::default(), &config, false);
        assert!(next.ball.vel.x > 0.0);
        assert!(next.ball.vel.y < 0.0);
        assert!((next.ball.speed() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_brick_consumed_once_per_tick() {
        let config = cfg();
        let mut state = BreakoutState::new(&config);
        // Straddle the gap between bricks 0 and 1 on row 3
        let row3 = state.bricks[24].bounds;
        state.ball = Body::new(
            Vec2::new(row3.max.x - 3.0, row3.max.y + 2.0),
            Vec2::new(0.0, -4.0),
            Vec2::splat(10.0),
        );
        let (next, events) = step(&state, &ControlInput::default(), &config, false);
        assert_eq!(next.bricks_left(), 31);
        assert!(!next.bricks[24].active);
        assert!(next.bricks[25].active);
        assert!(events.contains(&GameEvent::Scored(10)));
        assert_eq!(next.ball.vel.y, 4.0);
    }

    #[test]
    fn test_floor_loses_life_normally() {
        let config = cfg();
        let mut state = BreakoutState::new(&config);
        state.ball = Body::new(Vec2::new(20.0, 388.0), Vec2::new(0.0, 4.0), Vec2::splat(10.0));
        let (next, events) = step(&state, &ControlInput::default(), &config, false);
        assert!(events.contains(&GameEvent::LifeLost));
        assert_eq!(next.ball.pos, config.ball_spawn);
        assert_eq!(next.ball.vel, config.ball_velocity);
    }

    #[test]
    fn test_floor_bounces_when_privileged() {
        let config = cfg();
        let mut state = BreakoutState::new(&config);
        state.ball = Body::new(Vec2::new(20.0, 388.0), Vec2::new(1.0, 4.0), Vec2::splat(10.0));
        let (next, events) = step(&state, &ControlInput::default(), &config, true);
        assert!(!events.contains(&GameEvent::LifeLost));
        assert!(events.contains(&GameEvent::Bounced));
        assert_eq!(next.ball.pos.y, 390.0);
        assert_eq!(next.ball.vel, Vec2::new(1.0, -4.0));
    }

    #[test]
    fn test_last_brick_wins() {
        let config = cfg();
        let mut state = BreakoutState::new(&config);
        for brick in state.bricks.iter_mut().skip(1) {
            brick.active = false;
        }
        let first = state.bricks[0].bounds;
        state.ball = Body::new(
            Vec2::new(first.min.x + 5.0, first.max.y + 1.0),
            Vec2::new(0.0, -4.0),
            Vec2::splat(10.0),
        );
        let (next, events) = step(&state, &ControlInput::default(), &config, false);
        assert_eq!(next.bricks_left(), 0);
        assert!(events.contains(&GameEvent::Won));
    }

    #[test]
    fn test_pointer_clamped_to_field() {
        let config = cfg();
        let state = BreakoutState::new(&config);
        let input = ControlInput {
            pointer: Some(Vec2::new(-300.0, 0.0)),
            press: false,
        };
        let (next, _) = step(&state, &input, &config, false);
        assert_eq!(next.paddle.pos.x, 0.0);
    }

    proptest! {
        #[test]
        fn prop_ball_stays_in_field(
            pointer_xs in proptest::collection::vec(-100.0f32..600.0, 1..300),
            privileged in any::<bool>(),
        ) {
            let config = cfg();
            let mut state = BreakoutState::new(&config);
            for x in pointer_xs {
                let input = ControlInput { pointer: Some(Vec2::new(x, 0.0)), press: false };
                let (next, _) = step(&state, &input, &config, privileged);
                prop_assert!(config.field.contains(&next.ball));
                prop_assert!(config.field.contains(&next.paddle));
                state = next;
            }
        }
    }
}
