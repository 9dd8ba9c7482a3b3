//! Flappy: gravity-bound bird threading scrolling pipe gaps

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::event::GameEvent;
use super::motion::{Body, ControlInput, Field};
use crate::policy::Tuned;

/// Flappy tuning (per-tick units)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyConfig {
    pub field: Field,
    pub bird_x: f32,
    pub bird_size: f32,
    pub gravity: f32,
    pub flap_velocity: f32,
    pub pipe_width: f32,
    pub pipe_gap: f32,
    pub pipe_speed: f32,
    /// A new pipe spawns once the newest one is this far in from the right edge
    pub pipe_spacing: f32,
    /// Minimum height of the top and bottom pipe sections
    pub pipe_min_section: f32,
    /// Bird box shrink applied to pipe tests
    pub collision_margin: Tuned<f32>,
    /// Height above the floor that a privileged bird cannot sink below
    pub floor_lift: f32,
}

impl Default for FlappyConfig {
    fn default() -> Self {
        Self {
            field: Field::new(400.0, 500.0),
            bird_x: 80.0,
            bird_size: 30.0,
            gravity: 0.5,
            flap_velocity: -9.0,
            pipe_width: 60.0,
            pipe_gap: 180.0,
            pipe_speed: 3.0,
            pipe_spacing: 200.0,
            pipe_min_section: 50.0,
            collision_margin: Tuned::new(0.0, 25.0),
            floor_lift: 50.0,
        }
    }
}

/// A pipe pair with a gap starting at `gap_top`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub x: f32,
    pub gap_top: f32,
    pub passed: bool,
}

impl Pipe {
    pub fn top_section(&self, config: &FlappyConfig) -> Aabb {
        Aabb::new(Vec2::new(self.x, 0.0), Vec2::new(self.x + config.pipe_width, self.gap_top))
    }

    pub fn bottom_section(&self, config: &FlappyConfig) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, self.gap_top + config.pipe_gap),
            Vec2::new(self.x + config.pipe_width, config.field.height),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlappyState {
    pub bird: Body,
    pub pipes: Vec<Pipe>,
}

impl FlappyState {
    pub fn new(config: &FlappyConfig) -> Self {
        Self {
            bird: Body::new(
                Vec2::new(config.bird_x, config.field.height / 2.0),
                Vec2::ZERO,
                Vec2::splat(config.bird_size),
            ),
            pipes: Vec::new(),
        }
    }
}

/// Gap placement: random band normally, centred on the bird when privileged
fn next_gap_top(config: &FlappyConfig, bird_y: f32, privileged: bool, rng: &mut impl Rng) -> f32 {
    let height = config.field.height;
    let gap = config.pipe_gap;
    let raw = if privileged {
        bird_y - gap / 2.0 + rng.random::<f32>() * 20.0 - 10.0
    } else {
        100.0 + rng.random::<f32>() * (height - 200.0 - gap)
    };
    // An oversized gap collapses the band onto its lower bound
    let lo = config.pipe_min_section;
    let hi = (height - gap - config.pipe_min_section).max(lo);
    raw.clamp(lo, hi)
}

/// Advance one tick
pub fn step(
    prev: &FlappyState,
    input: &ControlInput,
    config: &FlappyConfig,
    privileged: bool,
    rng: &mut impl Rng,
) -> (FlappyState, Vec<GameEvent>) {
    let mut next = prev.clone();
    let mut events = Vec::new();
    let field = config.field;
    let ceiling_floor = field.max_pos(next.bird.size).y;

    if input.press {
        next.bird.vel.y = config.flap_velocity;
    }

    next.bird.pos.y += next.bird.vel.y;
    next.bird.vel.y += config.gravity;
    if privileged {
        let raised_floor = ceiling_floor - config.floor_lift;
        if next.bird.pos.y > raised_floor {
            next.bird.pos.y = raised_floor;
            next.bird.vel.y = next.bird.vel.y.min(0.0);
        }
    }

    for pipe in &mut next.pipes {
        pipe.x -= config.pipe_speed;
    }
    next.pipes.retain(|p| p.x > -config.pipe_width);
    let needs_pipe = next
        .pipes
        .last()
        .is_none_or(|p| p.x < field.width - config.pipe_spacing);
    if needs_pipe {
        next.pipes.push(Pipe {
            x: field.width,
            gap_top: next_gap_top(config, prev.bird.pos.y, privileged, rng),
            passed: false,
        });
    }

    // Ceiling and ground are terminal
    if next.bird.pos.y < 0.0 || next.bird.pos.y > ceiling_floor {
        next.bird.pos.y = next.bird.pos.y.clamp(0.0, ceiling_floor);
        if privileged {
            next.bird.vel.y = 0.0;
            events.push(GameEvent::Bounced);
        } else {
            events.push(GameEvent::Crashed);
            return (next, events);
        }
    }

    let margin = config.collision_margin.pick(privileged);
    let bird_left = next.bird.pos.x;
    for pipe in &mut next.pipes {
        let bird = next.bird.aabb();
        let in_column = bird.max.x > pipe.x && bird.min.x < pipe.x + config.pipe_width;
        if in_column {
            let hitbox = bird.shrink(margin);
            let gap_bottom = pipe.gap_top + config.pipe_gap;
            if hitbox.min.y < pipe.gap_top || hitbox.max.y > gap_bottom {
                if !privileged {
                    events.push(GameEvent::Crashed);
                    return (next, events);
                }
                // Nudge into the gap instead of dying
                let lo = pipe.gap_top - margin;
                let hi = (gap_bottom - next.bird.size.y + margin).max(lo);
                next.bird.pos.y = next.bird.pos.y.clamp(lo, hi);
                next.bird.vel.y = 0.0;
                events.push(GameEvent::Bounced);
            }
        }

        if !pipe.passed && pipe.x + config.pipe_width < bird_left {
            pipe.passed = true;
            events.push(GameEvent::Scored(1));
        }
    }

    (next, events)
}
