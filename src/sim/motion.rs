//! Continuous motion engine
//!
//! Shared building blocks for the ball/paddle/bird games. A game's `step`
//! clones the previous state, then applies in order:
//! 1. integrate (`position += velocity`, fixed step per tick)
//! 2. reflect off the reflective walls, clamping into the field
//! 3. controlled-body collision (only when moving toward it)
//! 4. obstacle consumption (first active hit in stored order)
//! 5. terminal boundary (policy decides: event or harmless bounce)
//! 6. win check
//!
//! Decisions always read the previous tick's state, writes go to the clone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Play field, origin at the top-left corner, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest top-left position a body of `size` may occupy
    #[inline]
    pub fn max_pos(&self, size: Vec2) -> Vec2 {
        Vec2::new(
            (self.width - size.x).max(0.0),
            (self.height - size.y).max(0.0),
        )
    }

    /// Whether a body lies entirely inside the field
    pub fn contains(&self, body: &Body) -> bool {
        let max = self.max_pos(body.size);
        body.pos.x >= 0.0 && body.pos.y >= 0.0 && body.pos.x <= max.x && body.pos.y <= max.y
    }
}

/// A movable rectangular entity (position is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, size: Vec2) -> Self {
        Self { pos, vel, size }
    }

    /// A body that never moves on its own (paddles)
    pub fn fixed(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Radius of the inscribed circle (round balls)
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size.x.min(self.size.y) * 0.5
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Which field edges reflect; the others are terminal or open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Walls {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Walls {
    pub const SIDES_AND_TOP: Walls = Walls {
        left: true,
        right: true,
        top: true,
        bottom: false,
    };
    pub const TOP_AND_BOTTOM: Walls = Walls {
        left: false,
        right: false,
        top: true,
        bottom: true,
    };
    pub const ALL: Walls = Walls {
        left: true,
        right: true,
        top: true,
        bottom: true,
    };
}

/// Axes that reflected this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reflection {
    pub x: bool,
    pub y: bool,
}

impl Reflection {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// A static rectangle that is consumed on contact (bricks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub bounds: Aabb,
    pub active: bool,
}

impl Obstacle {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            active: true,
        }
    }
}

/// Step 1: constant per-tick integration
#[inline]
pub fn integrate(body: &mut Body) {
    body.pos += body.vel;
}

/// Step 2: clamp into the field on every reflective edge that was reached,
/// pointing the matching velocity component back inside. Both axes may
/// reflect in the same tick.
pub fn reflect_off_walls(body: &mut Body, field: &Field, walls: Walls) -> Reflection {
    let max = field.max_pos(body.size);
    let mut reflection = Reflection::default();

    if walls.left && body.pos.x <= 0.0 {
        body.pos.x = 0.0;
        body.vel.x = body.vel.x.abs();
        reflection.x = true;
    } else if walls.right && body.pos.x >= max.x {
        body.pos.x = max.x;
        body.vel.x = -body.vel.x.abs();
        reflection.x = true;
    }

    if walls.top && body.pos.y <= 0.0 {
        body.pos.y = 0.0;
        body.vel.y = body.vel.y.abs();
        reflection.y = true;
    } else if walls.bottom && body.pos.y >= max.y {
        body.pos.y = max.y;
        body.vel.y = -body.vel.y.abs();
        reflection.y = true;
    }

    reflection
}

/// Clamp a controller coordinate so a paddle of `extent` stays inside
/// `[0, limit]`. Out-of-field pointers are clamped, never rejected.
#[inline]
pub fn clamp_controller(center: f32, extent: f32, limit: f32) -> f32 {
    let pos = center - extent * 0.5;
    if pos.is_nan() {
        return 0.0;
    }
    pos.clamp(0.0, (limit - extent).max(0.0))
}

/// Step 4: deactivate the first active obstacle the body overlaps.
/// Iteration order is storage order; later overlaps wait for a later tick.
pub fn consume_first(body: &Body, obstacles: &mut [Obstacle]) -> Option<usize> {
    let bounds = body.aabb();
    let hit = obstacles
        .iter()
        .position(|o| o.active && o.bounds.overlaps(&bounds))?;
    obstacles[hit].active = false;
    Some(hit)
}

/// Step 6: win when nothing active remains
pub fn all_cleared(obstacles: &[Obstacle]) -> bool {
    obstacles.iter().all(|o| !o.active)
}

/// Latched controls for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Last pointer position in field coordinates
    pub pointer: Option<Vec2>,
    /// Primary button pressed since the previous tick (one-shot)
    pub press: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_corner_scenario() {
        // Ball near the top-left corner heading up-left
        let field = Field::new(480.0, 400.0);
        let mut ball = Body::new(Vec2::new(3.0, 5.0), Vec2::new(-4.0, -4.0), Vec2::splat(10.0));
        integrate(&mut ball);
        let r = reflect_off_walls(&mut ball, &field, Walls::SIDES_AND_TOP);
        assert_eq!(ball.pos, Vec2::new(0.0, 1.0));
        assert_eq!(ball.vel, Vec2::new(4.0, -4.0));
        assert!(r.x && !r.y);
    }

    #[test]
    fn test_both_axes_reflect_same_tick() {
        let field = Field::new(100.0, 100.0);
        let mut ball = Body::new(Vec2::new(2.0, 2.0), Vec2::new(-5.0, -5.0), Vec2::splat(10.0));
        integrate(&mut ball);
        let r = reflect_off_walls(&mut ball, &field, Walls::ALL);
        assert!(r.x && r.y);
        assert_eq!(ball.pos, Vec2::ZERO);
        assert_eq!(ball.vel, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_open_edge_not_clamped() {
        let field = Field::new(100.0, 100.0);
        let mut ball = Body::new(Vec2::new(50.0, 95.0), Vec2::new(0.0, 10.0), Vec2::splat(10.0));
        integrate(&mut ball);
        let r = reflect_off_walls(&mut ball, &field, Walls::SIDES_AND_TOP);
        assert!(!r.any());
        assert_eq!(ball.pos.y, 105.0);
    }

    #[test]
    fn test_consume_first_in_storage_order() {
        let ball = Body::new(Vec2::new(10.0, 10.0), Vec2::ZERO, Vec2::splat(10.0));
        let mut obstacles = vec![
            Obstacle::new(Aabb::from_pos_size(Vec2::new(100.0, 100.0), Vec2::splat(5.0))),
            Obstacle::new(Aabb::from_pos_size(Vec2::new(12.0, 12.0), Vec2::splat(5.0))),
            Obstacle::new(Aabb::from_pos_size(Vec2::new(15.0, 15.0), Vec2::splat(5.0))),
        ];
        assert_eq!(consume_first(&ball, &mut obstacles), Some(1));
        assert!(!obstacles[1].active && obstacles[2].active);
        assert_eq!(consume_first(&ball, &mut obstacles), Some(2));
        assert_eq!(consume_first(&ball, &mut obstacles), None);
        assert!(!all_cleared(&obstacles));
    }

    #[test]
    fn test_clamp_controller() {
        assert_eq!(clamp_controller(-50.0, 80.0, 480.0), 0.0);
        assert_eq!(clamp_controller(1000.0, 80.0, 480.0), 400.0);
        assert_eq!(clamp_controller(240.0, 80.0, 480.0), 200.0);
        assert_eq!(clamp_controller(f32::NAN, 80.0, 480.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_reflective_walls_keep_body_inside(
            x in 0.0f32..470.0,
            y in 0.0f32..390.0,
            vx in -30.0f32..30.0,
            vy in -30.0f32..30.0,
            ticks in 1usize..200,
        ) {
            let field = Field::new(480.0, 400.0);
            let mut ball = Body::new(Vec2::new(x, y), Vec2::new(vx, vy), Vec2::splat(10.0));
            for _ in 0..ticks {
                integrate(&mut ball);
                reflect_off_walls(&mut ball, &field, Walls::ALL);
                prop_assert!(field.contains(&ball));
            }
        }
    }
}
