//! Collision primitives for rectangular and circular bodies
//!
//! Everything here is a pure function of its inputs. Games build their
//! rules on top of these tests; none of them mutate state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
///
/// Edge strictness is chosen by the caller via `overlaps` / `touches`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from its top-left corner and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }

    /// Inclusive overlap: touching edges count as contact
    pub fn touches(&self, other: &Aabb) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }

    /// Shrink the box by `margin` on every side (never inverts)
    pub fn shrink(&self, margin: f32) -> Aabb {
        let center = self.center();
        let half = ((self.max - self.min) * 0.5 - Vec2::splat(margin)).max(Vec2::ZERO);
        Aabb {
            min: center - half,
            max: center + half,
        }
    }

    /// Closest point inside the box to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Circle vs AABB intersection (touching counts)
pub fn circle_aabb_overlap(center: Vec2, radius: f32, aabb: &Aabb) -> bool {
    let closest = aabb.closest_point(center);
    (center - closest).length_squared() <= radius * radius
}

/// Circle vs circle intersection (touching counts)
pub fn circle_circle_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    (a - b).length_squared() <= r * r
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Full fan of paddle deflection angles (±30° around the paddle normal)
pub const MAX_DEFLECTION: f32 = std::f32::consts::PI / 3.0;

/// Angle-of-incidence control for a paddle hit
///
/// `ratio` is where the body struck along the paddle, 0 at the left edge and
/// 1 at the right (clamped). The result keeps `speed` and leaves along
/// `(sin θ, -|cos θ| · away)` with `θ = (ratio - 0.5) · π/3`, so `away = 1`
/// sends the body up the screen.
pub fn paddle_deflection(ratio: f32, speed: f32, away: f32) -> Vec2 {
    let ratio = ratio.clamp(0.0, 1.0);
    let theta = (ratio - 0.5) * MAX_DEFLECTION;
    Vec2::new(
        theta.sin() * speed,
        -(theta.cos() * speed).abs() * away.signum(),
    )
}
