//! Collision detection and response for axis-aligned boxes
//!
//! Every body in the arcade world is a box. Blocking contacts are resolved
//! along one axis only, chosen from where the moving box was before the step,
//! so landing on a platform never pushes the player sideways and walking into
//! a platform's side never lifts them on top of it.

use glam::Vec2;

/// Axis-aligned box described by its centre and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size / 2.0,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict intersection; touching edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        d.x < self.half.x + other.half.x && d.y < self.half.y + other.half.y
    }

    /// Intersection depth per axis (non-positive components mean no overlap)
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        let d = (self.center - other.center).abs();
        self.half + other.half - d
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal, pointing from the obstacle toward the moving box
    pub normal: Vec2,
    /// Penetration depth along the normal (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a moving box against an obstacle
///
/// `previous` is where the moving box was before this step. If it already
/// overlapped the obstacle vertically, the contact is a side contact and is
/// resolved on x; otherwise it came from above or below and is resolved on y.
pub fn aabb_collision(moving: &Aabb, previous: &Aabb, obstacle: &Aabb) -> CollisionResult {
    if !moving.intersects(obstacle) {
        return CollisionResult::miss();
    }

    let overlap = moving.overlap(obstacle);
    let prev_overlap = previous.overlap(obstacle);

    // Came in from the side if the previous box already spanned the obstacle's height
    let side_contact = prev_overlap.y > 0.0 && prev_overlap.x <= 0.0;
    // Fully embedded from the start: take the shallower axis
    let embedded = prev_overlap.x > 0.0 && prev_overlap.y > 0.0;
    let resolve_x = side_contact || (embedded && overlap.x < overlap.y);

    if resolve_x {
        let dir = if moving.center.x < obstacle.center.x { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(dir, 0.0),
            penetration: overlap.x,
        }
    } else {
        let dir = if moving.center.y < obstacle.center.y { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, dir),
            penetration: overlap.y,
        }
    }
}

/// Reflect one velocity component off a surface with the given restitution
///
/// Only the sign and scale of `v` change; the caller keeps the other axis as is.
#[inline]
pub fn bounce_axis(v: f32, restitution: f32) -> f32 {
    -v * restitution
}

/// Apply a contact to a velocity
///
/// The component along the normal is reflected (restitution 0 stops it),
/// but only when it points into the obstacle. The tangential component is
/// untouched.
pub fn resolve_velocity(vel: Vec2, normal: Vec2, bounce: Vec2) -> Vec2 {
    let mut out = vel;
    if normal.x != 0.0 && vel.x * normal.x < 0.0 {
        out.x = bounce_axis(vel.x, bounce.x);
    }
    if normal.y != 0.0 && vel.y * normal.y < 0.0 {
        out.y = bounce_axis(vel.y, bounce.y);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_landing_resolves_vertically() {
        let platform = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(200.0, 32.0));
        // Player above the platform, then sinks 4px into its top
        let previous = Aabb::new(Vec2::new(100.0, 58.0), Vec2::new(32.0, 48.0));
        let moving = Aabb::new(Vec2::new(100.0, 64.0), Vec2::new(32.0, 48.0));

        let result = aabb_collision(&moving, &previous, &platform);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!((result.penetration - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_side_contact_resolves_horizontally() {
        let platform = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(200.0, 32.0));
        // Box level with the platform approaching its right edge
        let previous = Aabb::new(Vec2::new(215.0, 100.0), Vec2::new(26.0, 18.0));
        let moving = Aabb::new(Vec2::new(211.0, 100.0), Vec2::new(26.0, 18.0));

        let result = aabb_collision(&moving, &previous, &platform);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(1.0, 0.0));
        assert!((result.penetration - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_touching_edges_is_a_miss() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.intersects(&b));
        assert!(!aabb_collision(&a, &a, &b).hit);
    }

    #[test]
    fn test_resolve_velocity_ignores_separating_motion() {
        // Already moving away from the surface: nothing to reflect
        let vel = Vec2::new(50.0, -20.0);
        let out = resolve_velocity(vel, Vec2::new(0.0, -1.0), Vec2::new(1.0, 1.0));
        assert_eq!(out, vel);
    }

    proptest! {
        #[test]
        fn elastic_horizontal_bounce_preserves_speed(vx in -500.0f32..500.0, vy in -500.0f32..500.0) {
            prop_assume!(vx.abs() > 0.001);
            // Wall on whichever side the body is moving toward
            let normal = Vec2::new(-vx.signum(), 0.0);
            let out = resolve_velocity(Vec2::new(vx, vy), normal, Vec2::new(1.0, 0.0));
            prop_assert_eq!(out.x, -vx);
            prop_assert_eq!(out.y, vy);
        }
    }
}
