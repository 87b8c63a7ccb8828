//! Entity geometry and screen bounds
//!
//! `Geometry` is a small `Copy` value: every position/velocity change
//! produces a fresh value, so a geometry read during a tick can never be
//! mutated underneath the reader.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Position, collision radius and per-tick velocity of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    position: Vec2,
    radius: f32,
    velocity: Vec2,
}

impl Geometry {
    pub fn new(position: Vec2, radius: f32, velocity: Vec2) -> Self {
        debug_assert!(radius >= 0.0, "geometry radius must be non-negative");
        Self {
            position,
            radius: radius.max(0.0),
            velocity,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Same geometry at a new position
    #[must_use]
    pub fn update_position(&self, position: Vec2) -> Self {
        Self { position, ..*self }
    }

    /// Same geometry with a new velocity
    #[must_use]
    pub fn update_velocity(&self, velocity: Vec2) -> Self {
        Self { velocity, ..*self }
    }

    /// Advance one tick of Euler integration (`position += velocity`)
    #[must_use]
    pub fn integrate(&self) -> Self {
        self.update_position(self.position + self.velocity)
    }

    /// Rescale after a window resize.
    ///
    /// Position and velocity scale per axis; the radius follows the
    /// horizontal factor, matching sprites scaled from their width.
    #[must_use]
    pub fn resized(&self, factor: Vec2) -> Self {
        Self::new(
            self.position * factor,
            self.radius * factor.x.abs(),
            self.velocity * factor,
        )
    }
}

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Bounds of a screen of the given size anchored at the origin
    pub fn from_size(size: Vec2) -> Self {
        Self::new(Vec2::ZERO, size)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Whether a point lies inside (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Uniformly random point inside the bounds
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let size = self.size();
        Vec2::new(
            self.min.x + rng.random::<f32>() * size.x,
            self.min.y + rng.random::<f32>() * size.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn vec2() -> impl Strategy<Value = Vec2> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Vec2::new(x, y))
    }

    proptest! {
        #[test]
        fn prop_update_position_keeps_radius_and_velocity(
            pos in vec2(), vel in vec2(), radius in 0.0f32..200.0, new_pos in vec2()
        ) {
            let g = Geometry::new(pos, radius, vel);
            let moved = g.update_position(new_pos);
            prop_assert_eq!(moved.position(), new_pos);
            prop_assert_eq!(moved.radius(), radius);
            prop_assert_eq!(moved.velocity(), vel);
            // Original is untouched
            prop_assert_eq!(g.position(), pos);
        }

        #[test]
        fn prop_update_velocity_keeps_radius_and_position(
            pos in vec2(), vel in vec2(), radius in 0.0f32..200.0, new_vel in vec2()
        ) {
            let g = Geometry::new(pos, radius, vel);
            let changed = g.update_velocity(new_vel);
            prop_assert_eq!(changed.velocity(), new_vel);
            prop_assert_eq!(changed.radius(), radius);
            prop_assert_eq!(changed.position(), pos);
            prop_assert_eq!(g.velocity(), vel);
        }
    }

    #[test]
    fn test_integrate() {
        let g = Geometry::new(Vec2::new(10.0, 10.0), 5.0, Vec2::new(2.0, -3.0));
        let next = g.integrate();
        assert_eq!(next.position(), Vec2::new(12.0, 7.0));
        assert_eq!(next.velocity(), g.velocity());
    }

    #[test]
    fn test_resized_scales_all_fields() {
        let g = Geometry::new(Vec2::new(100.0, 50.0), 10.0, Vec2::new(4.0, 2.0));
        let r = g.resized(Vec2::new(2.0, 0.5));
        assert_eq!(r.position(), Vec2::new(200.0, 25.0));
        assert_eq!(r.velocity(), Vec2::new(8.0, 1.0));
        assert!((r.radius() - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounds_contains() {
        let b = Bounds::from_size(Vec2::new(800.0, 600.0));
        assert!(b.contains(Vec2::new(0.0, 0.0)));
        assert!(b.contains(Vec2::new(400.0, 300.0)));
        assert!(!b.contains(Vec2::new(-1.0, 300.0)));
        assert!(!b.contains(Vec2::new(400.0, 601.0)));
        assert_eq!(b.center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_random_point_inside() {
        let b = Bounds::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert!(b.contains(b.random_point(&mut rng)));
        }
    }
}
