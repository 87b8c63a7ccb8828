//! Collision detection and bounce response
//!
//! Every entity is a circle. Gameplay collisions use a single
//! circle-overlap test; responses are simple per-axis velocity
//! reflections tuned for arcade feel rather than momentum conservation.

use glam::Vec2;

use super::geometry::{Bounds, Geometry};
use crate::consts::BOUNCE_THRESHOLD;

/// Circle-circle overlap: distance between centers < sum of radii
#[inline]
pub fn collides(a: &Geometry, b: &Geometry) -> bool {
    a.position().distance(b.position()) < a.radius() + b.radius()
}

/// Pixel-accurate overlap test provided by the rendering layer.
///
/// Consulted only after the circle test passes, to reject hits on
/// transparent sprite margins.
pub trait PixelMask {
    fn overlaps(&self, a: &Geometry, a_sprite: &str, b: &Geometry, b_sprite: &str) -> bool;
}

/// Circle test, optionally refined by a pixel mask
pub fn collides_masked(
    a: &Geometry,
    a_sprite: &str,
    b: &Geometry,
    b_sprite: &str,
    mask: Option<&dyn PixelMask>,
) -> bool {
    collides(a, b) && mask.is_none_or(|m| m.overlaps(a, a_sprite, b, b_sprite))
}

/// Integrate one tick and bounce off the screen edges.
///
/// Each axis is checked on its own: if the new position is within
/// `edge_offset` of a border and the velocity still points at it, the
/// component is reflected. Components at or above `BOUNCE_THRESHOLD` are
/// scaled by `damping` first; slower ones only flip so a resting entity
/// can't jitter forever against the wall.
pub fn bounce_edge(bounds: Bounds, edge_offset: f32, damping: f32, geometry: &Geometry) -> Geometry {
    let moved = geometry.integrate();
    let pos = moved.position();
    let vel = moved.velocity();

    let x = bounce_axis(pos.x, vel.x, bounds.min.x, bounds.max.x, edge_offset, damping);
    let y = bounce_axis(pos.y, vel.y, bounds.min.y, bounds.max.y, edge_offset, damping);

    moved.update_velocity(Vec2::new(x, y))
}

fn bounce_axis(pos: f32, vel: f32, min: f32, max: f32, edge_offset: f32, damping: f32) -> f32 {
    let near_min = pos < min + edge_offset && vel < 0.0;
    let near_max = pos > max - edge_offset && vel > 0.0;
    if !(near_min || near_max) {
        return vel;
    }

    let vel = if vel.abs() < BOUNCE_THRESHOLD { vel } else { vel * damping };
    -vel
}

/// Knock `subject` away from `other`.
///
/// On each axis the subject's velocity is forced to point away from
/// the other entity's position, keeping its magnitude. Only velocity
/// changes; the next move carries the subject clear.
pub fn bounce_other(subject: &Geometry, other: &Geometry) -> Geometry {
    let delta = other.position() - subject.position();
    let vel = subject.velocity();

    let away = |d: f32, v: f32| {
        if d > 0.0 {
            -v.abs()
        } else if d < 0.0 {
            v.abs()
        } else {
            v
        }
    };

    subject.update_velocity(Vec2::new(away(delta.x, vel.x), away(delta.y, vel.y)))
}
