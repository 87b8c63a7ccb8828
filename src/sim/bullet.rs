//! Projectiles
//!
//! Bullets fly straight with no edge bounce; the level drops them once
//! they leave the screen.

use std::sync::Arc;

use glam::Vec2;

use super::geometry::Geometry;
use super::properties::BulletProperties;

/// A projectile fired by the player
#[derive(Debug, Clone)]
pub struct Bullet {
    pub geometry: Geometry,
    weapon: Arc<BulletProperties>,
}

impl Bullet {
    pub fn new(weapon: Arc<BulletProperties>, position: Vec2, radius: f32, velocity: Vec2) -> Self {
        Self {
            geometry: Geometry::new(position, radius, velocity),
            weapon,
        }
    }

    /// Damage dealt to whatever this bullet hits
    pub fn damage(&self) -> f32 {
        self.weapon.damage
    }

    pub fn image(&self) -> &str {
        &self.weapon.image
    }

    pub fn weapon(&self) -> &BulletProperties {
        &self.weapon
    }

    /// Plain Euler step
    pub fn advance(&mut self) {
        self.geometry = self.geometry.integrate();
    }
}
