//! The player's ship

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::collision::{bounce_edge, bounce_other};
use super::events::{AnimationRequest, Destruction, HitOutcome};
use super::geometry::{Bounds, Geometry};
use super::properties::{BulletProperties, PlayerProperties};
use crate::consts::*;
use crate::{UP, angle_between_degrees, rotate_degrees};

/// Which weapon fires on the next shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveWeapon {
    #[default]
    Primary,
    Secondary,
}

impl ActiveWeapon {
    pub fn toggled(self) -> Self {
        match self {
            ActiveWeapon::Primary => ActiveWeapon::Secondary,
            ActiveWeapon::Secondary => ActiveWeapon::Primary,
        }
    }
}

/// A weapon with the collision radius of its projectile sprite
#[derive(Debug, Clone)]
pub struct Weapon {
    pub properties: Arc<BulletProperties>,
    pub bullet_radius: f32,
}

impl Weapon {
    pub fn new(properties: BulletProperties, bullet_radius: f32) -> Self {
        Self {
            properties: Arc::new(properties),
            bullet_radius,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub geometry: Geometry,
    properties: PlayerProperties,
    /// Facing direction (unit vector, screen coordinates)
    direction: Vec2,
    armor: f32,
    active_weapon: ActiveWeapon,
    primary: Weapon,
    secondary: Weapon,
    /// Time of the last discharge (ms); `None` until the first shot
    last_shot_ms: Option<u64>,
}

impl Player {
    pub fn new(properties: PlayerProperties, geometry: Geometry, primary: Weapon, secondary: Weapon) -> Self {
        Self {
            geometry,
            armor: properties.armor,
            properties,
            direction: UP,
            active_weapon: ActiveWeapon::Primary,
            primary,
            secondary,
            last_shot_ms: None,
        }
    }

    pub fn armor(&self) -> f32 {
        self.armor
    }

    pub fn damage(&self) -> f32 {
        self.properties.damage
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn image(&self) -> &str {
        &self.properties.image
    }

    pub fn properties(&self) -> &PlayerProperties {
        &self.properties
    }

    pub fn active_weapon(&self) -> ActiveWeapon {
        self.active_weapon
    }

    pub fn is_alive(&self) -> bool {
        self.armor > 0.0
    }

    /// Clockwise rotation of the sprite relative to "up" (degrees)
    pub fn heading_degrees(&self) -> f32 {
        angle_between_degrees(UP, self.direction)
    }

    fn weapon(&self) -> &Weapon {
        match self.active_weapon {
            ActiveWeapon::Primary => &self.primary,
            ActiveWeapon::Secondary => &self.secondary,
        }
    }

    /// Turn by `maneuverability` degrees
    pub fn rotate(&mut self, clockwise: bool) {
        if !self.is_alive() {
            return;
        }
        let sign = if clockwise { 1.0 } else { -1.0 };
        self.direction = rotate_degrees(self.direction, self.properties.maneuverability * sign).normalize();
    }

    /// Thrust along the facing direction, capped at `MAX_PLAYER_SPEED`
    pub fn accelerate(&mut self) {
        if !self.is_alive() {
            return;
        }
        let velocity = self.geometry.velocity() + self.direction * self.properties.acceleration;
        self.geometry = self.geometry.update_velocity(velocity.clamp_length_max(MAX_PLAYER_SPEED));
    }

    /// Swap primary/secondary; returns the feedback sound
    pub fn switch_weapon(&mut self) -> &'static str {
        self.active_weapon = self.active_weapon.toggled();
        SOUND_CHANGE_WEAPON
    }

    /// Fire the active weapon if it has reloaded.
    ///
    /// `scale` is the display resize factor applied to the projectile
    /// velocity.
    pub fn shoot(&mut self, now_ms: u64, scale: Vec2) -> Option<Bullet> {
        if !self.is_alive() {
            return None;
        }
        let weapon = self.weapon();
        let reload_ms = weapon.properties.reload_ms;
        if self
            .last_shot_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < reload_ms)
        {
            return None;
        }

        let velocity = self.direction * weapon.properties.speed * scale;
        let bullet = Bullet::new(
            Arc::clone(&weapon.properties),
            self.geometry.position(),
            weapon.bullet_radius,
            velocity,
        );
        self.last_shot_ms = Some(now_ms);
        Some(bullet)
    }

    /// Take `damage` from something at `other`.
    ///
    /// While armor remains the ship bounces away from the impactor.
    /// Crossing zero happens once; later hits are ignored.
    pub fn hit(&mut self, other: &Geometry, damage: f32, scale: Vec2) -> HitOutcome {
        if !self.is_alive() {
            return HitOutcome::Ignored;
        }

        self.armor -= damage;
        let sound = self.properties.sound_on_impact.clone();
        if self.is_alive() {
            self.geometry = bounce_other(&self.geometry, other);
            return HitOutcome::Impact { sound };
        }

        log::info!("Player destroyed at {:?}", self.geometry.position());
        HitOutcome::Destroyed(Destruction {
            sound,
            animation: AnimationRequest {
                id: self.properties.destroy_animation.clone(),
                position: self.geometry.position(),
                resize: Some(Vec2::splat(PLAYER_DESTROY_ANIM_SIZE) * scale),
            },
            split: None,
        })
    }

    /// Move one tick, bouncing off the screen edges
    pub fn move_within(&mut self, bounds: Bounds) {
        if !self.is_alive() {
            return;
        }
        self.geometry = bounce_edge(bounds, PLAYER_EDGE_OFFSET, PLAYER_EDGE_DAMPING, &self.geometry);
    }

    /// Rescale geometry and projectile radii after a window resize
    pub fn resize(&mut self, factor: Vec2) {
        self.geometry = self.geometry.resized(factor);
        self.primary.bullet_radius *= factor.x.abs();
        self.secondary.bullet_radius *= factor.x.abs();
    }
}
