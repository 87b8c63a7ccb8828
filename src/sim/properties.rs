//! Data-driven entity properties
//!
//! Properties come from level definitions and never change during play.
//! Every record is checked by `validate()` when a `LevelConfig` or
//! `TierTable` is assembled, so a bad value is a configuration error
//! raised before any entity exists.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A property value broke its precondition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("enemy velocity range is inverted: min {min} > max {max}")]
    VelocityRange { min: f32, max: f32 },
    #[error("enemy tier table is empty")]
    NoTiers,
    #[error("enemy tiers must run contiguously from 1; tier {0} is missing")]
    MissingTier(u8),
    #[error("at most {max} enemy tiers are supported (got {count})")]
    TooManyTiers { count: usize, max: u8 },
    #[error("no levels configured")]
    NoLevels,
    #[error("unknown level id {id} ({count} levels configured)")]
    UnknownLevel { id: usize, count: usize },
    #[error("no spawn point at least {min_distance} away from the player fits on screen")]
    NoSafeSpawn { min_distance: f32 },
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// A weapon and the projectiles it fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletProperties {
    pub damage: f32,
    /// Projectile speed (units per tick)
    pub speed: f32,
    /// Played on every discharge
    pub sound: String,
    /// Minimum time between shots (ms)
    pub reload_ms: u64,
    pub image: String,
}

impl BulletProperties {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("bullet damage", self.damage)?;
        positive("bullet speed", self.speed)?;
        positive("weapon reload", self.reload_ms as f32)
    }
}

/// Properties of one enemy tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProperties {
    pub damage: f32,
    pub armor: f32,
    pub min_velocity: f32,
    pub max_velocity: f32,
    /// Spin is picked per enemy in [-max_rotation, max_rotation] degrees/tick
    #[serde(default)]
    pub max_rotation: f32,
    /// Sprite scale for this tier
    pub scale: f32,
    /// Enemies spawned one tier down when this one is destroyed
    pub child_count: u32,
    pub sound_on_destroy: String,
    pub sound_on_impact: String,
    pub image: String,
    pub destroy_animation: String,
}

impl EnemyProperties {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("enemy damage", self.damage)?;
        positive("enemy armor", self.armor)?;
        non_negative("enemy min_velocity", self.min_velocity)?;
        non_negative("enemy max_velocity", self.max_velocity)?;
        if self.min_velocity > self.max_velocity {
            return Err(ConfigError::VelocityRange {
                min: self.min_velocity,
                max: self.max_velocity,
            });
        }
        positive("enemy scale", self.scale)
    }
}

/// Tier → properties mapping shared by every enemy of a level.
///
/// Tiers run contiguously from 1 (terminal) up to `top_tier()`.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    /// Index 0 holds tier 1
    tiers: Vec<EnemyProperties>,
}

impl TierTable {
    /// Build from tier properties ordered tier 1 first
    pub fn new(tiers: Vec<EnemyProperties>) -> Result<Self, ConfigError> {
        if tiers.is_empty() {
            return Err(ConfigError::NoTiers);
        }
        if tiers.len() > u8::MAX as usize {
            return Err(ConfigError::TooManyTiers {
                count: tiers.len(),
                max: u8::MAX,
            });
        }
        for tier in &tiers {
            tier.validate()?;
        }
        Ok(Self { tiers })
    }

    /// Build from an explicit `tier → properties` map (tiers must be 1..=N)
    pub fn from_map(map: BTreeMap<u8, EnemyProperties>) -> Result<Self, ConfigError> {
        let count = map.len();
        let mut tiers = Vec::with_capacity(count);
        // A 256th key can only be tier 0, which fails the first comparison
        for (expected, (tier, props)) in (1..=u8::MAX).zip(map) {
            if tier != expected {
                return Err(ConfigError::MissingTier(expected));
            }
            tiers.push(props);
        }
        Self::new(tiers)
    }

    /// Highest tier; new enemies start here
    pub fn top_tier(&self) -> u8 {
        self.tiers.len() as u8
    }

    /// Properties of a tier (clamped into 1..=top_tier)
    pub fn get(&self, tier: u8) -> &EnemyProperties {
        let index = tier.clamp(1, self.top_tier()) as usize - 1;
        &self.tiers[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &EnemyProperties)> {
        (1..=u8::MAX).zip(self.tiers.iter())
    }
}

/// Player ship properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProperties {
    pub damage: f32,
    pub armor: f32,
    /// Degrees turned per rotate input
    pub maneuverability: f32,
    /// Velocity gained per thrust input
    pub acceleration: f32,
    pub sound_on_impact: String,
    pub image: String,
    pub destroy_animation: String,
    pub primary_weapon: BulletProperties,
    pub secondary_weapon: BulletProperties,
}

impl PlayerProperties {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("player damage", self.damage)?;
        positive("player armor", self.armor)?;
        positive("player maneuverability", self.maneuverability)?;
        positive("player acceleration", self.acceleration)?;
        self.primary_weapon.validate()?;
        self.secondary_weapon.validate()
    }
}

/// Everything needed to build a fresh `Level`
#[derive(Debug, Clone)]
pub struct LevelConfig {
    pub name: String,
    pub background: String,
    /// Looped while the level runs
    pub soundtrack: String,
    pub player: PlayerProperties,
    /// Enemies spawned at the top tier when the level starts
    pub enemy_count: u32,
    /// Enemies never spawn closer than this to the player
    pub min_spawn_distance: f32,
    pub tiers: Arc<TierTable>,
}

impl LevelConfig {
    pub fn new(
        name: impl Into<String>,
        background: impl Into<String>,
        soundtrack: impl Into<String>,
        player: PlayerProperties,
        enemy_count: u32,
        min_spawn_distance: f32,
        tiers: TierTable,
    ) -> Result<Self, ConfigError> {
        player.validate()?;
        non_negative("min_spawn_distance", min_spawn_distance)?;
        Ok(Self {
            name: name.into(),
            background: background.into(),
            soundtrack: soundtrack.into(),
            player,
            enemy_count,
            min_spawn_distance,
            tiers: Arc::new(tiers),
        })
    }
}
