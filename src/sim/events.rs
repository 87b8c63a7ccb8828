//! Values entities hand back instead of calling into their owners
//!
//! Hits, splits and shots return what should happen; the level applies
//! it after the current pass so no collection is mutated mid-iteration.

use glam::Vec2;

/// Request to show an animation once
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRequest {
    pub id: String,
    pub position: Vec2,
    /// Frame size override
    pub resize: Option<Vec2>,
}

/// Children to spawn when an enemy breaks apart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRequest {
    pub tier: u8,
    pub position: Vec2,
    pub count: u32,
}

/// The entity ran out of armor
#[derive(Debug, Clone, PartialEq)]
pub struct Destruction {
    pub sound: String,
    pub animation: AnimationRequest,
    pub split: Option<SplitRequest>,
}

/// Result of applying damage to an entity
#[derive(Debug, Clone, PartialEq)]
pub enum HitOutcome {
    /// Target was already destroyed; nothing changed
    Ignored,
    /// Armor absorbed the hit and the target bounced away
    Impact { sound: String },
    Destroyed(Destruction),
}

impl HitOutcome {
    pub fn is_destroyed(&self) -> bool {
        matches!(self, HitOutcome::Destroyed(_))
    }
}

/// Side effects a level tick produced, drained by the game loop
#[derive(Debug, Clone, PartialEq)]
pub enum LevelEvent {
    PlaySound { id: String, repeat: bool },
    Animation(AnimationRequest),
    EnemyDestroyed { tier: u8, position: Vec2 },
    PlayerDestroyed { position: Vec2 },
}

impl LevelEvent {
    pub fn sound(id: impl Into<String>) -> Self {
        LevelEvent::PlaySound {
            id: id.into(),
            repeat: false,
        }
    }
}
