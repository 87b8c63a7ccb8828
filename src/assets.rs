//! In-memory asset bank and sprite-sheet animations
//!
//! `MemoryBank` keeps asset metadata only (sprite sizes, known sounds,
//! animation sheets) read from JSON catalogs. It records played sounds
//! instead of mixing audio, which is all the headless driver and the
//! tests need; a real backend implements `AssetBank` over its own loaders.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::NOT_FOUND;
use crate::host::{AssetBank, Sprite};

/// Sprite size used when neither the sprite nor the fallback is known
pub const DEFAULT_SPRITE_SIZE: Vec2 = Vec2::new(64.0, 64.0);

fn default_speed() -> f32 {
    0.5
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("animation '{id}' speed must be positive, got {speed}")]
    AnimationSpeed { id: String, speed: f32 },
    #[error("sprite '{id}' size must be non-negative, got {size}")]
    SpriteSize { id: String, size: Vec2 },
}

/// A sprite sheet cut into frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSheet {
    pub frames: usize,
    pub frame_size: Vec2,
    /// Frame progress per tick; a frame advances once progress passes 1.0
    #[serde(default = "default_speed")]
    pub speed: f32,
}

/// Asset metadata for one scope (defaults, or one level's overrides)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetCatalog {
    #[serde(default)]
    pub sprites: HashMap<String, Vec2>,
    #[serde(default)]
    pub sounds: HashSet<String>,
    #[serde(default)]
    pub animations: HashMap<String, AnimationSheet>,
}

impl AssetCatalog {
    /// Reject sheets that never finish and sprites with negative extents
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (id, size) in &self.sprites {
            if !size.is_finite() || size.min_element() < 0.0 {
                return Err(CatalogError::SpriteSize {
                    id: id.clone(),
                    size: *size,
                });
            }
        }
        for (id, sheet) in &self.animations {
            if !sheet.speed.is_finite() || sheet.speed <= 0.0 {
                return Err(CatalogError::AnimationSpeed {
                    id: id.clone(),
                    speed: sheet.speed,
                });
            }
        }
        Ok(())
    }

    /// Overlay `other` on top of `self` (other wins on clashes)
    fn merged(&self, other: &AssetCatalog) -> AssetCatalog {
        let mut merged = self.clone();
        merged.sprites.extend(other.sprites.iter().map(|(k, v)| (k.clone(), *v)));
        merged.sounds.extend(other.sounds.iter().cloned());
        merged
            .animations
            .extend(other.animations.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

/// A one-shot animation playing at a fixed position
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    id: String,
    frame_count: usize,
    frame_size: Vec2,
    position: Vec2,
    speed: f32,
    time: f32,
    frame: usize,
}

impl Animation {
    pub fn new(id: impl Into<String>, sheet: &AnimationSheet, position: Vec2, resize: Option<Vec2>) -> Self {
        Self {
            id: id.into(),
            frame_count: sheet.frames.max(1),
            frame_size: resize.unwrap_or(sheet.frame_size),
            position,
            speed: sheet.speed,
            time: 0.0,
            frame: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn frame_size(&self) -> Vec2 {
        self.frame_size
    }

    /// Index of the frame to draw
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advance by one tick
    pub fn step(&mut self) {
        if self.is_complete() {
            return;
        }
        self.time += self.speed;
        if self.time > 1.0 {
            self.frame += 1;
            self.time = 0.0;
        }
    }

    /// True once the last frame is reached
    pub fn is_complete(&self) -> bool {
        self.frame + 1 >= self.frame_count
    }
}

/// A sound the bank was asked to play
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedSound {
    pub id: String,
    pub repeat: bool,
    /// Gain the sound was played at
    pub volume: f32,
}

/// Metadata-only asset bank with per-level scopes
#[derive(Debug, Clone)]
pub struct MemoryBank {
    defaults: AssetCatalog,
    levels: HashMap<String, AssetCatalog>,
    /// Defaults overlaid with the current level's catalog
    active: AssetCatalog,
    played: Vec<PlayedSound>,
    looping: Vec<String>,
    audio_enabled: bool,
    volume: f32,
}

impl Default for MemoryBank {
    fn default() -> Self {
        Self::new(AssetCatalog::default())
    }
}

impl MemoryBank {
    pub fn new(defaults: AssetCatalog) -> Self {
        Self {
            active: defaults.clone(),
            defaults,
            levels: HashMap::new(),
            played: Vec::new(),
            looping: Vec::new(),
            audio_enabled: true,
            volume: 1.0,
        }
    }

    /// Register per-level overrides, applied when that level loads
    pub fn add_level_catalog(&mut self, level: &str, catalog: AssetCatalog) {
        self.levels.insert(level.to_lowercase(), catalog);
    }

    /// Add a default sprite (visible immediately)
    pub fn insert_sprite(&mut self, id: &str, size: Vec2) {
        let id = id.to_lowercase();
        self.defaults.sprites.insert(id.clone(), size);
        self.active.sprites.insert(id, size);
    }

    /// Add a default sound (visible immediately)
    pub fn insert_sound(&mut self, id: &str) {
        let id = id.to_lowercase();
        self.defaults.sounds.insert(id.clone());
        self.active.sounds.insert(id);
    }

    /// Add a default animation sheet (visible immediately)
    pub fn insert_animation(&mut self, id: &str, sheet: AnimationSheet) {
        let id = id.to_lowercase();
        self.defaults.animations.insert(id.clone(), sheet.clone());
        self.active.animations.insert(id, sheet);
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }

    /// Gain for every later `play`, clamped to 0.0..=1.0; silent at 0.0
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Every sound played since the last `take_played`
    pub fn played(&self) -> &[PlayedSound] {
        &self.played
    }

    pub fn take_played(&mut self) -> Vec<PlayedSound> {
        std::mem::take(&mut self.played)
    }

    /// Sounds currently looping
    pub fn looping(&self) -> &[String] {
        &self.looping
    }
}

impl AssetBank for MemoryBank {
    fn load(&mut self, level: &str) {
        let key = level.to_lowercase();
        self.active = match self.levels.get(&key) {
            Some(overrides) => self.defaults.merged(overrides),
            None => self.defaults.clone(),
        };
        log::info!(
            "Assets for level '{}': {} sprites, {} sounds, {} animations",
            level,
            self.active.sprites.len(),
            self.active.sounds.len(),
            self.active.animations.len()
        );
    }

    fn sprite(&self, id: &str) -> Sprite {
        let key = id.to_lowercase();
        if let Some(size) = self.active.sprites.get(&key) {
            return Sprite { id: key, size: *size };
        }
        log::warn!("sprite {} not found", key);
        let size = self
            .active
            .sprites
            .get(NOT_FOUND)
            .copied()
            .unwrap_or(DEFAULT_SPRITE_SIZE);
        Sprite {
            id: NOT_FOUND.to_string(),
            size,
        }
    }

    fn play(&mut self, sound: &str, repeat: bool) {
        let mut key = sound.to_lowercase();
        if !self.active.sounds.contains(&key) {
            log::warn!("sound {} not found", key);
            key = NOT_FOUND.to_string();
        }
        if !self.audio_enabled || self.volume == 0.0 {
            return;
        }
        if repeat {
            self.looping.push(key.clone());
        }
        self.played.push(PlayedSound {
            id: key,
            repeat,
            volume: self.volume,
        });
    }

    fn stop_all(&mut self) {
        self.looping.clear();
    }

    fn animation(&self, id: &str, position: Vec2, resize: Option<Vec2>) -> Animation {
        let key = id.to_lowercase();
        match self.active.animations.get(&key) {
            Some(sheet) => Animation::new(key, sheet, position, resize),
            None => {
                log::warn!("animation {} not found", key);
                let fallback = AnimationSheet {
                    frames: 1,
                    frame_size: DEFAULT_SPRITE_SIZE,
                    speed: default_speed(),
                };
                Animation::new(NOT_FOUND, &fallback, position, resize)
            }
        }
    }
}
