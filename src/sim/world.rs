//! Level registry and sequencing
//!
//! The world owns every `LevelConfig` and the index of the current one.
//! Levels are built on demand and never cached: each `start_level` gets a
//! brand new `Level` so a restart always begins from the definition.

use super::level::Level;
use super::properties::{ConfigError, LevelConfig};
use crate::Display;
use crate::host::AssetBank;

#[derive(Debug, Clone)]
pub struct World {
    levels: Vec<LevelConfig>,
    current: usize,
    seed: u64,
    /// Levels built so far; mixed into each level seed
    starts: u64,
}

impl World {
    pub fn new(levels: Vec<LevelConfig>, seed: u64) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        Ok(Self {
            levels,
            current: 0,
            seed,
            starts: 0,
        })
    }

    /// Id and name of the current level
    pub fn current_level(&self) -> (usize, &str) {
        (self.current, &self.levels[self.current].name)
    }

    /// `(id, name)` for every level, in id order
    pub fn levels(&self) -> impl Iterator<Item = (usize, &str)> {
        self.levels.iter().enumerate().map(|(id, l)| (id, l.name.as_str()))
    }

    pub fn set_current_level(&mut self, id: usize) -> Result<(), ConfigError> {
        if id >= self.levels.len() {
            return Err(ConfigError::UnknownLevel {
                id,
                count: self.levels.len(),
            });
        }
        self.current = id;
        Ok(())
    }

    /// Move to the next level, wrapping to the first after the last
    pub fn advance_level(&mut self) -> usize {
        self.current = (self.current + 1) % self.levels.len();
        log::info!("Advanced to level {} '{}'", self.current, self.levels[self.current].name);
        self.current
    }

    /// Move to the previous level, wrapping to the last before the first
    pub fn set_previous_level(&mut self) -> usize {
        self.current = self.current.checked_sub(1).unwrap_or(self.levels.len() - 1);
        self.current
    }

    /// Make `id` current and build a fresh level for it
    pub fn start_level(&mut self, id: usize, assets: &dyn AssetBank, display: &Display) -> Result<Level, ConfigError> {
        self.set_current_level(id)?;
        let seed = self.seed.wrapping_add(self.starts);
        self.starts += 1;
        log::info!("Starting level {} '{}'", id, self.levels[id].name);
        Level::new(&self.levels[id], assets, display, seed)
    }

    /// Swap in reloaded definitions, keeping the current index when it
    /// still exists
    pub fn replace_levels(&mut self, levels: Vec<LevelConfig>) -> Result<(), ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        self.levels = levels;
        self.current = self.current.min(self.levels.len() - 1);
        log::info!("Level definitions replaced ({} levels)", self.levels.len());
        Ok(())
    }
}
