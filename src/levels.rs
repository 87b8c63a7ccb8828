//! Level definitions on disk
//!
//! Layout under the levels root:
//!
//! ```text
//! <root>/assets.json            optional default asset catalog
//! <root>/<dir>/level.json       one directory per level, sorted by name
//! <root>/<dir>/assets.json      optional per-level asset overrides
//! ```
//!
//! Level ids are the positions in that sorted order. Any unreadable or
//! invalid definition fails the whole load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::assets::{AssetCatalog, CatalogError, MemoryBank};
use crate::sim::properties::{ConfigError, EnemyProperties, LevelConfig, PlayerProperties, TierTable};

pub const LEVEL_FILE: &str = "level.json";
pub const ASSETS_FILE: &str = "assets.json";

fn default_min_spawn_distance() -> f32 {
    250.0
}

#[derive(Error, Debug)]
pub enum LevelLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid level {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("invalid asset catalog {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
    #[error("no level definitions under {}", .0.display())]
    NoLevels(PathBuf),
}

/// Contents of a `level.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelFile {
    /// Defaults to the directory name
    #[serde(default)]
    pub name: Option<String>,
    pub background: String,
    pub soundtrack: String,
    pub enemy_count: u32,
    #[serde(default = "default_min_spawn_distance")]
    pub min_spawn_distance: f32,
    pub player: PlayerProperties,
    /// Enemy properties keyed by tier ("1" is terminal)
    pub enemies: BTreeMap<u8, EnemyProperties>,
}

impl LevelFile {
    fn into_config(self, fallback_name: &str) -> Result<LevelConfig, ConfigError> {
        let tiers = TierTable::from_map(self.enemies)?;
        LevelConfig::new(
            self.name.unwrap_or_else(|| fallback_name.to_string()),
            self.background,
            self.soundtrack,
            self.player,
            self.enemy_count,
            self.min_spawn_distance,
            tiers,
        )
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LevelLoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LevelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| LevelLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Level directories (those holding a `level.json`), sorted by name
pub fn level_dirs(root: &Path) -> Result<Vec<PathBuf>, LevelLoadError> {
    let io_error = |source| LevelLoadError::Io {
        path: root.to_path_buf(),
        source,
    };
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() && path.join(LEVEL_FILE).is_file() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read and validate every level under `root`
pub fn load_levels(root: &Path) -> Result<Vec<LevelConfig>, LevelLoadError> {
    let mut levels = Vec::new();
    for dir in level_dirs(root)? {
        let path = dir.join(LEVEL_FILE);
        let file: LevelFile = read_json(&path)?;
        let config = file
            .into_config(&dir_name(&dir))
            .map_err(|source| LevelLoadError::Invalid { path, source })?;
        log::debug!(
            "Level {} '{}': {} enemies, {} tiers",
            levels.len(),
            config.name,
            config.enemy_count,
            config.tiers.top_tier()
        );
        levels.push(config);
    }

    if levels.is_empty() {
        return Err(LevelLoadError::NoLevels(root.to_path_buf()));
    }
    log::info!("Loaded {} levels from {}", levels.len(), root.display());
    Ok(levels)
}

fn read_catalog(path: &Path) -> Result<AssetCatalog, LevelLoadError> {
    let catalog: AssetCatalog = read_json(path)?;
    catalog.validate().map_err(|source| LevelLoadError::Catalog {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(catalog)
}

/// Build a `MemoryBank` from the default catalog and each level's
/// overrides; `levels` must come from `load_levels(root)`
pub fn load_asset_bank(root: &Path, levels: &[LevelConfig]) -> Result<MemoryBank, LevelLoadError> {
    let defaults_path = root.join(ASSETS_FILE);
    let defaults = if defaults_path.is_file() {
        read_catalog(&defaults_path)?
    } else {
        log::warn!("No default asset catalog at {}", defaults_path.display());
        AssetCatalog::default()
    };

    let mut bank = MemoryBank::new(defaults);
    for (dir, level) in level_dirs(root)?.iter().zip(levels) {
        let path = dir.join(ASSETS_FILE);
        if path.is_file() {
            let catalog = read_catalog(&path)?;
            bank.add_level_catalog(&level.name, catalog);
        }
    }
    Ok(bank)
}
