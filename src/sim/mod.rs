//! Simulation module
//!
//! All gameplay logic lives here. It never touches files, audio or
//! pixels:
//! - Asset metadata arrives through `host::AssetBank` at level build time
//! - Seeded RNG only
//! - Entities report hits and splits as returned values

pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod events;
pub mod geometry;
pub mod level;
pub mod player;
pub mod properties;
pub mod state;
pub mod tick;
pub mod world;

pub use bullet::Bullet;
pub use collision::{PixelMask, bounce_edge, bounce_other, collides, collides_masked};
pub use enemy::{Enemy, EnemyFactory};
pub use events::{AnimationRequest, Destruction, HitOutcome, LevelEvent, SplitRequest};
pub use geometry::{Bounds, Geometry};
pub use level::Level;
pub use player::{ActiveWeapon, Player, Weapon};
pub use properties::{
    BulletProperties, ConfigError, EnemyProperties, LevelConfig, PlayerProperties, TierTable,
};
pub use state::{Game, GameState};
pub use tick::{TickInput, tick};
pub use world::World;
