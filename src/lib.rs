//! Space Rocks - an asteroids-style arcade game core
//!
//! Core modules:
//! - `sim`: Entity simulation (geometry, collisions, entities, levels, game loop)
//! - `host`: Collaborators the host framework provides (asset bank, renderer)
//! - `assets`: In-memory asset bank and sprite-sheet animations
//! - `levels`: Level definition loading (JSON, fail-fast)
//! - `watch`: Level directory watcher for hot reload
//! - `display`: Screen bounds and resize factors
//! - `hud`: HUD and status message model

pub mod assets;
pub mod display;
pub mod host;
pub mod hud;
pub mod levels;
pub mod settings;
pub mod sim;
#[cfg(not(target_arch = "wasm32"))]
pub mod watch;

pub use display::Display;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Design resolution the display scale factor is measured against
    pub const BASE_SCREEN_WIDTH: f32 = 1280.0;
    pub const BASE_SCREEN_HEIGHT: f32 = 1024.0;

    /// Frame time of the fixed 60 Hz loop (ms)
    pub const FRAME_MILLIS: u64 = 16;

    /// Player edge bounce: distance from the border that triggers a bounce
    pub const PLAYER_EDGE_OFFSET: f32 = 50.0;
    /// Player edge bounce: velocity kept after bouncing
    pub const PLAYER_EDGE_DAMPING: f32 = 0.6;
    /// Player speed cap (units per tick)
    pub const MAX_PLAYER_SPEED: f32 = 15.0;
    /// Size of the player destroy animation (before display scaling)
    pub const PLAYER_DESTROY_ANIM_SIZE: f32 = 200.0;

    /// Enemy edge bounce offset
    pub const ENEMY_EDGE_OFFSET: f32 = 10.0;
    /// Enemies keep their full speed when bouncing off the border
    pub const ENEMY_EDGE_DAMPING: f32 = 1.0;

    /// Below this speed an edge bounce only reflects, never damps
    pub const BOUNCE_THRESHOLD: f32 = 1.0;

    /// Background parallax: fraction of the player offset applied (inverted)
    pub const PARALLAX_FACTOR: f32 = -0.2;
    /// Background is drawn slightly larger than the screen so parallax never shows edges
    pub const BACKGROUND_SCALE: f32 = 1.2;

    /// HUD armor value below which the armor readout turns red
    pub const CRITICAL_ARMOR: f32 = 10.0;

    /// Sound ids the core emits on its own
    pub const SOUND_CHANGE_WEAPON: &str = "change_weapon";
    pub const SOUND_WIN_LEVEL: &str = "win_level";
    pub const SOUND_GAME_OVER: &str = "game_over";

    /// Fallback asset id substituted for anything missing from the bank
    pub const NOT_FOUND: &str = "not_found";
}

/// Screen "up" (y grows downward)
pub const UP: Vec2 = Vec2::new(0.0, -1.0);

/// Rotate a vector by an angle in degrees (positive = clockwise on screen)
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Signed angle in degrees from `from` to `to`, normalized to [-180, 180)
#[inline]
pub fn angle_between_degrees(from: Vec2, to: Vec2) -> f32 {
    normalize_degrees(from.angle_to(to).to_degrees())
}

/// Normalize an angle in degrees to [-180, 180)
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle >= 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Vector of the given length pointing at `degrees` (0 = +x)
#[inline]
pub fn polar_to_cartesian(length: f32, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()) * length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_degrees_quarter_turn() {
        // Screen coordinates: rotating "up" clockwise by 90° points right
        let right = rotate_degrees(UP, 90.0);
        assert!((right.x - 1.0).abs() < 1e-5);
        assert!(right.y.abs() < 1e-5);
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(190.0) - (-170.0)).abs() < 1e-4);
        assert!((normalize_degrees(-190.0) - 170.0).abs() < 1e-4);
        assert!((normalize_degrees(45.0) - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_angle_between_degrees() {
        let a = angle_between_degrees(UP, Vec2::X);
        assert!((a - 90.0).abs() < 1e-3);
    }
}
