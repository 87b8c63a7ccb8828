//! HUD and status text model
//!
//! What the overlay shows is computed here; how it looks is up to the
//! host `Renderer`.

use glam::Vec2;

use crate::Display;
use crate::consts::CRITICAL_ARMOR;
use crate::sim::level::Level;
use crate::sim::player::ActiveWeapon;
use crate::sim::state::GameState;

/// Per-frame HUD readout
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub armor: f32,
    /// Armor is low enough to draw the readout in red
    pub armor_critical: bool,
    pub damage: f32,
    pub weapon: ActiveWeapon,
    pub level_name: String,
}

impl Hud {
    /// HUD for a level with a player; `None` otherwise
    pub fn from_level(level: &Level) -> Option<Self> {
        let player = level.player()?;
        let armor = player.armor().max(0.0);
        Some(Self {
            armor,
            armor_critical: armor < CRITICAL_ARMOR,
            damage: player.damage(),
            weapon: player.active_weapon(),
            level_name: level.name().to_string(),
        })
    }
}

/// Centered message for states that wait on the player
pub fn status_message(state: GameState) -> Option<&'static str> {
    match state {
        GameState::NotRunning => Some("Press RETURN to start"),
        GameState::Won => Some("You won! Press RETURN to continue"),
        GameState::Lost => Some("You lost! Press RETURN to restart"),
        GameState::LoadingLevel | GameState::Running => None,
    }
}

/// Debug overlay snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugInfo {
    pub position: Vec2,
    pub velocity: Vec2,
    pub direction: Vec2,
    pub window_size: Vec2,
}

impl DebugInfo {
    pub fn from_level(level: &Level, display: &Display) -> Option<Self> {
        let player = level.player()?;
        Some(Self {
            position: player.geometry.position(),
            velocity: player.geometry.velocity(),
            direction: player.direction(),
            window_size: display.size(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryBank;
    use crate::sim::properties::fixtures;

    fn level(armor: f32) -> Level {
        let mut config = fixtures::level("Nebula", 1, fixtures::tiers(1, 0));
        config.player.armor = armor;
        Level::new(&config, &MemoryBank::default(), &Display::default(), 1).unwrap()
    }

    #[test]
    fn test_hud_reports_player_state() {
        let hud = Hud::from_level(&level(100.0)).unwrap();
        assert_eq!(hud.armor, 100.0);
        assert!(!hud.armor_critical);
        assert_eq!(hud.damage, 5.0);
        assert_eq!(hud.weapon, ActiveWeapon::Primary);
        assert_eq!(hud.level_name, "Nebula");
    }

    #[test]
    fn test_low_armor_is_critical() {
        let hud = Hud::from_level(&level(9.0)).unwrap();
        assert!(hud.armor_critical);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(status_message(GameState::NotRunning), Some("Press RETURN to start"));
        assert_eq!(
            status_message(GameState::Won),
            Some("You won! Press RETURN to continue")
        );
        assert_eq!(
            status_message(GameState::Lost),
            Some("You lost! Press RETURN to restart")
        );
        assert_eq!(status_message(GameState::Running), None);
    }

    #[test]
    fn test_debug_info_snapshot() {
        let level = level(10.0);
        let display = Display::default();
        let info = DebugInfo::from_level(&level, &display).unwrap();
        assert_eq!(info.position, display.center());
        assert_eq!(info.velocity, Vec2::ZERO);
        assert_eq!(info.direction, crate::UP);
        assert_eq!(info.window_size, display.size());
    }
}
