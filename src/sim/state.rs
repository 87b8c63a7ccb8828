//! Top-level game state
//!
//! `Game` ties the world, the live level, the display and the running
//! animations together. `tick` drives it; `render` describes a frame to
//! the host renderer.

use serde::{Deserialize, Serialize};

use super::level::Level;
use super::properties::LevelConfig;
use super::world::World;
use crate::Display;
use crate::assets::Animation;
use crate::consts::BACKGROUND_SCALE;
use crate::host::Renderer;
use crate::hud::{DebugInfo, Hud, status_message};

/// Phase of the outer game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen, waiting for confirm
    #[default]
    NotRunning,
    /// The current level is (re)built on the next tick
    LoadingLevel,
    Running,
    /// Every enemy destroyed; confirm moves on to the next level
    Won,
    /// Ship destroyed; confirm restarts the level
    Lost,
}

/// Everything the game loop owns
#[derive(Debug)]
pub struct Game {
    pub state: GameState,
    pub(super) world: World,
    pub(super) level: Option<Level>,
    pub(super) display: Display,
    pub(super) animations: Vec<Animation>,
    /// Level definitions waiting to be swapped in at the next tick
    pub(super) pending_reload: Option<Vec<LevelConfig>>,
    pub(super) debug: bool,
    /// Ticks since start
    pub frame: u64,
}

impl Game {
    pub fn new(world: World, display: Display) -> Self {
        Self {
            state: GameState::NotRunning,
            world,
            level: None,
            display,
            animations: Vec::new(),
            pending_reload: None,
            debug: false,
            frame: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Queue new level definitions; applied at the start of the next tick.
    /// A newer request replaces one that has not been applied yet.
    pub fn queue_reload(&mut self, levels: Vec<LevelConfig>) {
        log::info!("Queued reload of {} level definitions", levels.len());
        self.pending_reload = Some(levels);
    }

    /// React to a window resize
    pub fn resize(&mut self, width: f32, height: f32) {
        let factor = self.display.resize(width, height);
        if let Some(level) = self.level.as_mut() {
            level.resize(factor);
        }
    }

    pub fn hud(&self) -> Option<Hud> {
        self.level.as_ref().and_then(Hud::from_level)
    }

    pub fn debug_info(&self) -> Option<DebugInfo> {
        self.level
            .as_ref()
            .and_then(|level| DebugInfo::from_level(level, &self.display))
    }

    /// Describe the current frame to `renderer`
    pub fn render(&self, renderer: &mut dyn Renderer) {
        if let Some(level) = self.level.as_ref() {
            let scale = self.display.scale().x;
            let background = self.display.center() + level.background_offset();
            renderer.draw_sprite(level.background(), background, 0.0, BACKGROUND_SCALE);

            for enemy in level.enemies() {
                let props = enemy.properties();
                renderer.draw_sprite(
                    &props.image,
                    enemy.geometry.position(),
                    enemy.rotation(),
                    props.scale * scale,
                );
            }

            for bullet in level.bullets() {
                let heading = crate::angle_between_degrees(crate::UP, bullet.geometry.velocity());
                renderer.draw_sprite(bullet.image(), bullet.geometry.position(), heading, scale);
            }

            if let Some(player) = level.player().filter(|p| p.is_alive()) {
                renderer.draw_sprite(
                    player.image(),
                    player.geometry.position(),
                    player.heading_degrees(),
                    scale,
                );
            }
        }

        for animation in &self.animations {
            renderer.draw_animation(animation);
        }

        if let Some(hud) = self.hud() {
            renderer.draw_hud(&hud);
        }
        if let Some(message) = status_message(self.state) {
            renderer.draw_message(message);
        }
    }
}
