//! Per-frame game loop step
//!
//! Advances the outer state machine, feeds input to the live level,
//! steps it, and hands the resulting sounds and animations to the asset
//! bank.

use std::cmp::Ordering;

use super::events::LevelEvent;
use super::level::Level;
use super::properties::ConfigError;
use super::state::{Game, GameState};
use crate::angle_between_degrees;
use crate::assets::Animation;
use crate::consts::{SOUND_GAME_OVER, SOUND_WIN_LEVEL};
use crate::host::AssetBank;

/// Autopilot keeps thrusting until the nearest enemy is this close
const AUTOPILOT_STANDOFF: f32 = 300.0;
/// Autopilot only thrusts below this speed
const AUTOPILOT_CRUISE_SPEED: f32 = 4.0;
/// Autopilot fires when the target is within this many degrees of the nose
const AUTOPILOT_FIRE_CONE: f32 = 10.0;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    pub fire: bool,
    pub switch_weapon: bool,
    /// RETURN: start, continue after a win, restart after a loss
    pub confirm: bool,
    /// Level picked from the menu
    pub select_level: Option<usize>,
    pub toggle_debug: bool,
    /// Demo mode - the ship flies itself
    pub autopilot: bool,
}

/// Advance the game by one frame.
///
/// Only level construction can fail (an unplaceable enemy field); the
/// simulation itself never errors.
pub fn tick(game: &mut Game, input: &TickInput, now_ms: u64, assets: &mut dyn AssetBank) -> Result<(), ConfigError> {
    game.frame += 1;

    if let Some(levels) = game.pending_reload.take() {
        match game.world.replace_levels(levels) {
            Ok(()) if game.state != GameState::NotRunning => game.state = GameState::LoadingLevel,
            Ok(()) => {}
            Err(e) => log::warn!("Ignoring level reload: {}", e),
        }
    }

    if input.toggle_debug {
        game.debug = !game.debug;
        log::info!("Debug overlay {}", if game.debug { "on" } else { "off" });
    }

    if let Some(id) = input.select_level {
        match game.world.set_current_level(id) {
            Ok(()) => game.state = GameState::LoadingLevel,
            Err(e) => log::warn!("Level selection ignored: {}", e),
        }
    }

    let confirm = input.confirm || input.autopilot;
    match game.state {
        GameState::NotRunning if confirm => game.state = GameState::LoadingLevel,
        GameState::Won if confirm => {
            game.world.advance_level();
            game.state = GameState::LoadingLevel;
        }
        GameState::Lost if confirm => game.state = GameState::LoadingLevel,
        GameState::Running => run_level(game, input, now_ms, assets),
        _ => {}
    }

    if game.state == GameState::LoadingLevel {
        load_level(game, assets)?;
    }

    for animation in &mut game.animations {
        animation.step();
    }
    game.animations.retain(|a| !a.is_complete());

    if game.debug {
        log::debug!("frame {}: {:?}", game.frame, game.debug_info());
    }

    Ok(())
}

/// Rebuild the current level from its definition
fn load_level(game: &mut Game, assets: &mut dyn AssetBank) -> Result<(), ConfigError> {
    let (id, name) = game.world.current_level();
    let name = name.to_string();

    assets.load(&name);
    assets.stop_all();
    let level = game.world.start_level(id, assets, &game.display)?;
    assets.play(level.soundtrack(), true);

    game.animations.clear();
    game.level = Some(level);
    game.state = GameState::Running;
    log::info!("Level {} '{}' running", id, name);
    Ok(())
}

fn run_level(game: &mut Game, input: &TickInput, now_ms: u64, assets: &mut dyn AssetBank) {
    let Some(level) = game.level.as_mut() else {
        game.state = GameState::LoadingLevel;
        return;
    };

    let input = if input.autopilot {
        autopilot(level, input)
    } else {
        input.clone()
    };

    if input.rotate_left {
        level.rotate_player(false);
    }
    if input.rotate_right {
        level.rotate_player(true);
    }
    if input.thrust {
        level.accelerate_player();
    }
    if input.switch_weapon {
        level.switch_weapon();
    }
    if input.fire {
        level.fire(now_ms);
    }

    level.step(game.display.bounds(), assets.pixel_mask());

    for event in level.drain_events() {
        match event {
            LevelEvent::PlaySound { id, repeat } => assets.play(&id, repeat),
            LevelEvent::Animation(request) => {
                let animation: Animation = assets.animation(&request.id, request.position, request.resize);
                game.animations.push(animation);
            }
            LevelEvent::EnemyDestroyed { tier, position } => {
                log::debug!("Tier {} enemy destroyed at {:?}", tier, position);
            }
            LevelEvent::PlayerDestroyed { position } => {
                log::debug!("Player destroyed at {:?}", position);
            }
        }
    }

    if level.is_lost() {
        log::info!("Level '{}' lost", level.name());
        assets.play(SOUND_GAME_OVER, false);
        game.state = GameState::Lost;
    } else if level.is_won() {
        log::info!("Level '{}' won", level.name());
        assets.play(SOUND_WIN_LEVEL, false);
        game.state = GameState::Won;
    }
}

/// Steer toward the nearest enemy, close in while it is far, and fire
/// when it is in front of the nose
fn autopilot(level: &Level, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    let Some(player) = level.player() else {
        return input;
    };
    let position = player.geometry.position();

    let target = level.enemies().iter().min_by(|a, b| {
        a.geometry
            .position()
            .distance_squared(position)
            .partial_cmp(&b.geometry.position().distance_squared(position))
            .unwrap_or(Ordering::Equal)
    });
    let Some(target) = target else {
        return input;
    };

    let to_target = target.geometry.position() - position;
    let angle = angle_between_degrees(player.direction(), to_target);
    let turn = player.properties().maneuverability * 0.5;

    input.rotate_right = angle > turn;
    input.rotate_left = angle < -turn;
    input.thrust = to_target.length() > AUTOPILOT_STANDOFF
        && player.geometry.velocity().length() < AUTOPILOT_CRUISE_SPEED;
    input.fire = angle.abs() < AUTOPILOT_FIRE_CONE;
    input
}
