//! Services the host framework provides to the game core
//!
//! The core never loads files, mixes audio or draws pixels itself. It
//! asks an `AssetBank` for sprite sizes, sounds and animations, and hands
//! a `Renderer` what to draw each frame.

use glam::Vec2;

use crate::assets::Animation;
use crate::hud::Hud;
use crate::sim::collision::PixelMask;

/// A loaded image, as far as the simulation cares
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub id: String,
    /// Pixel size at scale 1.0
    pub size: Vec2,
}

/// Keyed store of sprites, sounds and animations.
///
/// Scoped to one level: `load` rebuilds the bank for that level and
/// drops whatever the previous level loaded. Lookups never fail; missing
/// ids resolve to a fallback asset.
pub trait AssetBank {
    /// Rebuild the bank for `level`
    fn load(&mut self, level: &str);

    fn sprite(&self, id: &str) -> Sprite;

    fn play(&mut self, sound: &str, repeat: bool);

    /// Stop every playing sound, looping ones included
    fn stop_all(&mut self);

    fn animation(&self, id: &str, position: Vec2, resize: Option<Vec2>) -> Animation;

    /// Pixel-accurate collision refinement, when the backend has one
    fn pixel_mask(&self) -> Option<&dyn PixelMask> {
        None
    }
}

/// Draw calls issued by `Game::render`
pub trait Renderer {
    /// Draw a sprite centered at `position`, rotated clockwise by `rotation` degrees
    fn draw_sprite(&mut self, sprite: &str, position: Vec2, rotation: f32, scale: f32);

    fn draw_animation(&mut self, animation: &Animation);

    fn draw_hud(&mut self, hud: &Hud);

    /// Centered status text ("Press RETURN to start", ...)
    fn draw_message(&mut self, message: &str);
}
