//! Screen size and resize factors

use glam::Vec2;

use crate::consts::{BASE_SCREEN_HEIGHT, BASE_SCREEN_WIDTH};
use crate::sim::geometry::Bounds;

/// The game window as the simulation sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Display {
    size: Vec2,
    /// Design resolution that `scale()` is measured against
    base: Vec2,
}

impl Display {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_base(
            Vec2::new(width, height),
            Vec2::new(BASE_SCREEN_WIDTH, BASE_SCREEN_HEIGHT),
        )
    }

    pub fn with_base(size: Vec2, base: Vec2) -> Self {
        Self {
            size: size.max(Vec2::ONE),
            base: base.max(Vec2::ONE),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_size(self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Current size relative to the design resolution
    pub fn scale(&self) -> Vec2 {
        self.size / self.base
    }

    /// Switch to a new window size.
    ///
    /// Returns the step factor (new / old) that live geometry has to be
    /// scaled by.
    pub fn resize(&mut self, width: f32, height: f32) -> Vec2 {
        let new_size = Vec2::new(width, height).max(Vec2::ONE);
        let factor = new_size / self.size;
        log::info!("Display resized {:?} -> {:?} (factor {:?})", self.size, new_size, factor);
        self.size = new_size;
        factor
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new(BASE_SCREEN_WIDTH, BASE_SCREEN_HEIGHT)
    }
}
