//! Tiered hazards ("rocks")
//!
//! An enemy's tier picks its row in the shared `TierTable`. Destroying a
//! tier > 1 enemy splits it into `child_count` enemies one tier down;
//! tier 1 simply vanishes.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;

use super::collision::{bounce_edge, bounce_other};
use super::events::{AnimationRequest, Destruction, HitOutcome, SplitRequest};
use super::geometry::{Bounds, Geometry};
use super::properties::{EnemyProperties, TierTable};
use crate::consts::{ENEMY_EDGE_DAMPING, ENEMY_EDGE_OFFSET};
use crate::host::AssetBank;
use crate::{normalize_degrees, polar_to_cartesian};

/// A hazard drifting around the level
#[derive(Debug, Clone)]
pub struct Enemy {
    pub geometry: Geometry,
    tier: u8,
    tiers: Arc<TierTable>,
    armor: f32,
    /// Accumulated sprite rotation (degrees)
    rotation: f32,
    /// Rotation added every tick (degrees)
    spin: f32,
}

impl Enemy {
    pub fn new(tier: u8, tiers: Arc<TierTable>, geometry: Geometry, spin: f32) -> Self {
        let tier = tier.clamp(1, tiers.top_tier());
        let armor = tiers.get(tier).armor;
        Self {
            geometry,
            tier,
            tiers,
            armor,
            rotation: 0.0,
            spin,
        }
    }

    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn properties(&self) -> &EnemyProperties {
        self.tiers.get(self.tier)
    }

    pub fn armor(&self) -> f32 {
        self.armor
    }

    pub fn damage(&self) -> f32 {
        self.properties().damage
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_alive(&self) -> bool {
        self.armor > 0.0
    }

    /// Drift one tick, bouncing off the edges, and spin
    pub fn move_within(&mut self, bounds: Bounds) {
        self.geometry = bounce_edge(bounds, ENEMY_EDGE_OFFSET, ENEMY_EDGE_DAMPING, &self.geometry);
        self.rotation = normalize_degrees(self.rotation + self.spin);
    }

    /// Take `damage` from something at `other`
    pub fn hit(&mut self, other: &Geometry, damage: f32) -> HitOutcome {
        if !self.is_alive() {
            return HitOutcome::Ignored;
        }

        self.armor -= damage;
        if self.is_alive() {
            self.geometry = bounce_other(&self.geometry, other);
            return HitOutcome::Impact {
                sound: self.properties().sound_on_impact.clone(),
            };
        }

        let props = self.properties();
        HitOutcome::Destroyed(Destruction {
            sound: props.sound_on_destroy.clone(),
            animation: AnimationRequest {
                id: props.destroy_animation.clone(),
                position: self.geometry.position(),
                resize: Some(Vec2::splat(self.geometry.radius() * 2.0)),
            },
            split: self.split(),
        })
    }

    /// Children this enemy breaks into, if any
    pub fn split(&self) -> Option<SplitRequest> {
        let count = self.properties().child_count;
        if self.tier <= 1 || count == 0 {
            return None;
        }
        Some(SplitRequest {
            tier: self.tier - 1,
            position: self.geometry.position(),
            count,
        })
    }

    pub fn resize(&mut self, factor: Vec2) {
        self.geometry = self.geometry.resized(factor);
    }
}

/// Builds enemies for one level.
///
/// Sprite sizes are looked up once when the level loads so spawning
/// mid-tick never touches the asset bank.
#[derive(Debug, Clone)]
pub struct EnemyFactory {
    tiers: Arc<TierTable>,
    /// Collision radius per tier (index 0 = tier 1)
    radii: Vec<f32>,
    /// Display scale applied to velocities and radii
    scale: Vec2,
}

impl EnemyFactory {
    pub fn new(tiers: Arc<TierTable>, assets: &dyn AssetBank, scale: Vec2) -> Self {
        let radii = tiers
            .iter()
            .map(|(_, props)| assets.sprite(&props.image).size.x * 0.5 * props.scale * scale.x)
            .collect();
        Self { tiers, radii, scale }
    }

    pub fn tiers(&self) -> &Arc<TierTable> {
        &self.tiers
    }

    pub fn radius(&self, tier: u8) -> f32 {
        let index = tier.clamp(1, self.tiers.top_tier()) as usize - 1;
        self.radii[index]
    }

    /// New enemy at `position` with a random heading, speed and spin
    pub fn spawn<R: Rng + ?Sized>(&self, tier: u8, position: Vec2, rng: &mut R) -> Enemy {
        let props = self.tiers.get(tier);
        let speed = rng.random_range(props.min_velocity..=props.max_velocity);
        let heading = rng.random_range(0.0..360.0);
        let velocity = polar_to_cartesian(speed, heading) * self.scale;
        let max_rotation = props.max_rotation.abs();
        let spin = if max_rotation > 0.0 {
            rng.random_range(-max_rotation..=max_rotation)
        } else {
            0.0
        };

        let geometry = Geometry::new(position, self.radius(tier), velocity);
        Enemy::new(tier, Arc::clone(&self.tiers), geometry, spin)
    }

    /// Materialize the children of a split
    pub fn spawn_split<R: Rng + ?Sized>(&self, request: &SplitRequest, rng: &mut R) -> Vec<Enemy> {
        (0..request.count)
            .map(|_| self.spawn(request.tier, request.position, rng))
            .collect()
    }

    pub fn resize(&mut self, factor: Vec2) {
        self.scale *= factor;
        for radius in &mut self.radii {
            *radius *= factor.x.abs();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryBank;
    use crate::sim::properties::fixtures;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn factory(tiers: u8, child_count: u32) -> EnemyFactory {
        let mut bank = MemoryBank::default();
        bank.insert_sprite("rock", Vec2::new(40.0, 40.0));
        EnemyFactory::new(Arc::new(fixtures::tiers(tiers, child_count)), &bank, Vec2::ONE)
    }

    #[test]
    fn test_spawn_uses_tier_properties() {
        let factory = factory(3, 2);
        let mut rng = Pcg32::seed_from_u64(1);
        let enemy = factory.spawn(3, Vec2::new(100.0, 100.0), &mut rng);
        assert_eq!(enemy.tier(), 3);
        assert_eq!(enemy.armor(), 10.0);
        assert_eq!(enemy.geometry.radius(), 20.0);
        let speed = enemy.geometry.velocity().length();
        assert!((1.0 - 1e-4..=2.0 + 1e-4).contains(&speed), "speed {speed}");
        assert!(enemy.spin.abs() <= 3.0);
    }

    #[test]
    fn test_split_spawns_children_one_tier_down() {
        let factory = factory(3, 2);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut parent = factory.spawn(3, Vec2::new(200.0, 150.0), &mut rng);
        parent.geometry = parent.geometry.update_position(Vec2::new(210.0, 140.0));

        let request = parent.split().unwrap();
        let children = factory.spawn_split(&request, &mut rng);
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.tier(), 2);
            assert_eq!(child.geometry.position(), Vec2::new(210.0, 140.0));
        }
    }

    #[test]
    fn test_tier_one_split_produces_nothing() {
        let factory = factory(3, 2);
        let mut rng = Pcg32::seed_from_u64(3);
        let enemy = factory.spawn(1, Vec2::ZERO, &mut rng);
        assert!(enemy.split().is_none());
    }

    #[test]
    fn test_hit_impact_then_destroy() {
        let factory = factory(2, 3);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut enemy = factory.spawn(2, Vec2::new(100.0, 100.0), &mut rng);
        enemy.geometry = enemy.geometry.update_velocity(Vec2::new(2.0, 2.0));
        let ship = Geometry::new(Vec2::new(90.0, 90.0), 10.0, Vec2::ZERO);

        let outcome = enemy.hit(&ship, 4.0);
        assert_eq!(outcome, HitOutcome::Impact { sound: "rock_hit".to_string() });
        assert_eq!(enemy.armor(), 6.0);
        // Ship is up-left, so the rock is pushed down-right
        assert_eq!(enemy.geometry.velocity(), Vec2::new(2.0, 2.0));

        let HitOutcome::Destroyed(destruction) = enemy.hit(&ship, 6.0) else {
            panic!("expected destruction");
        };
        assert_eq!(destruction.sound, "rock_destroy");
        assert_eq!(destruction.animation.id, "dust");
        assert_eq!(
            destruction.split,
            Some(SplitRequest { tier: 1, position: Vec2::new(100.0, 100.0), count: 3 })
        );
        assert_eq!(enemy.hit(&ship, 1.0), HitOutcome::Ignored);
    }

    #[test]
    fn test_move_accumulates_rotation() {
        let tiers = Arc::new(fixtures::tiers(1, 0));
        let geometry = Geometry::new(Vec2::new(100.0, 100.0), 10.0, Vec2::new(1.0, 0.0));
        let mut enemy = Enemy::new(1, tiers, geometry, 2.5);
        let bounds = Bounds::from_size(Vec2::new(800.0, 600.0));
        enemy.move_within(bounds);
        enemy.move_within(bounds);
        assert!((enemy.rotation() - 5.0).abs() < 1e-5);
        assert_eq!(enemy.geometry.position(), Vec2::new(102.0, 100.0));
    }
}
