//! A playable level: one ship, a field of enemies and the bullets in flight
//!
//! `step` runs one simulation tick in a fixed order (move, ship vs
//! enemies, bullets vs enemies, prune). Side effects are queued as
//! `LevelEvent`s for the game loop to drain.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bullet::Bullet;
use super::collision::{PixelMask, collides_masked};
use super::enemy::{Enemy, EnemyFactory};
use super::events::{HitOutcome, LevelEvent};
use super::geometry::{Bounds, Geometry};
use super::player::{Player, Weapon};
use super::properties::{ConfigError, LevelConfig};
use crate::Display;
use crate::consts::PARALLAX_FACTOR;
use crate::host::AssetBank;

/// Random spawn points tried before giving up on the minimum distance
pub const MAX_SPAWN_ATTEMPTS: u32 = 1000;

/// A live level instance
#[derive(Debug, Clone)]
pub struct Level {
    name: String,
    background: String,
    soundtrack: String,
    player: Option<Player>,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    factory: EnemyFactory,
    rng: Pcg32,
    /// Display scale applied to spawned velocities
    scale: Vec2,
    /// Screen center, for background parallax
    center: Vec2,
    events: Vec<LevelEvent>,
}

impl Level {
    /// Build a fresh level: ship at the screen center, enemies at the
    /// top tier scattered at least `min_spawn_distance` away from it
    pub fn new(
        config: &LevelConfig,
        assets: &dyn AssetBank,
        display: &Display,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let scale = display.scale();
        let bounds = display.bounds();
        let center = display.center();
        let mut rng = Pcg32::seed_from_u64(seed);

        let half_width = |image: &str| assets.sprite(image).size.x * 0.5 * scale.x;
        let props = &config.player;
        let primary = Weapon::new(props.primary_weapon.clone(), half_width(&props.primary_weapon.image));
        let secondary = Weapon::new(
            props.secondary_weapon.clone(),
            half_width(&props.secondary_weapon.image),
        );
        let ship = Geometry::new(center, half_width(&props.image), Vec2::ZERO);
        let player = Player::new(props.clone(), ship, primary, secondary);

        let factory = EnemyFactory::new(config.tiers.clone(), assets, scale);
        let top_tier = config.tiers.top_tier();
        let mut enemies = Vec::with_capacity(config.enemy_count as usize);
        for _ in 0..config.enemy_count {
            let position = safe_spawn_point(bounds, center, config.min_spawn_distance, &mut rng)?;
            enemies.push(factory.spawn(top_tier, position, &mut rng));
        }

        log::info!(
            "Level '{}' built: {} enemies at tier {}, seed {}",
            config.name,
            enemies.len(),
            top_tier,
            seed
        );

        Ok(Self {
            name: config.name.clone(),
            background: config.background.clone(),
            soundtrack: config.soundtrack.clone(),
            player: Some(player),
            enemies,
            bullets: Vec::new(),
            factory,
            rng,
            scale,
            center,
            events: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn soundtrack(&self) -> &str {
        &self.soundtrack
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn player_alive(&self) -> bool {
        self.player.as_ref().is_some_and(Player::is_alive)
    }

    /// All enemies cleared with the ship still flying
    pub fn is_won(&self) -> bool {
        self.enemies.is_empty() && self.player_alive()
    }

    pub fn is_lost(&self) -> bool {
        !self.player_alive()
    }

    /// Take the side effects queued since the last drain
    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn rotate_player(&mut self, clockwise: bool) {
        if let Some(player) = self.player.as_mut() {
            player.rotate(clockwise);
        }
    }

    pub fn accelerate_player(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.accelerate();
        }
    }

    pub fn switch_weapon(&mut self) {
        if let Some(player) = self.player.as_mut().filter(|p| p.is_alive()) {
            let sound = player.switch_weapon();
            self.events.push(LevelEvent::sound(sound));
        }
    }

    /// Fire the active weapon (reload-gated)
    pub fn fire(&mut self, now_ms: u64) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if let Some(bullet) = player.shoot(now_ms, self.scale) {
            self.events.push(LevelEvent::sound(bullet.weapon().sound.clone()));
            self.bullets.push(bullet);
        }
    }

    /// One simulation tick
    pub fn step(&mut self, bounds: Bounds, mask: Option<&dyn PixelMask>) {
        if let Some(player) = self.player.as_mut() {
            player.move_within(bounds);
        }
        for enemy in &mut self.enemies {
            enemy.move_within(bounds);
        }
        for bullet in &mut self.bullets {
            bullet.advance();
        }

        // Split children join after both collision passes; nothing this
        // tick can hit an enemy that did not exist when it started
        let mut children = Vec::new();
        self.resolve_player_collision(mask, &mut children);
        self.resolve_bullet_collisions(mask, &mut children);
        self.enemies.append(&mut children);

        // Bullets are single-use and never wrap; anything off screen is gone
        self.bullets.retain(|b| bounds.contains(b.geometry.position()));
    }

    /// Ship vs enemies: the first overlapping enemy trades hits with the ship
    fn resolve_player_collision(&mut self, mask: Option<&dyn PixelMask>, children: &mut Vec<Enemy>) {
        let Some(player) = self.player.as_mut().filter(|p| p.is_alive()) else {
            return;
        };
        let Some(index) = self.enemies.iter().position(|enemy| {
            collides_masked(
                &player.geometry,
                player.image(),
                &enemy.geometry,
                &enemy.properties().image,
                mask,
            )
        }) else {
            return;
        };

        let enemy = &mut self.enemies[index];
        let ship_geometry = player.geometry;
        let enemy_geometry = enemy.geometry;
        let tier = enemy.tier();
        let player_outcome = player.hit(&enemy_geometry, enemy.damage(), self.scale);
        let enemy_outcome = enemy.hit(&ship_geometry, player.damage());

        match player_outcome {
            HitOutcome::Ignored => {}
            HitOutcome::Impact { sound } => self.events.push(LevelEvent::sound(sound)),
            HitOutcome::Destroyed(destruction) => {
                let position = destruction.animation.position;
                self.events.push(LevelEvent::sound(destruction.sound));
                self.events.push(LevelEvent::Animation(destruction.animation));
                self.events.push(LevelEvent::PlayerDestroyed { position });
            }
        }

        if self.apply_enemy_outcome(enemy_outcome, tier, children) {
            self.enemies.swap_remove(index);
        }
    }

    /// Bullets vs enemies: each bullet is spent on the first enemy it touches
    fn resolve_bullet_collisions(&mut self, mask: Option<&dyn PixelMask>, children: &mut Vec<Enemy>) {
        let bullets = std::mem::take(&mut self.bullets);

        for bullet in bullets {
            let hit = self.enemies.iter().position(|enemy| {
                collides_masked(
                    &bullet.geometry,
                    bullet.image(),
                    &enemy.geometry,
                    &enemy.properties().image,
                    mask,
                )
            });
            let Some(index) = hit else {
                self.bullets.push(bullet);
                continue;
            };

            let tier = self.enemies[index].tier();
            let outcome = self.enemies[index].hit(&bullet.geometry, bullet.damage());
            if self.apply_enemy_outcome(outcome, tier, children) {
                self.enemies.swap_remove(index);
            }
        }
    }

    /// Queue the effects of an enemy hit; true if the enemy must be removed
    fn apply_enemy_outcome(&mut self, outcome: HitOutcome, tier: u8, children: &mut Vec<Enemy>) -> bool {
        match outcome {
            HitOutcome::Ignored => false,
            HitOutcome::Impact { sound } => {
                self.events.push(LevelEvent::sound(sound));
                false
            }
            HitOutcome::Destroyed(destruction) => {
                let position = destruction.animation.position;
                self.events.push(LevelEvent::sound(destruction.sound));
                self.events.push(LevelEvent::Animation(destruction.animation));
                self.events.push(LevelEvent::EnemyDestroyed { tier, position });
                if let Some(split) = destruction.split {
                    children.extend(self.factory.spawn_split(&split, &mut self.rng));
                }
                true
            }
        }
    }

    /// Rescale every live entity after a window resize
    pub fn resize(&mut self, factor: Vec2) {
        if let Some(player) = self.player.as_mut() {
            player.resize(factor);
        }
        for enemy in &mut self.enemies {
            enemy.resize(factor);
        }
        for bullet in &mut self.bullets {
            bullet.geometry = bullet.geometry.resized(factor);
        }
        self.factory.resize(factor);
        self.scale *= factor;
        self.center *= factor;
    }

    /// Background offset so it drifts slower than the ship
    pub fn background_offset(&self) -> Vec2 {
        match self.player.as_ref() {
            Some(player) => (player.geometry.position() - self.center) * PARALLAX_FACTOR,
            None => Vec2::ZERO,
        }
    }
}

/// Random point in `bounds` farther than `min_distance` from `avoid`
fn safe_spawn_point<R: Rng + ?Sized>(
    bounds: Bounds,
    avoid: Vec2,
    min_distance: f32,
    rng: &mut R,
) -> Result<Vec2, ConfigError> {
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = bounds.random_point(rng);
        if candidate.distance(avoid) > min_distance {
            return Ok(candidate);
        }
    }
    Err(ConfigError::NoSafeSpawn { min_distance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryBank;
    use crate::sim::properties::{TierTable, fixtures};
    use std::sync::Arc;

    fn bank() -> MemoryBank {
        let mut bank = MemoryBank::default();
        bank.insert_sprite("ship", Vec2::new(40.0, 40.0));
        bank.insert_sprite("rock", Vec2::new(40.0, 40.0));
        bank.insert_sprite("bullet", Vec2::new(8.0, 8.0));
        bank
    }

    fn display() -> Display {
        Display::new(1280.0, 1024.0)
    }

    fn level(enemy_count: u32, tiers: u8, child_count: u32) -> Level {
        let config = fixtures::level("test", enemy_count, fixtures::tiers(tiers, child_count));
        Level::new(&config, &bank(), &display(), 42).unwrap()
    }

    /// Park a motionless bullet on top of every enemy
    fn target_all(level: &mut Level) {
        let weapon = Arc::new(fixtures::weapon(100.0, 1));
        let bullets: Vec<_> = level
            .enemies
            .iter()
            .map(|e| Bullet::new(Arc::clone(&weapon), e.geometry.position(), 4.0, Vec2::ZERO))
            .collect();
        level.bullets.extend(bullets);
    }

    fn tier_counts(level: &Level) -> Vec<u8> {
        let mut tiers: Vec<u8> = level.enemies().iter().map(Enemy::tier).collect();
        tiers.sort_unstable();
        tiers
    }

    #[test]
    fn test_new_level_spawns_away_from_player() {
        let level = level(12, 3, 2);
        let ship = level.player().unwrap().geometry.position();
        assert_eq!(ship, display().center());
        assert_eq!(level.enemies().len(), 12);
        for enemy in level.enemies() {
            assert_eq!(enemy.tier(), 3);
            assert!(enemy.geometry.position().distance(ship) > 250.0);
        }
    }

    #[test]
    fn test_levels_from_same_config_are_independent() {
        let config = fixtures::level("twice", 6, fixtures::tiers(2, 2));
        let bank = bank();
        let mut a = Level::new(&config, &bank, &display(), 1).unwrap();
        let b = Level::new(&config, &bank, &display(), 2).unwrap();

        assert_eq!(a.enemies().len(), b.enemies().len());
        for (ea, eb) in a.enemies().iter().zip(b.enemies()) {
            assert_eq!(ea.properties(), eb.properties());
            assert_eq!(ea.armor(), eb.armor());
        }
        assert_eq!(
            a.player().unwrap().properties(),
            b.player().unwrap().properties()
        );
        for level in [&a, &b] {
            let ship = level.player().unwrap().geometry.position();
            assert!(level.enemies().iter().all(|e| e.geometry.position().distance(ship) > 250.0));
        }

        // Mutating one leaves the other alone
        a.enemies.clear();
        assert_eq!(b.enemies().len(), 6);
    }

    #[test]
    fn test_impossible_spawn_distance_is_config_error() {
        let mut config = fixtures::level("cramped", 1, fixtures::tiers(1, 0));
        config.min_spawn_distance = 10_000.0;
        let result = Level::new(&config, &bank(), &display(), 3);
        assert!(matches!(result, Err(ConfigError::NoSafeSpawn { .. })));
    }

    #[test]
    fn test_three_tier_cascade_clears_level() {
        let mut level = level(1, 3, 2);
        let bounds = display().bounds();

        target_all(&mut level);
        level.step(bounds, None);
        assert_eq!(tier_counts(&level), vec![2, 2]);
        assert!(level.bullets().is_empty());

        target_all(&mut level);
        level.step(bounds, None);
        assert_eq!(tier_counts(&level), vec![1, 1, 1, 1]);

        target_all(&mut level);
        level.step(bounds, None);
        assert!(level.enemies().is_empty());
        assert!(level.is_won());

        let destroyed = level
            .drain_events()
            .iter()
            .filter(|e| matches!(e, LevelEvent::EnemyDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1 + 2 + 4);
    }

    #[test]
    fn test_bullet_spent_on_surviving_enemy() {
        let mut level = level(1, 1, 0);
        let weapon = Arc::new(fixtures::weapon(3.0, 1));
        let pos = level.enemies()[0].geometry.position();
        level.bullets.push(Bullet::new(weapon, pos, 4.0, Vec2::ZERO));

        level.step(display().bounds(), None);
        assert!(level.bullets().is_empty());
        assert_eq!(level.enemies().len(), 1);
        assert_eq!(level.enemies()[0].armor(), 7.0);
    }

    #[test]
    fn test_one_bullet_hits_only_one_enemy() {
        let mut level = level(2, 1, 0);
        // Stack both enemies on the same spot
        let pos = level.enemies()[0].geometry.position();
        level.enemies[1].geometry = level.enemies[1].geometry.update_position(pos);
        let weapon = Arc::new(fixtures::weapon(100.0, 1));
        level.bullets.push(Bullet::new(weapon, pos, 4.0, Vec2::ZERO));

        level.step(display().bounds(), None);
        assert_eq!(level.enemies().len(), 1);
    }

    #[test]
    fn test_player_struck_twice_is_destroyed() {
        let mut level = level(1, 1, 0);
        // Armor 10 ship, damage 6 rocks with plenty of armor
        level.player = level.player.take().map(|p| {
            let mut props = p.properties().clone();
            props.armor = 10.0;
            props.damage = 0.5;
            Player::new(
                props.clone(),
                p.geometry,
                Weapon::new(props.primary_weapon.clone(), 4.0),
                Weapon::new(props.secondary_weapon.clone(), 4.0),
            )
        });
        let ship = level.player().unwrap().geometry.position();
        level.enemies[0].geometry = level.enemies[0]
            .geometry
            .update_position(ship)
            .update_velocity(Vec2::ZERO);

        let bounds = display().bounds();
        level.step(bounds, None);
        assert_eq!(level.player().unwrap().armor(), 4.0);
        assert!(!level.is_lost());

        // Still overlapping: the enemy was only pushed one tick away
        level.step(bounds, None);
        let player = level.player().unwrap();
        assert_eq!(player.armor(), -2.0);
        assert!(level.is_lost());
        assert!(!level.is_won());

        let events = level.drain_events();
        assert!(events.iter().any(|e| matches!(e, LevelEvent::PlayerDestroyed { .. })));
        assert!(events.iter().any(|e| matches!(e, LevelEvent::Animation(a) if a.id == "explosion")));
    }

    /// Park an enemy on the ship with no velocity of its own
    fn park_on_ship(level: &mut Level, index: usize) {
        let ship = level.player().unwrap().geometry.position();
        level.enemies[index].geometry = level.enemies[index]
            .geometry
            .update_position(ship)
            .update_velocity(Vec2::ZERO);
    }

    #[test]
    fn test_ram_split_children_join_after_bullet_pass() {
        // Tier 2 breaks on a single ram (armor 1 < ship damage 5)
        let tiers = TierTable::new(vec![
            fixtures::tier(6.0, 10.0, 0),
            fixtures::tier(6.0, 1.0, 2),
        ])
        .unwrap();
        let config = fixtures::level("ram", 1, tiers);
        let mut level = Level::new(&config, &bank(), &display(), 9).unwrap();
        park_on_ship(&mut level, 0);
        let ship = level.player().unwrap().geometry.position();
        let weapon = Arc::new(fixtures::weapon(100.0, 1));
        level.bullets.push(Bullet::new(weapon, ship, 4.0, Vec2::ZERO));

        level.step(display().bounds(), None);

        // Both children survive: the bullet never saw them
        assert_eq!(tier_counts(&level), vec![1, 1]);
        assert_eq!(level.bullets().len(), 1);
        assert_eq!(level.player().unwrap().armor(), 94.0);
        let destroyed: Vec<_> = level
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, LevelEvent::EnemyDestroyed { .. }))
            .collect();
        assert_eq!(
            destroyed,
            vec![LevelEvent::EnemyDestroyed { tier: 2, position: ship }]
        );

        // Next tick the bullet is free to hit one of them
        level.step(display().bounds(), None);
        assert_eq!(level.enemies().len(), 1);
        assert!(level.bullets().is_empty());
    }

    #[test]
    fn test_ship_trades_hits_with_one_enemy_per_tick() {
        let mut level = level(2, 1, 0);
        park_on_ship(&mut level, 0);
        park_on_ship(&mut level, 1);

        level.step(display().bounds(), None);

        let mut armor: Vec<f32> = level.enemies().iter().map(Enemy::armor).collect();
        armor.sort_by(f32::total_cmp);
        assert_eq!(armor, vec![5.0, 10.0]);
        assert_eq!(level.player().unwrap().armor(), 94.0);
    }

    #[test]
    fn test_offscreen_bullets_are_pruned() {
        let mut level = level(1, 1, 0);
        let weapon = Arc::new(fixtures::weapon(1.0, 1));
        level
            .bullets
            .push(Bullet::new(weapon, Vec2::new(5.0, 5.0), 2.0, Vec2::new(-10.0, 0.0)));
        level.step(display().bounds(), None);
        assert!(level.bullets().is_empty());
    }

    #[test]
    fn test_fire_queues_bullet_and_sound() {
        let mut level = level(1, 1, 0);
        level.fire(0);
        level.fire(50); // still reloading
        assert_eq!(level.bullets().len(), 1);
        let events = level.drain_events();
        assert_eq!(events, vec![LevelEvent::sound("laser")]);
    }

    #[test]
    fn test_switch_weapon_emits_feedback() {
        let mut level = level(1, 1, 0);
        level.switch_weapon();
        assert_eq!(
            level.drain_events(),
            vec![LevelEvent::sound(crate::consts::SOUND_CHANGE_WEAPON)]
        );
    }

    #[test]
    fn test_background_parallax() {
        let mut level = level(1, 1, 0);
        assert_eq!(level.background_offset(), Vec2::ZERO);
        let center = display().center();
        let player = level.player_mut().unwrap();
        player.geometry = player.geometry.update_position(center + Vec2::new(100.0, 0.0));
        assert!((level.background_offset() - Vec2::new(-20.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_resize_scales_entities() {
        let mut level = level(1, 1, 0);
        let before = level.enemies()[0].geometry;
        level.resize(Vec2::splat(0.5));
        let after = level.enemies()[0].geometry;
        assert_eq!(after.position(), before.position() * 0.5);
        assert!((after.radius() - before.radius() * 0.5).abs() < 1e-5);
        assert_eq!(level.player().unwrap().geometry.position(), display().center() * 0.5);
    }
}
