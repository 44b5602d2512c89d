//! Game state and core simulation types
//!
//! Everything the step function reads or writes lives in [`GameState`]. It is
//! plain data (no heap, no references), so the timeline can copy it by value
//! into its snapshot ring every frame.

use bytemuck::Zeroable;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::{Pool, Slot};
use super::rng::Xorshift32;
use crate::consts::*;

/// A player projectile
#[derive(Debug, Clone, Copy, PartialEq, Zeroable, Serialize, Deserialize)]
pub struct Bullet {
    /// Top-left corner
    pub pos: Vec2,
    pub vel_x: f32,
    pub size: Vec2,
    pub alive: bool,
}

impl Slot for Bullet {
    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// A hazard drifting in from the right
#[derive(Debug, Clone, Copy, PartialEq, Zeroable, Serialize, Deserialize)]
pub struct Enemy {
    /// Center
    pub pos: Vec2,
    pub vel_x: f32,
    pub radius: i32,
    pub hp: i32,
    pub alive: bool,
}

impl Enemy {
    /// Collision box as (top-left, size)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let r = self.radius as f32;
        (self.pos - Vec2::splat(r), Vec2::splat(2.0 * r))
    }
}

impl Slot for Enemy {
    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Things that happened during one step (damage and score deltas)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BulletFired { slot: usize },
    EnemySpawned { slot: usize },
    /// Enemy survived the hit
    EnemyHit { slot: usize, score: u32 },
    EnemyDestroyed { slot: usize, score: u32 },
    /// Enemy left the field on the left edge
    EnemyEscaped { slot: usize },
    PlayerHit { lives: u32 },
    GameOver { score: u32 },
}

/// Deterministic configuration. Recordings made with different configs are not
/// interchangeable, so this travels with the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u32,
    /// Overwrite live entity speeds every tick instead of only at spawn
    pub retune_existing_entities: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            retune_existing_entities: true,
        }
    }
}

/// Complete game state (deterministic, serializable, `Copy`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// The only source of randomness
    pub rng: Xorshift32,
    /// Player top-left corner
    pub player_pos: Vec2,
    pub player_size: Vec2,
    pub score: u32,
    pub lives: u32,
    /// Terminal until an explicit reset
    pub game_over: bool,
    pub shoot_cooldown: u32,
    pub enemy_spawn_timer: u32,
    pub difficulty: f32,
    pub bullets: Pool<Bullet, MAX_BULLETS>,
    pub enemies: Pool<Enemy, MAX_ENEMIES>,
    /// Screen shake magnitude (presentational, still snapshotted)
    pub shake: f32,
    /// Damage flash intensity 0-1 (presentational, still snapshotted)
    pub flash: f32,
}

impl GameState {
    /// Fresh run with the given seed
    pub fn new(seed: u32) -> Self {
        let mut state = Self {
            rng: Xorshift32::new(seed),
            player_pos: Vec2::new(PLAYER_START_X, (FIELD_HEIGHT - PLAYER_SIZE) * 0.5),
            player_size: Vec2::splat(PLAYER_SIZE),
            score: 0,
            lives: START_LIVES,
            game_over: false,
            shoot_cooldown: 0,
            enemy_spawn_timer: ENEMY_FIRST_SPAWN_TIMER,
            difficulty: 1.0,
            bullets: Pool::new(),
            enemies: Pool::new(),
            shake: 0.0,
            flash: 0.0,
        };

        for _ in 0..ENEMY_INITIAL_COUNT {
            state.spawn_enemy();
        }

        state
    }

    pub fn bullet_speed(&self) -> f32 {
        BULLET_SPEED_BASE + self.difficulty * BULLET_SPEED_SCALE
    }

    pub fn enemy_speed(&self) -> f32 {
        ENEMY_SPEED_BASE + self.difficulty * ENEMY_SPEED_SCALE
    }

    /// Spawn an enemy past the right edge. No-op (and no RNG draw) when the pool is full.
    pub fn spawn_enemy(&mut self) -> Option<usize> {
        if self.enemies.is_full() {
            return None;
        }

        // Draw order is part of the determinism contract: radius, x, y, speed.
        let radius = self.rng.uniform_int(10, 18);
        let x = FIELD_WIDTH + radius as f32 + self.rng.uniform_float(0.0, 60.0);
        let y = self.rng.uniform_float(40.0, FIELD_HEIGHT - 40.0);
        let base = self.enemy_speed();
        let vel_x = -self.rng.uniform_float(base, base + 1.5);
        let hp = if self.difficulty > ENEMY_ARMOR_DIFFICULTY { 2 } else { 1 };

        self.enemies.insert(Enemy {
            pos: Vec2::new(x, y),
            vel_x,
            radius,
            hp,
            alive: true,
        })
    }

    /// Fire from the player's nose. No-op when the pool is full.
    pub fn fire_bullet(&mut self) -> Option<usize> {
        let size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
        let pos = Vec2::new(
            self.player_pos.x + self.player_size.x,
            self.player_pos.y + self.player_size.y * 0.5 - size.y * 0.5,
        );
        let vel_x = self.bullet_speed();
        self.bullets.insert(Bullet {
            pos,
            vel_x,
            size,
            alive: true,
        })
    }

    /// Screen-shake jitter for rendering.
    ///
    /// Derived from a copy of the RNG so drawing never perturbs the simulation.
    pub fn shake_offset(&self) -> Vec2 {
        if self.shake <= 0.0 {
            return Vec2::ZERO;
        }
        let mut rng = self.rng;
        let x = rng.uniform_float(-self.shake, self.shake).trunc();
        let y = rng.uniform_float(-self.shake, self.shake).trunc();
        Vec2::new(x, y)
    }

    /// Lose one life; returns true if this ended the run
    pub(crate) fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 && !self.game_over {
            self.game_over = true;
            log::info!("GAME OVER! Final score: {}", self.score);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(DEFAULT_SEED);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.score, 0);
        assert!(!state.game_over);
        assert_eq!(state.enemy_spawn_timer, ENEMY_FIRST_SPAWN_TIMER);
        assert_eq!(state.enemies.live_count(), ENEMY_INITIAL_COUNT);
        assert_eq!(state.bullets.live_count(), 0);
    }

    #[test]
    fn test_first_enemy_uses_golden_radius() {
        // First draw from seed 1337 is uniform_int(10, 18) == 14
        let state = GameState::new(1337);
        let first = state.enemies.get(0).unwrap();
        assert_eq!(first.radius, 14);
        assert!(first.pos.x >= FIELD_WIDTH + 14.0);
        assert!(first.vel_x < 0.0);
    }

    #[test]
    fn test_spawn_into_full_pool_draws_nothing() {
        let mut state = GameState::new(5);
        while state.spawn_enemy().is_some() {}
        let rng_before = state.rng;
        assert_eq!(state.spawn_enemy(), None);
        assert_eq!(state.rng, rng_before);
        assert_eq!(state.enemies.live_count(), MAX_ENEMIES);
    }

    #[test]
    fn test_fire_bullet_from_player_nose() {
        let mut state = GameState::new(5);
        let slot = state.fire_bullet().unwrap();
        let bullet = state.bullets.get(slot).unwrap();
        assert_eq!(bullet.pos.x, state.player_pos.x + state.player_size.x);
        assert_eq!(bullet.vel_x, state.bullet_speed());
    }

    #[test]
    fn test_shake_offset_is_pure() {
        let mut state = GameState::new(5);
        state.shake = 4.0;
        let before = state;
        let a = state.shake_offset();
        let b = state.shake_offset();
        assert_eq!(a, b);
        assert_eq!(state, before);
        assert!(a.x.abs() <= 4.0 && a.y.abs() <= 4.0);
    }

    #[test]
    fn test_lose_life_saturates_and_ends_once() {
        let mut state = GameState::new(5);
        state.lives = 1;
        assert!(state.lose_life());
        assert!(state.game_over);
        assert!(!state.lose_life());
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_state_json_roundtrip() {
        let state = GameState::new(77);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
