//! Rewind Shooter - a side-scrolling arcade shooter with a scrubbable timeline
//!
//! Core modules:
//! - `sim`: Deterministic simulation (PRNG, entity pools, game state, step function)
//! - `timeline`: Snapshot ring, Live/Paused/Playback controller, loop recorder
//! - `session`: Host-owned context wiring input, simulation and timeline together
//! - `settings`: JSON configuration
//! - `web`: wasm-bindgen control surface (wasm32 only)

pub mod error;
pub mod session;
pub mod settings;
pub mod sim;
pub mod timeline;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::SettingsError;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Play-field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 640.0;
    pub const FIELD_HEIGHT: f32 = 480.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 18.0;
    pub const PLAYER_START_X: f32 = 35.0;
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Vertical margin the player can't enter (top and bottom)
    pub const PLAYER_MARGIN: f32 = 20.0;
    pub const START_LIVES: u32 = 3;

    /// Frames between shots
    pub const FIRE_COOLDOWN_FRAMES: u32 = 8;

    /// Bullet tuning
    pub const BULLET_SPEED_BASE: f32 = 8.0;
    pub const BULLET_SPEED_SCALE: f32 = 0.30;
    pub const BULLET_WIDTH: f32 = 10.0;
    pub const BULLET_HEIGHT: f32 = 5.0;
    /// Bullets die once they pass this far beyond the right edge
    pub const BULLET_EXIT_MARGIN: f32 = 20.0;

    /// Enemy tuning
    pub const ENEMY_SPEED_BASE: f32 = 2.2;
    pub const ENEMY_SPEED_SCALE: f32 = 0.60;
    pub const ENEMY_SPAWN_BASE_MAX: f32 = 55.0;
    pub const ENEMY_SPAWN_BASE_MIN: f32 = 18.0;
    pub const ENEMY_FIRST_SPAWN_TIMER: u32 = 40;
    pub const ENEMY_INITIAL_COUNT: usize = 6;
    /// Enemies past this x have escaped and cost a life
    pub const ENEMY_ESCAPE_X: f32 = -40.0;
    /// Vertical band enemies drift inside
    pub const ENEMY_MARGIN: f32 = 30.0;
    /// Difficulty above which new enemies take two hits
    pub const ENEMY_ARMOR_DIFFICULTY: f32 = 6.0;

    /// Score
    pub const SCORE_PER_DIFFICULTY: f32 = 120.0;
    pub const SCORE_HIT: u32 = 3;
    pub const SCORE_KILL: u32 = 10;

    /// Entity pool sizes (small enough to snapshot every frame)
    pub const MAX_BULLETS: usize = 64;
    pub const MAX_ENEMIES: usize = 24;

    /// Seed used when none is configured
    pub const DEFAULT_SEED: u32 = 1337;

    /// Timeline buffers (~50 seconds of snapshots at 60 fps)
    pub const MAX_REPLAY_FRAMES: usize = 3000;
    pub const MAX_REPLAY_EVENTS: usize = 10_000;
    /// Loop recorder (30 seconds of inputs at 60 fps)
    pub const LOOP_MAX_INPUTS: usize = 1800;

    /// Playback speed range
    pub const MAX_PLAYBACK_SPEED: f32 = 4.0;
}

/// Clamp that never propagates NaN: a NaN input collapses to `lo`
#[inline]
pub fn clampf(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        lo
    } else {
        v.clamp(lo, hi)
    }
}

/// Axis-aligned overlap test between two (min corner, size) boxes
#[inline]
pub fn aabb_overlap(a_pos: glam::Vec2, a_size: glam::Vec2, b_pos: glam::Vec2, b_size: glam::Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}
