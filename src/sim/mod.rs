//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step only, no wall-clock time
//! - Seeded xorshift RNG stored inside the state
//! - Stable iteration order (array order of the entity pools)
//! - No rendering or platform dependencies

pub mod input;
pub mod pool;
pub mod rng;
pub mod state;
pub mod tick;

pub use input::{InputEvent, InputLog, InputState, KEY_COUNT, KeyCode, keys};
pub use pool::{Pool, Slot};
pub use rng::{Xorshift32, xorshift32};
pub use state::{Bullet, Enemy, GameEvent, GameState, SimConfig};
pub use tick::{next_spawn_interval, tick};
