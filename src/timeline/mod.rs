//! Recording, scrubbing and replay
//!
//! - `ring`: fixed-capacity snapshot storage keyed by frame number
//! - `controller`: the Live / Paused / Playback state machine
//! - `loop_recorder`: short input macro recorder with baseline restore

pub mod controller;
pub mod loop_recorder;
pub mod ring;

/// Frame number. Frame 0 is the first recorded frame of a session.
pub type Frame = u32;

pub use controller::{StepDirection, Timeline, TimelineMode, TimelineView};
pub use loop_recorder::{LoopRecorder, LoopState};
pub use ring::SnapshotRing;
