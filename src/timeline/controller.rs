//! Live / Paused / Playback state machine over a [`SnapshotRing`]
//!
//! Paused is the hub: scrubbing always lands in Paused, and Live and Playback
//! never hand over to each other without passing through it (apart from the
//! explicit "play while playing" escape back to Live).

use serde::{Deserialize, Serialize};

use super::Frame;
use super::ring::SnapshotRing;
use crate::consts::MAX_PLAYBACK_SPEED;

/// Timeline mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimelineMode {
    /// Simulating and recording new frames
    Live,
    /// Frozen on `display_frame`
    Paused,
    /// Replaying recorded frames at `playback_speed`
    Playback,
}

impl TimelineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineMode::Live => "Live",
            TimelineMode::Paused => "Paused",
            TimelineMode::Playback => "Playback",
        }
    }

    /// Background tint (RGB) hosts use to show the mode at a glance
    pub fn background_tint(&self) -> [u8; 3] {
        match self {
            TimelineMode::Live => [0, 14, 24],
            TimelineMode::Playback => [0, 22, 14],
            TimelineMode::Paused => [0, 14, 34],
        }
    }
}

/// Which neighbour `step_frame` moves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

/// Read-only summary for render consumers and timeline UIs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineView {
    pub mode: TimelineMode,
    pub display_frame: Frame,
    pub current_frame: Frame,
    pub recorded_start_frame: Frame,
    pub recorded_end_frame: Frame,
    pub playback_speed: f32,
    pub loop_enabled: bool,
}

/// Timeline controller. Owns the snapshot ring; the displayed state is owned
/// by the caller and passed in to every operation that reads or writes it.
#[derive(Debug, Clone)]
pub struct Timeline<S> {
    ring: SnapshotRing<S>,
    mode: TimelineMode,
    /// Next frame to simulate; only advances in Live
    current_frame: Frame,
    /// Frame whose state is on screen
    display_frame: Frame,
    playback_speed: f32,
    /// Fractional frames carried between playback ticks
    playback_accumulator: f32,
    loop_enabled: bool,
}

impl<S: Clone> Timeline<S> {
    /// Start Live at frame 0. Every ring slot is pre-filled with `initial`.
    pub fn new(capacity: usize, initial: &S) -> Self {
        let ring = SnapshotRing::new(capacity, initial);
        log::info!("Timeline initialized (frames={})", ring.capacity());
        Self {
            ring,
            mode: TimelineMode::Live,
            current_frame: 0,
            display_frame: 0,
            playback_speed: 1.0,
            playback_accumulator: 0.0,
            loop_enabled: true,
        }
    }

    pub fn mode(&self) -> TimelineMode {
        self.mode
    }

    pub fn current_frame(&self) -> Frame {
        self.current_frame
    }

    pub fn display_frame(&self) -> Frame {
        self.display_frame
    }

    pub fn recorded_start_frame(&self) -> Frame {
        self.ring.start_frame()
    }

    pub fn recorded_end_frame(&self) -> Frame {
        self.ring.end_frame()
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    pub fn playback_accumulator(&self) -> f32 {
        self.playback_accumulator
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn ring(&self) -> &SnapshotRing<S> {
        &self.ring
    }

    pub fn view(&self) -> TimelineView {
        TimelineView {
            mode: self.mode,
            display_frame: self.display_frame,
            current_frame: self.current_frame,
            recorded_start_frame: self.ring.start_frame(),
            recorded_end_frame: self.ring.end_frame(),
            playback_speed: self.playback_speed,
            loop_enabled: self.loop_enabled,
        }
    }

    /// One tick.
    ///
    /// Live: run `step` on `state`, record the result at `current_frame`, then
    /// advance the frame counter. Playback: load the snapshot the accumulated
    /// speed lands on, bypassing `step`. Paused: nothing.
    pub fn advance<F: FnOnce(&mut S)>(&mut self, state: &mut S, step: F) {
        match self.mode {
            TimelineMode::Live => {
                step(state);
                self.ring.record(self.current_frame, state);
                self.current_frame = self.current_frame.saturating_add(1);
                self.display_frame = self.current_frame;
            }
            TimelineMode::Playback => self.advance_playback(state),
            TimelineMode::Paused => {}
        }
    }

    fn advance_playback(&mut self, state: &mut S) {
        self.playback_accumulator += self.playback_speed;

        let mut target = self.display_frame;
        let mut moved = false;
        while self.playback_accumulator >= 1.0 {
            self.playback_accumulator -= 1.0;

            let mut next = target.saturating_add(1);
            if next > self.ring.end_frame() {
                if self.loop_enabled {
                    next = self.ring.start_frame();
                } else {
                    if moved {
                        self.load_into(state, target);
                    }
                    self.mode = TimelineMode::Paused;
                    self.playback_accumulator = 0.0;
                    log::info!("Playback reached end at frame {}", self.display_frame);
                    return;
                }
            }
            target = next;
            moved = true;
        }

        if moved {
            self.load_into(state, target);
        }
    }

    /// Copy the snapshot for `frame` (clamped) into `state` and display it
    fn load_into(&mut self, state: &mut S, frame: Frame) {
        let frame = self.ring.clamp(frame);
        state.clone_from(self.ring.load(frame));
        self.display_frame = frame;
    }

    /// Live or Playback → Paused
    pub fn pause(&mut self) {
        match self.mode {
            TimelineMode::Live => {
                // The live state is exactly the snapshot at the end frame
                self.display_frame = self.ring.clamp(self.display_frame);
                self.mode = TimelineMode::Paused;
                log::info!("Paused (was live) at frame {}", self.display_frame);
            }
            TimelineMode::Playback => {
                self.mode = TimelineMode::Paused;
                self.playback_accumulator = 0.0;
                log::info!("Paused playback at frame {}", self.display_frame);
            }
            TimelineMode::Paused => {}
        }
    }

    /// Paused mid-recording → Playback; Paused at the end → Live;
    /// Playback → Live (escape from replay); Live → no-op
    pub fn play(&mut self) {
        match self.mode {
            TimelineMode::Paused => {
                if self.display_frame >= self.ring.end_frame() {
                    self.resume_live();
                } else {
                    self.mode = TimelineMode::Playback;
                    self.playback_accumulator = 0.0;
                    log::info!("Resumed playback from frame {}", self.display_frame);
                }
            }
            TimelineMode::Playback => self.go_live(),
            TimelineMode::Live => {}
        }
    }

    /// Leave Paused at the end of the recording.
    ///
    /// When the newest live frame is still the tail, simulation picks up right
    /// after it so the end frame survives; otherwise this is `go_live`.
    fn resume_live(&mut self) {
        let end = self.ring.end_frame();
        if self.display_frame == end && self.current_frame == end.saturating_add(1) {
            self.mode = TimelineMode::Live;
            self.display_frame = self.current_frame;
            self.playback_accumulator = 0.0;
            log::info!("Resumed live mode at frame {}", self.current_frame);
        } else {
            self.go_live();
        }
    }

    /// Continue live simulation from the displayed frame.
    ///
    /// The next Live tick records over `display_frame`, which also drops every
    /// recorded frame after it.
    pub fn go_live(&mut self) {
        self.mode = TimelineMode::Live;
        self.current_frame = self.display_frame;
        self.playback_accumulator = 0.0;
        log::info!("Returned to live mode at frame {}", self.current_frame);
    }

    /// Enter Paused showing `frame` (clamped into the recorded range)
    pub fn seek(&mut self, state: &mut S, frame: Frame) {
        if self.mode == TimelineMode::Live {
            log::info!("Seeking - stopping live recording");
        }
        self.mode = TimelineMode::Paused;
        self.playback_accumulator = 0.0;
        self.load_into(state, frame);
    }

    /// Seek to the neighbouring frame, wrapping at the ends when looping
    pub fn step_frame(&mut self, state: &mut S, direction: StepDirection) {
        let start = self.ring.start_frame();
        let end = self.ring.end_frame();
        let target = match direction {
            StepDirection::Forward => {
                let next = self.display_frame.saturating_add(1);
                if next > end {
                    if self.loop_enabled { start } else { end }
                } else {
                    next
                }
            }
            StepDirection::Backward => {
                if self.display_frame <= start {
                    if self.loop_enabled { end } else { start }
                } else {
                    self.display_frame - 1
                }
            }
        };
        self.seek(state, target);
    }

    /// Cut the recording after `frame`. Only accepted strictly inside the
    /// recorded range; returns whether it was applied.
    pub fn trim(&mut self, state: &mut S, frame: Frame) -> bool {
        let start = self.ring.start_frame();
        let end = self.ring.end_frame();
        if frame <= start {
            log::debug!("Cannot trim to frame {frame} (start is {start})");
            return false;
        }
        if frame >= end {
            log::debug!("Frame {frame} is already at or past end ({end})");
            return false;
        }

        self.ring.truncate(frame);
        if self.display_frame > frame {
            self.load_into(state, frame);
        }
        if self.current_frame > frame {
            self.current_frame = frame;
        }

        log::info!(
            "Trimmed recording: {} -> {} (removed {} frames)",
            end,
            frame,
            end - frame
        );
        true
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    /// Set playback speed, clamped to `[0, 4]` (NaN counts as 0)
    pub fn set_speed(&mut self, speed: f32) {
        self.playback_speed = if speed.is_nan() {
            0.0
        } else {
            speed.clamp(0.0, MAX_PLAYBACK_SPEED)
        };
    }

    /// Throw away the recording and start a new one at `current_frame`
    pub fn start_recording(&mut self, state: &S) {
        self.ring.reset(self.current_frame);
        self.ring.record(self.current_frame, state);
        self.display_frame = self.current_frame;
        self.mode = TimelineMode::Live;
        self.playback_accumulator = 0.0;
        log::info!("Started recording at frame {}", self.current_frame);
    }

    /// Live → Paused
    pub fn stop_recording(&mut self) {
        if self.mode == TimelineMode::Live {
            self.pause();
            log::info!(
                "Stopped recording at frame {} (total: {} frames)",
                self.ring.end_frame(),
                self.ring.len()
            );
        }
    }

    /// Enter Playback from wherever we are. Rejected without at least two
    /// recorded frames.
    pub fn start_playback(&mut self) -> bool {
        if self.ring.end_frame() <= self.ring.start_frame() {
            log::info!("No recording to play!");
            return false;
        }
        self.display_frame = self.ring.clamp(self.display_frame);
        self.mode = TimelineMode::Playback;
        self.playback_accumulator = 0.0;
        log::info!("Started playback from frame {}", self.display_frame);
        true
    }

    /// Playback → Paused
    pub fn stop_playback(&mut self) {
        if self.mode == TimelineMode::Playback {
            self.pause();
        }
    }
}
