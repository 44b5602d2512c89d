//! Short-horizon input macro recorder
//!
//! Records raw input vectors (not full states) into a small ring, plus one
//! baseline snapshot taken when recording starts. Playback feeds the recorded
//! inputs back in and restores the baseline every time the ring wraps, so the
//! macro repeats seamlessly.
//!
//! The host owns the recorder and passes it in next to the session, so it
//! survives the session being rebuilt.

use serde::{Deserialize, Serialize};

use crate::consts::LOOP_MAX_INPUTS;
use crate::sim::InputState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopState {
    Idle,
    Recording,
    Playback,
}

#[derive(Debug, Clone)]
struct Baseline<S> {
    state: S,
    input: InputState,
}

#[derive(Debug, Clone)]
pub struct LoopRecorder<S> {
    state: LoopState,
    baseline: Option<Baseline<S>>,
    inputs: Vec<InputState>,
    capacity: usize,
    /// Total frames written since recording started (may exceed capacity)
    input_count: u64,
    playback_index: usize,
}

impl<S: Clone> Default for LoopRecorder<S> {
    fn default() -> Self {
        Self::new(LOOP_MAX_INPUTS)
    }
}

impl<S: Clone> LoopRecorder<S> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        log::info!("Loop recorder initialized (max={capacity} frames)");
        Self {
            state: LoopState::Idle,
            baseline: None,
            inputs: Vec::with_capacity(capacity),
            capacity,
            input_count: 0,
            playback_index: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Playback read cursor
    pub fn cursor(&self) -> usize {
        self.playback_index
    }

    pub fn total_recorded(&self) -> u64 {
        self.input_count
    }

    /// Frames playback actually loops over
    pub fn recorded_len(&self) -> usize {
        self.input_count.min(self.capacity as u64) as usize
    }

    /// Baseline state captured at loop start, if any
    pub fn baseline(&self) -> Option<&S> {
        self.baseline.as_ref().map(|b| &b.state)
    }

    /// Idle → Recording → Playback → Idle
    pub fn toggle(&mut self, state: &mut S, input: &mut InputState) {
        match self.state {
            LoopState::Idle => {
                self.input_count = 0;
                self.playback_index = 0;
                self.capture(state, input);
                self.state = LoopState::Recording;
                log::info!("Started loop recording");
            }
            LoopState::Recording => {
                if self.input_count > 0 {
                    self.restore(state, input);
                    self.playback_index = 0;
                    self.state = LoopState::Playback;
                    log::info!("Entering loop playback ({} frames)", self.recorded_len());
                } else {
                    self.state = LoopState::Idle;
                    log::info!("No loop frames recorded, back to idle");
                }
            }
            LoopState::Playback => {
                self.state = LoopState::Idle;
                input.clear();
                log::info!("Exited loop playback");
            }
        }
    }

    /// Append this tick's input. No-op unless recording.
    ///
    /// When the ring starts its second lap the baseline is re-taken from the
    /// current state, so the oldest retained input still lines up with it.
    pub fn record_input(&mut self, state: &S, input: &InputState) {
        if self.state != LoopState::Recording {
            return;
        }

        let write_index = (self.input_count % self.capacity as u64) as usize;
        if write_index < self.inputs.len() {
            self.inputs[write_index] = *input;
        } else {
            self.inputs.push(*input);
        }
        self.input_count += 1;

        if self.input_count > self.capacity as u64 && write_index == 0 {
            self.capture(state, input);
            log::debug!("Loop ring wrapped, baseline re-captured");
        }
    }

    /// Overwrite `input` with the next recorded frame. No-op unless playing.
    ///
    /// After the last frame the baseline is put back and the cursor rewinds.
    pub fn apply_playback(&mut self, state: &mut S, input: &mut InputState) {
        if self.state != LoopState::Playback {
            return;
        }
        let len = self.recorded_len();
        if len == 0 {
            return;
        }

        *input = self.inputs[self.playback_index];
        self.playback_index += 1;

        if self.playback_index >= len {
            self.playback_index = 0;
            self.restore(state, input);
        }
    }

    fn capture(&mut self, state: &S, input: &InputState) {
        self.baseline = Some(Baseline {
            state: state.clone(),
            input: *input,
        });
    }

    fn restore(&self, state: &mut S, input: &mut InputState) {
        if let Some(baseline) = &self.baseline {
            state.clone_from(&baseline.state);
            *input = baseline.input;
        }
    }
}
