//! Circular buffer of full-state snapshots keyed by frame number
//!
//! Frame `f` lives in slot `f % capacity`. Only the newest `capacity` frames
//! are retrievable; older ones are evicted silently as the window slides.

use super::Frame;

#[derive(Debug, Clone)]
pub struct SnapshotRing<S> {
    slots: Vec<S>,
    /// First retrievable frame (inclusive)
    start_frame: Frame,
    /// Last retrievable frame (inclusive)
    end_frame: Frame,
}

impl<S: Clone> SnapshotRing<S> {
    /// Allocate `capacity` slots (at least one), each holding a copy of `initial`.
    ///
    /// Pre-filling means `load` always has a real state to hand out.
    pub fn new(capacity: usize, initial: &S) -> Self {
        Self {
            slots: vec![initial.clone(); capacity.max(1)],
            start_frame: 0,
            end_frame: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn start_frame(&self) -> Frame {
        self.start_frame
    }

    pub fn end_frame(&self) -> Frame {
        self.end_frame
    }

    /// Number of retrievable frames
    pub fn len(&self) -> usize {
        (self.end_frame - self.start_frame) as usize + 1
    }

    /// Never true: the window always holds at least one frame
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, frame: Frame) -> bool {
        (self.start_frame..=self.end_frame).contains(&frame)
    }

    /// Clamp a frame into the retrievable window
    pub fn clamp(&self, frame: Frame) -> Frame {
        frame.clamp(self.start_frame, self.end_frame)
    }

    fn slot_index(&self, frame: Frame) -> usize {
        frame as usize % self.slots.len()
    }

    /// Store `state` as frame `frame`, which becomes the newest retrievable frame
    pub fn record(&mut self, frame: Frame, state: &S) {
        let index = self.slot_index(frame);
        self.slots[index].clone_from(state);
        self.end_frame = frame;
        if frame < self.start_frame {
            self.start_frame = frame;
        }

        let capacity = self.slots.len() as Frame;
        if frame - self.start_frame >= capacity {
            self.start_frame = frame - capacity + 1;
        }
    }

    /// The snapshot at `frame`, clamped into the retrievable window
    pub fn load(&self, frame: Frame) -> &S {
        &self.slots[self.slot_index(self.clamp(frame))]
    }

    /// Drop every frame after `frame` from the window (storage is untouched)
    pub fn truncate(&mut self, frame: Frame) {
        self.end_frame = self.clamp(frame);
    }

    /// Collapse the window to the single frame `frame`
    pub fn reset(&mut self, frame: Frame) {
        self.start_frame = frame;
        self.end_frame = frame;
    }
}
