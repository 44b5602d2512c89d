//! Host-side context: one running game plus its timeline
//!
//! A `Session` owns everything that belongs to a single run. The loop recorder
//! is owned by the host and passed in, so it outlives session rebuilds.

use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, InputEvent, InputLog, InputState, KeyCode, keys, tick};
use crate::timeline::{
    Frame, LoopRecorder, LoopState, StepDirection, Timeline, TimelineMode, TimelineView,
};

pub struct Session {
    settings: Settings,
    state: GameState,
    input: InputState,
    input_log: InputLog,
    timeline: Timeline<GameState>,
    last_events: Vec<GameEvent>,
    /// Live ticks since the last status line
    status_tick: u32,
}

impl Session {
    /// Fresh game, recording from frame 0
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let state = GameState::new(settings.sim.seed);

        let mut timeline = Timeline::new(settings.snapshot_capacity, &state);
        timeline.set_speed(settings.playback_speed);
        timeline.set_loop(settings.loop_enabled);

        let mut session = Self {
            input_log: InputLog::with_capacity(settings.input_event_capacity),
            settings,
            state,
            input: InputState::new(),
            timeline,
            last_events: Vec::new(),
            status_tick: 0,
        };
        session.start_recording();

        log::info!(
            "Session started (seed={}, retune={})",
            session.settings.sim.seed,
            session.settings.sim.retune_existing_entities
        );
        session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The state on screen
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_log(&self) -> &InputLog {
        &self.input_log
    }

    pub fn timeline(&self) -> &Timeline<GameState> {
        &self.timeline
    }

    pub fn view(&self) -> TimelineView {
        self.timeline.view()
    }

    /// Events produced by the most recent live step
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    /// One frame.
    ///
    /// Live: loop playback input, step, loop record, snapshot, frame advance.
    /// Playback and Paused never run the step.
    pub fn update(&mut self, looper: &mut LoopRecorder<GameState>) -> &[GameEvent] {
        self.last_events.clear();

        let Self {
            settings,
            state,
            input,
            timeline,
            last_events,
            ..
        } = self;

        let live = timeline.mode() == TimelineMode::Live;
        timeline.advance(state, |state| {
            looper.apply_playback(state, input);
            *last_events = tick(state, input, &settings.sim);
            looper.record_input(state, input);
        });

        if live {
            self.log_status();
        }
        &self.last_events
    }

    fn log_status(&mut self) {
        if self.settings.status_interval == 0 {
            return;
        }
        self.status_tick += 1;
        if self.status_tick >= self.settings.status_interval {
            self.status_tick = 0;
            log::info!(
                "Score: {} | Lives: {} | Diff: {:.2}",
                self.state.score,
                self.state.lives,
                self.state.difficulty
            );
        }
    }

    /// Raw key edge from the host.
    ///
    /// `L` toggles the loop recorder and `R` restarts the run (both Live only).
    /// Keys only reach the simulation in Live and while the loop recorder is
    /// not driving input.
    pub fn key_event(
        &mut self,
        looper: &mut LoopRecorder<GameState>,
        key: KeyCode,
        pressed: bool,
    ) {
        let live = self.timeline.mode() == TimelineMode::Live;

        if pressed && key == keys::L && live {
            looper.toggle(&mut self.state, &mut self.input);
        }

        if live && looper.state() != LoopState::Playback && self.input.set(key, pressed) {
            self.input_log.push(InputEvent {
                frame: self.timeline.current_frame(),
                key,
                pressed,
            });
        }

        if pressed && key == keys::R && live {
            self.reset_game();
            log::info!("Restart");
        }
    }

    /// Brand new run with the configured seed. Leaves game over.
    ///
    /// The timeline is untouched; the next live frame records the fresh state.
    pub fn reset_game(&mut self) {
        self.state = GameState::new(self.settings.sim.seed);
        self.status_tick = 0;
    }

    // === Timeline controls ===

    pub fn pause(&mut self) {
        self.timeline.pause();
    }

    pub fn play(&mut self) {
        self.timeline.play();
        if self.timeline.mode() == TimelineMode::Live {
            self.input.clear();
        }
    }

    pub fn go_live(&mut self) {
        self.timeline.go_live();
        self.input.clear();
    }

    pub fn seek(&mut self, frame: Frame) {
        self.timeline.seek(&mut self.state, frame);
        self.input.clear();
    }

    pub fn step_frame(&mut self, direction: StepDirection) {
        self.timeline.step_frame(&mut self.state, direction);
        self.input.clear();
    }

    pub fn next_frame(&mut self) {
        self.step_frame(StepDirection::Forward);
    }

    pub fn prev_frame(&mut self) {
        self.step_frame(StepDirection::Backward);
    }

    /// Cut the recording after `frame`; returns whether it was applied
    pub fn trim(&mut self, frame: Frame) -> bool {
        self.timeline.trim(&mut self.state, frame)
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.timeline.set_loop(enabled);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.timeline.set_speed(speed);
    }

    /// Discard the recording and the input log, then record from here
    pub fn start_recording(&mut self) {
        self.input_log.clear();
        self.timeline.start_recording(&self.state);
        self.input.clear();
    }

    pub fn stop_recording(&mut self) {
        self.timeline.stop_recording();
    }

    pub fn start_playback(&mut self) -> bool {
        let started = self.timeline.start_playback();
        if started {
            self.input.clear();
        }
        started
    }

    pub fn stop_playback(&mut self) {
        self.timeline.stop_playback();
    }

    /// Idle → Recording → Playback → Idle. Live only.
    pub fn toggle_loop_recorder(&mut self, looper: &mut LoopRecorder<GameState>) {
        if self.timeline.mode() != TimelineMode::Live {
            log::debug!(
                "Loop recorder toggle ignored in {} mode",
                self.timeline.mode().as_str()
            );
            return;
        }
        looper.toggle(&mut self.state, &mut self.input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (Session, LoopRecorder<GameState>) {
        let settings = Settings {
            snapshot_capacity: 64,
            loop_capacity: 16,
            ..Settings::default()
        };
        let looper = LoopRecorder::new(settings.loop_capacity);
        (Session::new(settings), looper)
    }

    fn run(session: &mut Session, looper: &mut LoopRecorder<GameState>, frames: u32) {
        for _ in 0..frames {
            session.update(looper);
        }
    }

    #[test]
    fn test_live_frames_match_direct_ticks() {
        let (mut session, mut looper) = session();
        session.key_event(&mut looper, keys::SPACE, true);
        run(&mut session, &mut looper, 10);

        let mut direct = GameState::new(session.settings().sim.seed);
        let mut input = InputState::new();
        input.set(keys::SPACE, true);
        for _ in 0..10 {
            tick(&mut direct, &input, &session.settings().sim);
        }
        assert_eq!(*session.state(), direct);
        assert_eq!(session.view().current_frame, 10);
    }

    #[test]
    fn test_first_frame_fires() {
        let (mut session, mut looper) = session();
        session.key_event(&mut looper, keys::SPACE, true);
        let events = session.update(&mut looper).to_vec();
        assert!(events.iter().any(|e| matches!(e, GameEvent::BulletFired { .. })));
    }

    #[test]
    fn test_seek_restores_snapshot_and_go_live_resimulates() {
        let (mut session, mut looper) = session();
        session.key_event(&mut looper, keys::UP, true);
        run(&mut session, &mut looper, 20);

        session.seek(5);
        assert_eq!(session.view().mode, TimelineMode::Paused);
        assert_eq!(session.view().display_frame, 5);
        assert_eq!(session.input().held_count(), 0);
        let at_five = *session.state();

        // Paused frames do not move anything
        run(&mut session, &mut looper, 3);
        assert_eq!(*session.state(), at_five);

        session.go_live();
        session.update(&mut looper);
        assert_eq!(session.view().recorded_end_frame, 5);
        assert_eq!(session.view().current_frame, 6);
    }

    #[test]
    fn test_keys_ignored_outside_live() {
        let (mut session, mut looper) = session();
        run(&mut session, &mut looper, 4);
        session.pause();
        session.key_event(&mut looper, keys::SPACE, true);
        assert!(!session.input().is_down(keys::SPACE));
        assert!(session.input_log().is_empty());
    }

    #[test]
    fn test_input_log_records_edges_only() {
        let (mut session, mut looper) = session();
        session.key_event(&mut looper, keys::W, true);
        session.key_event(&mut looper, keys::W, true);
        session.update(&mut looper);
        session.key_event(&mut looper, keys::W, false);

        let events = session.input_log().events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].frame, 0);
        assert_eq!(events[1].frame, 1);
        assert!(!events[1].pressed);
    }

    #[test]
    fn test_restart_key_resets_game() {
        let (mut session, mut looper) = session();
        session.key_event(&mut looper, keys::SPACE, true);
        run(&mut session, &mut looper, 30);
        session.key_event(&mut looper, keys::R, true);

        let fresh = GameState::new(session.settings().sim.seed);
        assert_eq!(*session.state(), fresh);
        // Timeline keeps counting
        assert_eq!(session.view().current_frame, 30);
    }

    #[test]
    fn test_loop_key_cycles_recorder() {
        let (mut session, mut looper) = session();
        session.key_event(&mut looper, keys::L, true);
        assert_eq!(looper.state(), LoopState::Recording);
        let baseline = *session.state();

        session.key_event(&mut looper, keys::DOWN, true);
        run(&mut session, &mut looper, 4);

        session.key_event(&mut looper, keys::L, true);
        assert_eq!(looper.state(), LoopState::Playback);
        assert_eq!(*session.state(), baseline);

        // Host keys are ignored while the macro drives input
        session.key_event(&mut looper, keys::UP, true);
        assert!(!session.input().is_down(keys::UP));

        session.key_event(&mut looper, keys::L, true);
        assert_eq!(looper.state(), LoopState::Idle);
        assert!(!session.input().is_down(keys::DOWN));
    }

    #[test]
    fn test_loop_toggle_ignored_while_scrubbing() {
        let (mut session, mut looper) = session();
        session.key_event(&mut looper, keys::UP, true);
        run(&mut session, &mut looper, 5);
        session.toggle_loop_recorder(&mut looper);
        assert_eq!(looper.state(), LoopState::Recording);
        run(&mut session, &mut looper, 10);

        session.seek(2);
        session.toggle_loop_recorder(&mut looper);
        assert_eq!(looper.state(), LoopState::Recording);
        assert_eq!(session.view().display_frame, 2);
        assert_eq!(*session.state(), *session.timeline().ring().load(2));

        // Back in Live the toggle works again
        session.go_live();
        session.toggle_loop_recorder(&mut looper);
        assert_eq!(looper.state(), LoopState::Playback);
    }

    #[test]
    fn test_playback_after_recording() {
        let (mut session, mut looper) = session();
        run(&mut session, &mut looper, 10);
        session.seek(2);
        assert!(session.start_playback());
        session.update(&mut looper);
        assert_eq!(session.view().display_frame, 3);
        assert_eq!(*session.state(), *session.timeline().ring().load(3));

        session.stop_playback();
        assert_eq!(session.view().mode, TimelineMode::Paused);
    }

    #[test]
    fn test_playback_rejected_without_frames() {
        let (mut session, _looper) = session();
        assert!(!session.start_playback());
        assert_eq!(session.view().mode, TimelineMode::Live);
    }

    #[test]
    fn test_start_recording_clears_log_and_window() {
        let (mut session, mut looper) = session();
        session.key_event(&mut looper, keys::SPACE, true);
        run(&mut session, &mut looper, 8);

        session.start_recording();
        let view = session.view();
        assert_eq!(view.recorded_start_frame, 8);
        assert_eq!(view.recorded_end_frame, 8);
        assert_eq!(view.mode, TimelineMode::Live);
        assert!(session.input_log().is_empty());
        assert_eq!(session.input().held_count(), 0);
    }
}
