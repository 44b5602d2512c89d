//! Browser control surface
//!
//! The page owns a `WebTimeline`, calls `update` once per animation frame and
//! forwards keyboard scancodes and timeline button presses.

use wasm_bindgen::prelude::*;

use crate::session::Session;
use crate::settings::Settings;
use crate::sim::GameState;
use crate::timeline::{LoopRecorder, LoopState, TimelineMode};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // Errors only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebTimeline {
    session: Session,
    looper: LoopRecorder<GameState>,
}

#[wasm_bindgen]
impl WebTimeline {
    /// `settings_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WebTimeline, JsValue> {
        let settings = parse_settings(settings_json)?;
        let looper = LoopRecorder::new(settings.loop_capacity);
        log::info!("Rewind Shooter starting...");
        Ok(Self {
            session: Session::new(settings),
            looper,
        })
    }

    /// Rebuild the session from new settings. The loop recorder survives.
    pub fn reload(&mut self, settings_json: &str) -> Result<(), JsValue> {
        let settings = parse_settings(settings_json)?;
        self.session = Session::new(settings);
        log::info!("Session reloaded (loop recorder kept)");
        Ok(())
    }

    pub fn update(&mut self) {
        self.session.update(&mut self.looper);
    }

    /// SDL-style scancode edge
    pub fn key_event(&mut self, scancode: u16, pressed: bool) {
        self.session.key_event(&mut self.looper, scancode, pressed);
    }

    // === Frame queries ===

    pub fn current_frame(&self) -> u32 {
        self.session.view().display_frame
    }

    pub fn live_frame(&self) -> u32 {
        self.session.view().current_frame
    }

    pub fn start_frame(&self) -> u32 {
        self.session.view().recorded_start_frame
    }

    pub fn end_frame(&self) -> u32 {
        self.session.view().recorded_end_frame
    }

    pub fn is_recording(&self) -> bool {
        self.session.view().mode == TimelineMode::Live
    }

    pub fn is_replaying(&self) -> bool {
        self.session.view().mode == TimelineMode::Playback
    }

    pub fn is_paused(&self) -> bool {
        self.session.view().mode == TimelineMode::Paused
    }

    pub fn mode(&self) -> String {
        self.session.view().mode.as_str().to_string()
    }

    pub fn event_count(&self) -> usize {
        self.session.input_log().len()
    }

    pub fn sim_speed(&self) -> f32 {
        self.session.view().playback_speed
    }

    pub fn loop_state(&self) -> String {
        match self.looper.state() {
            LoopState::Idle => "Idle",
            LoopState::Recording => "Recording",
            LoopState::Playback => "Playback",
        }
        .to_string()
    }

    /// Background tint for the current mode, `[r, g, b]`
    pub fn background_tint(&self) -> Vec<u8> {
        self.session.view().mode.background_tint().to_vec()
    }

    /// Screen shake offset `[x, y]` for the displayed state
    pub fn shake_offset(&self) -> Vec<f32> {
        if self.session.view().mode != TimelineMode::Live {
            return vec![0.0, 0.0];
        }
        self.session.state().shake_offset().to_array().to_vec()
    }

    /// The displayed state as JSON for the renderer
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.state()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn view_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.view()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // === Timeline controls ===

    pub fn set_sim_speed(&mut self, speed: f32) {
        self.session.set_speed(speed);
    }

    pub fn start_recording(&mut self) {
        self.session.start_recording();
    }

    pub fn stop_recording(&mut self) {
        self.session.stop_recording();
    }

    pub fn start_playback(&mut self) -> bool {
        self.session.start_playback()
    }

    pub fn stop_playback(&mut self) {
        self.session.stop_playback();
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn play(&mut self) {
        self.session.play();
    }

    pub fn seek_to_frame(&mut self, frame: u32) {
        self.session.seek(frame);
    }

    pub fn next_frame(&mut self) {
        self.session.next_frame();
    }

    pub fn prev_frame(&mut self) {
        self.session.prev_frame();
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.session.set_loop(enabled);
    }

    pub fn go_live(&mut self) {
        self.session.go_live();
    }

    pub fn trim_end(&mut self, frame: u32) -> bool {
        self.session.trim(frame)
    }

    pub fn toggle_loop(&mut self) {
        self.session.toggle_loop_recorder(&mut self.looper);
    }

    pub fn reset_game(&mut self) {
        self.session.reset_game();
    }
}

fn parse_settings(json: &str) -> Result<Settings, JsValue> {
    if json.trim().is_empty() {
        return Ok(Settings::default());
    }
    Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}
