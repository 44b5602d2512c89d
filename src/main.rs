//! Rewind Shooter entry point
//!
//! The browser build is driven from JavaScript through `web::WebTimeline`.
//! Natively this runs a headless session with a seeded autopilot, walks the
//! timeline controls, and prints the final game state as JSON.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use clap::Parser;
    use rand::Rng;

    use rewind_shooter::sim::{GameState, Xorshift32, keys};
    use rewind_shooter::timeline::{LoopRecorder, LoopState};
    use rewind_shooter::{Session, Settings};

    /// Headless run: seeded autopilot over a recorded session
    #[derive(Debug, Parser)]
    #[command(name = "rewind-shooter")]
    #[command(about = "Run a headless Rewind Shooter session and print the final state as JSON")]
    pub struct Args {
        /// Settings file (JSON)
        #[arg(long)]
        config: Option<String>,
        /// Simulation seed, overriding the settings file
        #[arg(long)]
        seed: Option<u32>,
        /// Total live frames to simulate
        #[arg(long, default_value_t = 1200)]
        frames: u32,
    }

    /// Random held keys, re-rolled every few frames
    struct Autopilot {
        rng: Xorshift32,
    }

    impl Autopilot {
        fn new(seed: u32) -> Self {
            Self {
                rng: Xorshift32::new(seed ^ 0x9E37_79B9),
            }
        }

        fn drive(&mut self, session: &mut Session, looper: &mut LoopRecorder<GameState>) {
            if !self.rng.random_bool(0.2) {
                return;
            }
            let fire = self.rng.random_bool(0.7);
            let direction = self.rng.random_range(0..3u8);
            session.key_event(looper, keys::SPACE, fire);
            session.key_event(looper, keys::UP, direction == 1);
            session.key_event(looper, keys::DOWN, direction == 2);
        }
    }

    fn run_frames(
        session: &mut Session,
        looper: &mut LoopRecorder<GameState>,
        pilot: &mut Autopilot,
        frames: u32,
    ) {
        for _ in 0..frames {
            pilot.drive(session, looper);
            session.update(looper);
        }
    }

    pub fn run(args: Args) -> Result<(), rewind_shooter::SettingsError> {
        let mut settings = match &args.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(seed) = args.seed {
            settings.sim.seed = seed;
        }
        let frames = args.frames;

        let mut looper = LoopRecorder::new(settings.loop_capacity);
        let mut pilot = Autopilot::new(settings.sim.seed);
        let mut session = Session::new(settings);

        // Live play, with a short loop macro in the middle
        let quarter = frames / 4;
        run_frames(&mut session, &mut looper, &mut pilot, quarter);
        session.toggle_loop_recorder(&mut looper);
        run_frames(&mut session, &mut looper, &mut pilot, quarter / 2);
        session.toggle_loop_recorder(&mut looper);
        if looper.state() == LoopState::Playback {
            run_frames(&mut session, &mut looper, &mut pilot, quarter);
            session.toggle_loop_recorder(&mut looper);
        }
        run_frames(&mut session, &mut looper, &mut pilot, quarter);

        // Scrub around the recording
        let view = session.view();
        let middle = view.recorded_start_frame
            + (view.recorded_end_frame - view.recorded_start_frame) / 2;
        session.pause();
        session.seek(middle);
        session.next_frame();
        session.prev_frame();
        if session.start_playback() {
            run_frames(&mut session, &mut looper, &mut pilot, 30);
            session.stop_playback();
        }
        let trim_to = session.view().display_frame;
        session.trim(trim_to);

        // Branch a new future from the scrub point
        session.go_live();
        let remaining = frames.saturating_sub(session.view().current_frame);
        run_frames(&mut session, &mut looper, &mut pilot, remaining);

        let view = session.view();
        log::info!(
            "Finished: mode={} frames {}..={} (live frame {}), {} input events",
            view.mode.as_str(),
            view.recorded_start_frame,
            view.recorded_end_frame,
            view.current_frame,
            session.input_log().len()
        );

        match serde_json::to_string_pretty(session.state()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize state: {e}"),
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> Result<Args, clap::Error> {
            Args::try_parse_from(std::iter::once("rewind-shooter").chain(list.iter().copied()))
        }

        #[test]
        fn test_parse_args() {
            let parsed = args(&["--seed", "42", "--frames", "90", "--config", "a.json"]).unwrap();
            assert_eq!(parsed.seed, Some(42));
            assert_eq!(parsed.frames, 90);
            assert_eq!(parsed.config.as_deref(), Some("a.json"));

            let defaults = args(&[]).unwrap();
            assert_eq!(defaults.seed, None);
            assert_eq!(defaults.frames, 1200);
        }

        #[test]
        fn test_parse_args_errors() {
            assert!(args(&["--seed"]).is_err());
            assert!(args(&["--seed", "minus"]).is_err());
            assert!(args(&["--bogus"]).is_err());
        }

        #[test]
        fn test_headless_run_completes() {
            let parsed = args(&["--seed", "7", "--frames", "400"]).unwrap();
            assert!(run(parsed).is_ok());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rewind Shooter (headless) starting...");

    let args = headless::Args::parse();

    if let Err(e) = headless::run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
