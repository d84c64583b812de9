//! Lane Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, TouchEvent};

    use lane_runner::Settings;
    use lane_runner::audio::{AudioDirector, AudioManager};
    use lane_runner::consts::*;
    use lane_runner::platform::{SwipeTracker, autopilot, lane_shift_for_key};
    use lane_runner::sim::{GamePhase, GameState, tick};
    use lane_runner::snapshot::RenderSnapshot;

    /// How far ahead the demo autopilot looks for hazards
    const AUTOPILOT_LOOKAHEAD: f32 = 12.0;

    thread_local! {
        /// Shared with the exported frame accessors below
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        snapshot: RenderSnapshot,
        director: AudioDirector,
        audio: AudioManager,
        swipe: SwipeTracker,
        last_time: f64,
        /// Attract mode: the autopilot drives
        demo: bool,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            let mut audio = AudioManager::new();
            audio.set_volumes(
                settings.master_volume,
                settings.sfx_volume,
                settings.music_volume,
            );
            audio.set_muted(settings.muted);

            let state = GameState::new(settings.track.config(), seed);
            let snapshot = RenderSnapshot::capture(&state);
            Self {
                state,
                snapshot,
                director: AudioDirector::new(),
                audio,
                swipe: SwipeTracker::new(settings.swipe_threshold),
                settings,
                last_time: 0.0,
                demo: false,
            }
        }

        /// Start a run, or restart after game over
        fn start(&mut self) {
            if !self.state.is_playing() && !self.state.is_paused() {
                self.state.start();
            }
        }

        /// Run one simulation tick and route its events
        fn update(&mut self, dt: f32) {
            let dt = dt.min(MAX_FRAME_DT);

            if self.demo {
                if let Some(shift) = autopilot::steer(&self.state, AUTOPILOT_LOOKAHEAD) {
                    self.state.move_lane(shift);
                }
            }

            tick(&mut self.state, dt);
            self.snapshot.fill(&self.state);
            self.flush_events();
        }

        /// Drain simulation events into audio cues
        fn flush_events(&mut self) {
            let events = self.state.take_events();
            for event in &events {
                log::debug!("Event: {:?}", event);
            }
            for cue in self.director.cues_for_all(&events) {
                self.audio.play(cue);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let score = self.state.score().to_string();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&score));
            }

            set_visible(document, "start-screen", self.state.phase == GamePhase::Idle);
            set_visible(document, "pause-menu", self.state.is_paused());

            let over = self.state.is_game_over();
            set_visible(document, "game-over-screen", over);
            if over {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&score));
                }
            }
        }

        /// Flip and persist mute, bringing the music back mid-run
        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_muted();
            self.audio.set_muted(muted);
            if !muted {
                if let Some(cue) = self.director.unmute_cue() {
                    self.audio.play(cue);
                }
            }
            log::info!("Muted: {}", muted);
        }

        fn pause_for(&mut self, reason: &str) {
            if self.settings.pause_on_blur && self.state.is_playing() {
                self.state.pause();
                self.flush_events();
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Instance records for the current frame, as raw bytes
    #[wasm_bindgen(js_name = frameInstances)]
    pub fn frame_instances() -> Vec<u8> {
        GAME.with(|slot| {
            slot.borrow()
                .as_ref()
                .map(|game| game.borrow().snapshot.instance_bytes().to_vec())
                .unwrap_or_default()
        })
    }

    /// Camera eye then target, six floats
    #[wasm_bindgen(js_name = frameCamera)]
    pub fn frame_camera() -> Vec<f32> {
        GAME.with(|slot| {
            slot.borrow()
                .as_ref()
                .map(|game| {
                    let g = game.borrow();
                    let mut out = g.snapshot.camera_eye.to_array().to_vec();
                    out.extend_from_slice(&g.snapshot.camera_target.to_array());
                    out
                })
                .unwrap_or_default()
        })
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Lane Runner starting...");

        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        log::info!(
            "Track {} initialized with seed: {}",
            settings.track.as_str(),
            seed
        );

        let game = Rc::new(RefCell::new(Game::new(settings, seed)));
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        setup_input_handlers(game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(game.clone());

        set_visible(&document, "hud", true);

        // Start game loop
        request_animation_frame(game);

        log::info!("Lane Runner running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if let Some(shift) = lane_shift_for_key(&key) {
                    g.state.move_lane(shift);
                    return;
                }
                match key.as_str() {
                    " " | "Enter" => g.start(),
                    "Escape" => {
                        g.state.toggle_pause();
                        g.flush_events();
                    }
                    "m" | "M" => g.toggle_mute(),
                    "i" | "I" => {
                        g.demo = !g.demo;
                        log::info!("Demo mode: {}", g.demo);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.changed_touches().get(0) {
                    game.borrow_mut().swipe.begin(touch.client_x() as f32);
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.changed_touches().get(0) {
                    let mut g = game.borrow_mut();
                    if let Some(shift) = g.swipe.end(touch.client_x() as f32) {
                        g.state.move_lane(shift);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            g.last_time = time;

            g.update(dt);
            if let Some(document) = document() {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("music-toggle-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().toggle_mute();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.state.resume();
                g.flush_events();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().pause_for("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().pause_for("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    // lane-runner [classic|highway] [seed] [seconds]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let preset = args
        .first()
        .and_then(|s| lane_runner::TrackPreset::parse(s))
        .unwrap_or_default();
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(12345);
    let seconds: f32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(60.0);

    log::info!("Lane Runner (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    let summary = headless::run(preset.config(), seed, seconds);
    println!(
        "\n{} track, seed {}: {:.1}s, {:.0} units, {} coins{}",
        preset.as_str(),
        seed,
        summary.elapsed,
        summary.distance,
        summary.score,
        if summary.crashed { ", crashed" } else { "" }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lane_runner::TrackConfig;
    use lane_runner::consts::FRAME_DT;
    use lane_runner::platform::autopilot;
    use lane_runner::sim::{GameEvent, GameState, tick};

    pub struct Summary {
        pub elapsed: f32,
        pub distance: f32,
        pub score: u64,
        pub crashed: bool,
    }

    /// Autopilot run at a fixed timestep until crash or time limit
    pub fn run(config: TrackConfig, seed: u64, seconds: f32) -> Summary {
        let mut state = GameState::new(config, seed);
        state.start();

        let mut elapsed = 0.0;
        while elapsed < seconds && state.is_playing() {
            if let Some(shift) = autopilot::steer(&state, 12.0) {
                state.move_lane(shift);
            }
            tick(&mut state, FRAME_DT);
            elapsed += FRAME_DT;

            for event in state.take_events() {
                match event {
                    GameEvent::CoinCollected { score } => log::debug!("Coin! score {}", score),
                    GameEvent::GameOver { score } => {
                        log::info!("Crashed at z={:.1} with {} coins", state.player.pos.z, score)
                    }
                    other => log::trace!("{:?}", other),
                }
            }
        }

        Summary {
            elapsed,
            distance: state.distance(),
            score: state.score(),
            crashed: state.is_game_over(),
        }
    }
}
