//! Jet Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use jet_dash::audio::AudioManager;
    use jet_dash::consts::*;
    use jet_dash::highscores::HighScore;
    use jet_dash::platform::FrameLoop;
    use jet_dash::renderer::Painter;
    use jet_dash::sim::{Phase, PowerUp, TickInput, UiProjection, WorldState, tick};

    /// Game instance holding all state
    struct Game {
        state: WorldState,
        input: TickInput,
        canvas: HtmlCanvasElement,
        painter: Option<Painter>,
        audio: AudioManager,
        high_score: HighScore,
        last_projection: Option<UiProjection>,
        // Track phase edges for high-score recording
        last_phase: Phase,
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement) -> Self {
            let painter = Painter::new(&canvas);
            let view_h = painter
                .as_ref()
                .map(|p| p.view_size().1)
                .unwrap_or(MIN_VIEW_H);
            Self {
                state: WorldState::new(seed, view_h),
                input: TickInput::default(),
                canvas,
                painter,
                audio: AudioManager::new(),
                high_score: HighScore::load(),
                last_projection: None,
                last_phase: Phase::Start,
            }
        }

        /// One frame: tick, sound, paint, HUD
        fn frame(&mut self) {
            // The drawing surface can vanish transiently (detached canvas,
            // context loss). Skip the tick entirely and retry next frame.
            if self.painter.is_none() {
                self.painter = Painter::new(&self.canvas);
                if self.painter.is_none() {
                    log::warn!("No 2d context this frame, skipping tick");
                    return;
                }
            }
            let (view_w, view_h) = self
                .painter
                .as_ref()
                .map(|p| p.view_size())
                .unwrap_or((MIN_VIEW_W, MIN_VIEW_H));

            let input = self.input.clone();
            tick(&mut self.state, &input, view_w, view_h);
            // One-shot inputs are consumed by the tick
            self.input.activate = false;

            for event in self.state.take_events() {
                self.audio.handle(event);
            }
            self.audio
                .set_thrust(self.state.phase == Phase::Playing && self.state.thrusting);

            // A run just ended: settle the best score
            if self.last_phase == Phase::Playing && self.state.phase == Phase::GameOver {
                let score = self.state.final_score();
                if self.high_score.record(score) {
                    log::info!("New best score: {score}");
                }
            }
            self.last_phase = self.state.phase;

            if let Some(painter) = &self.painter {
                painter.draw(&self.state);
            }

            // Publish the HUD projection on a coarse cadence, only on change
            if self.state.tick_count % UI_PUSH_INTERVAL == 0 {
                let projection = self.state.projection(self.high_score.best);
                if self.last_projection.as_ref() != Some(&projection) {
                    update_hud(&projection);
                    self.last_projection = Some(projection);
                }
            }
        }
    }

    /// Push the score/phase projection into the DOM HUD
    fn update_hud(projection: &UiProjection) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
            el.set_text_content(Some(&projection.score.to_string()));
        }
        if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
            el.set_text_content(Some(&projection.high_score.to_string()));
        }
        if let Some(el) = document.query_selector("#hud-powerups .hud-value").ok().flatten() {
            let labels: Vec<&str> = projection
                .active_powerups
                .iter()
                .map(|p| powerup_label(*p))
                .collect();
            el.set_text_content(Some(&labels.join(" ")));
        }

        // Menu and game-over overlays
        if let Some(el) = document.get_element_by_id("start-screen") {
            let class = if projection.phase == Phase::Start { "" } else { "hidden" };
            let _ = el.set_attribute("class", class);
        }
        if let Some(el) = document.get_element_by_id("game-over") {
            if projection.phase == Phase::GameOver {
                let _ = el.set_attribute("class", "");
                if let Some(score_el) = document.get_element_by_id("final-score") {
                    score_el.set_text_content(Some(&projection.score.to_string()));
                }
                if let Some(best_el) = document.get_element_by_id("final-best") {
                    best_el.set_text_content(Some(&projection.high_score.to_string()));
                }
            } else {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }

    fn powerup_label(powerup: PowerUp) -> &'static str {
        match powerup {
            PowerUp::Shield => "SHIELD",
            PowerUp::Magnet => "MAGNET",
            PowerUp::SlowMo => "SLOW-MO",
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Jet Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas.clone())));
        log::info!("Game initialized with seed: {seed}");

        setup_input_handlers(&canvas, game.clone());

        // Show the menu HUD before the first projection cadence fires
        {
            let g = game.borrow();
            update_hud(&g.state.projection(g.high_score.best));
        }

        let frame_loop = FrameLoop::start({
            let game = game.clone();
            move || game.borrow_mut().frame()
        });

        // Teardown: stop the recurring tick and release the engine tone
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                frame_loop.cancel();
                game.borrow_mut().audio.engine_stop();
                log::info!("Frame loop cancelled");
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        log::info!("Jet Dash running!");
    }

    /// Begin-ascend plus the edge-triggered activate
    fn press(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        g.input.thrusting = true;
        g.input.activate = true;
        // Browsers unlock audio on the first user gesture
        g.audio.resume();
    }

    fn release(game: &Rc<RefCell<Game>>) {
        game.borrow_mut().input.thrusting = false;
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" => press(&game),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" => release(&game),
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                press(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                release(&game);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                press(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                release(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Don't leave thrust stuck on when the tab goes to background
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    release(&game);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use jet_dash::sim::{Phase, TickInput, WorldState, tick};

    env_logger::init();
    log::info!("Jet Dash (native) starting...");
    log::info!("Run in a browser for the playable build; native mode runs a headless demo");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut state = WorldState::new(seed, 480.0);

    // Start a run, then hover with alternating thrust until something
    // ends it (or we give up after ten simulated minutes)
    let start = TickInput {
        thrusting: false,
        activate: true,
    };
    tick(&mut state, &start, 800.0, 480.0);

    let mut ticks = 0u64;
    while state.phase == Phase::Playing && ticks < 36_000 {
        let input = TickInput {
            thrusting: ticks % 2 == 0,
            activate: false,
        };
        tick(&mut state, &input, 800.0, 480.0);
        ticks += 1;
    }

    println!(
        "demo run (seed {seed}): {} ticks survived, score {}, distance {:.0}",
        ticks,
        state.final_score(),
        state.distance
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
