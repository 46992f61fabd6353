//! Pyramid of Cups entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        HtmlCanvasElement, HtmlInputElement, HtmlSelectElement, KeyboardEvent, MouseEvent,
        TouchEvent,
    };

    use pyramid_cups::config::TIMED_ROUND_SECS;
    use pyramid_cups::consts::*;
    use pyramid_cups::renderer::CanvasRenderer;
    use pyramid_cups::scoreboard::{ScoreEntry, format_date};
    use pyramid_cups::sim::{GamePhase, GameState, TickInput, tick};
    use pyramid_cups::{
        AimMethod, Difficulty, MapTheme, RoundConfig, Scoreboard, Settings, ThrowSpeed,
    };

    /// Seconds of simulated time per tick
    const STEP: f32 = 1.0 / TICK_HZ as f32;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        settings: Settings,
        scoreboard: Scoreboard,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // The current win has been offered to the scoreboard
        win_recorded: bool,
    }

    impl Game {
        fn new(seed: u64, config: RoundConfig, settings: Settings, scoreboard: Scoreboard) -> Self {
            Self {
                state: GameState::new(seed, config),
                renderer: None,
                settings,
                scoreboard,
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                win_recorded: false,
            }
        }

        /// Run simulation ticks for the elapsed real time
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= STEP && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input);
                self.accumulator -= STEP;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.launch = false;
                self.input.pause = false;
                self.input.aim_target = None;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60_000.0 / elapsed).round() as u32;
                }
            }

            // Offer a fresh win to the scoreboard
            if self.state.phase == GamePhase::Won && !self.win_recorded {
                self.win_recorded = true;
                let entry = ScoreEntry {
                    throws: self.state.throws,
                    clear_ticks: self.state.time_ticks,
                    difficulty: self.state.config.difficulty,
                    timestamp: js_sys::Date::now(),
                };
                if let Some(rank) = self.scoreboard.add_entry(entry) {
                    log::info!("scoreboard rank {} ({} throws)", rank, entry.throws);
                    self.scoreboard.save();
                }
                update_scoreboard_dom(&self.scoreboard);
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.render(&self.state, &self.settings, self.fps);
            }
        }

        /// Start a new round, keeping preferences and scoreboard
        fn restart(&mut self, seed: u64, config: RoundConfig) {
            self.state = GameState::new(seed, config);
            self.accumulator = 0.0;
            self.input = TickInput::default();
            self.win_recorded = false;
        }
    }

    /// Pointer position in canvas logical coordinates
    fn canvas_pos(canvas: &HtmlCanvasElement, offset_x: f64, offset_y: f64) -> Vec2 {
        let client_w = canvas.client_width().max(1) as f32;
        let client_h = canvas.client_height().max(1) as f32;
        Vec2::new(
            offset_x as f32 * (CANVAS_W / client_w),
            offset_y as f32 * (CANVAS_H / client_h),
        )
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pyramid of Cups starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or_else(|| JsValue::from_str("no game-canvas element"))?
            .dyn_into()?;
        canvas.set_width(CANVAS_W as u32);
        canvas.set_height(CANVAS_H as u32);

        let settings = Settings::load();
        let scoreboard = Scoreboard::load();
        let config = settings.last_round;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, config, settings, scoreboard)));
        game.borrow_mut().renderer = Some(CanvasRenderer::new(canvas.clone())?);
        update_scoreboard_dom(&game.borrow().scoreboard);

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone())?;
        setup_menu(game.clone())?;
        setup_auto_pause(game.clone())?;

        request_animation_frame(game);

        log::info!("Pyramid of Cups running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Mouse move - aim direction
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.state.accepting_aim() {
                    g.input.aim_target = Some(canvas_pos(
                        &canvas_clone,
                        event.offset_x() as f64,
                        event.offset_y() as f64,
                    ));
                }
            });
            canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse down - throw (DragTarget / ClickToAim) or restart after a
        // terminal phase
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                match g.state.phase {
                    GamePhase::Won | GamePhase::TimeUp => {
                        g.state.reset_round();
                        g.win_recorded = false;
                    }
                    _ => {
                        let pos = canvas_pos(
                            &canvas_clone,
                            event.offset_x() as f64,
                            event.offset_y() as f64,
                        );
                        g.input.aim_target = Some(pos);
                        if g.state.config.aim_method != AimMethod::ChargeLever {
                            g.input.launch = true;
                        }
                    }
                }
            });
            canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move - aim
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f64 - rect.left();
                    let y = touch.client_y() as f64 - rect.top();
                    let mut g = game.borrow_mut();
                    if g.state.accepting_aim() {
                        g.input.aim_target = Some(canvas_pos(&canvas_clone, x, y));
                    }
                }
            });
            canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start - throw, mirroring mousedown
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let rect = canvas_clone.get_bounding_client_rect();
                let x = touch.client_x() as f64 - rect.left();
                let y = touch.client_y() as f64 - rect.top();
                let mut g = game.borrow_mut();
                match g.state.phase {
                    GamePhase::Won | GamePhase::TimeUp => {
                        g.state.reset_round();
                        g.win_recorded = false;
                    }
                    _ => {
                        g.input.aim_target = Some(canvas_pos(&canvas_clone, x, y));
                        if g.state.config.aim_method != AimMethod::ChargeLever {
                            g.input.launch = true;
                        }
                    }
                }
            });
            canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard: Space charges/releases the lever, Escape pauses
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        g.input.charge = true;
                        event.prevent_default();
                    }
                    "Escape" => g.input.pause = true,
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key().as_str() == " " {
                    let mut g = game.borrow_mut();
                    g.input.charge = false;
                    g.input.launch = true;
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Read the menu selections into a RoundConfig
    fn read_menu_config(document: &web_sys::Document) -> RoundConfig {
        let select_value = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
                .map(|sel| sel.value())
        };
        let checked = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.checked())
                .unwrap_or(false)
        };

        let mut config = RoundConfig::default();
        if let Some(v) = select_value("difficulty-select").and_then(|v| Difficulty::from_str(&v)) {
            config.difficulty = v;
        }
        if let Some(v) = select_value("theme-select").and_then(|v| MapTheme::from_str(&v)) {
            config.theme = v;
        }
        if let Some(v) = select_value("speed-select").and_then(|v| ThrowSpeed::from_str(&v)) {
            config.throw_speed = v;
        }
        if let Some(v) = select_value("aim-select").and_then(|v| AimMethod::from_str(&v)) {
            config.aim_method = v;
        }
        config.timed_secs = checked("timed-check").then_some(TIMED_ROUND_SECS);
        config.bomb = checked("bomb-check");
        config
    }

    /// Preselect the menu to the options the last round used
    fn preset_menu(document: &web_sys::Document, config: &RoundConfig) {
        let set_select = |id: &str, value: &str| {
            if let Some(sel) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            {
                sel.set_value(value);
            }
        };
        let set_check = |id: &str, value: bool| {
            if let Some(input) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                input.set_checked(value);
            }
        };
        set_select("difficulty-select", config.difficulty.as_str());
        set_select("theme-select", config.theme.as_str());
        set_select("speed-select", config.throw_speed.as_str());
        set_select("aim-select", config.aim_method.as_str());
        set_check("timed-check", config.timed_secs.is_some());
        set_check("bomb-check", config.bomb);
    }

    fn setup_menu(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        preset_menu(&document, &game.borrow().settings.last_round);

        // Start button: build a RoundConfig from the menu and begin
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                let config = read_menu_config(&document);
                let seed = js_sys::Date::now() as u64;
                {
                    let mut g = game.borrow_mut();
                    g.settings.last_round = config;
                    g.settings.save();
                    g.restart(seed, config);
                }
                if let Some(el) = document.get_element_by_id("menu") {
                    let _ = el.set_attribute("class", "hidden");
                }
                log::info!("Round started with seed: {}", seed);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Restart button: same options, fresh round
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.state.reset_round();
                g.win_recorded = false;
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Menu button: back to the selection screen (pauses the round)
        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if !g.state.paused {
                    g.input.pause = true;
                }
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("menu") {
                    let _ = el.set_attribute("class", "");
                }
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Show the best clear in the DOM scoreboard panel, if present
    fn update_scoreboard_dom(scoreboard: &Scoreboard) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("best-clear") {
            let text = match scoreboard.best() {
                Some(best) => format!(
                    "Best: {} throws ({}, {})",
                    best.throws,
                    best.difficulty.as_str(),
                    format_date(best.timestamp)
                ),
                None => "No clears yet".to_string(),
            };
            el.set_text_content(Some(&text));
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if !g.state.paused
                        && !matches!(g.state.phase, GamePhase::Won | GamePhase::TimeUp)
                    {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if !g.state.paused && !matches!(g.state.phase, GamePhase::Won | GamePhase::TimeUp) {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                STEP
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), wasm_bindgen::JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pyramid of Cups (native) starting...");
    log::info!("Run with `trunk serve` for the web version; native mode runs a demo throw.");

    demo_throw();
}

/// Headless demo: one straight-up lever throw, ticked to settlement
#[cfg(not(target_arch = "wasm32"))]
fn demo_throw() {
    use pyramid_cups::RoundConfig;
    use pyramid_cups::consts::TICK_HZ;
    use pyramid_cups::sim::{GamePhase, GameState, TickInput, tick};

    let mut state = GameState::new(0xC0FFEE, RoundConfig::default());
    let hold = TickInput {
        charge: true,
        ..Default::default()
    };
    for _ in 0..30 {
        tick(&mut state, &hold);
    }
    tick(
        &mut state,
        &TickInput {
            launch: true,
            ..Default::default()
        },
    );

    let idle = TickInput::default();
    while matches!(state.phase, GamePhase::Flying | GamePhase::Settling { .. }) {
        tick(&mut state, &idle);
    }

    println!(
        "throw finished after {:.1}s: score {}/{}, wind {:+.2}",
        state.time_ticks as f32 / TICK_HZ as f32,
        state.score(),
        state.cups.len(),
        state.wind
    );
}
