//! Inverted Snake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use inverted_snake::audio::{AudioManager, SoundEffect};
    use inverted_snake::consts::{CELL_SIZE, STATS_TICK_MS};
    use inverted_snake::persistence::LocalStore;
    use inverted_snake::platform::{BrowserClock, Command, TimeSource, map_key};
    use inverted_snake::renderer::{CanvasSurface, Effects, Surface, colors, draw_frame};
    use inverted_snake::sim::{GameEvent, Grid, Interval, Outcome};
    use inverted_snake::{
        GameError, GameResult, Session, SessionPhase, Settings, TickerToken, Tuning, format_clock,
    };

    /// Browser timer driving the stats tick
    #[derive(Debug, Clone, Copy)]
    enum StatsHandle {
        /// One-shot for the rest of a period interrupted by a pause
        Timeout(i32),
        Interval(i32),
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        surface: CanvasSurface,
        effects: Effects,
        settings: Settings,
        settings_store: LocalStore,
        audio: AudioManager,
        clock: BrowserClock,
        document: Document,
        stats_handle: Option<StatsHandle>,
        /// Wall-clock phase of the stats ticker, frozen while paused
        stats_phase: Interval,
        stats_token: Option<TickerToken>,
        glowing: bool,
        last_phase: SessionPhase,
    }

    impl Game {
        fn now(&self) -> f64 {
            self.clock.now_ms()
        }

        /// Start a fresh run and return its ticker token
        fn start(&mut self) -> TickerToken {
            self.stop_stats();
            let seed = js_sys::Date::now() as u64;
            let now = self.now();
            let token = self.session.start(seed, now);
            self.stats_token = Some(token);
            self.stats_phase.start(now);
            self.effects.reset();
            self.audio.resume();

            set_display(&self.document, "introScreen", "none");
            set_display(&self.document, "gameOverScreen", "none");
            set_html(&self.document, "pauseButton", "Pause");
            log::info!("Game started with seed: {seed}");
            token
        }

        fn clear_stats_timer(&mut self) {
            let (Some(handle), Some(window)) = (self.stats_handle.take(), web_sys::window()) else {
                return;
            };
            match handle {
                StatsHandle::Timeout(id) => window.clear_timeout_with_handle(id),
                StatsHandle::Interval(id) => window.clear_interval_with_handle(id),
            }
        }

        fn stop_stats(&mut self) {
            self.clear_stats_timer();
            self.stats_phase.cancel();
        }

        /// Toggle pause; the stats ticker is frozen while paused
        fn toggle_pause(&mut self) -> Option<SessionPhase> {
            let now = self.now();
            let phase = self.session.toggle_pause(now)?;
            match phase {
                SessionPhase::Paused => {
                    self.clear_stats_timer();
                    self.stats_phase.freeze(now);
                    set_html(&self.document, "pauseButton", "Resume");
                }
                _ => {
                    self.stats_phase.thaw(now);
                    set_html(&self.document, "pauseButton", "Pause");
                }
            }
            Some(phase)
        }

        /// Milliseconds until the next stats tick is due
        fn stats_delay(&self) -> f64 {
            self.stats_phase
                .next_due()
                .map_or(STATS_TICK_MS, |due| (due - self.now()).clamp(0.0, STATS_TICK_MS))
        }

        fn react(&mut self, events: &[GameEvent], now: f64) {
            if let Some(game) = self.session.game() {
                self.effects.apply_events(events, game, &self.settings, now);
            }
            for event in events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
            }
        }

        /// Run one frame
        fn frame(&mut self) {
            let now = self.now();
            let events = self.session.frame(now);
            self.react(&events, now);
            self.effects.update();

            match self.session.game() {
                Some(game) => draw_frame(&mut self.surface, game, &self.effects, &self.settings, now),
                None => self.surface.clear(colors::BACKGROUND),
            }

            let glow = self.effects.glow(now);
            if glow.is_some() || self.glowing {
                self.surface.set_glow(glow);
                self.glowing = glow.is_some();
            }

            let phase = self.session.phase();
            if phase != self.last_phase {
                if let SessionPhase::Ended(outcome) = phase {
                    self.stop_stats();
                    self.show_game_over(outcome);
                }
                self.last_phase = phase;
            }
            self.update_hud(now);
        }

        /// Returns false once the token went stale
        fn stats_tick(&mut self, token: TickerToken) -> bool {
            if !self.session.stats_tick(token) {
                self.stop_stats();
                return false;
            }
            let now = self.now();
            self.stats_phase.start(now);
            let events = self.session.drain_events();
            self.react(&events, now);
            true
        }

        fn show_game_over(&mut self, outcome: Outcome) {
            let Some(summary) = self.session.last_summary().cloned() else {
                return;
            };
            let (title, message) = match outcome {
                Outcome::Win => ("Victory!", "You freed the grid from the snake!"),
                Outcome::Loss => ("End of the Rebellion", "The snake took back control of the grid."),
            };
            let doc = &self.document;
            set_text(doc, "gameOverTitle", title);
            set_text(doc, "gameOverMessage", message);
            set_text(doc, "finalScore", &summary.final_score.to_string());
            set_text(doc, "finalTime", &format_clock(summary.elapsed_secs));
            set_text(doc, "finalObjects", &summary.collected.to_string());
            set_display(doc, "gameOverScreen", "flex");
            if summary.new_best {
                self.audio.play(SoundEffect::NewBest);
            }
        }

        fn back_to_menu(&mut self) {
            if self.session.back_to_menu() {
                self.stop_stats();
                self.stats_token = None;
                self.effects.reset();
                set_display(&self.document, "gameOverScreen", "none");
                set_display(&self.document, "introScreen", "flex");
            }
        }

        fn toggle_sound(&mut self) {
            let on = self.settings.toggle_sound();
            self.audio.apply_settings(&self.settings);
            if let Err(e) = self.settings.save(&mut self.settings_store) {
                log::warn!("Could not save settings: {e}");
            }
            set_html(&self.document, "soundButton", if on { "Sound: on" } else { "Sound: off" });
            log::info!("Sound {}", if on { "enabled" } else { "disabled" });
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, now: f64) {
            let hud = self.session.hud(now);
            let doc = &self.document;
            set_text(doc, "score", &hud.score.to_string());
            set_text(doc, "lives", &hud.lives.to_string());
            let power = match hud.modifier_secs_left {
                Some(secs) => format!("{secs}s"),
                None => "-".to_string(),
            };
            set_text(doc, "power", &power);
            set_text(doc, "snakeLength", &hud.pursuer_length.to_string());
            set_text(doc, "gameMode", hud.mode_label);
            set_text(doc, "gameTime", &hud.elapsed);
            set_text(doc, "survivalTime", &hud.elapsed);
            set_text(doc, "objectsCollected", &hud.collected.to_string());
            set_text(doc, "gamesPlayed", &hud.games_played.to_string());
            set_text(doc, "bestScore", &hud.best_score.to_string());
        }
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_html(doc: &Document, id: &str, html: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_inner_html(html);
        }
    }

    fn set_display(doc: &Document, id: &str, display: &str) {
        let el = doc
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(el) = el {
            let _ = el.style().set_property("display", display);
        }
    }

    pub fn run() -> GameResult<()> {
        log::info!("Inverted Snake starting...");

        let window = web_sys::window().ok_or_else(|| GameError::Display("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GameError::Display("no document".into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or_else(|| GameError::MissingElement("gameCanvas".into()))?
            .dyn_into()
            .map_err(|_| GameError::MissingElement("gameCanvas".into()))?;

        let grid = Grid::from_surface(canvas.width(), canvas.height(), CELL_SIZE)?;
        let surface = CanvasSurface::new(canvas)?;
        let settings_store = LocalStore::open()?;
        let settings = Settings::load(&settings_store);
        let session = Session::new(grid, Tuning::default(), Box::new(LocalStore::open()?));
        log::info!("Grid {}x{} cells", grid.width, grid.height);

        let game = Rc::new(RefCell::new(Game {
            session,
            surface,
            effects: Effects::new(js_sys::Date::now() as u64),
            audio: AudioManager::new(&settings),
            settings,
            settings_store,
            clock: BrowserClock::new(),
            document: document.clone(),
            stats_handle: None,
            stats_phase: Interval::stopped(STATS_TICK_MS),
            stats_token: None,
            glowing: false,
            last_phase: SessionPhase::Idle,
        }));
        {
            let g = game.borrow();
            g.update_hud(g.now());
        }

        setup_keyboard(game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        request_animation_frame(game);

        log::info!("Inverted Snake ready");
        Ok(())
    }

    fn start_game(game: &Rc<RefCell<Game>>) {
        let token = game.borrow_mut().start();
        start_stats(game, token);
    }

    /// Schedule the per-second stats tick for `token`'s run
    fn start_stats(game: &Rc<RefCell<Game>>, token: TickerToken) {
        let Some(window) = web_sys::window() else { return };
        let ticker = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || {
                game.borrow_mut().stats_tick(token);
            })
        };
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            ticker.as_ref().unchecked_ref(),
            STATS_TICK_MS as i32,
        );
        ticker.forget();
        match handle {
            Ok(handle) => game.borrow_mut().stats_handle = Some(StatsHandle::Interval(handle)),
            Err(e) => log::error!("Could not schedule the stats tick: {e:?}"),
        }
    }

    /// Finish the period a pause interrupted, then tick every second again
    fn resume_stats(game: &Rc<RefCell<Game>>, token: TickerToken) {
        let delay = game.borrow().stats_delay();
        if delay >= STATS_TICK_MS {
            start_stats(game, token);
            return;
        }
        let Some(window) = web_sys::window() else { return };
        let rest = {
            let game = game.clone();
            Closure::once(move || {
                let live = {
                    let mut g = game.borrow_mut();
                    g.stats_handle = None;
                    g.stats_tick(token)
                };
                if live {
                    start_stats(&game, token);
                }
            })
        };
        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            rest.as_ref().unchecked_ref(),
            delay as i32,
        );
        rest.forget();
        match handle {
            Ok(handle) => game.borrow_mut().stats_handle = Some(StatsHandle::Timeout(handle)),
            Err(e) => log::error!("Could not resume the stats tick: {e:?}"),
        }
    }

    fn toggle_pause(game: &Rc<RefCell<Game>>) {
        let (phase, token) = {
            let mut g = game.borrow_mut();
            (g.toggle_pause(), g.stats_token)
        };
        if let (Some(SessionPhase::Running), Some(token)) = (phase, token) {
            resume_stats(game, token);
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(command) = map_key(&event.key()) else { return };
            // Keep arrows and space from scrolling the page
            event.prevent_default();
            match command {
                Command::Steer(heading) => {
                    game.borrow_mut().session.steer(heading);
                }
                Command::TogglePause => toggle_pause(&game),
                Command::ToggleAutopilot => {
                    game.borrow_mut().session.toggle_autopilot();
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut() + 'static) {
        let Some(button) = document.get_element_by_id(id) else {
            log::warn!("Button #{id} not found");
            return;
        };
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "startButton", move || start_game(&game));
        }
        {
            let game = game.clone();
            on_click(document, "playAgainButton", move || start_game(&game));
        }
        {
            let game = game.clone();
            on_click(document, "backToMenuButton", move || game.borrow_mut().back_to_menu());
        }
        {
            let game = game.clone();
            on_click(document, "pauseButton", move || toggle_pause(&game));
        }
        {
            let game = game.clone();
            on_click(document, "restartButton", move || {
                let confirmed = web_sys::window()
                    .and_then(|w| {
                        w.confirm_with_message("Really restart? Your progress will be lost.")
                            .ok()
                    })
                    .unwrap_or(false);
                if confirmed {
                    log::info!("Restarting game");
                    start_game(&game);
                }
            });
        }
        on_click(document, "soundButton", move || game.borrow_mut().toggle_sound());
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        let pause_if_running = {
            let game = game.clone();
            move |reason: &str| {
                let running = game.borrow().session.phase() == SessionPhase::Running;
                if running {
                    toggle_pause(&game);
                    log::info!("Auto-paused ({reason})");
                }
            }
        };

        // Visibility change (tab switch, minimize)
        {
            let pause = pause_if_running.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    pause("tab hidden");
                }
            });
            let _ = document
                .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                pause_if_running("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Inverted Snake (native) starting...");
    log::info!("The playable game runs in the browser - build for wasm32 to play");

    if let Err(e) = headless::run(std::env::args().skip(1)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autopilot demo against a recording surface.
///
/// Usage: `inverted-snake [seed] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use inverted_snake::consts::CELL_SIZE;
    use inverted_snake::persistence::MemoryStore;
    use inverted_snake::platform::ManualClock;
    use inverted_snake::renderer::CommandList;
    use inverted_snake::runner::Runner;
    use inverted_snake::sim::Grid;
    use inverted_snake::{GameError, GameResult, Session, SessionPhase, Settings, Tuning};

    const WIDTH: u32 = 800;
    const HEIGHT: u32 = 600;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after five minutes of play
    const MAX_FRAMES: u32 = 60 * 300;

    pub fn run(mut args: impl Iterator<Item = String>) -> GameResult<()> {
        let seed = match args.next() {
            Some(arg) => arg
                .parse()
                .map_err(|_| GameError::Tuning(format!("seed must be an integer, got {arg:?}")))?,
            None => 0x1a2b_3c4d,
        };
        let tuning = match args.next() {
            Some(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|e| GameError::Tuning(format!("{path}: {e}")))?;
                Tuning::from_json(&json)?
            }
            None => Tuning::default(),
        };

        let grid = Grid::from_surface(WIDTH, HEIGHT, CELL_SIZE)?;
        let clock = ManualClock::new(0.0);
        let session = Session::new(grid, tuning, Box::new(MemoryStore::new()));
        let mut runner = Runner::new(session, &clock, Settings::default());
        let mut surface = CommandList::new(WIDTH as f32, HEIGHT as f32);

        runner.set_autopilot(true);
        runner.start(seed);
        for _ in 0..MAX_FRAMES {
            clock.advance(FRAME_MS);
            runner.run_frame(&mut surface);
            if matches!(runner.session().phase(), SessionPhase::Ended(_)) {
                break;
            }
        }

        let hud = runner.hud();
        match runner.session().last_summary() {
            Some(summary) => log::info!(
                "Demo finished: {:?}, score {}, time {}, {} power-ups",
                summary.outcome,
                summary.final_score,
                hud.elapsed,
                summary.collected
            ),
            None => log::info!(
                "Demo still running after {}: score {}, {} lives, snake length {}",
                hud.elapsed,
                hud.score,
                hud.lives,
                hud.pursuer_length
            ),
        }
        Ok(())
    }
}
