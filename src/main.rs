//! Lunar Defence entry point
//!
//! The browser build runs the game on a canvas. The native build runs the
//! simulation headless (autopilot by default) and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use lunar_defence::assets::SpriteSizes;
    use lunar_defence::audio::AudioManager;
    use lunar_defence::consts::*;
    use lunar_defence::platform::{KeyAction, PointerInput, Viewport, key_action};
    use lunar_defence::render::canvas::{CanvasSurface, SpriteAtlas};
    use lunar_defence::render::{HudOverlay, build_scene, loading_scene, present};
    use lunar_defence::sim::{GameEvent, GameState, TickFlow, tick};
    use lunar_defence::{GameConfig, GameError, GameResult, Settings};

    /// Game instance holding all state
    struct Game {
        config: GameConfig,
        settings: Settings,
        /// `None` while loading
        state: Option<GameState>,
        surface: CanvasSurface,
        audio: AudioManager,
        input: PointerInput,
        accumulator: f32,
        last_time: f64,
        running: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(config: GameConfig, settings: Settings, surface: CanvasSurface) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                config,
                settings,
                state: None,
                surface,
                audio,
                input: PointerInput::new(),
                accumulator: 0.0,
                last_time: 0.0,
                running: true,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let Some(state) = self.state.as_mut() else {
                return;
            };

            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.next_tick();
                self.accumulator -= SIM_DT;
                substeps += 1;

                if tick(state, &input, &self.config) == TickFlow::Quit {
                    self.running = false;
                    break;
                }
            }

            for event in state.drain_events() {
                match event {
                    GameEvent::Sound(sound) => self.audio.play(sound),
                    GameEvent::WaveStarted { wave, asteroids } => {
                        log::info!("Wave {wave}: {asteroids} incoming")
                    }
                    GameEvent::WaveCleared { wave } => log::info!("Wave {wave} cleared"),
                    GameEvent::PlanetImpacted => log::info!("Planet hit"),
                    GameEvent::GameOver { wave } => log::info!("Game over on wave {wave}"),
                }
            }
            self.audio.update_music();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let cmds = match &self.state {
                Some(state) => {
                    let overlay = HudOverlay {
                        fps: self.settings.show_fps.then_some(self.fps),
                        debug: self.settings.show_debug,
                    };
                    build_scene(state, &self.surface, overlay)
                }
                None => loading_scene(&self.surface),
            };
            if let Err(e) = present(&mut self.surface, &cmds) {
                log::warn!("Render error: {e}");
            }
        }

        fn handle_key(&mut self, action: KeyAction) {
            match action {
                KeyAction::Quit => self.input.request_quit(),
                KeyAction::ToggleFullscreen => toggle_fullscreen(),
                KeyAction::ToggleIdle => {
                    let idle = self.input.toggle_idle();
                    log::info!("Idle mode: {idle}");
                }
                KeyAction::ToggleDebug => {
                    self.settings.show_debug = !self.settings.show_debug;
                    self.settings.save();
                }
                KeyAction::ToggleFps => {
                    self.settings.show_fps = !self.settings.show_fps;
                    self.settings.save();
                }
                KeyAction::Ignored => {}
            }
        }
    }

    fn toggle_fullscreen() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if document.fullscreen_element().is_some() {
            document.exit_fullscreen();
        } else if let Some(canvas) = document.get_element_by_id("canvas") {
            if let Err(e) = canvas.request_fullscreen() {
                log::warn!("Fullscreen refused: {e:?}");
            }
        }
    }

    fn viewport(canvas: &HtmlCanvasElement) -> Viewport {
        let rect = canvas.get_bounding_client_rect();
        Viewport {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        }
    }

    /// Resolve on the next animation frame, so the loading screen gets painted
    async fn next_frame() {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window() {
                let _ = window.request_animation_frame(&resolve);
            }
        });
        let _ = JsFuture::from(promise).await;
    }

    pub async fn run() -> GameResult<()> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger unavailable: {e}").into());
        }

        log::info!("Lunar Defence starting...");

        let window = web_sys::window().ok_or_else(|| GameError::Surface("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GameError::Surface("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| GameError::Surface("no #canvas element".into()))?
            .dyn_into()
            .map_err(|_| GameError::Surface("#canvas is not a canvas".into()))?;

        let config = GameConfig::load();
        let settings = Settings::load();
        let surface = CanvasSurface::new(&canvas)?;
        let game = Rc::new(RefCell::new(Game::new(config, settings, surface)));

        // Loading screen first, then build sprites
        game.borrow_mut().render();
        next_frame().await;

        let atlas = SpriteAtlas::generate(&document)?;
        let sizes = SpriteSizes::resolve(&atlas)?;
        let seed = js_sys::Date::now() as u64;
        {
            let mut g = game.borrow_mut();
            g.surface.set_atlas(atlas);
            g.state = Some(GameState::new(&g.config, &sizes, seed));
        }
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_focus_handlers(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Lunar Defence running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let view = viewport(&canvas_clone);
                game.borrow_mut().input.on_pointer_move(
                    &view,
                    event.client_x() as f64,
                    event.client_y() as f64,
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Primary button down - shoot / start / restart
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.button() != 0 {
                    return;
                }
                event.prevent_default();
                let view = viewport(&canvas_clone);
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input
                    .on_pointer_down(&view, event.client_x() as f64, event.client_y() as f64);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let action = key_action(&event.key());
                game.borrow_mut().handle_key(action);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (click outside, tab switch)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                    log::info!("Muted (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus regained
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();

            if !g.running {
                g.audio.set_muted(true);
                log::info!("Quit - game loop stopped");
                return;
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await.map_err(|e| {
        log::error!("Startup failed: {e}");
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::IVec2;

    use lunar_defence::GameConfig;
    use lunar_defence::assets::SpriteSizes;
    use lunar_defence::screen_center;
    use lunar_defence::sim::{GameEvent, GameState, Phase, TickFlow, TickInput, tick};

    /// Run Lunar Defence headless and report how far the run gets
    #[derive(Debug, Parser)]
    #[command(name = "lunar-defence", version, about)]
    pub struct Args {
        /// Config file (TOML); defaults to ./lunar-defence.toml if present
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed for the asteroid fields
        #[arg(short, long, default_value_t = 1)]
        seed: u64,

        /// Simulation ticks to run (60 per second)
        #[arg(short, long, default_value_t = 60 * 60)]
        ticks: u64,

        /// Leave the autopilot off (nobody clicks, so the game never starts)
        #[arg(long)]
        no_autopilot: bool,

        /// Print the effective config as TOML and exit
        #[arg(long)]
        print_config: bool,
    }

    pub fn run(args: Args) -> Result<()> {
        let config = match &args.config {
            Some(path) => GameConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GameConfig::load(),
        };

        if args.print_config {
            print!("{}", config.to_toml_string());
            return Ok(());
        }

        let sizes = SpriteSizes::default();
        let mut state = GameState::new(&config, &sizes, args.seed);
        let input = TickInput {
            pointer: screen_center() + IVec2::new(0, -200),
            idle_mode: !args.no_autopilot,
            ..Default::default()
        };

        log::info!("Running {} ticks with seed {}", args.ticks, args.seed);
        let mut best_wave = 0;
        let mut game_overs = 0;
        for _ in 0..args.ticks {
            if tick(&mut state, &input, &config) == TickFlow::Quit {
                break;
            }
            for event in state.drain_events() {
                match event {
                    GameEvent::Sound(sound) => log::trace!("sound {sound:?}"),
                    GameEvent::WaveStarted { wave, asteroids } => {
                        best_wave = best_wave.max(wave);
                        log::info!("t={} wave {wave}: {asteroids} asteroids", state.time_ticks);
                    }
                    GameEvent::WaveCleared { wave } => {
                        log::info!("t={} wave {wave} cleared", state.time_ticks)
                    }
                    GameEvent::PlanetImpacted => log::info!("t={} planet hit", state.time_ticks),
                    GameEvent::GameOver { wave } => {
                        game_overs += 1;
                        log::info!("t={} game over on wave {wave}", state.time_ticks);
                    }
                }
            }
        }

        let phase = match state.phase() {
            Phase::WaitingToStart => "waiting to start",
            Phase::WaveActive => "wave active",
            Phase::BetweenWaves => "between waves",
            Phase::GameOverPause | Phase::GameOver => "game over",
        };
        println!(
            "After {} ticks: wave {} ({phase}), best wave {best_wave}, {} asteroids left ({} in flight), {game_overs} game over(s)",
            state.time_ticks,
            state.wave,
            state.count,
            state.asteroids.alive_count()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    headless::run(headless::Args::parse())
}
