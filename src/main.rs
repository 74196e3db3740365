//! Ghost Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::fmt::Write;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use ghost_run::audio::{AudioDirector, WebAudioSink};
    use ghost_run::consts::SIM_DT;
    use ghost_run::input::{InputEvent, InputSnapshot, Key};
    use ghost_run::persistence::LocalStorageStore;
    use ghost_run::platform::{FrameClock, Letterbox, escape_html};
    use ghost_run::renderer::{DrawCommand, DrawList, RenderState, TextAnchor, tessellate};
    use ghost_run::{FrameOutcome, Game, GameMode, HighScore, Settings};

    /// Browser-side wrapper around the game
    struct App {
        game: Game,
        /// Stored preferences, without the per-run seed
        settings: Settings,
        render_state: Option<RenderState>,
        clock: FrameClock,
        input: InputSnapshot,
        draw_list: DrawList,
        last_time: f64,
        dpr: f64,
        /// Last markup written to the text layer
        text_html: String,
        quit: bool,
    }

    impl App {
        fn letterbox(&self) -> Option<Letterbox> {
            self.render_state.as_ref().map(RenderState::letterbox)
        }

        /// CSS pixel offset inside the canvas to logical coordinates
        fn to_logical(&self, css_x: i32, css_y: i32) -> Vec2 {
            let pixels = Vec2::new(css_x as f32, css_y as f32) * self.dpr as f32;
            match self.letterbox() {
                Some(fit) => fit.to_logical(pixels),
                None => pixels,
            }
        }

        /// Route input, then run however many fixed ticks are due
        fn update(&mut self, dt: f32) {
            let input = self.input.take();
            if self.game.handle_input(&input) == FrameOutcome::Quit {
                self.quit = true;
                return;
            }
            if let Some(muted) = self.game.take_mute_change() {
                self.settings.start_muted = muted;
                self.settings.save();
            }
            for _ in 0..self.clock.advance(dt) {
                self.game.update();
            }
        }

        fn render(&mut self) {
            self.draw_list.clear();
            self.game.draw(&mut self.draw_list);
            let vertices = tessellate(self.draw_list.commands());

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Mirror the frame's text commands into the DOM text layer
        fn update_text_layer(&mut self) {
            let Some(fit) = self.letterbox() else { return };
            let mut html = String::new();
            for command in self.draw_list.commands() {
                if let DrawCommand::Text {
                    text,
                    pos,
                    size,
                    color,
                    anchor,
                } = command
                {
                    let at = fit.to_pixels(*pos) / self.dpr as f32;
                    let font = size * fit.scale / self.dpr as f32;
                    let class = match anchor {
                        TextAnchor::TopLeft => "text",
                        TextAnchor::Center => "text center",
                    };
                    let _ = write!(
                        html,
                        "<span class=\"{class}\" style=\"left:{:.1}px;top:{:.1}px;\
                         font-size:{:.1}px;color:rgba({},{},{},{:.3})\">{}</span>",
                        at.x,
                        at.y,
                        font,
                        color.r,
                        color.g,
                        color.b,
                        color.a as f32 / 255.0,
                        escape_html(text),
                    );
                }
            }
            if html == self.text_html {
                return;
            }
            if let Some(layer) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("text-layer"))
            {
                layer.set_inner_html(&html);
            }
            self.text_html = html;
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Ghost Run starting...");

        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let seeded = Settings {
            seed: Some(seed),
            ..settings.clone()
        };
        let audio = AudioDirector::new(Box::new(WebAudioSink::new()), &settings);
        let store = LocalStorageStore::new(LocalStorageStore::DEFAULT_KEY);
        let high_score = HighScore::load(Box::new(store));
        let app = Rc::new(RefCell::new(App {
            game: Game::new(&seeded, audio, high_score),
            settings,
            render_state: None,
            clock: FrameClock::default(),
            input: InputSnapshot::new(),
            draw_list: DrawList::new(),
            last_time: 0.0,
            dpr,
            text_html: String::new(),
            quit: false,
        }));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU, falling back to WebGL2
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {e}");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("{e}");
                return;
            }
        }

        setup_input_handlers(&canvas, app.clone());
        setup_resize(canvas.clone(), app.clone());
        setup_auto_pause(app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Ghost Run running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let pos = a.to_logical(event.offset_x(), event.offset_y());
                a.input.push(InputEvent::PointerMoved(pos));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Left click
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let mut a = app.borrow_mut();
                let pos = a.to_logical(event.offset_x(), event.offset_y());
                a.input.push(InputEvent::PointerClicked(pos));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else { return };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_code(&event.code());
                if key == Key::Other || event.repeat() {
                    return;
                }
                // Keep space and arrows from scrolling the page
                event.prevent_default();
                app.borrow_mut().input.push(InputEvent::KeyDown(key));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let mut a = app.borrow_mut();
            a.dpr = dpr;
            if let Some(render_state) = a.render_state.as_mut() {
                render_state.resize(width, height);
            }
            // Force the text layer to re-layout
            a.text_html.clear();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            if a.quit {
                log::info!("Ghost Run stopped");
                if let Some(el) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("quit-message"))
                {
                    let _ = el.set_attribute("class", "");
                }
                return;
            }
            a.render();
            a.update_text_layer();
        }

        request_animation_frame(app);
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    if a.game.mode() == GameMode::Playing {
                        a.game.suspend();
                        log::info!("Auto-paused (tab hidden)");
                    }
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
                let mut a = app.borrow_mut();
                if a.game.mode() == GameMode::Playing {
                    a.game.suspend();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant};

    use ghost_run::audio::{AudioDirector, AudioSink, NullSink};
    use ghost_run::consts::{FPS, SIM_DT};
    use ghost_run::input::{InputEvent, InputSnapshot, Key};
    use ghost_run::persistence::JsonFileStore;
    use ghost_run::platform::FrameClock;
    use ghost_run::renderer::{DrawList, tessellate};
    use ghost_run::sim::Autopilot;
    use ghost_run::{FrameOutcome, Game, GameMode, HighScore, Settings};

    /// Attract-mode run length: two minutes of play
    const DEMO_FRAMES: u64 = FPS as u64 * 120;

    fn open_sink() -> Box<dyn AudioSink> {
        #[cfg(feature = "native-audio")]
        {
            match ghost_run::audio::RodioSink::new() {
                Ok(sink) => return Box::new(sink),
                Err(e) => log::warn!("No audio output, running silent: {e}"),
            }
        }
        Box::new(NullSink::new())
    }

    /// Headless attract mode: the autopilot plays one session at 60 Hz
    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Ghost Run (native) starting...");
        log::info!(
            "Native mode runs a headless attract demo - run with `trunk serve` for the web version"
        );

        let mut settings = Settings::load();
        let mut audio = AudioDirector::new(open_sink(), &settings);
        audio.use_music_file(&settings.music_path);
        let high_score = HighScore::load(Box::new(JsonFileStore::new(&settings.highscore_path)));
        let mut game = Game::new(&settings, audio, high_score);
        let autopilot = Autopilot::default();

        let mut clock = FrameClock::default();
        let mut pending = InputSnapshot::new();
        pending.push(InputEvent::PointerClicked(game.buttons().start.rect.center()));
        let mut draw_list = DrawList::new();
        let mut peak_vertices = 0;
        let mut frames = 0u64;
        let frame_time = Duration::from_secs_f32(SIM_DT);
        let mut last = Instant::now();

        'demo: while frames < DEMO_FRAMES {
            let now = Instant::now();
            let ticks = clock.advance((now - last).as_secs_f32());
            last = now;

            for _ in 0..ticks {
                if game.mode() == GameMode::Playing && autopilot.wants_jump(game.session()) {
                    pending.push(InputEvent::KeyDown(Key::Space));
                }
                if game.frame(&pending.take()) == FrameOutcome::Quit {
                    break 'demo;
                }
                if let Some(muted) = game.take_mute_change() {
                    settings.start_muted = muted;
                    settings.save();
                }
                frames += 1;
            }
            if game.mode() == GameMode::GameOver {
                break;
            }

            draw_list.clear();
            game.draw(&mut draw_list);
            peak_vertices = peak_vertices.max(tessellate(draw_list.commands()).len());

            std::thread::sleep(frame_time.saturating_sub(now.elapsed()));
        }

        log::info!(
            "Demo finished after {frames} frames ({:?}): score {}, high score {}, \
             peak {peak_vertices} vertices",
            game.mode(),
            game.score(),
            game.high_score()
        );
        game.shutdown();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
