//! Mode state machine
//!
//! `Game` owns the session, particles, RNG, audio director, high score and
//! buttons. Each frame it routes input to the active mode, advances that
//! mode one tick and, on request, draws it onto a `Surface`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::AudioDirector;
use crate::consts::*;
use crate::highscores::HighScore;
use crate::input::{InputEvent, InputSnapshot, Key};
use crate::renderer::Surface;
use crate::renderer::scene;
use crate::settings::Settings;
use crate::sim::{Burst, ParticleSystem, Session, SessionEvent, particles};
use crate::ui::{Button, Buttons, UiAction};

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// What the shell should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Dust kicked up by an accepted jump, relative to the ghost's top-left
const JUMP_DUST_OFFSET: Vec2 = Vec2::new(10.0, 40.0);

/// Overlay opacity over the frozen world
const PAUSE_DIM: u8 = 128;
const GAME_OVER_DIM: u8 = 180;

pub struct Game {
    mode: GameMode,
    session: Session,
    particles: ParticleSystem,
    rng: Pcg32,
    audio: AudioDirector,
    high_score: HighScore,
    buttons: Buttons,
    /// Background scroll offset, in (-SCREEN_WIDTH, 0]
    background_x: f32,
    /// Frames advanced outside of Paused; drives cloud drift
    clock: u64,
    /// Mute toggled since the shell last asked
    mute_changed: bool,
}

impl Game {
    pub fn new(settings: &Settings, audio: AudioDirector, high_score: HighScore) -> Self {
        let rng = match settings.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        let mut buttons = Buttons::new();
        buttons.set_muted(audio.is_muted());
        Self {
            mode: GameMode::Menu,
            session: Session::new(),
            particles: ParticleSystem::new(settings.max_particles()),
            rng,
            audio,
            high_score,
            buttons,
            background_x: 0.0,
            clock: 0,
            mute_changed: false,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn is_muted(&self) -> bool {
        self.audio.is_muted()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn buttons(&self) -> &Buttons {
        &self.buttons
    }

    pub fn background_x(&self) -> f32 {
        self.background_x
    }

    /// New mute state if it was toggled since the last call
    ///
    /// The shell stores it as the `start_muted` preference.
    pub fn take_mute_change(&mut self) -> Option<bool> {
        std::mem::take(&mut self.mute_changed).then(|| self.audio.is_muted())
    }

    /// Handle input then advance one tick
    pub fn frame(&mut self, input: &InputSnapshot) -> FrameOutcome {
        if self.handle_input(input) == FrameOutcome::Quit {
            return FrameOutcome::Quit;
        }
        self.update();
        FrameOutcome::Continue
    }

    /// Route this frame's events to the active mode and refresh hover state
    pub fn handle_input(&mut self, input: &InputSnapshot) -> FrameOutcome {
        let gesture = input
            .events
            .iter()
            .any(|e| matches!(e, InputEvent::KeyDown(_) | InputEvent::PointerClicked(_)));
        if gesture {
            self.audio.unlock();
        }
        for event in &input.events {
            let outcome = match *event {
                InputEvent::Quit => FrameOutcome::Quit,
                InputEvent::KeyDown(key) => {
                    self.on_key(key);
                    FrameOutcome::Continue
                }
                InputEvent::PointerClicked(pos) => match self.button_at(pos) {
                    Some(action) => self.apply(action),
                    None => FrameOutcome::Continue,
                },
                InputEvent::PointerMoved(_) => FrameOutcome::Continue,
            };
            if outcome == FrameOutcome::Quit {
                log::info!("Quit requested");
                self.audio.shutdown();
                return FrameOutcome::Quit;
            }
        }

        let pointer = input.pointer;
        for button in self.buttons_mut() {
            button.update(pointer);
        }
        FrameOutcome::Continue
    }

    fn on_key(&mut self, key: Key) {
        match (self.mode, key) {
            (GameMode::Playing, k) if k.is_jump() => self.jump(),
            (GameMode::Playing, Key::Escape) => self.pause(),
            (GameMode::Paused, Key::Escape) => self.resume(),
            _ => {}
        }
    }

    /// Buttons that are live in the current mode, topmost first
    fn active_buttons(&self) -> Vec<&Button> {
        let b = &self.buttons;
        match self.mode {
            GameMode::Menu => vec![&b.start, &b.quit],
            GameMode::Playing => vec![&b.toggle_pause, &b.mute],
            GameMode::Paused => vec![&b.toggle_pause, &b.mute, &b.resume, &b.pause_menu],
            GameMode::GameOver => vec![&b.restart, &b.menu],
        }
    }

    fn buttons_mut(&mut self) -> [&mut Button; 8] {
        let b = &mut self.buttons;
        [
            &mut b.start,
            &mut b.quit,
            &mut b.restart,
            &mut b.menu,
            &mut b.resume,
            &mut b.pause_menu,
            &mut b.toggle_pause,
            &mut b.mute,
        ]
    }

    fn button_at(&self, pos: Vec2) -> Option<UiAction> {
        self.active_buttons().into_iter().find_map(|b| b.click(pos))
    }

    fn apply(&mut self, action: UiAction) -> FrameOutcome {
        match action {
            UiAction::Quit => return FrameOutcome::Quit,
            UiAction::Start | UiAction::Restart => self.start_session(),
            UiAction::MainMenu => self.main_menu(),
            UiAction::Resume => self.resume(),
            UiAction::TogglePause => match self.mode {
                GameMode::Playing => self.pause(),
                GameMode::Paused => self.resume(),
                _ => {}
            },
            UiAction::ToggleMute => {
                let muted = self.audio.toggle_mute(self.mode == GameMode::Playing);
                self.buttons.set_muted(muted);
                self.mute_changed = true;
            }
        }
        FrameOutcome::Continue
    }

    fn set_mode(&mut self, mode: GameMode) {
        log::debug!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.buttons.set_paused(mode == GameMode::Paused);
    }

    /// Menu/GameOver -> Playing with a fresh session
    fn start_session(&mut self) {
        self.session = Session::new();
        self.particles.clear();
        self.background_x = 0.0;
        self.set_mode(GameMode::Playing);
        self.audio.on_session_start();
        log::info!("Session started (high score {})", self.high_score.best());
    }

    fn pause(&mut self) {
        if self.mode == GameMode::Playing {
            self.set_mode(GameMode::Paused);
            self.audio.on_pause();
        }
    }

    fn resume(&mut self) {
        if self.mode == GameMode::Paused {
            self.set_mode(GameMode::Playing);
            self.audio.on_resume();
        }
    }

    /// Pause if a session is running; used when the host loses focus
    pub fn suspend(&mut self) {
        self.pause();
    }

    /// Stop audio before the host tears down
    pub fn shutdown(&mut self) {
        self.audio.shutdown();
    }

    fn main_menu(&mut self) {
        self.audio.on_stop();
        self.set_mode(GameMode::Menu);
    }

    fn jump(&mut self) {
        if self.session.jump() {
            let origin = self.session.ghost.pos + JUMP_DUST_OFFSET;
            self.emit(origin, particles::JUMP_DUST);
            self.audio.play_jump();
        }
    }

    fn emit(&mut self, origin: Vec2, burst: Burst) {
        self.particles.emit(origin, burst, &mut self.rng);
    }

    /// Advance the active mode by one tick
    pub fn update(&mut self) {
        match self.mode {
            GameMode::Menu => self.scroll(1.0),
            GameMode::Playing => {
                let events = self.session.tick(&mut self.rng);
                for event in events {
                    self.on_session_event(event);
                }
                self.scroll(2.0 * self.session.difficulty());
                self.particles.update();
            }
            GameMode::Paused => return,
            GameMode::GameOver => self.particles.update(),
        }
        self.clock += 1;
    }

    fn scroll(&mut self, speed: f32) {
        self.background_x -= speed;
        if self.background_x <= -SCREEN_WIDTH {
            self.background_x = 0.0;
        }
    }

    fn on_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ObstaclePassed { kind } => {
                log::trace!("passed {kind:?}, score {}", self.session.score);
            }
            SessionEvent::Collected { pos } => {
                self.emit(pos, particles::COLLECT_SPARKLE);
                self.audio.play_collect();
            }
            SessionEvent::Crashed {
                kind,
                ghost_pos,
                obstacle_pos,
            } => {
                self.emit(ghost_pos, particles::GHOST_DEBRIS);
                self.emit(obstacle_pos, particles::OBSTACLE_DEBRIS.with_color(kind.color()));
                self.game_over();
            }
        }
    }

    /// Playing -> GameOver
    fn game_over(&mut self) {
        let score = self.session.score;
        let record = self.high_score.submit(score);
        log::info!(
            "Session over: score {score}, high score {}{}",
            self.high_score.best(),
            if record { " (new record)" } else { "" }
        );
        self.audio.on_stop();
        self.set_mode(GameMode::GameOver);
    }

    /// Draw the active mode
    pub fn draw(&self, surface: &mut dyn Surface) {
        scene::background(surface, self.background_x, self.clock as f32);

        match self.mode {
            GameMode::Menu => {
                scene::title(surface);
                scene::button(surface, &self.buttons.start);
                scene::button(surface, &self.buttons.quit);
            }
            GameMode::Playing => {
                self.draw_world(surface);
                scene::particles(surface, &self.particles);
                scene::hud(surface, self.session.score, self.high_score.best(), &self.buttons);
            }
            GameMode::Paused => {
                self.draw_world(surface);
                scene::hud(surface, self.session.score, self.high_score.best(), &self.buttons);
                scene::dim(surface, PAUSE_DIM);
                scene::paused_banner(surface);
                scene::button(surface, &self.buttons.resume);
                scene::button(surface, &self.buttons.pause_menu);
                // Toggles stay usable above the overlay
                scene::hud_toggles(surface, &self.buttons);
            }
            GameMode::GameOver => {
                scene::ghost(surface, &self.session.ghost);
                for obstacle in &self.session.obstacles {
                    scene::obstacle(surface, obstacle);
                }
                scene::particles(surface, &self.particles);
                scene::dim(surface, GAME_OVER_DIM);
                scene::game_over_banner(surface, self.session.score);
                scene::button(surface, &self.buttons.restart);
                scene::button(surface, &self.buttons.menu);
            }
        }
    }

    fn draw_world(&self, surface: &mut dyn Surface) {
        for collectible in &self.session.collectibles {
            scene::collectible(surface, collectible);
        }
        for obstacle in &self.session.obstacles {
            scene::obstacle(surface, obstacle);
        }
        scene::ghost(surface, &self.session.ghost);
    }
}
