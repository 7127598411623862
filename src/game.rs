//! Game controller
//!
//! Owns one session, one drawing surface and at most one pending frame
//! request. Each frame runs the fixed-timestep catch-up, routes tick events
//! to the audio and score hooks, draws, and asks for the next frame.

use crate::audio::SoundEffect;
use crate::best_score::BestScore;
use crate::consts::*;
use crate::error::GameError;
use crate::platform::{self, FrameHandle, FrameScheduler, InputTracker, Key};
use crate::renderer::{RenderOptions, Surface, render};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameSession, Playfield, tick};
use crate::tuning::Tuning;

/// What the host should do after a DOM key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyResponse {
    /// Block the browser's default action (page scroll)
    pub suppress_default: bool,
    /// The press took the game from running to Idle; hide the game view
    pub closed_view: bool,
}

type ScoreHook = Box<dyn FnMut(u64)>;
type AudioHook = Box<dyn FnMut(SoundEffect)>;

pub struct Game<F: FrameScheduler, D: Surface> {
    session: GameSession,
    surface: Option<D>,
    scheduler: F,
    /// The single outstanding frame request, if any
    pending: Option<FrameHandle>,
    input: InputTracker,
    accumulator: f32,
    /// Host timestamp of the previous frame
    last_time: Option<f64>,
    settings: Settings,
    best: BestScore,
    on_score: Option<ScoreHook>,
    on_sound: Option<AudioHook>,
}

impl<F: FrameScheduler, D: Surface> Game<F, D> {
    pub fn new(tuning: Tuning, settings: Settings, scheduler: F, seed: u64) -> Self {
        let mut session = GameSession::new(seed, Playfield::default(), tuning);
        session.particle_budget = settings.max_particles();
        Self {
            session,
            surface: None,
            scheduler,
            pending: None,
            input: InputTracker::new(),
            accumulator: 0.0,
            last_time: None,
            settings,
            best: BestScore::load(),
            on_score: None,
            on_sound: None,
        }
    }

    pub fn attach_surface(&mut self, surface: D) {
        let (w, h) = surface.size();
        self.session.set_playfield(Playfield::new(w, h));
        self.surface = Some(surface);
    }

    /// Called with the final score once per game over
    pub fn set_score_hook(&mut self, hook: impl FnMut(u64) + 'static) {
        self.on_score = Some(Box::new(hook));
    }

    /// Called for each sound effect while sound is enabled
    pub fn set_audio_hook(&mut self, hook: impl FnMut(SoundEffect) + 'static) {
        self.on_sound = Some(Box::new(hook));
    }

    /// Begin a run. Does nothing while already playing.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.session.is_playing() {
            log::debug!("start ignored, already playing");
            return Ok(());
        }
        let (w, h) = self
            .surface
            .as_ref()
            .ok_or(GameError::SurfaceUnavailable)?
            .size();

        self.session.set_playfield(Playfield::new(w, h));
        self.session.particle_budget = self.settings.max_particles();
        self.session.begin();
        self.accumulator = 0.0;
        self.last_time = None;

        if let Err(e) = self.arm_frame() {
            self.session.halt();
            return Err(e);
        }
        log::info!(
            "Game started ({}x{}, seed {}, {} quality)",
            w,
            h,
            self.session.seed,
            self.settings.quality.as_str()
        );
        Ok(())
    }

    /// Close the game view: cancel the frame, disarm the spawner, drop held keys
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        let was_running = self.is_running();
        self.session.halt();
        self.input.release_all();
        self.accumulator = 0.0;
        self.last_time = None;
        self.draw(0.0);
        if was_running {
            log::info!("Game stopped");
        }
    }

    pub fn exit(&mut self) {
        self.stop();
    }

    /// Fresh run from Game Over (or from Idle, same as `start`)
    pub fn restart(&mut self) -> Result<(), GameError> {
        if self.session.phase == GamePhase::Idle {
            return self.start();
        }
        self.session.particle_budget = self.settings.max_particles();
        self.session.begin();
        self.accumulator = 0.0;
        self.last_time = None;
        log::info!("Game restarted");
        self.arm_frame()
    }

    /// Playing or showing the Game Over overlay
    pub fn is_running(&self) -> bool {
        self.session.phase != GamePhase::Idle
    }

    pub fn key_down(&mut self, key: Key) {
        let fresh = self.input.press(key);
        match key {
            Key::Cancel => {
                self.input.release(key);
                if self.is_running() {
                    self.stop();
                }
            }
            Key::Restart | Key::Fire if fresh && self.session.phase == GamePhase::GameOver => {
                if let Err(e) = self.restart() {
                    log::error!("Restart failed: {}", e);
                }
            }
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.release(key);
    }

    /// Feed a DOM `KeyboardEvent.key`. Returns true when the browser default
    /// (scrolling) should be suppressed.
    pub fn key_down_dom(&mut self, dom_key: &str) -> bool {
        self.handle_key_down(dom_key).suppress_default
    }

    pub fn handle_key_down(&mut self, dom_key: &str) -> KeyResponse {
        let key = Key::from_dom(dom_key);
        let was_running = self.is_running();
        if let Some(key) = key {
            self.key_down(key);
        }
        KeyResponse {
            suppress_default: platform::should_suppress_default(key, was_running),
            closed_view: was_running && !self.is_running(),
        }
    }

    pub fn key_up_dom(&mut self, dom_key: &str) -> bool {
        let key = Key::from_dom(dom_key);
        let suppress = platform::should_suppress_default(key, self.is_running());
        if let Some(key) = key {
            self.key_up(key);
        }
        suppress
    }

    /// Frame callback. `now_ms` is the host's frame timestamp.
    pub fn frame(&mut self, now_ms: f64) {
        // The request that brought us here is spent
        self.pending = None;
        if self.session.phase == GamePhase::Idle {
            return;
        }

        let gap = match self.last_time {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_GAP_MS) as f32,
            None => SIM_DT_MS,
        };
        self.last_time = Some(now_ms);
        self.accumulator += gap;

        let input = self.input.tick_input();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            tick(&mut self.session, &input, SIM_DT_MS);
            self.dispatch_events();
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT_MS);
        }

        self.draw(now_ms);

        if let Err(e) = self.arm_frame() {
            log::error!("Could not schedule next frame: {}", e);
        }
    }

    fn arm_frame(&mut self) -> Result<(), GameError> {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.request()?);
        }
        Ok(())
    }

    fn dispatch_events(&mut self) {
        let events = std::mem::take(&mut self.session.events);
        for event in &events {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect);
            }
            if let GameEvent::GameOver { score } = *event {
                self.finish_run(score);
            }
        }
        self.session.events = events;
    }

    fn finish_run(&mut self, score: u64) {
        log::info!("Game over, final score {}", score);
        if let Some(hook) = self.on_score.as_mut() {
            hook(score);
        }
        if self.best.record(score, platform::now_ms()) {
            self.best.save();
            self.play(SoundEffect::NewBest);
        }
    }

    fn play(&mut self, effect: SoundEffect) {
        if !self.settings.sound_enabled {
            return;
        }
        if let Some(hook) = self.on_sound.as_mut() {
            hook(effect);
        }
    }

    fn draw(&mut self, now_ms: f64) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let opts = RenderOptions {
            time_ms: now_ms,
            star_count: self.settings.star_count(),
            animate: !self.settings.reduced_motion,
            best_score: self.best.top_score(),
        };
        render(&self.session, &opts, surface);
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    pub fn best_score(&self) -> &BestScore {
        &self.best
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace settings; the particle budget applies from the next run
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.settings.toggle_sound()
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn surface(&self) -> Option<&D> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut D> {
        self.surface.as_mut()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }
}
