//! Space Shooter entry point
//!
//! On the web this wires the canvas, keyboard, buttons and the rAF loop to a
//! `Game`. Natively there is no window; a headless autopilot plays one game
//! so tunings can be tried from the command line.

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use space_shooter::audio::AudioManager;
    use space_shooter::platform::clock::RafScheduler;
    use space_shooter::renderer::CanvasSurface;
    use space_shooter::{Game, Settings, Tuning};

    type WebGame = Game<RafScheduler, CanvasSurface>;

    const CANVAS_ID: &str = "gameCanvas";
    const CONTAINER_ID: &str = "gameContainer";
    const PLAY_BUTTON_ID: &str = "playGame";
    const EXIT_BUTTON_ID: &str = "gameExit";
    const SCORE_ID: &str = "gameScore";
    const SOUND_TOGGLE_ID: &str = "soundToggle";

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        log::info!("Space Shooter starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or("no game canvas")?
            .dyn_into()?;

        let settings = Settings::load();
        let scheduler = RafScheduler::new();
        let frame_slot = scheduler.callback_slot();
        let seed = js_sys::Date::now() as u64;

        let game: Rc<RefCell<WebGame>> = Rc::new(RefCell::new(Game::new(
            Tuning::default(),
            settings.clone(),
            scheduler,
            seed,
        )));

        match CanvasSurface::from_canvas(&canvas) {
            Ok(surface) => game.borrow_mut().attach_surface(surface),
            // start() reports this to the player
            Err(e) => log::error!("{}", e),
        }

        let mut audio = AudioManager::new();
        audio.set_master_volume(settings.master_volume);
        let audio = Rc::new(audio);
        {
            let audio = audio.clone();
            game.borrow_mut().set_audio_hook(move |effect| audio.play(effect));
        }

        {
            let document = document.clone();
            game.borrow_mut().set_score_hook(move |score| {
                log::info!("Final score {}", score);
                set_score_text(&document, score);
            });
        }

        // Frame closure lives in the scheduler's slot for the page lifetime
        {
            let game = game.clone();
            let document = document.clone();
            let mut shown_score = None;
            *frame_slot.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                let mut g = game.borrow_mut();
                g.frame(time);
                if g.is_running() && shown_score != Some(g.score()) {
                    shown_score = Some(g.score());
                    set_score_text(&document, g.score());
                }
            }));
        }

        setup_keyboard(&window, game.clone())?;
        setup_sound_toggle(&document, game.clone(), audio)?;
        setup_buttons(&document, game)?;

        log::info!("Space Shooter ready (seed {})", seed);
        Ok(())
    }

    fn set_score_text(document: &Document, score: u64) {
        if let Some(el) = document.get_element_by_id(SCORE_ID) {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn show_container(document: &Document, show: bool) {
        if let Some(el) = document.get_element_by_id(CONTAINER_ID) {
            let classes = el.class_list();
            let result = if show {
                classes.add_1("show")
            } else {
                classes.remove_1("show")
            };
            if let Err(e) = result {
                log::warn!("Could not toggle game container: {:?}", e);
            }
        }
    }

    fn set_sound_icon(document: &Document, settings: &Settings) {
        let Some(icon) = document
            .get_element_by_id(SOUND_TOGGLE_ID)
            .and_then(|btn| btn.query_selector("i").ok().flatten())
        else {
            return;
        };
        let classes = icon.class_list();
        let result = classes
            .remove_2(Settings::SOUND_ON_ICON, Settings::SOUND_OFF_ICON)
            .and_then(|_| classes.add_1(settings.sound_icon()));
        if let Err(e) = result {
            log::warn!("Could not update sound icon: {:?}", e);
        }
    }

    fn setup_sound_toggle(
        document: &Document,
        game: Rc<RefCell<WebGame>>,
        audio: Rc<AudioManager>,
    ) -> Result<(), JsValue> {
        set_sound_icon(document, game.borrow().settings());

        let Some(btn) = document.get_element_by_id(SOUND_TOGGLE_ID) else {
            return Ok(());
        };
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            if g.toggle_sound() {
                // The click is the gesture browsers want before audio starts
                audio.unlock();
            }
            log::info!("Sound {}", if g.settings().sound_enabled { "on" } else { "off" });
            set_sound_icon(&document, g.settings());
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_keyboard(
        window: &web_sys::Window,
        game: Rc<RefCell<WebGame>>,
    ) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let response = game.borrow_mut().handle_key_down(&event.key());
                if response.suppress_default {
                    event.prevent_default();
                }
                if response.closed_view {
                    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                        show_container(&document, false);
                    }
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().key_up_dom(&event.key()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<WebGame>>) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id(PLAY_BUTTON_ID) {
            let game = game.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                show_container(&document, true);
                set_score_text(&document, 0);
                if let Err(e) = game.borrow_mut().start() {
                    log::error!("Could not start game: {}", e);
                    show_container(&document, false);
                }
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id(EXIT_BUTTON_ID) {
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                show_container(&document, false);
                game.borrow_mut().exit();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Space Shooter failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use space_shooter::Tuning;

    env_logger::init();
    log::info!("Space Shooter (native) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => {
            let tuning = load_tuning(&path)?;
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        None => Tuning::default(),
    };

    let score = autopilot::play(tuning).context("autopilot run failed")?;
    println!("Autopilot final score: {}", score);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> anyhow::Result<space_shooter::Tuning> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("failed reading {}", path))?;
    space_shooter::Tuning::from_json(&json).with_context(|| format!("bad tuning in {}", path))
}

/// Headless play: chase the lowest asteroid and keep firing
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use space_shooter::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, SIM_DT_MS};
    use space_shooter::platform::{Key, ManualScheduler, now_ms};
    use space_shooter::renderer::CommandRecorder;
    use space_shooter::sim::{GamePhase, GameSession};
    use space_shooter::{Game, GameError, Settings, Tuning};

    /// Two minutes of play at 60 fps
    const MAX_FRAMES: u32 = 60 * 120;
    /// Dead zone so the ship doesn't jitter under its target
    const AIM_SLACK: f32 = 5.0;

    pub fn play(tuning: Tuning) -> Result<u64, GameError> {
        let seed = now_ms() as u64;
        let mut game: Game<ManualScheduler, CommandRecorder> =
            Game::new(tuning, Settings::default(), ManualScheduler::new(), seed);
        game.attach_surface(CommandRecorder::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));
        game.start()?;
        log::info!("Autopilot running (seed {})", seed);

        game.key_down(Key::Fire);
        let mut t = 0.0;
        for _ in 0..MAX_FRAMES {
            if game.scheduler_mut().fire_next().is_none() {
                break;
            }
            steer(&mut game);
            if let Some(surface) = game.surface_mut() {
                surface.reset();
            }
            t += SIM_DT_MS as f64;
            game.frame(t);
            if game.session().phase == GamePhase::GameOver {
                break;
            }
        }

        let session = game.session();
        log::info!(
            "Autopilot done after {} ticks: score {}, lives {}",
            session.time_ticks,
            session.score,
            session.lives
        );
        let score = session.score;
        game.stop();
        Ok(score)
    }

    fn steer(game: &mut Game<ManualScheduler, CommandRecorder>) {
        let want = target_key(game.session());
        for key in [Key::Left, Key::Right] {
            if Some(key) == want {
                game.key_down(key);
            } else {
                game.key_up(key);
            }
        }
    }

    fn target_key(session: &GameSession) -> Option<Key> {
        let ship = session.player.shape.center(session.player.pos).x;
        let target = session
            .enemies
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;
        let dx = target.center().x - ship;
        if dx < -AIM_SLACK {
            Some(Key::Left)
        } else if dx > AIM_SLACK {
            Some(Key::Right)
        } else {
            None
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use space_shooter::Tuning;

    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_tuning_reads_partial_json() {
        let path = temp_file("tuning-ok.json", r#"{ "starting_lives": 4 }"#);
        let tuning = load_tuning(path.to_str().unwrap()).unwrap();
        assert_eq!(tuning.starting_lives, 4);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_tuning_errors_name_the_file() {
        let missing = std::env::temp_dir().join("no-such-tuning.json");
        let err = load_tuning(missing.to_str().unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("no-such-tuning.json"));

        let path = temp_file("tuning-bad.json", r#"{ "starting_lives": 0 }"#);
        let err = load_tuning(path.to_str().unwrap()).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("tuning-bad.json"));
        assert!(chain.contains("starting_lives"));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_autopilot_finishes() {
        let tuning = Tuning {
            starting_lives: 1,
            ..Tuning::default()
        };
        assert!(autopilot::play(tuning).is_ok());
    }
}
