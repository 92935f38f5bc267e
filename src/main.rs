//! Cheddar Defense entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use cheddar_defense::audio::HtmlAudio;
    use cheddar_defense::consts::{ARENA_HEIGHT, ARENA_WIDTH, SIM_DT};
    use cheddar_defense::persistence::LocalStorage;
    use cheddar_defense::platform::Key;
    use cheddar_defense::renderer::CanvasRenderer;
    use cheddar_defense::{Session, Settings, StartupError};

    const CANVAS_ID: &str = "gameCanvas";

    /// Game instance holding the session and its renderer
    struct Game {
        session: Session<HtmlAudio, LocalStorage>,
        renderer: CanvasRenderer,
        last_time: f64,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.session.frame(dt);
            if let Err(e) = self.renderer.render(&self.session, time) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Match the drawing buffer and arena to the displayed canvas size
        fn fit_to_display(&mut self) {
            let (w, h) = display_size(self.renderer.canvas());
            self.renderer.resize(w, h);
            self.session.resize(w as f32, h as f32);
        }
    }

    /// Displayed canvas size in CSS pixels (defaults before layout)
    fn display_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let w = canvas.client_width();
        let h = canvas.client_height();
        if w > 0 && h > 0 {
            (w as u32, h as u32)
        } else {
            (ARENA_WIDTH as u32, ARENA_HEIGHT as u32)
        }
    }

    /// Mouse offset (CSS pixels) to arena coordinates
    fn to_arena(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
        let sx = canvas.width() as f32 / canvas.client_width().max(1) as f32;
        let sy = canvas.height() as f32 / canvas.client_height().max(1) as f32;
        Vec2::new(event.offset_x() as f32 * sx, event.offset_y() as f32 * sy)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        // A second init (hot reload) is harmless
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Cheddar Defense starting...");

        if let Err(e) = start() {
            log::error!("Startup failed: {}", e);
        }
    }

    fn start() -> Result<(), StartupError> {
        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoDocument)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or(StartupError::MissingElement(CANVAS_ID))?
            .dyn_into()
            .map_err(|_| StartupError::WrongElementType(CANVAS_ID))?;

        let renderer = CanvasRenderer::new(canvas.clone())?;
        let (width, height) = display_size(&canvas);
        renderer.resize(width, height);

        let store = LocalStorage::new();
        let audio = HtmlAudio::new(&Settings::load(&store))?;

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(store, audio, width as f32, height as f32, seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer,
            last_time: 0.0,
        }));

        setup_input_handlers(&window, &canvas, game.clone());
        setup_auto_pause(&window, game.clone());

        request_animation_frame(game);

        log::info!("Cheddar Defense running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_dom(&event.key()) else {
                    return;
                };
                // Keep arrows and space from scrolling the page
                if key.is_movement() || key == Key::Start {
                    event.prevent_default();
                }
                if event.repeat() {
                    return;
                }
                game.borrow_mut().session.key_down(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    game.borrow_mut().session.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - aim
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = to_arena(&canvas_clone, &event);
                game.borrow_mut().session.pointer_move(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down - fire
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = to_arena(&canvas_clone, &event);
                let mut g = game.borrow_mut();
                g.session.pointer_move(pos);
                g.session.pointer_down();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_to_display();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        if let Some(document) = window.document() {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().session.focus_lost();
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
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().session.focus_lost();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cheddar Defense (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the real game");

    let summary = headless::run_demo(std::env::args().nth(1).and_then(|s| s.parse().ok()));
    println!("{}", summary);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted autopilot run with silent audio and in-memory storage
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use cheddar_defense::Session;
    use cheddar_defense::audio::SilentAudio;
    use cheddar_defense::consts::{ARENA_HEIGHT, ARENA_WIDTH, SIM_DT, TICKS_PER_SEC};
    use cheddar_defense::persistence::MemoryStore;
    use cheddar_defense::platform::Key;
    use cheddar_defense::sim::{GamePhase, ShopItem};

    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = TICKS_PER_SEC * 600;

    pub fn run_demo(seed: Option<u64>) -> String {
        let seed = seed.unwrap_or(0xC4EDDA);
        let mut session = Session::new(
            MemoryStore::new(),
            SilentAudio,
            ARENA_WIDTH,
            ARENA_HEIGHT,
            seed,
        );
        session.key_down(Key::Start);

        let mut frames = 0;
        while frames < MAX_FRAMES && session.state().phase != GamePhase::GameOver {
            autopilot(&mut session, frames);
            session.frame(SIM_DT);
            frames += 1;
        }

        let state = session.state();
        format!(
            "seed {}: score {} after {:.1}s (level {}, leaderboard {:?})",
            seed,
            state.displayed_score(),
            frames as f32 * SIM_DT,
            state.difficulty_level,
            session.leaderboard().entries()
        )
    }

    /// Aim at the nearest threat, fire constantly, strafe in a slow circle
    fn autopilot(session: &mut Session<SilentAudio, MemoryStore>, frame: u32) {
        let state = session.state();

        if state.shop.open {
            let _ = session.buy(ShopItem::FasterFire);
            let _ = session.buy(ShopItem::ExtraHeart);
            session.close_shop();
            return;
        }

        let player = state.player.pos;
        let target = state
            .boss
            .as_ref()
            .map(|b| b.pos)
            .or_else(|| {
                state
                    .enemies
                    .iter()
                    .map(|e| e.pos)
                    .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)))
            });
        let threat_close = target.is_some_and(|t| t.distance(player) < 80.0);

        let phase = frame as f32 / 90.0;
        let strafe = Vec2::new(phase.cos(), phase.sin());
        for (key, active) in [
            (Key::Right, strafe.x > 0.3),
            (Key::Left, strafe.x < -0.3),
            (Key::Down, strafe.y > 0.3),
            (Key::Up, strafe.y < -0.3),
        ] {
            if active {
                session.key_down(key);
            } else {
                session.key_up(key);
            }
        }

        if let Some(target) = target {
            session.pointer_move(target);
            session.pointer_down();
        }
        if threat_close {
            session.key_down(Key::Dash);
        }
    }
}
