//! Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::ops::ControlFlow;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use dodge::GameLoop;
    use dodge::Tuning;
    use dodge::platform::{AnimationFrame, Key};
    use dodge::renderer::RenderState;
    use dodge::sim::{GameState, Viewport};

    type Game = GameLoop<RenderState>;

    /// Window size in CSS pixels
    fn window_viewport(window: &web_sys::Window) -> Viewport {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        Viewport::new(width.max(1.0) as u32, height.max(1.0) as u32)
    }

    /// Size the canvas backing store in device pixels
    fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport, dpr: f64) -> (u32, u32) {
        let width = (viewport.width as f64 * dpr) as u32;
        let height = (viewport.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dodge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let viewport = window_viewport(&window);
        let (width, height) = size_canvas(&canvas, viewport, window.device_pixel_ratio());

        // Initialize WebGPU (WebGL fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .expect("Failed to create device");

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, viewport, Tuning::load()).expect("Invalid tuning");
        let mut game = GameLoop::new(state, render_state);
        game.start();
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(game));

        setup_input_handlers(&canvas, game.clone());
        setup_resize(&canvas, game.clone());

        GameLoop::drive(game, AnimationFrame, |g| {
            update_hud(g);
            ControlFlow::Continue(())
        });

        log::info!("Dodge running!");
    }

    /// Write changed HUD text into the DOM
    fn update_hud(game: &mut Game) {
        let Some(hud) = game.take_hud_update() else {
            return;
        };
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&hud.score));
        }
        if let Some(el) = document.get_element_by_id("best") {
            el.set_text_content(Some(&hud.best));
        }
        if let Some(el) = document.get_element_by_id("message") {
            el.set_text_content(Some(&hud.message));
        }
        if let Some(el) = document.get_element_by_id("fps") {
            el.set_text_content(Some(&hud.fps));
        }
    }

    /// Pointer x relative to the canvas, in CSS pixels
    fn canvas_x(canvas: &HtmlCanvasElement, event: &PointerEvent) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        event.client_x() as f32 - rect.left() as f32
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_dom_key(&event.key()) else {
                    return;
                };
                event.prevent_default();
                if !event.repeat() {
                    game.borrow_mut().input.key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let x = canvas_x(&canvas_clone, &event);
                game.borrow_mut().input.pointer_down(x);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let x = canvas_x(&canvas_clone, &event);
                game.borrow_mut().input.pointer_move(x);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up / cancel
        for event_name in ["pointerup", "pointercancel", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().input.pointer_up();
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = window_viewport(&window);
            let dpr = window.device_pixel_ratio();
            size_canvas(&canvas, viewport, dpr);
            game.borrow_mut().resize(viewport, dpr);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::RefCell;
    use std::ops::ControlFlow;
    use std::rc::Rc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use dodge::consts::{DEMO_FRAMES, DEMO_VIEWPORT};
    use dodge::platform::FixedFrames;
    use dodge::renderer::NullRenderer;
    use dodge::sim::{GamePhase, GameState};
    use dodge::{GameLoop, Tuning};

    env_logger::init();
    log::info!("Dodge (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();

    let state = match GameState::new(seed, DEMO_VIEWPORT, Tuning::load()) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start demo: {}", e);
            return;
        }
    };
    let mut game = GameLoop::new(state, NullRenderer::default());
    game.input.set_autopilot(true);
    game.start();
    log::info!("Game initialized with seed: {}", seed);

    let game = Rc::new(RefCell::new(game));
    GameLoop::drive(game.clone(), FixedFrames::new(DEMO_FRAMES), |g| {
        if g.state.phase == GamePhase::GameOver {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    let g = game.borrow();
    println!(
        "Demo finished: score {} after {} frames ({:?})",
        g.state.score, g.state.frames, g.state.phase
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
