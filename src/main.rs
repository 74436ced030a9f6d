//! Tank Arcade entry point
//!
//! Browser loop driver on wasm32, headless demo runner on native.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement};

    use tank_arcade::consts::*;
    use tank_arcade::platform::{self, key_action, key_direction};
    use tank_arcade::renderer::{self, RenderState};
    use tank_arcade::sim::Direction;
    use tank_arcade::{Action, Arcade, DirectionFlags, GameMode, Hud, Phase, Tuning, Upgrade};

    /// Game instance holding the active arcade and its renderer
    struct Game {
        arcade: Box<dyn Arcade>,
        render_state: Option<RenderState>,
        input: DirectionFlags,
        last_time: f64,
        last_phase: Phase,
    }

    impl Game {
        fn new(arcade: Box<dyn Arcade>) -> Self {
            let last_phase = arcade.phase();
            Self {
                arcade,
                render_state: None,
                input: DirectionFlags::default(),
                last_time: 0.0,
                last_phase,
            }
        }

        fn handle(&mut self, action: Action) {
            self.arcade.handle(action);
            // Released buttons during a menu would otherwise stay held
            if action == Action::Restart {
                self.input.clear();
            }
        }

        /// Advance one frame, render it and refresh the HUD
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).clamp(0.0, MAX_FRAME_MS)
            } else {
                FRAME_MS
            };
            self.last_time = time;

            let snapshot = self.arcade.step(&self.input, dt);
            let phase = snapshot.phase();
            if phase != self.last_phase {
                log::info!("Phase {} -> {}", self.last_phase.as_str(), phase.as_str());
                self.last_phase = phase;
            }

            if let Some(ref mut render_state) = self.render_state {
                render_state.set_playfield(snapshot.playfield());
                let vertices = renderer::build(&snapshot);
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

            update_hud(&snapshot.hud());
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_fill(document: &Document, id: &str, fraction: f32) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let pct = (fraction.clamp(0.0, 1.0) * 100.0).round();
            let _ = el.style().set_property("width", &format!("{}%", pct));
        }
    }

    /// Write HUD text and screen visibility into the DOM
    fn update_hud(hud: &Hud) {
        let Some(document) = document() else {
            return;
        };

        set_text(&document, "scoreDisplay", &hud.score.to_string());
        set_text(&document, "stageLabel", hud.stage_label);
        set_text(&document, "waveDisplay", &hud.stage.to_string());
        if let Some(xp) = hud.xp {
            set_text(&document, "xpDisplay", &xp.to_string());
        }
        if let Some(lives) = hud.lives {
            set_text(&document, "livesDisplay", &lives.to_string());
        }
        set_fill(&document, "playerHealthFill", hud.player_health);
        set_fill(&document, "baseHealthFill", hud.base_health);

        set_hidden(&document, "menu-screen", hud.phase != Phase::Menu);
        set_hidden(&document, "upgrade-screen", hud.phase != Phase::Upgrade);
        set_hidden(&document, "gameover-screen", !hud.phase.is_terminal());
        if hud.phase.is_terminal() {
            let title = if hud.phase == Phase::Victory {
                "Victory!"
            } else {
                "Game Over"
            };
            set_text(&document, "gameoverTitle", title);
            set_text(&document, "finalWave", &hud.stage.to_string());
            set_text(&document, "finalScore", &hud.score.to_string());
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Tank Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "element #canvas is not a canvas")?;

        let (width, height, playfield) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning_json = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content());
        let tuning = Tuning::from_json_or_default(tuning_json.as_deref());

        let mode = GameMode::from_query(&window.location().search().unwrap_or_default());
        let seed = platform::clock_seed();
        let arcade = tank_arcade::game::create(mode, &tuning, playfield, seed);
        let game = Rc::new(RefCell::new(Game::new(arcade)));

        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("data-mode", mode.as_str());
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let initial_playfield = game.borrow().arcade.playfield();
        match init_renderer(&instance, canvas.clone(), width, height, initial_playfield).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Renderer unavailable, running without drawing: {}", e),
        }

        setup_keyboard(game.clone());
        setup_direction_buttons(&document, game.clone());
        setup_menu_buttons(&document, game.clone());
        setup_resize(canvas, game.clone());

        request_animation_frame(game);
        platform::signal_host_ready();

        log::info!("Tank Arcade running ({})", mode.as_str());
        Ok(())
    }

    async fn init_renderer(
        instance: &wgpu::Instance,
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
        playfield: Vec2,
    ) -> Result<RenderState, renderer::RenderError> {
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);
        RenderState::new(surface, &adapter, width, height, playfield).await
    }

    /// Backing-store size in device pixels plus the playfield in CSS pixels
    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32, Vec2) {
        let dpr = window.device_pixel_ratio();
        let mut client_w = canvas.client_width() as f32;
        let mut client_h = canvas.client_height() as f32;
        if client_w <= 0.0 || client_h <= 0.0 {
            client_w = DEFAULT_WIDTH;
            client_h = DEFAULT_HEIGHT;
        }
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        (width, height, Vec2::new(client_w, client_h))
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                if let Some(dir) = key_direction(&key) {
                    event.prevent_default();
                    g.input.set(dir, true);
                } else if let Some(action) = key_action(&key).filter(|_| !event.repeat()) {
                    g.handle(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(dir) = key_direction(&event.key()) {
                    game.borrow_mut().input.set(dir, false);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keys released while unfocused never fire keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.clear();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_direction_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons = [
            ("btnUp", Direction::Up),
            ("btnDown", Direction::Down),
            ("btnLeft", Direction::Left),
            ("btnRight", Direction::Right),
        ];
        for (id, dir) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, held) in [
                ("mousedown", true),
                ("touchstart", true),
                ("mouseup", false),
                ("mouseleave", false),
                ("touchend", false),
                ("touchcancel", false),
            ] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    game.borrow_mut().input.set(dir, held);
                });
                let _ = btn
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn on_click(document: &Document, id: &str, game: Rc<RefCell<Game>>, actions: &'static [Action]) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                for &action in actions {
                    g.handle(action);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "startBtn", game.clone(), &[Action::Start]);
        // Terminal screens fall back to the menu first
        on_click(
            document,
            "restartBtn",
            game.clone(),
            &[Action::Restart, Action::Start],
        );

        let Ok(nodes) = document.query_selector_all(".upgrade-btn") else {
            return;
        };
        for i in 0..nodes.length() {
            let Some(el) = nodes
                .get(i)
                .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            let Some(upgrade) = el
                .get_attribute("data-upgrade")
                .as_deref()
                .and_then(Upgrade::from_attr)
            else {
                log::warn!("Upgrade button without a known data-upgrade attribute");
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().handle(Action::ChooseUpgrade(upgrade));
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height, playfield) = canvas_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            let mut g = game.borrow_mut();
            g.arcade.resize(playfield);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Tank Arcade failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use tank_arcade::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, FRAME_MS};
    use tank_arcade::sim::Direction;
    use tank_arcade::{Action, DirectionFlags, GameMode, Phase, Tuning, Upgrade, platform};

    env_logger::init();
    log::info!("Tank Arcade (native) starting...");
    log::info!("Headless demo; run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let mode = args
        .next()
        .and_then(|name| GameMode::from_name(&name))
        .unwrap_or_default();
    let frames: u64 = args.next().and_then(|n| n.parse().ok()).unwrap_or(3600);

    let tuning = match std::env::var("TANK_ARCADE_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(Some(&json)),
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}; using defaults", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let mut game = tank_arcade::game::create(
        mode,
        &tuning,
        Vec2::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
        platform::clock_seed(),
    );
    game.handle(Action::Start);

    // Sweep left and right, pausing to let the guns work
    let pattern = [Some(Direction::Left), None, Some(Direction::Right), None];
    let mut upgrades = Upgrade::ALL.into_iter().cycle();
    let mut snapshot = game.snapshot();
    for frame in 0..frames {
        let input = pattern[(frame / 45) as usize % pattern.len()]
            .map(DirectionFlags::only)
            .unwrap_or_default();
        snapshot = game.step(&input, FRAME_MS);
        match snapshot.phase() {
            Phase::Upgrade => {
                if let Some(upgrade) = upgrades.next() {
                    log::info!("Frame {}: choosing {:?}", frame, upgrade);
                    game.handle(Action::ChooseUpgrade(upgrade));
                }
            }
            phase if phase.is_terminal() => {
                log::info!("Frame {}: {}", frame, phase.as_str());
                break;
            }
            _ => {}
        }
    }

    let hud = snapshot.hud();
    log::info!(
        "Demo finished: {} in {}, {} {}, score {}",
        mode.as_str(),
        hud.phase.as_str(),
        hud.stage_label,
        hud.stage,
        hud.score
    );
    match serde_json::to_string(&hud) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Cannot serialize HUD: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
