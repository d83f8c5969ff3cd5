//! Code Quest entry point
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
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use code_quest::Tuning;
    use code_quest::audio::AudioManager;
    use code_quest::platform::input::TouchButton;
    use code_quest::platform::{FrameClock, InputState, Key};
    use code_quest::renderer::{RenderState, Scene};
    use code_quest::sim::{Command, GameEvent, GamePhase, GameState, PanelKind, TransitionPhase, World, tick};
    use code_quest::ui::{self, DialogueView, HudView, LoadingView, Screen};
    use code_quest::consts::SIM_DT;

    const CANVAS_ID: &str = "game-canvas";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        scene: Scene,
        clock: FrameClock,
        input: InputState,
        audio: AudioManager,
        /// Logical canvas size in CSS pixels
        viewport: (f32, f32),
        // Last values written to the DOM
        prompt: Option<&'static str>,
        dialogue_text: &'static str,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            Self {
                state: GameState::with_tuning(seed, tuning),
                render_state: None,
                scene: Scene::new(),
                clock: FrameClock::new(),
                input: InputState::new(),
                audio: AudioManager::new(),
                viewport: (0.0, 0.0),
                prompt: None,
                dialogue_text: "",
            }
        }

        fn resize(&mut self, css_w: f32, css_h: f32, device_w: u32, device_h: u32) {
            self.viewport = (css_w, css_h);
            self.state.resize(css_w, css_h);
            if let Some(rs) = self.render_state.as_mut() {
                rs.resize(device_w, device_h);
            }
        }

        /// Run simulation ticks
        fn update(&mut self, time: f64) {
            let steps = self.clock.advance(time);
            for _ in 0..steps {
                let input = self.input.take_tick_input();
                tick(&mut self.state, &input, SIM_DT);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = self.scene.build(&self.state);
            match render_state.render(vertices, self.viewport) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Route simulation events to audio and the DOM
        fn handle_events(&mut self, document: &Document) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Sound(cue) => self.audio.play(cue),
                    GameEvent::Ready => log::info!("Ready to start"),
                    GameEvent::ZoneEntered(index) => {
                        apply_hud(document, &HudView::for_zone(index, self.state.world.zone_count()));
                    }
                    GameEvent::TransitionStarted(index) => {
                        let info = ui::transition_card(&self.state).unwrap_or_else(|| World::zone_info(index));
                        set_text(document, "transition-zone-name", info.name);
                        set_text(document, "transition-zone-desc", info.desc);
                        set_hidden(document, "zone-transition", false);
                        set_class(document, "zone-transition", "active", true);
                    }
                    GameEvent::TransitionFinished => set_hidden(document, "zone-transition", true),
                    GameEvent::PanelOpened(kind) => open_panel(document, kind),
                    GameEvent::PanelClosed => set_hidden(document, "info-panel", true),
                    GameEvent::DialogueStarted { speaker, portrait } => {
                        set_text(document, "dialogue-name", speaker);
                        set_text(document, "dialogue-portrait", portrait);
                        set_text(document, "dialogue-text", "");
                        self.dialogue_text = "";
                        set_hidden(document, "dialogue-box", false);
                    }
                    GameEvent::DialogueEnded => {
                        set_text(document, "dialogue-text", "");
                        self.dialogue_text = "";
                        set_hidden(document, "dialogue-box", true);
                    }
                    GameEvent::Damaged | GameEvent::Respawned => {}
                    GameEvent::Paused | GameEvent::Resumed => self.clock.reset(),
                }
            }
        }

        /// Per-frame DOM state that follows the simulation continuously
        fn sync_dom(&mut self, document: &Document) {
            let phase = self.state.phase;
            let visible = ui::visible_screen(phase);
            for screen in Screen::ALL {
                set_hidden(document, screen.element_id(), visible != Some(screen));
            }
            set_hidden(
                document,
                "hud",
                !matches!(phase, GamePhase::Playing | GamePhase::Paused),
            );

            if phase == GamePhase::Loading {
                let view = LoadingView::from_state(&self.state);
                if let Some(fill) = query_html(document, ".loader-fill") {
                    let _ = fill.style().set_property("width", &format!("{}%", view.percent));
                }
                if let Ok(Some(hint)) = document.query_selector(".loader-hint") {
                    hint.set_text_content(Some(view.hint));
                }
            }

            if let Some(t) = &self.state.transition {
                set_class(document, "zone-transition", "active", t.phase != TransitionPhase::FadeOut);
            }

            let prompt = ui::prompt_label(&self.state);
            if prompt != self.prompt {
                self.prompt = prompt;
                if let Some(el) = document.get_element_by_id("interact-prompt") {
                    match prompt {
                        Some(label) => {
                            el.set_inner_html(&format!("<span class=\"key\">E</span> {}", label));
                            let _ = el.class_list().remove_1("hidden");
                        }
                        None => {
                            let _ = el.class_list().add_1("hidden");
                        }
                    }
                }
            }

            if let Some(dialogue) = self.state.interactions.dialogue() {
                let view = DialogueView::from(dialogue);
                if view.text != self.dialogue_text {
                    self.dialogue_text = view.text;
                    set_text(document, "dialogue-text", view.text);
                }
                set_class(document, "dialogue-box", "waiting", view.waiting);
            }
        }

        /// Canvas point in CSS pixels to a world position
        fn to_world(&self, x: f32, y: f32) -> Vec2 {
            self.state.camera.to_world(Vec2::new(x, y))
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        set_class(document, id, "hidden", hidden);
    }

    fn set_class(document: &Document, id: &str, class: &str, on: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn query_html(document: &Document, selector: &str) -> Option<HtmlElement> {
        document
            .query_selector(selector)
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn query_all(document: &Document, selector: &str) -> Vec<Element> {
        let Ok(list) = document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn apply_hud(document: &Document, hud: &HudView) {
        set_text(document, "zone-name", hud.zone_name);
        if let Ok(Some(icon)) = document.query_selector(".zone-icon") {
            icon.set_text_content(Some(hud.zone_icon));
        }
        set_text(document, "quest-text", hud.quest);
        for (dot, state) in query_all(document, ".dot").iter().zip(&hud.dots) {
            let classes = dot.class_list();
            let _ = classes.remove_2("active", "completed");
            if let Some(class) = state.class() {
                let _ = classes.add_1(class);
            }
        }
    }

    /// Fill the info panel from its page template and animate skill bars
    fn open_panel(document: &Document, kind: PanelKind) {
        let Some(content) = document.get_element_by_id("panel-content") else {
            return;
        };
        match document.get_element_by_id(kind.template_id()) {
            Some(template) => content.set_inner_html(&template.inner_html()),
            None => {
                log::warn!("Missing panel template {}", kind.template_id());
                content.set_inner_html(&format!("<h2 class=\"panel-title\">{}</h2>", kind.title()));
            }
        }
        set_hidden(document, "info-panel", false);

        let grow = Closure::once_into_js(move || {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            for bar in query_all(&document, ".skill-bar-fill") {
                let level = bar.get_attribute("data-level").unwrap_or_default();
                if let Ok(bar) = bar.dyn_into::<HtmlElement>() {
                    let _ = bar.style().set_property("width", &format!("{}%", level));
                }
            }
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(grow.unchecked_ref(), 100);
        }
    }

    /// Size the canvas backing store for the device pixel ratio
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (f32, f32, u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let css_w = canvas.client_width().max(1);
        let css_h = canvas.client_height().max(1);
        let width = (css_w as f64 * dpr) as u32;
        let height = (css_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (css_w as f32, css_h as f32, width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Code Quest starting...");

        let Some(document) = document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #{} canvas", CANVAS_ID);
            return;
        };

        let tuning = Tuning::load();
        let seed = tuning.seed.unwrap_or(js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(seed, tuning)));
        log::info!("Game initialized with seed: {}", seed);

        let (css_w, css_h, width, height) = fit_canvas(&canvas);
        game.borrow_mut().resize(css_w, css_h, width, height);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(rs) => game.borrow_mut().render_state = Some(rs),
                            Err(e) => log::error!("Renderer unavailable: {}", e),
                        }
                    }
                    Err(e) => log::error!("No GPU adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_keyboard(game.clone());
        setup_canvas(&canvas, game.clone());
        setup_touch_controls(game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas.clone(), game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Code Quest running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                if key.blocks_default() {
                    event.prevent_default();
                }
                game.borrow_mut().input.key_down(key, event.repeat());
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Clickable scenery: open its link, and show a pointer cursor on hover
    fn setup_canvas(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let g = game.borrow();
                if g.state.phase != GamePhase::Playing {
                    return;
                }
                let point = g.to_world(event.offset_x() as f32, event.offset_y() as f32);
                if let Some(link) = g.state.world.link_at(point) {
                    if let Some(window) = web_sys::window() {
                        let _ = window.open_with_url_and_target(link, "_blank");
                    }
                    g.audio.play(code_quest::sim::SoundCue::Interact);
                }
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let g = game.borrow();
                if g.state.phase != GamePhase::Playing {
                    return;
                }
                let point = g.to_world(event.offset_x() as f32, event.offset_y() as f32);
                let cursor = if g.state.world.link_at(point).is_some() {
                    "pointer"
                } else {
                    "default"
                };
                let _ = canvas_clone.style().set_property("cursor", cursor);
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_controls(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        let touch_device = window.navigator().max_touch_points() > 0;
        if touch_device {
            set_hidden(&document, "mobile-controls", false);
        }

        for button in TouchButton::ALL {
            let Some(el) = document.get_element_by_id(button.element_id()) else {
                continue;
            };
            for (event_name, pressed) in [
                ("touchstart", true),
                ("touchend", false),
                ("touchcancel", false),
                ("mousedown", true),
                ("mouseup", false),
                ("mouseleave", false),
            ] {
                let game = game.clone();
                let target = el.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    game.borrow_mut().input.set_touch(button, pressed);
                    let _ = target.class_list().toggle_with_force("pressed", pressed);
                });
                let _ = el.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        let bind = |element: Option<Element>, command: Command, unlock_audio: bool| {
            let Some(el) = element else { return };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if unlock_audio {
                    g.audio.resume();
                }
                g.input.push(command);
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        };

        bind(document.get_element_by_id("btn-start"), Command::Start, true);
        bind(document.get_element_by_id("btn-resume"), Command::Resume, false);
        bind(document.get_element_by_id("btn-restart"), Command::Restart, false);
        bind(document.get_element_by_id("panel-close"), Command::ClosePanel, false);
        bind(document.query_selector(".panel-backdrop").ok().flatten(), Command::ClosePanel, false);
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (css_w, css_h, width, height) = fit_canvas(&canvas);
            game.borrow_mut().resize(css_w, css_h, width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.release_all();
                    if g.state.phase == GamePhase::Playing {
                        g.input.push(Command::TogglePause);
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

        // Window blur: drop held keys so the player does not run off
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            if let Some(document) = document() {
                g.handle_events(&document);
                g.sync_dom(&document);
            }
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless run: load, start and walk right through the village, logging
/// what happens. Useful for checking tuning files without a browser.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use code_quest::Tuning;
    use code_quest::consts::SIM_DT;
    use code_quest::renderer::Scene;
    use code_quest::sim::{Buttons, Command, GameEvent, GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Code Quest (native) starting...");

    let tuning = Tuning::load();
    let seed = tuning.seed.unwrap_or(42);
    let mut state = GameState::with_tuning(seed, tuning);
    let mut scene = Scene::new();

    // Loading screen
    let mut ticks = 0u32;
    while state.phase == GamePhase::Loading && ticks < 60 * 30 {
        tick(&mut state, &TickInput::default(), SIM_DT);
        ticks += 1;
    }
    log::info!("Loading took {:.2}s", ticks as f32 * SIM_DT);

    tick(
        &mut state,
        &TickInput {
            commands: vec![Command::Start],
            ..Default::default()
        },
        SIM_DT,
    );

    let mut hits = 0;
    let mut zones_seen = vec![state.world.current_index()];
    for frame in 0..60 * 40 {
        let mut input = TickInput {
            held: Buttons {
                right: true,
                run: true,
                jump: frame % 50 < 4,
                ..Default::default()
            },
            commands: Vec::new(),
        };
        if frame % 30 == 0 {
            input.commands.push(Command::Interact);
        }
        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::Damaged => hits += 1,
                GameEvent::ZoneEntered(zone) => zones_seen.push(zone),
                GameEvent::PanelOpened(_) => {
                    state.handle_command(Command::ClosePanel);
                }
                _ => {}
            }
        }

        if frame % 300 == 0 {
            let vertices = scene.build(&state).len();
            log::info!(
                "t={:>5.1}s zone={} pos=({:.0}, {:.0}) particles={} vertices={}",
                state.time,
                state.world.current_index(),
                state.player.pos.x,
                state.player.pos.y,
                state.particles.len(),
                vertices
            );
        }
    }

    println!(
        "Seed {}: visited zones {:?}, took {} hits, ended at x={:.0}",
        seed, zones_seen, hits, state.player.pos.x
    );
}
