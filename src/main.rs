//! Cartoon Platformer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, Element, HtmlCanvasElement, Response};

    use cartoon_platformer::consts::SIM_DT;
    use cartoon_platformer::engine::ArcadeWorld;
    use cartoon_platformer::renderer::{RenderState, build_frame};
    use cartoon_platformer::sim::{AssetEntry, AssetLoadError, LoadFailure, MANIFEST};
    use cartoon_platformer::{Game, GameConfig};
    use glam::Vec2;

    /// DOM spans mirroring the world's texts
    struct Hud {
        root: Element,
        nodes: Vec<Element>,
        generation: u32,
        /// CSS pixels per world pixel
        scale: f32,
    }

    impl Hud {
        fn new(document: &Document, canvas: &HtmlCanvasElement, viewport: Vec2) -> Result<Self, JsValue> {
            let root = match document.get_element_by_id("hud") {
                Some(el) => el,
                None => {
                    let el = document.create_element("div")?;
                    el.set_id("hud");
                    document
                        .body()
                        .ok_or_else(|| JsValue::from_str("no body"))?
                        .append_child(&el)?;
                    el
                }
            };
            let scale = canvas.client_width() as f32 / viewport.x;
            root.set_attribute(
                "style",
                &format!(
                    "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;pointer-events:none;overflow:hidden;font-family:sans-serif;",
                    canvas.offset_left(),
                    canvas.offset_top(),
                    canvas.client_width(),
                    canvas.client_height()
                ),
            )?;
            Ok(Self {
                root,
                nodes: Vec::new(),
                generation: u32::MAX,
                scale,
            })
        }

        /// Update HUD elements in DOM
        fn sync(&mut self, document: &Document, world: &ArcadeWorld) -> Result<(), JsValue> {
            if world.generation() != self.generation {
                self.root.set_inner_html("");
                self.nodes.clear();
                self.generation = world.generation();
            }

            let offset = world.camera_offset();
            for (i, text) in world.texts().iter().enumerate() {
                if i >= self.nodes.len() {
                    let el = document.create_element("span")?;
                    self.root.append_child(&el)?;
                    self.nodes.push(el);
                }
                let el = &self.nodes[i];
                let spec = &text.spec;
                let pos = if spec.fixed { spec.pos } else { spec.pos - offset };
                let style = format!(
                    "position:absolute;left:{:.1}px;top:{:.1}px;font-size:{:.1}px;color:{};z-index:{};white-space:nowrap;{}",
                    pos.x * self.scale,
                    pos.y * self.scale,
                    spec.font_size * self.scale,
                    spec.color,
                    spec.depth.max(0),
                    if spec.centered { "transform:translate(-50%,-50%);" } else { "" }
                );
                if el.get_attribute("style").as_deref() != Some(style.as_str()) {
                    el.set_attribute("style", &style)?;
                }
                if el.text_content().as_deref() != Some(spec.content.as_str()) {
                    el.set_text_content(Some(&spec.content));
                }
            }
            Ok(())
        }
    }

    /// Browser-side state around the game
    struct Host {
        game: Game<ArcadeWorld>,
        render_state: Option<RenderState>,
        hud: Hud,
        document: Document,
        last_time: f64,
    }

    impl Host {
        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_frame(&self.game.engine);
                match render_state.render(&vertices, self.game.engine.camera_offset()) {
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
            if let Err(e) = self.hud.sync(&self.document, &self.game.engine) {
                log::warn!("HUD update failed: {:?}", e);
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let raw_config = canvas.get_attribute("data-config");
        let config = GameConfig::from_json_or_default(raw_config.as_deref());
        log::set_max_level(config.log_level().to_level_filter());

        log::info!("Cartoon Platformer starting...");

        let viewport = Vec2::new(config.width, config.height);
        canvas.set_width(config.width as u32);
        canvas.set_height(config.height as u32);

        let seed = js_sys::Date::now() as u64;
        let world = ArcadeWorld::new(viewport, seed);
        let game = Game::new(config, world);
        let hud = Hud::new(&document, &canvas, viewport)?;

        let host = Rc::new(RefCell::new(Host {
            game,
            render_state: None,
            hud,
            document: document.clone(),
            last_time: 0.0,
        }));

        // Asset requests run concurrently; each reports back when done
        for entry in MANIFEST.iter() {
            let host = host.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = fetch_asset(entry).await;
                host.borrow_mut().game.record_asset(entry, result);
            });
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            config_dim(viewport.x),
            config_dim(viewport.y),
            viewport,
        )
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        host.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(host.clone())?;

        // Start game loop
        request_animation_frame(host);

        log::info!("Cartoon Platformer running!");
        Ok(())
    }

    fn config_dim(v: f32) -> u32 {
        v.max(1.0) as u32
    }

    /// Request one asset; success means the server has it
    async fn fetch_asset(entry: &AssetEntry) -> Result<(), AssetLoadError> {
        let network = |msg: String| AssetLoadError {
            key: entry.key,
            failure: LoadFailure::Network(msg),
        };

        let window = web_sys::window().ok_or_else(|| network("no window".to_string()))?;
        let value = JsFuture::from(window.fetch_with_str(entry.path))
            .await
            .map_err(|e| network(format!("{:?}", e)))?;
        let response: Response = value.dyn_into().map_err(|e| network(format!("{:?}", e)))?;

        match response.status() {
            _ if response.ok() => Ok(()),
            404 => Err(AssetLoadError {
                key: entry.key,
                failure: LoadFailure::NotFound,
            }),
            code => Err(AssetLoadError {
                key: entry.key,
                failure: LoadFailure::Status(code),
            }),
        }
    }

    fn setup_input_handlers(host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        // Keyboard
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let code = event.code();
                if code.starts_with("Arrow") || code == "Space" {
                    event.prevent_default();
                }
                host.borrow_mut().game.keyboard.key_down(&code, event.repeat());
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                host.borrow_mut().game.keyboard.key_up(&event.code());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur: keys released outside the page never send keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                host.borrow_mut().game.keyboard.release_all();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();

            // Calculate delta time
            let dt = if h.last_time > 0.0 {
                ((time - h.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            h.last_time = time;

            h.game.update(dt);
            h.render();
        }

        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cartoon_platformer::consts::SIM_DT;
    use cartoon_platformer::engine::ArcadeWorld;
    use cartoon_platformer::sim::{DirAssetSource, TickInput};
    use cartoon_platformer::{Game, GameConfig};
    use glam::Vec2;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cartoon Platformer (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the playable version");

    // Optional JSON config file as the first argument
    let raw_config = std::env::args()
        .nth(1)
        .and_then(|path| match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Could not read config {}: {}", path, e);
                None
            }
        });
    let config = GameConfig::from_json_or_default(raw_config.as_deref());

    let world = ArcadeWorld::new(Vec2::new(config.width, config.height), 7);
    let mut game = Game::new(config, world);
    game.load_assets(&mut DirAssetSource::new("."));

    // Walk right for five simulated seconds, hopping now and then
    for tick in 0..300u32 {
        let input = TickInput {
            right: true,
            up: tick % 45 == 0,
            ..Default::default()
        };
        game.step(&input);
        if tick % 60 == 0 {
            let score = game.sequencer.level().map(|l| l.state().score);
            log::info!(
                "t={:.1}s stage={} score={:?}",
                tick as f32 * SIM_DT,
                game.stage(),
                score
            );
        }
    }
    log::info!("Finished on stage {}", game.stage());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
