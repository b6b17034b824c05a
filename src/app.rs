use std::collections::VecDeque;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    Rc,
    event::{Event, Key},
    render::{
        Color, Renderer,
        texture::{TextureError, TextureId},
        vertex::Triangle,
    },
    time::FrameTimer,
};

pub trait InitFn: FnOnce(&mut InitContext<'_>) + 'static {}
impl<F: FnOnce(&mut InitContext<'_>) + 'static> InitFn for F {}
pub trait UpdateFn: FnMut(&mut Context<'_>) + 'static {}
impl<F: FnMut(&mut Context<'_>) + 'static> UpdateFn for F {}

/// Window settings applied when the event loop starts
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "tria".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
        }
    }
}

/// Passed to the init closure once the window & renderer exist
pub struct InitContext<'a> {
    window: Rc<Window>,
    renderer: &'a mut Renderer,
}

impl InitContext<'_> {
    /// Loads a texture from a PNG on disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_texture(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<TextureId, TextureError> {
        self.renderer.load_texture(path)
    }

    /// Loads a texture from encoded image bytes
    pub fn add_texture(&mut self, data: &[u8]) -> Result<TextureId, TextureError> {
        self.renderer.add_texture(data)
    }

    /// Creates a texture from raw RGBA bytes
    pub fn create_texture(&mut self, width: u32, height: u32, data: &[u8]) -> TextureId {
        self.renderer.add_texture_raw(width, height, data)
    }

    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.renderer.texture_size(id)
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame view of the app: drained input events, frame timing & draw calls
pub struct Context<'a> {
    renderer: &'a mut Renderer,
    events: &'a mut VecDeque<Event>,
    timer: &'a FrameTimer,
    exit: &'a mut bool,
}

impl Context<'_> {
    /// Next normalized input event, oldest first; `None` once drained
    pub fn poll_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Seconds since the previous frame
    pub fn delta(&self) -> f32 {
        self.timer.delta
    }

    pub fn fps(&self) -> u32 {
        self.timer.fps
    }

    pub fn screen_size(&self) -> (f32, f32) {
        self.renderer.surface_size()
    }

    pub fn clear(&mut self, color: Color) {
        self.renderer.set_clear_color(color);
    }

    /// Queues flat-colored triangles for this frame
    pub fn draw(&mut self, triangles: &[Triangle]) {
        self.renderer.submit(triangles);
    }

    /// Queues textured triangles for this frame
    pub fn draw_textured(&mut self, triangles: &[Triangle], texture: TextureId) {
        self.renderer.submit_textured(triangles, texture);
    }

    /// Stops the event loop after this frame
    pub fn exit(&mut self) {
        *self.exit = true;
    }
}

/// Blocking event/render loop around a single window
///
/// ```no_run
/// use tria::{app::App, render::Color};
///
/// App::init(|_| {}).run(|ctx| {
///     ctx.clear(Color::BLUE);
/// });
/// ```
pub struct App<I, U> {
    window: Option<Rc<Window>>,
    proxy: Option<EventLoopProxy<Renderer>>,
    renderer: Option<Renderer>,
    init: Option<I>,
    update: Option<U>,
    events: VecDeque<Event>,
    cursor: (f32, f32),
    timer: FrameTimer,
    config: AppConfig,
}

impl<I: InitFn, U: UpdateFn> ApplicationHandler<Renderer> for App<I, U> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(proxy) = self.proxy.take() {
            let win_attrs = {
                #[cfg(target_arch = "wasm32")]
                {
                    use winit::platform::web::WindowAttributesExtWebSys;
                    Window::default_attributes().with_append(true)
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    use winit::{dpi::PhysicalSize, window::Fullscreen};

                    let mut attrs = Window::default_attributes()
                        .with_title(&self.config.title)
                        .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
                        .with_resizable(false);
                    if self.config.fullscreen {
                        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
                    }
                    attrs
                }
            };
            let window = Rc::new(event_loop.create_window(win_attrs).unwrap());
            self.window = Some(window.clone());

            let size = window.inner_size();
            let (w, h) = (size.width.max(1), size.height.max(1));

            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(async move {
                let renderer = Renderer::new(w, h, window).await;
                let _ = proxy.send_event(renderer);
            });
            #[cfg(not(target_arch = "wasm32"))]
            {
                let renderer = pollster::block_on(Renderer::new(w, h, window));
                let _ = proxy.send_event(renderer);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            // The update closure decides when the loop actually stops
            WindowEvent::CloseRequested => self.events.push_back(Event::Quit),
            WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    let key = Key::from_key_code(code);
                    self.events.push_back(match event.state {
                        ElementState::Pressed => Event::KeyPressed(key),
                        ElementState::Released => Event::KeyReleased(key),
                    });
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                self.events.push_back(Event::MouseMotion {
                    x: self.cursor.0,
                    y: self.cursor.1,
                });
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } => {
                self.events.push_back(Event::MouseClick {
                    x: self.cursor.0,
                    y: self.cursor.1,
                });
            }
            WindowEvent::RedrawRequested => {
                self.timer.update();

                if self.renderer.is_some() {
                    let mut exit = false;
                    {
                        let mut ctx = Context {
                            renderer: self.renderer.as_mut().unwrap(),
                            events: &mut self.events,
                            timer: &self.timer,
                            exit: &mut exit,
                        };
                        self.update.as_mut().unwrap()(&mut ctx);
                    }
                    // unread events don't leak into the next frame
                    self.events.clear();

                    if exit {
                        event_loop.exit();
                        return;
                    }
                    self.renderer.as_mut().unwrap().render_frame();
                }

                self.window.as_ref().unwrap().request_redraw();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
            }
            _ => {}
        }
    }

    fn user_event(&mut self, _: &ActiveEventLoop, mut renderer: Renderer) {
        if let Some(init) = self.init.take() {
            init(&mut InitContext {
                window: self.window.as_ref().unwrap().clone(),
                renderer: &mut renderer,
            });
        }
        self.renderer = Some(renderer);
    }
}

impl<I: InitFn, U: UpdateFn> App<I, U> {
    pub fn init(init: I) -> Self {
        Self {
            window: None,
            proxy: None,
            renderer: None,
            init: Some(init),
            update: None,
            events: VecDeque::new(),
            cursor: (0.0, 0.0),
            timer: FrameTimer::new(),
            config: AppConfig::default(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        (self.config.width, self.config.height) = (width, height);
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.config.fullscreen = fullscreen;
        self
    }

    /// Runs the blocking event loop, calling `update` once per frame
    pub fn run(mut self, update: U) {
        let event_loop = EventLoop::<Renderer>::with_user_event().build().unwrap();
        event_loop.set_control_flow(ControlFlow::Poll);

        self.proxy = Some(event_loop.create_proxy());
        self.update = Some(update);

        #[cfg(target_arch = "wasm32")]
        {
            #[cfg(feature = "log")]
            {
                std::panic::set_hook(Box::new(console_error_panic_hook::hook));
                console_log::init_with_level(log::Level::Info).unwrap();
            }

            use winit::platform::web::EventLoopExtWebSys;
            wasm_bindgen_futures::spawn_local(async move {
                event_loop.spawn_app(self);
            });
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            #[cfg(feature = "log")]
            env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

            event_loop.run_app(&mut self).unwrap();
        }
    }
}
