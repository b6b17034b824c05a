//! A tiny 2D triangle renderer: one window, two fixed pipelines
//! (flat-colored & textured) & a blocking event/render loop

pub mod event;
pub mod render;
pub mod time;

#[cfg(feature = "windowing")]
pub mod app;

#[cfg(target_arch = "wasm32")]
pub type Rc<T> = std::rc::Rc<T>;
#[cfg(not(target_arch = "wasm32"))]
pub type Rc<T> = std::sync::Arc<T>;

pub use event::{Event, Key};
pub use render::{
    Color, Renderer,
    texture::{Texture, TextureError, TextureId},
    vertex::{Triangle, Vertex},
};

#[cfg(feature = "windowing")]
pub use app::{App, AppConfig, Context, InitContext};
