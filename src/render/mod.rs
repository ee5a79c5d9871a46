mod layout;
mod renderer;
mod text;

pub use renderer::{Renderer, ViewOptions};
