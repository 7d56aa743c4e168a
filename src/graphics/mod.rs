//! Everything that touches OpenGL directly.

pub mod opengl;
pub mod utils;
pub mod window;

pub use opengl::{GlDriver, GlVertexArray, GlVertexBuffer};
pub use window::GlWindow;
