//! The window and its OpenGL context.

use glutin::dpi::{LogicalSize, PhysicalSize};
use glutin::event_loop::EventLoop;
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest, PossiblyCurrent, WindowedContext};

use shaders::ShaderError;

use super::opengl::{core_entry_points_loaded, set_viewport, GlDriver};

/// OpenGL version every exercise targets (3.3 core profile).
pub const GL_VERSION: (u8, u8) = (3, 3);

/// A window with a current OpenGL context.
pub struct GlWindow {
    context: WindowedContext<PossiblyCurrent>,
    title: String,
}

impl GlWindow {
    /// Opens a `width` x `height` window titled `title`, asks for a 3.3 core context and makes it
    /// current on this thread.
    pub fn create(
        events: &EventLoop<()>,
        width: u32,
        height: u32,
        title: &str,
        visible: bool,
    ) -> Result<Self, ShaderError> {
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width, height))
            .with_visible(visible);

        let context = ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, GL_VERSION))
            .with_gl_profile(GlProfile::Core)
            .build_windowed(window, events)
            .map_err(|e| ShaderError::Context(format!("failed to create window: {}", e)))?;

        let context = unsafe { context.make_current() }.map_err(|(_, e)| {
            ShaderError::Context(format!("failed to make context current: {}", e))
        })?;

        log::info!("created {}x{} window \"{}\"", width, height, title);

        Ok(Self {
            context,
            title: title.to_string(),
        })
    }

    /// Loads the OpenGL function pointers through the context. Returns false if any of the entry
    /// points the exercises need is missing.
    pub fn load_entry_points(&self) -> bool {
        gl::load_with(|symbol| self.context.get_proc_address(symbol) as *const _);

        let loaded = core_entry_points_loaded();
        if loaded {
            log::debug!("loaded OpenGL entry points for \"{}\"", self.title);
        }
        loaded
    }

    /// The shader driver for this window's context. Only meaningful once
    /// [`GlWindow::load_entry_points`] has returned true.
    pub fn driver(&self) -> GlDriver {
        GlDriver::new()
    }

    /// Keeps the drawable and the viewport in step with the window's framebuffer size.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        log::trace!("framebuffer resized to {}x{}", size.width, size.height);
        self.context.resize(size);
        set_viewport(size.width, size.height);
    }

    pub fn request_redraw(&self) {
        self.context.window().request_redraw();
    }

    pub fn swap_buffers(&self) -> Result<(), ShaderError> {
        self.context
            .swap_buffers()
            .map_err(|e| ShaderError::Context(format!("failed to swap buffers: {}", e)))
    }
}
