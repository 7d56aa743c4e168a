//! Safe-ish wrappers around the handful of raw OpenGL calls the exercises need.
//!
//! The shader side of things is the [`GlDriver`], which plugs OpenGL into the `shaders` crate's
//! [`ShaderDriver`] trait. Everything else here (vertex arrays, vertex buffers, attribute layout)
//! is the bare minimum to get vertex data onto the card and draw it.
//!
//! All of these types assume the GL function pointers have been loaded and that the context
//! they belong to is current on the calling thread. None of them are `Send`.
//!
//! If OpenGL itself is new to you, [Learn OpenGL](https://learnopengl.com/) covers everything
//! this module does, one chapter per concept.

use std::ffi::{c_void, CString};
use std::marker::PhantomData;
use std::mem::size_of;

use gl;
use gl::types::*;

use shaders::{ProgramHandle, ShaderDriver, StageHandle, StageKind};

use super::utils::*;

/// The current OpenGL context, seen as a [`ShaderDriver`].
///
/// This is a zero-sized token; every call goes straight through to the loaded GL entry points.
/// Get one from [`GlWindow::driver`](super::window::GlWindow::driver) after the entry points are
/// loaded.
#[derive(Debug, Clone, Copy)]
pub struct GlDriver {
    // GL contexts are bound to the thread that made them current.
    _not_send: PhantomData<*const ()>,
}

impl GlDriver {
    pub(super) fn new() -> Self {
        Self { _not_send: PhantomData }
    }
}

impl ShaderDriver for GlDriver {
    fn create_stage(&self, kind: StageKind) -> StageHandle {
        StageHandle(unsafe { gl::CreateShader(gl_stage_kind(kind)) })
    }

    fn compile_stage(&self, stage: StageHandle, source: &str) {
        let source = match CString::new(source) {
            Ok(source) => source,
            Err(e) => {
                // Left uncompiled, so the status query reports the failure.
                log::error!("{} source has a NUL byte at {}", stage, e.nul_position());
                return;
            }
        };

        upload_source(stage.0, &source);
        unsafe {
            gl::CompileShader(stage.0);
        }
    }

    fn compile_status(&self, stage: StageHandle) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe {
            gl::GetShaderiv(stage.0, gl::COMPILE_STATUS, &mut success);
        }
        success != gl::FALSE as GLint
    }

    fn stage_info_log(&self, stage: StageHandle, max_len: usize) -> String {
        read_info_log(max_len, |len, written, buf| unsafe {
            gl::GetShaderInfoLog(stage.0, len, written, buf);
        })
    }

    fn delete_stage(&self, stage: StageHandle) {
        unsafe {
            gl::DeleteShader(stage.0);
        }
    }

    fn create_program(&self) -> ProgramHandle {
        ProgramHandle(unsafe { gl::CreateProgram() })
    }

    fn attach_stage(&self, program: ProgramHandle, stage: StageHandle) {
        unsafe {
            gl::AttachShader(program.0, stage.0);
        }
    }

    fn detach_stage(&self, program: ProgramHandle, stage: StageHandle) {
        unsafe {
            gl::DetachShader(program.0, stage.0);
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        unsafe {
            gl::LinkProgram(program.0);
        }
    }

    fn link_status(&self, program: ProgramHandle) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe {
            gl::GetProgramiv(program.0, gl::LINK_STATUS, &mut success);
        }
        success != gl::FALSE as GLint
    }

    fn program_info_log(&self, program: ProgramHandle, max_len: usize) -> String {
        read_info_log(max_len, |len, written, buf| unsafe {
            gl::GetProgramInfoLog(program.0, len, written, buf);
        })
    }

    fn use_program(&self, program: ProgramHandle) {
        unsafe {
            gl::UseProgram(program.0);
        }
    }

    fn delete_program(&self, program: ProgramHandle) {
        unsafe {
            gl::DeleteProgram(program.0);
        }
    }
}

/// A vertex array object (VAO) remembers which buffer the vertex attributes read from and how
/// they are laid out, so a draw call only needs to bind the VAO.
pub struct GlVertexArray {
    id: u32,
}

impl GlVertexArray {
    pub fn generate() -> Self {
        let mut vao = 0u32;
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        Self { id: vao }
    }

    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.id); }
    }

    pub fn unbind() {
        unsafe { gl::BindVertexArray(0); }
    }
}

impl Drop for GlVertexArray {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.id);
        }
    }
}

/// Represents a [vertex buffer object (VBO)](https://en.wikipedia.org/wiki/Vertex_buffer_object),
/// vertex data living on the graphics card. Vertices don't have to be spatial; here they carry a
/// position and a color each.
pub struct GlVertexBuffer {
    id: u32,
}

impl GlVertexBuffer {
    /// Generates a buffer, binds it as the array buffer and uploads `data` for static drawing.
    pub fn init(data: &[f32]) -> Self {
        let vbo = Self::generate();
        vbo.bind();
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (data.len() * size_of::<f32>()) as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW
            );
        }

        vbo
    }

    pub fn generate() -> Self {
        let mut vbo = 0u32;
        unsafe { gl::GenBuffers(1, &mut vbo) };
        Self { id: vbo }
    }

    pub fn bind(&self) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, self.id); }
    }

    pub fn unbind() {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, 0); }
    }
}

impl Drop for GlVertexBuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.id);
        }
    }
}

/// Describes attribute `index` as `size` floats starting `offset` floats into each vertex, with
/// vertices `stride` floats apart, and enables it. Applies to the bound VAO and array buffer.
pub fn set_vertex_attrib(index: u32, offset: usize, size: i32, stride: usize) {
    unsafe {
        gl::VertexAttribPointer(
            index,
            size,
            gl::FLOAT,
            gl::FALSE,
            (stride * size_of::<f32>()) as GLsizei,
            (offset * size_of::<f32>()) as *const c_void
        );
        gl::EnableVertexAttribArray(index);
    }
}

pub fn clear(r: f32, g: f32, b: f32, a: f32) {
    unsafe {
        gl::ClearColor(r, g, b, a);
        gl::Clear(gl::COLOR_BUFFER_BIT);
    }
}

pub fn draw_triangles(first: i32, count: i32) {
    unsafe {
        gl::DrawArrays(gl::TRIANGLES, first, count);
    }
}

pub fn set_viewport(width: u32, height: u32) {
    unsafe {
        gl::Viewport(0, 0, width as GLsizei, height as GLsizei);
    }
}

/// Whether the entry points every exercise relies on were found.
pub fn core_entry_points_loaded() -> bool {
    gl::CreateShader::is_loaded()
        && gl::CreateProgram::is_loaded()
        && gl::GenVertexArrays::is_loaded()
        && gl::GenBuffers::is_loaded()
        && gl::UseProgram::is_loaded()
        && gl::DrawArrays::is_loaded()
}
