use std::ptr::null;

use gl;
use gl::types::*;

use shaders::StageKind;

/// The `GLenum` OpenGL uses for each kind of shader stage.
pub fn gl_stage_kind(kind: StageKind) -> GLenum {
    match kind {
        StageKind::Vertex => gl::VERTEX_SHADER,
        StageKind::Fragment => gl::FRAGMENT_SHADER,
        StageKind::Geometry => gl::GEOMETRY_SHADER,
        StageKind::TessControl => gl::TESS_CONTROL_SHADER,
        StageKind::TessEvaluation => gl::TESS_EVALUATION_SHADER,
        StageKind::Compute => gl::COMPUTE_SHADER,
    }
}

/// Reads an info log into a fixed-size buffer.
///
/// `fetch` gets the buffer size (which includes room for the NUL terminator), a place to write
/// how many characters it actually wrote, and the buffer itself; this is exactly the argument
/// list of `glGetShaderInfoLog` and `glGetProgramInfoLog` minus the object name. Messages longer
/// than the buffer are cut off by the driver.
pub fn read_info_log<F>(max_len: usize, fetch: F) -> String
where
    F: FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
{
    let mut buf: Vec<u8> = vec![0; max_len.max(1)];
    let mut written: GLsizei = 0;

    fetch(buf.len() as GLsizei, &mut written, buf.as_mut_ptr() as *mut GLchar);

    let written = (written.max(0) as usize).min(buf.len());
    buf.truncate(written);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Hands a single source string to `glShaderSource`. The string must not contain NUL bytes.
pub fn upload_source(id: GLuint, source: &std::ffi::CStr) {
    unsafe {
        gl::ShaderSource(id, 1, &source.as_ptr(), null());
    }
}
