//! Shader stage compilation and program linking over an abstract graphics driver.
//!
//! Everything in this crate talks to the GPU through the [`ShaderDriver`] trait, so the same
//! build-and-link logic drives a real OpenGL context in the application and a fake driver in the
//! tests. The usual entry point is [`ShaderProgramBuilder::build_all`], which takes a list of
//! named [`ShaderSource`]s and a list of [`ProgramSpec`]s and hands back a [`ProgramRegistry`].
//!
//! Compile and link failures are data, not errors: they are recorded as [`Diagnostic`]s and the
//! rest of the batch keeps going. A program that failed to link can still be looked up, but
//! activating it is refused with [`ShaderError::InactiveProgram`].

pub mod builder;
pub mod driver;
pub mod error;
pub mod program;
pub mod registry;
pub mod source;
pub(crate) mod utils;

#[cfg(test)]
mod fake;

pub use builder::{ProgramSpec, ShaderProgramBuilder};
pub use driver::{ProgramHandle, ShaderDriver, StageHandle};
pub use error::{Diagnostic, DiagnosticKind, ShaderError};
pub use program::{CompiledStage, LinkedProgram};
pub use registry::ProgramRegistry;
pub use source::{ShaderSource, StageKind};

/// Upper bound, in characters, on any compile or link log kept by this crate. Longer driver
/// messages are cut off, never grown into.
pub const MAX_INFO_LOG_LEN: usize = 512;
