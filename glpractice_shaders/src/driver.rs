//! The seam between the builder and the graphics API.
//!
//! A [`ShaderDriver`] is a thin, stateless-looking view of a graphics context: it hands out
//! integer handles and answers status queries about them. OpenGL exposes exactly this shape
//! (`glCreateShader`, `glGetShaderiv`, `glCreateProgram`, ...), so implementing the trait for a
//! real context is a line or two of `unsafe` per method.
//!
//! Drivers take `&self` everywhere. A graphics context is a single, thread-bound piece of global
//! state; implementations that need to mutate bookkeeping (like the fake driver in the tests) use
//! interior mutability.

use std::fmt;
use std::rc::Rc;

use crate::source::StageKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

impl fmt::Display for StageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage#{}", self.0)
    }
}

impl fmt::Display for ProgramHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program#{}", self.0)
    }
}

pub trait ShaderDriver {
    fn create_stage(&self, kind: StageKind) -> StageHandle;

    /// Uploads `source` into the stage and asks the driver to compile it.
    fn compile_stage(&self, stage: StageHandle, source: &str);

    fn compile_status(&self, stage: StageHandle) -> bool;

    /// Reads at most `max_len` characters of the stage's info log.
    fn stage_info_log(&self, stage: StageHandle, max_len: usize) -> String;

    fn delete_stage(&self, stage: StageHandle);

    fn create_program(&self) -> ProgramHandle;

    fn attach_stage(&self, program: ProgramHandle, stage: StageHandle);

    fn detach_stage(&self, program: ProgramHandle, stage: StageHandle);

    fn link_program(&self, program: ProgramHandle);

    fn link_status(&self, program: ProgramHandle) -> bool;

    /// Reads at most `max_len` characters of the program's info log.
    fn program_info_log(&self, program: ProgramHandle, max_len: usize) -> String;

    fn use_program(&self, program: ProgramHandle);

    fn delete_program(&self, program: ProgramHandle);
}

// Lets several owners (stages, programs, the builder) share one driver.
impl<D: ShaderDriver + ?Sized> ShaderDriver for Rc<D> {
    fn create_stage(&self, kind: StageKind) -> StageHandle {
        (**self).create_stage(kind)
    }

    fn compile_stage(&self, stage: StageHandle, source: &str) {
        (**self).compile_stage(stage, source)
    }

    fn compile_status(&self, stage: StageHandle) -> bool {
        (**self).compile_status(stage)
    }

    fn stage_info_log(&self, stage: StageHandle, max_len: usize) -> String {
        (**self).stage_info_log(stage, max_len)
    }

    fn delete_stage(&self, stage: StageHandle) {
        (**self).delete_stage(stage)
    }

    fn create_program(&self) -> ProgramHandle {
        (**self).create_program()
    }

    fn attach_stage(&self, program: ProgramHandle, stage: StageHandle) {
        (**self).attach_stage(program, stage)
    }

    fn detach_stage(&self, program: ProgramHandle, stage: StageHandle) {
        (**self).detach_stage(program, stage)
    }

    fn link_program(&self, program: ProgramHandle) {
        (**self).link_program(program)
    }

    fn link_status(&self, program: ProgramHandle) -> bool {
        (**self).link_status(program)
    }

    fn program_info_log(&self, program: ProgramHandle, max_len: usize) -> String {
        (**self).program_info_log(program, max_len)
    }

    fn use_program(&self, program: ProgramHandle) {
        (**self).use_program(program)
    }

    fn delete_program(&self, program: ProgramHandle) {
        (**self).delete_program(program)
    }
}
