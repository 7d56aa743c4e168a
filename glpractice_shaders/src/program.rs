//! Owned driver objects: compiled stages and linked programs.
//!
//! Both types delete their driver object when dropped, so a handle can't leak out of an early
//! return or a `?`. Each keeps its own copy of the driver to do that; drivers are expected to be
//! cheap to clone (a unit struct, or an `Rc`).

use crate::driver::{ProgramHandle, ShaderDriver, StageHandle};
use crate::error::{Diagnostic, DiagnosticKind, ShaderError};
use crate::source::StageKind;

/// The result of compiling one [`ShaderSource`](crate::ShaderSource).
///
/// A stage that failed to compile is still a live driver object; it can be handed to a link step
/// like any other (the link will fail) and is cleaned up the same way.
pub struct CompiledStage<D: ShaderDriver> {
    pub(crate) name: String,
    pub(crate) kind: StageKind,
    pub(crate) handle: StageHandle,
    pub(crate) success: bool,
    pub(crate) log: Option<String>,
    pub(crate) driver: D,
}

impl<D: ShaderDriver> CompiledStage<D> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn handle(&self) -> StageHandle {
        self.handle
    }

    pub fn is_compiled(&self) -> bool {
        self.success
    }

    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    pub fn diagnostic(&self) -> Option<Diagnostic> {
        if self.success {
            return None;
        }

        Some(Diagnostic {
            subject: self.name.clone(),
            kind: DiagnosticKind::Compilation(self.kind),
            log: self.log.clone().unwrap_or_default(),
        })
    }

    pub fn error(&self) -> Option<ShaderError> {
        self.diagnostic().map(ShaderError::from)
    }
}

impl<D: ShaderDriver> Drop for CompiledStage<D> {
    fn drop(&mut self) {
        log::trace!("deleting {} shader `{}` ({})", self.kind, self.name, self.handle);
        self.driver.delete_stage(self.handle);
    }
}

/// A program object built from one or more compiled stages.
///
/// Only a program whose link succeeded may be activated. The driver object is deleted by
/// [`LinkedProgram::release`] or when the value is dropped.
pub struct LinkedProgram<D: ShaderDriver> {
    pub(crate) name: String,
    pub(crate) handle: ProgramHandle,
    pub(crate) success: bool,
    pub(crate) log: Option<String>,
    pub(crate) driver: D,
}

impl<D: ShaderDriver> LinkedProgram<D> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn is_linked(&self) -> bool {
        self.success
    }

    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    pub fn diagnostic(&self) -> Option<Diagnostic> {
        if self.success {
            return None;
        }

        Some(Diagnostic {
            subject: self.name.clone(),
            kind: DiagnosticKind::Link,
            log: self.log.clone().unwrap_or_default(),
        })
    }

    pub fn error(&self) -> Option<ShaderError> {
        self.diagnostic().map(ShaderError::from)
    }

    pub fn activate(&self) -> Result<(), ShaderError> {
        if !self.success {
            return Err(ShaderError::InactiveProgram(self.name.clone()));
        }

        self.driver.use_program(self.handle);
        Ok(())
    }

    pub fn release(self) {
        drop(self)
    }
}

impl<D: ShaderDriver> Drop for LinkedProgram<D> {
    fn drop(&mut self) {
        log::debug!("deleting program `{}` ({})", self.name, self.handle);
        self.driver.delete_program(self.handle);
    }
}

impl<D: ShaderDriver> std::fmt::Debug for CompiledStage<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledStage")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("handle", &self.handle)
            .field("success", &self.success)
            .field("log", &self.log)
            .finish()
    }
}

impl<D: ShaderDriver> std::fmt::Debug for LinkedProgram<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedProgram")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("success", &self.success)
            .field("log", &self.log)
            .finish()
    }
}
