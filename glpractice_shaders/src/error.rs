use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::source::StageKind;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to compile {kind} shader `{name}`: {log}")]
    Compilation {
        name: String,
        kind: StageKind,
        log: String,
    },

    #[error("failed to link program `{program}`: {log}")]
    Link { program: String, log: String },

    /// Something tried to draw with a program that never linked.
    #[error("program `{0}` did not link and cannot be activated")]
    InactiveProgram(String),

    #[error("no program named `{0}`")]
    UnknownProgram(String),

    /// The same program name was requested twice in one batch.
    #[error("program name `{0}` requested more than once")]
    DuplicateName(String),

    /// Two shader sources in one batch share a name.
    #[error("shader source name `{0}` given more than once")]
    DuplicateStage(String),

    #[error("program `{program}` references unknown shader source `{stage}`")]
    UnknownStage { program: String, stage: String },

    #[error("cannot tell the shader stage of {} from its extension", .0.display())]
    UnknownStageKind(PathBuf),

    #[error("failed to read shader source {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The window or graphics context could not be brought up.
    #[error("graphics context error: {0}")]
    Context(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Compilation(StageKind),
    Link,
}

/// One compile or link failure, as reported by the driver.
///
/// `subject` is the shader source name for compile failures and the program name for link
/// failures. `log` never exceeds [`MAX_INFO_LOG_LEN`](crate::MAX_INFO_LOG_LEN) characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub subject: String,
    pub kind: DiagnosticKind,
    pub log: String,
}

impl Diagnostic {
    pub fn is_compilation(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Compilation(_))
    }

    pub fn is_link(&self) -> bool {
        self.kind == DiagnosticKind::Link
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::Compilation(kind) => {
                write!(f, "{} shader `{}` failed to compile: {}", kind, self.subject, self.log)
            }
            DiagnosticKind::Link => {
                write!(f, "program `{}` failed to link: {}", self.subject, self.log)
            }
        }
    }
}

impl From<Diagnostic> for ShaderError {
    fn from(diagnostic: Diagnostic) -> Self {
        match diagnostic.kind {
            DiagnosticKind::Compilation(kind) => ShaderError::Compilation {
                name: diagnostic.subject,
                kind,
                log: diagnostic.log,
            },
            DiagnosticKind::Link => ShaderError::Link {
                program: diagnostic.subject,
                log: diagnostic.log,
            },
        }
    }
}
