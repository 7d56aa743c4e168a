use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShaderError;

/// The pipeline step a shader stage runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
    Geometry,
    TessControl,
    TessEvaluation,
    Compute,
}

impl StageKind {
    pub const ALL: [StageKind; 6] = [
        StageKind::Vertex,
        StageKind::Fragment,
        StageKind::Geometry,
        StageKind::TessControl,
        StageKind::TessEvaluation,
        StageKind::Compute,
    ];

    /// Guesses the stage kind from a file extension. Both the short LearnOpenGL style (`.vs`,
    /// `.fs`) and the glslang style (`.vert`, `.frag`) are recognized.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;

        match ext.to_ascii_lowercase().as_str() {
            "vs" | "vert" => Some(StageKind::Vertex),
            "fs" | "frag" => Some(StageKind::Fragment),
            "gs" | "geom" => Some(StageKind::Geometry),
            "tesc" => Some(StageKind::TessControl),
            "tese" => Some(StageKind::TessEvaluation),
            "cs" | "comp" => Some(StageKind::Compute),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
            StageKind::Geometry => "geometry",
            StageKind::TessControl => "tessellation control",
            StageKind::TessEvaluation => "tessellation evaluation",
            StageKind::Compute => "compute",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named piece of shader source for one stage.
///
/// The text is read once, when the value is built, and never changes afterwards. `origin`
/// remembers the file it came from (if any) so diagnostics can point at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    name: String,
    kind: StageKind,
    text: String,
    origin: Option<PathBuf>,
}

impl ShaderSource {
    pub fn from_text<N, T>(name: N, kind: StageKind, text: T) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            kind,
            text: text.into(),
            origin: None,
        }
    }

    pub fn from_file<N, P>(name: N, kind: StageKind, path: P) -> Result<Self, ShaderError>
    where
        N: Into<String>,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("read {} bytes of shader source from {}", text.len(), path.display());

        Ok(Self {
            name: name.into(),
            kind,
            text,
            origin: Some(path.to_path_buf()),
        })
    }

    /// Like [`ShaderSource::from_file`], but the stage kind comes from the extension and the name
    /// from the file stem.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let kind = StageKind::from_extension(path)
            .ok_or_else(|| ShaderError::UnknownStageKind(path.to_path_buf()))?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_file(name, kind, path)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}
