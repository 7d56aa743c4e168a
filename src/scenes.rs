//! The exercises themselves: which shaders each one builds and what it draws.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use shaders::{
    Diagnostic, ProgramRegistry, ProgramSpec, ShaderError, ShaderProgramBuilder, ShaderSource,
    StageKind,
};

use crate::graphics::opengl::{clear, draw_triangles, set_vertex_attrib};
use crate::graphics::{GlDriver, GlVertexArray, GlVertexBuffer};

const SHADER_VS: &str = include_str!("../assets/shaders/shader.vs");
const SHADER_FS: &str = include_str!("../assets/shaders/shader.fs");
const ORANGE_FS: &str = include_str!("../assets/shaders/orange.fs");
const YELLOW_FS: &str = include_str!("../assets/shaders/yellow.fs");

/// Floats per vertex: a position (x, y, z) followed by a color (r, g, b).
pub const VERTEX_STRIDE: usize = 6;

pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

#[rustfmt::skip]
static TRIANGLE: [f32; 18] = [
    // positions        // colors
     0.5, -0.5, 0.0,    1.0, 0.0, 0.0,  // bottom right
    -0.5, -0.5, 0.0,    0.0, 1.0, 0.0,  // bottom left
     0.0,  0.5, 0.0,    0.0, 0.0, 1.0,  // top
];

#[rustfmt::skip]
static LEFT_TRIANGLE: [f32; 18] = [
    -0.9,  -0.5, 0.0,   1.0, 0.5, 0.2,
     0.0,  -0.5, 0.0,   1.0, 0.5, 0.2,
    -0.45,  0.5, 0.0,   1.0, 0.5, 0.2,
];

#[rustfmt::skip]
static RIGHT_TRIANGLE: [f32; 18] = [
    0.0,  -0.5, 0.0,    1.0, 1.0, 0.0,
    0.9,  -0.5, 0.0,    1.0, 1.0, 0.0,
    0.45,  0.5, 0.0,    1.0, 1.0, 0.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// One triangle with a color per corner, drawn by the program "ShaderProgram".
    Triangle,
    /// Two triangles in their own vertex arrays, drawn by "Orange" and "Yellow". Both programs
    /// share the same vertex stage.
    TwoTriangles,
}

impl Scene {
    pub const NAMES: [&'static str; 2] = ["triangle", "two-triangles"];

    pub fn name(self) -> &'static str {
        match self {
            Scene::Triangle => "triangle",
            Scene::TwoTriangles => "two-triangles",
        }
    }

    /// The scene's shader sources, with any file overrides applied.
    pub fn sources(self, overrides: &ShaderOverrides) -> Result<Vec<ShaderSource>, ShaderError> {
        let primary_fragment = match self {
            Scene::Triangle => ("fragment", SHADER_FS),
            Scene::TwoTriangles => ("orange", ORANGE_FS),
        };

        let mut sources = vec![
            source_or_builtin("vertex", StageKind::Vertex, SHADER_VS, overrides.vertex.as_ref())?,
            source_or_builtin(
                primary_fragment.0,
                StageKind::Fragment,
                primary_fragment.1,
                overrides.fragment.as_ref(),
            )?,
        ];

        if self == Scene::TwoTriangles {
            sources.push(ShaderSource::from_text("yellow", StageKind::Fragment, YELLOW_FS));
        }

        Ok(sources)
    }

    pub fn programs(self) -> Vec<ProgramSpec> {
        match self {
            Scene::Triangle => vec![ProgramSpec::new("ShaderProgram", vec!["vertex", "fragment"])],
            Scene::TwoTriangles => vec![
                ProgramSpec::new("Orange", vec!["vertex", "orange"]),
                ProgramSpec::new("Yellow", vec!["vertex", "yellow"]),
            ],
        }
    }

    /// What gets drawn each frame: a program name and the vertices it draws, one vertex array
    /// per entry.
    pub fn draws(self) -> Vec<(&'static str, &'static [f32])> {
        match self {
            Scene::Triangle => vec![("ShaderProgram", &TRIANGLE[..])],
            Scene::TwoTriangles => vec![
                ("Orange", &LEFT_TRIANGLE[..]),
                ("Yellow", &RIGHT_TRIANGLE[..]),
            ],
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::Triangle
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "triangle" => Ok(Scene::Triangle),
            "two-triangles" => Ok(Scene::TwoTriangles),
            other => Err(format!("unknown scene `{}` (expected one of {:?})", other, Scene::NAMES)),
        }
    }
}

/// Shader files to use instead of the built-in sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderOverrides {
    pub vertex: Option<PathBuf>,
    /// Replaces the scene's first fragment stage.
    pub fragment: Option<PathBuf>,
}

fn source_or_builtin(
    name: &str,
    kind: StageKind,
    builtin: &str,
    path: Option<&PathBuf>,
) -> Result<ShaderSource, ShaderError> {
    match path {
        Some(path) => ShaderSource::from_file(name, kind, path),
        None => Ok(ShaderSource::from_text(name, kind, builtin)),
    }
}

struct DrawCall {
    program: &'static str,
    vao: GlVertexArray,
    _vbo: GlVertexBuffer,
    vertices: i32,
}

/// A built scene: its programs plus the vertex arrays it draws with.
pub struct Demo {
    scene: Scene,
    registry: ProgramRegistry<GlDriver>,
    draws: Vec<DrawCall>,
    skipped: HashSet<&'static str>,
}

impl Demo {
    /// Builds every program of `scene` and uploads its vertex data. Compile and link failures
    /// don't stop this; the affected draws are skipped when rendering.
    pub fn build(
        driver: GlDriver,
        scene: Scene,
        overrides: &ShaderOverrides,
    ) -> Result<Self, ShaderError> {
        let sources = scene.sources(overrides)?;
        let registry = ShaderProgramBuilder::new(driver).build_all(&sources, &scene.programs())?;

        let draws = scene
            .draws()
            .into_iter()
            .map(|(program, vertices)| {
                let vao = GlVertexArray::generate();
                vao.bind();
                let vbo = GlVertexBuffer::init(vertices);
                set_vertex_attrib(0, 0, 3, VERTEX_STRIDE);
                set_vertex_attrib(1, 3, 3, VERTEX_STRIDE);
                GlVertexBuffer::unbind();
                GlVertexArray::unbind();

                DrawCall {
                    program,
                    vao,
                    _vbo: vbo,
                    vertices: (vertices.len() / VERTEX_STRIDE) as i32,
                }
            })
            .collect();

        log::info!("scene `{}` ready", scene);

        Ok(Self {
            scene,
            registry,
            draws,
            skipped: HashSet::new(),
        })
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.registry.diagnostics()
    }

    /// Clears the frame and issues every draw whose program is usable.
    pub fn draw(&mut self) {
        let [r, g, b, a] = CLEAR_COLOR;
        clear(r, g, b, a);

        for call in &self.draws {
            if let Err(e) = self.registry.activate(call.program) {
                // Once per program, not once per frame.
                if self.skipped.insert(call.program) {
                    log::warn!("skipping draw: {}", e);
                }
                continue;
            }

            call.vao.bind();
            draw_triangles(0, call.vertices);
        }

        GlVertexArray::unbind();
    }
}
