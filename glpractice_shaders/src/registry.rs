use std::collections::HashMap;
use std::fmt;

use crate::driver::ShaderDriver;
use crate::error::{Diagnostic, ShaderError};
use crate::program::LinkedProgram;

/// The programs produced by one build batch, keyed by name.
///
/// The registry owns its programs; dropping it (or calling [`ProgramRegistry::clear`]) deletes
/// every one of them. Use [`ProgramRegistry::take`] to move a program out and manage it yourself.
pub struct ProgramRegistry<D: ShaderDriver> {
    programs: HashMap<String, LinkedProgram<D>>,
    diagnostics: Vec<Diagnostic>,
}

impl<D: ShaderDriver> ProgramRegistry<D> {
    pub(crate) fn new() -> Self {
        Self {
            programs: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, program: LinkedProgram<D>) -> Result<(), ShaderError> {
        if self.programs.contains_key(program.name()) {
            return Err(ShaderError::DuplicateName(program.name().to_string()));
        }

        self.programs.insert(program.name().to_string(), program);
        Ok(())
    }

    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn get(&self, name: &str) -> Option<&LinkedProgram<D>> {
        self.programs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.programs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LinkedProgram<D>)> {
        self.programs.iter().map(|(name, program)| (name.as_str(), program))
    }

    /// Activates the named program, refusing unknown names and programs that did not link.
    pub fn activate(&self, name: &str) -> Result<(), ShaderError> {
        self.programs
            .get(name)
            .ok_or_else(|| ShaderError::UnknownProgram(name.to_string()))?
            .activate()
    }

    /// Every compile and link failure of the batch, in the order it happened.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Moves a program out of the registry. The caller becomes responsible for releasing it.
    pub fn take(&mut self, name: &str) -> Option<LinkedProgram<D>> {
        self.programs.remove(name)
    }

    pub fn clear(&mut self) {
        log::debug!("tearing down {} program(s)", self.programs.len());
        self.programs.clear();
        self.diagnostics.clear();
    }
}

impl<D: ShaderDriver> fmt::Debug for ProgramRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramRegistry")
            .field("programs", &self.programs)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use crate::builder::{ProgramSpec, ShaderProgramBuilder};
    use crate::fake::FakeDriver;
    use crate::source::{ShaderSource, StageKind};

    const VERTEX: &str = "#version 330 core\nvoid main() {\n    gl_Position = vec4(0.0);\n}\n";
    const ORANGE: &str = "#version 330 core
out vec4 c;
void main() {
    c = vec4(1.0, 0.5, 0.2, 1.0);
}
";
    const BROKEN: &str = "#version 330 core\nout vec4 c;\nvoi main() {\n    c = vec4(1.0);\n}\n";

    #[test]
    fn lookups_see_exactly_the_requested_programs() {
        let driver = Rc::new(FakeDriver::new());
        let builder = ShaderProgramBuilder::new(Rc::clone(&driver));
        let sources = [
            ShaderSource::from_text("vertex", StageKind::Vertex, VERTEX),
            ShaderSource::from_text("orange", StageKind::Fragment, ORANGE),
            ShaderSource::from_text("yellow", StageKind::Fragment, BROKEN),
        ];
        let programs = [
            ProgramSpec::new("Orange", vec!["vertex", "orange"]),
            ProgramSpec::new("Yellow", vec!["vertex", "yellow"]),
        ];

        let registry = builder.build_all(&sources, &programs).unwrap();

        let mut names: Vec<&str> = registry.names().collect();
        names.sort();
        assert_eq!(names, vec!["Orange", "Yellow"]);

        let linked: BTreeMap<&str, bool> = registry
            .iter()
            .map(|(name, program)| (name, program.is_linked()))
            .collect();
        let expected: BTreeMap<&str, bool> =
            vec![("Orange", true), ("Yellow", false)].into_iter().collect();
        assert_eq!(linked, expected);

        assert!(registry.contains("Orange"));
        assert!(registry.contains("Yellow"));
        assert!(!registry.contains("ShaderProgram"));

        let diagnostics = registry.diagnostics();
        let compile_failures = diagnostics.iter().filter(|d| d.is_compilation()).count();
        let link_failures = diagnostics.iter().filter(|d| d.is_link()).count();
        assert_eq!((compile_failures, link_failures), (1, 1));
    }
}
