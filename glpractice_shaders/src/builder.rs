//! Compiling stages, linking programs, and building whole batches of them.

use std::collections::{HashMap, HashSet};

use crate::driver::ShaderDriver;
use crate::error::ShaderError;
use crate::program::{CompiledStage, LinkedProgram};
use crate::registry::ProgramRegistry;
use crate::source::ShaderSource;
use crate::utils::truncate_log;
use crate::MAX_INFO_LOG_LEN;

/// A request for one program: its name and the shader sources (by name) to link into it, in
/// attachment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSpec {
    pub name: String,
    pub stages: Vec<String>,
}

impl ProgramSpec {
    pub fn new<N, I, S>(name: N, stages: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            stages: stages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Turns shader sources into linked programs.
///
/// Nothing here aborts on a bad shader. Every stage is compiled, every program is linked, and
/// whatever went wrong is reported alongside the results. Must only be used on the thread that
/// owns the driver's context.
pub struct ShaderProgramBuilder<D: ShaderDriver + Clone> {
    driver: D,
}

impl<D: ShaderDriver + Clone> ShaderProgramBuilder<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Compiles a single stage.
    ///
    /// The stage object is created even if compilation fails, so the caller can clean up every
    /// stage the same way. Check [`CompiledStage::is_compiled`] for the outcome.
    pub fn compile(&self, source: &ShaderSource) -> CompiledStage<D> {
        let handle = self.driver.create_stage(source.kind());

        let (success, message) = match source.text().find('\0') {
            // The driver reads source as a C string, so anything past a NUL would vanish.
            Some(offset) => {
                let message = format!("source text contains a NUL byte at offset {}", offset);
                (false, Some(message))
            }
            None => {
                self.driver.compile_stage(handle, source.text());

                if self.driver.compile_status(handle) {
                    (true, None)
                } else {
                    let raw = self.driver.stage_info_log(handle, MAX_INFO_LOG_LEN);
                    (false, Some(or_placeholder(truncate_log(raw, MAX_INFO_LOG_LEN))))
                }
            }
        };

        match &message {
            None => log::debug!(
                "compiled {} shader `{}` ({})",
                source.kind(),
                source.name(),
                handle
            ),
            Some(message) => log::warn!(
                "{} shader `{}` failed to compile: {}",
                source.kind(),
                source.name(),
                message
            ),
        }

        CompiledStage {
            name: source.name().to_string(),
            kind: source.kind(),
            handle,
            success,
            log: message,
            driver: self.driver.clone(),
        }
    }

    /// Links `stages` into a program called `name`, then deletes the stages.
    ///
    /// The stages are consumed whether or not the link succeeds.
    pub fn link<N>(&self, name: N, stages: Vec<CompiledStage<D>>) -> LinkedProgram<D>
    where
        N: Into<String>,
    {
        let refs: Vec<&CompiledStage<D>> = stages.iter().collect();
        let program = self.link_stages(name.into(), &refs);
        drop(refs);
        drop(stages);
        program
    }

    /// Compiles `sources` in order and links them into one program.
    pub fn build_program<N>(&self, name: N, sources: &[ShaderSource]) -> LinkedProgram<D>
    where
        N: Into<String>,
    {
        let stages = sources.iter().map(|source| self.compile(source)).collect();
        self.link(name, stages)
    }

    /// Builds every program in `programs` from the named `sources`.
    ///
    /// Each source is compiled once, the first time a program needs it, and deleted right after
    /// the last program that uses it has been linked. Programs are built in the order given.
    ///
    /// Malformed requests (duplicate program or source names, references to sources that don't
    /// exist) are rejected with an error before anything is created. Compile and link failures
    /// are not errors; they end up in [`ProgramRegistry::diagnostics`] and the affected programs
    /// are stored with their success flag cleared.
    pub fn build_all(
        &self,
        sources: &[ShaderSource],
        programs: &[ProgramSpec],
    ) -> Result<ProgramRegistry<D>, ShaderError> {
        let by_name = index_sources(sources)?;
        let last_use = plan_stage_lifetimes(&by_name, programs)?;

        for source in sources {
            if !last_use.contains_key(source.name()) {
                log::warn!("shader source `{}` is not used by any program", source.name());
            }
        }

        let mut registry = ProgramRegistry::new();
        let mut live: HashMap<&str, CompiledStage<D>> = HashMap::new();

        for (idx, spec) in programs.iter().enumerate() {
            let mut attach_order: Vec<&str> = Vec::with_capacity(spec.stages.len());

            for stage in &spec.stages {
                let stage = stage.as_str();
                if attach_order.contains(&stage) {
                    log::warn!("program `{}` lists shader `{}` more than once", spec.name, stage);
                    continue;
                }
                attach_order.push(stage);

                if !live.contains_key(stage) {
                    let compiled = self.compile(by_name[stage]);
                    if let Some(diagnostic) = compiled.diagnostic() {
                        registry.record(diagnostic);
                    }
                    live.insert(stage, compiled);
                }
            }

            let program = {
                let stages: Vec<&CompiledStage<D>> =
                    attach_order.iter().map(|name| &live[*name]).collect();
                self.link_stages(spec.name.clone(), &stages)
            };

            if let Some(diagnostic) = program.diagnostic() {
                registry.record(diagnostic);
            }
            registry.insert(program)?;

            live.retain(|name, _| last_use[*name] > idx);
        }

        log::info!(
            "built {} program(s) with {} diagnostic(s)",
            registry.len(),
            registry.diagnostics().len()
        );

        Ok(registry)
    }

    fn link_stages(&self, name: String, stages: &[&CompiledStage<D>]) -> LinkedProgram<D> {
        let handle = self.driver.create_program();

        for stage in stages {
            self.driver.attach_stage(handle, stage.handle());
        }

        self.driver.link_program(handle);
        let success = self.driver.link_status(handle);

        let message = if success {
            log::debug!("linked program `{}` ({}) from {} stage(s)", name, handle, stages.len());
            None
        } else {
            // Compiler output first; it says why the link failed and must survive truncation.
            let mut combined = String::new();
            for stage in stages.iter().filter(|stage| !stage.is_compiled()) {
                combined.push_str(&format!(
                    "{} shader `{}`: {}\n",
                    stage.kind(),
                    stage.name(),
                    stage.log().unwrap_or_default()
                ));
            }
            combined.push_str(&self.driver.program_info_log(handle, MAX_INFO_LOG_LEN));

            let message = or_placeholder(truncate_log(combined, MAX_INFO_LOG_LEN));
            log::warn!("program `{}` failed to link: {}", name, message);
            Some(message)
        };

        // Stages are never needed by a program once the link call has returned.
        for stage in stages {
            self.driver.detach_stage(handle, stage.handle());
        }

        LinkedProgram {
            name,
            handle,
            success,
            log: message,
            driver: self.driver.clone(),
        }
    }
}

fn or_placeholder(log: String) -> String {
    if log.is_empty() {
        "driver reported a failure but gave no log".to_string()
    } else {
        log
    }
}

fn index_sources(sources: &[ShaderSource]) -> Result<HashMap<&str, &ShaderSource>, ShaderError> {
    let mut by_name = HashMap::with_capacity(sources.len());

    for source in sources {
        if by_name.insert(source.name(), source).is_some() {
            return Err(ShaderError::DuplicateStage(source.name().to_string()));
        }
    }

    Ok(by_name)
}

/// Checks the program requests and works out, for each referenced source, the index of the last
/// program that needs it.
fn plan_stage_lifetimes<'a>(
    sources: &HashMap<&str, &ShaderSource>,
    programs: &'a [ProgramSpec],
) -> Result<HashMap<&'a str, usize>, ShaderError> {
    let mut seen = HashSet::with_capacity(programs.len());
    let mut last_use = HashMap::new();

    for (idx, spec) in programs.iter().enumerate() {
        if !seen.insert(spec.name.as_str()) {
            return Err(ShaderError::DuplicateName(spec.name.clone()));
        }

        for stage in &spec.stages {
            if !sources.contains_key(stage.as_str()) {
                return Err(ShaderError::UnknownStage {
                    program: spec.name.clone(),
                    stage: stage.clone(),
                });
            }
            last_use.insert(stage.as_str(), idx);
        }
    }

    Ok(last_use)
}
