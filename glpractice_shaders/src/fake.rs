//! An in-memory stand-in for a GL context, used by the tests.
//!
//! It "compiles" by checking a handful of surface features of GLSL and "links" by checking which
//! stage kinds are attached. Every misuse of a handle (double delete, attaching a deleted stage,
//! using a program that never linked, ...) is recorded in `misuse` instead of panicking, so tests
//! can assert the builder never does any of it.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::driver::{ProgramHandle, ShaderDriver, StageHandle};
use crate::source::StageKind;

#[derive(Debug)]
struct Stage {
    kind: StageKind,
    compiled: bool,
    log: String,
    deleted: bool,
}

#[derive(Debug, Default)]
struct Program {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    deleted: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    stages: HashMap<u32, Stage>,
    programs: HashMap<u32, Program>,
    compiles: Vec<u32>,
    attachments: Vec<(u32, u32)>,
    current: Option<u32>,
    misuse: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FakeDriver {
    state: RefCell<State>,
    verbose_logs: bool,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver whose error logs run to several kilobytes.
    pub fn verbose() -> Self {
        Self {
            verbose_logs: true,
            ..Self::default()
        }
    }

    pub fn live_stages(&self) -> usize {
        self.state.borrow().stages.values().filter(|s| !s.deleted).count()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.values().filter(|p| !p.deleted).count()
    }

    pub fn compile_count(&self) -> usize {
        self.state.borrow().compiles.len()
    }

    /// `(program, stage)` pairs in the order they were attached.
    pub fn attachments(&self) -> Vec<(ProgramHandle, StageHandle)> {
        self.state
            .borrow()
            .attachments
            .iter()
            .map(|&(p, s)| (ProgramHandle(p), StageHandle(s)))
            .collect()
    }

    pub fn attached_to(&self, program: ProgramHandle) -> usize {
        self.state.borrow().programs.get(&program.0).map_or(0, |p| p.attached.len())
    }

    pub fn current_program(&self) -> Option<ProgramHandle> {
        self.state.borrow().current.map(ProgramHandle)
    }

    pub fn misuse(&self) -> Vec<String> {
        self.state.borrow().misuse.clone()
    }

    fn pad(&self, log: String) -> String {
        if !self.verbose_logs {
            return log;
        }

        let mut padded = String::with_capacity(4096);
        while padded.len() < 4000 {
            padded.push_str(&log);
            padded.push('\n');
        }
        padded
    }
}

fn fake_compile(source: &str) -> Result<(), String> {
    let first_line = source.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    if !first_line.trim_start().starts_with("#version") {
        return Err("ERROR: 0:1: '' :  #version required and missing.".to_string());
    }

    let mut depth = 0i32;
    for (n, line) in source.lines().enumerate() {
        for c in line.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(format!(
                    "ERROR: 0:{}: '}}' : syntax error, unexpected RIGHT_BRACE",
                    n + 1
                ));
            }
        }
    }
    if depth != 0 {
        return Err("ERROR: 0:1: '' : syntax error, unexpected end of file".to_string());
    }

    if !source.contains("void main(") {
        return Err("ERROR: 0:1: 'main' : function not defined".to_string());
    }

    Ok(())
}

impl ShaderDriver for FakeDriver {
    fn create_stage(&self, kind: StageKind) -> StageHandle {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.next_id += 1;
        let id = state.next_id;
        state.stages.insert(id, Stage {
            kind,
            compiled: false,
            log: String::new(),
            deleted: false,
        });
        StageHandle(id)
    }

    fn compile_stage(&self, stage: StageHandle, source: &str) {
        let result = fake_compile(source);
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.compiles.push(stage.0);

        match state.stages.get_mut(&stage.0) {
            Some(s) if !s.deleted => match result {
                Ok(()) => {
                    s.compiled = true;
                    s.log.clear();
                }
                Err(log) => {
                    s.compiled = false;
                    s.log = self.pad(log);
                }
            },
            _ => state.misuse.push(format!("compile of dead {}", stage)),
        }
    }

    fn compile_status(&self, stage: StageHandle) -> bool {
        self.state.borrow().stages.get(&stage.0).map_or(false, |s| s.compiled)
    }

    fn stage_info_log(&self, stage: StageHandle, max_len: usize) -> String {
        let state = self.state.borrow();
        let log = state.stages.get(&stage.0).map(|s| s.log.as_str()).unwrap_or("");
        // A real driver fills a fixed buffer, including the terminating NUL.
        log.chars().take(max_len.saturating_sub(1)).collect()
    }

    fn delete_stage(&self, stage: StageHandle) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        match state.stages.get_mut(&stage.0) {
            Some(s) if !s.deleted => s.deleted = true,
            _ => state.misuse.push(format!("delete of dead {}", stage)),
        }
    }

    fn create_program(&self) -> ProgramHandle {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.next_id += 1;
        let id = state.next_id;
        state.programs.insert(id, Program::default());
        ProgramHandle(id)
    }

    fn attach_stage(&self, program: ProgramHandle, stage: StageHandle) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let stage_alive = state.stages.get(&stage.0).map_or(false, |s| !s.deleted);
        if !stage_alive {
            state.misuse.push(format!("attach of dead {} to {}", stage, program));
            return;
        }

        state.attachments.push((program.0, stage.0));
        match state.programs.get_mut(&program.0) {
            Some(p) if !p.deleted => p.attached.push(stage.0),
            _ => state.misuse.push(format!("attach to dead {}", program)),
        }
    }

    fn detach_stage(&self, program: ProgramHandle, stage: StageHandle) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let detached = match state.programs.get_mut(&program.0) {
            Some(p) => match p.attached.iter().position(|&s| s == stage.0) {
                Some(idx) => {
                    p.attached.remove(idx);
                    true
                }
                None => false,
            },
            None => false,
        };
        if !detached {
            state.misuse.push(format!("detach of {} not attached to {}", stage, program));
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let attached = match state.programs.get(&program.0) {
            Some(p) if !p.deleted => p.attached.clone(),
            _ => {
                state.misuse.push(format!("link of dead {}", program));
                return;
            }
        };

        let mut kinds = Vec::new();
        let mut outcome = Ok(());
        for id in &attached {
            let stage = &state.stages[id];
            if !stage.compiled {
                outcome = Err(format!(
                    "error: linking with uncompiled/unspecialized shader stage#{}",
                    id
                ));
                break;
            }
            kinds.push(stage.kind);
        }

        if outcome.is_ok() {
            let has = |kind| kinds.contains(&kind);
            outcome = if kinds.is_empty() {
                Err("error: no shaders attached to the program".to_string())
            } else if has(StageKind::Compute) {
                if kinds.iter().all(|&k| k == StageKind::Compute) {
                    Ok(())
                } else {
                    Err("error: compute shader attached alongside graphics stages".to_string())
                }
            } else if !has(StageKind::Vertex) {
                Err("error: program lacks a vertex shader".to_string())
            } else if !has(StageKind::Fragment) {
                Err("error: program lacks a fragment shader".to_string())
            } else {
                Ok(())
            };
        }

        let log = outcome.err().map(|log| self.pad(log)).unwrap_or_default();
        if let Some(p) = state.programs.get_mut(&program.0) {
            p.linked = log.is_empty();
            p.log = log;
        }
    }

    fn link_status(&self, program: ProgramHandle) -> bool {
        self.state.borrow().programs.get(&program.0).map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: ProgramHandle, max_len: usize) -> String {
        let state = self.state.borrow();
        let log = state.programs.get(&program.0).map(|p| p.log.as_str()).unwrap_or("");
        log.chars().take(max_len.saturating_sub(1)).collect()
    }

    fn use_program(&self, program: ProgramHandle) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let usable = state.programs.get(&program.0).map_or(false, |p| p.linked && !p.deleted);
        if usable {
            state.current = Some(program.0);
        } else {
            state.misuse.push(format!("use of unusable {}", program));
        }
    }

    fn delete_program(&self, program: ProgramHandle) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        match state.programs.get_mut(&program.0) {
            Some(p) if !p.deleted => p.deleted = true,
            _ => state.misuse.push(format!("delete of dead {}", program)),
        }
        if state.current == Some(program.0) {
            state.current = None;
        }
    }
}
