//! Synthesis entry points.

use revsyn_ir::{Circuit, CircuitBuilder};
use revsyn_lang::{Module, Program, SemanticError, check_program};
use tracing::{debug, info, instrument};

use crate::allocator::Allocator;
use crate::emitter::Emitter;
use crate::error::SynthesisResult;
use crate::scope::{Frame, line_names, line_role};
use crate::settings::{SynthesisMode, SynthesisSettings};

/// State of one synthesis run.
pub(crate) struct Synthesizer<'p> {
    pub(crate) program: &'p Program,
    pub(crate) builder: CircuitBuilder,
    pub(crate) allocator: Allocator,
    pub(crate) emitter: Emitter,
    pub(crate) frame: Frame<'p>,
}

impl<'p> Synthesizer<'p> {
    fn new(program: &'p Program, entry: &'p Module, mode: SynthesisMode) -> Self {
        Self {
            program,
            builder: CircuitBuilder::new(entry.name.clone()),
            allocator: Allocator::new(),
            emitter: Emitter::new(),
            frame: Frame::new(entry, mode),
        }
    }

    /// Give every declaration of the entry module its lines and register.
    fn declare_entry(&mut self, entry: &'p Module) -> SynthesisResult<()> {
        for variable in entry.declarations() {
            let role = line_role(variable.role);
            let lines = line_names(&variable.name, variable)
                .into_iter()
                .map(|name| self.builder.add_line(role, name))
                .collect::<Result<Vec<_>, _>>()?;
            self.builder
                .name_register(variable.name.clone(), role, lines.clone())?;
            self.frame.bind(variable, lines);
        }
        Ok(())
    }

    fn run(mut self, entry: &'p Module) -> SynthesisResult<Circuit> {
        self.declare_entry(entry)?;
        self.statements(&entry.statements)?;
        self.allocator.finish()?;

        let ancillae = self.allocator.num_created();
        self.builder.extend(self.emitter.into_gates())?;
        info!(
            lines = self.builder.num_lines(),
            gates = self.builder.num_gates(),
            ancillae,
            "synthesis finished"
        );
        Ok(self.builder.finish())
    }
}

/// Synthesize `program` into a reversible circuit.
///
/// `entry` overrides the program's entry module. The program is checked
/// first; on any error no circuit is produced.
#[instrument(skip(program))]
pub fn synthesize(
    mode: SynthesisMode,
    program: &Program,
    entry: Option<&str>,
) -> SynthesisResult<Circuit> {
    let graph = check_program(program)?;
    debug!(modules = graph.num_modules(), "program checked");

    let entry = match entry {
        Some(name) => program
            .module(name)
            .ok_or_else(|| SemanticError::undeclared("entry module", name))?,
        None => program.entry_module()?,
    };
    info!(entry = %entry.name, %mode, "synthesizing");
    Synthesizer::new(program, entry, mode).run(entry)
}

/// Synthesize with temporaries uncomputed and scratch lines reused.
pub fn synthesize_line_aware(program: &Program) -> SynthesisResult<Circuit> {
    synthesize(SynthesisMode::LineAware, program, None)
}

/// Synthesize with temporaries kept as garbage lines.
pub fn synthesize_cost_aware(program: &Program) -> SynthesisResult<Circuit> {
    synthesize(SynthesisMode::CostAware, program, None)
}

/// Synthesize with the given settings.
pub fn synthesize_with_settings(
    program: &Program,
    settings: &SynthesisSettings,
) -> SynthesisResult<Circuit> {
    synthesize(settings.mode, program, settings.entry.as_deref())
}
