//! Revsyn Synthesis Engine
//!
//! This crate compiles SyReC programs into reversible circuits made of
//! Toffoli, Fredkin and Peres gates.
//!
//! # Overview
//!
//! Synthesis walks the entry module statement by statement. Expressions are
//! lowered onto lines with the reversible routines in [`arith`], conditionals
//! add control lines to every emitted gate, loops are unrolled and calls are
//! synthesized into detached gate blocks that are replayed forwards (`call`)
//! or inverted (`uncall`).
//!
//! ```text
//! Program ──► check_program ──► Synthesizer ──► Circuit
//!                                  │
//!                                  ├── Allocator (scratch lines, LIFO)
//!                                  ├── Emitter   (active controls, blocks)
//!                                  └── arith     (adders, comparators, ...)
//! ```
//!
//! # Example
//!
//! ```rust
//! use revsyn_lang::{AssignOp, Expression, Module, Program, Statement, Variable, VariableAccess, VariableRole};
//! use revsyn_synth::synthesize_line_aware;
//!
//! let program = Program::new().with_module(
//!     Module::new("main")
//!         .with_parameter(Variable::new("a", VariableRole::In, 4))
//!         .with_parameter(Variable::new("c", VariableRole::Out, 4))
//!         .with_statement(Statement::assign(VariableAccess::new("c"), AssignOp::Xor, Expression::var("a"))),
//! );
//!
//! let circuit = synthesize_line_aware(&program).unwrap();
//! assert_eq!(circuit.num_lines(), 8);
//! assert_eq!(circuit.num_gates(), 4);
//! assert_eq!(circuit.quantum_cost(), 4);
//! ```
//!
//! # Synthesis Modes
//!
//! | Mode | Temporaries | Trade-off |
//! |------|-------------|-----------|
//! | [`SynthesisMode::LineAware`] | Uncomputed, scratch lines reused | Fewer lines, more gates |
//! | [`SynthesisMode::CostAware`] | Kept as garbage lines | Fewer gates, more lines |

pub mod allocator;
pub mod arith;
pub mod emitter;
pub mod error;
pub mod settings;

mod expression;
mod scope;
mod statement;
mod synthesizer;

pub use allocator::Allocator;
pub use emitter::{Direction, Emitter};
pub use error::{SynthesisError, SynthesisResult};
pub use settings::{SynthesisMode, SynthesisSettings};
pub use synthesizer::{
    synthesize, synthesize_cost_aware, synthesize_line_aware, synthesize_with_settings,
};
