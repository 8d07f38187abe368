//! Error types for the IR crate.

use crate::line::LineId;
use thiserror::Error;

/// Errors that can occur while building a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A gate references a line that does not exist.
    #[error("Line {line} not found in circuit with {num_lines} lines{}", format_gate_context(.gate_name))]
    LineNotFound {
        /// The line that was not found.
        line: LineId,
        /// Number of lines in the circuit.
        num_lines: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A line is used as both control and target, or twice as target.
    #[error("Line {line} used more than once in a single gate{}", format_gate_context(.gate_name))]
    DuplicateLine {
        /// The duplicate line.
        line: LineId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate has the wrong number of targets for its kind.
    #[error("Gate '{gate_name}' requires {expected} targets, got {got}")]
    TargetCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of targets.
        expected: usize,
        /// Actual number of targets.
        got: usize,
    },

    /// Register name declared twice.
    #[error("Register '{0}' already exists")]
    DuplicateRegister(String),

    /// Line index space exhausted.
    #[error("Circuit cannot hold more than {} lines", u32::MAX)]
    TooManyLines,

    /// A textual export could not be written.
    #[error("Failed to write circuit: {0}")]
    Export(#[from] std::fmt::Error),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
