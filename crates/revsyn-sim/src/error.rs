//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced by circuit simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The input assignment does not cover every line exactly once.
    #[error("Input has {got} bits but the circuit has {expected} lines")]
    WidthMismatch {
        /// Number of circuit lines.
        expected: usize,
        /// Number of input bits supplied.
        got: usize,
    },

    /// No register with the given name.
    #[error("Circuit has no register named '{0}'")]
    UnknownRegister(String),

    /// A value does not fit in its register.
    #[error("Value {value} does not fit in register '{register}' of width {width}")]
    ValueTooWide {
        /// Register name.
        register: String,
        /// Register width.
        width: usize,
        /// Offending value.
        value: u64,
    },

    /// Truth-table enumeration over too many free inputs.
    #[error("Circuit has {got} free inputs, truth tables are limited to {limit}")]
    TooManyInputs {
        /// Number of non-constant input lines.
        got: usize,
        /// Enumeration limit.
        limit: usize,
    },
}

/// Result type for simulation.
pub type SimResult<T> = Result<T, SimError>;
