//! Error types for the synth crate.

use revsyn_ir::IrError;
use revsyn_lang::{SemanticError, SemanticErrorKind, StatementRef};
use thiserror::Error;

/// Errors produced by synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SynthesisError {
    /// The program violates a language rule.
    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),

    /// A generated gate was rejected by the circuit builder.
    #[error("Circuit IR error: {0}")]
    Circuit(#[from] IrError),

    /// Scratch lines were released out of order or leaked.
    #[error("Allocator invariant violated: {0}")]
    AllocatorInvariant(String),
}

impl SynthesisError {
    /// Semantic error category, if this is a semantic error.
    pub fn kind(&self) -> Option<SemanticErrorKind> {
        match self {
            SynthesisError::Semantic(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Statement a semantic error is attributed to.
    pub fn statement(&self) -> Option<&StatementRef> {
        match self {
            SynthesisError::Semantic(e) => e.statement.as_ref(),
            _ => None,
        }
    }

    /// Attribute a semantic error to `statement` unless already attributed.
    #[must_use]
    pub(crate) fn or_at(self, statement: impl FnOnce() -> StatementRef) -> Self {
        match self {
            SynthesisError::Semantic(e) => SynthesisError::Semantic(e.or_at(statement)),
            other => other,
        }
    }
}

/// Result type for synthesis operations.
pub type SynthesisResult<T> = Result<T, SynthesisError>;
