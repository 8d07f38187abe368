//! Semantic errors reported against the program representation.

use std::fmt;
use thiserror::Error;

use crate::ast::Statement;

/// Category of a semantic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SemanticErrorKind {
    /// Variable, loop variable or module not declared.
    UndeclaredIdentifier,
    /// Name declared twice in the same scope.
    DuplicateDeclaration,
    /// Declaration with a zero bit-width or dimension.
    InvalidDeclaration,
    /// Operand or argument widths disagree.
    BitWidthMismatch,
    /// Array index or bit position outside the declared shape.
    IndexOutOfRange,
    /// Wrong number of array indices.
    DimensionMismatch,
    /// Loop bound or step is not a compile-time constant.
    NonConstantLoopBound,
    /// Index, bit range or shift amount is not a compile-time constant.
    NonConstantExpression,
    /// Loop step direction disagrees with the bound ordering, or is zero.
    InconsistentLoopStep,
    /// The module call graph contains a cycle.
    CallGraphCycle,
    /// Call argument count differs from the parameter count.
    ArityMismatch,
    /// The same lines are read and written, or passed twice.
    OverlappingAccess,
    /// Constant division or modulo by zero.
    DivisionByZero,
    /// Constant arithmetic overflowed.
    ConstantOverflow,
    /// The program has no module to start from.
    MissingEntryModule,
}

impl SemanticErrorKind {
    /// Human readable description.
    pub fn description(self) -> &'static str {
        match self {
            SemanticErrorKind::UndeclaredIdentifier => "undeclared identifier",
            SemanticErrorKind::DuplicateDeclaration => "duplicate declaration",
            SemanticErrorKind::InvalidDeclaration => "invalid declaration",
            SemanticErrorKind::BitWidthMismatch => "bit-width mismatch",
            SemanticErrorKind::IndexOutOfRange => "index out of range",
            SemanticErrorKind::DimensionMismatch => "dimension mismatch",
            SemanticErrorKind::NonConstantLoopBound => "non-constant loop bound",
            SemanticErrorKind::NonConstantExpression => "non-constant expression",
            SemanticErrorKind::InconsistentLoopStep => "inconsistent loop step",
            SemanticErrorKind::CallGraphCycle => "call graph cycle",
            SemanticErrorKind::ArityMismatch => "arity mismatch",
            SemanticErrorKind::OverlappingAccess => "overlapping access",
            SemanticErrorKind::DivisionByZero => "division by zero",
            SemanticErrorKind::ConstantOverflow => "constant overflow",
            SemanticErrorKind::MissingEntryModule => "missing entry module",
        }
    }
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The statement an error is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementRef {
    /// Module containing the statement.
    pub module: String,
    /// Source line, if known.
    pub line: Option<u32>,
    /// Rendered statement header.
    pub statement: String,
}

impl StatementRef {
    /// Reference `statement` inside `module`.
    pub fn of(module: &str, statement: &Statement) -> Self {
        Self {
            module: module.to_string(),
            line: statement.line,
            statement: statement.header(),
        }
    }
}

impl fmt::Display for StatementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in module '{}'", self.module)?;
        if let Some(line) = self.line {
            write!(f, ", line {line}")?;
        }
        write!(f, ": `{}`", self.statement)
    }
}

/// A structured semantic error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}{}", format_statement_context(.statement))]
pub struct SemanticError {
    /// Error category.
    pub kind: SemanticErrorKind,
    /// Details.
    pub message: String,
    /// Offending statement, if the error arose inside one.
    pub statement: Option<StatementRef>,
}

impl SemanticError {
    /// Create an error not yet attributed to a statement.
    pub fn new(kind: SemanticErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            statement: None,
        }
    }

    /// Attribute the error to a statement unless an inner statement already claimed it.
    #[must_use]
    pub fn or_at(mut self, statement: impl FnOnce() -> StatementRef) -> Self {
        if self.statement.is_none() {
            self.statement = Some(statement());
        }
        self
    }

    /// Shorthand for an undeclared identifier.
    pub fn undeclared(what: &str, name: &str) -> Self {
        Self::new(
            SemanticErrorKind::UndeclaredIdentifier,
            format!("{what} '{name}' is not declared"),
        )
    }
}

#[allow(clippy::ref_option)]
fn format_statement_context(statement: &Option<StatementRef>) -> String {
    match statement {
        Some(s) => format!(" ({s})"),
        None => String::new(),
    }
}

/// Result type for semantic checks.
pub type SemanticResult<T> = Result<T, SemanticError>;
