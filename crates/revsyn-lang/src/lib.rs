//! Revsyn Program Representation
//!
//! Typed representation of SyReC programs as produced by an external parser,
//! together with the static checks that must pass before synthesis.
//!
//! # Overview
//!
//! A [`Program`] is an ordered list of [`Module`]s. Each module declares
//! parameters and locals ([`Variable`]) and a list of [`Statement`]s built
//! from [`Expression`]s. The tree is plain data: it serializes to JSON with
//! `serde` and renders back to SyReC source through `Display`.
//!
//! # Example
//!
//! ```rust
//! use revsyn_lang::{AssignOp, Expression, Module, Program, Statement, Variable, VariableAccess, VariableRole};
//!
//! let program = Program::new().with_module(
//!     Module::new("main")
//!         .with_parameter(Variable::new("a", VariableRole::In, 4))
//!         .with_parameter(Variable::new("c", VariableRole::Out, 4))
//!         .with_statement(Statement::assign(VariableAccess::new("c"), AssignOp::Xor, Expression::var("a"))),
//! );
//!
//! revsyn_lang::check_program(&program).unwrap();
//! assert_eq!(program.to_string(), "module main(in a(4), out c(4))\n  c ^= a\n");
//! ```
//!
//! # Static Checks
//!
//! | Check | Error kind |
//! |-------|------------|
//! | Duplicate module or variable | `DuplicateDeclaration` |
//! | Zero bit-width or dimension | `InvalidDeclaration` |
//! | Call to an unknown module | `UndeclaredIdentifier` |
//! | Recursive call chain | `CallGraphCycle` |

pub mod analysis;
pub mod ast;
pub mod display;
pub mod error;
pub mod eval;

pub use analysis::{CallGraph, check_program, referenced_variables, walk_statements};
pub use ast::{
    AssignOp, BinaryOp, BitRange, Expression, ForLoop, IfStatement, Module, Program, Statement,
    StatementKind, UnaryOp, UnaryStatementOp, Variable, VariableAccess, VariableRole,
};
pub use error::{SemanticError, SemanticErrorKind, SemanticResult, StatementRef};
pub use eval::{ConstEnv, ConstEvalError, EmptyEnv};
