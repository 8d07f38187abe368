//! Compile-time evaluation of constant expressions.
//!
//! Loop bounds, array indices, bit ranges and shift amounts must reduce to
//! integers before synthesis. Evaluation uses checked `i64` arithmetic so
//! that negative loop steps are representable.
//!
//! Constant expressions used as values fold with [`Expression::evaluate_unsigned`]
//! instead, which computes what the synthesized lines would hold: unsigned
//! arithmetic with every intermediate truncated to the value's width.

use thiserror::Error;

use crate::ast::{BinaryOp, Expression, UnaryOp};
use crate::error::{SemanticError, SemanticErrorKind};

/// Bindings visible to constant evaluation.
pub trait ConstEnv {
    /// Current value of a loop variable.
    fn loop_value(&self, name: &str) -> Option<i64>;
    /// Declared bit-width of a variable.
    fn bit_width(&self, name: &str) -> Option<usize>;
}

/// An environment with no bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEnv;

impl ConstEnv for EmptyEnv {
    fn loop_value(&self, _name: &str) -> Option<i64> {
        None
    }

    fn bit_width(&self, _name: &str) -> Option<usize> {
        None
    }
}

/// Why an expression could not be reduced to a constant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstEvalError {
    #[error("expression '{0}' is not a compile-time constant")]
    NotConstant(String),

    #[error("loop variable '${0}' is not bound")]
    UnboundLoopVariable(String),

    #[error("variable '{0}' is not declared")]
    UnknownVariable(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("shift amount {0} is negative")]
    NegativeShift(i64),
}

impl ConstEvalError {
    /// Convert into a semantic error, using `kind` for non-constant operands.
    pub fn into_semantic(self, kind: SemanticErrorKind) -> SemanticError {
        let message = self.to_string();
        match self {
            ConstEvalError::NotConstant(_) => SemanticError::new(kind, message),
            ConstEvalError::UnboundLoopVariable(_) | ConstEvalError::UnknownVariable(_) => {
                SemanticError::new(SemanticErrorKind::UndeclaredIdentifier, message)
            }
            ConstEvalError::DivisionByZero => {
                SemanticError::new(SemanticErrorKind::DivisionByZero, message)
            }
            ConstEvalError::Overflow => {
                SemanticError::new(SemanticErrorKind::ConstantOverflow, message)
            }
            ConstEvalError::NegativeShift(_) => {
                SemanticError::new(SemanticErrorKind::IndexOutOfRange, message)
            }
        }
    }
}

fn checked(value: Option<i64>) -> Result<i64, ConstEvalError> {
    value.ok_or(ConstEvalError::Overflow)
}

/// All-ones mask of `width` bits.
fn width_mask(width: usize) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

impl Expression {
    /// Whether the expression references no variable lines.
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Literal(_) | Expression::LoopVariable(_) | Expression::BitWidth(_) => true,
            Expression::Variable(_) => false,
            Expression::Unary { operand, .. } => operand.is_constant(),
            Expression::Binary { lhs, rhs, .. } => lhs.is_constant() && rhs.is_constant(),
        }
    }

    /// Reduce the expression to an integer.
    ///
    /// A non-constant expression reports its first variable operand.
    pub fn evaluate_const(&self, env: &impl ConstEnv) -> Result<i64, ConstEvalError> {
        match self {
            Expression::Literal(value) => {
                i64::try_from(*value).map_err(|_| ConstEvalError::Overflow)
            }
            Expression::LoopVariable(name) => env
                .loop_value(name)
                .ok_or_else(|| ConstEvalError::UnboundLoopVariable(name.clone())),
            Expression::BitWidth(name) => env
                .bit_width(name)
                .ok_or_else(|| ConstEvalError::UnknownVariable(name.clone()))
                .and_then(|w| i64::try_from(w).map_err(|_| ConstEvalError::Overflow)),
            Expression::Variable(_) => Err(ConstEvalError::NotConstant(self.to_string())),
            Expression::Unary { op, operand } => {
                let value = operand.evaluate_const(env)?;
                Ok(match op {
                    UnaryOp::BitwiseNot => !value,
                    UnaryOp::LogicalNot => i64::from(value == 0),
                })
            }
            Expression::Binary { op, lhs, rhs } => {
                let l = lhs.evaluate_const(env)?;
                let r = rhs.evaluate_const(env)?;
                apply_binary(*op, l, r)
            }
        }
    }

    /// Fold the expression to an unsigned `width`-bit value.
    ///
    /// Every intermediate is truncated to `width` bits. Operands of
    /// comparisons fold at `operand_width` bits and operands of logical
    /// operators at one bit; both produce 0 or 1. Shift amounts are plain
    /// integers and shifting by `width` or more yields 0.
    pub fn evaluate_unsigned(
        &self,
        env: &impl ConstEnv,
        width: usize,
        operand_width: usize,
    ) -> Result<u64, ConstEvalError> {
        let mask = width_mask(width);
        let value = match self {
            Expression::Literal(value) => *value,
            Expression::LoopVariable(_) | Expression::BitWidth(_) => {
                // two's complement, so negative loop values wrap
                self.evaluate_const(env)? as u64
            }
            Expression::Variable(_) => return Err(ConstEvalError::NotConstant(self.to_string())),
            Expression::Unary { op, operand } => match op {
                UnaryOp::BitwiseNot => !operand.evaluate_unsigned(env, width, operand_width)?,
                UnaryOp::LogicalNot => {
                    u64::from(operand.evaluate_unsigned(env, 1, operand_width)? == 0)
                }
            },
            Expression::Binary { op, lhs, rhs } if op.is_comparison() || op.is_logical() => {
                let inner = if op.is_logical() { 1 } else { operand_width };
                let l = lhs.evaluate_unsigned(env, inner, operand_width)?;
                let r = rhs.evaluate_unsigned(env, inner, operand_width)?;
                u64::from(compare(*op, l, r))
            }
            Expression::Binary { op, lhs, rhs } if op.is_shift() => {
                let amount = rhs.evaluate_const(env)?;
                let amount = u32::try_from(amount).map_err(|_| ConstEvalError::NegativeShift(amount))?;
                let l = lhs.evaluate_unsigned(env, width, operand_width)?;
                let shifted = if *op == BinaryOp::ShiftLeft {
                    l.checked_shl(amount)
                } else {
                    l.checked_shr(amount)
                };
                shifted.unwrap_or(0)
            }
            Expression::Binary { op, lhs, rhs } => {
                let l = lhs.evaluate_unsigned(env, width, operand_width)?;
                let r = rhs.evaluate_unsigned(env, width, operand_width)?;
                match op {
                    BinaryOp::Add => l.wrapping_add(r),
                    BinaryOp::Subtract => l.wrapping_sub(r),
                    BinaryOp::Multiply => l.wrapping_mul(r),
                    BinaryOp::Divide | BinaryOp::Modulo if r == 0 => {
                        return Err(ConstEvalError::DivisionByZero);
                    }
                    BinaryOp::Divide => l / r,
                    BinaryOp::Modulo => l % r,
                    BinaryOp::BitwiseAnd => l & r,
                    BinaryOp::BitwiseOr => l | r,
                    _ => l ^ r,
                }
            }
        };
        Ok(value & mask)
    }
}

/// Result of a comparison or logical operator on folded operands.
fn compare(op: BinaryOp, l: u64, r: u64) -> bool {
    match op {
        BinaryOp::LogicalAnd => l != 0 && r != 0,
        BinaryOp::LogicalOr => l != 0 || r != 0,
        BinaryOp::LessThan => l < r,
        BinaryOp::GreaterThan => l > r,
        BinaryOp::LessEquals => l <= r,
        BinaryOp::GreaterEquals => l >= r,
        BinaryOp::Equals => l == r,
        _ => l != r,
    }
}

fn apply_binary(op: BinaryOp, l: i64, r: i64) -> Result<i64, ConstEvalError> {
    let value = match op {
        BinaryOp::Add => checked(l.checked_add(r))?,
        BinaryOp::Subtract => checked(l.checked_sub(r))?,
        BinaryOp::Multiply => checked(l.checked_mul(r))?,
        BinaryOp::Divide | BinaryOp::Modulo if r == 0 => {
            return Err(ConstEvalError::DivisionByZero);
        }
        BinaryOp::Divide => checked(l.checked_div(r))?,
        BinaryOp::Modulo => checked(l.checked_rem(r))?,
        BinaryOp::BitwiseAnd => l & r,
        BinaryOp::BitwiseOr => l | r,
        BinaryOp::BitwiseXor => l ^ r,
        BinaryOp::LogicalAnd => i64::from(l != 0 && r != 0),
        BinaryOp::LogicalOr => i64::from(l != 0 || r != 0),
        BinaryOp::LessThan => i64::from(l < r),
        BinaryOp::GreaterThan => i64::from(l > r),
        BinaryOp::LessEquals => i64::from(l <= r),
        BinaryOp::GreaterEquals => i64::from(l >= r),
        BinaryOp::Equals => i64::from(l == r),
        BinaryOp::NotEquals => i64::from(l != r),
        BinaryOp::ShiftLeft | BinaryOp::ShiftRight => {
            let amount = u32::try_from(r).map_err(|_| ConstEvalError::Overflow)?;
            if op == BinaryOp::ShiftLeft {
                checked(l.checked_shl(amount))?
            } else {
                checked(l.checked_shr(amount))?
            }
        }
    };
    Ok(value)
}
