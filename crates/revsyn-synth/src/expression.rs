//! Lowering of expressions onto lines.
//!
//! [`Synthesizer::lower`] returns the lines holding an expression's value.
//! Operands are computed in place where that is allowed (scratch lines, or
//! borrowed variables in line-aware mode) and copied otherwise. The caller
//! brackets every lowering with a [`Checkpoint`] and either uncomputes the
//! recorded gates or retains the scratch lines afterwards.

use revsyn_ir::LineId;
use revsyn_lang::{BinaryOp, Expression, SemanticError, SemanticErrorKind, UnaryOp};
use rustc_hash::FxHashSet;

use crate::arith;
use crate::emitter::Emitter;
use crate::error::SynthesisResult;
use crate::settings::SynthesisMode;
use crate::synthesizer::Synthesizer;

/// Lines holding an intermediate value.
#[derive(Debug, Clone)]
pub(crate) struct Value {
    pub lines: Vec<LineId>,
    /// The lines are scratch owned by the current statement.
    pub owned: bool,
}

impl Value {
    fn owned(lines: Vec<LineId>) -> Self {
        Self { lines, owned: true }
    }

    fn borrowed(lines: Vec<LineId>) -> Self {
        Self {
            lines,
            owned: false,
        }
    }

    fn overlaps(&self, other: &Value) -> bool {
        self.lines.iter().any(|l| other.lines.contains(l))
    }
}

/// Gate and allocator positions to return to after a computation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    gates: usize,
    depth: usize,
}

/// Bit `i` of a folded constant.
pub(crate) fn constant_bit(value: u64, i: usize) -> bool {
    i < 64 && (value >> i) & 1 == 1
}

fn width_mismatch(message: String) -> SemanticError {
    SemanticError::new(SemanticErrorKind::BitWidthMismatch, message)
}

/// `dest ^= a op b` for operators producing one bit.
fn apply_bit_op(e: &mut Emitter, op: BinaryOp, dest: LineId, a: &[LineId], b: &[LineId]) {
    match op {
        BinaryOp::LessThan => arith::less_than(e, dest, a, b),
        BinaryOp::GreaterThan => arith::greater_than(e, dest, a, b),
        BinaryOp::LessEquals => arith::less_equals(e, dest, a, b),
        BinaryOp::GreaterEquals => arith::greater_equals(e, dest, a, b),
        BinaryOp::Equals => arith::equals(e, dest, a, b),
        BinaryOp::NotEquals => arith::not_equals(e, dest, a, b),
        BinaryOp::LogicalAnd | BinaryOp::BitwiseAnd => arith::bitwise_and(e, &[dest], a, b),
        _ => arith::bitwise_or(e, &[dest], a, b),
    }
}

fn produces_bit(op: BinaryOp) -> bool {
    op.is_comparison() || op.is_logical()
}

impl<'p> Synthesizer<'p> {
    // =========================================================================
    // Widths
    // =========================================================================

    /// Width an expression has on its own; `None` for constants, which adopt
    /// the width of their context.
    pub(crate) fn natural_width(&self, expr: &Expression) -> SynthesisResult<Option<usize>> {
        if expr.is_constant() {
            return Ok(None);
        }
        let width = match expr {
            Expression::Variable(access) => Some(self.frame.resolve(access)?.len()),
            Expression::Unary {
                op: UnaryOp::BitwiseNot,
                operand,
            } => self.natural_width(operand)?,
            Expression::Unary {
                op: UnaryOp::LogicalNot,
                operand,
            } => {
                self.expect_bit(operand, "!")?;
                Some(1)
            }
            Expression::Binary { op, lhs, rhs } if op.is_logical() => {
                self.expect_bit(lhs, op.symbol())?;
                self.expect_bit(rhs, op.symbol())?;
                Some(1)
            }
            Expression::Binary { op, lhs, rhs } if op.is_comparison() => {
                self.operand_width(*op, lhs, rhs)?;
                Some(1)
            }
            Expression::Binary { op, lhs, rhs } if op.is_shift() => {
                self.frame
                    .constant(rhs, SemanticErrorKind::NonConstantExpression)?;
                self.natural_width(lhs)?
            }
            Expression::Binary { op, lhs, rhs } => self.operand_width(*op, lhs, rhs)?,
            Expression::Literal(_) | Expression::LoopVariable(_) | Expression::BitWidth(_) => None,
        };
        Ok(width)
    }

    fn operand_width(
        &self,
        op: BinaryOp,
        lhs: &Expression,
        rhs: &Expression,
    ) -> SynthesisResult<Option<usize>> {
        match (self.natural_width(lhs)?, self.natural_width(rhs)?) {
            (Some(l), Some(r)) if l != r => Err(width_mismatch(format!(
                "operands of `{}` have widths {l} and {r}",
                op.symbol()
            ))
            .into()),
            (l, r) => Ok(l.or(r)),
        }
    }

    fn expect_bit(&self, expr: &Expression, symbol: &str) -> SynthesisResult<()> {
        match self.natural_width(expr)? {
            None | Some(1) => Ok(()),
            Some(w) => Err(width_mismatch(format!(
                "operand of `{symbol}` must be one bit wide, found width {w}"
            ))
            .into()),
        }
    }

    /// Check that `expr` fits a context of `width` bits.
    pub(crate) fn check_width(
        &self,
        expr: &Expression,
        width: usize,
        context: &str,
    ) -> SynthesisResult<()> {
        match self.natural_width(expr)? {
            Some(w) if w != width => Err(width_mismatch(format!(
                "{context} expects width {width}, but `{expr}` has width {w}"
            ))
            .into()),
            _ => Ok(()),
        }
    }

    /// Whether variable operands of `expr` may be modified in place.
    pub(crate) fn borrow_allowed(&self, expr: &Expression) -> bool {
        if self.frame.mode != SynthesisMode::LineAware {
            return false;
        }
        let mut seen = FxHashSet::default();
        expr.accesses().iter().all(|a| seen.insert(a.name.as_str()))
    }

    // =========================================================================
    // Scratch management
    // =========================================================================

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            gates: self.emitter.mark(),
            depth: self.allocator.depth(),
        }
    }

    /// Undo the computation recorded since `cp` up to gate `computed` and
    /// release its scratch (line-aware), or keep the scratch as garbage
    /// (cost-aware).
    pub(crate) fn cleanup(&mut self, cp: Checkpoint, computed: usize) -> SynthesisResult<()> {
        match self.frame.mode {
            SynthesisMode::LineAware => {
                self.emitter.uncompute(cp.gates, computed);
                self.allocator.release_to(cp.depth)
            }
            SynthesisMode::CostAware => self.allocator.retain_to(cp.depth),
        }
    }

    fn scratch(&mut self, width: usize) -> SynthesisResult<Vec<LineId>> {
        self.allocator.acquire_many(&mut self.builder, width)
    }

    fn copy(&mut self, lines: &[LineId]) -> SynthesisResult<Vec<LineId>> {
        let copy = self.scratch(lines.len())?;
        arith::bitwise_cnot(&mut self.emitter, &copy, lines);
        Ok(copy)
    }

    fn literal(&mut self, value: u64, width: usize) -> SynthesisResult<Value> {
        let lines = self.scratch(width)?;
        for (i, &line) in lines.iter().enumerate() {
            if constant_bit(value, i) {
                self.emitter.not(line);
            }
        }
        Ok(Value::owned(lines))
    }

    /// Lines of `value` that may be overwritten.
    fn mutable(&mut self, value: Value, borrow: bool) -> SynthesisResult<Value> {
        if value.owned || borrow {
            Ok(value)
        } else {
            Ok(Value::owned(self.copy(&value.lines)?))
        }
    }

    // =========================================================================
    // Lowering
    // =========================================================================

    /// Compute `expr` at `width` bits.
    pub(crate) fn lower(
        &mut self,
        expr: &Expression,
        width: usize,
        borrow: bool,
    ) -> SynthesisResult<Value> {
        if expr.is_constant() {
            return self.lower_constant(expr, width);
        }

        match expr {
            Expression::Variable(access) => {
                let lines = self.frame.resolve(access)?;
                if lines.len() != width {
                    return Err(width_mismatch(format!(
                        "`{access}` has width {}, expected {width}",
                        lines.len()
                    ))
                    .into());
                }
                Ok(Value::borrowed(lines))
            }
            Expression::Unary { op, operand } => {
                let width = match op {
                    UnaryOp::BitwiseNot => width,
                    UnaryOp::LogicalNot => 1,
                };
                let value = self.lower(operand, width, borrow)?;
                let value = self.mutable(value, borrow)?;
                arith::bitwise_not(&mut self.emitter, &value.lines);
                Ok(value)
            }
            Expression::Binary { op, lhs, rhs } => self.lower_binary(*op, lhs, rhs, width, borrow),
            Expression::Literal(_) | Expression::LoopVariable(_) | Expression::BitWidth(_) => {
                self.lower_constant(expr, width)
            }
        }
    }

    fn lower_constant(&mut self, expr: &Expression, width: usize) -> SynthesisResult<Value> {
        let value = self.frame.constant_value(expr, width)?;
        self.literal(value, width)
    }

    /// Compute both operands of a bit-producing operator at their common width.
    fn lower_bit_operands(
        &mut self,
        op: BinaryOp,
        lhs: &Expression,
        rhs: &Expression,
        borrow: bool,
    ) -> SynthesisResult<(Value, Value)> {
        let width = if op.is_logical() {
            1
        } else {
            self.operand_width(op, lhs, rhs)?.unwrap_or(1)
        };
        let l = self.lower(lhs, width, borrow)?;
        let r = self.lower(rhs, width, borrow)?;
        // Comparisons modify their first operand temporarily.
        if l.overlaps(&r) {
            let r = Value::owned(self.copy(&r.lines)?);
            return Ok((l, r));
        }
        Ok((l, r))
    }

    fn lower_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expression,
        rhs: &Expression,
        width: usize,
        borrow: bool,
    ) -> SynthesisResult<Value> {
        if produces_bit(op) {
            let (l, r) = self.lower_bit_operands(op, lhs, rhs, borrow)?;
            let dest = self.scratch(1)?;
            apply_bit_op(&mut self.emitter, op, dest[0], &l.lines, &r.lines);
            return Ok(Value::owned(dest));
        }

        if op.is_shift() {
            let amount = self
                .frame
                .constant(rhs, SemanticErrorKind::NonConstantExpression)?;
            let amount = usize::try_from(amount).map_err(|_| {
                SemanticError::new(
                    SemanticErrorKind::IndexOutOfRange,
                    format!("shift amount {amount} is negative"),
                )
            })?;
            let src = self.lower(lhs, width, borrow)?;
            let dest = self.scratch(width)?;
            if op == BinaryOp::ShiftLeft {
                arith::shift_left(&mut self.emitter, &dest, &src.lines, amount);
            } else {
                arith::shift_right(&mut self.emitter, &dest, &src.lines, amount);
            }
            return Ok(Value::owned(dest));
        }

        let l = self.lower(lhs, width, borrow)?;
        let mut r = self.lower(rhs, width, borrow)?;
        if l.overlaps(&r) {
            r = Value::owned(self.copy(&r.lines)?);
        }

        match op {
            BinaryOp::Add | BinaryOp::BitwiseXor => {
                let (dest, src) = if !l.owned && r.owned {
                    (r, l)
                } else {
                    (self.mutable(l, borrow)?, r)
                };
                if op == BinaryOp::Add {
                    arith::increase(&mut self.emitter, &dest.lines, &src.lines);
                } else {
                    arith::bitwise_cnot(&mut self.emitter, &dest.lines, &src.lines);
                }
                Ok(dest)
            }
            BinaryOp::Subtract => {
                if r.owned && !l.owned && !borrow {
                    arith::subtract_from(&mut self.emitter, &r.lines, &l.lines);
                    return Ok(r);
                }
                let dest = self.mutable(l, borrow)?;
                arith::decrease(&mut self.emitter, &dest.lines, &r.lines);
                Ok(dest)
            }
            BinaryOp::Multiply => {
                let dest = self.scratch(width)?;
                arith::multiplication(&mut self.emitter, &dest, &l.lines, &r.lines);
                Ok(Value::owned(dest))
            }
            BinaryOp::Divide => {
                let quotient = self.scratch(width)?;
                arith::division(&mut self.emitter, &quotient, &l.lines, &r.lines);
                Ok(Value::owned(quotient))
            }
            BinaryOp::Modulo => {
                let remainder = self.mutable(l, borrow)?;
                let quotient = self.scratch(width)?;
                arith::modulo(&mut self.emitter, &quotient, &remainder.lines, &r.lines);
                Ok(remainder)
            }
            BinaryOp::BitwiseAnd => {
                let dest = self.scratch(width)?;
                arith::bitwise_and(&mut self.emitter, &dest, &l.lines, &r.lines);
                Ok(Value::owned(dest))
            }
            BinaryOp::BitwiseOr => {
                let dest = self.scratch(width)?;
                arith::bitwise_or(&mut self.emitter, &dest, &l.lines, &r.lines);
                Ok(Value::owned(dest))
            }
            _ => unreachable!("bit-producing and shift operators are handled above"),
        }
    }

    /// `target ^= cond` for a one-bit condition, leaving every operand as it
    /// was (line-aware) or its scratch as garbage (cost-aware).
    pub(crate) fn xor_condition(&mut self, cond: &Expression, target: LineId) -> SynthesisResult<()> {
        let cp = self.checkpoint();
        let borrow = self.borrow_allowed(cond);
        match cond {
            Expression::Binary { op, lhs, rhs } if produces_bit(*op) && !cond.is_constant() => {
                let (l, r) = self.lower_bit_operands(*op, lhs, rhs, borrow)?;
                let computed = self.emitter.mark();
                apply_bit_op(&mut self.emitter, *op, target, &l.lines, &r.lines);
                self.cleanup(cp, computed)
            }
            _ => {
                let value = self.lower(cond, 1, borrow)?;
                let computed = self.emitter.mark();
                self.emitter.cnot(value.lines[0], target);
                self.cleanup(cp, computed)
            }
        }
    }
}
