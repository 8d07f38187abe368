//! Lowering of statements.

use revsyn_ir::LineId;
use revsyn_lang::{
    AssignOp, BinaryOp, Expression, ForLoop, IfStatement, SemanticError, SemanticErrorKind,
    Statement, StatementKind, StatementRef, UnaryStatementOp, VariableAccess, referenced_variables,
};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::arith;
use crate::emitter::Direction;
use crate::error::SynthesisResult;
use crate::expression::constant_bit;
use crate::scope::{Frame, line_names, line_role};
use crate::settings::SynthesisMode;
use crate::synthesizer::Synthesizer;

fn overlapping(message: String) -> SemanticError {
    SemanticError::new(SemanticErrorKind::OverlappingAccess, message)
}

/// Split `dest op= l op2 r` into two assignments that need no scratch.
fn decompose(op: AssignOp, value: &Expression) -> Option<(AssignOp, &Expression, AssignOp, &Expression)> {
    let Expression::Binary { op: inner, lhs, rhs } = value else {
        return None;
    };
    let (first, second) = match (op, inner) {
        (AssignOp::Add, BinaryOp::Add) => (AssignOp::Add, AssignOp::Add),
        (AssignOp::Add, BinaryOp::Subtract) => (AssignOp::Add, AssignOp::Subtract),
        (AssignOp::Subtract, BinaryOp::Add) => (AssignOp::Subtract, AssignOp::Subtract),
        (AssignOp::Subtract, BinaryOp::Subtract) => (AssignOp::Subtract, AssignOp::Add),
        (AssignOp::Xor, BinaryOp::BitwiseXor) => (AssignOp::Xor, AssignOp::Xor),
        _ => return None,
    };
    Some((first, lhs, second, rhs))
}

impl<'p> Synthesizer<'p> {
    pub(crate) fn statements(&mut self, statements: &'p [Statement]) -> SynthesisResult<()> {
        for statement in statements {
            self.statement(statement)?;
        }
        Ok(())
    }

    fn statement(&mut self, statement: &'p Statement) -> SynthesisResult<()> {
        let module = self.frame.module;
        trace!(module = %module.name, line = ?statement.line, "{}", statement.header());
        let result = match &statement.kind {
            StatementKind::Assign { target, op, value } => self.assign(target, *op, value),
            StatementKind::Unary { op, target } => self.unary(*op, target),
            StatementKind::Swap { lhs, rhs } => self.swap(lhs, rhs),
            StatementKind::Skip => Ok(()),
            StatementKind::If(branch) => self.conditional(branch),
            StatementKind::For(lp) => self.for_loop(lp),
            StatementKind::Call { module, arguments } => {
                self.call(module, arguments, Direction::Forward)
            }
            StatementKind::Uncall { module, arguments } => {
                self.call(module, arguments, Direction::Inverse)
            }
        };
        result.map_err(|e| e.or_at(|| StatementRef::of(&module.name, statement)))
    }

    // =========================================================================
    // Assignments
    // =========================================================================

    /// Reject expressions reading any line of `dest`.
    fn check_disjoint(
        &self,
        target: &VariableAccess,
        dest: &[LineId],
        value: &Expression,
    ) -> SynthesisResult<()> {
        for access in value.accesses() {
            let lines = self.frame.resolve(access)?;
            if lines.iter().any(|l| dest.contains(l)) {
                return Err(overlapping(format!(
                    "`{access}` overlaps the assigned lines of `{target}`"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn assign(
        &mut self,
        target: &VariableAccess,
        op: AssignOp,
        value: &Expression,
    ) -> SynthesisResult<()> {
        let dest = self.frame.resolve(target)?;
        let context = format!("assignment to `{target}`");
        self.check_width(value, dest.len(), &context)?;
        self.check_disjoint(target, &dest, value)?;
        self.assign_lines(&dest, op, value)
    }

    fn assign_lines(
        &mut self,
        dest: &[LineId],
        op: AssignOp,
        value: &Expression,
    ) -> SynthesisResult<()> {
        if op == AssignOp::Xor && value.is_constant() {
            let constant = self.frame.constant_value(value, dest.len())?;
            for (i, &line) in dest.iter().enumerate() {
                if constant_bit(constant, i) {
                    self.emitter.not(line);
                }
            }
            return Ok(());
        }

        if self.frame.mode == SynthesisMode::LineAware {
            if let Some((first, lhs, second, rhs)) = decompose(op, value) {
                self.assign_lines(dest, first, lhs)?;
                return self.assign_lines(dest, second, rhs);
            }
        }

        let cp = self.checkpoint();
        let borrow = self.borrow_allowed(value);
        let computed = self.lower(value, dest.len(), borrow)?;
        let end = self.emitter.mark();
        match op {
            AssignOp::Xor => arith::bitwise_cnot(&mut self.emitter, dest, &computed.lines),
            AssignOp::Add => arith::increase(&mut self.emitter, dest, &computed.lines),
            AssignOp::Subtract => arith::decrease(&mut self.emitter, dest, &computed.lines),
        }
        self.cleanup(cp, end)
    }

    fn unary(&mut self, op: UnaryStatementOp, target: &VariableAccess) -> SynthesisResult<()> {
        let lines = self.frame.resolve(target)?;
        match op {
            UnaryStatementOp::Increment => arith::increment(&mut self.emitter, &lines),
            UnaryStatementOp::Decrement => arith::decrement(&mut self.emitter, &lines),
            UnaryStatementOp::Invert => arith::bitwise_not(&mut self.emitter, &lines),
        }
        Ok(())
    }

    fn swap(&mut self, lhs: &VariableAccess, rhs: &VariableAccess) -> SynthesisResult<()> {
        let a = self.frame.resolve(lhs)?;
        let b = self.frame.resolve(rhs)?;
        if a.len() != b.len() {
            return Err(SemanticError::new(
                SemanticErrorKind::BitWidthMismatch,
                format!(
                    "cannot swap `{lhs}` ({} bits) with `{rhs}` ({} bits)",
                    a.len(),
                    b.len()
                ),
            )
            .into());
        }
        if a.iter().any(|l| b.contains(l)) {
            return Err(overlapping(format!("`{lhs}` and `{rhs}` share lines")).into());
        }
        arith::swap(&mut self.emitter, &a, &b);
        Ok(())
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn conditional(&mut self, branch: &'p IfStatement) -> SynthesisResult<()> {
        for condition in [&branch.condition, branch.closing_condition()] {
            self.check_width(condition, 1, "if condition")?;
        }

        if let Some(line) = self.direct_control(branch)? {
            self.emitter.push_control(line);
            let result = self.statements(&branch.then_branch);
            self.emitter.pop_control();
            result?;
            if !branch.else_branch.is_empty() {
                self.emitter.not(line);
                self.emitter.push_control(line);
                let result = self.statements(&branch.else_branch);
                self.emitter.pop_control();
                result?;
                self.emitter.not(line);
            }
            return Ok(());
        }

        let helper = self.allocator.acquire(&mut self.builder)?;
        self.xor_condition(&branch.condition, helper)?;

        self.emitter.push_control(helper);
        let result = self.statements(&branch.then_branch);
        self.emitter.pop_control();
        result?;

        if !branch.else_branch.is_empty() {
            self.emitter.not(helper);
            self.emitter.push_control(helper);
            let result = self.statements(&branch.else_branch);
            self.emitter.pop_control();
            result?;
            self.emitter.not(helper);
        }

        match self.frame.mode {
            SynthesisMode::LineAware => {
                self.xor_condition(branch.closing_condition(), helper)?;
                self.allocator.release(helper)
            }
            SynthesisMode::CostAware => self.allocator.retain(helper),
        }
    }

    /// The condition line itself, when it can control the branches directly.
    fn direct_control(&self, branch: &IfStatement) -> SynthesisResult<Option<LineId>> {
        let Expression::Variable(access) = &branch.condition else {
            return Ok(None);
        };
        let name = access.name.as_str();
        if referenced_variables(&branch.then_branch).contains(name)
            || referenced_variables(&branch.else_branch).contains(name)
        {
            return Ok(None);
        }
        let lines = self.frame.resolve(access)?;
        Ok(lines.first().copied())
    }

    fn for_loop(&mut self, lp: &'p ForLoop) -> SynthesisResult<()> {
        let bound = |expr: Option<&Expression>| match expr {
            Some(expr) => self
                .frame
                .constant(expr, SemanticErrorKind::NonConstantLoopBound),
            None => Ok(1),
        };
        let from = bound(lp.from.as_ref())?;
        let to = bound(Some(&lp.to))?;
        let step = bound(lp.step.as_ref())?;

        if step == 0 {
            return Err(SemanticError::new(
                SemanticErrorKind::InconsistentLoopStep,
                "loop step must not be zero",
            )
            .into());
        }
        if from.checked_sub(step) == Some(to) {
            debug!(from, to, step, "empty loop range");
            return Ok(());
        }
        if (step > 0 && from > to) || (step < 0 && from < to) {
            return Err(SemanticError::new(
                SemanticErrorKind::InconsistentLoopStep,
                format!("step {step} does not lead from {from} to {to}"),
            )
            .into());
        }

        debug!(from, to, step, variable = ?lp.variable, "unrolling loop");
        let mut value = from;
        loop {
            if let Some(name) = &lp.variable {
                self.frame.push_loop(name, value);
            }
            let result = self.statements(&lp.body);
            if lp.variable.is_some() {
                self.frame.pop_loop();
            }
            result?;

            match value.checked_add(step) {
                Some(next) if (step > 0 && next <= to) || (step < 0 && next >= to) => value = next,
                _ => break,
            }
        }
        Ok(())
    }

    // =========================================================================
    // Calls
    // =========================================================================

    fn call(
        &mut self,
        name: &str,
        arguments: &[String],
        direction: Direction,
    ) -> SynthesisResult<()> {
        let program = self.program;
        let callee = program
            .module(name)
            .ok_or_else(|| SemanticError::undeclared("module", name))?;

        if arguments.len() != callee.parameters.len() {
            return Err(SemanticError::new(
                SemanticErrorKind::ArityMismatch,
                format!(
                    "module '{name}' expects {} argument(s), got {}",
                    callee.parameters.len(),
                    arguments.len()
                ),
            )
            .into());
        }

        let mode = match (direction, self.frame.mode) {
            (Direction::Inverse, SynthesisMode::CostAware) => SynthesisMode::LineAware,
            (_, mode) => mode,
        };
        let mut frame = Frame::new(callee, mode);
        let mut seen = FxHashSet::default();
        for (argument, parameter) in arguments.iter().zip(&callee.parameters) {
            if !seen.insert(argument.as_str()) {
                return Err(overlapping(format!(
                    "'{argument}' is passed to '{name}' more than once"
                ))
                .into());
            }
            let binding = self.frame.binding(argument)?;
            if !binding.variable.same_shape(parameter) {
                return Err(SemanticError::new(
                    SemanticErrorKind::BitWidthMismatch,
                    format!(
                        "argument '{argument}' does not match the shape of parameter '{}' of '{name}'",
                        parameter.name
                    ),
                )
                .into());
            }
            frame.bind(parameter, binding.lines.clone());
        }
        for variable in &callee.variables {
            let role = line_role(variable.role);
            let prefix = format!("{name}/{}", variable.name);
            let lines = line_names(&prefix, variable)
                .into_iter()
                .map(|line| self.builder.add_line(role, line))
                .collect::<Result<Vec<_>, _>>()?;
            frame.bind(variable, lines);
        }

        debug!(module = name, ?direction, "synthesizing call");
        let caller = std::mem::replace(&mut self.frame, frame);
        self.emitter.begin_block();
        let result = self.statements(&callee.statements);
        let block = self.emitter.end_block();
        self.frame = caller;
        result?;

        self.emitter.emit_sequence(&block, direction);
        Ok(())
    }
}
