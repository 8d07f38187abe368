//! Source-text rendering of the program representation.
//!
//! Expressions are printed with the minimum parentheses their precedence
//! requires; statements and modules use SyReC surface syntax.

use std::fmt::{self, Write};

use crate::ast::{
    Expression, ForLoop, Module, Program, Statement, StatementKind, Variable, VariableAccess,
};

// Binds tighter than any binary operator.
const ATOMIC: u8 = u8::MAX;

fn write_expr(f: &mut impl Write, expr: &Expression, parent: u8, right: bool) -> fmt::Result {
    match expr {
        Expression::Literal(value) => write!(f, "{value}"),
        Expression::LoopVariable(name) => write!(f, "${name}"),
        Expression::BitWidth(name) => write!(f, "#{name}"),
        Expression::Variable(access) => write!(f, "{access}"),
        Expression::Unary { op, operand } => {
            f.write_str(op.symbol())?;
            write_expr(f, operand, ATOMIC, false)
        }
        Expression::Binary { op, lhs, rhs } => {
            let prec = op.precedence();
            let parens = prec < parent || (prec == parent && right);
            if parens {
                f.write_char('(')?;
            }
            write_expr(f, lhs, prec, false)?;
            write!(f, " {} ", op.symbol())?;
            write_expr(f, rhs, prec, true)?;
            if parens {
                f.write_char(')')?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self, 0, false)
    }
}

impl fmt::Display for VariableAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for index in &self.indices {
            write!(f, "[{index}]")?;
        }
        if let Some(range) = &self.range {
            f.write_char('.')?;
            write_expr(f, &range.start, ATOMIC, false)?;
            if range.start != range.end {
                f.write_char(':')?;
                write_expr(f, &range.end, ATOMIC, false)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.role.keyword(), self.name)?;
        for dim in &self.dimensions {
            write!(f, "[{dim}]")?;
        }
        write!(f, "({})", self.bitwidth)
    }
}

fn loop_header(lp: &ForLoop) -> String {
    let mut out = String::from("for ");
    if let Some(var) = &lp.variable {
        let _ = write!(out, "${var} = ");
    }
    if let Some(from) = &lp.from {
        let _ = write!(out, "{from} to ");
    }
    let _ = write!(out, "{}", lp.to);
    if let Some(step) = &lp.step {
        let _ = write!(out, " step {step}");
    }
    out.push_str(" do");
    out
}

fn call_text(keyword: &str, module: &str, arguments: &[String]) -> String {
    format!("{keyword} {module}({})", arguments.join(", "))
}

impl Statement {
    /// One-line rendering used in diagnostics; compound statements show
    /// only their header.
    pub fn header(&self) -> String {
        match &self.kind {
            StatementKind::Assign { target, op, value } => {
                format!("{target} {} {value}", op.symbol())
            }
            StatementKind::Unary { op, target } => format!("{} {target}", op.symbol()),
            StatementKind::Swap { lhs, rhs } => format!("{lhs} <=> {rhs}"),
            StatementKind::Skip => "skip".into(),
            StatementKind::If(branch) => format!("if {} then", branch.condition),
            StatementKind::For(lp) => loop_header(lp),
            StatementKind::Call { module, arguments } => call_text("call", module, arguments),
            StatementKind::Uncall { module, arguments } => {
                call_text("uncall", module, arguments)
            }
        }
    }
}

fn write_block(f: &mut impl Write, statements: &[Statement], indent: usize) -> fmt::Result {
    for (i, statement) in statements.iter().enumerate() {
        write_statement(f, statement, indent)?;
        if i + 1 < statements.len() {
            f.write_char(';')?;
        }
        f.write_char('\n')?;
    }
    Ok(())
}

fn write_statement(f: &mut impl Write, statement: &Statement, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);
    match &statement.kind {
        StatementKind::If(branch) => {
            writeln!(f, "{pad}{}", statement.header())?;
            write_block(f, &branch.then_branch, indent + 1)?;
            writeln!(f, "{pad}else")?;
            write_block(f, &branch.else_branch, indent + 1)?;
            write!(f, "{pad}fi {}", branch.closing_condition())
        }
        StatementKind::For(lp) => {
            writeln!(f, "{pad}{}", statement.header())?;
            write_block(f, &lp.body, indent + 1)?;
            write!(f, "{pad}rof")
        }
        _ => write!(f, "{pad}{}", statement.header()),
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        writeln!(f, "module {}({})", self.name, params.join(", "))?;
        for variable in &self.variables {
            writeln!(f, "  {variable}")?;
        }
        write_block(f, &self.statements, 1)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, module) in self.modules.iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            write!(f, "{module}")?;
        }
        Ok(())
    }
}
