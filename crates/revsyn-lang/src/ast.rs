//! Program representation for the SyReC reversible language.
//!
//! The tree is produced by an external parser (or deserialized from JSON)
//! and consumed read-only by synthesis.

use serde::{Deserialize, Serialize};

use crate::error::{SemanticError, SemanticErrorKind, SemanticResult};

// =============================================================================
// Variables
// =============================================================================

/// Role of a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableRole {
    /// Module input, read-only by convention.
    In,
    /// Module output, starts at 0.
    Out,
    /// Input and output.
    InOut,
    /// Local wire, starts at 0.
    Wire,
    /// Local state.
    State,
}

impl VariableRole {
    /// Keyword used in source text.
    pub fn keyword(self) -> &'static str {
        match self {
            VariableRole::In => "in",
            VariableRole::Out => "out",
            VariableRole::InOut => "inout",
            VariableRole::Wire => "wire",
            VariableRole::State => "state",
        }
    }
}

/// A declared variable: scalar bit vector or array of bit vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name, unique within its module.
    pub name: String,
    /// Declared role.
    pub role: VariableRole,
    /// Bits per element.
    pub bitwidth: usize,
    /// Array dimensions, empty for scalars.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<usize>,
}

impl Variable {
    /// Create a scalar variable.
    pub fn new(name: impl Into<String>, role: VariableRole, bitwidth: usize) -> Self {
        Self {
            name: name.into(),
            role,
            bitwidth,
            dimensions: vec![],
        }
    }

    /// Turn the variable into an array with the given dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: impl Into<Vec<usize>>) -> Self {
        self.dimensions = dimensions.into();
        self
    }

    /// Whether the variable is an array.
    pub fn is_array(&self) -> bool {
        !self.dimensions.is_empty()
    }

    /// Number of array elements (1 for scalars).
    pub fn num_elements(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// Total number of bits the variable occupies.
    pub fn num_bits(&self) -> usize {
        self.num_elements() * self.bitwidth
    }

    /// Whether two variables have the same bit-width and dimensions.
    pub fn same_shape(&self, other: &Variable) -> bool {
        self.bitwidth == other.bitwidth && self.dimensions == other.dimensions
    }
}

/// A bit range `start:end` of a variable access; `start > end` addresses
/// the bits in descending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitRange {
    /// First bit.
    pub start: Expression,
    /// Last bit (inclusive).
    pub end: Expression,
}

/// A reference to a variable, optionally indexed and bit-sliced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableAccess {
    /// Referenced variable.
    pub name: String,
    /// One index per array dimension.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<Expression>,
    /// Optional bit range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Box<BitRange>>,
}

impl VariableAccess {
    /// Access a whole variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indices: vec![],
            range: None,
        }
    }

    /// Add an array index.
    #[must_use]
    pub fn index(mut self, index: impl Into<Expression>) -> Self {
        self.indices.push(index.into());
        self
    }

    /// Restrict the access to a single bit.
    #[must_use]
    pub fn bit(mut self, bit: impl Into<Expression>) -> Self {
        let bit = bit.into();
        self.range = Some(Box::new(BitRange {
            start: bit.clone(),
            end: bit,
        }));
        self
    }

    /// Restrict the access to the bits `start..=end`.
    #[must_use]
    pub fn bits(mut self, start: impl Into<Expression>, end: impl Into<Expression>) -> Self {
        self.range = Some(Box::new(BitRange {
            start: start.into(),
            end: end.into(),
        }));
        self
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    LessThan,
    GreaterThan,
    LessEquals,
    GreaterEquals,
    Equals,
    NotEquals,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::BitwiseAnd => "&",
            BinaryOp::BitwiseOr => "|",
            BinaryOp::BitwiseXor => "^",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessEquals => "<=",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::Equals => "=",
            BinaryOp::NotEquals => "!=",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
        }
    }

    /// Binding strength; higher binds tighter. All levels associate left.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 10,
            BinaryOp::Add | BinaryOp::Subtract => 9,
            BinaryOp::ShiftLeft | BinaryOp::ShiftRight => 8,
            BinaryOp::LessThan
            | BinaryOp::GreaterThan
            | BinaryOp::LessEquals
            | BinaryOp::GreaterEquals => 7,
            BinaryOp::Equals | BinaryOp::NotEquals => 6,
            BinaryOp::BitwiseAnd => 5,
            BinaryOp::BitwiseXor => 4,
            BinaryOp::BitwiseOr => 3,
            BinaryOp::LogicalAnd => 2,
            BinaryOp::LogicalOr => 1,
        }
    }

    /// Relational and equality operators, producing one bit.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::LessThan
                | BinaryOp::GreaterThan
                | BinaryOp::LessEquals
                | BinaryOp::GreaterEquals
                | BinaryOp::Equals
                | BinaryOp::NotEquals
        )
    }

    /// `&&` and `||`, operating on single bits.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }

    /// `<<` and `>>`, whose right operand must be constant.
    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::ShiftLeft | BinaryOp::ShiftRight)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// `~x`
    BitwiseNot,
    /// `!x` on a single bit.
    LogicalNot,
}

impl UnaryOp {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::BitwiseNot => "~",
            UnaryOp::LogicalNot => "!",
        }
    }
}

/// An expression. Pure until lowered by synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Unsigned literal; takes the bit-width of its context.
    Literal(u64),
    /// Loop variable `$i`.
    LoopVariable(String),
    /// Bit-width of a declared variable `#x`.
    BitWidth(String),
    /// Variable access.
    Variable(VariableAccess),
    /// Unary operation.
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    /// Binary operation.
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
}

impl Expression {
    /// Create a literal.
    pub fn literal(value: u64) -> Self {
        Expression::Literal(value)
    }

    /// Reference a whole variable.
    pub fn var(name: impl Into<String>) -> Self {
        Expression::Variable(VariableAccess::new(name))
    }

    /// Reference a loop variable.
    pub fn loop_var(name: impl Into<String>) -> Self {
        Expression::LoopVariable(name.into())
    }

    /// Bit-width of a variable.
    pub fn bitwidth_of(name: impl Into<String>) -> Self {
        Expression::BitWidth(name.into())
    }

    /// Create a binary expression.
    pub fn binary(op: BinaryOp, lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Self {
        Expression::Binary {
            op,
            lhs: Box::new(lhs.into()),
            rhs: Box::new(rhs.into()),
        }
    }

    /// Create a unary expression.
    pub fn unary(op: UnaryOp, operand: impl Into<Expression>) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand.into()),
        }
    }

    /// Collect every variable access in the expression, including accesses
    /// nested in indices and ranges.
    pub fn accesses(&self) -> Vec<&VariableAccess> {
        let mut out = vec![];
        self.collect_accesses(&mut out);
        out
    }

    fn collect_accesses<'a>(&'a self, out: &mut Vec<&'a VariableAccess>) {
        match self {
            Expression::Literal(_) | Expression::LoopVariable(_) | Expression::BitWidth(_) => {}
            Expression::Variable(access) => {
                out.push(access);
                access.collect_nested(out);
            }
            Expression::Unary { operand, .. } => operand.collect_accesses(out),
            Expression::Binary { lhs, rhs, .. } => {
                lhs.collect_accesses(out);
                rhs.collect_accesses(out);
            }
        }
    }
}

impl VariableAccess {
    fn collect_nested<'a>(&'a self, out: &mut Vec<&'a VariableAccess>) {
        for index in &self.indices {
            index.collect_accesses(out);
        }
        if let Some(range) = &self.range {
            range.start.collect_accesses(out);
            range.end.collect_accesses(out);
        }
    }
}

impl From<u64> for Expression {
    fn from(value: u64) -> Self {
        Expression::Literal(value)
    }
}

impl From<VariableAccess> for Expression {
    fn from(access: VariableAccess) -> Self {
        Expression::Variable(access)
    }
}

// =============================================================================
// Statements
// =============================================================================

/// Compound assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    /// `^=`
    Xor,
    /// `+=`
    Add,
    /// `-=`
    Subtract,
}

impl AssignOp {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Xor => "^=",
            AssignOp::Add => "+=",
            AssignOp::Subtract => "-=",
        }
    }
}

/// In-place unary statement operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryStatementOp {
    /// `++= x`
    Increment,
    /// `--= x`
    Decrement,
    /// `~= x`
    Invert,
}

impl UnaryStatementOp {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryStatementOp::Increment => "++=",
            UnaryStatementOp::Decrement => "--=",
            UnaryStatementOp::Invert => "~=",
        }
    }
}

/// `if cond then ... else ... fi cond'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfStatement {
    /// One-bit condition.
    pub condition: Expression,
    /// Statements executed when the condition holds.
    pub then_branch: Vec<Statement>,
    /// Statements executed otherwise.
    #[serde(default)]
    pub else_branch: Vec<Statement>,
    /// Condition re-evaluated after the branches; defaults to `condition`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fi_condition: Option<Expression>,
}

impl IfStatement {
    /// The condition evaluated after the branches.
    pub fn closing_condition(&self) -> &Expression {
        self.fi_condition.as_ref().unwrap_or(&self.condition)
    }
}

/// `for $i = from to to step s do ... rof`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForLoop {
    /// Optional loop variable name (without `$`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// First value, defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Expression>,
    /// Last value (inclusive).
    pub to: Expression,
    /// Step, defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<Expression>,
    /// Loop body.
    pub body: Vec<Statement>,
}

impl ForLoop {
    /// Create a loop over `from..=to` with step 1.
    pub fn new(
        variable: Option<&str>,
        from: impl Into<Expression>,
        to: impl Into<Expression>,
        body: Vec<Statement>,
    ) -> Self {
        Self {
            variable: variable.map(String::from),
            from: Some(from.into()),
            to: to.into(),
            step: None,
            body,
        }
    }

    /// Set the step expression.
    #[must_use]
    pub fn with_step(mut self, step: impl Into<Expression>) -> Self {
        self.step = Some(step.into());
        self
    }
}

/// The different kinds of statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementKind {
    /// `target op= value`
    Assign {
        target: VariableAccess,
        op: AssignOp,
        value: Expression,
    },
    /// `op target`
    Unary {
        op: UnaryStatementOp,
        target: VariableAccess,
    },
    /// `lhs <=> rhs`
    Swap {
        lhs: VariableAccess,
        rhs: VariableAccess,
    },
    /// `skip`
    Skip,
    /// Conditional.
    If(IfStatement),
    /// Bounded loop.
    For(ForLoop),
    /// `call module(arguments)`
    Call {
        module: String,
        arguments: Vec<String>,
    },
    /// `uncall module(arguments)`
    Uncall {
        module: String,
        arguments: Vec<String>,
    },
}

/// A statement with its optional source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// What the statement does.
    #[serde(flatten)]
    pub kind: StatementKind,
    /// Source line, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Statement {
    /// Create a statement without line information.
    pub fn new(kind: StatementKind) -> Self {
        Self { kind, line: None }
    }

    /// `target op= value`
    pub fn assign(target: VariableAccess, op: AssignOp, value: impl Into<Expression>) -> Self {
        Self::new(StatementKind::Assign {
            target,
            op,
            value: value.into(),
        })
    }

    /// In-place unary statement.
    pub fn unary(op: UnaryStatementOp, target: VariableAccess) -> Self {
        Self::new(StatementKind::Unary { op, target })
    }

    /// `lhs <=> rhs`
    pub fn swap(lhs: VariableAccess, rhs: VariableAccess) -> Self {
        Self::new(StatementKind::Swap { lhs, rhs })
    }

    /// `skip`
    pub fn skip() -> Self {
        Self::new(StatementKind::Skip)
    }

    /// `if condition then ... else ... fi condition`
    pub fn if_then_else(
        condition: impl Into<Expression>,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    ) -> Self {
        Self::new(StatementKind::If(IfStatement {
            condition: condition.into(),
            then_branch,
            else_branch,
            fi_condition: None,
        }))
    }

    /// Bounded loop.
    pub fn for_loop(lp: ForLoop) -> Self {
        Self::new(StatementKind::For(lp))
    }

    /// `call module(arguments)`
    pub fn call(module: impl Into<String>, arguments: &[&str]) -> Self {
        Self::new(StatementKind::Call {
            module: module.into(),
            arguments: arguments.iter().map(|a| (*a).to_string()).collect(),
        })
    }

    /// `uncall module(arguments)`
    pub fn uncall(module: impl Into<String>, arguments: &[&str]) -> Self {
        Self::new(StatementKind::Uncall {
            module: module.into(),
            arguments: arguments.iter().map(|a| (*a).to_string()).collect(),
        })
    }

    /// Attach a source line.
    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

// =============================================================================
// Modules and programs
// =============================================================================

/// A module: parameters, locals and a statement list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module name, unique within the program.
    pub name: String,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<Variable>,
    /// Local variables in declaration order.
    #[serde(default)]
    pub variables: Vec<Variable>,
    /// Body.
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl Module {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: vec![],
            variables: vec![],
            statements: vec![],
        }
    }

    /// Add a parameter.
    #[must_use]
    pub fn with_parameter(mut self, variable: Variable) -> Self {
        self.parameters.push(variable);
        self
    }

    /// Add a local variable.
    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Append a statement.
    #[must_use]
    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Parameters then locals.
    pub fn declarations(&self) -> impl Iterator<Item = &Variable> {
        self.parameters.iter().chain(&self.variables)
    }

    /// Find a parameter or local by name.
    pub fn find_variable(&self, name: &str) -> Option<&Variable> {
        self.declarations().find(|v| v.name == name)
    }
}

/// A program: ordered modules and an optional designated entry module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Modules in declaration order.
    pub modules: Vec<Module>,
    /// Entry module name; defaults to `main`, then to the first module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module.
    #[must_use]
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Designate the entry module.
    #[must_use]
    pub fn with_entry(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Find a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Resolve the module synthesis starts from.
    pub fn entry_module(&self) -> SemanticResult<&Module> {
        if let Some(name) = &self.entry {
            return self.module(name).ok_or_else(|| {
                SemanticError::new(
                    SemanticErrorKind::UndeclaredIdentifier,
                    format!("entry module '{name}' is not declared"),
                )
            });
        }
        self.module("main")
            .or_else(|| self.modules.first())
            .ok_or_else(|| {
                SemanticError::new(
                    SemanticErrorKind::MissingEntryModule,
                    "program declares no modules",
                )
            })
    }

    /// Parse a program from its JSON interchange form.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Serialize the program to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_shape() {
        let v = Variable::new("a", VariableRole::In, 4).with_dimensions([2, 3]);
        assert!(v.is_array());
        assert_eq!(v.num_elements(), 6);
        assert_eq!(v.num_bits(), 24);
        assert!(!v.same_shape(&Variable::new("b", VariableRole::In, 4)));
        assert_eq!(Variable::new("s", VariableRole::Wire, 3).num_bits(), 3);
    }

    #[test]
    fn test_accesses_include_indices() {
        let access = VariableAccess::new("a").index(Expression::var("i"));
        let expr = Expression::binary(BinaryOp::Add, access, Expression::var("b"));
        let names: Vec<&str> = expr.accesses().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "i", "b"]);
    }

    #[test]
    fn test_entry_resolution() {
        let program = Program::new()
            .with_module(Module::new("helper"))
            .with_module(Module::new("main"));
        assert_eq!(program.entry_module().unwrap().name, "main");

        let program = Program::new().with_module(Module::new("only"));
        assert_eq!(program.entry_module().unwrap().name, "only");

        let program = program.with_entry("missing");
        let err = program.entry_module().unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::UndeclaredIdentifier);

        let err = Program::new().entry_module().unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::MissingEntryModule);
    }

    #[test]
    fn test_closing_condition_defaults() {
        let stmt = Statement::if_then_else(Expression::var("s"), vec![], vec![]);
        let StatementKind::If(branch) = &stmt.kind else {
            panic!("expected if statement");
        };
        assert_eq!(branch.closing_condition(), &Expression::var("s"));
    }

    #[test]
    fn test_json_interchange() {
        let program = Program::new().with_module(
            Module::new("main")
                .with_parameter(Variable::new("a", VariableRole::In, 2))
                .with_parameter(Variable::new("c", VariableRole::Out, 2))
                .with_statement(
                    Statement::assign(VariableAccess::new("c"), AssignOp::Xor, Expression::var("a"))
                        .at_line(3),
                ),
        );
        let json = program.to_json().unwrap();
        assert!(json.contains("\"kind\": \"assign\""));
        assert!(json.contains("\"line\": 3"));
        assert_eq!(Program::from_json(&json).unwrap(), program);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "modules": [{
                "name": "main",
                "parameters": [{"name": "x", "role": "inout", "bitwidth": 2}],
                "statements": [
                    {"kind": "skip"},
                    {"kind": "for", "to": {"literal": 3}, "body": []}
                ]
            }]
        }"#;
        let program = Program::from_json(json).unwrap();
        let main = program.entry_module().unwrap();
        assert!(main.variables.is_empty());
        assert_eq!(main.statements.len(), 2);
        let StatementKind::For(lp) = &main.statements[1].kind else {
            panic!("expected for loop");
        };
        assert!(lp.from.is_none());
        assert!(lp.step.is_none());
    }

    #[test]
    fn test_roles_serialize_as_keywords() {
        for role in [
            VariableRole::In,
            VariableRole::Out,
            VariableRole::InOut,
            VariableRole::Wire,
            VariableRole::State,
        ] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.keyword()));
            assert_eq!(serde_json::from_str::<VariableRole>(&json).unwrap(), role);
        }
    }
}
