//! Variable bindings and access resolution for one module activation.

use revsyn_ir::{LineId, LineRole};
use revsyn_lang::{
    ConstEnv, Expression, Module, SemanticError, SemanticErrorKind, SemanticResult, Variable,
    VariableAccess, VariableRole,
};
use rustc_hash::FxHashMap;

use crate::settings::SynthesisMode;

/// Line role of a declared variable.
pub(crate) fn line_role(role: VariableRole) -> LineRole {
    match role {
        VariableRole::In => LineRole::Input,
        VariableRole::Out => LineRole::Output,
        VariableRole::InOut => LineRole::InOut,
        VariableRole::Wire => LineRole::Wire,
        VariableRole::State => LineRole::State,
    }
}

/// Names of the lines of a variable, element-major and LSB first.
pub(crate) fn line_names(prefix: &str, variable: &Variable) -> Vec<String> {
    let mut names = Vec::with_capacity(variable.num_bits());
    for element in 0..variable.num_elements() {
        for bit in 0..variable.bitwidth {
            if variable.is_array() {
                names.push(format!("{prefix}[{element}].{bit}"));
            } else {
                names.push(format!("{prefix}.{bit}"));
            }
        }
    }
    names
}

/// A variable and the lines holding it.
#[derive(Debug, Clone)]
pub(crate) struct Binding<'p> {
    pub variable: &'p Variable,
    pub lines: Vec<LineId>,
}

/// Bindings of one module activation.
#[derive(Debug, Clone)]
pub(crate) struct Frame<'p> {
    pub module: &'p Module,
    pub mode: SynthesisMode,
    bindings: FxHashMap<&'p str, Binding<'p>>,
    loops: Vec<(&'p str, i64)>,
}

impl<'p> Frame<'p> {
    pub fn new(module: &'p Module, mode: SynthesisMode) -> Self {
        Self {
            module,
            mode,
            bindings: FxHashMap::default(),
            loops: Vec::new(),
        }
    }

    pub fn bind(&mut self, variable: &'p Variable, lines: Vec<LineId>) {
        self.bindings
            .insert(variable.name.as_str(), Binding { variable, lines });
    }

    pub fn binding(&self, name: &str) -> SemanticResult<&Binding<'p>> {
        self.bindings
            .get(name)
            .ok_or_else(|| SemanticError::undeclared("variable", name))
    }

    pub fn push_loop(&mut self, name: &'p str, value: i64) {
        self.loops.push((name, value));
    }

    pub fn pop_loop(&mut self) {
        self.loops.pop();
    }

    /// Evaluate a compile-time constant, reporting non-constant operands as `kind`.
    pub fn constant(&self, expr: &Expression, kind: SemanticErrorKind) -> SemanticResult<i64> {
        expr.evaluate_const(self).map_err(|e| e.into_semantic(kind))
    }

    /// Fold a constant expression to the `width`-bit value its lines would hold.
    ///
    /// Comparisons between constants have no operand width of their own and
    /// compare at the widest variable declared in the module.
    pub fn constant_value(&self, expr: &Expression, width: usize) -> SemanticResult<u64> {
        expr.evaluate_unsigned(self, width, self.widest_variable())
            .map_err(|e| e.into_semantic(SemanticErrorKind::NonConstantExpression))
    }

    fn widest_variable(&self) -> usize {
        self.module
            .declarations()
            .map(|v| v.bitwidth)
            .max()
            .unwrap_or(1)
            .max(1)
    }

    fn position(&self, expr: &Expression, size: usize, what: &str) -> SemanticResult<usize> {
        let value = self.constant(expr, SemanticErrorKind::NonConstantExpression)?;
        usize::try_from(value)
            .ok()
            .filter(|&v| v < size)
            .ok_or_else(|| {
                SemanticError::new(
                    SemanticErrorKind::IndexOutOfRange,
                    format!("{what} {value} is outside 0..{size}"),
                )
            })
    }

    /// Lines addressed by an access, in access order.
    pub fn resolve(&self, access: &VariableAccess) -> SemanticResult<Vec<LineId>> {
        let binding = self.binding(&access.name)?;
        let variable = binding.variable;
        if access.indices.len() != variable.dimensions.len() {
            return Err(SemanticError::new(
                SemanticErrorKind::DimensionMismatch,
                format!(
                    "'{}' has {} dimension(s) but is accessed with {} index(es)",
                    access.name,
                    variable.dimensions.len(),
                    access.indices.len()
                ),
            ));
        }

        let mut element = 0;
        for (index, &size) in access.indices.iter().zip(&variable.dimensions) {
            let what = format!("index of '{}'", access.name);
            element = element * size + self.position(index, size, &what)?;
        }

        let width = variable.bitwidth;
        let bits = &binding.lines[element * width..(element + 1) * width];
        let Some(range) = &access.range else {
            return Ok(bits.to_vec());
        };
        let what = format!("bit of '{}'", access.name);
        let start = self.position(&range.start, width, &what)?;
        let end = self.position(&range.end, width, &what)?;
        if start <= end {
            Ok(bits[start..=end].to_vec())
        } else {
            Ok(bits[end..=start].iter().rev().copied().collect())
        }
    }
}

impl ConstEnv for Frame<'_> {
    fn loop_value(&self, name: &str) -> Option<i64> {
        self.loops
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|&(_, v)| v)
    }

    fn bit_width(&self, name: &str) -> Option<usize> {
        self.bindings.get(name).map(|b| b.variable.bitwidth)
    }
}
