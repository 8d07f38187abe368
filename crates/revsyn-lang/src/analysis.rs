//! Static checks run before synthesis: declarations and the module call graph.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::{Expression, Module, Program, Statement, StatementKind, VariableAccess};
use crate::error::{SemanticError, SemanticErrorKind, SemanticResult, StatementRef};

/// Visit every statement of a list, including nested branches and loop bodies.
pub fn walk_statements<'a>(statements: &'a [Statement], visit: &mut impl FnMut(&'a Statement)) {
    for statement in statements {
        visit(statement);
        match &statement.kind {
            StatementKind::If(branch) => {
                walk_statements(&branch.then_branch, visit);
                walk_statements(&branch.else_branch, visit);
            }
            StatementKind::For(lp) => walk_statements(&lp.body, visit),
            _ => {}
        }
    }
}

fn call_target(statement: &Statement) -> Option<&str> {
    match &statement.kind {
        StatementKind::Call { module, .. } | StatementKind::Uncall { module, .. } => {
            Some(module.as_str())
        }
        _ => None,
    }
}

/// The module call graph. An edge `a -> b` means `a` calls or uncalls `b`.
#[derive(Debug, Clone)]
pub struct CallGraph {
    graph: DiGraph<String, ()>,
    index: FxHashMap<String, NodeIndex>,
}

impl CallGraph {
    /// Build the graph, failing on calls to undeclared modules.
    pub fn build(program: &Program) -> SemanticResult<Self> {
        let mut graph = DiGraph::new();
        let mut index = FxHashMap::default();
        for module in &program.modules {
            let node = graph.add_node(module.name.clone());
            index.insert(module.name.clone(), node);
        }

        for module in &program.modules {
            let caller = index[&module.name];
            let mut result = Ok(());
            walk_statements(&module.statements, &mut |statement| {
                let Some(target) = call_target(statement) else {
                    return;
                };
                if result.is_err() {
                    return;
                }
                match index.get(target) {
                    Some(&callee) => {
                        graph.update_edge(caller, callee, ());
                    }
                    None => {
                        result = Err(SemanticError::undeclared("module", target)
                            .or_at(|| StatementRef::of(&module.name, statement)));
                    }
                }
            });
            result?;
        }

        Ok(Self { graph, index })
    }

    /// Number of modules.
    pub fn num_modules(&self) -> usize {
        self.graph.node_count()
    }

    /// Modules involved in a cycle, one group per strongly connected component.
    pub fn cycles(&self) -> Vec<Vec<&str>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut names: Vec<&str> = scc.iter().map(|&n| self.graph[n].as_str()).collect();
                names.sort_unstable();
                names
            })
            .collect()
    }
}

fn check_declarations(module: &Module) -> SemanticResult<()> {
    let mut seen = FxHashSet::default();
    for variable in module.declarations() {
        if !seen.insert(variable.name.as_str()) {
            return Err(SemanticError::new(
                SemanticErrorKind::DuplicateDeclaration,
                format!(
                    "variable '{}' is declared twice in module '{}'",
                    variable.name, module.name
                ),
            ));
        }
        if variable.bitwidth == 0 || variable.dimensions.contains(&0) {
            return Err(SemanticError::new(
                SemanticErrorKind::InvalidDeclaration,
                format!(
                    "variable '{}' in module '{}' has an empty shape",
                    variable.name, module.name
                ),
            ));
        }
    }
    Ok(())
}

/// Check module and variable declarations and the call graph.
///
/// Duplicate module names, duplicate variables within a module, zero
/// bit-widths or dimensions, calls to undeclared modules and recursive
/// call chains are rejected.
pub fn check_program(program: &Program) -> SemanticResult<CallGraph> {
    let mut modules = FxHashSet::default();
    for module in &program.modules {
        if !modules.insert(module.name.as_str()) {
            return Err(SemanticError::new(
                SemanticErrorKind::DuplicateDeclaration,
                format!("module '{}' is declared twice", module.name),
            ));
        }
        check_declarations(module)?;
    }

    let graph = CallGraph::build(program)?;
    if let Some(cycle) = graph.cycles().into_iter().next() {
        let members: FxHashSet<&str> = cycle.iter().copied().collect();
        let mut offending = None;
        for module in program.modules.iter().filter(|m| members.contains(m.name.as_str())) {
            walk_statements(&module.statements, &mut |statement| {
                if offending.is_none()
                    && call_target(statement).is_some_and(|t| members.contains(t))
                {
                    offending = Some(StatementRef::of(&module.name, statement));
                }
            });
            if offending.is_some() {
                break;
            }
        }
        let mut err = SemanticError::new(
            SemanticErrorKind::CallGraphCycle,
            format!("recursive calls between modules {}", cycle.join(", ")),
        );
        if let Some(at) = offending {
            err = err.or_at(|| at);
        }
        return Err(err);
    }
    Ok(graph)
}

fn collect_access<'a>(access: &'a VariableAccess, names: &mut FxHashSet<&'a str>) {
    names.insert(&access.name);
    for index in &access.indices {
        collect_expr(index, names);
    }
    if let Some(range) = &access.range {
        collect_expr(&range.start, names);
        collect_expr(&range.end, names);
    }
}

fn collect_expr<'a>(expr: &'a Expression, names: &mut FxHashSet<&'a str>) {
    for access in expr.accesses() {
        names.insert(&access.name);
    }
}

/// Names of all variables a statement list reads or writes, including call
/// arguments and nested statements.
pub fn referenced_variables(statements: &[Statement]) -> FxHashSet<&str> {
    let mut names = FxHashSet::default();
    walk_statements(statements, &mut |statement| match &statement.kind {
        StatementKind::Assign { target, value, .. } => {
            collect_access(target, &mut names);
            collect_expr(value, &mut names);
        }
        StatementKind::Unary { target, .. } => collect_access(target, &mut names),
        StatementKind::Swap { lhs, rhs } => {
            collect_access(lhs, &mut names);
            collect_access(rhs, &mut names);
        }
        StatementKind::Skip => {}
        StatementKind::If(branch) => {
            collect_expr(&branch.condition, &mut names);
            collect_expr(branch.closing_condition(), &mut names);
        }
        StatementKind::For(lp) => {
            for bound in [lp.from.as_ref(), Some(&lp.to), lp.step.as_ref()]
                .into_iter()
                .flatten()
            {
                collect_expr(bound, &mut names);
            }
        }
        StatementKind::Call { arguments, .. } | StatementKind::Uncall { arguments, .. } => {
            names.extend(arguments.iter().map(String::as_str));
        }
    });
    names
}
