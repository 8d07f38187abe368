//! End-to-end tests: synthesize small programs and check them by simulation.

use revsyn_ir::{Circuit, LineRole};
use revsyn_lang::{
    AssignOp, BinaryOp, Expression, ForLoop, Module, Program, SemanticErrorKind, Statement,
    UnaryOp, UnaryStatementOp, Variable, VariableAccess, VariableRole,
};
use revsyn_sim::{Assignment, read_register, simulate};
use revsyn_synth::{SynthesisMode, synthesize, synthesize_cost_aware, synthesize_line_aware};

const MODES: [SynthesisMode; 2] = [SynthesisMode::LineAware, SynthesisMode::CostAware];

fn var(name: &str) -> Expression {
    Expression::var(name)
}

fn access(name: &str) -> VariableAccess {
    VariableAccess::new(name)
}

fn binary(op: BinaryOp, lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Expression {
    Expression::binary(op, lhs, rhs)
}

/// `main(in a(n), in b(n), out c(out_width))` running `statements`.
fn two_operand(n: usize, out_width: usize, statements: Vec<Statement>) -> Program {
    let mut main = Module::new("main")
        .with_parameter(Variable::new("a", VariableRole::In, n))
        .with_parameter(Variable::new("b", VariableRole::In, n))
        .with_parameter(Variable::new("c", VariableRole::Out, out_width));
    main.statements = statements;
    Program::new().with_module(main)
}

fn run(circuit: &Circuit, values: &[(&str, u64)]) -> Vec<bool> {
    let input = Assignment::new(circuit)
        .with_values(values.iter().copied())
        .unwrap()
        .into_bits();
    simulate(circuit, &input).unwrap()
}

fn read(circuit: &Circuit, state: &[bool], name: &str) -> u64 {
    read_register(circuit, state, name).unwrap()
}

fn scratch_is_clean(circuit: &Circuit, state: &[bool]) -> bool {
    circuit
        .lines()
        .iter()
        .filter(|line| line.role == LineRole::Ancilla)
        .all(|line| !state[line.id.index()])
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn xor_copy_uses_one_cnot_per_bit() {
    let program = two_operand(4, 4, vec![Statement::assign(access("c"), AssignOp::Xor, var("a"))]);
    let circuit = synthesize_line_aware(&program).unwrap();
    assert_eq!(circuit.num_lines(), 12);
    assert_eq!(circuit.num_gates(), 4);
    assert!(circuit.gates().iter().all(|g| g.num_controls() == 1));
    assert_eq!(circuit.quantum_cost(), 4);
    for a in 0..16 {
        let state = run(&circuit, &[("a", a), ("b", 3)]);
        assert_eq!(read(&circuit, &state, "c"), a);
    }
}

#[test]
fn conditional_selects_branch() {
    let statement = Statement::if_then_else(
        var("s"),
        vec![Statement::assign(access("c"), AssignOp::Xor, var("a"))],
        vec![Statement::assign(access("c"), AssignOp::Xor, var("b"))],
    );
    let mut program = two_operand(3, 3, vec![statement]);
    program.modules[0]
        .parameters
        .push(Variable::new("s", VariableRole::InOut, 1));

    for mode in MODES {
        let circuit = synthesize(mode, &program, None).unwrap();
        assert_eq!(circuit.num_ancillae(), 0, "{mode}");
        for s in 0..2 {
            let state = run(&circuit, &[("a", 5), ("b", 2), ("s", s)]);
            let expected = if s == 1 { 5 } else { 2 };
            assert_eq!(read(&circuit, &state, "c"), expected);
            assert_eq!(read(&circuit, &state, "s"), s);
        }
    }
}

#[test]
fn empty_loop_emits_nothing() {
    let lp = ForLoop::new(
        Some("i"),
        3u64,
        2u64,
        vec![Statement::assign(access("c"), AssignOp::Xor, var("a"))],
    );
    let program = two_operand(2, 2, vec![Statement::for_loop(lp)]);
    let circuit = synthesize_line_aware(&program).unwrap();
    assert_eq!(circuit.num_gates(), 0);
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

fn check_operator(op: BinaryOp, out_width: usize, expected: impl Fn(u64, u64) -> u64) {
    let n = 3;
    let mask = (1u64 << n) - 1;
    let program = two_operand(
        n,
        out_width,
        vec![Statement::assign(access("c"), AssignOp::Xor, binary(op, var("a"), var("b")))],
    );
    for mode in MODES {
        let circuit = synthesize(mode, &program, None).unwrap();
        for a in 0..=mask {
            for b in 0..=mask {
                if matches!(op, BinaryOp::Divide | BinaryOp::Modulo) && b == 0 {
                    continue;
                }
                let state = run(&circuit, &[("a", a), ("b", b)]);
                let context = format!("{} a={a} b={b} mode={mode}", op.symbol());
                assert_eq!(read(&circuit, &state, "c"), expected(a, b), "{context}");
                assert_eq!(read(&circuit, &state, "a"), a, "{context}");
                assert_eq!(read(&circuit, &state, "b"), b, "{context}");
                if mode == SynthesisMode::LineAware {
                    assert!(scratch_is_clean(&circuit, &state), "{context}");
                }
            }
        }
    }
}

#[test]
fn arithmetic_operators() {
    check_operator(BinaryOp::Add, 3, |a, b| (a + b) & 7);
    check_operator(BinaryOp::Subtract, 3, |a, b| a.wrapping_sub(b) & 7);
    check_operator(BinaryOp::Multiply, 3, |a, b| (a * b) & 7);
    check_operator(BinaryOp::Divide, 3, |a, b| a / b);
    check_operator(BinaryOp::Modulo, 3, |a, b| a % b);
}

#[test]
fn bitwise_operators() {
    check_operator(BinaryOp::BitwiseAnd, 3, |a, b| a & b);
    check_operator(BinaryOp::BitwiseOr, 3, |a, b| a | b);
    check_operator(BinaryOp::BitwiseXor, 3, |a, b| a ^ b);
}

#[test]
fn comparison_operators() {
    check_operator(BinaryOp::LessThan, 1, |a, b| u64::from(a < b));
    check_operator(BinaryOp::GreaterThan, 1, |a, b| u64::from(a > b));
    check_operator(BinaryOp::LessEquals, 1, |a, b| u64::from(a <= b));
    check_operator(BinaryOp::GreaterEquals, 1, |a, b| u64::from(a >= b));
    check_operator(BinaryOp::Equals, 1, |a, b| u64::from(a == b));
    check_operator(BinaryOp::NotEquals, 1, |a, b| u64::from(a != b));
}

#[test]
fn logical_operators() {
    for op in [BinaryOp::LogicalAnd, BinaryOp::LogicalOr] {
        let value = Expression::unary(UnaryOp::LogicalNot, binary(op, var("a"), var("b")));
        let program = two_operand(1, 1, vec![Statement::assign(access("c"), AssignOp::Xor, value)]);
        for mode in MODES {
            let circuit = synthesize(mode, &program, None).unwrap();
            for (a, b) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                let state = run(&circuit, &[("a", a), ("b", b)]);
                let inner = if op == BinaryOp::LogicalAnd { a & b } else { a | b };
                assert_eq!(read(&circuit, &state, "c"), 1 - inner);
            }
        }
    }
}

#[test]
fn shifts_and_inversion() {
    let program = two_operand(
        4,
        4,
        vec![
            Statement::assign(access("c"), AssignOp::Xor, binary(BinaryOp::ShiftLeft, var("a"), 1u64)),
            Statement::assign(access("c"), AssignOp::Add, binary(BinaryOp::ShiftRight, var("b"), 2u64)),
            Statement::assign(access("c"), AssignOp::Subtract, Expression::unary(UnaryOp::BitwiseNot, var("a"))),
        ],
    );
    for mode in MODES {
        let circuit = synthesize(mode, &program, None).unwrap();
        for a in 0..16u64 {
            for b in [0u64, 5, 12, 15] {
                let state = run(&circuit, &[("a", a), ("b", b)]);
                let expected = ((a << 1) + (b >> 2)).wrapping_sub(!a & 15) & 15;
                assert_eq!(read(&circuit, &state, "c"), expected, "a={a} b={b} {mode}");
            }
        }
    }
}

#[test]
fn nested_expression_with_repeated_operand() {
    let value = binary(BinaryOp::Multiply, binary(BinaryOp::Add, var("a"), var("b")), var("a"));
    let program = two_operand(3, 3, vec![Statement::assign(access("c"), AssignOp::Add, value)]);
    for mode in MODES {
        let circuit = synthesize(mode, &program, None).unwrap();
        for a in 0..8u64 {
            for b in 0..8u64 {
                let state = run(&circuit, &[("a", a), ("b", b)]);
                assert_eq!(read(&circuit, &state, "c"), ((a + b) * a) & 7);
                assert_eq!(read(&circuit, &state, "a"), a);
            }
        }
    }
}

#[test]
fn constant_xor_emits_nots() {
    let program = two_operand(3, 3, vec![Statement::assign(access("c"), AssignOp::Xor, 5u64)]);
    let circuit = synthesize_line_aware(&program).unwrap();
    assert_eq!(circuit.num_gates(), 2);
    assert_eq!(circuit.num_ancillae(), 0);
    let state = run(&circuit, &[]);
    assert_eq!(read(&circuit, &state, "c"), 5);
}

#[test]
fn constant_operand_adopts_destination_width() {
    let program = two_operand(
        3,
        3,
        vec![Statement::assign(access("c"), AssignOp::Xor, binary(BinaryOp::Add, var("a"), 3u64))],
    );
    let circuit = synthesize_line_aware(&program).unwrap();
    for a in 0..8 {
        let state = run(&circuit, &[("a", a)]);
        assert_eq!(read(&circuit, &state, "c"), (a + 3) & 7);
        assert!(scratch_is_clean(&circuit, &state));
    }
}

#[test]
fn constant_values_fold_at_destination_width() {
    let shifted = binary(
        BinaryOp::ShiftRight,
        binary(BinaryOp::ShiftLeft, binary(BinaryOp::Add, 6u64, 1u64), 2u64),
        1u64,
    );
    let inverted = Expression::unary(UnaryOp::BitwiseNot, 1u64);
    for (value, op, expected) in [
        (shifted.clone(), AssignOp::Add, 2),
        (shifted, AssignOp::Xor, 2),
        (inverted.clone(), AssignOp::Add, 6),
        (inverted, AssignOp::Xor, 6),
        (binary(BinaryOp::Subtract, 1u64, 2u64), AssignOp::Xor, 7),
        (binary(BinaryOp::Multiply, 5u64, 3u64), AssignOp::Subtract, 1),
    ] {
        let program = two_operand(3, 3, vec![Statement::assign(access("c"), op, value.clone())]);
        for mode in MODES {
            let circuit = synthesize(mode, &program, None).unwrap();
            let state = run(&circuit, &[]);
            assert_eq!(read(&circuit, &state, "c"), expected, "{op:?} {value} {mode}");
            if mode == SynthesisMode::LineAware {
                assert!(scratch_is_clean(&circuit, &state));
            }
        }
    }
}

#[test]
fn constant_conditions_compare_at_variable_width() {
    // 3 < (~4 << 1) holds with three-bit operands: 3 < 6
    let holds = binary(
        BinaryOp::LessThan,
        binary(BinaryOp::ShiftLeft, 3u64, 0u64),
        binary(BinaryOp::ShiftLeft, Expression::unary(UnaryOp::BitwiseNot, 4u64), 1u64),
    );
    // 9 wraps to 1 at three bits
    let wraps = binary(BinaryOp::Equals, 9u64, 1u64);
    let fails = binary(BinaryOp::GreaterThan, 2u64, binary(BinaryOp::Add, 7u64, 4u64));
    for (cond, expected) in [(holds, 6), (wraps, 6), (fails, 1)] {
        let statement = Statement::if_then_else(
            cond.clone(),
            vec![Statement::assign(access("c"), AssignOp::Xor, 6u64)],
            vec![Statement::assign(access("c"), AssignOp::Xor, 1u64)],
        );
        let program = two_operand(3, 3, vec![statement]);
        for mode in MODES {
            let circuit = synthesize(mode, &program, None).unwrap();
            let state = run(&circuit, &[]);
            assert_eq!(read(&circuit, &state, "c"), expected, "{cond} {mode}");
        }
    }
}

#[test]
fn constant_operand_of_comparison_is_truncated() {
    // a < 8 + 3 compares against 3 once the constant takes a's width
    let statement = Statement::assign(
        access("c"),
        AssignOp::Xor,
        binary(BinaryOp::LessThan, var("a"), binary(BinaryOp::Add, 8u64, 3u64)),
    );
    let program = two_operand(3, 1, vec![statement]);
    for mode in MODES {
        let circuit = synthesize(mode, &program, None).unwrap();
        for a in 0..8u64 {
            let state = run(&circuit, &[("a", a)]);
            assert_eq!(read(&circuit, &state, "c"), u64::from(a < 3), "a={a} {mode}");
        }
    }
}

#[test]
fn unary_statements_and_swap() {
    let mut main = Module::new("main")
        .with_parameter(Variable::new("x", VariableRole::InOut, 3))
        .with_parameter(Variable::new("y", VariableRole::InOut, 3));
    main.statements = vec![
        Statement::unary(UnaryStatementOp::Increment, access("x")),
        Statement::unary(UnaryStatementOp::Invert, access("y")),
        Statement::swap(access("x"), access("y")),
        Statement::unary(UnaryStatementOp::Decrement, access("y").bits(0u64, 1u64)),
    ];
    let circuit = synthesize_line_aware(&Program::new().with_module(main)).unwrap();
    for x in 0..8u64 {
        let state = run(&circuit, &[("x", x), ("y", 2)]);
        assert_eq!(read(&circuit, &state, "x"), 5);
        let y = (x + 1) & 7;
        assert_eq!(read(&circuit, &state, "y"), (y & 4) | (((y & 3) + 3) & 3));
    }
}

// ---------------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------------

#[test]
fn conditional_on_comparison_uses_helper_line() {
    let condition = binary(BinaryOp::LessThan, var("a"), var("b"));
    let statement = Statement::if_then_else(
        condition,
        vec![Statement::assign(access("c"), AssignOp::Xor, var("a"))],
        vec![Statement::assign(access("c"), AssignOp::Xor, var("b"))],
    );
    let program = two_operand(3, 3, vec![statement]);
    for mode in MODES {
        let circuit = synthesize(mode, &program, None).unwrap();
        assert!(circuit.num_ancillae() >= 1);
        for a in 0..8 {
            for b in 0..8 {
                let state = run(&circuit, &[("a", a), ("b", b)]);
                assert_eq!(read(&circuit, &state, "c"), a.min(b), "a={a} b={b} {mode}");
                if mode == SynthesisMode::LineAware {
                    assert!(scratch_is_clean(&circuit, &state));
                }
            }
        }
    }
}

#[test]
fn condition_referenced_in_branch_is_copied() {
    let statement = Statement::if_then_else(
        Expression::Variable(access("a").bit(0u64)),
        vec![Statement::assign(access("c"), AssignOp::Add, var("a"))],
        vec![],
    );
    let program = two_operand(2, 2, vec![statement]);
    let circuit = synthesize_line_aware(&program).unwrap();
    assert_eq!(circuit.num_ancillae(), 1);
    for a in 0..4 {
        let state = run(&circuit, &[("a", a)]);
        let expected = if a & 1 == 1 { a } else { 0 };
        assert_eq!(read(&circuit, &state, "c"), expected);
        assert!(scratch_is_clean(&circuit, &state));
    }
}

#[test]
fn loops_bind_the_loop_variable() {
    let body = vec![Statement::assign(
        access("c").bit(Expression::loop_var("i")),
        AssignOp::Xor,
        Expression::Variable(
            access("a").bit(binary(BinaryOp::Subtract, 3u64, Expression::loop_var("i"))),
        ),
    )];
    let descending = ForLoop::new(Some("i"), 3u64, 0u64, body.clone())
        .with_step(binary(BinaryOp::Subtract, 0u64, 1u64));
    let program = two_operand(4, 4, vec![Statement::for_loop(descending)]);
    let circuit = synthesize_line_aware(&program).unwrap();
    assert_eq!(circuit.num_gates(), 4);
    let state = run(&circuit, &[("a", 0b0011)]);
    assert_eq!(read(&circuit, &state, "c"), 0b1100);

    let stepped = ForLoop::new(Some("i"), 0u64, 3u64, body).with_step(2u64);
    let program = two_operand(4, 4, vec![Statement::for_loop(stepped)]);
    assert_eq!(synthesize_line_aware(&program).unwrap().num_gates(), 2);
}

#[test]
fn loop_defaults_start_at_one() {
    let lp = ForLoop {
        variable: None,
        from: None,
        to: Expression::bitwidth_of("c"),
        step: None,
        body: vec![Statement::unary(UnaryStatementOp::Increment, access("c"))],
    };
    let program = two_operand(3, 3, vec![Statement::for_loop(lp)]);
    let circuit = synthesize_line_aware(&program).unwrap();
    let state = run(&circuit, &[]);
    assert_eq!(read(&circuit, &state, "c"), 3);
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

#[test]
fn decomposed_assignments_need_no_scratch() {
    let statements = vec![
        Statement::assign(access("c"), AssignOp::Add, binary(BinaryOp::Add, var("a"), var("b"))),
        Statement::assign(access("c"), AssignOp::Subtract, binary(BinaryOp::Subtract, var("a"), var("b"))),
        Statement::assign(access("c"), AssignOp::Xor, binary(BinaryOp::BitwiseXor, var("a"), var("b"))),
    ];
    let program = two_operand(3, 3, statements);
    let line_aware = synthesize_line_aware(&program).unwrap();
    let cost_aware = synthesize_cost_aware(&program).unwrap();
    assert_eq!(line_aware.num_lines(), 9);
    assert!(cost_aware.num_lines() >= line_aware.num_lines());

    for circuit in [&line_aware, &cost_aware] {
        for a in 0..8u64 {
            for b in 0..8u64 {
                let state = run(circuit, &[("a", a), ("b", b)]);
                let expected = ((a + b).wrapping_sub(a.wrapping_sub(b)) & 7) ^ a ^ b;
                assert_eq!(read(circuit, &state, "c"), expected);
            }
        }
    }
}

#[test]
fn cost_aware_trades_lines_for_gates() {
    let value = binary(BinaryOp::Multiply, var("a"), var("b"));
    let program = two_operand(3, 3, vec![Statement::assign(access("c"), AssignOp::Add, value)]);
    let line_aware = synthesize_line_aware(&program).unwrap();
    let cost_aware = synthesize_cost_aware(&program).unwrap();
    assert!(cost_aware.num_lines() >= line_aware.num_lines());
    assert!(cost_aware.num_gates() < line_aware.num_gates());
    assert_eq!(cost_aware.quantum_cost(), synthesize_cost_aware(&program).unwrap().quantum_cost());
}

#[test]
fn entry_declarations_become_registers() {
    let program = two_operand(2, 2, vec![]);
    let circuit = synthesize_line_aware(&program).unwrap();
    let names: Vec<&str> = circuit.registers().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(circuit.name(), "main");
    assert_eq!(circuit.lines()[4].input, "c.0");
    assert_eq!(circuit.lines()[4].constant, Some(false));
    assert_eq!(circuit.lines()[0].constant, None);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

fn error_kind(statements: Vec<Statement>) -> SemanticErrorKind {
    let program = two_operand(3, 3, statements);
    synthesize_line_aware(&program)
        .unwrap_err()
        .kind()
        .expect("semantic error")
}

#[test]
fn semantic_errors() {
    let xor = |target: VariableAccess, value: Expression| Statement::assign(target, AssignOp::Xor, value);
    assert_eq!(
        error_kind(vec![xor(access("c"), var("z"))]),
        SemanticErrorKind::UndeclaredIdentifier
    );
    assert_eq!(
        error_kind(vec![xor(access("c"), Expression::Variable(access("a").bit(0u64)))]),
        SemanticErrorKind::BitWidthMismatch
    );
    assert_eq!(
        error_kind(vec![xor(access("c"), var("c"))]),
        SemanticErrorKind::OverlappingAccess
    );
    assert_eq!(
        error_kind(vec![xor(access("c").bit(3u64), Expression::Variable(access("a").bit(0u64)))]),
        SemanticErrorKind::IndexOutOfRange
    );
    assert_eq!(
        error_kind(vec![xor(access("c"), binary(BinaryOp::ShiftLeft, var("a"), var("b")))]),
        SemanticErrorKind::NonConstantExpression
    );
    assert_eq!(
        error_kind(vec![Statement::swap(access("a"), access("c").bits(0u64, 1u64))]),
        SemanticErrorKind::BitWidthMismatch
    );
    assert_eq!(
        error_kind(vec![Statement::for_loop(ForLoop::new(None, 0u64, var("a"), vec![]))]),
        SemanticErrorKind::NonConstantLoopBound
    );
    assert_eq!(
        error_kind(vec![Statement::for_loop(ForLoop::new(None, 0u64, 3u64, vec![]).with_step(0u64))]),
        SemanticErrorKind::InconsistentLoopStep
    );
    assert_eq!(
        error_kind(vec![Statement::for_loop(ForLoop::new(None, 5u64, 3u64, vec![]))]),
        SemanticErrorKind::InconsistentLoopStep
    );
    assert_eq!(
        error_kind(vec![Statement::if_then_else(var("a"), vec![], vec![])]),
        SemanticErrorKind::BitWidthMismatch
    );
}

#[test]
fn errors_name_the_innermost_statement() {
    let inner = Statement::assign(access("c"), AssignOp::Xor, var("z")).at_line(7);
    let lp = ForLoop::new(Some("i"), 0u64, 1u64, vec![inner]);
    let program = two_operand(3, 3, vec![Statement::for_loop(lp).at_line(6)]);
    let err = synthesize_line_aware(&program).unwrap_err();
    let statement = err.statement().expect("attributed");
    assert_eq!(statement.module, "main");
    assert_eq!(statement.line, Some(7));
    assert_eq!(statement.statement, "c ^= z");
    assert!(err.to_string().contains("line 7"));
}

#[test]
fn missing_entry_is_reported() {
    let program = two_operand(1, 1, vec![]);
    let err = synthesize(SynthesisMode::LineAware, &program, Some("other")).unwrap_err();
    assert_eq!(err.kind(), Some(SemanticErrorKind::UndeclaredIdentifier));
    let err = synthesize_line_aware(&Program::new()).unwrap_err();
    assert_eq!(err.kind(), Some(SemanticErrorKind::MissingEntryModule));
}
