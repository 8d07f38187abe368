//! Reversible circuits and the builder used to assemble them.

use serde::Serialize;

use crate::cost;
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::line::{Line, LineId, LineRole, Register};

/// A reversible circuit with a fixed set of lines and an ordered gate list.
///
/// Circuits are produced by [`CircuitBuilder::finish`] and are immutable
/// afterwards: every gate references lines below [`Circuit::num_lines`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Circuit {
    name: String,
    lines: Vec<Line>,
    registers: Vec<Register>,
    gates: Vec<Gate>,
}

impl Circuit {
    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of lines.
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Get the number of gates.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Get all lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Get a line by id.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id.index())
    }

    /// Get the gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get the named registers.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Look up a register by name.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name == name)
    }

    /// Names of the lines at the circuit input.
    pub fn inputs(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.input.as_str())
    }

    /// Names of the lines at the circuit output.
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.output.as_str())
    }

    /// Constant input values, `None` for free inputs.
    pub fn constants(&self) -> impl Iterator<Item = Option<bool>> + '_ {
        self.lines.iter().map(|l| l.constant)
    }

    /// Garbage flags of the outputs.
    pub fn garbage(&self) -> impl Iterator<Item = bool> + '_ {
        self.lines.iter().map(|l| l.garbage)
    }

    /// Number of scratch lines.
    pub fn num_ancillae(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.role == LineRole::Ancilla)
            .count()
    }

    /// Quantum cost of the circuit.
    pub fn quantum_cost(&self) -> u64 {
        cost::quantum_cost(self)
    }

    /// Transistor cost of the circuit.
    pub fn transistor_cost(&self) -> u64 {
        cost::transistor_cost(self)
    }
}

/// Incremental, append-only construction of a [`Circuit`].
#[derive(Debug, Clone, Default)]
pub struct CircuitBuilder {
    name: String,
    lines: Vec<Line>,
    registers: Vec<Register>,
    gates: Vec<Gate>,
}

impl CircuitBuilder {
    /// Create a new empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn next_id(&self) -> IrResult<LineId> {
        u32::try_from(self.lines.len())
            .map(LineId)
            .map_err(|_| IrError::TooManyLines)
    }

    /// Add a line with metadata derived from its role.
    pub fn add_line(&mut self, role: LineRole, name: impl Into<String>) -> IrResult<LineId> {
        let id = self.next_id()?;
        self.lines.push(Line::new(id, role, name));
        Ok(id)
    }

    /// Add a constant-0 scratch line with garbage output.
    pub fn add_ancilla(&mut self) -> IrResult<LineId> {
        let id = self.next_id()?;
        self.lines.push(Line::ancilla(id));
        Ok(id)
    }

    /// Add a register of `width` fresh lines named `name.0`, `name.1`, ...
    pub fn add_register(
        &mut self,
        name: impl Into<String>,
        role: LineRole,
        width: usize,
    ) -> IrResult<Vec<LineId>> {
        let name = name.into();
        if self.registers.iter().any(|r| r.name == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        let mut ids = Vec::with_capacity(width);
        for bit in 0..width {
            ids.push(self.add_line(role, format!("{name}.{bit}"))?);
        }
        self.registers.push(Register {
            name,
            role,
            lines: ids.clone(),
        });
        Ok(ids)
    }

    /// Record a register over lines that already exist.
    pub fn name_register(
        &mut self,
        name: impl Into<String>,
        role: LineRole,
        lines: Vec<LineId>,
    ) -> IrResult<()> {
        let name = name.into();
        if self.registers.iter().any(|r| r.name == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        for &line in &lines {
            self.check_line(line, None)?;
        }
        self.registers.push(Register { name, role, lines });
        Ok(())
    }

    /// Get the number of lines added so far.
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Get the number of gates appended so far.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Get a line by id.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id.index())
    }

    fn check_line(&self, line: LineId, gate_name: Option<&str>) -> IrResult<()> {
        if line.index() < self.lines.len() {
            Ok(())
        } else {
            Err(IrError::LineNotFound {
                line,
                num_lines: self.lines.len(),
                gate_name: gate_name.map(String::from),
            })
        }
    }

    /// Append a gate after validating its lines.
    pub fn append(&mut self, gate: Gate) -> IrResult<&mut Self> {
        let name = gate.name();
        let expected = gate.kind().num_targets();
        if gate.targets().len() != expected {
            return Err(IrError::TargetCountMismatch {
                gate_name: name.to_string(),
                expected,
                got: gate.targets().len(),
            });
        }
        for line in gate.lines() {
            self.check_line(line, Some(name))?;
        }
        for (i, &target) in gate.targets().iter().enumerate() {
            if gate.controls().contains(&target) || gate.targets()[..i].contains(&target) {
                return Err(IrError::DuplicateLine {
                    line: target,
                    gate_name: Some(name.to_string()),
                });
            }
        }
        self.gates.push(gate);
        Ok(self)
    }

    /// Append every gate of a sequence in order.
    pub fn extend(&mut self, gates: impl IntoIterator<Item = Gate>) -> IrResult<&mut Self> {
        for gate in gates {
            self.append(gate)?;
        }
        Ok(self)
    }

    // =========================================================================
    // Convenience gates
    // =========================================================================

    /// Append a NOT gate.
    pub fn not(&mut self, target: LineId) -> IrResult<&mut Self> {
        self.append(Gate::not(target))
    }

    /// Append a CNOT gate.
    pub fn cnot(&mut self, control: LineId, target: LineId) -> IrResult<&mut Self> {
        self.append(Gate::cnot(control, target))
    }

    /// Append a multi-controlled Toffoli gate.
    pub fn toffoli(
        &mut self,
        controls: impl IntoIterator<Item = LineId>,
        target: LineId,
    ) -> IrResult<&mut Self> {
        self.append(Gate::toffoli(controls, target))
    }

    /// Append a multi-controlled Fredkin gate.
    pub fn fredkin(
        &mut self,
        controls: impl IntoIterator<Item = LineId>,
        a: LineId,
        b: LineId,
    ) -> IrResult<&mut Self> {
        self.append(Gate::fredkin(controls, a, b))
    }

    /// Freeze the builder into an immutable circuit.
    pub fn finish(self) -> Circuit {
        Circuit {
            name: self.name,
            lines: self.lines,
            registers: self.registers,
            gates: self.gates,
        }
    }
}
