//! Gate emission under a stack of active controls.

use revsyn_ir::{Gate, LineId};

/// Order in which a recorded gate sequence is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// As recorded.
    Forward,
    /// Reversed, with every gate replaced by its inverse.
    Inverse,
}

#[derive(Debug, Clone)]
struct Detached {
    gates: Vec<Gate>,
    controls: Vec<LineId>,
}

/// Collects gates, adding the active controls to each one.
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    gates: Vec<Gate>,
    controls: Vec<LineId>,
    detached: Vec<Detached>,
}

impl Emitter {
    /// Create an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a gate, controlled by every active control.
    pub fn emit(&mut self, gate: Gate) {
        let gate = if self.controls.is_empty() {
            gate
        } else {
            gate.controlled_by(self.controls.iter().copied())
        };
        self.gates.push(gate);
    }

    /// NOT gate on `target`.
    pub fn not(&mut self, target: LineId) {
        self.emit(Gate::not(target));
    }

    /// CNOT gate.
    pub fn cnot(&mut self, control: LineId, target: LineId) {
        self.emit(Gate::cnot(control, target));
    }

    /// Toffoli gate with two controls.
    pub fn ccnot(&mut self, a: LineId, b: LineId, target: LineId) {
        self.emit(Gate::toffoli([a, b], target));
    }

    /// Replay `gates` in the given direction.
    pub fn emit_sequence(&mut self, gates: &[Gate], direction: Direction) {
        match direction {
            Direction::Forward => {
                for gate in gates {
                    self.emit(gate.clone());
                }
            }
            Direction::Inverse => {
                for gate in gates.iter().rev() {
                    self.emit(gate.inverse());
                }
            }
        }
    }

    /// Push an active control.
    pub fn push_control(&mut self, line: LineId) {
        self.controls.push(line);
    }

    /// Pop the most recent active control.
    pub fn pop_control(&mut self) -> Option<LineId> {
        self.controls.pop()
    }

    /// Run `f` with extra active controls.
    pub fn controlled<R>(&mut self, lines: &[LineId], f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.controls.len();
        self.controls.extend_from_slice(lines);
        let result = f(self);
        self.controls.truncate(depth);
        result
    }

    /// Currently active controls.
    pub fn controls(&self) -> &[LineId] {
        &self.controls
    }

    /// Position of the next gate.
    pub fn mark(&self) -> usize {
        self.gates.len()
    }

    /// Undo the gates in `start..end` by appending their inverses in reverse.
    ///
    /// The recorded gates already carry the controls that were active when
    /// they were emitted, so the inverses are appended unchanged.
    pub fn uncompute(&mut self, start: usize, end: usize) {
        let end = end.min(self.gates.len());
        if start >= end {
            return;
        }
        let inverses: Vec<Gate> = self.gates[start..end].iter().rev().map(Gate::inverse).collect();
        self.gates.extend(inverses);
    }

    /// Start a detached block: following gates go to a fresh buffer and no
    /// controls are active.
    pub fn begin_block(&mut self) {
        self.detached.push(Detached {
            gates: std::mem::take(&mut self.gates),
            controls: std::mem::take(&mut self.controls),
        });
    }

    /// Finish the innermost detached block and return its gates.
    pub fn end_block(&mut self) -> Vec<Gate> {
        match self.detached.pop() {
            Some(outer) => {
                self.controls = outer.controls;
                std::mem::replace(&mut self.gates, outer.gates)
            }
            None => std::mem::take(&mut self.gates),
        }
    }

    /// Gates emitted so far.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Take the emitted gates.
    pub fn into_gates(self) -> Vec<Gate> {
        self.gates
    }
}
