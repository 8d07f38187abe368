//! Reversible gate types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::line::LineId;

/// Elementary reversible gate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Multi-controlled NOT: flips its target when all controls hold 1.
    Toffoli,
    /// Multi-controlled swap: exchanges its two targets when all controls hold 1.
    Fredkin,
    /// Controlled `t2 ^= t1` followed by flipping `t1`.
    Peres,
    /// Controlled flip of `t1` followed by `t2 ^= t1`.
    InversePeres,
}

impl GateKind {
    /// Get the name of this gate kind.
    pub fn name(self) -> &'static str {
        match self {
            GateKind::Toffoli => "toffoli",
            GateKind::Fredkin => "fredkin",
            GateKind::Peres => "peres",
            GateKind::InversePeres => "peres_inv",
        }
    }

    /// Number of target lines the kind acts on.
    pub fn num_targets(self) -> usize {
        match self {
            GateKind::Toffoli => 1,
            GateKind::Fredkin | GateKind::Peres | GateKind::InversePeres => 2,
        }
    }

    /// Whether applying the gate twice is the identity.
    pub fn is_self_inverse(self) -> bool {
        match self {
            GateKind::Toffoli | GateKind::Fredkin => true,
            GateKind::Peres | GateKind::InversePeres => false,
        }
    }

    /// The kind undoing this one.
    pub fn inverse(self) -> GateKind {
        match self {
            GateKind::Toffoli => GateKind::Toffoli,
            GateKind::Fredkin => GateKind::Fredkin,
            GateKind::Peres => GateKind::InversePeres,
            GateKind::InversePeres => GateKind::Peres,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reversible gate: a kind, a set of control lines and ordered targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gate {
    kind: GateKind,
    controls: BTreeSet<LineId>,
    targets: Vec<LineId>,
}

impl Gate {
    /// Create a multi-controlled NOT gate.
    pub fn toffoli(controls: impl IntoIterator<Item = LineId>, target: LineId) -> Self {
        Self {
            kind: GateKind::Toffoli,
            controls: controls.into_iter().collect(),
            targets: vec![target],
        }
    }

    /// Create a multi-controlled swap gate.
    pub fn fredkin(controls: impl IntoIterator<Item = LineId>, a: LineId, b: LineId) -> Self {
        Self {
            kind: GateKind::Fredkin,
            controls: controls.into_iter().collect(),
            targets: vec![a, b],
        }
    }

    /// Create a Peres gate.
    pub fn peres(controls: impl IntoIterator<Item = LineId>, t1: LineId, t2: LineId) -> Self {
        Self {
            kind: GateKind::Peres,
            controls: controls.into_iter().collect(),
            targets: vec![t1, t2],
        }
    }

    /// Uncontrolled NOT.
    pub fn not(target: LineId) -> Self {
        Self::toffoli([], target)
    }

    /// Controlled NOT.
    pub fn cnot(control: LineId, target: LineId) -> Self {
        Self::toffoli([control], target)
    }

    /// Uncontrolled swap.
    pub fn swap(a: LineId, b: LineId) -> Self {
        Self::fredkin([], a, b)
    }

    /// Get the gate kind.
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Get the control lines.
    pub fn controls(&self) -> &BTreeSet<LineId> {
        &self.controls
    }

    /// Get the target lines.
    pub fn targets(&self) -> &[LineId] {
        &self.targets
    }

    /// Number of control lines.
    pub fn num_controls(&self) -> usize {
        self.controls.len()
    }

    /// Total number of lines the gate touches.
    pub fn size(&self) -> usize {
        self.controls.len() + self.targets.len()
    }

    /// Iterate over controls then targets.
    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.controls.iter().copied().chain(self.targets.iter().copied())
    }

    /// Whether the gate reads or writes `line`.
    pub fn touches(&self, line: LineId) -> bool {
        self.controls.contains(&line) || self.targets.contains(&line)
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Whether this gate is its own inverse.
    pub fn is_self_inverse(&self) -> bool {
        self.kind.is_self_inverse()
    }

    /// The gate undoing this one on the same lines.
    #[must_use]
    pub fn inverse(&self) -> Gate {
        Gate {
            kind: self.kind.inverse(),
            controls: self.controls.clone(),
            targets: self.targets.clone(),
        }
    }

    /// Add further control lines.
    #[must_use]
    pub fn controlled_by(mut self, extra: impl IntoIterator<Item = LineId>) -> Gate {
        self.controls.extend(extra);
        self
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if !self.controls.is_empty() {
            let controls: Vec<String> = self.controls.iter().map(ToString::to_string).collect();
            write!(f, "[{}]", controls.join(", "))?;
        }
        let targets: Vec<String> = self.targets.iter().map(ToString::to_string).collect();
        write!(f, "({})", targets.join(", "))
    }
}
