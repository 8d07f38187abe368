//! Circuit lines, their metadata and named registers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a line within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineId(pub u32);

impl LineId {
    /// Position of the line in the circuit's line table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<u32> for LineId {
    fn from(id: u32) -> Self {
        LineId(id)
    }
}

/// The part a line plays in the circuit interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineRole {
    /// Primary input, output is garbage.
    Input,
    /// Primary output, input is constant 0.
    Output,
    /// Both input and output.
    InOut,
    /// Internal wire, constant 0 in and garbage out.
    Wire,
    /// Internal state carried through the circuit.
    State,
    /// Scratch line introduced during synthesis.
    Ancilla,
}

impl LineRole {
    /// Constant input value implied by the role, if any.
    pub fn default_constant(self) -> Option<bool> {
        match self {
            LineRole::Output | LineRole::Wire | LineRole::Ancilla => Some(false),
            LineRole::Input | LineRole::InOut | LineRole::State => None,
        }
    }

    /// Whether the output of a line with this role is garbage.
    pub fn default_garbage(self) -> bool {
        matches!(self, LineRole::Input | LineRole::Wire | LineRole::Ancilla)
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            LineRole::Input => "in",
            LineRole::Output => "out",
            LineRole::InOut => "inout",
            LineRole::Wire => "wire",
            LineRole::State => "state",
            LineRole::Ancilla => "ancilla",
        }
    }
}

impl fmt::Display for LineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A circuit line with its interface metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    /// The unique identifier.
    pub id: LineId,
    /// The role the line plays.
    pub role: LineRole,
    /// Name of the line at the circuit input.
    pub input: String,
    /// Name of the line at the circuit output.
    pub output: String,
    /// Constant input value, `None` if the input is free.
    pub constant: Option<bool>,
    /// Whether the output value is garbage.
    pub garbage: bool,
}

impl Line {
    /// Create a line whose metadata is derived from its role.
    pub fn new(id: LineId, role: LineRole, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            role,
            input: name.clone(),
            output: name,
            constant: role.default_constant(),
            garbage: role.default_garbage(),
        }
    }

    /// Create a scratch line: constant 0 input, garbage output.
    pub fn ancilla(id: LineId) -> Self {
        Self {
            id,
            role: LineRole::Ancilla,
            input: "const_0".into(),
            output: "garbage".into(),
            constant: Some(false),
            garbage: true,
        }
    }

    /// Whether the input of this line is fixed.
    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.id, self.role, self.input)
    }
}

/// A named group of lines, one per declared variable (LSB first).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    /// Variable name.
    pub name: String,
    /// Role of every line in the register.
    pub role: LineRole,
    /// Lines, least significant bit first.
    pub lines: Vec<LineId>,
}

impl Register {
    /// Number of lines in the register.
    pub fn width(&self) -> usize {
        self.lines.len()
    }
}
