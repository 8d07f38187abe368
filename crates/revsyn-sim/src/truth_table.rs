//! Exhaustive truth tables over the free inputs of a circuit.

use revsyn_ir::{Circuit, LineId};
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::simulator::{apply_gate, bits_from_value};

/// Largest number of free inputs [`truth_table`] enumerates.
pub const MAX_FREE_INPUTS: usize = 20;

/// One simulated assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Input bits, one per line.
    pub input: Vec<bool>,
    /// Output bits, one per line.
    pub output: Vec<bool>,
}

/// Outputs for every assignment of the non-constant input lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruthTable {
    free_lines: Vec<LineId>,
    rows: Vec<Row>,
}

impl TruthTable {
    /// Lines whose input varies across rows, in enumeration order.
    pub fn free_lines(&self) -> &[LineId] {
        &self.free_lines
    }

    /// Rows ordered by the free inputs read as a binary number, first free
    /// line least significant.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether distinct inputs always produce distinct outputs.
    pub fn is_injective(&self) -> bool {
        let mut seen = FxHashSet::default();
        self.rows.iter().all(|row| seen.insert(row.output.as_slice()))
    }
}

/// Enumerate all assignments of the free input lines of `circuit`.
///
/// Constant lines are fixed to their constant value.
pub fn truth_table(circuit: &Circuit) -> SimResult<TruthTable> {
    let free_lines: Vec<LineId> = circuit
        .lines()
        .iter()
        .filter(|line| !line.is_constant())
        .map(|line| line.id)
        .collect();
    if free_lines.len() > MAX_FREE_INPUTS {
        return Err(SimError::TooManyInputs {
            got: free_lines.len(),
            limit: MAX_FREE_INPUTS,
        });
    }
    debug!(
        circuit = circuit.name(),
        free_inputs = free_lines.len(),
        "enumerating truth table"
    );

    let base: Vec<bool> = circuit.constants().map(|c| c.unwrap_or(false)).collect();
    let rows = (0..1u64 << free_lines.len())
        .map(|assignment| {
            let mut input = base.clone();
            for (line, bit) in free_lines
                .iter()
                .zip(bits_from_value(assignment, free_lines.len()))
            {
                input[line.index()] = bit;
            }
            let mut output = input.clone();
            for gate in circuit.gates() {
                apply_gate(&mut output, gate);
            }
            Row { input, output }
        })
        .collect();

    Ok(TruthTable { free_lines, rows })
}
