//! Forward simulation of reversible circuits over classical bits.

use revsyn_ir::{Circuit, Gate, GateKind, LineId};

use crate::error::{SimError, SimResult};

/// Apply one gate to `state` in place.
///
/// The gate acts only when every control line holds 1. Lines outside
/// `state` are treated as 0.
pub fn apply_gate(state: &mut [bool], gate: &Gate) {
    let bit = |state: &[bool], line: LineId| state.get(line.index()).copied().unwrap_or(false);
    if !gate.controls().iter().all(|&c| bit(state, c)) {
        return;
    }
    let targets = gate.targets();
    match gate.kind() {
        GateKind::Toffoli => flip(state, targets[0].index()),
        GateKind::Fredkin => {
            let (a, b) = (targets[0].index(), targets[1].index());
            if a < state.len() && b < state.len() {
                state.swap(a, b);
            }
        }
        GateKind::Peres => {
            let (t1, t2) = (targets[0], targets[1]);
            if bit(state, t1) {
                flip(state, t2.index());
            }
            flip(state, t1.index());
        }
        GateKind::InversePeres => {
            let (t1, t2) = (targets[0], targets[1]);
            flip(state, t1.index());
            if bit(state, t1) {
                flip(state, t2.index());
            }
        }
    }
}

fn flip(state: &mut [bool], index: usize) {
    if let Some(b) = state.get_mut(index) {
        *b = !*b;
    }
}

/// Run `circuit` on `input`, one bit per line, and return the output bits.
pub fn simulate(circuit: &Circuit, input: &[bool]) -> SimResult<Vec<bool>> {
    if input.len() != circuit.num_lines() {
        return Err(SimError::WidthMismatch {
            expected: circuit.num_lines(),
            got: input.len(),
        });
    }
    let mut state = input.to_vec();
    for gate in circuit.gates() {
        apply_gate(&mut state, gate);
    }
    Ok(state)
}

/// The `width` low bits of `value`, least significant first.
pub fn bits_from_value(value: u64, width: usize) -> Vec<bool> {
    (0..width)
        .map(|i| i < 64 && (value >> i) & 1 == 1)
        .collect()
}

/// Integer value of `bits`, least significant first. Bits past 64 are ignored.
pub fn value_from_bits(bits: &[bool]) -> u64 {
    bits.iter()
        .take(64)
        .enumerate()
        .fold(0, |acc, (i, &b)| acc | (u64::from(b) << i))
}
