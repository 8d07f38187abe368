//! Input assignments by register name.

use revsyn_ir::Circuit;

use crate::error::{SimError, SimResult};
use crate::simulator::{bits_from_value, value_from_bits};

/// A full input assignment for a circuit, built register by register.
///
/// Constant lines start at their constant value, every other line at 0.
#[derive(Debug, Clone)]
pub struct Assignment<'c> {
    circuit: &'c Circuit,
    bits: Vec<bool>,
}

impl<'c> Assignment<'c> {
    /// Assignment with only the constant lines set.
    pub fn new(circuit: &'c Circuit) -> Self {
        let bits = circuit
            .constants()
            .map(|constant| constant.unwrap_or(false))
            .collect();
        Self { circuit, bits }
    }

    /// Set register `name` to `value`.
    pub fn set(&mut self, name: &str, value: u64) -> SimResult<&mut Self> {
        let register = self
            .circuit
            .register(name)
            .ok_or_else(|| SimError::UnknownRegister(name.to_string()))?;
        let width = register.width();
        if width < 64 && value >> width != 0 {
            return Err(SimError::ValueTooWide {
                register: name.to_string(),
                width,
                value,
            });
        }
        for (line, bit) in register.lines.iter().zip(bits_from_value(value, width)) {
            self.bits[line.index()] = bit;
        }
        Ok(self)
    }

    /// Set several registers at once.
    pub fn with_values<'a>(
        mut self,
        values: impl IntoIterator<Item = (&'a str, u64)>,
    ) -> SimResult<Self> {
        for (name, value) in values {
            self.set(name, value)?;
        }
        Ok(self)
    }

    /// The assignment as one bit per line.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Take the bits.
    pub fn into_bits(self) -> Vec<bool> {
        self.bits
    }
}

/// Value of register `name` in `state`.
pub fn read_register(circuit: &Circuit, state: &[bool], name: &str) -> SimResult<u64> {
    let register = circuit
        .register(name)
        .ok_or_else(|| SimError::UnknownRegister(name.to_string()))?;
    let bits: Vec<bool> = register
        .lines
        .iter()
        .map(|line| state.get(line.index()).copied().unwrap_or(false))
        .collect();
    Ok(value_from_bits(&bits))
}
