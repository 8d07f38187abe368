//! Textual export formats: RevLib `.real` and an OpenQASM 2 listing.

use std::fmt::{self, Write};

use crate::circuit::Circuit;
use crate::error::IrResult;
use crate::gate::{Gate, GateKind};
use crate::line::{LineId, LineRole};

/// Options for the `.real` writer.
#[derive(Debug, Clone)]
pub struct RealOptions {
    /// Format version written to the `.version` header.
    pub version: String,
    /// Emit `.inputbus` / `.outputbus` lines for registers.
    pub write_buses: bool,
    /// Optional comment placed before the header.
    pub header: Option<String>,
}

impl Default for RealOptions {
    fn default() -> Self {
        Self {
            version: "2.0".into(),
            write_buses: true,
            header: None,
        }
    }
}

fn variable(line: LineId) -> String {
    format!("x{}", line.0)
}

/// Serialize a circuit in the RevLib `.real` format.
pub fn to_real(circuit: &Circuit, options: &RealOptions) -> IrResult<String> {
    let mut out = String::new();
    write_real(&mut out, circuit, options)?;
    Ok(out)
}

/// Write a circuit in the RevLib `.real` format to `out`.
pub fn write_real(out: &mut impl Write, circuit: &Circuit, options: &RealOptions) -> fmt::Result {
    if let Some(header) = &options.header {
        for line in header.lines() {
            writeln!(out, "# {line}")?;
        }
    }

    let variables: Vec<String> = circuit.lines().iter().map(|l| variable(l.id)).collect();
    let inputs: Vec<&str> = circuit.inputs().collect();
    let outputs: Vec<&str> = circuit.outputs().collect();
    let constants: String = circuit
        .constants()
        .map(|c| match c {
            Some(true) => '1',
            Some(false) => '0',
            None => '-',
        })
        .collect();
    let garbage: String = circuit
        .garbage()
        .map(|g| if g { '1' } else { '-' })
        .collect();

    writeln!(out, ".version {}", options.version)?;
    writeln!(out, ".numvars {}", circuit.num_lines())?;
    writeln!(out, ".variables {}", variables.join(" "))?;
    writeln!(out, ".inputs {}", inputs.join(" "))?;
    writeln!(out, ".outputs {}", outputs.join(" "))?;
    writeln!(out, ".constants {constants}")?;
    writeln!(out, ".garbage {garbage}")?;

    if options.write_buses {
        for register in circuit.registers() {
            let lines: Vec<String> = register.lines.iter().map(|&l| variable(l)).collect();
            let lines = lines.join(" ");
            if matches!(
                register.role,
                LineRole::Input | LineRole::InOut | LineRole::State
            ) {
                writeln!(out, ".inputbus {} {lines}", register.name)?;
            }
            if matches!(
                register.role,
                LineRole::Output | LineRole::InOut | LineRole::State
            ) {
                writeln!(out, ".outputbus {} {lines}", register.name)?;
            }
        }
    }

    out.write_str(".begin\n")?;
    for gate in circuit.gates() {
        let command = match gate.kind() {
            GateKind::Toffoli => format!("t{}", gate.size()),
            GateKind::Fredkin => format!("f{}", gate.size()),
            GateKind::Peres => format!("p{}", gate.size()),
            GateKind::InversePeres => format!("pi{}", gate.size()),
        };
        let operands: Vec<String> = gate.lines().map(variable).collect();
        writeln!(out, "{command} {}", operands.join(" "))?;
    }
    out.write_str(".end\n")
}

fn qasm_stage(out: &mut impl Write, controls: &[LineId], target: LineId) -> fmt::Result {
    let prefix = "c".repeat(controls.len());
    let mut operands: Vec<String> = controls.iter().map(|c| format!("q[{}]", c.0)).collect();
    operands.push(format!("q[{}]", target.0));
    writeln!(out, "{prefix}x {};", operands.join(", "))
}

fn qasm_gate(out: &mut impl Write, gate: &Gate) -> fmt::Result {
    let controls: Vec<LineId> = gate.controls().iter().copied().collect();
    let targets = gate.targets();
    match gate.kind() {
        GateKind::Toffoli => qasm_stage(out, &controls, targets[0]),
        GateKind::Fredkin => {
            let prefix = "c".repeat(controls.len());
            let mut operands: Vec<String> =
                controls.iter().map(|c| format!("q[{}]", c.0)).collect();
            operands.extend(targets.iter().map(|t| format!("q[{}]", t.0)));
            writeln!(out, "{prefix}swap {};", operands.join(", "))
        }
        GateKind::Peres => {
            let mut wide = controls.clone();
            wide.push(targets[0]);
            qasm_stage(out, &wide, targets[1])?;
            qasm_stage(out, &controls, targets[0])
        }
        GateKind::InversePeres => {
            qasm_stage(out, &controls, targets[0])?;
            let mut wide = controls.clone();
            wide.push(targets[0]);
            qasm_stage(out, &wide, targets[1])
        }
    }
}

/// Serialize a circuit as an OpenQASM 2 listing with multi-controlled gates.
pub fn to_qasm(circuit: &Circuit) -> IrResult<String> {
    let mut out = String::new();
    write_qasm(&mut out, circuit)?;
    Ok(out)
}

/// Write a circuit as an OpenQASM 2 listing to `out`.
pub fn write_qasm(out: &mut impl Write, circuit: &Circuit) -> fmt::Result {
    out.write_str("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n")?;
    writeln!(out, "// circuit: {}", circuit.name())?;
    writeln!(out, "qreg q[{}];", circuit.num_lines())?;
    for gate in circuit.gates() {
        qasm_gate(out, gate)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;

    fn sample() -> Circuit {
        let mut builder = CircuitBuilder::new("sample");
        builder.add_register("a", LineRole::Input, 1).unwrap();
        builder.add_register("c", LineRole::Output, 1).unwrap();
        builder.add_ancilla().unwrap();
        builder
            .cnot(LineId(0), LineId(1))
            .unwrap()
            .fredkin([LineId(0)], LineId(1), LineId(2))
            .unwrap()
            .append(Gate::peres([LineId(0)], LineId(1), LineId(2)))
            .unwrap();
        builder.finish()
    }

    #[test]
    fn test_real_header() {
        let real = to_real(&sample(), &RealOptions::default()).unwrap();
        let lines: Vec<&str> = real.lines().collect();
        assert_eq!(lines[0], ".version 2.0");
        assert_eq!(lines[1], ".numvars 3");
        assert_eq!(lines[2], ".variables x0 x1 x2");
        assert_eq!(lines[3], ".inputs a.0 c.0 const_0");
        assert_eq!(lines[4], ".outputs a.0 c.0 garbage");
        assert_eq!(lines[5], ".constants -00");
        assert_eq!(lines[6], ".garbage 1-1");
        assert_eq!(lines[7], ".inputbus a x0");
        assert_eq!(lines[8], ".outputbus c x1");
    }

    #[test]
    fn test_real_gates() {
        let real = to_real(&sample(), &RealOptions::default()).unwrap();
        let body: Vec<&str> = real
            .lines()
            .skip_while(|l| *l != ".begin")
            .collect();
        assert_eq!(body, vec![".begin", "t2 x0 x1", "f3 x0 x1 x2", "p3 x0 x1 x2", ".end"]);
    }

    #[test]
    fn test_real_header_comment() {
        let options = RealOptions {
            header: Some("generated".into()),
            write_buses: false,
            ..RealOptions::default()
        };
        let real = to_real(&sample(), &options).unwrap();
        assert!(real.starts_with("# generated\n.version 2.0\n"));
        assert!(!real.contains(".inputbus"));
    }

    #[test]
    fn test_qasm_listing() {
        let qasm = to_qasm(&sample()).unwrap();
        assert!(qasm.contains("qreg q[3];"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("cswap q[0], q[1], q[2];"));
        // Peres: Toffoli stage then CNOT stage
        assert!(qasm.contains("ccx q[0], q[1], q[2];\ncx q[0], q[1];"));
    }

    /// Accepts a fixed number of bytes, then fails.
    struct Limited {
        written: String,
        capacity: usize,
    }

    impl Write for Limited {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if self.written.len() + s.len() > self.capacity {
                return Err(fmt::Error);
            }
            self.written.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_propagate() {
        let mut out = Limited {
            written: String::new(),
            capacity: 20,
        };
        assert_eq!(write_real(&mut out, &sample(), &RealOptions::default()), Err(fmt::Error));
        assert_eq!(out.written, ".version 2.0\n");

        let mut out = Limited {
            written: String::new(),
            capacity: 40,
        };
        assert!(write_qasm(&mut out, &sample()).is_err());
        assert!(out.written.starts_with("OPENQASM 2.0;"));

        let err = crate::IrError::from(fmt::Error);
        assert!(err.to_string().starts_with("Failed to write circuit"));
    }
}
