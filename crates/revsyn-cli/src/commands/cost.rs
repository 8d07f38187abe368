//! Cost command implementation.

use anyhow::Result;
use console::style;

use revsyn_ir::Circuit;
use revsyn_synth::{SynthesisMode, synthesize};

use super::common::load_program;

/// Execute the cost command.
pub fn execute(input: &str, entry: Option<&str>) -> Result<()> {
    println!(
        "{} Comparing synthesis modes for {}",
        style("→").cyan().bold(),
        style(input).green()
    );
    let program = load_program(input)?;

    println!(
        "  {:<12} {:>6} {:>9} {:>6} {:>13} {:>16}",
        "mode", "lines", "ancillae", "gates", "quantum cost", "transistor cost"
    );
    for mode in SynthesisMode::ALL {
        let circuit = synthesize(mode, &program, entry)?;
        print_row(mode, &circuit);
    }

    Ok(())
}

fn print_row(mode: SynthesisMode, circuit: &Circuit) {
    println!(
        "  {:<12} {:>6} {:>9} {:>6} {:>13} {:>16}",
        style(mode).yellow(),
        circuit.num_lines(),
        circuit.num_ancillae(),
        circuit.num_gates(),
        circuit.quantum_cost(),
        circuit.transistor_cost()
    );
}
