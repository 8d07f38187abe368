//! Version command implementation.

use console::style;

use revsyn_synth::SynthesisMode;

/// Output formats accepted by `synth -o`, keyed by file extension.
pub const OUTPUT_FORMATS: [(&str, &str); 3] = [
    ("real", "RevLib circuit with input and output buses"),
    ("qasm", "OpenQASM 2 listing with multi-controlled gates"),
    ("json", "circuit model as JSON"),
];

/// Gate library of synthesized circuits.
const GATES: &str = "Toffoli, Fredkin, Peres";

/// Execute the version command.
pub fn execute() {
    println!(
        "{} {}",
        style("revsyn").cyan().bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).yellow()
    );
    println!();
    println!("Synthesis modes:");
    for mode in SynthesisMode::ALL {
        println!("  {:<12} {}", style(mode).green(), mode.description());
    }
    println!();
    println!("Output formats:");
    for (extension, description) in OUTPUT_FORMATS {
        println!("  .{extension:<11} {description}");
    }
    println!();
    println!("Gates: {}", style(GATES).dim());
}
