//! Simulate command implementation.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use revsyn_ir::Circuit;
use revsyn_sim::{Assignment, read_register, simulate};
use revsyn_synth::synthesize_with_settings;

use super::common::{load_program, parse_assignment, resolve_settings};

/// Input and output value of one register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterValue {
    pub name: String,
    pub role: String,
    pub input: u64,
    pub output: u64,
}

/// Run `circuit` once with the given register values and read back every register.
pub fn run_assignments(circuit: &Circuit, assignments: &[(String, u64)]) -> Result<Vec<RegisterValue>> {
    let input = Assignment::new(circuit)
        .with_values(assignments.iter().map(|(name, value)| (name.as_str(), *value)))?
        .into_bits();
    let output = simulate(circuit, &input)?;

    circuit
        .registers()
        .iter()
        .map(|register| {
            Ok(RegisterValue {
                name: register.name.clone(),
                role: register.role.name().to_string(),
                input: read_register(circuit, &input, &register.name)?,
                output: read_register(circuit, &output, &register.name)?,
            })
        })
        .collect()
}

/// Execute the simulate command.
pub fn execute(
    input: &str,
    set: &[String],
    mode: Option<&str>,
    entry: Option<&str>,
    format: &str,
) -> Result<()> {
    let assignments = set
        .iter()
        .map(|s| parse_assignment(s))
        .collect::<Result<Vec<_>>>()?;
    let settings = resolve_settings(None, mode, entry)?;
    let program = load_program(input)?;
    let circuit = synthesize_with_settings(&program, &settings)?;
    let values = run_assignments(&circuit, &assignments)?;

    match format.to_lowercase().as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&values).context("Failed to serialize result")?;
            println!("{json}");
        }
        "table" => {
            println!(
                "{} Simulated {} ({} lines, {} gates)",
                style("✓").green().bold(),
                style(circuit.name()).cyan(),
                circuit.num_lines(),
                circuit.num_gates()
            );
            let width = values.iter().map(|v| v.name.len()).max().unwrap_or(0);
            for value in &values {
                println!(
                    "  {:<width$}  {:<5}  {:>6} → {}",
                    style(&value.name).cyan(),
                    value.role,
                    value.input,
                    style(value.output).yellow(),
                );
            }
        }
        other => anyhow::bail!("Unknown format: '{other}' (expected table or json)"),
    }

    Ok(())
}
