//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use revsyn_ir::{Circuit, RealOptions, to_qasm, to_real};
use revsyn_lang::Program;
use revsyn_synth::{SynthesisMode, SynthesisSettings};

fn read_source(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

fn extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a program from its JSON interchange form.
pub fn load_program(path: &str) -> Result<Program> {
    let source = read_source(path)?;
    Program::from_json(&source).map_err(|e| anyhow::anyhow!("Parse error in {path}: {e}"))
}

/// Load synthesis settings from a YAML or JSON file.
pub fn load_settings(path: &str) -> Result<SynthesisSettings> {
    let source = read_source(path)?;
    match extension(path).as_str() {
        "json" => serde_json::from_str(&source)
            .map_err(|e| anyhow::anyhow!("Invalid settings in {path}: {e}")),
        "yaml" | "yml" => serde_yaml_ng::from_str(&source)
            .map_err(|e| anyhow::anyhow!("Invalid settings in {path}: {e}")),
        other => anyhow::bail!("Unsupported settings format: '{other}' (expected yaml or json)"),
    }
}

/// Combine an optional settings file with command-line overrides.
///
/// Flags given on the command line win over values from the file.
pub fn resolve_settings(
    config: Option<&str>,
    mode: Option<&str>,
    entry: Option<&str>,
) -> Result<SynthesisSettings> {
    let mut settings = match config {
        Some(path) => load_settings(path)?,
        None => SynthesisSettings::default(),
    };
    if let Some(mode) = mode {
        settings.mode = parse_mode(mode)?;
    }
    if let Some(entry) = entry {
        settings.entry = Some(entry.to_string());
    }
    Ok(settings)
}

/// Parse a synthesis mode name.
pub fn parse_mode(mode: &str) -> Result<SynthesisMode> {
    mode.to_lowercase()
        .parse::<SynthesisMode>()
        .map_err(|e| anyhow::anyhow!(e))
}

/// Parse a `name=value` register assignment.
pub fn parse_assignment(s: &str) -> Result<(String, u64)> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected NAME=VALUE, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Missing register name in '{s}'");
    }
    let value = value.trim();
    let parsed = match value.strip_prefix("0b") {
        Some(bits) => u64::from_str_radix(bits, 2),
        None => match value.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => value.parse(),
        },
    }
    .with_context(|| format!("Invalid value for '{name}': {value}"))?;
    Ok((name.to_string(), parsed))
}

/// Render a circuit in the format implied by `path`'s extension.
pub fn render_circuit(circuit: &Circuit, path: &str) -> Result<String> {
    match extension(path).as_str() {
        "real" => to_real(circuit, &RealOptions::default()).context("Failed to render circuit"),
        "qasm" => to_qasm(circuit).context("Failed to render circuit"),
        "json" => serde_json::to_string_pretty(circuit).context("Failed to serialize circuit"),
        other => anyhow::bail!("Unsupported output format: '{other}' (expected real, qasm or json)"),
    }
}

/// Write a circuit to `path`.
pub fn save_circuit(circuit: &Circuit, path: &str) -> Result<()> {
    let rendered = render_circuit(circuit, path)?;
    fs::write(path, rendered).with_context(|| format!("Failed to write file: {path}"))
}

/// Print the line and cost summary of a synthesized circuit.
pub fn print_summary(circuit: &Circuit) {
    println!(
        "  Lines: {} ({} ancillae), gates: {}",
        circuit.num_lines(),
        circuit.num_ancillae(),
        circuit.num_gates()
    );
    println!(
        "  Quantum cost: {}, transistor cost: {}",
        circuit.quantum_cost(),
        circuit.transistor_cost()
    );
}
