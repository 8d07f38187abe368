//! Synth command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use tracing::info;

use revsyn_synth::synthesize_with_settings;

use super::common::{load_program, print_summary, resolve_settings, save_circuit};

/// Default output path: the input's stem with a `.real` extension.
pub fn default_output(input: &str) -> String {
    let path = Path::new(input);
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{stem}.real"))
        .to_string_lossy()
        .into_owned()
}

/// Execute the synth command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    mode: Option<&str>,
    entry: Option<&str>,
    config: Option<&str>,
) -> Result<()> {
    let settings = resolve_settings(config, mode, entry)?;
    println!(
        "{} Synthesizing {} ({})",
        style("→").cyan().bold(),
        style(input).green(),
        style(settings.mode).yellow()
    );

    let program = load_program(input)?;
    println!("  Loaded: {} modules", program.modules.len());

    let circuit = synthesize_with_settings(&program, &settings)?;
    println!("{} Synthesis complete", style("✓").green().bold());
    print_summary(&circuit);

    let output = output.map_or_else(|| default_output(input), str::to_string);
    save_circuit(&circuit, &output)?;
    info!(output = %output, "circuit written");
    println!("  Output: {}", style(&output).green());

    Ok(())
}
