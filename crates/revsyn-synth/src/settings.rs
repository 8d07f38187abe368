//! Synthesis settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scratch-line policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesisMode {
    /// Uncompute temporaries and reuse scratch lines.
    #[default]
    LineAware,
    /// Keep temporaries as garbage lines; fewer gates, more lines.
    CostAware,
}

impl SynthesisMode {
    /// Every mode, line-aware first.
    pub const ALL: [SynthesisMode; 2] = [SynthesisMode::LineAware, SynthesisMode::CostAware];

    /// One-line summary of the scratch-line policy.
    pub fn description(self) -> &'static str {
        match self {
            SynthesisMode::LineAware => "uncompute temporaries and reuse scratch lines",
            SynthesisMode::CostAware => "keep temporaries as garbage, fewer gates",
        }
    }

    /// Kebab-case name as used in settings files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            SynthesisMode::LineAware => "line-aware",
            SynthesisMode::CostAware => "cost-aware",
        }
    }
}

impl fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SynthesisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line-aware" | "line_aware" => Ok(SynthesisMode::LineAware),
            "cost-aware" | "cost_aware" => Ok(SynthesisMode::CostAware),
            other => Err(format!(
                "unknown synthesis mode '{other}' (expected line-aware or cost-aware)"
            )),
        }
    }
}

/// Settings for one synthesis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisSettings {
    /// Scratch-line policy.
    pub mode: SynthesisMode,
    /// Entry module; overrides the program's own designation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

impl SynthesisSettings {
    /// Settings for the given mode.
    pub fn new(mode: SynthesisMode) -> Self {
        Self { mode, entry: None }
    }

    /// Set the entry module.
    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }
}
