//! revsyn Command-Line Interface
//!
//! Synthesizes reversible circuits from SyReC programs given in their JSON
//! interchange form.
//!
//! ```text
//!   a ──●────────●── a
//!   b ──●──⊕──●──┼── b
//!   0 ──⊕──●──⊕──⊕── a·b
//!
//!        R E V S Y N
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use revsyn_cli::commands::{cost, simulate, synth, version};

/// revsyn - reversible circuit synthesis for SyReC programs
#[derive(Parser)]
#[command(name = "revsyn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a program into a reversible circuit
    Synth {
        /// Input program (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file (.real, .qasm or .json)
        #[arg(short, long)]
        output: Option<String>,

        /// Synthesis mode (line-aware, cost-aware)
        #[arg(short, long)]
        mode: Option<String>,

        /// Entry module
        #[arg(short, long)]
        entry: Option<String>,

        /// Settings file (YAML or JSON)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Synthesize a program and simulate it on one input
    Simulate {
        /// Input program (JSON)
        #[arg(short, long)]
        input: String,

        /// Register value as NAME=VALUE (repeatable)
        #[arg(short, long)]
        set: Vec<String>,

        /// Synthesis mode (line-aware, cost-aware)
        #[arg(short, long)]
        mode: Option<String>,

        /// Entry module
        #[arg(short, long)]
        entry: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Compare line and gate costs of both synthesis modes
    Cost {
        /// Input program (JSON)
        #[arg(short, long)]
        input: String,

        /// Entry module
        #[arg(short, long)]
        entry: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Synth {
            input,
            output,
            mode,
            entry,
            config,
        } => synth::execute(
            &input,
            output.as_deref(),
            mode.as_deref(),
            entry.as_deref(),
            config.as_deref(),
        ),

        Commands::Simulate {
            input,
            set,
            mode,
            entry,
            format,
        } => simulate::execute(&input, &set, mode.as_deref(), entry.as_deref(), &format),

        Commands::Cost { input, entry } => cost::execute(&input, entry.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
