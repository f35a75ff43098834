//! Syndra Command-Line Interface
//!
//! Drives the surface-code parity model from the terminal: inspect a
//! topology, evaluate a fixed set of faults, sample random noise, or toggle
//! faults interactively.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{eval, sample, session, topology, version};

/// Syndra - surface-code parity and syndrome explorer
#[derive(Parser)]
#[command(name = "syndra")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where the incidence relation comes from.
#[derive(Args, Debug, Clone)]
pub struct TopologyArgs {
    /// Built-in topology (demo, repetition:N, toric:D)
    #[arg(short, long, default_value = "demo")]
    pub preset: String,

    /// Topology file (JSON, or YAML for .yaml/.yml); overrides --preset
    #[arg(short, long, conflicts_with = "preset")]
    pub file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the sites, checks and incidence of a topology
    Topology {
        #[command(flatten)]
        source: TopologyArgs,

        /// Output format (table, json, yaml)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Toggle the given faults once each and report the resulting syndrome
    Eval {
        #[command(flatten)]
        source: TopologyArgs,

        /// Site to toggle (repeatable)
        #[arg(short, long = "site")]
        sites: Vec<u32>,

        /// Check whose measurement to corrupt (repeatable)
        #[arg(short, long = "check")]
        checks: Vec<u32>,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Inject random site and measurement noise
    Sample {
        #[command(flatten)]
        source: TopologyArgs,

        /// Per-site fault probability
        #[arg(long, default_value = "0.05")]
        p_site: f64,

        /// Per-check measurement corruption probability
        #[arg(long, default_value = "0.0")]
        p_check: f64,

        /// Number of independent shots
        #[arg(short, long, default_value = "1")]
        shots: u32,

        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Toggle faults interactively from stdin
    Session {
        #[command(flatten)]
        source: TopologyArgs,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
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
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Topology { source, format } => topology::execute(&source, &format),

        Commands::Eval {
            source,
            sites,
            checks,
            format,
        } => eval::execute(&source, &sites, &checks, &format),

        Commands::Sample {
            source,
            p_site,
            p_check,
            shots,
            seed,
            format,
        } => sample::execute(&source, p_site, p_check, shots, seed, &format),

        Commands::Session { source } => session::execute(&source),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
