//! `clap`-derive CLI surface (spec §12), modeled on `gat-cli::cli`'s
//! `Cli`/`Commands` split: a top-level struct carrying global flags plus
//! a `Commands` enum, one variant per search operator.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "iclp", author, version, about = "Interval constraint logic programming engine", long_about = None)]
pub struct Cli {
    /// Tracing verbosity for `tracing_subscriber`'s `EnvFilter` (e.g. `info`, `iclp_core=debug`).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Shared input + engine-tuning flags every search subcommand accepts.
#[derive(clap::Args, Debug)]
pub struct EngineArgs {
    /// Path to a declaration+constraint script.
    pub script: PathBuf,

    /// Comma-separated variable names to report and, for search
    /// subcommands, to split on (defaults to every declared variable).
    #[arg(long, value_delimiter = ',')]
    pub vars: Vec<String>,

    /// Width below which a variable is considered converged.
    #[arg(long, default_value_t = 1e-8)]
    pub precision: f64,

    /// Fraction of width reduction required to re-enqueue watchers.
    #[arg(long, default_value_t = iclp_core::config::DEFAULT_THROTTLE_THRESHOLD)]
    pub throttle: f64,

    /// Hard cap on propagation iterations.
    #[arg(long, default_value_t = iclp_core::config::DEFAULT_ITERATION_LIMIT)]
    pub iteration_limit: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Nibble each of `--vars` toward its tightest consistent bounds at
    /// `--precision`, without branching, and print the resulting enclosures.
    Absolve {
        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Find every point-like solution within `--precision`, splitting the widest variable.
    Solve {
        #[command(flatten)]
        engine: EngineArgs,
        /// Stop after this many solutions.
        #[arg(long)]
        limit: Option<usize>,
        /// Split at the zero-crossing-aware median instead of the midpoint.
        #[arg(long)]
        median: bool,
    },

    /// Like `solve`, but commits to the first solution found.
    Splitsolve {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(long)]
        median: bool,
    },

    /// Exhaustively label integer variables one value at a time.
    Enumerate {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Branch-and-bound search for the smallest value of `--objective`.
    Minimize {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(long)]
        objective: String,
        #[arg(long)]
        median: bool,
    },

    /// Branch-and-bound search for the largest value of `--objective`.
    Maximize {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(long)]
        objective: String,
        #[arg(long)]
        median: bool,
    },

    /// Compile the script and print the declared variables' enclosures without searching.
    Stats {
        #[command(flatten)]
        engine: EngineArgs,
    },
}
