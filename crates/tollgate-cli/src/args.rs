//! Command-line arguments for `tollgate`.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tollgate_harness::config::{DEFAULT_RESULTS_PATH, DEFAULT_TASKS_DIR};

/// Tollgate - validate model outputs against baseline and constraint tasks
#[derive(Parser, Debug)]
#[command(name = "tollgate")]
#[command(version)]
#[command(about = "Validate model outputs against exact answers and structural constraints", long_about = None)]
pub struct Args {
    /// Verbosity: -v (debug), -vv (trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every task, collecting attempts and writing the results log
    Run(RunArgs),

    /// Print final pass rates and failure modes from a results log
    Summarize {
        /// Results CSV to read
        #[arg(long = "in", value_name = "FILE", default_value = DEFAULT_RESULTS_PATH)]
        input: PathBuf,
    },

    /// Validate a single output against one task
    Check {
        /// Directory containing the task files
        #[arg(long, default_value = DEFAULT_TASKS_DIR)]
        tasks_dir: PathBuf,

        /// Task id
        #[arg(long)]
        task: String,

        /// Output to validate (stdin when omitted)
        #[arg(long)]
        output: Option<String>,
    },

    /// List loaded tasks
    Tasks {
        /// Directory containing the task files
        #[arg(long, default_value = DEFAULT_TASKS_DIR)]
        tasks_dir: PathBuf,
    },
}

/// Where attempt outputs come from.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Paste outputs at the terminal
    Manual,

    /// Replay outputs from a JSONL file
    FromFile,
}

/// Arguments of `tollgate run`. Unset options fall back to the config file,
/// then to built-in defaults.
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Directory containing the task files
    #[arg(long)]
    pub tasks_dir: Option<PathBuf>,

    /// Attempts per task
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    #[arg(long, value_enum, default_value_t = Mode::Manual)]
    pub mode: Mode,

    /// JSONL replay file (required with --mode from-file)
    #[arg(long, value_name = "FILE", required_if_eq("mode", "from-file"))]
    pub inputs: Option<PathBuf>,

    /// Results CSV to write
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// YAML harness config
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
