use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Priority task scheduler driver.
///
/// Replays command scripts against an in-memory scheduler and prints one
/// JSON event per command on stdout. Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "taskheap", version, about = "Priority task scheduler driver")]
pub struct CliArgs {
    /// Duplicate identifier policy: reject or overwrite (overrides TASKHEAP_DUPLICATE_POLICY)
    #[arg(long, global = true)]
    pub duplicate_policy: Option<String>,

    /// Heap slots reserved up front (overrides TASKHEAP_CAPACITY)
    #[arg(long, global = true)]
    pub capacity: Option<usize>,

    /// Read settings from this dotenv file instead of the process environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CliCommand {
    /// Execute a command script (reads stdin when SCRIPT is omitted or `-`)
    Run {
        script: Option<PathBuf>,

        /// Pretty-print each event
        #[arg(long)]
        pretty: bool,
    },
    /// Run the built-in five-task walkthrough
    Demo {
        /// Pretty-print each event
        #[arg(long)]
        pretty: bool,
    },
}
