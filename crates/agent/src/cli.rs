// Command-line interface

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Parser, Debug)]
#[command(name = "adversim")]
#[command(about = "Adversary emulation agent", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run options when no subcommand is given
    #[command(flatten)]
    pub run: RunArgs,

    /// Log level (RUST_LOG overrides)
    #[arg(long, global = true, env = "ADVERSIM_LOG_LEVEL", value_enum, ignore_case = true, default_value = "info")]
    pub log_level: LogLevel,

    /// Also write logs to this file
    #[arg(long, global = true, env = "ADVERSIM_LOG_FILE")]
    pub log_file: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the adversary profile (default)
    Run(RunArgs),

    /// Replay the cleanup queue left by a run with --non-cleanup
    Cleanup(CleanupArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory holding abilities/, adversary.yml and source.yml
    #[arg(long, env = "ADVERSIM_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    /// Abilities directory [default: <data-dir>/abilities]
    #[arg(long, env = "ADVERSIM_ABILITIES")]
    pub abilities: Option<String>,

    /// Adversary file [default: <data-dir>/adversary.yml]
    #[arg(long, env = "ADVERSIM_ADVERSARY")]
    pub adversary: Option<String>,

    /// Fact source file [default: <data-dir>/source.yml if present]
    #[arg(long, env = "ADVERSIM_SOURCE")]
    pub source: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Defer cleanup; the queue is saved for `adversim cleanup`
    #[arg(long, env = "ADVERSIM_NON_CLEANUP")]
    pub non_cleanup: bool,

    /// Mark the operation as non-autonomous
    #[arg(long, env = "ADVERSIM_NON_AUTO")]
    pub non_auto: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CleanupArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Resume from the remainder of an interrupted cleanup
    #[arg(long)]
    pub resume: bool,
}

/// Options shared by both entry points
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Where log and cleanup files are written
    #[arg(long, env = "ADVERSIM_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    /// Report this IP instead of the detected primary address
    #[arg(long, env = "ADVERSIM_IP")]
    pub ip: Option<String>,

    /// Dispatch links without the random pre-execution delay
    #[arg(long, env = "ADVERSIM_NO_JITTER")]
    pub no_jitter: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
