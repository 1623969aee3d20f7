// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `roadmap-sched`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "roadmap-sched",
    version,
    about = "Plan and dispatch roadmap units in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the scheduler settings file (TOML).
    ///
    /// Default: `RoadmapSched.toml` in the current working directory, if it
    /// exists; built-in defaults otherwise.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ROADMAP_SCHED_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the batch plan for a roadmap.
    Plan {
        /// Roadmap JSON document.
        roadmap: PathBuf,

        /// Plan only the work left after this position (JSON).
        #[arg(long, value_name = "FILE")]
        position: Option<PathBuf>,
    },

    /// Print the topological layers, or the cycle report.
    Layers {
        roadmap: PathBuf,
    },

    /// Print the batch to dispatch next.
    Next {
        roadmap: PathBuf,

        /// Current position (JSON). A fresh position is used when omitted.
        #[arg(long, value_name = "FILE")]
        position: Option<PathBuf>,
    },

    /// Evaluate the admission gate of one phase. Exits non-zero on failure.
    Gate {
        roadmap: PathBuf,

        #[arg(long, value_name = "ID")]
        phase: String,

        /// Phase metrics (JSON).
        #[arg(long, value_name = "FILE")]
        metrics: PathBuf,

        #[arg(long, value_name = "FILE")]
        position: Option<PathBuf>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
