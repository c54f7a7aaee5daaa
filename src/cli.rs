// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `patter`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "patter",
    version,
    about = "Call an endless square dance tip from module collections.",
    long_about = None
)]
pub struct CliArgs {
    /// Collection file (JSON) to load choreography from. Repeatable.
    #[arg(
        short = 'c',
        long = "collection",
        value_name = "PATH",
        required = true
    )]
    pub collections: Vec<String>,

    /// Dance session file (TOML) with selection criteria and tempo.
    ///
    /// If omitted, a default Plus-level session at 128 bpm is used.
    #[arg(short = 's', long, value_name = "PATH")]
    pub session: Option<String>,

    /// Override the session tempo in beats per minute.
    #[arg(long, value_name = "BPM")]
    pub bpm: Option<f64>,

    /// Seed for the choreography PRNG.
    ///
    /// The same seed over the same content replays the same dance. If
    /// omitted, a random seed is drawn and logged.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Loop a single module for practice instead of dancing full tips.
    #[arg(long, value_name = "MODULE_ID")]
    pub play_module: Option<String>,

    /// Call exactly one tip (or one practice pass), then exit.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PATTER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate collections, print what was found, but don't dance.
    #[arg(long)]
    pub dry_run: bool,
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
