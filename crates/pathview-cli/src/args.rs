//! Command-line argument definitions for the Pathview CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, per-run overrides and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Pathview exporter
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON bundle
    #[arg(help = "Path to a JSON file with `diagram`, `decoration` and `analysis`")]
    pub input: String,

    /// Path to the output SVG file
    ///
    /// With `--frames` one file per column is written, numbered after the
    /// file stem (`out-0.svg`, `out-1.svg`, ...).
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Color profile: a built-in name or a path to a profile document
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Output scale factor
    #[arg(short, long)]
    pub scale: Option<f32>,

    /// Export one frame per expression column
    #[arg(long)]
    pub frames: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
