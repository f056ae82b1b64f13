//! Command-line argument definitions for the Annograph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output directories, configuration
//! file selection, a few configuration overrides, and logging verbosity.

use clap::{Parser, ValueEnum};

use annograph::config::{LemmatizerEngine, OutputFormat};

/// Command-line arguments for the Annograph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing annotation exports
    #[arg(short, long)]
    pub input: String,

    /// Directory receiving the rendered diagrams
    #[arg(short, long)]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Glob pattern selecting input files (default: *.json)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Image format of the rendered diagrams
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Morphological analyzer used to group tokens
    #[arg(long, value_enum)]
    pub lemmatizer: Option<LemmatizerArg>,

    /// Also write the DOT source of every diagram
    #[arg(long)]
    pub emit_dot: bool,

    /// Stop at the first document that fails to render
    #[arg(long)]
    pub fail_fast: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Png,
    Svg,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Svg => OutputFormat::Svg,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LemmatizerArg {
    Mystem,
    Plain,
}

impl From<LemmatizerArg> for LemmatizerEngine {
    fn from(engine: LemmatizerArg) -> Self {
        match engine {
            LemmatizerArg::Mystem => LemmatizerEngine::Mystem,
            LemmatizerArg::Plain => LemmatizerEngine::Plain,
        }
    }
}
