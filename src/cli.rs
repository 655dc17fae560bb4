// src/cli.rs

use clap::{Parser, ValueEnum, command, crate_version};

/// Verbosity of the log file.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    /// Image URL, file path, or directory to upload (repeatable)
    #[arg(value_name = "target", num_args = 1.., required = true)]
    pub targets: Vec<String>,

    // --- Upload options (Options) ---
    /// Title for the album (and for the image when only one is uploaded)
    #[arg(short, long, value_name = "TEXT", help_heading = "Options")]
    pub title: Option<String>,
    /// Description for the album (same single-image rule as --title)
    #[arg(short, long, value_name = "TEXT", help_heading = "Options")]
    pub description: Option<String>,
    /// Upload anonymously instead of to a signed-in account
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub anonymous: bool,

    // --- General options (General) ---
    /// Print this help message and exit
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// Print version information and exit
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (hidden) log-file verbosity, for debugging
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}

impl Cli {
    /// Builds an argument set from values the interactive form collected,
    /// equivalent to what the parser would have produced.
    pub fn from_form(
        targets: Vec<String>,
        title: Option<String>,
        description: Option<String>,
        anonymous: bool,
    ) -> Self {
        Self {
            targets,
            title,
            description,
            anonymous,
            _help: None,
            _version: None,
            log_level: LogLevel::Off,
        }
    }
}
