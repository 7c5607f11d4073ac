use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use crate::compiler::Settings;

/// How much gets logged. Any unrecognized name means `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingLevel {
    All,
    Debugging,
    Information,
    Warning,
    Error,
    Critical,
}

impl FromStr for LoggingLevel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s {
            "ALL" => LoggingLevel::All,
            "DEBUGGING" => LoggingLevel::Debugging,
            "INFORMATION" => LoggingLevel::Information,
            "WARNING" => LoggingLevel::Warning,
            "ERROR" => LoggingLevel::Error,
            _ => LoggingLevel::Critical,
        };
        Ok(level)
    }
}

impl LoggingLevel {
    // Nothing is logged at a critical level, so it turns logging off
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LoggingLevel::All => LevelFilter::Trace,
            LoggingLevel::Debugging => LevelFilter::Debug,
            LoggingLevel::Information => LevelFilter::Info,
            LoggingLevel::Warning => LevelFilter::Warn,
            LoggingLevel::Error => LevelFilter::Error,
            LoggingLevel::Critical => LevelFilter::Off,
        }
    }
}

// Only the exact text `true` enables a flag
fn parse_flag(s: &str) -> Result<bool, Infallible> {
    Ok(s == "true")
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the program (default: stdin)
    pub file: Option<PathBuf>,

    /// ALL, DEBUGGING, INFORMATION, WARNING, ERROR or CRITICAL
    #[arg(short, long, env = "LOGGING_LEVEL", value_name = "LEVEL", default_value = "INFORMATION")]
    pub logging_level: LoggingLevel,

    /// Whether whitespace and comments are logged too
    #[arg(
        long,
        env = "LOG_IGNORED_LEXEMES",
        value_name = "BOOL",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = parse_flag
    )]
    pub log_ignored_lexemes: bool,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            log_ignored_lexemes: self.log_ignored_lexemes,
        }
    }
}
