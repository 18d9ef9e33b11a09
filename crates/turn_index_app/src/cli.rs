//! Command-line options for the turn index host.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use engine_logging::LogDestination;
use log::LevelFilter;

/// Builds the conversation index of a saved chat page.
#[derive(Debug, Parser)]
#[command(name = "turn_index")]
#[command(about = "Index the turns of a saved AI chat conversation")]
#[command(version)]
pub(crate) struct Cli {
    /// Location the page was saved from; selects the platform profile
    #[arg(long)]
    pub url: String,

    /// Saved HTML snapshot of the page
    #[arg(long)]
    pub page: PathBuf,

    /// HTML fragment appended to the conversation, one batch per file
    #[arg(long = "append", value_name = "FRAGMENT")]
    pub appends: Vec<PathBuf>,

    /// Navigate to and highlight this turn after indexing
    #[arg(long, value_name = "INDEX")]
    pub goto: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Quiet period before re-indexing after changes, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub debounce_ms: u64,

    /// How long a navigated turn stays highlighted, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub highlight_ms: u64,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}
