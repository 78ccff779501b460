//! CLI argument parsing for habitplan

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "hp")]
#[command(author, version, about = "AI-assisted weekly habit planner", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the questionnaire and generate a weekly plan
    Plan,

    /// Show the stored weekly plan
    Show,

    /// Regenerate the plan from the stored answers
    Regenerate,

    /// Toggle completion for one habit
    Check {
        /// Day of the week (e.g. monday or mon)
        day: String,

        /// 1-based habit position within the day
        index: usize,
    },

    /// Export the stored plan to a file or stdout
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clear stored answers, plan, and completion state
    Reset,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
}
