// CLI argument definitions using Clap

use clap::Parser;
use std::path::PathBuf;

/// Replay a recorded test run through the event reporter
#[derive(Parser, Debug)]
#[command(name = "specrelay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Stream suite/spec results as JSON events", long_about = None)]
pub struct Cli {
    /// JSON fixture describing the run
    #[arg(value_name = "FIXTURE")]
    pub fixture: PathBuf,

    /// Configuration file (defaults to .specrelayrc.toml in the current or home directory)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Prefix for every event name
    #[arg(long)]
    pub prefix: Option<String>,

    /// Separator for qualified suite names
    #[arg(long)]
    pub separator: Option<String>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Command-line values override the loaded configuration
    pub fn apply_overrides(&self, config: &mut crate::config::Config) {
        if let Some(prefix) = &self.prefix {
            config.events.prefix = prefix.clone();
        }
        if let Some(separator) = &self.separator {
            config.report.name_separator = separator.clone();
        }
    }
}
