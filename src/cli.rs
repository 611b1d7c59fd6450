//! Command-line argument parsing for the cmdroute demo shell.

use clap::Parser;
use std::path::PathBuf;

/// Interactive shell for the cmdroute command engine.
///
/// Reads one command per line from stdin. Lines starting with `?` print
/// completions for the rest of the line instead of running it.
#[derive(Parser, Debug)]
#[command(name = "cmdroute")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", env = "CMDROUTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write logs to a file instead of stderr (default location if no path)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub log_file: Option<Option<PathBuf>>,

    /// Run as this interactive user instead of the console
    #[arg(long, value_name = "NAME")]
    pub as_user: Option<String>,

    /// Give the interactive user administrator rights
    #[arg(long, requires = "as_user")]
    pub op: bool,

    /// Capabilities granted to the interactive user (comma-separated)
    #[arg(long, value_name = "LIST", value_delimiter = ',', requires = "as_user")]
    pub grant: Vec<String>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(cmdroute::config::Config::default_path)
    }
}
