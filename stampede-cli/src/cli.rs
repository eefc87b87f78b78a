//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Contention load harness for the order-approval service", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the contention scenario against the target service
    Run {
        /// Override the number of concurrent workers
        #[arg(long, value_name = "COUNT")]
        workers: Option<usize>,

        /// Override the load-phase duration (e.g. "90s", "2m")
        #[arg(long, value_name = "DURATION")]
        duration: Option<String>,

        /// Override the number of seeded orders
        #[arg(long, value_name = "COUNT")]
        order_count: Option<usize>,

        /// Override the target service base URL
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print a sample configuration file to stdout
    Generate,

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file to validate
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },
}
