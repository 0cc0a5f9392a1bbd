//! Command-line interface for the steadfast server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Steadfast - crash-recoverable tic-tac-toe server
#[derive(Parser, Debug)]
#[command(name = "steadfast")]
#[command(about = "Tic-tac-toe server that survives restarts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides the config file)
    #[arg(long, global = true, env = "STEADFAST_DATABASE")]
    pub database: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recover the stored session and serve HTTP
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Recover the stored session and print it as JSON
    Inspect,

    /// Clear the move log and snapshot
    Reset,
}
