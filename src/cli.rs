//! Command-line interface for strictly_xiangqi.

use clap::{Parser, Subcommand};

/// Strictly Xiangqi - play xiangqi against a search engine
#[derive(Parser, Debug)]
#[command(name = "strictly_xiangqi")]
#[command(about = "Xiangqi game server with a bundled engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// TOML file with server settings
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Engine search budget per reply, in milliseconds
        #[arg(long)]
        think_time_ms: Option<u64>,

        /// Discard sessions idle this many seconds
        #[arg(long)]
        session_ttl_secs: Option<u64>,
    },

    /// Play in the terminal
    Play {
        /// Engine search budget per reply, in milliseconds
        #[arg(long, default_value = "1000")]
        think_time_ms: u64,
    },
}
