//! Strictly Xiangqi - Unified CLI
//!
//! HTTP game server and terminal game over one engine.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::time::Duration;
use strictly_xiangqi::{ServerConfig, XiangqiEngine};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            think_time_ms,
            session_ttl_secs,
        } => {
            initialize_tracing();
            let config = load_server_config(config, host, port, think_time_ms, session_ttl_secs)?;
            run_http_server(config).await
        }
        Command::Play { think_time_ms } => run_terminal(think_time_ms).await,
    }
}

fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_xiangqi=debug")),
        )
        .init();
}

/// Defaults, then the config file, then command-line flags.
#[instrument]
fn load_server_config(
    path: Option<std::path::PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    think_time_ms: Option<u64>,
    session_ttl_secs: Option<u64>,
) -> Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::from_file(&path)?,
        None => {
            info!("No config file given, using defaults");
            ServerConfig::default()
        }
    };
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(ms) = think_time_ms {
        anyhow::ensure!(ms > 0, "--think-time-ms must be positive");
        config = config.with_think_time_ms(ms);
    }
    if let Some(secs) = session_ttl_secs {
        config = config.with_session_ttl_secs(secs);
    }
    Ok(config)
}

/// Run the HTTP game server
async fn run_http_server(config: ServerConfig) -> Result<()> {
    info!(?config, "Starting Strictly Xiangqi HTTP server");
    strictly_xiangqi::serve(&config, XiangqiEngine::factory()).await?;
    Ok(())
}

/// Run the terminal game
async fn run_terminal(think_time_ms: u64) -> Result<()> {
    // Logs would interleave with the board, so only warnings are shown.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let think_time = Duration::from_millis(think_time_ms.max(1));
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        strictly_xiangqi::run_terminal(stdin.lock(), std::io::stdout(), XiangqiEngine::factory(), think_time)
    })
    .await??;
    Ok(())
}
