//! Linesweep - terminal client
//!
//! Plays the line-sweep game against the server's AI, or uploads board files.

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use linesweep::{BoardFile, ClientConfig, HttpGameClient, LockPolicy, UploadCoordinator};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            server_url,
            config,
            pace_ms,
            lock_policy,
            board,
        } => run_play(&config, server_url, pace_ms, lock_policy, board).await,
        Command::Upload {
            file,
            server_url,
            config,
        } => run_upload(&config, server_url, file).await,
        Command::Generate { rows, cols, output } => run_generate(rows, cols, output).await,
    }
}

/// Log to stderr for the one-shot commands
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the terminal client
async fn run_play(
    config_path: &Path,
    server_url: Option<String>,
    pace_ms: Option<u64>,
    lock_policy: Option<LockPolicy>,
    board: Option<PathBuf>,
) -> Result<()> {
    let mut config = ClientConfig::load_or_default(config_path)?;
    if let Some(url) = server_url {
        config = config.with_server_url(url);
    }
    if let Some(pace_ms) = pace_ms {
        config = config.with_pace_ms(pace_ms);
    }
    if let Some(policy) = lock_policy {
        config = config.with_lock_policy(policy);
    }
    tui::run_tui(config, board).await
}

/// Upload a board file and print the result
#[instrument(skip_all, fields(file = %file.display()))]
async fn run_upload(config_path: &Path, server_url: Option<String>, file: PathBuf) -> Result<()> {
    init_stderr_logging();

    let mut config = ClientConfig::load_or_default(config_path)?;
    if let Some(url) = server_url {
        config = config.with_server_url(url);
    }

    info!(server_url = %config.server_url(), "Uploading board file");
    let client = HttpGameClient::new(config.server_url());
    let board = UploadCoordinator.upload(&client, &file).await?;

    println!("{}", board.display());
    println!("{} stones on a {}x{} board", board.occupied(), board.rows(), board.cols());
    Ok(())
}

/// Write a random board file and print it
#[instrument(skip_all, fields(rows = rows, cols = cols, output = %output.display()))]
async fn run_generate(rows: usize, cols: usize, output: PathBuf) -> Result<()> {
    init_stderr_logging();

    let file = BoardFile::random(rows, cols, &mut rand::rng())?;
    file.write(&output).await?;

    println!("{}", file.board().display());
    println!("Wrote {}", output.display());
    Ok(())
}
