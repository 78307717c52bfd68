//! Command-line interface for linesweep.

use clap::{Parser, Subcommand};
use linesweep::{DEFAULT_CONFIG_FILE, LockPolicy};
use std::path::PathBuf;

/// Linesweep - clear rows and columns against a server-side AI
#[derive(Parser, Debug)]
#[command(name = "linesweep")]
#[command(about = "Terminal client for the line-sweep board game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Game server URL (overrides the config file)
        #[arg(long)]
        server_url: Option<String>,

        /// Path to the client config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Pacing delay between turn steps in milliseconds
        #[arg(long)]
        pace_ms: Option<u64>,

        /// Lock handling after a rejected move: release or hold
        #[arg(long)]
        lock_policy: Option<LockPolicy>,

        /// Start on this board file instead of a random board
        #[arg(long)]
        board: Option<PathBuf>,
    },

    /// Upload a board file and print the board the server installed
    Upload {
        /// Board file: "<rows> <cols>" followed by one line per row
        file: PathBuf,

        /// Game server URL (overrides the config file)
        #[arg(long)]
        server_url: Option<String>,

        /// Path to the client config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },

    /// Write a random board file for `upload` or `play --board`
    Generate {
        /// Number of rows
        rows: usize,

        /// Number of columns
        cols: usize,

        /// Where to write the board file
        output: PathBuf,
    },
}
