//! Client configuration.

use crate::error::{ErrorKind, GameClientError};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "linesweep.toml";

/// What happens to the input lock when a move fails at the server.
///
/// Transport and protocol failures always release the lock; this only governs
/// `success: false` answers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LockPolicy {
    /// Release the lock and return the turn to the player.
    #[default]
    Release,
    /// Keep the lock engaged; the board stays frozen until a new game.
    Hold,
}

/// Configuration for the terminal client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the game server.
    server_url: String,

    /// Pacing delay between turn steps, in milliseconds.
    pace_ms: u64,

    /// Width available to the board, in terminal columns.
    board_width: u16,

    /// Lock handling after a rejected move.
    lock_policy: LockPolicy,

    /// Where the terminal client writes its log.
    log_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            pace_ms: 1000,
            board_width: 48,
            lock_policy: LockPolicy::default(),
            log_file: PathBuf::from("linesweep.log"),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GameClientError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GameClientError::new(ErrorKind::Config(format!("Failed to read config file: {}", e)))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            GameClientError::new(ErrorKind::Config(format!("Failed to parse config: {}", e)))
        })?;

        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, GameClientError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}
