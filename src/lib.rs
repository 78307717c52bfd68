//! Linesweep - terminal client for a server-authoritative line-sweep game
//!
//! The server owns the board, the rules and the AI. This library renders the
//! snapshots it returns, submits the player's moves and drives the
//! player/AI turn cycle until the server reports the end of the game.
//!
//! # Architecture
//!
//! - **View**: pure rendering of a board into a [`ViewTree`]
//! - **Client**: the [`GameServer`] seam and its HTTP implementation
//! - **Controller**: the [`TurnController`] state machine
//! - **Upload**: board files sent through [`UploadCoordinator`]
//!
//! # Example
//!
//! ```no_run
//! use linesweep::{Gesture, HttpGameClient, NoPacing, TurnController};
//!
//! # async fn example() {
//! let (event_tx, _event_rx) = tokio::sync::mpsc::unbounded_channel();
//! let client = HttpGameClient::new("http://127.0.0.1:5000");
//! let mut controller = TurnController::new(client, NoPacing, event_tx);
//!
//! controller.create_game().await;
//! controller.submit_player_move(&Gesture::new("col-2")).await;
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod client;
mod config;
mod controller;
mod error;
mod events;
mod game;
mod gate;
mod oracle;
mod pacing;
mod protocol;
mod score;
mod upload;
mod view;

// Crate-level exports - Errors
pub use error::{ErrorKind, GameClientError};

// Crate-level exports - Configuration
pub use config::{ClientConfig, DEFAULT_CONFIG_FILE, LockPolicy};

// Crate-level exports - Game types
pub use game::{
    Actor, BoardState, Cell, Direction, GameStatus, Gesture, MoveRequest, Score, column_label,
};

// Crate-level exports - Server access
pub use client::{GameServer, HttpGameClient};
pub use protocol::{
    BoardEnvelope, BoardReply, CheckEnvelope, PointsEnvelope, UNSPECIFIED_FAILURE,
};

// Crate-level exports - Rendering
pub use view::{CellView, HeaderCell, Marker, ViewTree, render, render_board};

// Crate-level exports - Turn orchestration
pub use controller::{Session, TurnController, TurnOutcome};
pub use events::{EventSink, GameEvent, Phase, UserAction};
pub use gate::InputGate;
pub use oracle::EndgameOracle;
pub use pacing::{NoPacing, Pacer, SleepPacer};
pub use score::ScoreTracker;
pub use upload::{BoardFile, UploadCoordinator};
