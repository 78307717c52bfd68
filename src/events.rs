//! Events published by the turn controller and actions it accepts.

use crate::game::{Actor, Gesture, Score};
use crate::view::ViewTree;
use std::path::PathBuf;
use tracing::debug;

/// Position of the session in the turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Phase {
    /// No board yet, or board creation failed.
    Idle,
    /// Waiting for `/create` or `/upload`.
    CreatingBoard,
    /// Waiting for the player's gesture.
    PlayerReady,
    /// Player move in flight.
    SubmittingPlayerMove,
    /// Player move applied; checking for game over.
    PostMoveCheck,
    /// Handing the turn to the AI.
    SchedulingAi,
    /// AI move in flight.
    SubmittingAiMove,
    /// AI move applied; checking for game over.
    PostAiCheck,
    /// The oracle reported the end of the game.
    GameOver,
    /// A failure left the input locked; only a new board recovers.
    Stalled,
}

/// Messages sent from the controller to the display.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new board was rendered.
    BoardRendered(ViewTree),
    /// Scores were refreshed.
    ScoreChanged(Score),
    /// Turn ownership changed.
    TurnChanged(Actor),
    /// The controller moved to a new phase.
    PhaseChanged {
        /// New phase.
        phase: Phase,
        /// Whether gestures are suppressed.
        input_locked: bool,
    },
    /// A failure the user must acknowledge.
    Notice(String),
    /// Non-blocking note from the server.
    Info(String),
    /// Game ended.
    GameOver {
        /// Result line from the server.
        message: Option<String>,
    },
}

/// Inputs sent from the display to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// A header was activated.
    Activate(Gesture),
    /// Start a fresh random board.
    NewGame,
    /// Upload a board file and play on it.
    Upload(PathBuf),
}

/// Sending half of the display channel.
///
/// Publishing never fails the caller: when the display has gone away the
/// event is dropped.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: tokio::sync::mpsc::UnboundedSender<GameEvent>,
}

impl EventSink {
    /// Wraps a channel sender.
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<GameEvent>) -> Self {
        Self { tx }
    }

    /// Publishes an event.
    pub fn emit(&self, event: GameEvent) {
        if let Err(e) = self.tx.send(event) {
            debug!(event = ?e.0, "Display closed, dropping event");
        }
    }
}
