//! Client error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Classifies a failure by how the turn controller recovers from it.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// The server answered `success: false`.
    #[display("{}", _0)]
    Application(String),
    /// The request failed, returned a non-2xx status, or the body was not JSON.
    #[display("Transport error: {}", _0)]
    Transport(String),
    /// The body was JSON but not the shape the protocol promises.
    #[display("Protocol error: {}", _0)]
    Protocol(String),
    /// A board file could not be read or parsed.
    #[display("Board file error: {}", _0)]
    BoardFile(String),
    /// Configuration could not be loaded.
    #[display("Config error: {}", _0)]
    Config(String),
    /// The board could not be rendered.
    #[display("View error: {}", _0)]
    View(String),
}

/// Client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct GameClientError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl GameClientError {
    /// Creates a new error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: ErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for an application-level failure.
    #[track_caller]
    pub fn application(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Application(message.into()))
    }

    /// Shorthand for a transport failure.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport(message.into()))
    }

    /// Shorthand for a protocol-shape failure.
    #[track_caller]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol(message.into()))
    }

    /// Returns true for failures the server reported itself.
    pub fn is_application(&self) -> bool {
        matches!(self.kind, ErrorKind::Application(_))
    }

    /// Text shown to the user.
    ///
    /// Application failures carry the server's own message. Everything else is
    /// reduced to a generic line; the details go to the log.
    pub fn user_message(&self) -> String {
        match &self.kind {
            ErrorKind::Application(message) => message.clone(),
            ErrorKind::Transport(_) | ErrorKind::Protocol(_) | ErrorKind::View(_) => {
                "Could not reach the game server. Please try again.".to_string()
            }
            ErrorKind::BoardFile(message) => format!("Invalid board file: {}", message),
            ErrorKind::Config(message) => format!("Invalid configuration: {}", message),
        }
    }
}

impl From<reqwest::Error> for GameClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::transport(format!("HTTP request failed: {}", err))
    }
}
