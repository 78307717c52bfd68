//! Wire formats of the game server's JSON endpoints.
//!
//! Responses are decoded in two steps: the body must be JSON at all
//! (otherwise it is a transport failure), then it must have the expected
//! fields (otherwise it is a protocol failure). `success: false` becomes an
//! application failure carrying the server's message.

use crate::error::GameClientError;
use crate::game::{BoardState, GameStatus, Score};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Fallback shown when the server fails without saying why.
pub const UNSPECIFIED_FAILURE: &str = "The server rejected the request.";

fn default_success() -> bool {
    true
}

/// Body of `/create`, `/move`, `/AI` and `/upload` responses.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardEnvelope {
    /// Absent on `/upload`, which only answers on success.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Failure reason, or an optional note on success.
    #[serde(default)]
    pub message: Option<String>,
    /// Number of rows.
    #[serde(default)]
    pub rows: Option<usize>,
    /// Number of columns.
    #[serde(default)]
    pub cols: Option<usize>,
    /// Row-major cell values.
    #[serde(default)]
    pub board: Option<Vec<Vec<u32>>>,
}

/// A board snapshot plus the optional note the server attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardReply {
    /// New snapshot.
    pub board: BoardState,
    /// Optional note from the server.
    pub message: Option<String>,
}

impl BoardEnvelope {
    /// Converts the envelope into a validated snapshot.
    #[track_caller]
    pub fn into_reply(self) -> Result<BoardReply, GameClientError> {
        if !self.success {
            return Err(GameClientError::application(
                self.message.unwrap_or_else(|| UNSPECIFIED_FAILURE.to_string()),
            ));
        }
        let (Some(rows), Some(cols), Some(board)) = (self.rows, self.cols, self.board) else {
            return Err(GameClientError::protocol(
                "board response is missing rows, cols or board",
            ));
        };
        Ok(BoardReply {
            board: BoardState::from_wire(rows, cols, board)?,
            message: self.message,
        })
    }
}

/// Body of a `/check` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckEnvelope {
    /// Whether the check itself succeeded.
    pub success: bool,
    /// Whether the game is over.
    #[serde(default)]
    pub check: Option<bool>,
    /// Result line.
    #[serde(default)]
    pub message: Option<String>,
}

impl CheckEnvelope {
    /// Converts the envelope into a game status.
    #[track_caller]
    pub fn into_status(self) -> Result<GameStatus, GameClientError> {
        if !self.success {
            return Err(GameClientError::application(
                self.message.unwrap_or_else(|| UNSPECIFIED_FAILURE.to_string()),
            ));
        }
        let over = self
            .check
            .ok_or_else(|| GameClientError::protocol("check response is missing `check`"))?;
        Ok(GameStatus::new(over, self.message))
    }
}

/// Body of a `/points` response.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointsEnvelope {
    /// Player points.
    pub player: u32,
    /// AI points.
    #[serde(rename = "AI")]
    pub ai: u32,
}

impl From<PointsEnvelope> for Score {
    fn from(points: PointsEnvelope) -> Self {
        Score::new(points.player, points.ai)
    }
}

/// Decodes a response body into `T`, classifying failures.
#[instrument(skip(body))]
#[track_caller]
pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, GameClientError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, body = %body, "Response body is not JSON");
        GameClientError::transport(format!("{} returned a non-JSON body: {}", endpoint, e))
    })?;
    serde_json::from_value(value).map_err(|e| {
        debug!(error = %e, body = %body, "Response has unexpected shape");
        GameClientError::protocol(format!("{} returned an unexpected body: {}", endpoint, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn create_response_becomes_board() {
        let body = r#"{"success":true,"rows":2,"cols":3,"board":[[0,1,0],[1,1,0]]}"#;
        let reply = decode::<BoardEnvelope>("/create", body).unwrap().into_reply().unwrap();
        assert_eq!(*reply.board.rows(), 2);
        assert_eq!(reply.board.occupied(), 3);
        assert_eq!(reply.message, None);
    }

    #[test]
    fn upload_response_without_success_is_accepted() {
        let body = r#"{"rows":1,"cols":1,"board":[[1]]}"#;
        let reply = decode::<BoardEnvelope>("/upload", body).unwrap().into_reply().unwrap();
        assert_eq!(reply.board.occupied(), 1);
    }

    #[test]
    fn failure_carries_server_message() {
        let body = r#"{"success":false,"message":"Step is invalid!"}"#;
        let err = decode::<BoardEnvelope>("/move", body).unwrap().into_reply().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Application("Step is invalid!".to_string()));
    }

    #[test]
    fn missing_board_is_protocol_error() {
        let body = r#"{"success":true,"rows":2,"cols":2}"#;
        let err = decode::<BoardEnvelope>("/AI", body).unwrap().into_reply().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Protocol(_)));
    }

    #[test]
    fn shape_violation_is_protocol_error() {
        let body = r#"{"success":true,"rows":2,"cols":2,"board":[[0,1]]}"#;
        let err = decode::<BoardEnvelope>("/AI", body).unwrap().into_reply().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Protocol(_)));
    }

    #[test]
    fn non_json_body_is_transport_error() {
        let err = decode::<PointsEnvelope>("/points", "<html>500</html>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Transport(_)));
    }

    #[test]
    fn points_use_uppercase_ai_key() {
        let points: PointsEnvelope = decode("/points", r#"{"player":4,"AI":7}"#).unwrap();
        assert_eq!(Score::from(points), Score::new(4, 7));
    }

    #[test]
    fn check_without_success_message() {
        let err = decode::<CheckEnvelope>("/check", r#"{"success":false}"#)
            .unwrap()
            .into_status()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Application(UNSPECIFIED_FAILURE.to_string()));
    }

    #[test]
    fn check_over_with_message() {
        let status = decode::<CheckEnvelope>(
            "/check",
            r#"{"success":true,"check":true,"message":"Player wins!"}"#,
        )
        .unwrap()
        .into_status()
        .unwrap();
        assert!(*status.over());
        assert_eq!(status.message().as_deref(), Some("Player wins!"));
    }
}
