//! Access to the remote game engine.

mod http;

pub use http::HttpGameClient;

use crate::error::GameClientError;
use crate::game::{BoardState, GameStatus, MoveRequest, Score};
use crate::protocol::BoardReply;

/// The game server as seen by the client.
///
/// The server owns the rules, the board and the AI; every call returns a
/// full snapshot rather than a delta.
#[async_trait::async_trait]
pub trait GameServer: Send + Sync {
    /// `GET /create`: starts a fresh session with a random board.
    async fn create(&self) -> Result<BoardReply, GameClientError>;

    /// `POST /move`: applies the player's move.
    async fn submit_move(&self, request: MoveRequest) -> Result<BoardReply, GameClientError>;

    /// `GET /AI`: lets the server choose and apply the AI's move.
    async fn request_ai_move(&self) -> Result<BoardReply, GameClientError>;

    /// `GET /check`: asks whether the game is over.
    async fn check(&self) -> Result<GameStatus, GameClientError>;

    /// `GET /points`: reads both scores.
    async fn points(&self) -> Result<Score, GameClientError>;

    /// `POST /upload`: replaces the session with a board from a file.
    async fn upload(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<BoardState, GameClientError>;
}
