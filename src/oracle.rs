//! Game-over queries.

use crate::client::GameServer;
use crate::error::GameClientError;
use crate::game::GameStatus;
use tracing::{info, instrument};

/// Asks the server whether the game has ended. Never touches the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndgameOracle;

impl EndgameOracle {
    /// Queries `/check`.
    #[instrument(skip_all)]
    pub async fn check_over<S: GameServer + ?Sized>(
        &self,
        server: &S,
    ) -> Result<GameStatus, GameClientError> {
        let status = server.check().await?;
        if *status.over() {
            info!(message = ?status.message(), "Server reports game over");
        }
        Ok(status)
    }
}
