//! Score refresh.

use crate::client::GameServer;
use crate::error::GameClientError;
use crate::events::{EventSink, GameEvent};
use crate::game::Score;
use tracing::{debug, instrument};

/// Fetches and publishes both scores. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreTracker;

impl ScoreTracker {
    /// Fetches `/points` and publishes the result.
    #[instrument(skip_all)]
    pub async fn refresh<S: GameServer + ?Sized>(
        &self,
        server: &S,
        events: &EventSink,
    ) -> Result<Score, GameClientError> {
        let score = server.points().await?;
        debug!(player = score.player(), ai = score.ai(), "Score refreshed");
        events.emit(GameEvent::ScoreChanged(score));
        Ok(score)
    }
}
