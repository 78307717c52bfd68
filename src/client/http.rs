//! HTTP client for the game server.

use super::GameServer;
use crate::error::GameClientError;
use crate::game::{BoardState, GameStatus, MoveRequest, Score};
use crate::protocol::{self, BoardEnvelope, BoardReply, CheckEnvelope, PointsEnvelope};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

/// HTTP client for the game server.
#[derive(Debug, Clone)]
pub struct HttpGameClient {
    /// Base URL of game server, without trailing slash.
    base_url: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl HttpGameClient {
    /// Creates a client for the server at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Creating HTTP game client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Sends a request and decodes its body, classifying every failure.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GameClientError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, endpoint, "Failed to send request");
            GameClientError::transport(format!("{} request failed: {}", endpoint, e))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!(error = %e, endpoint, "Failed to read response body");
            GameClientError::transport(format!("failed to read {} response: {}", endpoint, e))
        })?;
        debug!(endpoint, status = %status, body = %text, "Received response");

        if !status.is_success() {
            warn!(endpoint, status = %status, "Server returned error status");
            return Err(GameClientError::transport(format!(
                "{} returned HTTP {}",
                endpoint, status
            )));
        }

        protocol::decode(endpoint, &text)
    }
}

#[async_trait::async_trait]
impl GameServer for HttpGameClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn create(&self) -> Result<BoardReply, GameClientError> {
        info!("Requesting new board");
        let envelope: BoardEnvelope = self
            .fetch("/create", self.client.get(self.url("/create")))
            .await?;
        envelope.into_reply()
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn submit_move(&self, request: MoveRequest) -> Result<BoardReply, GameClientError> {
        info!(direction = %request.direction, index = request.index, "Sending move to server");
        let envelope: BoardEnvelope = self
            .fetch("/move", self.client.post(self.url("/move")).json(&request))
            .await?;
        envelope.into_reply()
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn request_ai_move(&self) -> Result<BoardReply, GameClientError> {
        info!("Requesting AI move");
        let envelope: BoardEnvelope = self.fetch("/AI", self.client.get(self.url("/AI"))).await?;
        envelope.into_reply()
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn check(&self) -> Result<GameStatus, GameClientError> {
        debug!("Checking for game over");
        let envelope: CheckEnvelope = self
            .fetch("/check", self.client.get(self.url("/check")))
            .await?;
        envelope.into_status()
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn points(&self) -> Result<Score, GameClientError> {
        debug!("Fetching points");
        let points: PointsEnvelope = self
            .fetch("/points", self.client.get(self.url("/points")))
            .await?;
        Ok(points.into())
    }

    #[instrument(skip(self, contents), fields(base_url = %self.base_url, bytes = contents.len()))]
    async fn upload(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<BoardState, GameClientError> {
        info!("Uploading board file");
        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/plain")?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let envelope: BoardEnvelope = self
            .fetch("/upload", self.client.post(self.url("/upload")).multipart(form))
            .await?;
        Ok(envelope.into_reply()?.board)
    }
}
