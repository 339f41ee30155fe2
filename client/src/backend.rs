//! Game backend seam and its HTTP implementation.
//!
//! DESIGN
//! ======
//! [`GameBackend`] is the controller's only view of the server, so tests can
//! swap in a scripted backend. [`HttpBackend`] is a thin reqwest wrapper over
//! `/play`, `/leaderboard` and `/submit_score`; response parsing is pure
//! (`parse_response`) for testability.

use std::time::Duration;

use serde::de::DeserializeOwned;
use wire::{LeaderboardEntry, Move, PlayRequest, PlayResponse, SubmitScoreRequest, SubmitScoreResponse};

const CONNECT_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend calls. All of them are recoverable.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never got a response (connect, timeout, reset).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the wire contract.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait GameBackend: Send + Sync {
    /// Play one round with `player_move`; the server picks and judges.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] on transport failure or a malformed reply.
    async fn play(&self, player_move: Move) -> Result<PlayResponse, BackendError>;

    /// Fetch the leaderboard, already ranked by the server.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] on transport failure or a malformed reply.
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, BackendError>;

    /// Record a score.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] on transport failure or a malformed reply.
    async fn submit_score(&self, request: &SubmitScoreRequest) -> Result<SubmitScoreResponse, BackendError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client rooted at `base_url` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns an error if the reqwest client fails to build.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn finish<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        parse_response(status, &text)
    }
}

#[async_trait::async_trait]
impl GameBackend for HttpBackend {
    async fn play(&self, player_move: Move) -> Result<PlayResponse, BackendError> {
        let request = self.http.post(self.url("/play")).json(&PlayRequest { player_move });
        Self::finish(request).await
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, BackendError> {
        Self::finish(self.http.get(self.url("/leaderboard"))).await
    }

    async fn submit_score(&self, request: &SubmitScoreRequest) -> Result<SubmitScoreResponse, BackendError> {
        Self::finish(self.http.post(self.url("/submit_score")).json(request)).await
    }
}

/// Map a raw HTTP response onto the wire type or a [`BackendError`].
pub(crate) fn parse_response<T: DeserializeOwned>(status: u16, text: &str) -> Result<T, BackendError> {
    if !(200..300).contains(&status) {
        return Err(BackendError::Status { status, body: text.to_owned() });
    }
    serde_json::from_str(text).map_err(|e| BackendError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;
