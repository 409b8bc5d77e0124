//! reqwest adapter for the scoring backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use serde::{Deserialize, Serialize};

use crick_core::{
    CompleteMatchRequest, LiveStateUpdate, MatchSnapshot, RecordBallRequest,
    StartSecondInningsRequest,
};

use super::ScoringBackend;
use crate::error::SyncError;

/// Timeout and identification settings for the HTTP adapter.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL of the scoring API, e.g. `https://api.example.com/v1`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout; a delivery command that outlives this is
    /// reported as a transport failure, never retried here.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
            user_agent: format!("crick-scorer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP implementation of [`ScoringBackend`].
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

/// Error body shape returned by the backend on validation failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SyncError> {
        Self::with_config(HttpBackendConfig { base_url: base_url.into(), ..Default::default() })
    }

    pub fn with_config(config: HttpBackendConfig) -> Result<Self, SyncError> {
        let client = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| SyncError::Transport { reason: sanitize_network_error(&e) })?;
        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&T>,
    ) -> Result<MatchSnapshot, SyncError> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Transport { reason: sanitize_network_error(&e) })?;
        Self::decode(response).await
    }

    async fn decode(response: Response) -> Result<MatchSnapshot, SyncError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<MatchSnapshot>()
                .await
                .map_err(|e| SyncError::Transport { reason: sanitize_network_error(&e) });
        }
        if status.is_client_error() {
            // Backend validation failure: surface its message verbatim.
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("request rejected ({})", status));
            tracing::warn!(%status, %message, "scoring command rejected");
            return Err(SyncError::Rejected { message });
        }
        Err(SyncError::Transport { reason: format!("server error ({})", status) })
    }
}

/// Collapses reqwest errors to stable, user-presentable phrases.
fn sanitize_network_error(error: &reqwest::Error) -> String {
    if error.is_connect() {
        "connection refused or unreachable".to_string()
    } else if error.is_timeout() {
        "connection timed out".to_string()
    } else if error.is_decode() {
        "response decode error".to_string()
    } else if error.is_request() {
        "request failed".to_string()
    } else {
        "network error".to_string()
    }
}

#[async_trait]
impl ScoringBackend for HttpBackend {
    async fn record_ball(
        &self,
        match_id: &str,
        request: &RecordBallRequest,
    ) -> Result<MatchSnapshot, SyncError> {
        tracing::debug!(match_id, over = request.over, ball = request.ball, "record ball");
        self.post(&format!("/matches/{}/balls", match_id), Some(request)).await
    }

    async fn undo_last_ball(&self, match_id: &str) -> Result<MatchSnapshot, SyncError> {
        tracing::debug!(match_id, "undo last ball");
        self.post::<()>(&format!("/matches/{}/balls/undo", match_id), None).await
    }

    async fn start_second_innings(
        &self,
        match_id: &str,
        request: &StartSecondInningsRequest,
    ) -> Result<MatchSnapshot, SyncError> {
        self.post(&format!("/matches/{}/innings/second", match_id), Some(request)).await
    }

    async fn complete_match(
        &self,
        match_id: &str,
        request: &CompleteMatchRequest,
    ) -> Result<MatchSnapshot, SyncError> {
        self.post(&format!("/matches/{}/complete", match_id), Some(request)).await
    }

    async fn update_live_state(
        &self,
        match_id: &str,
        update: &LiveStateUpdate,
    ) -> Result<MatchSnapshot, SyncError> {
        let response = self
            .client
            .patch(self.url(&format!("/matches/{}/live-state", match_id)))
            .json(update)
            .send()
            .await
            .map_err(|e| SyncError::Transport { reason: sanitize_network_error(&e) })?;
        Self::decode(response).await
    }

    async fn fetch_match(&self, match_id: &str) -> Result<MatchSnapshot, SyncError> {
        let response = self
            .client
            .get(self.url(&format!("/matches/{}", match_id)))
            .send()
            .await
            .map_err(|e| SyncError::Transport { reason: sanitize_network_error(&e) })?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let backend = HttpBackend::new("https://api.example.com/v1/").unwrap();
        assert_eq!(backend.url("/matches/m1"), "https://api.example.com/v1/matches/m1");
    }

    #[test]
    fn test_default_config() {
        let config = HttpBackendConfig::default();
        assert!(config.request_timeout > config.connect_timeout);
        assert!(config.user_agent.starts_with("crick-scorer/"));
    }
}
