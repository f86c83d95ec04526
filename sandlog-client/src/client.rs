// Copyright 2025 Sandlog (https://github.com/sandlog/sandlog)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! HTTP client for the robot-management service.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use sandlog_core::{ChangeHistoryEntry, PartSnapshot};

/// Errors from the robot-management service boundary.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for robot-service operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Robot-management-service client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the robot-management service.
    pub base_url: String,
    /// Optional API key, sent as `X-Api-Key`.
    pub api_key: Option<String>,
    /// Request timeout, applied uniformly to every call (default: 30s).
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The two reads the configuration resolver needs from the service.
///
/// Kept behind a trait so the resolver can be exercised against an
/// in-memory feed in tests.
#[async_trait]
pub trait RobotApi: Send + Sync {
    /// Full change history for a part, newest-first.
    async fn change_history(&self, part_id: &str) -> Result<Vec<ChangeHistoryEntry>>;

    /// The part as currently configured.
    async fn current_part(&self, part_id: &str) -> Result<PartSnapshot>;
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<ChangeHistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    part: PartSnapshot,
}

/// reqwest-backed [`RobotApi`] implementation.
pub struct RobotServiceClient {
    config: ClientConfig,
    http: HttpClient,
}

impl RobotServiceClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        let mut request = self.http.get(&url);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("X-Api-Key", api_key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RobotApi for RobotServiceClient {
    async fn change_history(&self, part_id: &str) -> Result<Vec<ChangeHistoryEntry>> {
        let response: HistoryResponse = self
            .get_json(&format!("/api/v1/parts/{part_id}/history"))
            .await?;
        Ok(response.history)
    }

    async fn current_part(&self, part_id: &str) -> Result<PartSnapshot> {
        let response: PartResponse = self.get_json(&format!("/api/v1/parts/{part_id}")).await?;
        Ok(response.part)
    }
}
