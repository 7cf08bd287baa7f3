//! Upstream HTTP client
//!
//! Thin authenticated JSON client shared by every command. Non-success
//! responses become [`ApiError::Http`] carrying the upstream status and the
//! `error.message` field of Google's error body when present.

use crate::config::AppConfig;
use crate::error::ApiError;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    access_token: String,
    publisher_base_url: String,
    reporting_base_url: String,
}

// Helper function to map transport errors to ApiError
fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ApiError::Transport(format!("Connection error: {}", error))
    } else if error.is_decode() {
        ApiError::Transport(format!("Invalid response body: {}", error))
    } else {
        ApiError::Transport(format!("HTTP error: {}", error))
    }
}

fn build_http_client(request_timeout: Duration) -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(HTTP_CONNECT_TIMEOUT.min(request_timeout))
        .timeout(request_timeout)
        .user_agent(concat!("gplay/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))
}

/// Extract Google's `{"error": {"message": ...}}` message, or fall back to the raw body.
fn upstream_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        })
}

impl ApiClient {
    /// Build from configuration. Fails with [`ApiError::MissingCredentials`]
    /// when no token is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let access_token = config
            .auth
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ApiError::MissingCredentials)?;
        Ok(Self {
            http: build_http_client(config.request.timeout())?,
            access_token,
            publisher_base_url: config.api.publisher_base_url.trim_end_matches('/').to_string(),
            reporting_base_url: config.api.reporting_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn publisher_url(&self, path: &str) -> String {
        format!("{}/androidpublisher/v3/{}", self.publisher_base_url, path)
    }

    pub fn reporting_url(&self, path: &str) -> String {
        format!("{}/v1beta1/{}", self.reporting_base_url, path)
    }

    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        debug!(method = "GET", url, "Upstream request");
        self.send(self.http.get(url).query(query)).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Value, ApiError> {
        debug!(method = "POST", url, "Upstream request");
        self.send(self.http.post(url).json(body)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::read_json(response).await
    }

    async fn read_json(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(status, &body);
            debug!(status = status.as_u16(), %message, "Upstream error response");
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }
        let text = response.text().await.map_err(map_transport_error)?;
        if text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        Ok(serde_json::from_str(&text)?)
    }
}
