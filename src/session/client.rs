//! Transport from the session controller to the response service

use crate::api::{ChatReply, ChatRequest, ErrorResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Failure to obtain a reply, as seen by the controller
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed reply: {0}")]
    Decode(String),
}

/// Anything that can answer a chat turn
#[async_trait]
pub trait ResponseClient: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ClientError>;
}

/// Client for the `/api/chat` endpoint
pub struct HttpResponseClient {
    client: Client,
    endpoint: String,
}

impl HttpResponseClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ResponseClient for HttpResponseClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body).map_or(body, |err| {
                match err.details {
                    Some(details) => format!("{}: {details}", err.error),
                    None => err.error,
                }
            });
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
