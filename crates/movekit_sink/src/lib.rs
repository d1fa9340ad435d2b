//! Remote submission logger.
//!
//! The endpoint is an opaque webhook (an Apps Script bridge in production)
//! that parses the raw POST body as JSON. The body is sent as
//! `text/plain;charset=utf-8` — the endpoint accepts it and the original
//! browser client relied on that simple content type to avoid a CORS
//! preflight, so the wire contract stays as-is.
//!
//! Failure never escapes as a panic: everything comes back as the `Err`
//! value and the caller decides what failure means. For the submission flow
//! it means a warning log and nothing else.

use movekit_protocol::SheetPayload;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

pub type Result<T> = std::result::Result<T, SinkError>;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// HTTP client for the webhook endpoint. One POST per submission, no retry,
/// no backoff — a lost log line is acceptable, a stuck form is not.
#[derive(Debug, Clone, Default)]
pub struct SheetSink {
    client: Client,
}

impl SheetSink {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// POST `payload` to `endpoint_url`. Any 2xx counts as success and the
    /// response body is returned as opaque text.
    pub async fn send(&self, payload: &SheetPayload, endpoint_url: &str) -> Result<String> {
        let body = serde_json::to_string(payload)?;
        debug!(endpoint = endpoint_url, bytes = body.len(), "posting submission");

        let response = self
            .client
            .post(endpoint_url)
            .header("content-type", "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(SinkError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}
