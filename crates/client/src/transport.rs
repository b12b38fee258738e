//! HTTP transport abstraction.
//!
//! The client speaks to the wire through this seam so tests can substitute
//! scripted transports; the production implementation rides on reqwest.

use std::time::Duration;

use crate::error::ClientError;

/// HTTP verb for an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireMethod {
    Get,
    Post,
}

/// One outbound request, body already serialized.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: WireMethod,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

/// Status and parsed body of a response.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Performs a single HTTP exchange.
///
/// Implementations report transport-level failures only; status-code
/// policy stays with the caller.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &WireRequest) -> Result<WireResponse, ClientError>;
}

/// reqwest-backed transport with JSON default headers.
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, timeout }
    }

    fn map_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &WireRequest) -> Result<WireResponse, ClientError> {
        let builder = match request.method {
            WireMethod::Get => self.client.get(&request.url),
            WireMethod::Post => self.client.post(&request.url),
        };

        let mut builder = builder
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        // Error bodies are not required to be JSON; status handling below
        // decides whether the body matters at all.
        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);

        Ok(WireResponse { status, body })
    }
}
