//! Request client error types.

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the request client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response arrived before the deadline; the in-flight call was
    /// cancelled and any late completion is discarded.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-2xx status.
    #[error("HTTP error status: {0}")]
    HttpStatus(u16),

    /// DNS, connection, or abort failure below the HTTP layer.
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
