//! Request client for the Feedbackly SDK.
//!
//! Encapsulates every network-bound operation behind one policy: a hard
//! per-call timeout, exponential-backoff retry for user-initiated
//! submissions, and an environment-derived simulation mode that never
//! touches the network.

pub mod api;
pub mod environment;
pub mod error;
pub mod transport;

pub use api::{ApiClient, DEFAULT_SUBMIT_ATTEMPTS};
pub use environment::Environment;
pub use error::ClientError;
pub use transport::{HttpTransport, Transport, WireMethod, WireRequest, WireResponse};
