//! The API client.

use std::sync::Arc;
use std::time::Duration;

use domain::models::{FeedbackSubmission, SubmitReceipt, TrackAck, TrackedEvent};
use domain::{ConfigPatch, WidgetConfig};
use tracing::{debug, warn};

use crate::environment::Environment;
use crate::error::ClientError;
use crate::transport::{HttpTransport, Transport, WireMethod, WireRequest, WireResponse};

/// Default number of attempts for user-initiated submissions.
pub const DEFAULT_SUBMIT_ATTEMPTS: u32 = 3;

/// Client for the feedback collection API.
///
/// The simulation flag is computed once at construction and never changes;
/// a configuration change requires constructing a new client.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    api_key: String,
    website_id: String,
    timeout: Duration,
    simulate: bool,
}

impl ApiClient {
    /// Create a client from a validated configuration.
    pub fn new(config: &WidgetConfig, environment: &Environment) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        Self::with_transport(config, environment, Arc::new(HttpTransport::new(timeout)))
    }

    /// Construction seam for custom transports.
    pub fn with_transport(
        config: &WidgetConfig,
        environment: &Environment,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let simulate = environment.resolve_simulation(&config.api_key, &config.api_url);
        if simulate {
            debug!("Simulation mode active; requests will not leave the page");
        }
        Self {
            transport,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            website_id: config.website_id.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            simulate,
        }
    }

    /// Whether this client fabricates responses instead of using the wire.
    pub fn is_simulating(&self) -> bool {
        self.simulate
    }

    /// Submit feedback; a single attempt.
    pub async fn submit_feedback(
        &self,
        submission: &FeedbackSubmission,
    ) -> Result<SubmitReceipt, ClientError> {
        if self.simulate {
            tokio::task::yield_now().await;
            let receipt = SubmitReceipt {
                success: true,
                feedback_id: Some(shared::ids::simulated_receipt_id()),
                message: Some("Feedback submitted (local simulation)".to_string()),
            };
            debug!(
                feedback_id = receipt.feedback_id.as_deref().unwrap_or_default(),
                "Simulated feedback submission"
            );
            return Ok(receipt);
        }

        let body = self.authenticated_body(serde_json::to_value(submission)?);
        let response = self
            .request(WireMethod::Post, "/api/feedback", Some(body))
            .await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Submit feedback with retries and exponential backoff.
    ///
    /// Attempts are strictly sequential: attempt *i + 1* only starts after
    /// attempt *i* failed and a `2^i`-second wait elapsed. The final
    /// attempt's failure is propagated unmodified; earlier failures are
    /// swallowed.
    pub async fn submit_feedback_with_retry(
        &self,
        submission: &FeedbackSubmission,
        attempts: u32,
    ) -> Result<SubmitReceipt, ClientError> {
        let attempts = attempts.max(1);
        let mut attempt = 0u32;
        loop {
            match self.submit_feedback(submission).await {
                Ok(receipt) => return Ok(receipt),
                Err(err) if attempt + 1 < attempts => {
                    let wait = Duration::from_secs(1u64 << attempt);
                    debug!(
                        attempt,
                        error = %err,
                        wait_secs = wait.as_secs(),
                        "Submission attempt failed; backing off"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Track an analytics event; a single attempt.
    ///
    /// Callers that must not be disrupted by tracking failures (everything
    /// user-facing) absorb the error instead of propagating it.
    pub async fn track_event(&self, event: &TrackedEvent) -> Result<TrackAck, ClientError> {
        if self.simulate {
            tokio::task::yield_now().await;
            debug!(event = %event.event_name, "Simulated event tracking");
            return Ok(TrackAck::simulated());
        }

        let body = self.authenticated_body(serde_json::to_value(event)?);
        let response = self
            .request(WireMethod::Post, "/api/events", Some(body))
            .await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Fetch the remote widget-config override for this website, if any.
    ///
    /// Failures are absorbed here: a missing or broken override must never
    /// break widget construction.
    pub async fn fetch_widget_config(&self) -> Option<ConfigPatch> {
        if self.simulate {
            debug!("Simulation mode: no remote widget config");
            return None;
        }

        let path = format!("/api/widget/config/{}", self.website_id);
        match self.request(WireMethod::Get, &path, None).await {
            Ok(response) => match serde_json::from_value::<ConfigPatch>(response.body) {
                Ok(patch) => Some(patch),
                Err(err) => {
                    warn!(error = %err, "Remote widget config was not understood");
                    None
                }
            },
            Err(err) => {
                warn!(error = %err, "Failed to fetch remote widget config");
                None
            }
        }
    }

    /// Merge `websiteId` and `apiKey` into an outbound JSON body.
    fn authenticated_body(&self, payload: serde_json::Value) -> serde_json::Value {
        let mut map = match payload {
            serde_json::Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert(
            "websiteId".to_string(),
            serde_json::Value::String(self.website_id.clone()),
        );
        map.insert(
            "apiKey".to_string(),
            serde_json::Value::String(self.api_key.clone()),
        );
        serde_json::Value::Object(map)
    }

    /// Perform one exchange under the hard call timeout.
    async fn request(
        &self,
        method: WireMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<WireResponse, ClientError> {
        let request = WireRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            body,
        };

        let response = tokio::time::timeout(self.timeout, self.transport.send(&request))
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))??;

        if !(200..300).contains(&response.status) {
            return Err(ClientError::HttpStatus(response.status));
        }
        Ok(response)
    }
}
