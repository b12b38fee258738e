//! Event tracking models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked analytics event, decorated with session context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEvent {
    pub event_name: String,

    pub event_data: serde_json::Value,

    pub user_id: String,

    pub session_id: String,

    pub timestamp: DateTime<Utc>,
}

/// Server acknowledgment of a tracked event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackAck {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TrackAck {
    /// Fixed acknowledgment returned in local simulation.
    pub fn simulated() -> Self {
        Self {
            success: true,
            message: Some("Event tracked (local simulation)".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tracked_event_wire_shape() {
        let event = TrackedEvent {
            event_name: "page_view".to_string(),
            event_data: json!({"path": "/pricing"}),
            user_id: "user_abc".to_string(),
            session_id: "session_def".to_string(),
            timestamp: "2024-05-01T12:30:45Z".parse().unwrap(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"eventName\":\"page_view\""));
        assert!(json.contains("\"eventData\":{\"path\":\"/pricing\"}"));
        assert!(json.contains("\"timestamp\":\"2024-05-01T12:30:45Z\""));
    }

    #[test]
    fn test_simulated_ack() {
        let ack = TrackAck::simulated();
        assert!(ack.success);
        assert_eq!(ack.message.as_deref(), Some("Event tracked (local simulation)"));
    }
}
