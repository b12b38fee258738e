//! Feedback submission models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-supplied feedback fields, before decoration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackDraft {
    pub rating: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A fully decorated submission, created per submit attempt and dropped
/// once the request resolves. Never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub rating: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Page the feedback was given on.
    pub url: String,

    pub user_agent: String,

    pub timestamp: DateTime<Utc>,

    pub user_id: String,

    pub session_id: String,
}

/// Server acknowledgment of an accepted submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitReceipt {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
