//! Widget configuration model.
//!
//! A validated `WidgetConfig` is the single source of truth for every other
//! component: the request client derives its endpoint, credentials and
//! timeout from it, and the widget derives its entire rendered appearance.
//! Once validated for a submission cycle the record is treated as immutable;
//! configuration changes go through [`WidgetConfig::merge`] and produce a
//! fresh record.

mod patch;

pub use patch::{
    ConfigPatch, PositionPatch, SizePatch, TextPatch, ThemePatch, TriggerPatch,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Top-level widget configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    #[validate(length(min = 1, message = "API key is required"))]
    pub api_key: String,

    #[validate(length(min = 1, message = "Website ID is required"))]
    pub website_id: String,

    /// Base URL of the collection endpoint.
    pub api_url: String,

    /// Request timeout in milliseconds.
    #[serde(rename = "timeout")]
    #[validate(range(min = 1000, message = "Timeout must be at least 1000ms"))]
    pub timeout_ms: u64,

    #[validate(nested)]
    pub theme: Theme,

    #[validate(nested)]
    pub position: Position,

    #[validate(nested)]
    pub size: Size,

    #[validate(range(min = 0, message = "zIndex must be a non-negative number"))]
    pub z_index: i64,

    #[validate(nested)]
    pub trigger: Trigger,

    #[validate(nested)]
    pub text: TextContent,

    /// Feedback categories offered in the form; empty disables the selector.
    #[validate(nested)]
    pub categories: Vec<Category>,

    /// Rating domain presented by the form.
    pub rating_scale: RatingScale,

    /// Automatically show the form after [`Self::auto_show_delay_ms`].
    pub auto_show: bool,

    #[serde(rename = "autoShowDelay")]
    pub auto_show_delay_ms: u64,

    #[validate(nested)]
    pub user: UserInfo,
}

/// Widget color scheme and typography.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    #[validate(custom(function = "shared::css::validate_css_color"))]
    pub primary_color: String,

    #[validate(custom(function = "shared::css::validate_css_color"))]
    pub background_color: String,

    #[validate(custom(function = "shared::css::validate_css_color"))]
    pub text_color: String,

    #[validate(custom(function = "shared::css::validate_css_color"))]
    pub border_color: String,

    #[validate(custom(function = "shared::css::validate_css_length"))]
    pub border_radius: String,

    pub font_family: String,

    #[validate(custom(function = "shared::css::validate_css_font_size"))]
    pub font_size: String,

    #[validate(custom(function = "shared::css::validate_css_color"))]
    pub header_background_color: String,

    #[validate(custom(function = "shared::css::validate_css_color"))]
    pub footer_background_color: String,
}

/// Anchoring of the widget inside the host viewport.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    #[validate(custom(function = "shared::css::validate_css_length"))]
    pub top: Option<String>,

    #[validate(custom(function = "shared::css::validate_css_length"))]
    pub bottom: Option<String>,

    #[validate(custom(function = "shared::css::validate_css_length"))]
    pub left: Option<String>,

    #[validate(custom(function = "shared::css::validate_css_length"))]
    pub right: Option<String>,
}

/// Dimensions of the form panel.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Size {
    #[validate(custom(function = "shared::css::validate_css_length"))]
    pub width: String,

    #[validate(custom(function = "shared::css::validate_css_length"))]
    pub height: String,
}

/// Appearance of the floating trigger control.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Trigger {
    pub icon: String,

    #[validate(custom(function = "shared::css::validate_css_length"))]
    pub size: String,

    #[validate(custom(function = "shared::css::validate_css_length"))]
    pub icon_size: String,
}

/// Display strings for the form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TextContent {
    pub title: String,
    pub rating_label: String,
    pub feedback_label: String,
    pub feedback_placeholder: String,
    pub category_label: String,
    pub submit_button: String,
    pub cancel_button: String,
}

/// A selectable feedback category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[validate(length(min = 1, message = "Category value is required"))]
    pub value: String,

    #[validate(length(min = 1, message = "Category label is required"))]
    pub label: String,
}

/// Rating domain presented by the form.
///
/// The five-step star scale and the three-step emoji scale are the two
/// shipped form layouts; the scale decides which rating values are legal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingScale {
    #[default]
    Stars,
    Emoji,
}

impl RatingScale {
    /// Highest legal rating value for this scale; the lowest is always 1.
    pub fn max(&self) -> u8 {
        match self {
            RatingScale::Stars => 5,
            RatingScale::Emoji => 3,
        }
    }
}

/// Identity of the end user, attached to submissions when known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInfo {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl UserInfo {
    /// Merge identity fields per key; present fields replace, absent keep.
    pub fn merge_from(&mut self, patch: &UserInfo) {
        if patch.id.is_some() {
            self.id = patch.id.clone();
        }
        if patch.email.is_some() {
            self.email = patch.email.clone();
        }
        if patch.name.is_some() {
            self.name = patch.name.clone();
        }
        if patch.photo_url.is_some() {
            self.photo_url = patch.photo_url.clone();
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            website_id: String::new(),
            api_url: "https://api.feedbackly.com".to_string(),
            timeout_ms: 10_000,
            theme: Theme::default(),
            position: Position::default(),
            size: Size::default(),
            z_index: 9999,
            trigger: Trigger::default(),
            text: TextContent::default(),
            categories: Vec::new(),
            rating_scale: RatingScale::Stars,
            auto_show: false,
            auto_show_delay_ms: 5000,
            user: UserInfo::default(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#007bff".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#333333".to_string(),
            border_color: "#e1e5e9".to_string(),
            border_radius: "8px".to_string(),
            font_family: "system-ui, -apple-system, sans-serif".to_string(),
            font_size: "14px".to_string(),
            header_background_color: "#f8f9fa".to_string(),
            footer_background_color: "#f8f9fa".to_string(),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            top: None,
            bottom: Some("20px".to_string()),
            left: None,
            right: Some("20px".to_string()),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: "350px".to_string(),
            height: "500px".to_string(),
        }
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            icon: "💬".to_string(),
            size: "60px".to_string(),
            icon_size: "24px".to_string(),
        }
    }
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            title: "Share Your Feedback".to_string(),
            rating_label: "How would you rate your experience?".to_string(),
            feedback_label: "Tell us more (optional)".to_string(),
            feedback_placeholder: "Share your thoughts, suggestions, or report any issues..."
                .to_string(),
            category_label: "Category".to_string(),
            submit_button: "Submit".to_string(),
            cancel_button: "Cancel".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Validate the whole record, collecting every violation.
    ///
    /// Required-field and optional-field checks all accumulate; the caller
    /// gets one aggregate error listing each violated invariant.
    pub fn ensure_valid(&self) -> Result<(), ConfigValidationError> {
        Validate::validate(self).map_err(ConfigValidationError::from)
    }
}

/// Aggregate configuration validation failure.
#[derive(Debug, Clone, Error)]
#[error("Configuration validation failed: {}", .messages.join("; "))]
pub struct ConfigValidationError {
    messages: Vec<String>,
}

impl ConfigValidationError {
    /// One message per violated invariant, sorted by field path.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl From<ValidationErrors> for ConfigValidationError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        flatten_errors("", &errors, &mut messages);
        // HashMap iteration order is unstable; keep reports deterministic.
        messages.sort();
        Self { messages }
    }
}

fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            (*field).to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for e in field_errors {
                    let message = e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten_errors(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}
