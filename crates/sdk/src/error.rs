//! SDK error types.

use client::ClientError;
use domain::ConfigValidationError;
use thiserror::Error;

/// Caller errors raised synchronously by the widget state machine.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Widget is not showing the form")]
    NotVisible,

    #[error("A rating is required before submitting")]
    RatingRequired,

    #[error("Rating {value} is outside the 1..={max} domain")]
    RatingOutOfRange { value: u8, max: u8 },

    #[error("Widget has been destroyed")]
    Destroyed,
}

/// Errors surfaced by the public SDK operations.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("SDK not initialized. Call init() first.")]
    NotInitialized,

    #[error(transparent)]
    Validation(#[from] ConfigValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Widget(#[from] WidgetError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_error_display() {
        assert_eq!(
            WidgetError::RatingOutOfRange { value: 9, max: 5 }.to_string(),
            "Rating 9 is outside the 1..=5 domain"
        );
        assert_eq!(
            WidgetError::RatingRequired.to_string(),
            "A rating is required before submitting"
        );
    }

    #[test]
    fn test_sdk_error_wraps_widget_error() {
        let err: SdkError = WidgetError::NotVisible.into();
        assert_eq!(err.to_string(), "Widget is not showing the form");
    }
}
