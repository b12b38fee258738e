//! Domain layer for the Feedbackly SDK.
//!
//! This crate contains:
//! - The widget configuration model (defaults, validation, merging)
//! - Submission and tracking wire models
//! - Domain error types

pub mod config;
pub mod models;

pub use config::{
    Category, ConfigPatch, ConfigValidationError, Position, RatingScale, Size, TextContent, Theme,
    Trigger, UserInfo, WidgetConfig,
};
