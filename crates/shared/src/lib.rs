//! Shared utilities for the Feedbackly SDK.
//!
//! This crate provides common functionality used across the other crates:
//! - CSS value validation (colors, lengths, font sizes)
//! - Opaque identifier generation (receipts, users, sessions)

pub mod css;
pub mod ids;
