//! Feedbackly SDK: an embeddable feedback-collection widget core.
//!
//! The SDK is wired together by [`Feedbackly`]: a validated
//! [`WidgetConfig`](domain::WidgetConfig) drives a request client with an
//! offline simulation mode, and the [`widget::FeedbackWidget`] state machine
//! owns everything the end user sees. Host glue supplies the rendering
//! surface, session identity, and error sink through the ports in this
//! crate.

pub mod error;
pub mod instance;
pub mod logging;
pub mod orchestrator;
pub mod reporter;
pub mod session;
pub mod surface;
pub mod widget;

pub use client::{ApiClient, ClientError, Environment};
pub use domain::models::{FeedbackDraft, SubmitReceipt, TrackAck, TrackedEvent};
pub use domain::{ConfigPatch, ConfigValidationError, UserInfo, WidgetConfig};
pub use error::{SdkError, WidgetError};
pub use orchestrator::Feedbackly;
pub use reporter::{ErrorReporter, NoopReporter, TracingReporter};
pub use session::{MemorySessionProvider, SessionProvider};
pub use surface::{HandlerKind, HeadlessSurface, NodeKind, NodeSpec, Surface, SurfaceNode, WidgetAction};
pub use widget::{FeedbackWidget, WidgetPhase};
