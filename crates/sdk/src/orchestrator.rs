//! The public-facing SDK object.
//!
//! Wires the configuration model, request client, and widget together and
//! exposes the lifecycle operations to the host. Every operation except
//! [`Feedbackly::init`] fails with [`SdkError::NotInitialized`] until an
//! `init` has completed successfully.

use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use client::{ApiClient, Environment};
use domain::models::{FeedbackDraft, FeedbackSubmission, SubmitReceipt, TrackedEvent};
use domain::{ConfigPatch, UserInfo, WidgetConfig};
use tracing::{info, warn};

use crate::error::SdkError;
use crate::reporter::{ErrorReporter, TracingReporter};
use crate::session::{MemorySessionProvider, SessionProvider};
use crate::surface::{HeadlessSurface, Surface};
use crate::widget::FeedbackWidget;

/// The Feedbackly SDK handle.
///
/// Construct one, `init` it with the host's configuration, and thread it
/// through the embedding code (or install it process-wide via
/// [`crate::instance`]).
pub struct Feedbackly {
    surface: Arc<dyn Surface>,
    session: Arc<dyn SessionProvider>,
    reporter: Arc<dyn ErrorReporter>,
    environment: Environment,
    user_id: Arc<RwLock<String>>,
    core: Mutex<Option<Core>>,
}

/// Everything that only exists after a successful `init`.
struct Core {
    config: WidgetConfig,
    client: Arc<ApiClient>,
    widget: FeedbackWidget,
}

impl Feedbackly {
    pub fn new(
        surface: Arc<dyn Surface>,
        session: Arc<dyn SessionProvider>,
        reporter: Arc<dyn ErrorReporter>,
        environment: Environment,
    ) -> Self {
        let user_id = Arc::new(RwLock::new(session.user_id()));
        Self {
            surface,
            session,
            reporter,
            environment,
            user_id,
            core: Mutex::new(None),
        }
    }

    /// Convenience constructor with default collaborators: no rendering,
    /// in-memory session identity, diagnostics through `tracing`.
    pub fn headless(environment: Environment) -> Self {
        Self::new(
            Arc::new(HeadlessSurface),
            Arc::new(MemorySessionProvider::new()),
            Arc::new(TracingReporter),
            environment,
        )
    }

    /// Initialize: merge the host configuration over the defaults,
    /// validate, then construct the request client and the widget.
    ///
    /// A validation failure aborts here and leaves the instance
    /// uninitialized. A remote widget-config override, when one exists and
    /// survives validation, is folded in before the widget is built so the
    /// first render already reflects it.
    pub async fn init(&self, patch: &ConfigPatch) -> Result<(), SdkError> {
        let mut config = WidgetConfig::default().merge(patch);
        config.ensure_valid()?;

        let bootstrap = ApiClient::new(&config, &self.environment);
        if let Some(remote) = bootstrap.fetch_widget_config().await {
            config = fold_remote_override(config, &remote);
        }

        // An explicit user id in configuration overrides the generated one.
        if let Some(id) = &config.user.id {
            *self.user_id.write().unwrap() = id.clone();
        }

        let client = Arc::new(ApiClient::new(&config, &self.environment));
        let widget = FeedbackWidget::new(
            config.clone(),
            client.clone(),
            self.session.clone(),
            self.reporter.clone(),
            self.environment.clone(),
            self.surface.clone(),
            self.user_id.clone(),
        );

        let mut core = self.core.lock().unwrap();
        if let Some(previous) = core.take() {
            previous.widget.destroy();
        }
        *core = Some(Core {
            config,
            client,
            widget,
        });
        info!("Feedbackly SDK initialized");
        Ok(())
    }

    pub fn show(&self) -> Result<(), SdkError> {
        self.with_core(|core| core.widget.show())??;
        Ok(())
    }

    pub fn hide(&self) -> Result<(), SdkError> {
        self.with_core(|core| core.widget.hide())??;
        Ok(())
    }

    pub fn toggle(&self) -> Result<(), SdkError> {
        self.with_core(|core| core.widget.toggle())??;
        Ok(())
    }

    /// Handle to the live widget, for host glue that routes surface events.
    pub fn widget(&self) -> Result<FeedbackWidget, SdkError> {
        self.with_core(|core| core.widget.clone())
    }

    /// Merge new identity fields. Identity does not affect rendering, so
    /// the widget is not rebuilt; an explicit `id` overrides the generated
    /// user id on subsequent submissions and events.
    pub fn set_user(&self, user: &UserInfo) -> Result<(), SdkError> {
        let mut guard = self.core.lock().unwrap();
        let core = guard.as_mut().ok_or(SdkError::NotInitialized)?;
        if let Some(id) = &user.id {
            *self.user_id.write().unwrap() = id.clone();
        }
        core.config.user.merge_from(user);
        Ok(())
    }

    /// Track a custom event. Fire-and-forget: delivery failures go to the
    /// error reporter and never to the caller, so analytics can never
    /// disrupt the feedback flow. Ordering across calls is not guaranteed.
    pub fn track(&self, event_name: &str, event_data: serde_json::Value) -> Result<(), SdkError> {
        let client = self.with_core(|core| core.client.clone())?;
        let event = TrackedEvent {
            event_name: event_name.to_string(),
            event_data,
            user_id: self.user_id.read().unwrap().clone(),
            session_id: self.session.session_id(),
            timestamp: Utc::now(),
        };
        let reporter = self.reporter.clone();
        tokio::spawn(async move {
            if let Err(err) = client.track_event(&event).await {
                warn!(event = %event.event_name, error = %err, "Event tracking failed");
                reporter.report("Failed to track event", &err);
            }
        });
        Ok(())
    }

    /// Submit feedback programmatically; a single attempt, decorated with
    /// session context. The widget's own submit path is the retrying one.
    pub async fn submit_feedback(&self, draft: FeedbackDraft) -> Result<SubmitReceipt, SdkError> {
        let client = self.with_core(|core| core.client.clone())?;
        let submission = FeedbackSubmission {
            rating: draft.rating,
            text: draft.text,
            category: draft.category,
            url: self.environment.page_url.clone(),
            user_agent: self.environment.user_agent.clone(),
            timestamp: Utc::now(),
            user_id: self.user_id.read().unwrap().clone(),
            session_id: self.session.session_id(),
        };
        Ok(client.submit_feedback(&submission).await?)
    }

    /// Merge a partial configuration over the current one and rebuild.
    ///
    /// Validation failure leaves the running configuration untouched. On
    /// success both the request client and the widget are reconstructed;
    /// neither is ever patched in place.
    pub fn update_config(&self, patch: &ConfigPatch) -> Result<(), SdkError> {
        let mut guard = self.core.lock().unwrap();
        let core = guard.as_mut().ok_or(SdkError::NotInitialized)?;

        let merged = core.config.merge(patch);
        merged.ensure_valid()?;

        if let Some(id) = &merged.user.id {
            *self.user_id.write().unwrap() = id.clone();
        }
        let client = Arc::new(ApiClient::new(&merged, &self.environment));
        core.widget.update_config(merged.clone(), client.clone());
        core.config = merged;
        core.client = client;
        info!("Configuration updated; widget rebuilt");
        Ok(())
    }

    /// Snapshot of the active configuration.
    pub fn get_config(&self) -> Result<WidgetConfig, SdkError> {
        self.with_core(|core| core.config.clone())
    }

    /// Tear down the widget and release the request client. Afterwards
    /// every operation except `init` fails with `NotInitialized`.
    pub fn destroy(&self) -> Result<(), SdkError> {
        let mut guard = self.core.lock().unwrap();
        let core = guard.take().ok_or(SdkError::NotInitialized)?;
        core.widget.destroy();
        info!("Feedbackly SDK destroyed");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.core.lock().unwrap().is_some()
    }

    fn with_core<T>(&self, f: impl FnOnce(&Core) -> T) -> Result<T, SdkError> {
        let core = self.core.lock().unwrap();
        core.as_ref().map(f).ok_or(SdkError::NotInitialized)
    }
}

/// Fold a remote widget-config override into the local configuration.
///
/// An override that fails validation is discarded with a warning; a broken
/// remote record must never take the widget down.
fn fold_remote_override(config: WidgetConfig, remote: &ConfigPatch) -> WidgetConfig {
    let candidate = config.merge(remote);
    match candidate.ensure_valid() {
        Ok(()) => candidate,
        Err(err) => {
            warn!(error = %err, "Discarding invalid remote widget config");
            config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetPhase;
    use serde_json::json;

    fn local_environment() -> Environment {
        Environment {
            page_url: "http://localhost:3000/app".to_string(),
            user_agent: "test-agent".to_string(),
            hostname: "localhost".to_string(),
            ..Environment::default()
        }
    }

    fn base_patch() -> ConfigPatch {
        ConfigPatch {
            api_key: Some("demo-api-key".to_string()),
            website_id: Some("site-1".to_string()),
            ..ConfigPatch::default()
        }
    }

    fn sdk() -> Feedbackly {
        Feedbackly::headless(local_environment())
    }

    #[test]
    fn test_operations_require_init() {
        let sdk = sdk();
        assert!(matches!(sdk.show(), Err(SdkError::NotInitialized)));
        assert!(matches!(sdk.hide(), Err(SdkError::NotInitialized)));
        assert!(matches!(sdk.toggle(), Err(SdkError::NotInitialized)));
        assert!(matches!(sdk.widget(), Err(SdkError::NotInitialized)));
        assert!(matches!(
            sdk.set_user(&UserInfo::default()),
            Err(SdkError::NotInitialized)
        ));
        assert!(matches!(
            sdk.track("page_view", json!({})),
            Err(SdkError::NotInitialized)
        ));
        assert!(matches!(
            sdk.update_config(&ConfigPatch::default()),
            Err(SdkError::NotInitialized)
        ));
        assert!(matches!(sdk.get_config(), Err(SdkError::NotInitialized)));
        assert!(matches!(sdk.destroy(), Err(SdkError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_submit_feedback_requires_init() {
        let sdk = sdk();
        assert!(matches!(
            sdk.submit_feedback(FeedbackDraft::default()).await,
            Err(SdkError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_init_rejects_invalid_config_and_stays_uninitialized() {
        let sdk = sdk();
        let err = sdk.init(&ConfigPatch::default()).await.unwrap_err();
        match err {
            SdkError::Validation(validation) => {
                let joined = validation.messages().join("\n");
                assert!(joined.contains("API key is required"));
                assert!(joined.contains("Website ID is required"));
            }
            other => panic!("expected validation error, got {other}"),
        }
        assert!(!sdk.is_initialized());
        assert!(matches!(sdk.show(), Err(SdkError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_init_then_lifecycle_operations() {
        let sdk = sdk();
        sdk.init(&base_patch()).await.unwrap();
        assert!(sdk.is_initialized());

        sdk.show().unwrap();
        assert_eq!(sdk.widget().unwrap().phase(), WidgetPhase::Form);
        sdk.hide().unwrap();
        assert_eq!(sdk.widget().unwrap().phase(), WidgetPhase::Hidden);
        sdk.toggle().unwrap();
        assert_eq!(sdk.widget().unwrap().phase(), WidgetPhase::Form);

        let config = sdk.get_config().unwrap();
        assert_eq!(config.api_key, "demo-api-key");
        assert_eq!(config.website_id, "site-1");
    }

    #[tokio::test]
    async fn test_programmatic_submit_in_simulation() {
        let sdk = sdk();
        sdk.init(&base_patch()).await.unwrap();

        let draft = FeedbackDraft {
            rating: 4,
            text: Some("nice".to_string()),
            category: None,
        };
        let first = sdk.submit_feedback(draft.clone()).await.unwrap();
        let second = sdk.submit_feedback(draft).await.unwrap();
        assert!(first.success);
        assert_ne!(first.feedback_id, second.feedback_id);
    }

    #[tokio::test]
    async fn test_track_never_fails_after_init() {
        let sdk = sdk();
        sdk.init(&base_patch()).await.unwrap();
        sdk.track("page_view", json!({"path": "/pricing"})).unwrap();
        sdk.track("cta_click", json!({})).unwrap();
    }

    #[tokio::test]
    async fn test_set_user_overrides_identity_without_rebuild() {
        let sdk = sdk();
        sdk.init(&base_patch()).await.unwrap();
        sdk.show().unwrap();

        sdk.set_user(&UserInfo {
            id: Some("crm-42".to_string()),
            email: Some("ada@example.com".to_string()),
            ..UserInfo::default()
        })
        .unwrap();

        assert_eq!(*sdk.user_id.read().unwrap(), "crm-42");
        let config = sdk.get_config().unwrap();
        assert_eq!(config.user.email.as_deref(), Some("ada@example.com"));
        // No rebuild happened: the open form is still open.
        assert_eq!(sdk.widget().unwrap().phase(), WidgetPhase::Form);
    }

    #[tokio::test]
    async fn test_update_config_validation_failure_keeps_running_config() {
        let sdk = sdk();
        sdk.init(&base_patch()).await.unwrap();

        let bad = ConfigPatch {
            theme: Some(domain::config::ThemePatch {
                primary_color: Some("not-a-color".to_string()),
                ..Default::default()
            }),
            ..ConfigPatch::default()
        };
        assert!(matches!(
            sdk.update_config(&bad),
            Err(SdkError::Validation(_))
        ));
        assert_eq!(sdk.get_config().unwrap().theme.primary_color, "#007bff");
    }

    #[tokio::test]
    async fn test_update_config_rebuilds_with_merged_values() {
        let sdk = sdk();
        sdk.init(&base_patch()).await.unwrap();
        sdk.show().unwrap();

        let patch = ConfigPatch {
            theme: Some(domain::config::ThemePatch {
                primary_color: Some("#ff0000".to_string()),
                ..Default::default()
            }),
            z_index: Some(5),
            ..ConfigPatch::default()
        };
        sdk.update_config(&patch).unwrap();

        let config = sdk.get_config().unwrap();
        assert_eq!(config.theme.primary_color, "#ff0000");
        assert_eq!(config.z_index, 5);
        // Untouched theme keys survive the one-level merge.
        assert_eq!(config.theme.background_color, "#ffffff");
        // The rebuilt widget starts hidden again.
        assert_eq!(sdk.widget().unwrap().phase(), WidgetPhase::Hidden);
    }

    #[test]
    fn test_invalid_remote_override_is_discarded() {
        let config = WidgetConfig {
            api_key: "demo-api-key".to_string(),
            website_id: "site-1".to_string(),
            ..WidgetConfig::default()
        };
        let remote = ConfigPatch {
            theme: Some(domain::config::ThemePatch {
                primary_color: Some("##nope".to_string()),
                ..Default::default()
            }),
            ..ConfigPatch::default()
        };
        let folded = fold_remote_override(config.clone(), &remote);
        assert_eq!(folded.theme.primary_color, config.theme.primary_color);
    }

    #[test]
    fn test_valid_remote_override_is_applied() {
        let config = WidgetConfig {
            api_key: "demo-api-key".to_string(),
            website_id: "site-1".to_string(),
            ..WidgetConfig::default()
        };
        let remote = ConfigPatch {
            theme: Some(domain::config::ThemePatch {
                primary_color: Some("#abcdef".to_string()),
                ..Default::default()
            }),
            ..ConfigPatch::default()
        };
        let folded = fold_remote_override(config, &remote);
        assert_eq!(folded.theme.primary_color, "#abcdef");
    }

    #[tokio::test]
    async fn test_destroy_then_reinit() {
        let sdk = sdk();
        sdk.init(&base_patch()).await.unwrap();
        sdk.destroy().unwrap();

        assert!(!sdk.is_initialized());
        assert!(matches!(sdk.destroy(), Err(SdkError::NotInitialized)));
        assert!(matches!(sdk.show(), Err(SdkError::NotInitialized)));

        sdk.init(&base_patch()).await.unwrap();
        sdk.show().unwrap();
    }
}
