//! The widget state machine.
//!
//! Owns visibility, form state, and the submit → result → auto-dismiss
//! sequence. All mutation goes through the transition methods here; the
//! orchestrator and the request client never touch widget state directly.
//!
//! Every transition bumps a generation counter. Deferred work (the
//! result-screen dwell, the auto-show delay, an in-flight submission)
//! captures the generation it belongs to and is discarded if the widget has
//! moved on, so a stale timer or late response never mutates newer state.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use client::{ApiClient, Environment, DEFAULT_SUBMIT_ATTEMPTS};
use domain::config::Position;
use domain::models::FeedbackSubmission;
use domain::WidgetConfig;
use tracing::{debug, info};

use crate::error::WidgetError;
use crate::reporter::ErrorReporter;
use crate::session::SessionProvider;
use crate::surface::{HandlerKind, NodeKind, NodeSpec, Surface, SurfaceNode, WidgetAction};

/// Seconds a result screen stays up before dismissing itself.
const RESULT_DWELL_SECS: u64 = 3;

/// Handlers the form panel expects from the surface.
const PANEL_HANDLERS: &[HandlerKind] = &[
    HandlerKind::Dismiss,
    HandlerKind::Rating,
    HandlerKind::Text,
    HandlerKind::Category,
    HandlerKind::Submit,
];

/// Where the widget is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetPhase {
    Hidden,
    /// The form is visible and accepting input.
    Form,
    Submitting,
    ThankYou,
    SubmitError,
}

/// The feedback widget. Cheap to clone; clones share one state machine.
#[derive(Clone)]
pub struct FeedbackWidget {
    inner: Arc<Mutex<WidgetInner>>,
}

struct WidgetInner {
    config: WidgetConfig,
    client: Arc<ApiClient>,
    session: Arc<dyn SessionProvider>,
    reporter: Arc<dyn ErrorReporter>,
    environment: Environment,
    surface: Arc<dyn Surface>,
    user_id: Arc<RwLock<String>>,
    phase: WidgetPhase,
    rating: u8,
    text: String,
    category: Option<String>,
    generation: u64,
    destroyed: bool,
    trigger: Option<SurfaceNode>,
    panel: Option<SurfaceNode>,
}

impl WidgetInner {
    fn ensure_alive(&self) -> Result<(), WidgetError> {
        if self.destroyed {
            Err(WidgetError::Destroyed)
        } else {
            Ok(())
        }
    }

    /// Create and wire both surface nodes; trigger shown, panel hidden.
    fn mount(&mut self) {
        let trigger = self.surface.create(&trigger_spec(&self.config));
        self.surface.attach_handlers(&trigger, &[HandlerKind::Toggle]);
        self.surface.set_visible(&trigger, true);

        let panel = self.surface.create(&panel_spec(&self.config));
        self.surface.attach_handlers(&panel, PANEL_HANDLERS);
        self.surface.set_visible(&panel, false);

        self.trigger = Some(trigger);
        self.panel = Some(panel);
    }

    fn teardown(&mut self) {
        if let Some(trigger) = self.trigger.take() {
            self.surface.detach_handlers(&trigger);
            self.surface.remove(&trigger);
        }
        if let Some(panel) = self.panel.take() {
            self.surface.detach_handlers(&panel);
            self.surface.remove(&panel);
        }
        self.reset_form();
        self.phase = WidgetPhase::Hidden;
    }

    fn reset_form(&mut self) {
        self.rating = 0;
        self.text.clear();
        self.category = None;
    }

    /// Panel and trigger are mutually exclusive; this is the only place
    /// their visibility flips.
    fn set_panel_visible(&mut self, panel_visible: bool) {
        if let Some(panel) = &self.panel {
            self.surface.set_visible(panel, panel_visible);
        }
        if let Some(trigger) = &self.trigger {
            self.surface.set_visible(trigger, !panel_visible);
        }
    }

    fn show_form(&mut self) {
        self.phase = WidgetPhase::Form;
        self.set_panel_visible(true);
    }

    fn dismiss(&mut self) {
        self.reset_form();
        self.phase = WidgetPhase::Hidden;
        self.set_panel_visible(false);
    }

    fn snapshot_submission(&self) -> FeedbackSubmission {
        FeedbackSubmission {
            rating: self.rating,
            text: if self.text.is_empty() {
                None
            } else {
                Some(self.text.clone())
            },
            category: self.category.clone(),
            url: self.environment.page_url.clone(),
            user_agent: self.environment.user_agent.clone(),
            timestamp: chrono::Utc::now(),
            user_id: self.user_id.read().unwrap().clone(),
            session_id: self.session.session_id(),
        }
    }
}

impl FeedbackWidget {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        config: WidgetConfig,
        client: Arc<ApiClient>,
        session: Arc<dyn SessionProvider>,
        reporter: Arc<dyn ErrorReporter>,
        environment: Environment,
        surface: Arc<dyn Surface>,
        user_id: Arc<RwLock<String>>,
    ) -> Self {
        let inner = Arc::new(Mutex::new(WidgetInner {
            config,
            client,
            session,
            reporter,
            environment,
            surface,
            user_id,
            phase: WidgetPhase::Hidden,
            rating: 0,
            text: String::new(),
            category: None,
            generation: 0,
            destroyed: false,
            trigger: None,
            panel: None,
        }));
        inner.lock().unwrap().mount();

        let widget = Self { inner };
        widget.spawn_auto_show();
        widget
    }

    /// Show the form. Only transitions from `Hidden`; otherwise a no-op.
    pub fn show(&self) -> Result<(), WidgetError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_alive()?;
        if inner.phase != WidgetPhase::Hidden {
            return Ok(());
        }
        inner.generation += 1;
        inner.show_form();
        Ok(())
    }

    /// Dismiss from any visible state, clearing in-progress form state.
    pub fn hide(&self) -> Result<(), WidgetError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_alive()?;
        if inner.phase == WidgetPhase::Hidden {
            return Ok(());
        }
        inner.generation += 1;
        inner.dismiss();
        Ok(())
    }

    pub fn toggle(&self) -> Result<(), WidgetError> {
        let hidden = {
            let inner = self.inner.lock().unwrap();
            inner.ensure_alive()?;
            inner.phase == WidgetPhase::Hidden
        };
        if hidden {
            self.show()
        } else {
            self.hide()
        }
    }

    /// Record a rating. Valid only while the form is accepting input, and
    /// only for values inside the configured domain; out-of-domain values
    /// are a caller error and leave the selection untouched.
    pub fn set_rating(&self, value: u8) -> Result<(), WidgetError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_alive()?;
        if inner.phase != WidgetPhase::Form {
            return Err(WidgetError::NotVisible);
        }
        let max = inner.config.rating_scale.max();
        if value == 0 || value > max {
            return Err(WidgetError::RatingOutOfRange { value, max });
        }
        inner.rating = value;
        Ok(())
    }

    pub fn set_text(&self, text: impl Into<String>) -> Result<(), WidgetError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_alive()?;
        if inner.phase != WidgetPhase::Form {
            return Err(WidgetError::NotVisible);
        }
        inner.text = text.into();
        Ok(())
    }

    pub fn set_category(&self, category: Option<String>) -> Result<(), WidgetError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_alive()?;
        if inner.phase != WidgetPhase::Form {
            return Err(WidgetError::NotVisible);
        }
        inner.category = category;
        Ok(())
    }

    /// Submit the current form snapshot.
    ///
    /// Transitions to `Submitting`, runs the retrying client call, then
    /// shows a result screen that dismisses itself after a fixed dwell.
    /// A terminal request failure is presented as the generic error screen;
    /// the underlying error goes to the reporter only.
    pub async fn submit(&self) -> Result<(), WidgetError> {
        let (client, submission, my_generation) = {
            let mut inner = self.inner.lock().unwrap();
            inner.ensure_alive()?;
            if inner.phase != WidgetPhase::Form {
                return Err(WidgetError::NotVisible);
            }
            if inner.rating == 0 {
                return Err(WidgetError::RatingRequired);
            }
            inner.generation += 1;
            inner.phase = WidgetPhase::Submitting;
            (
                inner.client.clone(),
                inner.snapshot_submission(),
                inner.generation,
            )
        };

        let result = client
            .submit_feedback_with_retry(&submission, DEFAULT_SUBMIT_ATTEMPTS)
            .await;

        let mut inner = self.inner.lock().unwrap();
        if inner.destroyed || inner.generation != my_generation {
            debug!("Discarding submission outcome for a superseded widget state");
            return Ok(());
        }
        inner.generation += 1;
        match result {
            Ok(receipt) => {
                info!(
                    feedback_id = receipt.feedback_id.as_deref().unwrap_or_default(),
                    "Feedback submitted"
                );
                inner.phase = WidgetPhase::ThankYou;
            }
            Err(err) => {
                inner.reporter.report("Failed to submit feedback", &err);
                inner.phase = WidgetPhase::SubmitError;
            }
        }
        let dwell_generation = inner.generation;
        drop(inner);

        self.spawn_dwell_dismiss(dwell_generation);
        Ok(())
    }

    /// Route a surface event into the corresponding transition.
    pub async fn handle_action(&self, action: WidgetAction) -> Result<(), WidgetError> {
        match action {
            WidgetAction::ToggleRequested => self.toggle(),
            WidgetAction::DismissRequested => self.hide(),
            WidgetAction::RatingSelected(value) => self.set_rating(value),
            WidgetAction::TextChanged(text) => self.set_text(text),
            WidgetAction::CategorySelected(category) => self.set_category(category),
            WidgetAction::SubmitRequested => self.submit().await,
        }
    }

    /// Destroy and fully reconstruct the rendered surface under a new
    /// configuration. The surface is never left mixing two configurations.
    pub fn update_config(&self, config: WidgetConfig, client: Arc<ApiClient>) {
        let mut inner = self.inner.lock().unwrap();
        inner.teardown();
        inner.config = config;
        inner.client = client;
        inner.destroyed = false;
        inner.generation += 1;
        inner.mount();
        drop(inner);

        self.spawn_auto_show();
    }

    /// Tear down the rendered surface and detach all handlers. Idempotent.
    pub fn destroy(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.destroyed {
            return;
        }
        inner.generation += 1;
        inner.teardown();
        inner.destroyed = true;
    }

    pub fn phase(&self) -> WidgetPhase {
        self.inner.lock().unwrap().phase
    }

    pub fn rating(&self) -> u8 {
        self.inner.lock().unwrap().rating
    }

    pub fn text(&self) -> String {
        self.inner.lock().unwrap().text.clone()
    }

    pub fn category(&self) -> Option<String> {
        self.inner.lock().unwrap().category.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.lock().unwrap().phase != WidgetPhase::Hidden
    }

    fn spawn_auto_show(&self) {
        let (enabled, delay_ms, generation) = {
            let inner = self.inner.lock().unwrap();
            (
                inner.config.auto_show,
                inner.config.auto_show_delay_ms,
                inner.generation,
            )
        };
        if !enabled {
            return;
        }
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            let mut inner = inner.lock().unwrap();
            if inner.destroyed
                || inner.generation != generation
                || inner.phase != WidgetPhase::Hidden
            {
                return;
            }
            inner.generation += 1;
            inner.show_form();
            debug!("Auto-showed the feedback form");
        });
    }

    fn spawn_dwell_dismiss(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(RESULT_DWELL_SECS)).await;
            let mut inner = inner.lock().unwrap();
            if inner.destroyed || inner.generation != generation {
                return;
            }
            inner.generation += 1;
            inner.dismiss();
        });
    }
}

fn anchor_styles(style: &mut BTreeMap<String, String>, position: &Position) {
    if let Some(v) = &position.top {
        style.insert("top".to_string(), v.clone());
    }
    if let Some(v) = &position.bottom {
        style.insert("bottom".to_string(), v.clone());
    }
    if let Some(v) = &position.left {
        style.insert("left".to_string(), v.clone());
    }
    if let Some(v) = &position.right {
        style.insert("right".to_string(), v.clone());
    }
}

fn trigger_spec(config: &WidgetConfig) -> NodeSpec {
    let mut attributes = BTreeMap::new();
    attributes.insert("id".to_string(), "feedbackly-trigger".to_string());
    attributes.insert("class".to_string(), "feedbackly-trigger".to_string());
    attributes.insert("aria-label".to_string(), config.text.title.clone());

    let mut style = BTreeMap::new();
    style.insert("position".to_string(), "fixed".to_string());
    anchor_styles(&mut style, &config.position);
    style.insert("width".to_string(), config.trigger.size.clone());
    style.insert("height".to_string(), config.trigger.size.clone());
    style.insert("border-radius".to_string(), "50%".to_string());
    style.insert(
        "background-color".to_string(),
        config.theme.primary_color.clone(),
    );
    style.insert("color".to_string(), "#ffffff".to_string());
    style.insert("font-size".to_string(), config.trigger.icon_size.clone());
    style.insert("z-index".to_string(), config.z_index.to_string());
    style.insert("cursor".to_string(), "pointer".to_string());

    NodeSpec {
        kind: NodeKind::Trigger,
        attributes,
        style,
        text: Some(config.trigger.icon.clone()),
        handlers: vec![HandlerKind::Toggle],
    }
}

fn panel_spec(config: &WidgetConfig) -> NodeSpec {
    let mut attributes = BTreeMap::new();
    attributes.insert("id".to_string(), "feedbackly-widget".to_string());
    attributes.insert("class".to_string(), "feedbackly-widget".to_string());

    let mut style = BTreeMap::new();
    style.insert("position".to_string(), "fixed".to_string());
    anchor_styles(&mut style, &config.position);
    style.insert("width".to_string(), config.size.width.clone());
    style.insert("height".to_string(), config.size.height.clone());
    style.insert(
        "background-color".to_string(),
        config.theme.background_color.clone(),
    );
    style.insert(
        "border".to_string(),
        format!("1px solid {}", config.theme.border_color),
    );
    style.insert(
        "border-radius".to_string(),
        config.theme.border_radius.clone(),
    );
    style.insert(
        "box-shadow".to_string(),
        "0 4px 20px rgba(0, 0, 0, 0.15)".to_string(),
    );
    style.insert("z-index".to_string(), config.z_index.to_string());
    style.insert("font-family".to_string(), config.theme.font_family.clone());
    style.insert("font-size".to_string(), config.theme.font_size.clone());
    style.insert("color".to_string(), config.theme.text_color.clone());

    NodeSpec {
        kind: NodeKind::Panel,
        attributes,
        style,
        text: None,
        handlers: PANEL_HANDLERS.to_vec(),
    }
}
