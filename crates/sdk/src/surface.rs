//! Rendering surface port.
//!
//! The core never renders anything itself. It hands the host a declarative
//! description of each node and drives visibility through this trait; the
//! host-side adapter owns actual element creation and event wiring, and
//! routes user input back as [`WidgetAction`]s.

use std::collections::BTreeMap;

use uuid::Uuid;

/// What a rendered node is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The floating control that opens the form.
    Trigger,
    /// The form panel, including its result screens.
    Panel,
}

/// Handler categories a node expects the surface to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Toggle,
    Dismiss,
    Rating,
    Text,
    Category,
    Submit,
}

/// User input routed back from the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetAction {
    /// Trigger control activated.
    ToggleRequested,
    /// Close control, Cancel, outside click, or Escape.
    DismissRequested,
    RatingSelected(u8),
    TextChanged(String),
    CategorySelected(Option<String>),
    SubmitRequested,
}

/// Declarative description of a rendered node.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub attributes: BTreeMap<String, String>,
    /// Inline style map derived from the validated configuration.
    pub style: BTreeMap<String, String>,
    /// Text content, e.g. the trigger icon.
    pub text: Option<String>,
    pub handlers: Vec<HandlerKind>,
}

/// Opaque handle to a node owned by the surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceNode {
    id: Uuid,
}

impl SurfaceNode {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Produces and manages visual nodes for the widget.
pub trait Surface: Send + Sync {
    fn create(&self, spec: &NodeSpec) -> SurfaceNode;

    fn attach_handlers(&self, node: &SurfaceNode, handlers: &[HandlerKind]);

    fn detach_handlers(&self, node: &SurfaceNode);

    fn set_visible(&self, node: &SurfaceNode, visible: bool);

    fn remove(&self, node: &SurfaceNode);
}

/// Surface that renders nothing.
///
/// Useful for embedders that only use the programmatic API, and for tests.
#[derive(Debug, Default)]
pub struct HeadlessSurface;

impl Surface for HeadlessSurface {
    fn create(&self, _spec: &NodeSpec) -> SurfaceNode {
        SurfaceNode::new()
    }

    fn attach_handlers(&self, _node: &SurfaceNode, _handlers: &[HandlerKind]) {}

    fn detach_handlers(&self, _node: &SurfaceNode) {}

    fn set_visible(&self, _node: &SurfaceNode, _visible: bool) {}

    fn remove(&self, _node: &SurfaceNode) {}
}
