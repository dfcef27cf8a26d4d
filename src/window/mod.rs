//! Core Window Model
//!
//! This module defines the logical window entity tracked by the manager:
//! - Window identity (`WindowId`) and kind (`Normal` vs `Widget`)
//! - Render layers that decide visibility
//! - Parent/widget composition by id (back-references only, never ownership)
//! - Templates describing how a freshly loaded window is configured
//!
//! The stateful pieces live in the submodules: the registry of live windows,
//! the navigation stack, the order resolver and the `WindowManager` that
//! drives all of them.

pub mod manager;
pub mod order;
pub mod registry;
pub mod stack;


pub use manager::{ManagerSnapshot, OpenCallback, WindowManager};
pub use order::OrderResolver;
pub use registry::{LoadStatus, WindowRegistry};
pub use stack::{NavigationStack, StackRemoval};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identity of a window kind.
///
/// Cheap to clone; the string doubles as the key handed to the loader.
/// The empty id is the "invalid identity" and opens nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct WindowId(Arc<str>);

impl WindowId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id names an actual window kind.
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for WindowId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&WindowId> for WindowId {
    fn from(id: &WindowId) -> Self {
        id.clone()
    }
}

impl From<WindowId> for String {
    fn from(id: WindowId) -> Self {
        id.0.to_string()
    }
}

/// Window kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// Full screen or panel that takes part in back-navigation
    #[default]
    Normal,
    /// Sub-window anchored to a parent; never pushed to the navigation stack
    Widget,
}

/// Render layers a window can be assigned to.
///
/// A window is visible exactly when it sits on `Ui`; the other layers are
/// never drawn by the UI camera as plain panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderLayer {
    Ui = 5,
    Model = 6,
    Hidden = 7,
}

impl RenderLayer {
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Culling mask for a camera that renders the UI and model layers.
    pub fn camera_mask() -> u32 {
        (1 << RenderLayer::Ui.index()) | (1 << RenderLayer::Model.index())
    }
}

/// Per-kind configuration carried by a loaded window asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowTemplate {
    pub kind: WindowKind,

    /// Hide whatever is on top of the navigation stack when this opens
    pub hide_previous: bool,

    /// Explicit render order for widgets (0 = compute dynamically)
    pub fixed_order: i32,

    /// Widgets that are opened alongside this window whenever it is shown
    pub fixed_widgets: Vec<WindowId>,

    /// Offset above the parent's order; falls back to the manager default
    pub widget_order_addition: Option<i32>,

    /// Whether `close_window` destroys the instance or only hides it
    pub destroy_on_close: bool,
}

impl Default for WindowTemplate {
    fn default() -> Self {
        Self {
            kind: WindowKind::Normal,
            hide_previous: false,
            fixed_order: 0,
            fixed_widgets: Vec::new(),
            widget_order_addition: None,
            destroy_on_close: true,
        }
    }
}

impl WindowTemplate {
    pub fn widget() -> Self {
        Self {
            kind: WindowKind::Widget,
            ..Self::default()
        }
    }

    pub fn with_hide_previous(mut self, hide_previous: bool) -> Self {
        self.hide_previous = hide_previous;
        self
    }

    pub fn with_fixed_order(mut self, fixed_order: i32) -> Self {
        self.fixed_order = fixed_order;
        self
    }

    pub fn with_fixed_widgets<I, T>(mut self, widgets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<WindowId>,
    {
        self.fixed_widgets = widgets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_widget_order_addition(mut self, addition: i32) -> Self {
        self.widget_order_addition = Some(addition);
        self
    }

    pub fn with_destroy_on_close(mut self, destroy_on_close: bool) -> Self {
        self.destroy_on_close = destroy_on_close;
        self
    }
}

/// A live logical window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Window {
    id: WindowId,
    kind: WindowKind,
    layer: RenderLayer,

    /// Back-reference to the hosting window, resolved through the registry
    parent: Option<WindowId>,

    /// Live windows currently parented here, in attach order
    widgets: Vec<WindowId>,

    fixed_widgets: Vec<WindowId>,
    render_order: i32,
    hide_previous: bool,
    fixed_order: i32,
    widget_order_addition: i32,
    destroy_on_close: bool,
}

impl Window {
    /// Instantiate a window from its template.
    ///
    /// New windows start hidden with a baseline order; the manager activates
    /// them once they are registered.
    pub fn from_template(id: WindowId, template: &WindowTemplate, default_addition: i32) -> Self {
        Self {
            id,
            kind: template.kind,
            layer: RenderLayer::Hidden,
            parent: None,
            widgets: Vec::new(),
            fixed_widgets: template.fixed_widgets.clone(),
            render_order: 0,
            hide_previous: template.hide_previous,
            fixed_order: template.fixed_order,
            widget_order_addition: template.widget_order_addition.unwrap_or(default_addition),
            destroy_on_close: template.destroy_on_close,
        }
    }

    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn layer(&self) -> RenderLayer {
        self.layer
    }

    pub fn is_visible(&self) -> bool {
        self.layer == RenderLayer::Ui
    }

    pub fn parent(&self) -> Option<&WindowId> {
        self.parent.as_ref()
    }

    pub fn widgets(&self) -> &[WindowId] {
        &self.widgets
    }

    pub fn has_widget(&self, id: &WindowId) -> bool {
        self.widgets.contains(id)
    }

    pub fn fixed_widgets(&self) -> &[WindowId] {
        &self.fixed_widgets
    }

    pub fn render_order(&self) -> i32 {
        self.render_order
    }

    pub fn hide_previous(&self) -> bool {
        self.hide_previous
    }

    pub fn fixed_order(&self) -> i32 {
        self.fixed_order
    }

    pub fn widget_order_addition(&self) -> i32 {
        self.widget_order_addition
    }

    pub fn destroy_on_close(&self) -> bool {
        self.destroy_on_close
    }

    pub(crate) fn set_layer(&mut self, layer: RenderLayer) -> bool {
        if self.layer == layer {
            return false;
        }
        self.layer = layer;
        true
    }

    pub(crate) fn set_render_order(&mut self, order: i32) {
        self.render_order = order;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<WindowId>) {
        self.parent = parent;
    }

    pub(crate) fn add_widget(&mut self, id: WindowId) -> bool {
        if self.widgets.contains(&id) {
            return false;
        }
        self.widgets.push(id);
        true
    }

    pub(crate) fn remove_widget(&mut self, id: &WindowId) -> bool {
        let before = self.widgets.len();
        self.widgets.retain(|w| w != id);
        self.widgets.len() != before
    }
}
