//! Window lifecycle orchestration
//!
//! `WindowManager` is the public surface of the crate. It owns the registry,
//! the navigation stack and the order resolver, and drives them in response
//! to `open`, `close`, `close_all` and `close_all_and_open`.
//!
//! All state changes happen on the caller's control thread. The only
//! asynchronous step is the asset load: its result is queued and applied by
//! [`WindowManager::pump`], which re-validates that the request is still
//! wanted before instantiating anything.

use super::order::OrderResolver;
use super::registry::{LoadStatus, WindowRegistry};
use super::stack::{NavigationStack, StackRemoval};
use super::{RenderLayer, Window, WindowId, WindowKind};
use crate::config::{ManagerConfig, PresentationConfig, StackUiConfig};
use crate::error::WindowError;
use crate::input::{InputRouter, NullInputRouter};
use crate::loader::{CompletedLoad, LoadQueue, Loader};
use crate::renderer::{NullRenderTarget, RenderTarget};
use anyhow::Result;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::HashMap;

/// Invoked once an `open` finishes, with the opened window's id.
///
/// Receives `None` when the requested identity was invalid. The manager is
/// passed back in so the callback may issue further window operations.
pub type OpenCallback = Box<dyn FnOnce(&mut WindowManager, Option<WindowId>)>;

/// Bookkeeping for a load request that has not completed yet.
struct PendingLoad {
    ticket: u64,
    parent: Option<WindowId>,
    callback: Option<OpenCallback>,
}

/// Serializable view of the manager state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerSnapshot {
    /// Live windows, sorted by id
    pub windows: Vec<Window>,
    /// Ids whose load is in flight
    pub loading: Vec<WindowId>,
    /// Navigation stack, bottom to top
    pub stack: Vec<WindowId>,
    pub touch_enabled: bool,
}

pub struct WindowManager {
    config: ManagerConfig,
    presentation: PresentationConfig,

    /// Live windows and load status per id
    registry: WindowRegistry,

    /// Back-navigable normal windows
    stack: NavigationStack,

    resolver: OrderResolver,

    loader: Option<Box<dyn Loader>>,
    renderer: Box<dyn RenderTarget>,
    input: Box<dyn InputRouter>,

    /// Completed loads waiting for `pump`
    loads: LoadQueue,

    /// Outstanding load requests by id
    pending: HashMap<WindowId, PendingLoad>,
    next_ticket: u64,

    touch_enabled: bool,
}

impl WindowManager {
    /// Create a manager with collaborators that draw nothing.
    pub fn new(config: &StackUiConfig) -> Result<Self> {
        Self::with_collaborators(
            config,
            Box::new(NullRenderTarget),
            Box::new(NullInputRouter::default()),
        )
    }

    pub fn with_collaborators(
        config: &StackUiConfig,
        mut renderer: Box<dyn RenderTarget>,
        mut input: Box<dyn InputRouter>,
    ) -> Result<Self> {
        config.validate()?;

        renderer.configure_camera(&config.camera, RenderLayer::camera_mask());
        input.configure(&config.input);

        Ok(Self {
            config: config.manager.clone(),
            presentation: config.presentation.clone(),
            registry: WindowRegistry::new(),
            stack: NavigationStack::new(),
            resolver: OrderResolver::new(config.manager.order_increment),
            loader: None,
            renderer,
            input,
            loads: LoadQueue::new(),
            pending: HashMap::new(),
            next_ticket: 1,
            touch_enabled: true,
        })
    }

    /// Install the asset loader used for windows that are not live yet.
    pub fn set_loader(&mut self, loader: impl Loader + 'static) {
        self.loader = Some(Box::new(loader));
    }

    pub fn has_loader(&self) -> bool {
        self.loader.is_some()
    }

    /// Enable or disable UI input.
    pub fn set_touch(&mut self, touchable: bool) {
        self.touch_enabled = touchable;
        self.input.set_input_enabled(touchable);
    }

    pub fn is_touch_enabled(&self) -> bool {
        self.touch_enabled
    }

    pub fn get(&self, id: &WindowId) -> Option<&Window> {
        self.registry.get(id)
    }

    pub fn status(&self, id: &WindowId) -> LoadStatus {
        self.registry.status(id)
    }

    /// Window currently on top of the navigation stack
    pub fn top(&self) -> Option<&WindowId> {
        self.stack.top()
    }

    /// Navigation stack, bottom to top
    pub fn stack(&self) -> &[WindowId] {
        self.stack.entries()
    }

    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.registry.windows()
    }

    pub fn window_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of load requests still waiting for their completion.
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    // === Open ===

    /// Open a window, loading it first if it is not live.
    ///
    /// Reopening a live window re-presents it (reparenting, stacking and
    /// ordering it again). A second `open` while the first load is still in
    /// flight is ignored and its callback is dropped.
    pub fn open(
        &mut self,
        id: impl Into<WindowId>,
        parent: Option<WindowId>,
        callback: Option<OpenCallback>,
    ) {
        let id = id.into();

        if self.loader.is_none() {
            error!("{}", WindowError::LoaderMissing(id));
            return;
        }

        if !id.is_valid() {
            debug!("{}", WindowError::InvalidIdentity);
            if let Some(callback) = callback {
                callback(self, None);
            }
            return;
        }

        if self.registry.contains(&id) {
            self.reparent(&id, parent.as_ref());
            self.present(&id);
            if let Some(callback) = callback {
                callback(self, Some(id));
            }
            return;
        }

        if self.registry.status(&id) == LoadStatus::Loading {
            debug!("Window {} is already loading; ignoring open", id);
            return;
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        self.registry.set_status(id.clone(), LoadStatus::Loading);
        self.pending.insert(
            id.clone(),
            PendingLoad {
                ticket,
                parent,
                callback,
            },
        );

        debug!("Requesting load of window {} (ticket {})", id, ticket);
        let completion = self.loads.handle(id.clone(), ticket);
        if let Some(loader) = self.loader.as_mut() {
            loader.load(id.as_str(), completion);
        }
    }

    /// Apply every load result queued so far.
    ///
    /// Call this from the control loop. Returns the number of results
    /// processed, including discarded ones.
    pub fn pump(&mut self) -> usize {
        let completed = self.loads.drain();
        let count = completed.len();
        for done in completed {
            self.finish_load(done);
        }
        count
    }

    fn finish_load(&mut self, done: CompletedLoad) {
        let CompletedLoad { id, ticket, asset } = done;

        let current = self.registry.status(&id) == LoadStatus::Loading
            && self.pending.get(&id).map(|p| p.ticket) == Some(ticket);
        if !current {
            debug!("{}", WindowError::StaleCompletion(id));
            return;
        }
        let Some(pending) = self.pending.remove(&id) else {
            return;
        };

        let Some(asset) = asset else {
            warn!("{}", WindowError::LoadFailed(id.clone()));
            self.registry.set_status(id, LoadStatus::None);
            return;
        };

        let template = asset.template.unwrap_or_default();
        let window = Window::from_template(id.clone(), &template, self.config.widget_order_addition);
        if self.registry.register(window).is_some() {
            warn!("Window {} was registered twice; replacing the old instance", id);
        }
        self.renderer.attach(&id, &self.presentation);
        info!("Loaded window {} ({:?})", id, template.kind);

        self.reparent(&id, pending.parent.as_ref());
        self.present(&id);

        if let Some(callback) = pending.callback {
            callback(self, Some(id));
        }
    }

    /// Hide the previous top if requested, stack, order and show a live window.
    fn present(&mut self, id: &WindowId) {
        let Some((kind, hide_previous)) = self.registry.get(id).map(|w| (w.kind(), w.hide_previous()))
        else {
            return;
        };

        if hide_previous {
            if let Some(top) = self.stack.top().cloned() {
                if &top != id {
                    self.set_active(&top, false);
                }
            }
        }

        if kind == WindowKind::Normal && self.stack.push(id.clone()) {
            debug!("Pushed {} onto the navigation stack ({} deep)", id, self.stack.len());
        }

        self.set_active(id, true);
        self.set_touch(true);
    }

    // === Parent / widget links ===

    fn reparent(&mut self, id: &WindowId, parent: Option<&WindowId>) {
        let Some(parent) = parent else {
            return;
        };

        if !self.registry.contains(parent) {
            debug!(
                "{}",
                WindowError::ParentMissing {
                    id: id.clone(),
                    parent: parent.clone(),
                }
            );
            return;
        }

        if parent == id || self.is_ancestor(id, parent) {
            warn!(
                "{}",
                WindowError::ParentCycle {
                    id: id.clone(),
                    parent: parent.clone(),
                }
            );
            return;
        }

        let old_parent = self.registry.get(id).and_then(|w| w.parent().cloned());
        if let Some(old_parent) = old_parent.filter(|old| old != parent) {
            if let Some(old) = self.registry.get_mut(&old_parent) {
                old.remove_widget(id);
            }
        }

        if let Some(window) = self.registry.get_mut(id) {
            window.set_parent(Some(parent.clone()));
        }
        if let Some(host) = self.registry.get_mut(parent) {
            host.add_widget(id.clone());
        }
    }

    /// Whether `ancestor` appears on the parent chain of `id`.
    fn is_ancestor(&self, ancestor: &WindowId, id: &WindowId) -> bool {
        let mut current = self.registry.get(id).and_then(|w| w.parent().cloned());
        let mut hops = 0;
        while let Some(parent) = current {
            if &parent == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.registry.len() {
                break;
            }
            current = self.registry.get(&parent).and_then(|w| w.parent().cloned());
        }
        false
    }

    /// Detach a window from its parent, leaving it top-level.
    pub fn remove_from_parent(&mut self, id: &WindowId) {
        let Some(parent) = self.registry.get(id).and_then(|w| w.parent().cloned()) else {
            return;
        };
        if let Some(host) = self.registry.get_mut(&parent) {
            host.remove_widget(id);
        }
        if let Some(window) = self.registry.get_mut(id) {
            window.set_parent(None);
        }
    }

    // === Visibility ===

    /// Show or hide a live window together with its widgets.
    ///
    /// Showing computes a fresh render order and opens any fixed widgets that
    /// are not attached yet. Hiding resets the order to the baseline.
    pub fn set_active(&mut self, id: &WindowId, active: bool) {
        if !self.registry.contains(id) {
            return;
        }

        if active {
            let order = match self.registry.get(id) {
                Some(window) => self.resolver.compute(window, &self.registry),
                None => return,
            };
            if let Some(window) = self.registry.get_mut(id) {
                window.set_render_order(order);
            }
            self.renderer.set_sorting_order(id, order);
        }

        let layer = if active {
            RenderLayer::Ui
        } else {
            RenderLayer::Hidden
        };
        let changed = self
            .registry
            .get_mut(id)
            .map_or(false, |window| window.set_layer(layer));
        if changed {
            self.renderer.set_layer(id, layer);
        }

        if active {
            // A fixed widget that already hosts this window cannot become its child.
            let missing: Vec<WindowId> = self
                .registry
                .get(id)
                .map(|w| {
                    w.fixed_widgets()
                        .iter()
                        .filter(|fixed| !w.has_widget(fixed))
                        .filter(|fixed| *fixed != id && !self.is_ancestor(fixed, id))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            for fixed in missing {
                self.open(fixed, Some(id.clone()), None);
            }
        }

        let widgets: Vec<WindowId> = self
            .registry
            .get(id)
            .map(|w| w.widgets().to_vec())
            .unwrap_or_default();
        for widget in widgets {
            if self.registry.status(&widget) == LoadStatus::LoadDone {
                self.set_active(&widget, active);
            }
        }

        if !active {
            if let Some(window) = self.registry.get_mut(id) {
                window.set_render_order(0);
            }
            self.renderer.set_sorting_order(id, 0);
        }
    }

    // === Close ===

    /// Close a window, destroying it or only hiding it.
    ///
    /// Closing a normal window removes its top-most stack entry. If that
    /// entry was the top, the window below it becomes visible again unless
    /// it hides its own predecessors.
    pub fn close(&mut self, id: &WindowId, destroy: bool) {
        let Some(kind) = self.registry.get(id).map(Window::kind) else {
            return;
        };

        match kind {
            WindowKind::Widget => {
                if destroy {
                    self.destroy_window(id);
                } else {
                    self.set_active(id, false);
                }
            }
            WindowKind::Normal => {
                let removal = self.stack.remove_topmost(id);
                let still_stacked = removal.as_ref().map_or(false, |r| r.was_duplicate);

                if still_stacked || !destroy {
                    self.set_active(id, false);
                } else {
                    self.destroy_window(id);
                }

                if let Some(StackRemoval {
                    previous: Some(previous),
                    was_top: true,
                    ..
                }) = removal
                {
                    let suppressing = self
                        .registry
                        .get(&previous)
                        .map_or(true, Window::hide_previous);
                    if !suppressing {
                        self.set_active(&previous, true);
                    }
                }
            }
        }

        self.set_touch(true);
    }

    /// Close a window the way it asks to be closed (its `destroy_on_close`).
    pub fn close_window(&mut self, id: &WindowId) {
        let Some(destroy) = self.registry.get(id).map(Window::destroy_on_close) else {
            return;
        };
        self.close(id, destroy);
    }

    /// Close every live window and cancel outstanding loads.
    pub fn close_all(&mut self, destroy: bool) {
        for id in self.registry.ids() {
            self.dismiss(&id, destroy);
        }
        self.cancel_pending(None);
        self.stack.clear();
        info!("Closed all windows (destroy: {})", destroy);
    }

    /// Tear down everything except `id` and its current widgets, then open `id`.
    pub fn close_all_and_open(
        &mut self,
        id: impl Into<WindowId>,
        parent: Option<WindowId>,
        callback: Option<OpenCallback>,
        destroy: bool,
    ) {
        let id = id.into();
        let keep: Vec<WindowId> = self
            .registry
            .get(&id)
            .map(|w| w.widgets().to_vec())
            .unwrap_or_default();

        for other in self.registry.ids() {
            if other != id && !keep.contains(&other) {
                self.dismiss(&other, destroy);
            }
        }
        self.cancel_pending(Some(&id));
        self.stack.clear();

        self.open(id, parent, callback);
    }

    /// Destroy or hide a window during a bulk close.
    fn dismiss(&mut self, id: &WindowId, destroy: bool) {
        if !self.registry.contains(id) {
            return;
        }
        if destroy {
            self.destroy_window(id);
        } else {
            self.set_active(id, false);
        }
    }

    /// Forget outstanding loads so their results are discarded on arrival.
    fn cancel_pending(&mut self, except: Option<&WindowId>) {
        let cancelled: Vec<WindowId> = self
            .pending
            .keys()
            .filter(|id| Some(*id) != except)
            .cloned()
            .collect();
        for id in cancelled {
            self.pending.remove(&id);
            if self.registry.status(&id) == LoadStatus::Loading {
                self.registry.set_status(id.clone(), LoadStatus::None);
            }
            debug!("Cancelled pending load of {}", id);
        }
    }

    fn destroy_window(&mut self, id: &WindowId) {
        let Some(window) = self.registry.unregister(id) else {
            return;
        };

        if let Some(parent) = window.parent() {
            if let Some(host) = self.registry.get_mut(parent) {
                host.remove_widget(id);
            }
        }
        for widget in window.widgets() {
            if let Some(child) = self.registry.get_mut(widget) {
                child.set_parent(None);
            }
        }

        self.renderer.release(id);
        debug!("Destroyed window {}", id);
    }

    // === Diagnostics ===

    pub fn snapshot(&self) -> ManagerSnapshot {
        let windows = self
            .registry
            .ids()
            .iter()
            .filter_map(|id| self.registry.get(id).cloned())
            .collect();

        ManagerSnapshot {
            windows,
            loading: self.registry.loading_ids(),
            stack: self.stack.entries().to_vec(),
            touch_enabled: self.touch_enabled,
        }
    }
}
