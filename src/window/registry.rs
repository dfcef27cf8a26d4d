//! Registry of live windows and their load status
//!
//! Maps each `WindowId` to its live instance (once loaded) and to a
//! `LoadStatus`. An id with no recorded status is `LoadStatus::None`.

use super::{Window, WindowId};
use serde::Serialize;
use std::collections::HashMap;

/// Load state of a window kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadStatus {
    #[default]
    None,
    /// A load request is in flight; no instance exists yet
    Loading,
    /// The instance is live in the registry
    LoadDone,
}

#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowId, Window>,
    statuses: HashMap<WindowId, LoadStatus>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn get_mut(&mut self, id: &WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    pub fn contains(&self, id: &WindowId) -> bool {
        self.windows.contains_key(id)
    }

    pub fn status(&self, id: &WindowId) -> LoadStatus {
        self.statuses.get(id).copied().unwrap_or_default()
    }

    pub fn set_status(&mut self, id: WindowId, status: LoadStatus) {
        self.statuses.insert(id, status);
    }

    /// Insert a freshly instantiated window and mark it `LoadDone`.
    ///
    /// Returns the previous instance if one was (wrongly) still registered.
    pub fn register(&mut self, window: Window) -> Option<Window> {
        let id = window.id().clone();
        self.statuses.insert(id.clone(), LoadStatus::LoadDone);
        self.windows.insert(id, window)
    }

    /// Remove a window and reset its status to `None`.
    pub fn unregister(&mut self, id: &WindowId) -> Option<Window> {
        let window = self.windows.remove(id);
        self.statuses.insert(id.clone(), LoadStatus::None);
        window
    }

    /// Snapshot of the live ids, sorted for deterministic iteration.
    pub fn ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.windows.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ids with a load request in flight, sorted.
    pub fn loading_ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self
            .statuses
            .iter()
            .filter(|(_, status)| **status == LoadStatus::Loading)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
