//! Asynchronous window loading
//!
//! The manager never loads assets itself. It hands each request to a
//! [`Loader`] together with a single-use [`LoadCompletion`]. Completing the
//! handle (from any thread) queues the result; the manager applies queued
//! results on its own control thread in [`WindowManager::pump`].
//!
//! [`WindowManager::pump`]: crate::window::WindowManager::pump

use crate::window::{WindowId, WindowTemplate};
use log::{debug, warn};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Loaded window asset.
///
/// An asset without a template yields a window with default settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowAsset {
    pub template: Option<WindowTemplate>,
}

impl WindowAsset {
    pub fn new(template: WindowTemplate) -> Self {
        Self {
            template: Some(template),
        }
    }
}

impl From<WindowTemplate> for WindowAsset {
    fn from(template: WindowTemplate) -> Self {
        Self::new(template)
    }
}

/// External asset loader.
///
/// Implementations must eventually consume the completion exactly once,
/// either with an asset or with [`LoadCompletion::fail`].
pub trait Loader {
    fn load(&mut self, key: &str, completion: LoadCompletion);
}

impl<F> Loader for F
where
    F: FnMut(&str, LoadCompletion),
{
    fn load(&mut self, key: &str, completion: LoadCompletion) {
        self(key, completion)
    }
}

/// A finished load waiting to be applied by the manager.
#[derive(Debug)]
pub(crate) struct CompletedLoad {
    pub id: WindowId,
    pub ticket: u64,
    pub asset: Option<WindowAsset>,
}

/// Single-use handle a loader consumes to report its result.
#[derive(Debug)]
pub struct LoadCompletion {
    id: WindowId,
    ticket: u64,
    sender: UnboundedSender<CompletedLoad>,
}

impl LoadCompletion {
    pub fn window_id(&self) -> &WindowId {
        &self.id
    }

    pub fn complete(self, asset: impl Into<WindowAsset>) {
        self.finish(Some(asset.into()));
    }

    /// Report a failed load (the loader's null sentinel).
    pub fn fail(self) {
        self.finish(None);
    }

    pub fn finish(self, asset: Option<WindowAsset>) {
        let id = self.id.clone();
        let done = CompletedLoad {
            id: self.id,
            ticket: self.ticket,
            asset,
        };
        if self.sender.send(done).is_err() {
            debug!("Window manager gone; dropping load result for {}", id);
        }
    }
}

/// Channel between completion handles and the manager's control thread.
#[derive(Debug)]
pub(crate) struct LoadQueue {
    sender: UnboundedSender<CompletedLoad>,
    receiver: UnboundedReceiver<CompletedLoad>,
}

impl LoadQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn handle(&self, id: WindowId, ticket: u64) -> LoadCompletion {
        LoadCompletion {
            id,
            ticket,
            sender: self.sender.clone(),
        }
    }

    /// Take every result queued so far without blocking.
    pub fn drain(&mut self) -> Vec<CompletedLoad> {
        let mut done = Vec::new();
        while let Ok(item) = self.receiver.try_recv() {
            done.push(item);
        }
        done
    }
}

/// Loader that serves templates from a catalog on the tokio runtime.
///
/// Each request completes on a spawned task after `latency`. Unknown keys
/// complete with the failure sentinel. Must be used from within a runtime.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    catalog: HashMap<String, WindowTemplate>,
    latency: Duration,
}

impl CatalogLoader {
    pub fn new<I, K>(catalog: I, latency: Duration) -> Self
    where
        I: IntoIterator<Item = (K, WindowTemplate)>,
        K: Into<String>,
    {
        Self {
            catalog: catalog.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            latency,
        }
    }
}

impl Loader for CatalogLoader {
    fn load(&mut self, key: &str, completion: LoadCompletion) {
        let template = self.catalog.get(key).cloned();
        if template.is_none() {
            warn!("No catalog entry for window {}", key);
        }
        let latency = self.latency;
        tokio::spawn(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            completion.finish(template.map(WindowAsset::new));
        });
    }
}
