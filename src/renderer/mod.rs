//! Rendering collaborator interface
//!
//! The scene graph is external. The manager only tells it which surface
//! configuration a new window gets, which layer a window sits on, what its
//! sorting order is, and when the window is gone.

use crate::config::{CameraConfig, PresentationConfig};
use crate::window::{RenderLayer, WindowId};
use log::trace;

#[cfg_attr(test, mockall::automock)]
pub trait RenderTarget {
    /// Set up the UI camera once, when the manager is created.
    ///
    /// `culling_mask` has one bit set per [`RenderLayer`] the camera draws.
    fn configure_camera(&mut self, camera: &CameraConfig, culling_mask: u32);

    /// Wire a freshly instantiated window to its render surface.
    fn attach(&mut self, id: &WindowId, presentation: &PresentationConfig);

    fn set_layer(&mut self, id: &WindowId, layer: RenderLayer);

    fn set_sorting_order(&mut self, id: &WindowId, order: i32);

    /// The window was destroyed; drop its surface.
    fn release(&mut self, id: &WindowId);
}

/// Render target that draws nothing.
#[derive(Debug, Default)]
pub struct NullRenderTarget;

impl RenderTarget for NullRenderTarget {
    fn configure_camera(&mut self, camera: &CameraConfig, culling_mask: u32) {
        trace!("UI camera configured: {:?} (mask {:#b})", camera, culling_mask);
    }

    fn attach(&mut self, id: &WindowId, _presentation: &PresentationConfig) {
        trace!("Attached render surface for {}", id);
    }

    fn set_layer(&mut self, _id: &WindowId, _layer: RenderLayer) {}

    fn set_sorting_order(&mut self, _id: &WindowId, _order: i32) {}

    fn release(&mut self, id: &WindowId) {
        trace!("Released render surface for {}", id);
    }
}
