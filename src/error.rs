//! Conditions the window manager reports instead of failing.
//!
//! None of these abort an operation for the caller; the manager logs them and
//! degrades to a no-op (or a `None` callback for an invalid identity).

use crate::window::WindowId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("loader is not set; cannot open {0}")]
    LoaderMissing(WindowId),

    #[error("invalid window identity; nothing to open")]
    InvalidIdentity,

    #[error("loading window {0} failed")]
    LoadFailed(WindowId),

    #[error("discarding stale load completion for {0}")]
    StaleCompletion(WindowId),

    #[error("parent {parent} of window {id} is not loaded")]
    ParentMissing { id: WindowId, parent: WindowId },

    #[error("window {parent} cannot host {id}: it is already one of its descendants")]
    ParentCycle { id: WindowId, parent: WindowId },
}
