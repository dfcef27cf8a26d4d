//! # StackUI Window Lifecycle Library
//!
//! Bookkeeping for the logical windows of an interactive application: which
//! screens and overlay panels are loaded, visible, stacked and layered.
//!
//! ## Architecture
//!
//! StackUI is built on a modular architecture:
//! - `window`: Window model, registry, navigation stack, order resolver and
//!   the `WindowManager` that drives them
//! - `loader`: Asynchronous load requests and their completion handles
//! - `renderer`: Interface to the external scene graph
//! - `input`: Interface to the external input router
//! - `config`: Configuration parsing and management
//! - `scenario`: Scripted window operations for the command-line driver
//!
//! ## Usage
//!
//! ```rust
//! use stackui::{LoadCompletion, StackUiConfig, WindowId, WindowManager, WindowTemplate};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut manager = WindowManager::new(&StackUiConfig::default())?;
//!     manager.set_loader(|_key: &str, completion: LoadCompletion| {
//!         completion.complete(WindowTemplate::default());
//!     });
//!
//!     manager.open("Main", None, None);
//!     manager.pump();
//!
//!     assert_eq!(manager.top(), Some(&WindowId::new("Main")));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod loader;
pub mod renderer;
pub mod scenario;
pub mod window;

// Re-export main types for easy access
pub use config::StackUiConfig;
pub use error::WindowError;
pub use loader::{CatalogLoader, LoadCompletion, Loader, WindowAsset};
pub use window::{
    LoadStatus, RenderLayer, Window, WindowId, WindowKind, WindowManager, WindowTemplate,
};

// Re-export common error types
pub use anyhow::{Context, Error, Result};

/// Version information for StackUI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
