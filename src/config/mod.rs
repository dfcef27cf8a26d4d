//! Configuration management for StackUI
//!
//! This module handles loading, parsing, and validating configuration
//! from TOML files. It combines settings for render ordering, the UI
//! camera, surface presentation, input routing, and the window catalog.

use crate::window::{WindowId, WindowKind, WindowTemplate};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Main configuration struct containing all StackUI settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StackUiConfig {
    /// Render order settings
    #[serde(default)]
    pub manager: ManagerConfig,

    /// UI camera settings
    #[serde(default)]
    pub camera: CameraConfig,

    /// Render surface and scaling policy applied to every window
    #[serde(default)]
    pub presentation: PresentationConfig,

    /// Input routing settings
    #[serde(default)]
    pub input: InputConfig,

    /// Window templates by id, served by the catalog loader
    #[serde(default)]
    pub windows: BTreeMap<String, WindowTemplate>,
}

/// Render order configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManagerConfig {
    /// Order gap between stacked top-level windows
    pub order_increment: i32,

    /// Default order offset of a widget above its parent
    pub widget_order_addition: i32,
}

/// UI camera configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera depth relative to scene cameras
    pub depth: f32,

    /// Orthographic projection (perspective gives UI models more depth)
    pub orthographic: bool,

    pub orthographic_size: f32,

    /// Vertical field of view in degrees
    pub field_of_view: f32,

    /// Clear only the depth buffer so the scene shows through
    pub clear_depth_only: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleMode {
    ConstantPixelSize,
    ScaleWithScreenSize,
    ConstantPhysicalSize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenMatchMode {
    MatchWidthOrHeight,
    Expand,
    Shrink,
}

/// Surface wiring and scaling policy for window canvases
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresentationConfig {
    /// Sorting layer name the windows render in
    pub sorting_layer: String,

    pub scale_factor: f32,

    pub scale_mode: ScaleMode,

    pub screen_match_mode: ScreenMatchMode,

    /// Blend between matching width (0.0) and height (1.0)
    pub match_width_or_height: f32,

    /// Reference resolution [width, height] in pixels
    pub reference_resolution: [u32; 2],

    pub reference_pixels_per_unit: f32,
}

/// Input routing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Emit navigation (move/submit/cancel) events
    pub send_navigation_events: bool,

    /// Drag threshold (px)
    pub pixel_drag_threshold: u32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            order_increment: 50,
            widget_order_addition: 5,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            depth: 10.0,
            orthographic: false,
            orthographic_size: 10.0,
            field_of_view: 60.0,
            clear_depth_only: true,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            sorting_layer: "UI".to_string(),
            scale_factor: 1.0,
            scale_mode: ScaleMode::ScaleWithScreenSize,
            screen_match_mode: ScreenMatchMode::MatchWidthOrHeight,
            match_width_or_height: 0.0,
            reference_resolution: [1920, 1080],
            reference_pixels_per_unit: 100.0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            send_navigation_events: true,
            pixel_drag_threshold: 5,
        }
    }
}

impl StackUiConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Expand ~ to home directory
        let expanded_path = if path.to_string_lossy().starts_with('~') {
            let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
            Path::new(&home).join(path.strip_prefix("~").unwrap_or(path))
        } else {
            path.to_path_buf()
        };

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config: StackUiConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.manager.order_increment <= 0 {
            anyhow::bail!("Invalid order_increment: must be positive");
        }

        if self.manager.widget_order_addition < 0 {
            anyhow::bail!("Invalid widget_order_addition: must not be negative");
        }

        if self.camera.field_of_view <= 0.0 || self.camera.field_of_view >= 180.0 {
            anyhow::bail!("Invalid field_of_view: must be between 0 and 180 degrees");
        }

        if self.presentation.sorting_layer.trim().is_empty() {
            anyhow::bail!("Invalid sorting_layer: must not be empty");
        }

        if self.presentation.scale_factor <= 0.0 {
            anyhow::bail!("Invalid scale_factor: must be positive");
        }

        if !(0.0..=1.0).contains(&self.presentation.match_width_or_height) {
            anyhow::bail!("Invalid match_width_or_height: must be between 0.0 and 1.0");
        }

        let [width, height] = self.presentation.reference_resolution;
        if width == 0 || height == 0 {
            anyhow::bail!("Invalid reference_resolution: {}x{}", width, height);
        }

        if self.presentation.reference_pixels_per_unit <= 0.0 {
            anyhow::bail!("Invalid reference_pixels_per_unit: must be positive");
        }

        for (name, template) in &self.windows {
            let id = WindowId::new(name);
            if !id.is_valid() {
                anyhow::bail!("Invalid window catalog entry: empty id");
            }
            if template.fixed_widgets.contains(&id) {
                anyhow::bail!("Window {} lists itself as a fixed widget", name);
            }
            if let Some(cycle) = self.fixed_widget_cycle(name) {
                anyhow::bail!("Fixed widgets form a cycle: {}", cycle.join(" -> "));
            }
            if template.fixed_order != 0 && template.kind != WindowKind::Widget {
                log::warn!(
                    "Window {} sets fixed_order but is not a widget; the value is ignored",
                    name
                );
            }
        }

        Ok(())
    }

    /// Follow catalog fixed-widget links from `start` and return the first
    /// loop that leads back to `start`, if any.
    fn fixed_widget_cycle(&self, start: &str) -> Option<Vec<String>> {
        let mut path = vec![start.to_string()];
        let mut visited = std::collections::HashSet::new();
        self.walk_fixed_widgets(start, start, &mut path, &mut visited)
            .then_some(path)
    }

    fn walk_fixed_widgets(
        &self,
        start: &str,
        current: &str,
        path: &mut Vec<String>,
        visited: &mut std::collections::HashSet<String>,
    ) -> bool {
        let Some(template) = self.windows.get(current) else {
            return false;
        };
        for next in &template.fixed_widgets {
            if next.as_str() == start {
                path.push(start.to_string());
                return true;
            }
            if !visited.insert(next.as_str().to_string()) {
                continue;
            }
            path.push(next.as_str().to_string());
            if self.walk_fixed_widgets(start, next.as_str(), path, visited) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Look up a catalog template by window id
    pub fn template(&self, id: &WindowId) -> Option<&WindowTemplate> {
        self.windows.get(id.as_str())
    }
}
