//! Input routing toggle
//!
//! Event routing itself is external; the manager only switches UI input on
//! and off (e.g. re-enabling it whenever a window opens).

use crate::config::InputConfig;
use log::debug;

#[cfg_attr(test, mockall::automock)]
pub trait InputRouter {
    /// Apply routing settings once, when the manager is created.
    fn configure(&mut self, config: &InputConfig);

    fn set_input_enabled(&mut self, enabled: bool);
}

/// Router that only remembers the last toggle.
#[derive(Debug, Default)]
pub struct NullInputRouter {
    enabled: bool,
}

impl NullInputRouter {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl InputRouter for NullInputRouter {
    fn configure(&mut self, config: &InputConfig) {
        debug!(
            "Input routing: navigation events {}, drag threshold {}px",
            config.send_navigation_events, config.pixel_drag_threshold
        );
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_router_tracks_toggle() {
        let mut router = NullInputRouter::default();
        router.configure(&InputConfig::default());
        assert!(!router.is_enabled());

        router.set_input_enabled(true);
        assert!(router.is_enabled());

        router.set_input_enabled(false);
        assert!(!router.is_enabled());
    }
}
