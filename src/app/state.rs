//! Application state types
//!
//! This module contains the state shared by the controller and every
//! snapshot window.

use log::warn;

use crate::app::config::ShortcutConfig;
use crate::app::preferences::{BorderColor, Preferences};
use crate::app::registry::{SessionRegistry, SnapshotId};
use crate::capture::{ScreenSource, XcapSource};

/// Main application state
pub struct AppState {
    /// Every open snapshot
    pub registry: SessionRegistry,
    /// Persisted user choices
    pub preferences: Preferences,
    /// Keyboard bindings of snapshot windows
    pub shortcuts: ShortcutConfig,
    /// Where screen rasters come from
    pub source: Box<dyn ScreenSource>,
    /// Whether the help dialog is showing, so windows display their ids
    pub show_ids: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create the state for a live session, loading saved preferences
    pub fn new() -> Self {
        Self::with_source(Preferences::load(), Box::new(XcapSource))
    }

    pub fn with_source(preferences: Preferences, source: Box<dyn ScreenSource>) -> Self {
        Self {
            registry: SessionRegistry::new(preferences.always_on_top),
            preferences,
            shortcuts: ShortcutConfig::new(),
            source,
            show_ids: false,
        }
    }

    /// Border color used for new snapshot windows
    pub fn border_color(&self) -> BorderColor {
        self.preferences.border_color
    }

    pub fn set_border_color(&mut self, color: BorderColor) {
        self.preferences.border_color = color;
        self.persist();
    }

    /// Returns the snapshots the flag must be applied to
    pub fn set_always_on_top(&mut self, on_top: bool) -> Vec<SnapshotId> {
        self.preferences.always_on_top = on_top;
        self.persist();
        self.registry.set_always_on_top(on_top)
    }

    /// Write preferences to disk; failures are only logged
    pub fn persist(&self) {
        if let Err(e) = self.preferences.save() {
            warn!("Failed to save preferences: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::screen::testing::StaticSource;
    use crate::capture::Rectangle;

    #[test]
    fn test_registry_follows_on_top_preference() {
        let prefs = Preferences {
            always_on_top: false,
            ..Preferences::default()
        };
        let state = AppState::with_source(
            prefs,
            Box::new(StaticSource::single(Rectangle::new(0, 0, 8, 8))),
        );
        assert!(!state.registry.always_on_top());
        assert!(state.registry.is_empty());
        assert_eq!(state.border_color(), BorderColor::BLACK);
        assert!(state.source.devices().is_ok());
    }
}
