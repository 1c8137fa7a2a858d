//! Navigation configuration
//!
//! Timing values match the CSS transition durations of the site stylesheet.
//! Every field is optional in JSON; missing fields take the defaults below.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{NavigationError, Result};

/// Delays between animation phases, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timings {
    /// Exit animation of the outgoing view before the swap
    pub exit_settle_ms: u64,
    /// Grid loading after a committed category navigation
    pub category_load_ms: u64,
    /// Lock release after a navigation with an exit animation
    pub navigate_release_ms: u64,
    /// Lock release after a navigation with no outgoing view
    pub first_load_release_ms: u64,
    /// Entrant marker on home and feed
    pub view_entrant_ms: u64,
    /// Entrant marker on categories
    pub category_entrant_ms: u64,
    /// Fallback category entrant marker
    pub fallback_entrant_ms: u64,
    /// Gap between showing the overlay and marking it active
    pub overlay_activate_ms: u64,
    /// Lock release after the overlay became active
    pub overlay_open_release_ms: u64,
    /// Overlay close transition
    pub overlay_close_settle_ms: u64,
    /// Lock release after the overlay closed
    pub overlay_close_release_ms: u64,
    /// Re-derive state after Escape or the overlay back control
    pub dismiss_reprocess_ms: u64,
    /// Lock release after that re-derivation
    pub dismiss_release_ms: u64,
    /// Re-derive state after a back/forward closed the overlay
    pub popstate_overlay_settle_ms: u64,
    /// Lock release after a back/forward re-derivation
    pub popstate_release_ms: u64,
    /// Category exit animation on back/forward to the feed
    pub popstate_category_exit_ms: u64,
    /// Lock release after the category exit path
    pub popstate_category_release_ms: u64,
    /// Grid loading after a URL-driven category show
    pub url_category_load_ms: u64,
    /// Grid (re)initialization after a URL-driven category show
    pub url_grid_setup_ms: u64,
    /// Opening a deep-linked item after its grid loaded
    pub pending_item_open_ms: u64,
    /// Category exit before the in-category back control navigates
    pub back_button_settle_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            exit_settle_ms: 150,
            category_load_ms: 50,
            navigate_release_ms: 200,
            first_load_release_ms: 50,
            view_entrant_ms: 20,
            category_entrant_ms: 10,
            fallback_entrant_ms: 20,
            overlay_activate_ms: 10,
            overlay_open_release_ms: 400,
            overlay_close_settle_ms: 350,
            overlay_close_release_ms: 100,
            dismiss_reprocess_ms: 500,
            dismiss_release_ms: 100,
            popstate_overlay_settle_ms: 250,
            popstate_release_ms: 100,
            popstate_category_exit_ms: 150,
            popstate_category_release_ms: 50,
            url_category_load_ms: 100,
            url_grid_setup_ms: 200,
            pending_item_open_ms: 200,
            back_button_settle_ms: 150,
        }
    }
}

/// Convert a millisecond field
pub(crate) fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Navigation layer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationConfig {
    /// Animation phase delays
    pub timings: Timings,
    /// Category shown when a requested category does not exist
    pub fallback_category: String,
    /// Document title for every view
    pub site_title: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            fallback_category: "coding".to_string(),
            site_title: "LogovoDushnil".to_string(),
        }
    }
}

impl NavigationConfig {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| NavigationError::Config(e.to_string()))
    }

    /// Set the fallback category
    pub fn fallback_category(mut self, id: impl Into<String>) -> Self {
        self.fallback_category = id.into();
        self
    }

    /// Set the document title
    pub fn site_title(mut self, title: impl Into<String>) -> Self {
        self.site_title = title.into();
        self
    }

    /// Replace all timings
    pub fn timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = NavigationConfig::from_json(
            r#"{"fallbackCategory": "design", "timings": {"exitSettleMs": 90}}"#,
        )
        .unwrap();

        assert_eq!(config.fallback_category, "design");
        assert_eq!(config.site_title, "LogovoDushnil");
        assert_eq!(config.timings.exit_settle_ms, 90);
        assert_eq!(config.timings.overlay_close_settle_ms, 350);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = NavigationConfig::from_json("{\"timings\": 5}").unwrap_err();
        assert!(matches!(err, NavigationError::Config(_)));
    }

    #[test]
    fn test_builder_setters() {
        let config = NavigationConfig::default().fallback_category("art").site_title("Test");
        assert_eq!(config.fallback_category, "art");
        assert_eq!(config.site_title, "Test");
    }
}
