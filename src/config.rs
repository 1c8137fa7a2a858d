//! Site configuration file

use anyhow::Context;
use navigation::NavigationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use widgets::copy::{DEFAULT_COPIED_LABEL, DEFAULT_FEEDBACK};
use widgets::LightboxTimings;

/// Everything the site reads at boot
///
/// ```json
/// {
///   "storagePath": "/var/lib/logovo/prefs",
///   "copiedLabel": "Copied!",
///   "navigation": { "fallbackCategory": "coding" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    /// Preference database; in-memory when absent
    pub storage_path: Option<String>,
    /// Copy button label after a successful copy
    pub copied_label: String,
    /// How long that label stays
    pub copy_feedback_ms: u64,
    /// Gap between lightbox fade-in steps
    pub lightbox_step_ms: u64,
    /// Duration of each lightbox fade-out step
    pub lightbox_fade_ms: u64,
    /// Navigation layer settings
    pub navigation: NavigationConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let lightbox = LightboxTimings::default();
        Self {
            storage_path: None,
            copied_label: DEFAULT_COPIED_LABEL.to_string(),
            copy_feedback_ms: DEFAULT_FEEDBACK.as_millis() as u64,
            lightbox_step_ms: lightbox.step_ms,
            lightbox_fade_ms: lightbox.fade_ms,
            navigation: NavigationConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read site config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid site config {}", path.display()))
    }

    /// Parse a JSON document; the top level must be an object
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json).context("Malformed site config")?;
        if !value.is_object() {
            anyhow::bail!("Site config must be a JSON object");
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Persist preferences at `path`
    pub fn storage_path(mut self, path: impl Into<String>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Set the copied label
    pub fn copied_label(mut self, label: impl Into<String>) -> Self {
        self.copied_label = label.into();
        self
    }

    /// Replace the navigation settings
    pub fn navigation(mut self, navigation: NavigationConfig) -> Self {
        self.navigation = navigation;
        self
    }

    pub(crate) fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    pub(crate) fn lightbox_timings(&self) -> LightboxTimings {
        LightboxTimings {
            step_ms: self.lightbox_step_ms,
            fade_ms: self.lightbox_fade_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = SiteConfig::from_json(
            r#"{"copiedLabel": "Copied!", "navigation": {"siteTitle": "Logovo"}}"#,
        )
        .unwrap();
        assert_eq!(config.copied_label, "Copied!");
        assert_eq!(config.navigation.site_title, "Logovo");
        assert_eq!(config.navigation.fallback_category, "coding");
        assert_eq!(config.copy_feedback(), Duration::from_millis(2000));
        assert_eq!(config.storage_path, None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, r#"{"storagePath": "prefs", "lightboxFadeMs": 200}"#).unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.storage_path.as_deref(), Some("prefs"));
        assert_eq!(config.lightbox_timings().fade_ms, 200);
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let err = SiteConfig::load("/nonexistent/site.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/site.json"));

    }

    #[test]
    fn test_non_object_documents_are_rejected() {
        let err = SiteConfig::from_json("[]").unwrap_err();
        assert!(err.to_string().contains("JSON object"));
        assert!(SiteConfig::from_json("null").is_err());
        assert!(SiteConfig::from_json("\"coding\"").is_err());
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        let err = SiteConfig::from_json("{").unwrap_err();
        assert!(err.to_string().contains("Malformed"));
        assert!(SiteConfig::from_json(r#"{"copyFeedbackMs": "soon"}"#).is_err());
    }
}
