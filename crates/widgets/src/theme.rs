//! Light/dark theme switch
//!
//! The body carries `light-theme` or `dark-theme`; the `#theme-toggle`
//! checkbox is checked in light mode. Without a saved preference the page is
//! left as rendered.

use page_dom::Document;
use storage::{ThemeMode, ThemePreference};

use crate::error::Result;

/// Id of the theme checkbox
pub const TOGGLE_ID: &str = "theme-toggle";

fn body_class(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "light-theme",
        ThemeMode::Dark => "dark-theme",
    }
}

/// Theme checkbox backed by the saved preference
#[derive(Debug, Clone)]
pub struct ThemeToggle {
    preference: ThemePreference,
}

impl ThemeToggle {
    /// Toggle persisting to `preference`
    pub fn new(preference: ThemePreference) -> Self {
        Self { preference }
    }

    /// Apply `mode` to the page
    pub fn apply(doc: &mut Document, mode: ThemeMode) {
        let body = doc.body();
        doc.remove_class(body, body_class(mode.toggled()));
        doc.add_class(body, body_class(mode));

        if let Some(toggle) = doc.get_element_by_id(TOGGLE_ID) {
            match mode {
                ThemeMode::Light => doc.set_attr(toggle, "checked", ""),
                ThemeMode::Dark => doc.remove_attr(toggle, "checked"),
            }
        }
    }

    /// Theme the page currently shows
    pub fn current(doc: &Document) -> ThemeMode {
        if doc.has_class(doc.body(), body_class(ThemeMode::Light)) {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        }
    }

    /// Apply the saved theme, if any
    ///
    /// A storage failure leaves the page as rendered.
    pub fn load_saved(&self, doc: &mut Document) -> Option<ThemeMode> {
        match self.preference.load() {
            Ok(Some(mode)) => {
                Self::apply(doc, mode);
                tracing::debug!(theme = %mode, "Applied saved theme");
                Some(mode)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to load theme preference: {}", e);
                None
            }
        }
    }

    /// The checkbox changed: apply and persist
    pub fn on_change(&self, doc: &mut Document, checked: bool) -> Result<ThemeMode> {
        let mode = ThemeMode::from_checked(checked);
        Self::apply(doc, mode);
        self.preference.save(mode)?;
        tracing::info!(theme = %mode, "Theme changed");
        Ok(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navigation::test_utils::site_document;
    use storage::{KvStore, LocalStore};

    fn toggle() -> ThemeToggle {
        ThemeToggle::new(ThemePreference::new(LocalStore::new(KvStore::in_memory().unwrap())))
    }

    fn checked(doc: &Document) -> bool {
        let node = doc.get_element_by_id(TOGGLE_ID).unwrap();
        doc.attr(node, "checked").is_some()
    }

    #[test]
    fn test_nothing_saved_leaves_page() {
        let mut doc = site_document();
        assert_eq!(toggle().load_saved(&mut doc), None);
        assert!(doc.classes(doc.body()).is_empty());
        assert!(!checked(&doc));
    }

    #[test]
    fn test_change_persists_and_reloads() {
        let theme = toggle();
        let mut doc = site_document();

        assert_eq!(theme.on_change(&mut doc, true).unwrap(), ThemeMode::Light);
        assert_eq!(ThemeToggle::current(&doc), ThemeMode::Light);
        assert!(checked(&doc));

        let mut reloaded = site_document();
        assert_eq!(theme.load_saved(&mut reloaded), Some(ThemeMode::Light));
        assert!(checked(&reloaded));
        assert!(!reloaded.has_class(reloaded.body(), "dark-theme"));
    }

    #[test]
    fn test_switch_back_to_dark() {
        let theme = toggle();
        let mut doc = site_document();
        theme.on_change(&mut doc, true).unwrap();
        theme.on_change(&mut doc, false).unwrap();

        let body = doc.body();
        assert!(doc.has_class(body, "dark-theme"));
        assert!(!doc.has_class(body, "light-theme"));
        assert!(!checked(&doc));
    }
}
