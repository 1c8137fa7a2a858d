//! Persisted site preferences
//!
//! The site persists exactly one preference: the colour theme, stored under
//! the `theme` key as `"light"` or `"dark"`.

use serde::{Deserialize, Serialize};

use crate::kv::{LocalStore, Result};

/// Storage key of the theme preference
pub const THEME_KEY: &str = "theme";

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme, what the stylesheet renders without a preference
    #[default]
    Dark,
}

impl ThemeMode {
    /// Stored name
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Theme for a stored value; anything but `light` means dark
    pub fn from_stored(value: &str) -> Self {
        if value == "light" {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        }
    }

    /// Theme selected by the toggle's checked state
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        }
    }

    /// The other theme
    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Theme preference backed by local storage
#[derive(Debug, Clone)]
pub struct ThemePreference {
    store: LocalStore,
}

impl ThemePreference {
    /// Preference stored in `store`
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Saved theme, if the visitor ever chose one
    pub fn load(&self) -> Result<Option<ThemeMode>> {
        let saved: Option<String> = self.store.get(THEME_KEY)?;
        Ok(saved.as_deref().map(ThemeMode::from_stored))
    }

    /// Persist `mode`
    pub fn save(&self, mode: ThemeMode) -> Result<()> {
        self.store.set(THEME_KEY, &mode.as_str())?;
        self.store.flush()
    }

    /// Forget the saved theme
    pub fn clear(&self) -> Result<bool> {
        self.store.remove(THEME_KEY)
    }
}
