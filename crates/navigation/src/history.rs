//! Structured history payloads
//!
//! Every pushed entry pairs a fragment with a JSON state mirroring the
//! fragment grammar, e.g. `{"type":"item","category":"coding","item":"42"}`.

use page_dom::Window;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::router::Route;

/// Payload of a history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HistoryEntry {
    /// `#main`
    Home,
    /// `#list`
    Feed,
    /// `#category/<id>`
    Category {
        /// Category identifier
        category: String,
    },
    /// `#item/<categoryId>/<itemId>`
    Item {
        /// Owning category identifier
        category: String,
        /// Item key
        item: String,
    },
}

impl HistoryEntry {
    /// Route this entry restores
    pub fn route(&self) -> Route {
        match self {
            HistoryEntry::Home => Route::Home,
            HistoryEntry::Feed => Route::Feed,
            HistoryEntry::Category { category } => Route::Category { id: category.clone() },
            HistoryEntry::Item { category, item } => Route::Item {
                category: category.clone(),
                item: item.clone(),
            },
        }
    }

    /// Fragment paired with this entry
    pub fn fragment(&self) -> String {
        self.route().to_fragment()
    }
}

impl From<&Route> for HistoryEntry {
    fn from(route: &Route) -> Self {
        match route {
            Route::Home => HistoryEntry::Home,
            Route::Feed => HistoryEntry::Feed,
            Route::Category { id } => HistoryEntry::Category { category: id.clone() },
            Route::Item { category, item } => HistoryEntry::Item {
                category: category.clone(),
                item: item.clone(),
            },
        }
    }
}

/// Entry as stored in the session history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    /// Grammar payload
    #[serde(flatten)]
    pub entry: HistoryEntry,
    /// Unique key for this entry
    pub key: Uuid,
}

impl HistoryState {
    /// New state with a fresh key
    pub fn new(entry: HistoryEntry) -> Self {
        Self { entry, key: Uuid::new_v4() }
    }

    /// Decode a popped state; the initial page-load entry carries none
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value.clone())?))
    }
}

/// Push `route` onto the window history and return the stored state
pub fn push(window: &mut Window, route: &Route) -> Result<HistoryState> {
    let state = HistoryState::new(HistoryEntry::from(route));
    let value = serde_json::to_value(&state)?;
    window.history.push_state(value, &state.entry.fragment());
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_dom::Document;
    use serde_json::json;

    #[test]
    fn test_payload_mirrors_grammar() {
        let state = HistoryState::new(HistoryEntry::Item {
            category: "coding".to_string(),
            item: "42".to_string(),
        });
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["type"], "item");
        assert_eq!(value["category"], "coding");
        assert_eq!(value["item"], "42");
        assert!(value["key"].is_string());
    }

    #[test]
    fn test_push_updates_fragment() {
        let mut window = Window::new(Document::new(), "");
        let state = push(&mut window, &Route::Category { id: "coding".to_string() }).unwrap();

        assert_eq!(window.location_hash(), "#category/coding");
        let stored = HistoryState::from_value(&window.history.current().state).unwrap();
        assert_eq!(stored, Some(state));
    }

    #[test]
    fn test_null_state_decodes_to_none() {
        assert_eq!(HistoryState::from_value(&Value::Null).unwrap(), None);
        assert!(HistoryState::from_value(&json!({"type": "bogus"})).is_err());
    }
}
