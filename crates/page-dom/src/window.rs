//! Browser window: location fragment, session history, scroll offset
//!
//! History entries hold a structured `serde_json::Value` state next to the
//! fragment, the way `history.pushState` stores a structured clone.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::timers::Clock;

/// One session history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// State payload passed to `push_state`
    pub state: Value,
    /// Fragment including the leading `#` (empty for none)
    pub fragment: String,
}

/// Session history with a cursor
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<HistoryItem>,
    index: usize,
}

/// Payload delivered on back/forward traversal
#[derive(Debug, Clone, PartialEq)]
pub struct PopState {
    /// State of the entry that became current
    pub state: Value,
}

impl History {
    /// History with a single initial entry and no state
    pub fn new(initial_fragment: &str) -> Self {
        Self {
            entries: vec![HistoryItem {
                state: Value::Null,
                fragment: normalize(initial_fragment),
            }],
            index: 0,
        }
    }

    /// Push a new entry, discarding any forward entries
    pub fn push_state(&mut self, state: Value, fragment: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryItem { state, fragment: normalize(fragment) });
        self.index = self.entries.len() - 1;
    }

    /// Replace the current entry
    pub fn replace_state(&mut self, state: Value, fragment: &str) {
        self.entries[self.index] = HistoryItem { state, fragment: normalize(fragment) };
    }

    /// Step back one entry
    pub fn back(&mut self) -> Option<PopState> {
        self.go(-1)
    }

    /// Step forward one entry
    pub fn forward(&mut self) -> Option<PopState> {
        self.go(1)
    }

    /// Move the cursor by `delta`; `None` when out of range
    pub fn go(&mut self, delta: isize) -> Option<PopState> {
        let target = self.index.checked_add_signed(delta)?;
        if delta == 0 || target >= self.entries.len() {
            return None;
        }
        self.index = target;
        Some(PopState { state: self.entries[target].state.clone() })
    }

    /// Current entry
    pub fn current(&self) -> &HistoryItem {
        &self.entries[self.index]
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[HistoryItem] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// History always has at least one entry
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cursor position
    pub fn index(&self) -> usize {
        self.index
    }
}

fn normalize(fragment: &str) -> String {
    if fragment.is_empty() || fragment.starts_with('#') {
        fragment.to_string()
    } else {
        format!("#{fragment}")
    }
}

/// Everything the site scripts touch outside the element tree
pub struct Window {
    /// The element tree
    pub document: Document,
    /// Session history
    pub history: History,
    scroll_y: f32,
    clock: Clock,
}

impl Window {
    /// Window showing `document` at `initial_fragment`
    pub fn new(document: Document, initial_fragment: &str) -> Self {
        Self {
            document,
            history: History::new(initial_fragment),
            scroll_y: 0.0,
            clock: Clock::new(),
        }
    }

    /// Current location fragment (`location.hash`)
    pub fn location_hash(&self) -> &str {
        &self.history.current().fragment
    }

    /// Vertical scroll offset of the viewport
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Scroll the viewport
    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
    }

    /// Event-loop clock
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}
