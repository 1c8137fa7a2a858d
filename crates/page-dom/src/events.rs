//! Event handler bindings keyed by element identity
//!
//! Binding the same `(node, kind)` twice replaces the previous action, so
//! setup routines can run any number of times without accumulating handlers.

use std::collections::HashMap;

use crate::document::{Document, NodeId};

/// DOM event kinds the site reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer activation
    Click,
    /// Form control value change
    Change,
}

/// Handler table mapping elements to actions of type `A`
#[derive(Debug, Clone)]
pub struct Bindings<A> {
    table: HashMap<(NodeId, EventKind), A>,
}

impl<A> Default for Bindings<A> {
    fn default() -> Self {
        Self { table: HashMap::new() }
    }
}

impl<A> Bindings<A> {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `action`; returns true when an earlier binding was replaced
    pub fn bind(&mut self, node: NodeId, kind: EventKind, action: A) -> bool {
        self.table.insert((node, kind), action).is_some()
    }

    /// Remove a binding
    pub fn unbind(&mut self, node: NodeId, kind: EventKind) -> Option<A> {
        self.table.remove(&(node, kind))
    }

    /// Action bound directly on `node`
    pub fn get(&self, node: NodeId, kind: EventKind) -> Option<&A> {
        self.table.get(&(node, kind))
    }

    /// Nearest binding on `target` or one of its ancestors (event bubbling)
    pub fn resolve(&self, doc: &Document, target: NodeId, kind: EventKind) -> Option<(NodeId, &A)> {
        if !doc.is_live(target) {
            return None;
        }
        doc.ancestors(target).find_map(|node| self.get(node, kind).map(|a| (node, a)))
    }

    /// Drop bindings on elements no longer reachable from the body; returns how many
    pub fn retain_attached(&mut self, doc: &Document) -> usize {
        let before = self.table.len();
        self.table.retain(|(node, _), _| doc.is_attached(*node));
        before - self.table.len()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebinding_replaces_instead_of_accumulating() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        let mut bindings = Bindings::new();

        assert!(!bindings.bind(button, EventKind::Click, "first"));
        assert!(bindings.bind(button, EventKind::Click, "second"));
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get(button, EventKind::Click), Some(&"second"));
    }

    #[test]
    fn test_resolve_bubbles_to_ancestor() {
        let mut doc = Document::new();
        let preview = doc.create_element("div");
        let image = doc.create_element("img");
        let body = doc.body();
        doc.append_child(body, preview);
        doc.append_child(preview, image);

        let mut bindings = Bindings::new();
        bindings.bind(preview, EventKind::Click, 7);

        assert_eq!(bindings.resolve(&doc, image, EventKind::Click), Some((preview, &7)));
        assert_eq!(bindings.resolve(&doc, image, EventKind::Change), None);
    }

    #[test]
    fn test_retain_attached_prunes_cleared_content() {
        let mut doc = Document::new();
        let body = doc.body();
        let content = doc.create_element("div");
        let old = doc.create_element("button");
        doc.append_child(body, content);
        doc.append_child(content, old);

        let mut bindings = Bindings::new();
        bindings.bind(content, EventKind::Click, "content");
        bindings.bind(old, EventKind::Click, "old");

        doc.clear_children(content);
        let fresh = doc.create_element("button");
        doc.append_child(content, fresh);

        // The old id is stale even though its slot now holds `fresh`
        assert_eq!(fresh.index(), old.index());
        assert_eq!(bindings.resolve(&doc, old, EventKind::Click), None);
        assert_eq!(bindings.resolve(&doc, fresh, EventKind::Click), Some((content, &"content")));

        assert_eq!(bindings.retain_attached(&doc), 1);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.retain_attached(&doc), 0);
    }
}
