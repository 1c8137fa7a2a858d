//! Retained element tree
//!
//! The document is an arena of elements addressed by [`NodeId`]. Detaching
//! keeps a subtree alive so it can be appended elsewhere. Clearing or removing
//! frees it, and the freed slots are reused for new elements.
//!
//! Each id carries the generation of its slot. An id that outlives its element
//! is stale: reads through it see an empty element and writes are dropped, so
//! bindings and timers that still hold one never touch the slot's new tenant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Node Identity
// =============================================================================

/// Identity of an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Raw arena index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Generation of the slot when this id was handed out
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// A single element
#[derive(Debug, Clone, Default, PartialEq)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    scroll_top: f32,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// What stale ids read through
static VACANT: Element = Element {
    tag: String::new(),
    id: None,
    classes: Vec::new(),
    attributes: BTreeMap::new(),
    style: BTreeMap::new(),
    text: String::new(),
    scroll_top: 0.0,
    children: Vec::new(),
    parent: None,
};

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

// =============================================================================
// Document
// =============================================================================

/// In-memory document with a single `body` root
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    body: NodeId,
    title: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only `body`
    pub fn new() -> Self {
        let body = Element { tag: "body".to_string(), ..Default::default() };
        Self {
            slots: vec![Slot { generation: 0, element: Some(body) }],
            free: Vec::new(),
            body: NodeId { index: 0, generation: 0 },
            title: String::new(),
        }
    }

    /// The body element
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Document title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the document title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Number of live elements, body included
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether `node` still names a live element
    pub fn is_live(&self, node: NodeId) -> bool {
        self.slots
            .get(node.index)
            .is_some_and(|slot| slot.generation == node.generation && slot.element.is_some())
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Element { tag: tag.to_string(), ..Default::default() })
    }

    /// Append `child` to `parent`, detaching it from its previous parent first
    ///
    /// Does nothing when either id is stale or `child` is an inclusive
    /// ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_live(parent) || !self.is_live(child) || self.contains(child, parent) {
            return;
        }
        self.detach(child);
        if let Some(el) = self.node_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.node_mut(parent) {
            el.children.push(child);
        }
    }

    /// Remove `node` from its parent, keeping it alive
    pub fn detach(&mut self, node: NodeId) {
        let parent = self.node_mut(node).and_then(|el| el.parent.take());
        if let Some(el) = parent.and_then(|p| self.node_mut(p)) {
            el.children.retain(|c| *c != node);
        }
    }

    /// Free every child of `node` (the `innerHTML = ''` operation)
    pub fn clear_children(&mut self, node: NodeId) {
        let Some(el) = self.node_mut(node) else { return };
        el.text.clear();
        let children = std::mem::take(&mut el.children);
        for child in children {
            self.free_subtree(child);
        }
    }

    /// Detach `node` and free it with its whole subtree
    ///
    /// The body cannot be removed.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.body || !self.is_live(node) {
            return;
        }
        self.detach(node);
        self.free_subtree(node);
    }

    /// Deep-copy a subtree; the copy is detached
    pub fn clone_subtree(&mut self, node: NodeId) -> NodeId {
        let mut element = self.node(node).clone();
        let children = std::mem::take(&mut element.children);
        element.parent = None;
        let copy = self.alloc(element);

        for child in children {
            let child_copy = self.clone_subtree(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    // -------------------------------------------------------------------------
    // Tree navigation
    // -------------------------------------------------------------------------

    /// Tag name
    pub fn tag(&self, node: NodeId) -> &str {
        &self.node(node).tag
    }

    /// Element id attribute
    pub fn element_id(&self, node: NodeId) -> Option<&str> {
        self.node(node).id.as_deref()
    }

    /// Set the element id attribute
    pub fn set_element_id(&mut self, node: NodeId, id: &str) {
        if let Some(el) = self.node_mut(node) {
            el.id = Some(id.to_string());
        }
    }

    /// Parent element, if attached
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// Direct children
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// `node` followed by each of its ancestors up to the root
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors { doc: self, next: Some(node) }
    }

    /// Whether `node` is live and reachable from the body
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.is_live(node) && self.ancestors(node).any(|n| n == self.body)
    }

    /// Whether `ancestor` contains `node` (inclusive)
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.is_live(node) && self.ancestors(node).any(|n| n == ancestor)
    }

    /// All descendants of `root` in document order, excluding `root`
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Look up an attached element by id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|n| self.node(*n).id.as_deref() == Some(id))
    }

    /// Descendants of `root` carrying `class`
    pub fn query_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root).into_iter().filter(|n| self.has_class(*n, class)).collect()
    }

    /// First descendant of `root` carrying `class`
    pub fn first_with_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(root).into_iter().find(|n| self.has_class(*n, class))
    }

    /// First descendant of `root` with the given tag
    pub fn first_with_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(root).into_iter().find(|n| self.node(*n).tag == tag)
    }

    /// Descendants of `root` carrying `class` whose attribute `name` equals `value`
    pub fn query_class_attr(&self, root: NodeId, class: &str, name: &str, value: &str) -> Vec<NodeId> {
        self.query_class(root, class)
            .into_iter()
            .filter(|n| self.attr(*n, name) == Some(value))
            .collect()
    }

    /// Nearest inclusive ancestor carrying `class`
    pub fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        self.ancestors(node).find(|n| self.has_class(*n, class))
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    /// Whether the element carries `class`
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).classes.iter().any(|c| c == class)
    }

    /// Add `class` if not present
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        if let Some(el) = self.node_mut(node) {
            el.classes.push(class.to_string());
        }
    }

    /// Remove `class` if present
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.node_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Class list in insertion order
    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.node(node).classes
    }

    // -------------------------------------------------------------------------
    // Attributes, style, text
    // -------------------------------------------------------------------------

    /// Attribute value
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).attributes.get(name).map(String::as_str)
    }

    /// Set an attribute
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.node_mut(node) {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Remove an attribute
    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.node_mut(node) {
            el.attributes.remove(name);
        }
    }

    /// Inline style property
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node).style.get(property).map(String::as_str)
    }

    /// Full inline style map
    pub fn inline_style(&self, node: NodeId) -> &BTreeMap<String, String> {
        &self.node(node).style
    }

    /// Set an inline style property; an empty value removes it, as in the CSSOM
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(el) = self.node_mut(node) else { return };
        let style = &mut el.style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value.to_string());
        }
    }

    /// Drop the whole inline style (`removeAttribute('style')`)
    pub fn clear_style(&mut self, node: NodeId) {
        if let Some(el) = self.node_mut(node) {
            el.style.clear();
        }
    }

    /// Inline `display`, empty when unset
    pub fn display(&self, node: NodeId) -> &str {
        self.style(node, "display").unwrap_or("")
    }

    /// Own text of the element
    pub fn own_text(&self, node: NodeId) -> &str {
        &self.node(node).text
    }

    /// Concatenated text of the element and its descendants (`textContent`)
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.node(node).text.clone();
        for child in self.descendants(node) {
            out.push_str(&self.node(child).text);
        }
        out
    }

    /// Replace the element's content with plain text
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if let Some(el) = self.node_mut(node) {
            el.text = text.to_string();
        }
    }

    /// Element scroll offset
    pub fn scroll_top(&self, node: NodeId) -> f32 {
        self.node(node).scroll_top
    }

    /// Set the element scroll offset
    pub fn set_scroll_top(&mut self, node: NodeId, value: f32) {
        if let Some(el) = self.node_mut(node) {
            el.scroll_top = value;
        }
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.element = Some(element);
                NodeId { index, generation: slot.generation }
            }
            None => {
                self.slots.push(Slot { generation: 0, element: Some(element) });
                NodeId { index: self.slots.len() - 1, generation: 0 }
            }
        }
    }

    fn free_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node == self.body || !self.is_live(node) {
                continue;
            }
            let slot = &mut self.slots[node.index];
            if let Some(el) = slot.element.take() {
                stack.extend(el.children);
            }
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(node.index);
        }
    }

    fn node(&self, node: NodeId) -> &Element {
        self.slots
            .get(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_ref())
            .unwrap_or(&VACANT)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_mut())
    }
}

/// Iterator over a node and its ancestors
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}
