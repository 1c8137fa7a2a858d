//! Declarative element construction
//!
//! ```rust
//! use page_dom::{Document, El};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let page = doc.build(body, El::div().id("feed-page").class("feed-page").child(
//!     El::new("h2").class("category-title").text("Feed"),
//! ));
//! assert_eq!(doc.get_element_by_id("feed-page"), Some(page));
//! ```

use crate::document::{Document, NodeId};

/// Element description built with chained setters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct El {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<El>,
}

impl El {
    /// Element with the given tag
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_string(), ..Default::default() }
    }

    /// Shorthand for `El::new("div")`
    pub fn div() -> Self {
        Self::new("div")
    }

    /// Set the id
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add a class
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Set an attribute
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Set an inline style property
    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.style.push((property.to_string(), value.to_string()));
        self
    }

    /// Set the text content
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Append a child element
    pub fn child(mut self, child: El) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    pub fn children(mut self, children: impl IntoIterator<Item = El>) -> Self {
        self.children.extend(children);
        self
    }
}

impl Document {
    /// Materialize `el` as a new child of `parent`
    pub fn build(&mut self, parent: NodeId, el: El) -> NodeId {
        let node = self.create_element(&el.tag);
        if let Some(id) = &el.id {
            self.set_element_id(node, id);
        }
        for class in &el.classes {
            self.add_class(node, class);
        }
        for (name, value) in &el.attributes {
            self.set_attr(node, name, value);
        }
        for (property, value) in &el.style {
            self.set_style(node, property, value);
        }
        if let Some(text) = &el.text {
            self.set_text(node, text);
        }
        self.append_child(parent, node);

        for child in el.children {
            self.build(node, child);
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_nested_tree() {
        let mut doc = Document::new();
        let body = doc.body();
        let grid = doc.build(
            body,
            El::div().class("expandable-grid").style("height", "400px").children([
                El::div().class("expandable-item").attr("data-category", "1"),
                El::div().class("expandable-item").attr("data-category", "2"),
            ]),
        );

        assert_eq!(doc.style(grid, "height"), Some("400px"));
        assert_eq!(doc.query_class(grid, "expandable-item").len(), 2);
        assert_eq!(doc.query_class_attr(grid, "expandable-item", "data-category", "2").len(), 1);
    }
}
