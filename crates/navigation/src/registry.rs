//! View container lookup

use page_dom::{Document, NodeId};

use crate::markup::{controls, markers, overlay, views};

/// Logical identity of a view container
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// Home view
    Home,
    /// Feed view
    Feed,
    /// Category view by id
    Category(String),
}

impl ViewKey {
    /// Class toggled to play this view's entrant animation
    pub fn entrant_marker(&self) -> &'static str {
        match self {
            ViewKey::Home | ViewKey::Feed => markers::PAGE_ACTIVE,
            ViewKey::Category(_) => markers::ACTIVE_ANIMATION,
        }
    }

    /// Menu entry highlighted while this view is shown
    pub fn menu_page(&self) -> &'static str {
        match self {
            ViewKey::Home => controls::PAGE_HOME,
            ViewKey::Feed | ViewKey::Category(_) => controls::PAGE_FEED,
        }
    }
}

/// Finds view containers by naming convention
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry;

impl ViewRegistry {
    /// Create a registry
    pub fn new() -> Self {
        Self
    }

    /// Home container
    pub fn home(&self, doc: &Document) -> Option<NodeId> {
        doc.first_with_class(doc.body(), views::HOME)
    }

    /// Feed container
    pub fn feed(&self, doc: &Document) -> Option<NodeId> {
        doc.first_with_class(doc.body(), views::FEED)
    }

    /// Category container, `<id>-page`
    pub fn category(&self, doc: &Document, id: &str) -> Option<NodeId> {
        doc.get_element_by_id(&format!("{id}{}", views::CATEGORY_ID_SUFFIX))
    }

    /// Every category container
    pub fn categories(&self, doc: &Document) -> Vec<NodeId> {
        doc.query_class(doc.body(), views::CATEGORY)
    }

    /// Container for a view key
    pub fn view(&self, doc: &Document, key: &ViewKey) -> Option<NodeId> {
        match key {
            ViewKey::Home => self.home(doc),
            ViewKey::Feed => self.feed(doc),
            ViewKey::Category(id) => self.category(doc, id),
        }
    }

    /// Category id of a category container, from its `<id>-page` element id
    pub fn category_id(&self, doc: &Document, page: NodeId) -> Option<String> {
        doc.element_id(page)?
            .strip_suffix(views::CATEGORY_ID_SUFFIX)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    /// The overlay container
    pub fn overlay(&self, doc: &Document) -> Option<NodeId> {
        doc.get_element_by_id(overlay::CONTAINER_ID)
    }

    /// Scrolling main column
    pub fn main_content(&self, doc: &Document) -> Option<NodeId> {
        doc.first_with_class(doc.body(), views::MAIN_CONTENT)
    }

    /// Menu entries
    pub fn menu_entries(&self, doc: &Document) -> Vec<NodeId> {
        doc.query_class(doc.body(), controls::NAV_ITEM)
    }

    /// Menu entry for a logical page name
    pub fn menu_entry(&self, doc: &Document, page: &str) -> Option<NodeId> {
        doc.query_class_attr(doc.body(), controls::NAV_ITEM, controls::DATA_PAGE, page)
            .into_iter()
            .next()
    }

    /// Whether a view currently reports visible
    ///
    /// Home counts as visible while its display is unset, which is how the
    /// page is served before the first swap.
    pub fn is_visible(&self, doc: &Document, key: &ViewKey) -> bool {
        let Some(node) = self.view(doc, key) else {
            return false;
        };
        match (key, doc.display(node)) {
            (_, "block") => true,
            (ViewKey::Home, "") => true,
            _ => false,
        }
    }

    /// The currently visible view, checked home, feed, then categories
    pub fn visible_view(&self, doc: &Document) -> Option<(ViewKey, NodeId)> {
        if let Some(home) = self.home(doc) {
            if self.is_visible(doc, &ViewKey::Home) {
                return Some((ViewKey::Home, home));
            }
        }
        if let Some(feed) = self.feed(doc) {
            if doc.display(feed) == "block" {
                return Some((ViewKey::Feed, feed));
            }
        }
        self.categories(doc).into_iter().find_map(|page| {
            if doc.display(page) != "block" {
                return None;
            }
            let id = self.category_id(doc, page)?;
            Some((ViewKey::Category(id), page))
        })
    }

    /// Every visible view; at most one outside of a transition
    pub fn visible_views(&self, doc: &Document) -> Vec<ViewKey> {
        let mut keys = vec![ViewKey::Home, ViewKey::Feed];
        keys.extend(
            self.categories(doc)
                .into_iter()
                .filter_map(|page| self.category_id(doc, page))
                .map(ViewKey::Category),
        );
        keys.into_iter().filter(|key| self.is_visible(doc, key)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_dom::El;

    fn site() -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        doc.build(body, El::div().class(views::HOME));
        doc.build(body, El::div().class(views::FEED).style("display", "none"));
        doc.build(body, El::div().id("coding-page").class(views::CATEGORY).style("display", "none"));
        doc.build(body, El::div().id("music-page").class(views::CATEGORY).style("display", "none"));
        doc
    }

    #[test]
    fn test_home_visible_when_display_unset() {
        let doc = site();
        let registry = ViewRegistry::new();
        assert_eq!(registry.visible_view(&doc).map(|(k, _)| k), Some(ViewKey::Home));
        assert_eq!(registry.visible_views(&doc), vec![ViewKey::Home]);
    }

    #[test]
    fn test_category_lookup_by_naming_convention() {
        let mut doc = site();
        let registry = ViewRegistry::new();
        let coding = registry.category(&doc, "coding").unwrap();
        assert_eq!(registry.category_id(&doc, coding).as_deref(), Some("coding"));
        assert!(registry.category(&doc, "missing").is_none());

        let home = registry.home(&doc).unwrap();
        doc.set_style(home, "display", "none");
        doc.set_style(coding, "display", "block");
        assert_eq!(
            registry.visible_view(&doc).map(|(k, _)| k),
            Some(ViewKey::Category("coding".to_string()))
        );
    }

    #[test]
    fn test_menu_page_for_views() {
        assert_eq!(ViewKey::Home.menu_page(), "home");
        assert_eq!(ViewKey::Feed.menu_page(), "feed");
        assert_eq!(ViewKey::Category("x".to_string()).menu_page(), "feed");
        assert_eq!(ViewKey::Category("x".to_string()).entrant_marker(), "active-animation");
    }
}
