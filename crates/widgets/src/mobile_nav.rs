//! Bottom tab bar for small screens

use navigation::markup::{controls, markers};
use navigation::{NavTarget, NavigationObserver, Page, Router, ShownPage, ViewKey};
use page_dom::{Document, NodeId};

/// Tab control class
pub const TAB: &str = "mobile-nav-item";

/// Tabs of the mobile bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobileTab {
    /// Home tab
    Home,
    /// Feed tab, also active inside categories
    Feed,
    /// Search, not built yet
    Search,
    /// Profile, not built yet
    Profile,
}

impl MobileTab {
    /// `data-page` value of the tab
    pub fn as_str(&self) -> &'static str {
        match self {
            MobileTab::Home => controls::PAGE_HOME,
            MobileTab::Feed => controls::PAGE_FEED,
            MobileTab::Search => "search",
            MobileTab::Profile => "profile",
        }
    }

    /// Tab for a `data-page` value
    pub fn from_page(page: &str) -> Option<Self> {
        match page {
            controls::PAGE_HOME => Some(MobileTab::Home),
            controls::PAGE_FEED => Some(MobileTab::Feed),
            "search" => Some(MobileTab::Search),
            "profile" => Some(MobileTab::Profile),
            _ => None,
        }
    }

    /// Tab mirroring a shown view
    pub fn for_view(key: &ViewKey) -> Self {
        match key {
            ViewKey::Home => MobileTab::Home,
            ViewKey::Feed | ViewKey::Category(_) => MobileTab::Feed,
        }
    }

    /// Where tapping the tab navigates
    pub fn target(&self) -> Option<NavTarget> {
        match self {
            MobileTab::Home => Some(NavTarget::Home),
            MobileTab::Feed => Some(NavTarget::Feed),
            MobileTab::Search | MobileTab::Profile => None,
        }
    }
}

/// Mobile tab bar state
#[derive(Debug, Default)]
pub struct MobileNavBar {
    router: Router,
}

impl MobileNavBar {
    /// Bar over the page's `.mobile-nav-item` links
    pub fn new() -> Self {
        Self::default()
    }

    fn tabs(doc: &Document) -> Vec<(NodeId, MobileTab)> {
        doc.query_class(doc.body(), TAB)
            .into_iter()
            .filter_map(|node| {
                let tab = doc.attr(node, controls::DATA_PAGE).and_then(MobileTab::from_page)?;
                Some((node, tab))
            })
            .collect()
    }

    /// Mark `tab` active and every other tab inactive
    pub fn set_active(&self, doc: &mut Document, tab: MobileTab) {
        for (node, candidate) in Self::tabs(doc) {
            if candidate == tab {
                doc.add_class(node, markers::ACTIVE);
            } else {
                doc.remove_class(node, markers::ACTIVE);
            }
        }
    }

    /// Currently active tab
    pub fn active(&self, doc: &Document) -> Option<MobileTab> {
        Self::tabs(doc)
            .into_iter()
            .find(|(node, _)| doc.has_class(*node, markers::ACTIVE))
            .map(|(_, tab)| tab)
    }

    /// Highlight the tab for the view `fragment` addresses
    pub fn sync_from_fragment(&self, doc: &mut Document, fragment: &str) {
        let tab = match self.router.parse(fragment).page() {
            Page::Home => MobileTab::Home,
            Page::Feed | Page::Category => MobileTab::Feed,
        };
        self.set_active(doc, tab);
    }

    /// Handle a click; returns the tab hit and where to navigate
    pub fn handle_click(&self, doc: &mut Document, target: NodeId) -> Option<(MobileTab, Option<NavTarget>)> {
        let node = doc.closest(target, TAB)?;
        let tab = doc.attr(node, controls::DATA_PAGE).and_then(MobileTab::from_page)?;
        self.set_active(doc, tab);

        let destination = tab.target();
        if destination.is_none() {
            tracing::info!(tab = tab.as_str(), "Mobile tab not implemented");
        }
        Some((tab, destination))
    }
}

impl NavigationObserver for MobileNavBar {
    fn page_shown(&mut self, doc: &mut Document, page: &ShownPage) {
        let key = page.shown.as_ref().unwrap_or(&page.requested);
        self.set_active(doc, MobileTab::for_view(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navigation::test_utils::site_document;

    fn tab_node(doc: &Document, tab: MobileTab) -> NodeId {
        MobileNavBar::tabs(doc)
            .into_iter()
            .find(|(_, t)| *t == tab)
            .map(|(node, _)| node)
            .unwrap()
    }

    #[test]
    fn test_sync_from_fragment() {
        let bar = MobileNavBar::new();
        let mut doc = site_document();

        bar.sync_from_fragment(&mut doc, "");
        assert_eq!(bar.active(&doc), Some(MobileTab::Home));
        bar.sync_from_fragment(&mut doc, "#category/music");
        assert_eq!(bar.active(&doc), Some(MobileTab::Feed));
        bar.sync_from_fragment(&mut doc, "#item/coding/1");
        assert_eq!(bar.active(&doc), Some(MobileTab::Feed));
    }

    #[test]
    fn test_click_feed_navigates() {
        let bar = MobileNavBar::new();
        let mut doc = site_document();
        let feed = tab_node(&doc, MobileTab::Feed);

        let (tab, target) = bar.handle_click(&mut doc, feed).unwrap();
        assert_eq!(tab, MobileTab::Feed);
        assert_eq!(target, Some(NavTarget::Feed));
        assert!(doc.has_class(feed, markers::ACTIVE));
    }

    #[test]
    fn test_unbuilt_tabs_do_not_navigate() {
        let bar = MobileNavBar::new();
        let mut doc = site_document();
        let search = tab_node(&doc, MobileTab::Search);

        assert_eq!(bar.handle_click(&mut doc, search), Some((MobileTab::Search, None)));
        assert_eq!(bar.active(&doc), Some(MobileTab::Search));
        let body = doc.body();
        assert_eq!(bar.handle_click(&mut doc, body), None);
    }

    #[test]
    fn test_mirrors_shown_category() {
        let mut bar = MobileNavBar::new();
        let mut doc = site_document();
        let page = ShownPage {
            requested: ViewKey::Category("nope".to_string()),
            shown: Some(ViewKey::Category("coding".to_string())),
            container: None,
        };
        bar.page_shown(&mut doc, &page);
        assert_eq!(bar.active(&doc), Some(MobileTab::Feed));
    }
}
