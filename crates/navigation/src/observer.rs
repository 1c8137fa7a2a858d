//! Subscription interface for collaborators
//!
//! Collaborators that need to follow view swaps (image viewers, the mobile
//! tab bar, code-copy buttons) register a [`NavigationObserver`] with the
//! coordinator instead of wrapping its operations.

use page_dom::{Document, NodeId};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::registry::ViewKey;

/// A view that `show_page` made visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownPage {
    /// View that was requested
    pub requested: ViewKey,
    /// View actually shown; differs when the fallback category was used
    pub shown: Option<ViewKey>,
    /// Its container
    pub container: Option<NodeId>,
}

/// Callbacks fired by the navigation coordinator
pub trait NavigationObserver: Send {
    /// After every `show_page`
    fn page_shown(&mut self, _doc: &mut Document, _page: &ShownPage) {}

    /// After a category grid was (re)loaded
    fn view_loaded(&mut self, _doc: &mut Document, _container: NodeId) {}

    /// After item content was projected into the overlay
    fn content_projected(&mut self, _doc: &mut Document, _overlay: NodeId) {}
}

impl<T: NavigationObserver> NavigationObserver for Arc<Mutex<T>> {
    fn page_shown(&mut self, doc: &mut Document, page: &ShownPage) {
        self.lock().page_shown(doc, page);
    }

    fn view_loaded(&mut self, doc: &mut Document, container: NodeId) {
        self.lock().view_loaded(doc, container);
    }

    fn content_projected(&mut self, doc: &mut Document, overlay: NodeId) {
        self.lock().content_projected(doc, overlay);
    }
}
