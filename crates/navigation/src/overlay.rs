//! Full-screen detail overlay
//!
//! A single shared overlay projects one item's detail payload above the
//! category it was opened from.
//!
//! ```text
//! Closed --open--> Opening --activate--> Open --close--> Closing --settle--> Closed
//! ```

use page_dom::{Bindings, Document, El, EventKind, NodeId, Timers, Window};

use crate::config::{ms, Timings};
use crate::coordinator::NavAction;
use crate::error::{NavigationError, Result};
use crate::grid::GridStateResetter;
use crate::history;
use crate::lock::{LockToken, NavigationLock};
use crate::markup::{controls, grid, markers, overlay, views};
use crate::registry::ViewRegistry;
use crate::router::Route;
use crate::step::{schedule_release, Step};
use crate::TransitionOutcome;

/// Lifecycle phase of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    /// Hidden
    #[default]
    Closed,
    /// Displayed, waiting to be marked active
    Opening,
    /// Active
    Open,
    /// Exit animation running
    Closing,
}

/// Owner of the overlay subtree
#[derive(Debug)]
pub struct FullscreenPageController {
    lock: NavigationLock,
    registry: ViewRegistry,
    timings: Timings,
    phase: OverlayPhase,
    saved_scroll: Option<f32>,
    escape_armed: bool,
}

impl FullscreenPageController {
    /// Controller sharing the coordinator's lock
    pub fn new(lock: NavigationLock, timings: Timings) -> Self {
        Self {
            lock,
            registry: ViewRegistry::new(),
            timings,
            phase: OverlayPhase::Closed,
            saved_scroll: None,
            escape_armed: false,
        }
    }

    /// Current phase
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Whether Escape is routed to the overlay
    pub fn escape_armed(&self) -> bool {
        self.escape_armed
    }

    /// Whether the overlay carries its active marker
    pub fn is_active(&self, doc: &Document) -> bool {
        self.registry
            .overlay(doc)
            .is_some_and(|container| doc.has_class(container, markers::ACTIVE))
    }

    /// Create the overlay skeleton unless the markup already has one
    pub fn init(&self, doc: &mut Document) -> NodeId {
        if let Some(existing) = self.registry.overlay(doc) {
            return existing;
        }

        let body = doc.body();
        doc.build(
            body,
            El::div()
                .id(overlay::CONTAINER_ID)
                .class(overlay::CONTAINER)
                .attr("tabindex", "-1")
                .child(
                    El::div().class(overlay::HEADER).children([
                        El::new("button")
                            .class(overlay::BACK)
                            .attr("aria-label", overlay::BACK_ARIA_LABEL)
                            .child(El::new("b").child(El::new("h3").text(overlay::BACK_LABEL))),
                        El::new("h2").class(overlay::TITLE).text(overlay::PLACEHOLDER_TITLE),
                    ]),
                )
                .child(El::div().class(overlay::CONTENT)),
        )
    }

    /// Project `item` into the overlay
    ///
    /// No-op while a navigation is in flight. Missing overlay anchors or a
    /// missing detail payload abort the open and release the lock.
    pub(crate) fn open(
        &mut self,
        window: &mut Window,
        item: NodeId,
        push_history: bool,
        timers: &mut Timers<Step>,
        bindings: &mut Bindings<NavAction>,
    ) -> Result<TransitionOutcome> {
        let Some(token) = self.lock.try_acquire() else {
            tracing::debug!("Navigation in flight, ignoring overlay open");
            return Ok(TransitionOutcome::Ignored);
        };

        match self.project(window, item, push_history) {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Cannot open fullscreen page: {}", e);
                self.lock.release(token);
                return Err(e);
            }
        }

        self.saved_scroll = Some(window.scroll_y());
        let doc = &mut window.document;
        if let Some(container) = self.registry.overlay(doc) {
            doc.set_style(container, "display", "block");
            if let Some(back) = doc.first_with_class(container, overlay::BACK) {
                bindings.bind(back, EventKind::Click, NavAction::OverlayBack);
            }
        }

        self.phase = OverlayPhase::Opening;
        self.escape_armed = true;
        timers.schedule(ms(self.timings.overlay_activate_ms), Step::OverlayActivate { token });
        Ok(TransitionOutcome::Started)
    }

    fn project(&self, window: &mut Window, item: NodeId, push_history: bool) -> Result<()> {
        let doc = &mut window.document;
        let container = self.registry.overlay(doc).ok_or(NavigationError::MissingAnchor("container"))?;
        let title = doc
            .first_with_class(container, overlay::TITLE)
            .ok_or(NavigationError::MissingAnchor("title"))?;
        let content = doc
            .first_with_class(container, overlay::CONTENT)
            .ok_or(NavigationError::MissingAnchor("content"))?;

        let expanded = doc
            .first_with_class(item, grid::EXPANDED_CONTENT)
            .ok_or_else(|| NavigationError::MissingContent(item_key(doc, item).unwrap_or_default()))?;
        let item_title = doc
            .first_with_class(item, grid::TITLE)
            .map(|t| doc.text_content(t))
            .unwrap_or_default();

        let projected = doc.clone_subtree(expanded);
        doc.clear_children(content);
        doc.append_child(content, projected);
        doc.set_style(projected, "display", "block");
        doc.set_style(projected, "opacity", "1");
        doc.set_style(projected, "transform", "scale(1)");
        doc.set_text(title, &item_title);

        if push_history {
            match item_route(&self.registry, doc, item) {
                Some(route) => {
                    history::push(window, &route)?;
                }
                None => tracing::warn!("Opened item has no owning category, history not updated"),
            }
        }
        Ok(())
    }

    /// Opening → Open; returns the overlay container for observers
    pub(crate) fn activate(
        &mut self,
        doc: &mut Document,
        token: LockToken,
        timers: &mut Timers<Step>,
    ) -> Option<NodeId> {
        let container = self.registry.overlay(doc);
        if let Some(container) = container {
            doc.add_class(container, markers::ACTIVE);
            doc.set_scroll_top(container, 0.0);
        }
        if let Some(main) = self.registry.main_content(doc) {
            doc.set_style(main, "overflow", "hidden");
        }
        self.phase = OverlayPhase::Open;
        schedule_release(timers, token, ms(self.timings.overlay_open_release_ms));
        container
    }

    /// Close the overlay
    ///
    /// No-op while a navigation is in flight or when the overlay is not active.
    pub(crate) fn close(&mut self, doc: &mut Document, update_history: bool, timers: &mut Timers<Step>) -> TransitionOutcome {
        if !self.is_active(doc) {
            return TransitionOutcome::Ignored;
        }
        let Some(token) = self.lock.try_acquire() else {
            tracing::debug!("Navigation in flight, ignoring overlay close");
            return TransitionOutcome::Ignored;
        };
        self.begin_close(doc, update_history, Some(token), timers);
        TransitionOutcome::Started
    }

    /// Start the close transition on behalf of an enclosing transition
    ///
    /// `token` is released once the overlay has closed; pass `None` when the
    /// caller releases the lock itself.
    pub(crate) fn begin_close(
        &mut self,
        doc: &mut Document,
        update_history: bool,
        token: Option<LockToken>,
        timers: &mut Timers<Step>,
    ) {
        if let Some(container) = self.registry.overlay(doc) {
            doc.remove_class(container, markers::ACTIVE);
        }
        self.phase = OverlayPhase::Closing;
        self.escape_armed = false;
        timers.schedule(
            ms(self.timings.overlay_close_settle_ms),
            Step::OverlayClosed { update_history, token },
        );
    }

    /// Closing → Closed; returns the route pushed onto history, if any
    pub(crate) fn finish_close(
        &mut self,
        window: &mut Window,
        update_history: bool,
        token: Option<LockToken>,
        timers: &mut Timers<Step>,
    ) -> Option<Route> {
        let doc = &mut window.document;
        if let Some(container) = self.registry.overlay(doc) {
            doc.set_style(container, "display", "none");
        }
        if let Some(main) = self.registry.main_content(doc) {
            doc.set_style(main, "overflow", "");
        }
        if let Some(offset) = self.saved_scroll.take() {
            window.scroll_to(offset);
        }

        let mut pushed = None;
        if update_history {
            if let Some(category) = deep_link_category(window.location_hash()) {
                let route = Route::Category { id: category };
                match history::push(window, &route) {
                    Ok(_) => pushed = Some(route),
                    Err(e) => tracing::error!("Failed to record category entry: {}", e),
                }
            }
        }

        self.resync_visible_grids(&mut window.document);
        self.phase = OverlayPhase::Closed;
        if let Some(token) = token {
            schedule_release(timers, token, ms(self.timings.overlay_close_release_ms));
        }
        pushed
    }

    // Cloning content out and other DOM writes can leave stale inline styles behind
    fn resync_visible_grids(&self, doc: &mut Document) {
        for page in self.registry.categories(doc) {
            if doc.display(page) == "block" {
                GridStateResetter::reset_view(doc, page);
            }
        }
    }
}

/// Item key, carried in `data-category`
pub(crate) fn item_key(doc: &Document, item: NodeId) -> Option<String> {
    doc.attr(item, controls::DATA_CATEGORY).map(str::to_string)
}

/// Deep-link route of an item: owning category plus item key
pub(crate) fn item_route(registry: &ViewRegistry, doc: &Document, item: NodeId) -> Option<Route> {
    let page = doc.closest(item, views::CATEGORY)?;
    Some(Route::Item {
        category: registry.category_id(doc, page)?,
        item: item_key(doc, item)?,
    })
}

/// Category segment of an `#item/...` fragment
fn deep_link_category(fragment: &str) -> Option<String> {
    let rest = fragment.strip_prefix("#item/")?;
    let segment = rest.split('/').next().filter(|s| !s.is_empty())?;
    Some(urlencoding::decode(segment).ok()?.into_owned())
}
