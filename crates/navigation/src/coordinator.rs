//! Navigation coordinator
//!
//! Every navigation request goes through one coordinator that owns the
//! navigation lock, the timer queue driving animation phases, the overlay
//! controller and the control bindings. Requests arriving while a
//! transition is in flight are dropped.
//!
//! Time is virtual: operations schedule phase steps and the host calls
//! [`NavigationCoordinator::run_due`] after advancing the window clock.

use page_dom::{Bindings, Clock, Document, EventKind, NodeId, PopState, Timers, Window};
use std::time::Duration;

use crate::config::{ms, NavigationConfig};
use crate::error::Result;
use crate::grid::GridStateResetter;
use crate::history::{self, HistoryState};
use crate::lock::{LockToken, NavigationLock};
use crate::markup::{controls, grid, markers, views};
use crate::observer::{NavigationObserver, ShownPage};
use crate::overlay::{item_route, FullscreenPageController};
use crate::registry::{ViewKey, ViewRegistry};
use crate::router::{ParsedRoute, Route, Router};
use crate::step::{schedule_release, Step};

// =============================================================================
// Requests
// =============================================================================

/// Destination of a menu-level navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// Home view
    Home,
    /// Feed view
    Feed,
    /// One category
    Category(String),
}

impl NavTarget {
    /// Route recorded in history for this target
    pub fn route(&self) -> Route {
        match self {
            NavTarget::Home => Route::Home,
            NavTarget::Feed => Route::Feed,
            NavTarget::Category(id) => Route::Category { id: id.clone() },
        }
    }

    /// View shown for this target
    pub fn key(&self) -> ViewKey {
        match self {
            NavTarget::Home => ViewKey::Home,
            NavTarget::Feed => ViewKey::Feed,
            NavTarget::Category(id) => ViewKey::Category(id.clone()),
        }
    }
}

/// Whether an entry point started a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// A transition is now running
    Started,
    /// Dropped: another transition was in flight, or nothing to do
    Ignored,
}

impl TransitionOutcome {
    /// Whether a transition started
    pub fn started(self) -> bool {
        self == TransitionOutcome::Started
    }
}

/// Action bound to a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Site logo
    HomeLink,
    /// Main menu entry for a logical page
    Menu(String),
    /// Category tile
    CategoryLink(String),
    /// Back control inside a category
    BackToFeed,
    /// Preview of an expandable item
    OpenItem {
        /// The item to project
        item: NodeId,
    },
    /// Back control of the overlay
    OverlayBack,
}

// =============================================================================
// State
// =============================================================================

/// What the coordinator believes is on screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    /// Current route, including an open item
    pub route: Route,
    /// Whether the route was reached through a pushed history entry
    pub history_entry_pushed: bool,
}

// =============================================================================
// Coordinator
// =============================================================================

/// Root of the navigation layer
pub struct NavigationCoordinator {
    config: NavigationConfig,
    router: Router,
    registry: ViewRegistry,
    lock: NavigationLock,
    timers: Timers<Step>,
    overlay: FullscreenPageController,
    bindings: Bindings<NavAction>,
    observers: Vec<Box<dyn NavigationObserver>>,
    state: NavigationState,
}

impl std::fmt::Debug for NavigationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationCoordinator")
            .field("state", &self.state)
            .field("lock", &self.lock)
            .field("pending_steps", &self.timers.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl NavigationCoordinator {
    /// Create a coordinator scheduling on `clock`
    pub fn new(config: NavigationConfig, clock: Clock) -> Self {
        let lock = NavigationLock::new();
        let overlay = FullscreenPageController::new(lock.clone(), config.timings.clone());
        Self {
            config,
            router: Router::new(),
            registry: ViewRegistry::new(),
            lock,
            timers: Timers::new(clock),
            overlay,
            bindings: Bindings::new(),
            observers: Vec::new(),
            state: NavigationState::default(),
        }
    }

    /// Register a collaborator
    pub fn subscribe(&mut self, observer: impl NavigationObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Active configuration
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// The shared navigation lock
    pub fn lock(&self) -> &NavigationLock {
        &self.lock
    }

    /// Current navigation state
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The overlay controller
    pub fn overlay(&self) -> &FullscreenPageController {
        &self.overlay
    }

    /// Control bindings
    pub fn bindings(&self) -> &Bindings<NavAction> {
        &self.bindings
    }

    /// View lookup
    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Create the overlay, bind every control and prepare every grid
    pub fn init(&mut self, doc: &mut Document) {
        self.overlay.init(doc);
        self.bind_controls(doc);
        let prepared = self.setup_expandable_grids(doc, None);
        tracing::debug!(items = prepared, "Navigation initialized");
    }

    /// (Re)bind the logo, menu entries, category tiles and back controls
    pub fn bind_controls(&mut self, doc: &Document) {
        let body = doc.body();
        if let Some(logo) = doc.get_element_by_id(controls::HOME_LINK_ID) {
            self.bindings.bind(logo, EventKind::Click, NavAction::HomeLink);
        }
        for entry in doc.query_class(body, controls::NAV_ITEM) {
            if let Some(page) = doc.attr(entry, controls::DATA_PAGE) {
                self.bindings.bind(entry, EventKind::Click, NavAction::Menu(page.to_string()));
            }
        }
        for tile in doc.query_class(body, controls::CATEGORY_ITEM) {
            if let Some(category) = doc.attr(tile, controls::DATA_CATEGORY) {
                self.bindings
                    .bind(tile, EventKind::Click, NavAction::CategoryLink(category.to_string()));
            }
        }
        for back in doc.query_class(body, controls::BACK_BUTTON) {
            self.bindings.bind(back, EventKind::Click, NavAction::BackToFeed);
        }
    }

    /// Prepare the grids inside `scope` (or the whole document) and bind each preview
    ///
    /// Returns the number of items that can be opened.
    pub fn setup_expandable_grids(&mut self, doc: &mut Document, scope: Option<NodeId>) -> usize {
        let root = scope.unwrap_or_else(|| doc.body());
        let mut openable = 0;
        for grid_node in doc.query_class(root, grid::GRID) {
            if doc.first_with_class(grid_node, grid::ITEM).is_none() {
                continue;
            }
            for item in GridStateResetter::prepare(doc, grid_node) {
                if let Some(preview) = doc.first_with_class(item, grid::PREVIEW) {
                    self.bindings.bind(preview, EventKind::Click, NavAction::OpenItem { item });
                    openable += 1;
                }
            }
        }
        openable
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Navigate to Home, Feed or a category
    pub fn navigate_to(&mut self, window: &mut Window, target: NavTarget) -> TransitionOutcome {
        let Some(token) = self.lock.try_acquire() else {
            tracing::debug!(?target, "Navigation in flight, ignoring request");
            return TransitionOutcome::Ignored;
        };
        self.navigate_holding(window, target, token);
        TransitionOutcome::Started
    }

    /// Play the exit of the visible view and commit `target` under `token`
    fn navigate_holding(&mut self, window: &mut Window, target: NavTarget, token: LockToken) {
        match self.registry.visible_view(&window.document) {
            Some((key, outgoing)) => {
                window.document.remove_class(outgoing, key.entrant_marker());
                self.timers.schedule(
                    ms(self.config.timings.exit_settle_ms),
                    Step::CommitNavigation { target, token, had_exit: true },
                );
            }
            None => self.commit_navigation(window, target, token, false),
        }
    }

    fn commit_navigation(&mut self, window: &mut Window, target: NavTarget, token: LockToken, had_exit: bool) {
        let route = target.route();
        match history::push(window, &route) {
            Ok(_) => {
                self.state = NavigationState { route, history_entry_pushed: true };
            }
            Err(e) => tracing::error!("Failed to record history entry: {}", e),
        }

        let shown = self.show_page(window, &target.key());
        self.update_title(&mut window.document);
        if let Some(ViewKey::Category(category)) = shown.shown {
            self.timers.schedule(
                ms(self.config.timings.category_load_ms),
                Step::LoadCategory { category, pending_item: None },
            );
        }
        window.scroll_to(0.0);

        let timings = &self.config.timings;
        let release = if had_exit { timings.navigate_release_ms } else { timings.first_load_release_ms };
        schedule_release(&mut self.timers, token, ms(release));
        tracing::info!(fragment = window.location_hash(), "Navigated");
    }

    /// Swap view visibility to `key`
    ///
    /// Hides every view, closes the overlay unless the fragment is an item
    /// deep link, shows the requested view (or the fallback category), marks
    /// its menu entry active and resets its grids. Observers are notified.
    pub fn show_page(&mut self, window: &mut Window, key: &ViewKey) -> ShownPage {
        let home = self.registry.home(&window.document);
        let feed = self.registry.feed(&window.document);
        let doc = &mut window.document;

        for view in [home, feed].into_iter().flatten() {
            doc.remove_class(view, markers::PAGE_ACTIVE);
        }

        if self.overlay.is_active(doc) && !window.history.current().fragment.starts_with("#item/") {
            self.overlay.begin_close(doc, false, None, &mut self.timers);
        }

        for page in self.registry.categories(doc) {
            doc.remove_class(page, markers::ACTIVE_ANIMATION);
            doc.set_style(page, "display", "none");
        }
        for entry in self.registry.menu_entries(doc) {
            doc.remove_class(entry, markers::ACTIVE);
        }

        let timings = &self.config.timings;
        let (shown, container, entrant_delay) = match key {
            ViewKey::Home | ViewKey::Feed => {
                let (visible, hidden) = if *key == ViewKey::Home { (home, feed) } else { (feed, home) };
                if let Some(hidden) = hidden {
                    doc.set_style(hidden, "display", "none");
                }
                if let Some(visible) = visible {
                    doc.set_style(visible, "display", "block");
                }
                (visible.map(|_| key.clone()), visible, timings.view_entrant_ms)
            }
            ViewKey::Category(id) => {
                for view in [home, feed].into_iter().flatten() {
                    doc.set_style(view, "display", "none");
                }
                match self.registry.category(doc, id) {
                    Some(page) => (Some(key.clone()), Some(page), timings.category_entrant_ms),
                    None => {
                        let fallback = &self.config.fallback_category;
                        tracing::error!(category = %id, fallback = %fallback, "Category page not found");
                        let page = self.registry.category(doc, fallback);
                        (
                            page.map(|_| ViewKey::Category(fallback.clone())),
                            page,
                            timings.fallback_entrant_ms,
                        )
                    }
                }
            }
        };

        if let Some(page) = container.filter(|_| matches!(key, ViewKey::Category(_))) {
            GridStateResetter::reset_view(doc, page);
            doc.set_style(page, "display", "block");
        }
        if let Some(entry) = self.registry.menu_entry(doc, key.menu_page()) {
            doc.add_class(entry, markers::ACTIVE);
        }
        if let Some(view) = container {
            self.timers.schedule(
                ms(entrant_delay),
                Step::Entrant { view, marker: key.entrant_marker() },
            );
        }

        let page = ShownPage { requested: key.clone(), shown, container };
        for observer in &mut self.observers {
            observer.page_shown(doc, &page);
        }
        page
    }

    /// Browser back/forward; the window history has already moved
    pub fn handle_back_forward(&mut self, window: &mut Window, event: &PopState) -> TransitionOutcome {
        let Some(token) = self.lock.try_acquire() else {
            tracing::debug!("Navigation in flight, ignoring popstate");
            return TransitionOutcome::Ignored;
        };

        match HistoryState::from_value(&event.state) {
            Ok(Some(state)) => tracing::debug!(entry = ?state.entry, "Restoring history entry"),
            Ok(None) => tracing::debug!("Restoring initial history entry"),
            Err(e) => tracing::warn!("Unreadable history state, using the fragment: {}", e),
        }

        let timings = self.config.timings.clone();
        if self.overlay.is_active(&window.document) {
            self.overlay.begin_close(&mut window.document, false, None, &mut self.timers);
            self.timers.schedule(
                ms(timings.popstate_overlay_settle_ms),
                Step::Reprocess { token, release_after: ms(timings.popstate_release_ms) },
            );
            return TransitionOutcome::Started;
        }

        let leaving_category = matches!(
            self.registry.visible_view(&window.document),
            Some((ViewKey::Category(_), _))
        );
        if leaving_category && window.location_hash() == Route::Feed.to_fragment() {
            if let Some((_, page)) = self.registry.visible_view(&window.document) {
                window.document.remove_class(page, markers::ACTIVE_ANIMATION);
            }
            self.timers.schedule(
                ms(timings.popstate_category_exit_ms),
                Step::Reprocess { token, release_after: ms(timings.popstate_category_release_ms) },
            );
        } else {
            self.process_current_url(window);
            schedule_release(&mut self.timers, token, ms(timings.popstate_release_ms));
        }
        TransitionOutcome::Started
    }

    /// Apply the state encoded in the current fragment
    pub fn process_current_url(&mut self, window: &mut Window) -> ParsedRoute {
        let parsed = self.router.parse(window.location_hash());
        let key = match &parsed.route {
            Route::Home => ViewKey::Home,
            Route::Feed => ViewKey::Feed,
            Route::Category { id } | Route::Item { category: id, .. } => ViewKey::Category(id.clone()),
        };

        self.show_page(window, &key);
        self.update_title(&mut window.document);
        self.state = NavigationState {
            route: parsed.full_route(),
            history_entry_pushed: false,
        };

        if let Some(category) = parsed.category() {
            let timings = &self.config.timings;
            self.timers.schedule(
                ms(timings.url_category_load_ms),
                Step::LoadCategory {
                    category: category.to_string(),
                    pending_item: parsed.pending_item.clone(),
                },
            );
            self.timers.schedule(
                ms(timings.url_grid_setup_ms),
                Step::SetupGrids { category: category.to_string() },
            );
        }
        parsed
    }

    /// Project `item` into the overlay and push its deep link
    pub fn open_item(&mut self, window: &mut Window, item: NodeId) -> Result<TransitionOutcome> {
        self.open_item_inner(window, item, true)
    }

    fn open_item_inner(&mut self, window: &mut Window, item: NodeId, push_history: bool) -> Result<TransitionOutcome> {
        let route = item_route(&self.registry, &window.document, item);
        let outcome = self
            .overlay
            .open(window, item, push_history, &mut self.timers, &mut self.bindings)?;
        if outcome.started() {
            self.bindings.retain_attached(&window.document);
            if let Some(route) = route {
                self.state = NavigationState { route, history_entry_pushed: push_history };
            }
        }
        Ok(outcome)
    }

    /// Close the overlay and rewrite history to its category
    pub fn close_overlay(&mut self, window: &mut Window) -> TransitionOutcome {
        self.overlay.close(&mut window.document, true, &mut self.timers)
    }

    /// Close the overlay, then re-derive state from the rewritten fragment
    ///
    /// Bound to Escape and the overlay back control.
    pub fn dismiss_overlay(&mut self, window: &mut Window) -> TransitionOutcome {
        if !self.overlay.is_active(&window.document) {
            return TransitionOutcome::Ignored;
        }
        let Some(token) = self.lock.try_acquire() else {
            tracing::debug!("Navigation in flight, ignoring overlay dismissal");
            return TransitionOutcome::Ignored;
        };

        let timings = &self.config.timings;
        let release_after = ms(timings.dismiss_release_ms);
        let reprocess_at = ms(timings.dismiss_reprocess_ms);
        self.overlay.begin_close(&mut window.document, true, None, &mut self.timers);
        self.timers.schedule(reprocess_at, Step::Reprocess { token, release_after });
        TransitionOutcome::Started
    }

    /// Keyboard entry point; only Escape on an open overlay does anything
    pub fn handle_key(&mut self, window: &mut Window, key: &str) -> TransitionOutcome {
        if key == "Escape" && self.overlay.escape_armed() {
            self.dismiss_overlay(window)
        } else {
            TransitionOutcome::Ignored
        }
    }

    /// Click entry point; resolves the nearest bound control
    pub fn handle_click(&mut self, window: &mut Window, target: NodeId) -> Result<TransitionOutcome> {
        let Some((node, action)) = self
            .bindings
            .resolve(&window.document, target, EventKind::Click)
            .map(|(node, action)| (node, action.clone()))
        else {
            return Ok(TransitionOutcome::Ignored);
        };
        self.dispatch(window, node, action)
    }

    /// Run a bound action for the control `node`
    pub fn dispatch(&mut self, window: &mut Window, node: NodeId, action: NavAction) -> Result<TransitionOutcome> {
        let outcome = match action {
            NavAction::HomeLink => self.navigate_to(window, NavTarget::Home),
            NavAction::Menu(page) => {
                if window.document.has_class(node, markers::ACTIVE) {
                    return Ok(TransitionOutcome::Ignored);
                }
                match page.as_str() {
                    controls::PAGE_HOME => self.navigate_to(window, NavTarget::Home),
                    controls::PAGE_FEED => self.navigate_to(window, NavTarget::Feed),
                    other => {
                        tracing::debug!(page = other, "Menu entry without a view");
                        TransitionOutcome::Ignored
                    }
                }
            }
            NavAction::CategoryLink(category) => self.navigate_to(window, NavTarget::Category(category)),
            NavAction::BackToFeed => match window.document.closest(node, views::CATEGORY) {
                Some(page) => {
                    let Some(token) = self.lock.try_acquire() else {
                        tracing::debug!("Navigation in flight, ignoring back control");
                        return Ok(TransitionOutcome::Ignored);
                    };
                    window.document.remove_class(page, markers::ACTIVE_ANIMATION);
                    self.timers.schedule(
                        ms(self.config.timings.back_button_settle_ms),
                        Step::BackToFeed { page, token },
                    );
                    TransitionOutcome::Started
                }
                None => self.navigate_to(window, NavTarget::Feed),
            },
            NavAction::OpenItem { item } => return self.open_item(window, item),
            NavAction::OverlayBack => self.dismiss_overlay(window),
        };
        Ok(outcome)
    }

    /// Document title; the category is deliberately not part of it
    pub fn update_title(&self, doc: &mut Document) {
        doc.set_title(self.config.site_title.clone());
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Deadline of the next scheduled step
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Deadline of the last scheduled step
    pub fn last_deadline(&self) -> Option<Duration> {
        self.timers.last_deadline()
    }

    /// Number of scheduled steps
    pub fn pending_steps(&self) -> usize {
        self.timers.len()
    }

    /// Run every step due at the current instant; returns how many ran
    pub fn run_due(&mut self, window: &mut Window) -> usize {
        let mut ran = 0;
        while let Some(step) = self.timers.pop_due() {
            self.run_step(window, step);
            ran += 1;
        }
        ran
    }

    fn run_step(&mut self, window: &mut Window, step: Step) {
        match step {
            Step::CommitNavigation { target, token, had_exit } => {
                self.commit_navigation(window, target, token, had_exit)
            }
            Step::Entrant { view, marker } => window.document.add_class(view, marker),
            Step::LoadCategory { category, pending_item } => {
                self.load_category(&mut window.document, &category, pending_item)
            }
            Step::OpenPendingItem { category, item } => self.open_pending_item(window, &category, &item),
            Step::SetupGrids { category } => {
                if let Some(page) = self.registry.category(&window.document, &category) {
                    self.setup_expandable_grids(&mut window.document, Some(page));
                }
            }
            Step::BackToFeed { page, token } => {
                GridStateResetter::reset_view(&mut window.document, page);
                self.navigate_holding(window, NavTarget::Feed, token);
            }
            Step::Reprocess { token, release_after } => {
                self.process_current_url(window);
                schedule_release(&mut self.timers, token, release_after);
            }
            Step::OverlayActivate { token } => {
                if let Some(container) = self.overlay.activate(&mut window.document, token, &mut self.timers) {
                    for observer in &mut self.observers {
                        observer.content_projected(&mut window.document, container);
                    }
                }
            }
            Step::OverlayClosed { update_history, token } => {
                if let Some(route) = self.overlay.finish_close(window, update_history, token, &mut self.timers) {
                    self.state = NavigationState { route, history_entry_pushed: true };
                }
            }
            Step::Release(token) => {
                self.lock.release(token);
            }
        }
    }

    fn load_category(&mut self, doc: &mut Document, category: &str, pending_item: Option<String>) {
        let Some(page) = self.registry.category(doc, category) else {
            tracing::debug!(category, "No container to load");
            return;
        };
        let Some(grid_node) = doc.first_with_class(page, grid::GRID) else {
            return;
        };

        GridStateResetter::reset(doc, grid_node);
        for observer in &mut self.observers {
            observer.view_loaded(doc, page);
        }

        if let Some(item) = pending_item {
            self.timers.schedule(
                ms(self.config.timings.pending_item_open_ms),
                Step::OpenPendingItem { category: category.to_string(), item },
            );
        }
    }

    fn open_pending_item(&mut self, window: &mut Window, category: &str, item: &str) {
        let doc = &window.document;
        let target = self
            .registry
            .category(doc, category)
            .and_then(|page| doc.first_with_class(page, grid::GRID))
            .and_then(|grid_node| {
                doc.query_class_attr(grid_node, grid::ITEM, controls::DATA_CATEGORY, item)
                    .into_iter()
                    .next()
            });

        match target {
            Some(node) => {
                // Errors are already reported by the overlay
                let _ = self.open_item_inner(window, node, false);
            }
            None => tracing::debug!(category, item, "Deep-linked item not found"),
        }
    }
}
