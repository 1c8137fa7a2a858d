//! The assembled site: navigation plus every widget over one window

use anyhow::Context;
use navigation::{NavigationCoordinator, TransitionOutcome};
use page_dom::{Clock, Document, EventKind, NodeId, Window};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use storage::{KvConfig, KvStore, LocalStore, ThemeMode, ThemePreference};
use widgets::{Clipboard, CodeCopyButtons, ImageLightbox, MemoryClipboard, MobileNavBar, MobileTab, ThemeToggle};

use crate::config::SiteConfig;

/// Which part of the site consumed a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// The image lightbox opened or closed
    Lightbox,
    /// A code block was copied
    Copy,
    /// A mobile tab was tapped
    MobileTab(MobileTab, TransitionOutcome),
    /// A navigation control
    Navigation(TransitionOutcome),
    /// Nothing bound under the click
    Nothing,
}

/// A booted page
pub struct Site {
    window: Window,
    coordinator: NavigationCoordinator,
    lightbox: Arc<Mutex<ImageLightbox>>,
    copy: CodeCopyButtons,
    mobile: Arc<Mutex<MobileNavBar>>,
    theme: ThemeToggle,
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("location", &self.window.location_hash())
            .field("now", &self.clock().now())
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

impl Site {
    /// Boot `document` at `fragment` with the store and clipboard `config` implies
    pub fn boot(document: Document, fragment: &str, config: SiteConfig) -> anyhow::Result<Self> {
        let store = match &config.storage_path {
            Some(path) => KvStore::new(KvConfig::new(path))
                .with_context(|| format!("Failed to open preference store {}", path))?,
            None => KvStore::in_memory().context("Failed to open in-memory preference store")?,
        };
        Ok(Self::with_parts(
            Window::new(document, fragment),
            config,
            store,
            Arc::new(MemoryClipboard::new()),
        ))
    }

    /// Boot an existing window with explicit collaborators
    pub fn with_parts(mut window: Window, config: SiteConfig, store: KvStore, clipboard: Arc<dyn Clipboard>) -> Self {
        let clock = window.clock().clone();
        let doc = &mut window.document;

        let mut lightbox = ImageLightbox::with_timings(clock.clone(), config.lightbox_timings());
        lightbox.create_modal(doc);
        lightbox.reattach_all(doc);
        let lightbox = Arc::new(Mutex::new(lightbox));

        let theme = ThemeToggle::new(ThemePreference::new(LocalStore::new(store)));
        theme.load_saved(doc);

        let copy = CodeCopyButtons::new(clipboard, clock.clone())
            .copied_label(config.copied_label.clone())
            .feedback(config.copy_feedback());
        let mobile = Arc::new(Mutex::new(MobileNavBar::new()));

        let mut coordinator = NavigationCoordinator::new(config.navigation, clock);
        coordinator.subscribe(lightbox.clone());
        coordinator.subscribe(copy.clone());
        coordinator.subscribe(mobile.clone());

        coordinator.init(doc);
        let body = doc.body();
        let buttons = copy.attach(doc, body);

        let parsed = coordinator.process_current_url(&mut window);
        let fragment = window.location_hash().to_string();
        mobile.lock().sync_from_fragment(&mut window.document, &fragment);
        tracing::info!(route = ?parsed.full_route(), copy_buttons = buttons, "Site booted");

        Self {
            window,
            coordinator,
            lightbox,
            copy,
            mobile,
            theme,
        }
    }

    /// The page
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The page, for driving it directly
    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    /// The element tree
    pub fn document(&self) -> &Document {
        &self.window.document
    }

    /// Navigation layer
    pub fn coordinator(&self) -> &NavigationCoordinator {
        &self.coordinator
    }

    /// Event-loop clock
    pub fn clock(&self) -> &Clock {
        self.window.clock()
    }

    /// Whether the lightbox shows an image
    pub fn lightbox_shown(&self) -> bool {
        self.lightbox.lock().is_shown(&self.window.document)
    }

    /// Active mobile tab
    pub fn mobile_tab(&self) -> Option<MobileTab> {
        self.mobile.lock().active(&self.window.document)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Click on `target`
    pub async fn click(&mut self, target: NodeId) -> anyhow::Result<Handled> {
        if self.lightbox.lock().handle_click(&mut self.window.document, target) {
            return Ok(Handled::Lightbox);
        }

        if self.copy.handle_click(&mut self.window.document, target).await? {
            return Ok(Handled::Copy);
        }

        let tapped = self.mobile.lock().handle_click(&mut self.window.document, target);
        if let Some((tab, destination)) = tapped {
            let outcome = match destination {
                Some(destination) => self.coordinator.navigate_to(&mut self.window, destination),
                None => TransitionOutcome::Ignored,
            };
            return Ok(Handled::MobileTab(tab, outcome));
        }

        let bound = self
            .coordinator
            .bindings()
            .resolve(&self.window.document, target, EventKind::Click)
            .is_some();
        if !bound {
            return Ok(Handled::Nothing);
        }
        let outcome = self.coordinator.handle_click(&mut self.window, target)?;
        Ok(Handled::Navigation(outcome))
    }

    /// The theme checkbox changed
    pub fn change_theme(&mut self, checked: bool) -> anyhow::Result<ThemeMode> {
        Ok(self.theme.on_change(&mut self.window.document, checked)?)
    }

    /// Key press; returns whether anything reacted
    ///
    /// Escape closes a shown lightbox and dismisses an open overlay.
    pub fn key_down(&mut self, key: &str) -> bool {
        let lightbox = self.lightbox.lock().handle_key(&mut self.window.document, key);
        let overlay = self.coordinator.handle_key(&mut self.window, key).started();
        lightbox || overlay
    }

    /// Browser back button
    pub fn back(&mut self) -> TransitionOutcome {
        match self.window.history.back() {
            Some(event) => self.coordinator.handle_back_forward(&mut self.window, &event),
            None => TransitionOutcome::Ignored,
        }
    }

    /// Browser forward button
    pub fn forward(&mut self) -> TransitionOutcome {
        match self.window.history.forward() {
            Some(event) => self.coordinator.handle_back_forward(&mut self.window, &event),
            None => TransitionOutcome::Ignored,
        }
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Earliest deadline across navigation and every widget
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.coordinator.next_deadline(),
            self.lightbox.lock().next_deadline(),
            self.copy.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn run_due(&mut self) -> usize {
        let doc = &mut self.window.document;
        let mut ran = self.lightbox.lock().run_due(doc);
        ran += self.copy.run_due(doc);
        ran + self.coordinator.run_due(&mut self.window)
    }

    fn step_to(&mut self, deadline: Duration) -> usize {
        self.clock().advance_to(deadline);
        self.run_due()
    }

    /// Move virtual time forward by `duration`, running everything due on the way
    pub fn advance(&mut self, duration: Duration) -> usize {
        let until = self.clock().now() + duration;
        let mut ran = 0;
        while let Some(deadline) = self.next_deadline().filter(|d| *d <= until) {
            ran += self.step_to(deadline);
        }
        self.clock().advance_to(until);
        ran
    }

    /// Run until nothing is scheduled
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Some(deadline) = self.next_deadline() {
            ran += self.step_to(deadline);
        }
        ran
    }

    /// Drive the page on the tokio clock for `duration`
    ///
    /// Each scheduled step runs once real (or paused test) time reaches it.
    pub async fn run_for(&mut self, duration: Duration) -> usize {
        let started = tokio::time::Instant::now();
        let base = self.clock().now();
        let until = base + duration;
        let mut ran = 0;

        while let Some(deadline) = self.next_deadline().filter(|d| *d <= until) {
            let wake = started + deadline.saturating_sub(base);
            tokio::time::sleep_until(wake).await;
            ran += self.step_to(deadline);
        }
        tokio::time::sleep_until(started + duration).await;
        self.clock().advance_to(until);
        ran
    }
}
