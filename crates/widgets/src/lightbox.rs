//! Image lightbox
//!
//! Clicking a `.post-image` shows it enlarged in a shared modal. The modal
//! fades in over two short steps and fades out over two longer ones.

use navigation::{NavigationObserver, ShownPage, ViewRegistry};
use page_dom::{Bindings, Clock, Document, El, EventKind, NodeId, Timers};
use std::time::Duration;

/// Class of images that open in the lightbox
pub const POST_IMAGE: &str = "post-image";
/// Modal backdrop
pub const MODAL: &str = "image-modal";
/// Close control
pub const CLOSE: &str = "close-modal";
/// Image frame
pub const CONTENT: &str = "modal-content";
/// Visibility marker driving the CSS transitions
pub const SHOW: &str = "show";

/// Fade timings in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightboxTimings {
    /// Gap between each fade-in step
    pub step_ms: u64,
    /// Duration of each fade-out step
    pub fade_ms: u64,
}

impl Default for LightboxTimings {
    fn default() -> Self {
        Self { step_ms: 10, fade_ms: 300 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LightboxAction {
    Open,
    Close,
    Backdrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LightboxStep {
    ShowModal,
    ShowContent,
    HideModal,
    Hide,
}

#[derive(Debug, Clone, Copy)]
struct Modal {
    root: NodeId,
    close: NodeId,
    content: NodeId,
    image: NodeId,
}

/// Shared image viewer
#[derive(Debug)]
pub struct ImageLightbox {
    timings: LightboxTimings,
    timers: Timers<LightboxStep>,
    bindings: Bindings<LightboxAction>,
    modal: Option<Modal>,
    registry: ViewRegistry,
}

impl ImageLightbox {
    /// Viewer scheduling its fades on `clock`
    pub fn new(clock: Clock) -> Self {
        Self::with_timings(clock, LightboxTimings::default())
    }

    /// Viewer with custom fade timings
    pub fn with_timings(clock: Clock, timings: LightboxTimings) -> Self {
        Self {
            timings,
            timers: Timers::new(clock),
            bindings: Bindings::new(),
            modal: None,
            registry: ViewRegistry::new(),
        }
    }

    /// Create the modal unless the page already has one; returns its root
    pub fn create_modal(&mut self, doc: &mut Document) -> NodeId {
        if let Some(modal) = self.modal {
            return modal.root;
        }

        let body = doc.body();
        let root = match doc.first_with_class(body, MODAL) {
            Some(existing) => existing,
            None => doc.build(
                body,
                El::div()
                    .class(MODAL)
                    .child(El::new("span").class(CLOSE).text("×"))
                    .child(El::div().class(CONTENT).child(El::new("img"))),
            ),
        };

        let close = doc.first_with_class(root, CLOSE);
        let content = doc.first_with_class(root, CONTENT);
        let image = content.and_then(|c| doc.first_with_tag(c, "img"));
        match (close, content, image) {
            (Some(close), Some(content), Some(image)) => {
                self.bindings.bind(close, EventKind::Click, LightboxAction::Close);
                self.bindings.bind(root, EventKind::Click, LightboxAction::Backdrop);
                self.modal = Some(Modal { root, close, content, image });
            }
            _ => tracing::error!("Image modal markup is incomplete"),
        }
        root
    }

    /// Bind every post image under `container`; returns how many were bound
    pub fn attach(&mut self, doc: &Document, container: NodeId) -> usize {
        if self.modal.is_none() {
            return 0;
        }
        let images = doc.query_class(container, POST_IMAGE);
        for image in &images {
            self.bindings.bind(*image, EventKind::Click, LightboxAction::Open);
        }
        images.len()
    }

    /// Re-bind images in every view and in the overlay
    pub fn reattach_all(&mut self, doc: &Document) -> usize {
        let mut containers: Vec<NodeId> = [self.registry.home(doc), self.registry.feed(doc)]
            .into_iter()
            .flatten()
            .collect();
        containers.extend(self.registry.categories(doc));
        containers.extend(self.registry.overlay(doc));
        containers.into_iter().map(|c| self.attach(doc, c)).sum()
    }

    /// Whether the modal is shown
    pub fn is_shown(&self, doc: &Document) -> bool {
        self.modal.is_some_and(|m| doc.has_class(m.root, SHOW))
    }

    /// Currently displayed image source
    pub fn current_src<'a>(&self, doc: &'a Document) -> Option<&'a str> {
        self.modal.and_then(|m| doc.attr(m.image, "src"))
    }

    /// Show `image` enlarged
    pub fn show(&mut self, doc: &mut Document, image: NodeId) {
        let Some(modal) = self.modal else {
            return;
        };
        let src = doc.attr(image, "src").unwrap_or_default().to_string();
        doc.set_style(modal.root, "display", "flex");
        doc.set_attr(modal.image, "src", &src);
        let delay = self.step();
        self.timers.schedule(delay, LightboxStep::ShowModal);
    }

    /// Start the fade-out
    pub fn close(&mut self, doc: &mut Document) {
        let Some(modal) = self.modal else {
            return;
        };
        doc.remove_class(modal.content, SHOW);
        doc.remove_class(modal.close, SHOW);
        let delay = self.fade();
        self.timers.schedule(delay, LightboxStep::HideModal);
    }

    /// Handle a click; returns whether the lightbox consumed it
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> bool {
        let Some((node, action)) = self
            .bindings
            .resolve(doc, target, EventKind::Click)
            .map(|(node, action)| (node, *action))
        else {
            return false;
        };
        match action {
            LightboxAction::Open => self.show(doc, node),
            LightboxAction::Close => self.close(doc),
            // Only a click on the backdrop itself, not on the image it frames
            LightboxAction::Backdrop if node == target => self.close(doc),
            LightboxAction::Backdrop => return false,
        }
        true
    }

    /// Escape closes a shown modal
    pub fn handle_key(&mut self, doc: &mut Document, key: &str) -> bool {
        if key == "Escape" && self.is_shown(doc) {
            self.close(doc);
            return true;
        }
        false
    }

    /// Deadline of the next fade step
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Run the fade steps due now
    pub fn run_due(&mut self, doc: &mut Document) -> usize {
        let Some(modal) = self.modal else {
            return 0;
        };
        let (step_delay, fade_delay) = (self.step(), self.fade());
        let mut ran = 0;
        while let Some(step) = self.timers.pop_due() {
            match step {
                LightboxStep::ShowModal => {
                    doc.add_class(modal.root, SHOW);
                    self.timers.schedule(step_delay, LightboxStep::ShowContent);
                }
                LightboxStep::ShowContent => {
                    doc.add_class(modal.content, SHOW);
                    doc.add_class(modal.close, SHOW);
                }
                LightboxStep::HideModal => {
                    doc.remove_class(modal.root, SHOW);
                    self.timers.schedule(fade_delay, LightboxStep::Hide);
                }
                LightboxStep::Hide => doc.set_style(modal.root, "display", "none"),
            }
            ran += 1;
        }
        ran
    }

    fn step(&self) -> Duration {
        Duration::from_millis(self.timings.step_ms)
    }

    fn fade(&self) -> Duration {
        Duration::from_millis(self.timings.fade_ms)
    }
}

impl NavigationObserver for ImageLightbox {
    fn page_shown(&mut self, doc: &mut Document, _page: &ShownPage) {
        let bound = self.reattach_all(doc);
        tracing::trace!(images = bound, "Lightbox reattached");
    }

    fn content_projected(&mut self, doc: &mut Document, overlay: NodeId) {
        self.bindings.retain_attached(doc);
        self.attach(doc, overlay);
    }
}
