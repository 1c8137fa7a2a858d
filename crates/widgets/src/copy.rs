//! Copy-to-clipboard buttons for code blocks
//!
//! A `.copy-btn` copies the `pre code` text of its `.code-container`. While
//! the feedback delay runs the button shows the copied label.
//!
//! [`CodeCopyButtons`] is a cheap handle over shared state: the host keeps
//! one clone for click dispatch and subscribes another to the navigation
//! coordinator so projected overlay content gets its buttons bound.

use async_trait::async_trait;
use navigation::NavigationObserver;
use page_dom::{Bindings, Clock, Document, EventKind, NodeId, Timers};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::error::{Result, WidgetError};

/// Copy control class
pub const COPY_BUTTON: &str = "copy-btn";
/// Wrapper of a code block and its copy control
pub const CODE_CONTAINER: &str = "code-container";
/// Label shown after a successful copy
pub const DEFAULT_COPIED_LABEL: &str = "Скопировано!";
/// How long the copied label stays
pub const DEFAULT_FEEDBACK: Duration = Duration::from_millis(2000);

/// Clipboard failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// No clipboard in this environment
    #[error("Clipboard unavailable")]
    Unavailable,

    /// The platform refused the write
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
}

/// System clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`
    async fn write_text(&self, text: &str) -> std::result::Result<(), ClipboardError>;
}

/// Process-local clipboard
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written text
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> std::result::Result<(), ClipboardError> {
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

struct CopyState {
    bindings: Bindings<()>,
    timers: Timers<NodeId>,
    saved_labels: HashMap<NodeId, String>,
}

/// Handle over every copy button on the page
#[derive(Clone)]
pub struct CodeCopyButtons {
    clipboard: Arc<dyn Clipboard>,
    copied_label: String,
    feedback: Duration,
    state: Arc<Mutex<CopyState>>,
}

impl std::fmt::Debug for CodeCopyButtons {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CodeCopyButtons")
            .field("copied_label", &self.copied_label)
            .field("buttons", &state.bindings.len())
            .field("pending", &state.timers.len())
            .finish()
    }
}

impl CodeCopyButtons {
    /// Buttons writing to `clipboard`, restoring labels on `clock`
    pub fn new(clipboard: Arc<dyn Clipboard>, clock: Clock) -> Self {
        Self {
            clipboard,
            copied_label: DEFAULT_COPIED_LABEL.to_string(),
            feedback: DEFAULT_FEEDBACK,
            state: Arc::new(Mutex::new(CopyState {
                bindings: Bindings::new(),
                timers: Timers::new(clock),
                saved_labels: HashMap::new(),
            })),
        }
    }

    /// Set the label shown after copying
    pub fn copied_label(mut self, label: impl Into<String>) -> Self {
        self.copied_label = label.into();
        self
    }

    /// Set how long the label stays
    pub fn feedback(mut self, feedback: Duration) -> Self {
        self.feedback = feedback;
        self
    }

    /// Bind every copy button under `root`
    pub fn attach(&self, doc: &Document, root: NodeId) -> usize {
        let buttons = doc.query_class(root, COPY_BUTTON);
        let mut state = self.state.lock();
        for button in &buttons {
            state.bindings.bind(*button, EventKind::Click, ());
        }
        buttons.len()
    }

    /// Text of the code block a button copies
    pub fn code_for(doc: &Document, button: NodeId) -> Result<String> {
        doc.closest(button, CODE_CONTAINER)
            .and_then(|container| doc.first_with_tag(container, "pre"))
            .and_then(|pre| doc.first_with_tag(pre, "code"))
            .map(|code| doc.text_content(code))
            .ok_or(WidgetError::MissingCode(button))
    }

    /// Handle a click; `Ok(false)` when no copy button was hit
    pub async fn handle_click(&self, doc: &mut Document, target: NodeId) -> Result<bool> {
        let button = self
            .state
            .lock()
            .bindings
            .resolve(doc, target, EventKind::Click)
            .map(|(node, _)| node);
        let Some(button) = button else {
            return Ok(false);
        };
        self.copy(doc, button).await?;
        Ok(true)
    }

    /// Copy the code of `button` and show the feedback label
    pub async fn copy(&self, doc: &mut Document, button: NodeId) -> Result<()> {
        let text = Self::code_for(doc, button).inspect_err(|e| tracing::error!("Copy failed: {}", e))?;

        if let Err(e) = self.clipboard.write_text(&text).await {
            tracing::error!("Copy failed: {}", e);
            return Err(e.into());
        }

        let mut state = self.state.lock();
        state
            .saved_labels
            .entry(button)
            .or_insert_with(|| doc.text_content(button));
        doc.set_text(button, &self.copied_label);
        state.timers.schedule(self.feedback, button);
        tracing::debug!(chars = text.chars().count(), "Copied code block");
        Ok(())
    }

    /// Deadline of the next label restore
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.lock().timers.next_deadline()
    }

    /// Restore labels whose feedback delay has elapsed
    pub fn run_due(&self, doc: &mut Document) -> usize {
        let mut state = self.state.lock();
        let mut ran = 0;
        while let Some(button) = state.timers.pop_due() {
            if let Some(label) = state.saved_labels.remove(&button) {
                doc.set_text(button, &label);
            }
            ran += 1;
        }
        ran
    }
}

impl NavigationObserver for CodeCopyButtons {
    fn content_projected(&mut self, doc: &mut Document, overlay: NodeId) {
        self.state.lock().bindings.retain_attached(doc);
        self.attach(doc, overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use mockall::predicate::eq;
    use navigation::test_utils::site_document;

    mock! {
        Clip {}
        #[async_trait]
        impl Clipboard for Clip {
            async fn write_text(&self, text: &str) -> std::result::Result<(), ClipboardError>;
        }
    }

    fn home_button(doc: &Document) -> NodeId {
        let home = doc.first_with_class(doc.body(), "home-page").unwrap();
        doc.first_with_class(home, COPY_BUTTON).unwrap()
    }

    #[tokio::test]
    async fn test_copy_shows_and_restores_label() {
        let clock = Clock::new();
        let clipboard = Arc::new(MemoryClipboard::new());
        let buttons = CodeCopyButtons::new(clipboard.clone(), clock.clone());
        let mut doc = site_document();
        let body = doc.body();
        assert_eq!(buttons.attach(&doc, body), 4);

        let button = home_button(&doc);
        assert!(buttons.handle_click(&mut doc, button).await.unwrap());
        assert_eq!(clipboard.contents().as_deref(), Some("cargo run"));
        assert_eq!(doc.text_content(button), DEFAULT_COPIED_LABEL);

        // A second click during feedback keeps the original label
        buttons.handle_click(&mut doc, button).await.unwrap();

        clock.advance_to(Duration::from_millis(1999));
        assert_eq!(buttons.run_due(&mut doc), 0);
        clock.advance_to(Duration::from_millis(2000));
        buttons.run_due(&mut doc);
        assert_eq!(doc.text_content(button), "Copy");
    }

    #[tokio::test]
    async fn test_clipboard_failure_keeps_label() {
        let mut clip = MockClip::new();
        clip.expect_write_text()
            .with(eq("cargo run"))
            .times(1)
            .returning(|_| Err(ClipboardError::Rejected("denied".to_string())));

        let buttons = CodeCopyButtons::new(Arc::new(clip), Clock::new()).copied_label("Copied!");
        let mut doc = site_document();
        let body = doc.body();
        buttons.attach(&doc, body);

        let button = home_button(&doc);
        let err = buttons.handle_click(&mut doc, button).await.unwrap_err();
        assert!(matches!(err, WidgetError::Clipboard(ClipboardError::Rejected(_))));
        assert_eq!(doc.text_content(button), "Copy");
        assert_eq!(buttons.next_deadline(), None);
    }

    #[tokio::test]
    async fn test_unbound_click_is_not_consumed() {
        let mut clip = MockClip::new();
        clip.expect_write_text().times(0);
        let buttons = CodeCopyButtons::new(Arc::new(clip), Clock::new());
        let mut doc = site_document();

        let button = home_button(&doc);
        assert!(!buttons.handle_click(&mut doc, button).await.unwrap());
    }

    #[test]
    fn test_button_outside_container() {
        let mut doc = Document::new();
        let body = doc.body();
        let stray = doc.build(body, page_dom::El::new("button").class(COPY_BUTTON));
        assert!(matches!(
            CodeCopyButtons::code_for(&doc, stray),
            Err(WidgetError::MissingCode(_))
        ));
    }
}
