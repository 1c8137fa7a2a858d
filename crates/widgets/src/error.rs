//! Widget error types

use page_dom::NodeId;
use thiserror::Error;

use crate::copy::ClipboardError;

/// Errors raised by the page widgets
#[derive(Debug, Error)]
pub enum WidgetError {
    /// A copy button outside a `.code-container` with `pre code`
    #[error("Copy button {0:?} has no code block")]
    MissingCode(NodeId),

    /// Clipboard write failed
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Preference storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] storage::KvError),
}

/// Result type for widget operations
pub type Result<T> = std::result::Result<T, WidgetError>;
