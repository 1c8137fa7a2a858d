//! Navigation errors

/// Navigation-related errors
///
/// None of these are fatal: the operation that hit them is abandoned, the
/// navigation lock is released and the page stays navigable.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// A required element of the overlay skeleton is missing
    #[error("Overlay element not found: {0}")]
    MissingAnchor(&'static str),

    /// The item has nothing to project into the overlay
    #[error("Item has no projectable content: {0}")]
    MissingContent(String),

    /// History payload could not be encoded or decoded
    #[error("History state error: {0}")]
    HistoryState(#[from] serde_json::Error),

    /// Configuration could not be parsed
    #[error("Invalid navigation config: {0}")]
    Config(String),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;
