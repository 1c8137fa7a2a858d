//! Markup vocabulary
//!
//! Class names, ids and attributes the navigation layer reads from the site
//! markup. This is the only coupling between the scripts and the templates.

/// View containers
pub mod views {
    /// Home view container class
    pub const HOME: &str = "home-page";
    /// Feed view container class
    pub const FEED: &str = "feed-page";
    /// Class shared by every category container
    pub const CATEGORY: &str = "category-page";
    /// Suffix appended to a category id to form its container id
    pub const CATEGORY_ID_SUFFIX: &str = "-page";
    /// Title element inside a category container
    pub const CATEGORY_TITLE: &str = "category-title";
    /// Scrolling main column locked while the overlay is open
    pub const MAIN_CONTENT: &str = "main-content";
}

/// Animation markers
pub mod markers {
    /// Entrant marker on home and feed views
    pub const PAGE_ACTIVE: &str = "page-active";
    /// Entrant marker on category views
    pub const ACTIVE_ANIMATION: &str = "active-animation";
    /// Active menu entry / open overlay
    pub const ACTIVE: &str = "active";
    /// Legacy in-place expansion
    pub const EXPANDED: &str = "expanded";
    /// Mid-animation item
    pub const ANIMATING: &str = "animating";
}

/// Navigation controls
pub mod controls {
    /// Site logo linking home
    pub const HOME_LINK_ID: &str = "home-link";
    /// Main menu entry
    pub const NAV_ITEM: &str = "nav-item";
    /// Category tile in the feed
    pub const CATEGORY_ITEM: &str = "category-item";
    /// Back control inside a category
    pub const BACK_BUTTON: &str = "back-button";
    /// Logical page of a menu entry
    pub const DATA_PAGE: &str = "data-page";
    /// Category of a tile; also the key of an expandable item
    pub const DATA_CATEGORY: &str = "data-category";
    /// Menu page name for the home view
    pub const PAGE_HOME: &str = "home";
    /// Menu page name for the feed and every category
    pub const PAGE_FEED: &str = "feed";
}

/// Expandable grids
pub mod grid {
    /// Grid container
    pub const GRID: &str = "expandable-grid";
    /// Grid entry
    pub const ITEM: &str = "expandable-item";
    /// Clickable preview region
    pub const PREVIEW: &str = "item-preview";
    /// Preview image
    pub const IMAGE: &str = "item-image";
    /// Preview text block
    pub const DETAILS: &str = "item-details";
    /// Item title
    pub const TITLE: &str = "item-title";
    /// Detail payload projected into the overlay
    pub const EXPANDED_CONTENT: &str = "item-expanded-content";
    /// Fixed preview image height
    pub const PREVIEW_IMAGE_HEIGHT: &str = "120px";
}

/// Full-screen overlay
pub mod overlay {
    /// Overlay container id
    pub const CONTAINER_ID: &str = "fullscreen-page-container";
    /// Overlay container class
    pub const CONTAINER: &str = "fullscreen-page-container";
    /// Header row
    pub const HEADER: &str = "fullscreen-page-header";
    /// Back control
    pub const BACK: &str = "back-to-category-btn";
    /// Title element
    pub const TITLE: &str = "fullscreen-page-title";
    /// Content region
    pub const CONTENT: &str = "fullscreen-page-content";
    /// Back control label
    pub const BACK_LABEL: &str = "🠔 Back";
    /// Back control accessible name
    pub const BACK_ARIA_LABEL: &str = "Back to category";
    /// Placeholder title before the first projection
    pub const PLACEHOLDER_TITLE: &str = "Page title";
}
