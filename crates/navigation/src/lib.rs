//! Hash-routed view navigation for the site
//!
//! This crate decides, from the URL fragment and user interaction, which
//! view is visible, animates the swaps between views, projects grid items
//! into the full-screen overlay and keeps session history consistent with
//! what is on screen.
//!
//! All transitions are serialized by a [`NavigationLock`]; their animation
//! phases are scheduled on a virtual-time queue the host drives.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod coordinator;
pub mod error;
pub mod grid;
pub mod history;
pub mod lock;
pub mod markup;
pub mod observer;
pub mod overlay;
pub mod registry;
pub mod router;
mod step;
pub mod test_utils;

pub use config::{NavigationConfig, Timings};
pub use coordinator::{NavAction, NavTarget, NavigationCoordinator, NavigationState, TransitionOutcome};
pub use error::{NavigationError, Result};
pub use grid::GridStateResetter;
pub use history::{HistoryEntry, HistoryState};
pub use lock::{LockToken, NavigationLock};
pub use observer::{NavigationObserver, ShownPage};
pub use overlay::{FullscreenPageController, OverlayPhase};
pub use registry::{ViewKey, ViewRegistry};
pub use router::{Page, ParsedRoute, Route, Router};
