//! Scheduled transition phases
//!
//! Each variant is one continuation of a transition. Steps that end a
//! transition own its [`LockToken`].

use page_dom::{NodeId, Timers};
use std::time::Duration;

use crate::coordinator::NavTarget;
use crate::lock::LockToken;

/// A delayed phase of a navigation transition
#[derive(Debug)]
pub(crate) enum Step {
    /// Outgoing view finished its exit; push history and swap views
    CommitNavigation { target: NavTarget, token: LockToken, had_exit: bool },
    /// Play a view's entrant animation
    Entrant { view: NodeId, marker: &'static str },
    /// Reset a category grid and optionally open a deep-linked item
    LoadCategory { category: String, pending_item: Option<String> },
    /// Open a deep-linked item without pushing history
    OpenPendingItem { category: String, item: String },
    /// (Re)initialize the grids of a category
    SetupGrids { category: String },
    /// In-category back control finished the exit animation
    BackToFeed { page: NodeId, token: LockToken },
    /// Re-derive state from the URL, then release
    Reprocess { token: LockToken, release_after: Duration },
    /// Overlay became visible; mark it active
    OverlayActivate { token: LockToken },
    /// Overlay close transition finished
    OverlayClosed { update_history: bool, token: Option<LockToken> },
    /// End of a transition
    Release(LockToken),
}

/// Release `token` after `min_delay`, and never before the steps already queued
pub(crate) fn schedule_release(timers: &mut Timers<Step>, token: LockToken, min_delay: Duration) {
    let earliest = timers.clock().now() + min_delay;
    let at = timers.last_deadline().map_or(earliest, |last| last.max(earliest));
    timers.schedule_at(at, Step::Release(token));
}
