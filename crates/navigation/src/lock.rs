//! Navigation lock
//!
//! A single guard serializes every transition. Acquiring yields a
//! [`LockToken`] that the transition carries through its scheduled steps
//! and hands back when its last phase has run. Requests made while the lock
//! is held are dropped, never queued.

use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct LockState {
    holder: Option<u64>,
    next_generation: u64,
    acquisitions: u64,
}

/// Proof of holding the navigation lock
///
/// Not `Clone`: exactly one step of a transition can release it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a dropped token keeps the navigation lock held"]
pub struct LockToken {
    generation: u64,
}

/// Shared in-flight navigation guard
#[derive(Debug, Clone, Default)]
pub struct NavigationLock {
    state: Arc<Mutex<LockState>>,
}

impl NavigationLock {
    /// Create an unheld lock
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock unless a transition is in flight
    pub fn try_acquire(&self) -> Option<LockToken> {
        let mut state = self.state.lock();
        if state.holder.is_some() {
            return None;
        }
        let generation = state.next_generation;
        state.next_generation += 1;
        state.acquisitions += 1;
        state.holder = Some(generation);
        Some(LockToken { generation })
    }

    /// Release the lock; a token from an earlier generation is ignored
    pub fn release(&self, token: LockToken) -> bool {
        let mut state = self.state.lock();
        if state.holder == Some(token.generation) {
            state.holder = None;
            true
        } else {
            tracing::warn!(generation = token.generation, "Ignoring stale navigation lock token");
            false
        }
    }

    /// Whether a transition is in flight
    pub fn is_held(&self) -> bool {
        self.state.lock().holder.is_some()
    }

    /// Number of successful acquisitions so far
    pub fn acquisitions(&self) -> u64 {
        self.state.lock().acquisitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let lock = NavigationLock::new();
        let token = lock.try_acquire().unwrap();
        assert!(lock.is_held());
        assert!(lock.try_acquire().is_none());

        assert!(lock.release(token));
        assert!(!lock.is_held());
        assert!(lock.try_acquire().is_some());
        assert_eq!(lock.acquisitions(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let lock = NavigationLock::new();
        let other = lock.clone();
        let token = lock.try_acquire().unwrap();
        assert!(other.is_held());
        assert!(other.release(token));
        assert!(!lock.is_held());
    }

    #[test]
    fn test_token_from_other_lock_does_not_release() {
        let lock = NavigationLock::new();
        let foreign = NavigationLock::new();
        let _held = lock.try_acquire().unwrap();
        let foreign_first = foreign.try_acquire().unwrap();
        let foreign_second = {
            assert!(foreign.release(foreign_first));
            foreign.try_acquire().unwrap()
        };

        // generation 1 never existed on `lock`
        assert!(!lock.release(foreign_second));
        assert!(lock.is_held());
    }
}
