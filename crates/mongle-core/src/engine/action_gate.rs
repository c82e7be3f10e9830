//! Single-flight gate over authoritative writes.
//!
//! At most one state-mutating remote call may be outstanding at a time.
//! A second gesture arriving while one is pending is dropped, not queued:
//! the gestures are idempotent-ish and a lost duplicate is preferable to
//! two concurrent writes racing on the same server aggregate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Two-state (`Idle`/`Pending`) gate with guaranteed release.
#[derive(Debug, Clone, Default)]
pub struct ActionGate {
    pending: Arc<AtomicBool>,
}

impl ActionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to move from `Idle` to `Pending`.
    ///
    /// Returns a guard on success; the gate returns to `Idle` when the
    /// guard drops, on every exit path including panics. Returns `None`
    /// when a call is already pending.
    pub fn try_begin(&self) -> Option<PendingGuard> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PendingGuard {
                pending: Arc::clone(&self.pending),
            })
    }

    /// Whether a write is currently in flight. Consumed by the autosave
    /// pump to suppress its cycle.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// Scoped release token for [`ActionGate`].
#[derive(Debug)]
pub struct PendingGuard {
    pending: Arc<AtomicBool>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_while_pending() {
        let gate = ActionGate::new();
        let guard = gate.try_begin();
        assert!(guard.is_some());
        assert!(gate.is_pending());
        assert!(gate.try_begin().is_none());
        drop(guard);
        assert!(!gate.is_pending());
        assert!(gate.try_begin().is_some());
    }

    #[test]
    fn guard_releases_on_panic_path() {
        let gate = ActionGate::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = gate.try_begin().unwrap();
            panic!("mid-flight failure");
        }));
        assert!(result.is_err());
        assert!(!gate.is_pending());
    }

    #[test]
    fn clones_share_the_same_gate() {
        let gate = ActionGate::new();
        let alias = gate.clone();
        let _guard = gate.try_begin().unwrap();
        assert!(alias.is_pending());
        assert!(alias.try_begin().is_none());
    }
}
