//! Conflict recovery state machine.
//!
//! When the server rejects a write as stale, the local optimistic state
//! is worthless: another device already moved the aggregate. Recovery is
//! a single authoritative re-fetch.
//!
//! ```text
//! Stable --(staleness rejection)--> Resyncing --(fetch ok)--> Stable
//! Resyncing --(fetch fails)--> Resyncing   (frozen; next gesture retries)
//! ```
//!
//! No backoff: resyncs are triggered by rare multi-writer races, not by
//! routine network flakiness.

/// Resolver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResyncState {
    #[default]
    Stable,
    Resyncing,
}

/// Tracks whether the engine owes the server a resync fetch.
#[derive(Debug, Clone, Default)]
pub struct ConflictResolver {
    state: ResyncState,
}

impl ConflictResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ResyncState {
        self.state
    }

    pub fn is_resyncing(&self) -> bool {
        self.state == ResyncState::Resyncing
    }

    /// A write was rejected as stale.
    pub fn mark_conflict(&mut self) {
        self.state = ResyncState::Resyncing;
    }

    /// An authoritative fetch succeeded and was applied.
    pub fn mark_resynced(&mut self) {
        self.state = ResyncState::Stable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stable() {
        let resolver = ConflictResolver::new();
        assert_eq!(resolver.state(), ResyncState::Stable);
        assert!(!resolver.is_resyncing());
    }

    #[test]
    fn conflict_then_resync_roundtrip() {
        let mut resolver = ConflictResolver::new();
        resolver.mark_conflict();
        assert!(resolver.is_resyncing());
        resolver.mark_resynced();
        assert!(!resolver.is_resyncing());
    }

    #[test]
    fn failed_fetch_leaves_state_frozen() {
        // A failed fetch performs no transition at all; the resolver
        // simply stays in Resyncing until some later fetch succeeds.
        let mut resolver = ConflictResolver::new();
        resolver.mark_conflict();
        resolver.mark_conflict();
        assert!(resolver.is_resyncing());
    }
}
