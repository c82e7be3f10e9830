//! Gauge store implementation.
//!
//! The store is a pure state machine over the three need-gauges. It holds
//! current values and the derived lock flags, and never fails -- values
//! driven outside the valid range are clamped, not rejected.
//!
//! ## Lock hysteresis
//!
//! ```text
//! locked(n) = true   if value >= 100
//!             false  if value <= 30
//!             locked(n-1) otherwise
//! ```
//!
//! The dead band between the two thresholds keeps a gauge from flapping
//! in and out of the locked display state around a single boundary.

use serde::{Deserialize, Serialize};

use super::status::{Gauge, GaugeKind, GaugeValues, PetStatus};

pub const GAUGE_MIN: f64 = 0.0;
pub const GAUGE_MAX: f64 = 100.0;
pub const LOCK_ENGAGE: f64 = 100.0;
pub const LOCK_RELEASE: f64 = 30.0;
/// Seed value used when no cached state exists on cold start.
pub const DEFAULT_GAUGE: f64 = 50.0;

/// A lock flag transition produced by a store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockChange {
    pub kind: GaugeKind,
    pub engaged: bool,
}

/// Holds current gauge values and computes lock flags.
///
/// The store is the sole mutable owner of gauge state within the process.
/// It is mutated by decay ticks, user-action snapshots, and resync
/// snapshots; a server snapshot always overwrites local values
/// unconditionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeStore {
    affection: Gauge,
    air: Gauge,
    energy: Gauge,
}

impl Default for GaugeStore {
    fn default() -> Self {
        Self::new(GaugeValues {
            affection: DEFAULT_GAUGE,
            air: DEFAULT_GAUGE,
            energy: DEFAULT_GAUGE,
        })
    }
}

impl GaugeStore {
    /// Create a store seeded with the given values (clamped).
    pub fn new(values: GaugeValues) -> Self {
        let seed = |v: f64| {
            let value = v.clamp(GAUGE_MIN, GAUGE_MAX);
            Gauge {
                value,
                locked: value >= LOCK_ENGAGE,
            }
        };
        Self {
            affection: seed(values.affection),
            air: seed(values.air),
            energy: seed(values.energy),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get(&self, kind: GaugeKind) -> Gauge {
        *self.gauge(kind)
    }

    pub fn values(&self) -> GaugeValues {
        GaugeValues {
            affection: self.affection.value,
            air: self.air.value,
            energy: self.energy.value,
        }
    }

    /// Values plus lock flags, for the UI layer.
    pub fn snapshot(&self) -> GaugeSnapshot {
        GaugeSnapshot {
            affection: self.affection,
            air: self.air,
            energy: self.energy,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply a delta to one gauge, clamping to `[0, 100]`.
    ///
    /// Returns the lock transition, if the mutation caused one.
    pub fn apply_delta(&mut self, kind: GaugeKind, delta: f64) -> Option<LockChange> {
        let gauge = self.gauge_mut(kind);
        gauge.value = (gauge.value + delta).clamp(GAUGE_MIN, GAUGE_MAX);
        Self::recompute_lock(gauge).map(|engaged| LockChange { kind, engaged })
    }

    /// Apply one decay delta to every gauge.
    pub fn decay_all(&mut self, delta: f64) -> Vec<LockChange> {
        GaugeKind::ALL
            .iter()
            .filter_map(|&kind| self.apply_delta(kind, delta))
            .collect()
    }

    /// Unconditionally overwrite all three values from a trusted server
    /// response. The snapshot always wins over any local value, including
    /// values changed since the request was issued.
    pub fn apply_server_snapshot(&mut self, status: &PetStatus) -> Vec<LockChange> {
        let values = status.values();
        GaugeKind::ALL
            .iter()
            .filter_map(|&kind| {
                let gauge = self.gauge_mut(kind);
                gauge.value = values.get(kind).clamp(GAUGE_MIN, GAUGE_MAX);
                Self::recompute_lock(gauge).map(|engaged| LockChange { kind, engaged })
            })
            .collect()
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Hysteresis rule. Returns the new flag state when it changed.
    fn recompute_lock(gauge: &mut Gauge) -> Option<bool> {
        let next = if gauge.value >= LOCK_ENGAGE {
            true
        } else if gauge.value <= LOCK_RELEASE {
            false
        } else {
            gauge.locked
        };
        if next != gauge.locked {
            gauge.locked = next;
            Some(next)
        } else {
            None
        }
    }

    fn gauge(&self, kind: GaugeKind) -> &Gauge {
        match kind {
            GaugeKind::Affection => &self.affection,
            GaugeKind::Air => &self.air,
            GaugeKind::Energy => &self.energy,
        }
    }

    fn gauge_mut(&mut self, kind: GaugeKind) -> &mut Gauge {
        match kind {
            GaugeKind::Affection => &mut self.affection,
            GaugeKind::Air => &mut self.air,
            GaugeKind::Energy => &mut self.energy,
        }
    }
}

/// Values and lock flags of all three gauges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeSnapshot {
    pub affection: Gauge,
    pub air: Gauge,
    pub energy: Gauge,
}

impl GaugeSnapshot {
    pub fn get(&self, kind: GaugeKind) -> Gauge {
        match kind {
            GaugeKind::Affection => self.affection,
            GaugeKind::Air => self.air,
            GaugeKind::Energy => self.energy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store_at(value: f64) -> GaugeStore {
        GaugeStore::new(GaugeValues {
            affection: value,
            air: value,
            energy: value,
        })
    }

    #[test]
    fn deltas_clamp_at_both_ends() {
        let mut store = store_at(50.0);
        store.apply_delta(GaugeKind::Air, 500.0);
        assert_eq!(store.get(GaugeKind::Air).value, 100.0);
        store.apply_delta(GaugeKind::Air, -500.0);
        assert_eq!(store.get(GaugeKind::Air).value, 0.0);
    }

    #[test]
    fn lock_engages_only_at_ceiling() {
        let mut store = store_at(50.0);
        store.apply_delta(GaugeKind::Affection, 49.0);
        assert!(!store.get(GaugeKind::Affection).locked);
        let changes = store.apply_delta(GaugeKind::Affection, 1.0);
        assert!(store.get(GaugeKind::Affection).locked);
        assert_eq!(
            changes,
            Some(LockChange {
                kind: GaugeKind::Affection,
                engaged: true
            })
        );
    }

    #[test]
    fn lock_holds_inside_hysteresis_band() {
        // Engage at 100, then drop into the 30..100 band: flag must hold.
        let mut store = store_at(100.0);
        assert!(store.get(GaugeKind::Energy).locked);
        store.apply_delta(GaugeKind::Energy, -7.0);
        assert_eq!(store.get(GaugeKind::Energy).value, 93.0);
        assert!(store.get(GaugeKind::Energy).locked);
        store.apply_delta(GaugeKind::Energy, -62.0);
        assert_eq!(store.get(GaugeKind::Energy).value, 31.0);
        assert!(store.get(GaugeKind::Energy).locked);
    }

    #[test]
    fn lock_releases_at_floor_threshold() {
        let mut store = store_at(100.0);
        let changes = store.apply_delta(GaugeKind::Energy, -70.0);
        assert_eq!(store.get(GaugeKind::Energy).value, 30.0);
        assert!(!store.get(GaugeKind::Energy).locked);
        assert_eq!(
            changes,
            Some(LockChange {
                kind: GaugeKind::Energy,
                engaged: false
            })
        );
    }

    #[test]
    fn unlocked_stays_unlocked_below_ceiling() {
        // Once released, climbing back inside the band must not re-engage.
        let mut store = store_at(29.0);
        assert!(!store.get(GaugeKind::Air).locked);
        store.apply_delta(GaugeKind::Air, 70.0);
        assert_eq!(store.get(GaugeKind::Air).value, 99.0);
        assert!(!store.get(GaugeKind::Air).locked);
        store.apply_delta(GaugeKind::Air, 1.0);
        assert!(store.get(GaugeKind::Air).locked);
    }

    #[test]
    fn decay_applies_to_all_gauges() {
        let mut store = store_at(50.0);
        store.decay_all(-2.5);
        let values = store.values();
        assert_eq!(values.affection, 47.5);
        assert_eq!(values.air, 47.5);
        assert_eq!(values.energy, 47.5);
    }

    #[test]
    fn server_snapshot_overwrites_unconditionally() {
        let mut store = store_at(50.0);
        // Local decay happened while a request was in flight.
        store.decay_all(-10.0);
        let status = PetStatus {
            affection: 95.0,
            air: 12.0,
            energy: 64.0,
            level: 2,
            experience: 40,
        };
        store.apply_server_snapshot(&status);
        let values = store.values();
        assert_eq!(values.affection, 95.0);
        assert_eq!(values.air, 12.0);
        assert_eq!(values.energy, 64.0);
    }

    #[test]
    fn snapshot_recomputes_locks() {
        let mut store = store_at(50.0);
        let changes = store.apply_server_snapshot(&PetStatus {
            affection: 100.0,
            air: 20.0,
            energy: 50.0,
            level: 0,
            experience: 0,
        });
        assert!(store.get(GaugeKind::Affection).locked);
        assert!(!store.get(GaugeKind::Air).locked);
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn seeding_clamps_out_of_range_values() {
        let store = GaugeStore::new(GaugeValues {
            affection: 180.0,
            air: -4.0,
            energy: 50.0,
        });
        assert_eq!(store.get(GaugeKind::Affection).value, 100.0);
        assert!(store.get(GaugeKind::Affection).locked);
        assert_eq!(store.get(GaugeKind::Air).value, 0.0);
    }

    proptest! {
        #[test]
        fn clamp_invariant_holds_for_any_delta_sequence(
            deltas in proptest::collection::vec(-250.0f64..250.0, 0..64)
        ) {
            let mut store = GaugeStore::default();
            for delta in deltas {
                store.apply_delta(GaugeKind::Affection, delta);
                let value = store.get(GaugeKind::Affection).value;
                prop_assert!((GAUGE_MIN..=GAUGE_MAX).contains(&value));
            }
        }

        #[test]
        fn lock_flag_consistent_with_thresholds(
            deltas in proptest::collection::vec(-150.0f64..150.0, 0..64)
        ) {
            let mut store = GaugeStore::default();
            for delta in deltas {
                store.decay_all(delta);
                let gauge = store.get(GaugeKind::Energy);
                if gauge.value >= LOCK_ENGAGE {
                    prop_assert!(gauge.locked);
                }
                if gauge.value <= LOCK_RELEASE {
                    prop_assert!(!gauge.locked);
                }
            }
        }
    }
}
