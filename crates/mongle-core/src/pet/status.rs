//! Pet status aggregate and gauge identifiers.

use serde::{Deserialize, Serialize};

/// One of the three decaying need-gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeKind {
    Affection,
    Air,
    Energy,
}

impl GaugeKind {
    pub const ALL: [GaugeKind; 3] = [GaugeKind::Affection, GaugeKind::Air, GaugeKind::Energy];

    /// Stable name, also used as the cache key.
    pub fn as_str(&self) -> &'static str {
        match self {
            GaugeKind::Affection => "affection",
            GaugeKind::Air => "air",
            GaugeKind::Energy => "energy",
        }
    }
}

impl std::fmt::Display for GaugeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single gauge: current value plus the derived lock flag.
///
/// `locked` is never set directly; it is recomputed from `value` by the
/// store's hysteresis rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub value: f64,
    pub locked: bool,
}

/// Raw values of all three gauges, without lock flags.
///
/// This is the shape mirrored to the local cache and flushed by autosave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeValues {
    pub affection: f64,
    pub air: f64,
    pub energy: f64,
}

impl GaugeValues {
    pub fn get(&self, kind: GaugeKind) -> f64 {
        match kind {
            GaugeKind::Affection => self.affection,
            GaugeKind::Air => self.air,
            GaugeKind::Energy => self.energy,
        }
    }
}

/// Server-authoritative pet aggregate.
///
/// Every action and fetch call returns one of these as an atomic snapshot.
/// `level` and `experience` are opaque to the engine: stored and re-served,
/// never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetStatus {
    pub affection: f64,
    pub air: f64,
    pub energy: f64,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub experience: u64,
}

impl PetStatus {
    pub fn values(&self) -> GaugeValues {
        GaugeValues {
            affection: self.affection,
            air: self.air,
            energy: self.energy,
        }
    }
}
