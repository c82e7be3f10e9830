use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pet::{Emotion, GaugeKind, GaugeValues};
use crate::remote::PetAction;

/// Every externally observable state change in the engine produces an
/// Event on the broadcast channel. The UI layer subscribes to these;
/// the engine never waits for a receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// One decay tick was applied to all gauges.
    GaugesDecayed {
        values: GaugeValues,
        at: DateTime<Utc>,
    },
    /// A trusted server snapshot overwrote local values.
    SnapshotApplied {
        values: GaugeValues,
        level: u32,
        experience: u64,
        at: DateTime<Utc>,
    },
    /// A gauge hit its saturation ceiling.
    LockEngaged { gauge: GaugeKind, at: DateTime<Utc> },
    /// A gauge dropped back below the release threshold.
    LockReleased { gauge: GaugeKind, at: DateTime<Utc> },
    /// A gesture arrived while another write was in flight and was
    /// silently discarded.
    ActionDropped { action: PetAction, at: DateTime<Utc> },
    /// The server rejected a write as stale.
    ConflictDetected { action: PetAction, at: DateTime<Utc> },
    /// Authoritative state was re-fetched after a conflict.
    ResyncCompleted { at: DateTime<Utc> },
    /// Current gauge values were flushed to the remote store.
    AutosaveFlushed {
        values: GaugeValues,
        at: DateTime<Utc>,
    },
    /// An autosave cycle was skipped because a write was in flight.
    AutosaveSkipped { at: DateTime<Utc> },
    /// An emotion shard appeared on the pet view.
    ShardSpawned {
        id: Uuid,
        emotion: Emotion,
        at: DateTime<Utc>,
    },
    /// A shard despawned uncollected.
    ShardExpired { id: Uuid, at: DateTime<Utc> },
    /// A shard was collected and accepted by the server.
    ShardCollected { id: Uuid, at: DateTime<Utc> },
}
