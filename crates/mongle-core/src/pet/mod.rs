mod decay;
mod shards;
mod status;
mod store;

pub use decay::{
    DecayPolicy, DEFAULT_DECAY_TICK, DEFAULT_DECAY_WINDOW, FAST_DECAY_TICK, FAST_DECAY_WINDOW,
};
pub use shards::{Emotion, EmotionShard, ShardField, SHARD_LIFETIME_SECS};
pub use status::{Gauge, GaugeKind, GaugeValues, PetStatus};
pub use store::{
    GaugeSnapshot, GaugeStore, LockChange, DEFAULT_GAUGE, GAUGE_MAX, GAUGE_MIN, LOCK_ENGAGE,
    LOCK_RELEASE,
};
