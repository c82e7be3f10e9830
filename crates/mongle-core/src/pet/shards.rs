//! Emotion shards.
//!
//! After a diary entry is analyzed, a shard carrying the detected emotion
//! appears at a random spot on the pet view. Shards despawn on their own
//! after a short lifetime; collecting one triggers the collect-shard
//! action against the remote authority.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a shard stays collectible before despawning.
pub const SHARD_LIFETIME_SECS: i64 = 10;

/// Emotion detected for a diary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Neutral,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collectible shard floating on the pet view.
///
/// `x` and `y` are percentages of the view, chosen so shards land in the
/// central region around the pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionShard {
    pub id: Uuid,
    pub emotion: Emotion,
    pub x: f64,
    pub y: f64,
    pub spawned_at: DateTime<Utc>,
}

/// The set of shards currently on screen.
#[derive(Debug, Default)]
pub struct ShardField {
    shards: Vec<EmotionShard>,
}

impl ShardField {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmotionShard> {
        self.shards.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&EmotionShard> {
        self.shards.iter().find(|s| s.id == id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Spawn a shard for a detected emotion. Neutral entries never
    /// produce a shard.
    pub fn spawn(&mut self, emotion: Emotion, now: DateTime<Utc>) -> Option<EmotionShard> {
        if emotion == Emotion::Neutral {
            return None;
        }
        let mut rng = rand::thread_rng();
        let shard = EmotionShard {
            id: Uuid::new_v4(),
            emotion,
            x: rng.gen_range(20.0..80.0),
            y: rng.gen_range(30.0..70.0),
            spawned_at: now,
        };
        self.shards.push(shard.clone());
        Some(shard)
    }

    /// Remove and return shards older than the lifetime.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> Vec<EmotionShard> {
        let cutoff = now - Duration::seconds(SHARD_LIFETIME_SECS);
        let (expired, alive): (Vec<_>, Vec<_>) = self
            .shards
            .drain(..)
            .partition(|s| s.spawned_at <= cutoff);
        self.shards = alive;
        expired
    }

    /// Remove and return a shard for collection.
    pub fn take(&mut self, id: Uuid) -> Option<EmotionShard> {
        let index = self.shards.iter().position(|s| s.id == id)?;
        Some(self.shards.remove(index))
    }
}
