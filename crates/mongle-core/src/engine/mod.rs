//! Pet engine: gauge decay, action serialization, autosave, resync.
//!
//! [`PetEngine`] owns the gauge store and the two background timers and
//! exposes the imperative surface the UI layer drives:
//!
//! - `perform` / `collect_shard` -- user gestures, serialized through the
//!   single-flight [`ActionGate`] so at most one authoritative write is
//!   ever outstanding.
//! - `start` / `stop` -- lifecycle of the decay and autosave tasks. Both
//!   tasks are owned `JoinHandle`s, aborted on `stop` and on `Drop`;
//!   a leaked scheduler surviving a teardown would double the decay rate.
//! - `subscribe` -- broadcast stream of state-change events.
//!
//! Failure policy: nothing in here surfaces an error to the user. Remote
//! failures are logged and swallowed; the next timer tick or gesture
//! implicitly retries. The gauges are a soft game mechanic, not ledger
//! data.

mod action_gate;
mod conflict;


pub use action_gate::{ActionGate, PendingGuard};
pub use conflict::{ConflictResolver, ResyncState};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::CoreError;
use crate::events::Event;
use crate::pet::{
    DecayPolicy, Emotion, EmotionShard, GaugeSnapshot, GaugeStore, GaugeValues, LockChange,
    PetStatus, ShardField,
};
use crate::remote::{GaugeSavePayload, PetAction, PetClient, RemoteError};
use crate::storage::{EngineConfig, GaugeCache};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// The client-resident gauge synchronization engine.
pub struct PetEngine {
    inner: Arc<EngineInner>,
    decay_task: Option<JoinHandle<()>>,
    autosave_task: Option<JoinHandle<()>>,
}

struct EngineInner {
    store: Mutex<GaugeStore>,
    shards: Mutex<ShardField>,
    /// Best-effort mirror; `None` when the cache could not be opened.
    cache: Option<Mutex<GaugeCache>>,
    client: PetClient,
    gate: ActionGate,
    resolver: Mutex<ConflictResolver>,
    events: broadcast::Sender<Event>,
    user_id: String,
    decay: DecayPolicy,
    autosave_interval: Duration,
}

impl PetEngine {
    /// Build an engine from config, opening the default gauge cache.
    ///
    /// A cache that fails to open degrades to running without one; the
    /// cache is only a cold-start seed, never required for correctness.
    pub fn new(config: &EngineConfig) -> Result<Self, CoreError> {
        let cache = match GaugeCache::open() {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(error = %e, "gauge cache unavailable; running without cold-start seed");
                None
            }
        };
        Self::with_cache(config, cache)
    }

    /// Build an engine with an explicit cache (tests use a temp path).
    pub fn with_cache(config: &EngineConfig, cache: Option<GaugeCache>) -> Result<Self, CoreError> {
        let client = PetClient::new(&config.remote.base_url, config.request_timeout())
            .map_err(CoreError::Remote)?;

        let seeded = cache.as_ref().and_then(|c| match c.read() {
            Ok(values) => values,
            Err(e) => {
                debug!(error = %e, "cache read failed on cold start");
                None
            }
        });
        let store = seeded.map(GaugeStore::new).unwrap_or_default();

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            inner: Arc::new(EngineInner {
                store: Mutex::new(store),
                shards: Mutex::new(ShardField::new()),
                cache: cache.map(Mutex::new),
                client,
                gate: ActionGate::new(),
                resolver: Mutex::new(ConflictResolver::new()),
                events,
                user_id: config.remote.user_id.clone(),
                decay: config.decay_policy(),
                autosave_interval: config.autosave_interval(),
            }),
            decay_task: None,
            autosave_task: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current gauge values and lock flags.
    pub fn snapshot(&self) -> GaugeSnapshot {
        self.inner.store.lock().unwrap().snapshot()
    }

    /// Shards currently on screen.
    pub fn shards(&self) -> Vec<EmotionShard> {
        self.inner.shards.lock().unwrap().iter().cloned().collect()
    }

    pub fn is_action_pending(&self) -> bool {
        self.inner.gate.is_pending()
    }

    pub fn is_running(&self) -> bool {
        self.decay_task.is_some()
    }

    /// Subscribe to the engine's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the decay and autosave timers. Must be called from within a
    /// tokio runtime. Restarting cancels the previous tasks first, so two
    /// schedulers can never tick concurrently.
    pub fn start(&mut self) {
        self.stop();

        let inner = Arc::clone(&self.inner);
        let tick = inner.decay.tick();
        self.decay_task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + tick, tick);
            loop {
                ticker.tick().await;
                inner.decay_tick();
            }
        }));

        let inner = Arc::clone(&self.inner);
        let period = inner.autosave_interval;
        self.autosave_task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                inner.autosave_tick().await;
            }
        }));
    }

    /// Cancel both timers.
    pub fn stop(&mut self) {
        if let Some(task) = self.decay_task.take() {
            task.abort();
        }
        if let Some(task) = self.autosave_task.take() {
            task.abort();
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Fetch the authoritative aggregate and overwrite local state.
    ///
    /// This is the cold-start/read path and is not serialized through the
    /// gate; it issues no write.
    pub async fn refresh(&self) -> Result<PetStatus, CoreError> {
        let status = self.inner.client.fetch_status(&self.inner.user_id).await?;
        self.inner.apply_snapshot(&status);
        Ok(status)
    }

    /// Perform a user gesture against the remote authority.
    ///
    /// Returns the updated aggregate, or `None` when the gesture was
    /// dropped (another write in flight) or its failure was swallowed.
    pub async fn perform(&self, action: PetAction) -> Option<PetStatus> {
        let Some(_guard) = self.inner.gate.try_begin() else {
            debug!(%action, "gesture dropped; a write is already in flight");
            self.inner.emit(Event::ActionDropped {
                action,
                at: Utc::now(),
            });
            return None;
        };

        // A pending resync owns the next gesture: retry the fetch instead
        // of issuing the action against state known to be stale.
        if self.inner.resolver.lock().unwrap().is_resyncing() {
            return self.inner.resync().await;
        }

        match self.inner.client.perform(action, &self.inner.user_id).await {
            Ok(status) => {
                self.inner.apply_snapshot(&status);
                Some(status)
            }
            Err(RemoteError::Conflict) => {
                warn!(%action, "write rejected as stale; discarding local state and resyncing");
                self.inner.emit(Event::ConflictDetected {
                    action,
                    at: Utc::now(),
                });
                self.inner.resolver.lock().unwrap().mark_conflict();
                self.inner.resync().await
            }
            Err(e) => {
                warn!(%action, error = %e, "action failed; local state kept until next sync");
                None
            }
        }
    }

    /// Spawn an emotion shard on the pet view. Neutral emotions spawn
    /// nothing.
    pub fn spawn_shard(&self, emotion: Emotion) -> Option<EmotionShard> {
        let shard = self.inner.shards.lock().unwrap().spawn(emotion, Utc::now())?;
        self.inner.emit(Event::ShardSpawned {
            id: shard.id,
            emotion: shard.emotion,
            at: Utc::now(),
        });
        Some(shard)
    }

    /// Collect a shard: performs the gated remote action and removes the
    /// shard only once the server accepted it.
    pub async fn collect_shard(&self, id: Uuid) -> Option<PetStatus> {
        if self.inner.shards.lock().unwrap().get(id).is_none() {
            return None;
        }
        let status = self.perform(PetAction::CollectShard).await?;
        if self.inner.shards.lock().unwrap().take(id).is_some() {
            self.inner.emit(Event::ShardCollected {
                id,
                at: Utc::now(),
            });
        }
        Some(status)
    }
}

impl Drop for PetEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl EngineInner {
    fn emit(&self, event: Event) {
        // No subscribers is fine; the engine never waits on the UI.
        let _ = self.events.send(event);
    }

    fn emit_lock_changes(&self, changes: &[LockChange]) {
        for change in changes {
            let at = Utc::now();
            self.emit(if change.engaged {
                Event::LockEngaged {
                    gauge: change.kind,
                    at,
                }
            } else {
                Event::LockReleased {
                    gauge: change.kind,
                    at,
                }
            });
        }
    }

    /// Overwrite local state from a trusted response and mirror it.
    fn apply_snapshot(&self, status: &PetStatus) {
        let (values, changes) = {
            let mut store = self.store.lock().unwrap();
            let changes = store.apply_server_snapshot(status);
            (store.values(), changes)
        };
        self.mirror_cache(&values);
        self.emit(Event::SnapshotApplied {
            values,
            level: status.level,
            experience: status.experience,
            at: Utc::now(),
        });
        self.emit_lock_changes(&changes);
    }

    fn mirror_cache(&self, values: &GaugeValues) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.lock().unwrap().write(values) {
                debug!(error = %e, "gauge cache write failed");
            }
        }
    }

    /// One decay tick: erode every gauge, mirror, sweep expired shards.
    fn decay_tick(&self) {
        let delta = self.decay.per_tick_delta();
        let (values, changes) = {
            let mut store = self.store.lock().unwrap();
            let changes = store.decay_all(delta);
            (store.values(), changes)
        };
        self.mirror_cache(&values);
        self.emit(Event::GaugesDecayed {
            values,
            at: Utc::now(),
        });
        self.emit_lock_changes(&changes);

        let expired = self.shards.lock().unwrap().sweep_expired(Utc::now());
        for shard in expired {
            self.emit(Event::ShardExpired {
                id: shard.id,
                at: Utc::now(),
            });
        }
    }

    /// One autosave cycle. Skipped entirely while a write is in flight;
    /// a skipped or failed cycle is picked up by the next one.
    async fn autosave_tick(&self) {
        if self.gate.is_pending() {
            debug!("autosave skipped; a write is in flight");
            self.emit(Event::AutosaveSkipped { at: Utc::now() });
            return;
        }

        let values = self.store.lock().unwrap().values();
        let payload = GaugeSavePayload {
            user_id: self.user_id.clone(),
            affection: values.affection,
            air: values.air,
            energy: values.energy,
            saved_at: Utc::now(),
        };
        match self.client.save_gauges(&payload).await {
            Ok(()) => self.emit(Event::AutosaveFlushed {
                values,
                at: Utc::now(),
            }),
            Err(e) => debug!(error = %e, "autosave flush failed; next cycle retries"),
        }
    }

    /// Single authoritative re-fetch after a conflict. On failure the
    /// resolver state stays frozen and the next gesture retries.
    async fn resync(&self) -> Option<PetStatus> {
        match self.client.fetch_status(&self.user_id).await {
            Ok(status) => {
                self.apply_snapshot(&status);
                self.resolver.lock().unwrap().mark_resynced();
                self.emit(Event::ResyncCompleted { at: Utc::now() });
                Some(status)
            }
            Err(e) => {
                warn!(error = %e, "resync fetch failed; state frozen until next gesture");
                None
            }
        }
    }
}
