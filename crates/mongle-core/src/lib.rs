//! # Mongle Core Library
//!
//! This library provides the client-side engine for the Mongle diary
//! companion: a virtual pet whose condition is expressed through three
//! decaying need-gauges (affection, air, energy). The server owns the pet
//! aggregate of record; this engine keeps a live local copy, decays it in
//! real time, and reconciles it against the remote authority.
//!
//! ## Architecture
//!
//! - **Gauge Store**: pure state machine over the three gauges with
//!   hysteresis-based lock flags
//! - **Pet Engine**: owns the decay and autosave timers, serializes user
//!   gestures through a single-flight gate, and recovers from staleness
//!   conflicts by re-fetching authoritative state
//! - **Storage**: SQLite gauge cache for cold-start seeding and
//!   TOML-based configuration
//! - **Remote**: narrow REST client for the pet status API
//!
//! ## Key Components
//!
//! - [`PetEngine`]: engine lifecycle and gesture entry points
//! - [`GaugeStore`]: gauge values and lock flags
//! - [`PetClient`]: remote authority boundary
//! - [`EngineConfig`]: application configuration management

pub mod engine;
pub mod error;
pub mod events;
pub mod pet;
pub mod remote;
pub mod storage;

pub use engine::{ActionGate, ConflictResolver, PetEngine, ResyncState};
pub use error::{CacheError, ConfigError, CoreError};
pub use events::Event;
pub use pet::{
    DecayPolicy, Emotion, EmotionShard, Gauge, GaugeKind, GaugeSnapshot, GaugeStore, GaugeValues,
    PetStatus, ShardField,
};
pub use remote::{GaugeSavePayload, PetAction, PetClient, RemoteError};
pub use storage::{EngineConfig, GaugeCache};
