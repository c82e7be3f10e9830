//! Core types for the pet API boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user gesture that mutates the server-side pet aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetAction {
    /// Open the window and air the room out.
    Ventilate,
    /// A completed petting/rubbing session.
    AffectionComplete,
    /// Pick up an emotion shard.
    CollectShard,
}

impl PetAction {
    /// API path for this action.
    pub fn endpoint(&self) -> &'static str {
        match self {
            PetAction::Ventilate => "/pet/ventilate",
            PetAction::AffectionComplete => "/pet/affection-complete",
            PetAction::CollectShard => "/pet/collect-shard",
        }
    }
}

impl std::fmt::Display for PetAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PetAction::Ventilate => write!(f, "ventilate"),
            PetAction::AffectionComplete => write!(f, "affection-complete"),
            PetAction::CollectShard => write!(f, "collect-shard"),
        }
    }
}

/// Autosave payload: raw gauge values plus the flush timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeSavePayload {
    pub user_id: String,
    pub affection: f64,
    pub air: f64,
    pub energy: f64,
    pub saved_at: DateTime<Utc>,
}

/// Pet API error types.
///
/// Staleness is a first-class variant so callers dispatch on the tag,
/// never on transport status codes.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The server rejected a write because its view of the aggregate has
    /// moved under the client.
    #[error("remote state is stale; resync required")]
    Conflict,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

impl RemoteError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, RemoteError::Conflict)
    }

    /// Anything that the next timer tick or gesture will implicitly retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::Network(_) | RemoteError::Status(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_endpoints() {
        assert_eq!(PetAction::Ventilate.endpoint(), "/pet/ventilate");
        assert_eq!(
            PetAction::AffectionComplete.endpoint(),
            "/pet/affection-complete"
        );
        assert_eq!(PetAction::CollectShard.endpoint(), "/pet/collect-shard");
    }

    #[test]
    fn save_payload_uses_camel_case_keys() {
        let payload = GaugeSavePayload {
            user_id: "u1".into(),
            affection: 40.0,
            air: 50.0,
            energy: 60.0,
            saved_at: Utc::now(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("savedAt").is_some());
        assert_eq!(json["affection"], 40.0);
    }

    #[test]
    fn conflict_is_not_transient() {
        assert!(RemoteError::Conflict.is_conflict());
        assert!(!RemoteError::Conflict.is_transient());
        assert!(RemoteError::Status(500).is_transient());
    }
}
