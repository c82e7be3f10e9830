//! TOML-based engine configuration.
//!
//! Stores the remote endpoint and the gauge cadence settings:
//! - Remote base URL, user id, request timeout
//! - Decay window and tick interval
//! - Autosave interval
//! - Fast-iteration mode (shortened decay for development builds)
//!
//! Configuration is stored at `~/.config/mongle/config.toml`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pet::DecayPolicy;

use super::data_dir;

/// Remote authority configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Gauge cadence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetConfig {
    #[serde(default = "default_decay_window_secs")]
    pub decay_window_secs: u64,
    #[serde(default = "default_decay_tick_secs")]
    pub decay_tick_secs: u64,
    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,
    /// Shortened decay cadence for development builds.
    #[serde(default)]
    pub fast_iteration: bool,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/mongle/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub pet: PetConfig,
}

// Default functions
fn default_base_url() -> String {
    "http://localhost:8000".into()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_decay_window_secs() -> u64 {
    2 * 60 * 60
}
fn default_decay_tick_secs() -> u64 {
    10
}
fn default_autosave_interval_secs() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            decay_window_secs: default_decay_window_secs(),
            decay_tick_secs: default_decay_tick_secs(),
            autosave_interval_secs: default_autosave_interval_secs(),
            fast_iteration: false,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            pet: PetConfig::default(),
        }
    }
}

impl EngineConfig {
    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from disk or write and return the default.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist. The new value
    /// is parsed against the existing value's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (parent, leaf),
            None => return Err(ConfigError::UnknownKey(key.to_string())),
        };

        let mut current = &mut json;
        for part in parent_path.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }
        let obj = current
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(leaf)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let parsed = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse().map_err(|_| {
                ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{value}' as bool"),
                }
            })?),
            serde_json::Value::Number(_) => {
                let n: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{value}' as number"),
                })?;
                serde_json::Value::Number(n.into())
            }
            _ => serde_json::Value::String(value.to_string()),
        };
        obj.insert(leaf.to_string(), parsed);

        *self =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        self.save()
    }

    // ── Derived settings ─────────────────────────────────────────────

    /// Decay cadence from config, honoring fast-iteration mode.
    pub fn decay_policy(&self) -> DecayPolicy {
        if self.pet.fast_iteration {
            DecayPolicy::fast()
        } else {
            DecayPolicy::new(
                Duration::from_secs(self.pet.decay_window_secs),
                Duration::from_secs(self.pet.decay_tick_secs),
            )
        }
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.pet.autosave_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.pet.decay_window_secs, 7200);
        assert_eq!(parsed.pet.autosave_interval_secs, 30);
        assert_eq!(parsed.remote.request_timeout_secs, 10);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: EngineConfig = toml::from_str("[remote]\nuser_id = \"u1\"\n").unwrap();
        assert_eq!(cfg.remote.user_id, "u1");
        assert_eq!(cfg.remote.base_url, "http://localhost:8000");
        assert_eq!(cfg.pet.decay_tick_secs, 10);
        assert!(!cfg.pet.fast_iteration);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = EngineConfig::default();
        assert_eq!(
            cfg.get("remote.base_url").as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(cfg.get("pet.decay_tick_secs").as_deref(), Some("10"));
        assert!(cfg.get("pet.missing_key").is_none());
    }

    #[test]
    fn decay_policy_follows_fast_iteration_flag() {
        let mut cfg = EngineConfig::default();
        assert_eq!(cfg.decay_policy(), DecayPolicy::default());
        cfg.pet.fast_iteration = true;
        assert_eq!(cfg.decay_policy(), DecayPolicy::fast());
    }

    #[test]
    fn degenerate_intervals_are_floored() {
        let mut cfg = EngineConfig::default();
        cfg.pet.autosave_interval_secs = 0;
        cfg.remote.request_timeout_secs = 0;
        assert_eq!(cfg.autosave_interval(), Duration::from_secs(1));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(1));
    }
}
