//! SQLite-backed gauge cache.
//!
//! A write-through mirror of the three gauge values so they survive a
//! restart before the first server fetch completes. The cache is seeded
//! from on cold start and rewritten on every gauge mutation; it is never
//! consulted for conflict resolution and never authoritative once a
//! server response has arrived in the session.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::error::CacheError;
use crate::pet::{GaugeKind, GaugeValues};

use super::data_dir;

/// Key-value mirror of raw gauge values.
///
/// Values are stored as decimal strings, one row per gauge.
pub struct GaugeCache {
    conn: Connection,
}

impl GaugeCache {
    /// Open the cache at `~/.config/mongle/mongle.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, CacheError> {
        let path = data_dir()
            .map(|dir| dir.join("mongle.db"))
            .unwrap_or_else(|_| PathBuf::from("mongle.db"));
        Self::open_at(&path)
    }

    /// Open the cache at a specific path (tests use a temp directory).
    pub fn open_at(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(|source| CacheError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let cache = Self { conn };
        cache.migrate()?;
        Ok(cache)
    }

    fn migrate(&self) -> Result<(), CacheError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS gauge_cache (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Rewrite all three gauge rows.
    pub fn write(&self, values: &GaugeValues) -> Result<(), CacheError> {
        for kind in GaugeKind::ALL {
            self.conn.execute(
                "INSERT INTO gauge_cache (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![kind.as_str(), values.get(kind).to_string()],
            )?;
        }
        Ok(())
    }

    /// Read the cached values, if a complete and parsable set exists.
    pub fn read(&self) -> Result<Option<GaugeValues>, CacheError> {
        let read_one = |kind: GaugeKind| -> Result<Option<f64>, CacheError> {
            let value: Option<String> = self
                .conn
                .query_row(
                    "SELECT value FROM gauge_cache WHERE key = ?1",
                    params![kind.as_str()],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(CacheError::from(other)),
                })?;
            Ok(value.and_then(|s| s.parse::<f64>().ok()))
        };

        let affection = read_one(GaugeKind::Affection)?;
        let air = read_one(GaugeKind::Air)?;
        let energy = read_one(GaugeKind::Energy)?;

        match (affection, air, energy) {
            (Some(affection), Some(air), Some(energy)) => Ok(Some(GaugeValues {
                affection,
                air,
                energy,
            })),
            _ => Ok(None),
        }
    }

    /// Drop all cached rows.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.conn.execute("DELETE FROM gauge_cache", [])?;
        Ok(())
    }
}
