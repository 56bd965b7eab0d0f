//! Cache entries, the cache contract and the in-memory backend.

use std::collections::BTreeMap;

use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};
use tt_core::{RankedResult, SchemaVersion, TimetableError, CURRENT_SCHEMA};

use crate::fingerprint::Fingerprint;

/// Ranked results stored under the fingerprint of the request that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Schema the entry was written with.
    pub schema_version: SchemaVersion,
    /// Fingerprint of the producing request.
    pub fingerprint: Fingerprint,
    /// Ranked results, best first.
    pub results: Vec<RankedResult>,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(fingerprint: Fingerprint, results: Vec<RankedResult>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA,
            fingerprint,
            results,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Keyed store of previously computed result sets.
///
/// A malformed or mismatching entry is a miss, never an error: callers can
/// always recompute.
pub trait ScheduleCache {
    /// Looks up the entry for `fingerprint`.
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<CacheEntry>, TimetableError>;

    /// Stores `entry` under its own fingerprint, replacing any previous one.
    fn put(&mut self, entry: CacheEntry) -> Result<(), TimetableError>;

    /// Drops the entry for `fingerprint`; returns true when one existed.
    fn invalidate(&mut self, fingerprint: &Fingerprint) -> Result<bool, TimetableError>;

    /// Drops every entry.
    fn clear(&mut self) -> Result<(), TimetableError>;
}

/// Accepts `entry` only when it was written for `requested` under a readable schema.
pub(crate) fn accept_entry(requested: &Fingerprint, entry: CacheEntry) -> Option<CacheEntry> {
    if !CURRENT_SCHEMA.reads(&entry.schema_version) {
        warn!(
            "ignoring cache entry {requested}: unreadable schema {}.{}.{}",
            entry.schema_version.major, entry.schema_version.minor, entry.schema_version.patch
        );
        return None;
    }
    if &entry.fingerprint != requested {
        warn!(
            "ignoring cache entry {requested}: stored under fingerprint {}",
            entry.fingerprint
        );
        return None;
    }
    Some(entry)
}

/// Process-local cache backed by a sorted map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: BTreeMap<Fingerprint, CacheEntry>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores `entry` under an arbitrary key. Lets tests and importers plant
    /// entries whose embedded fingerprint does not match the key.
    pub fn insert_raw(&mut self, key: Fingerprint, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }
}

impl ScheduleCache for MemoryCache {
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<CacheEntry>, TimetableError> {
        Ok(self
            .entries
            .get(fingerprint)
            .cloned()
            .and_then(|entry| accept_entry(fingerprint, entry)))
    }

    fn put(&mut self, entry: CacheEntry) -> Result<(), TimetableError> {
        self.entries.insert(entry.fingerprint.clone(), entry);
        Ok(())
    }

    fn invalidate(&mut self, fingerprint: &Fingerprint) -> Result<bool, TimetableError> {
        Ok(self.entries.remove(fingerprint).is_some())
    }

    fn clear(&mut self) -> Result<(), TimetableError> {
        self.entries.clear();
        Ok(())
    }
}
