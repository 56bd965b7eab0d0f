//! Schema descriptors attached to persisted artefacts.

use serde::{Deserialize, Serialize};

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Returns true when payloads written under `other` can be read by `self`.
    pub fn reads(&self, other: &SchemaVersion) -> bool {
        self.major == other.major && self.minor >= other.minor
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        CURRENT_SCHEMA
    }
}

/// Schema version written by this release for cache entries and history records.
pub const CURRENT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);
