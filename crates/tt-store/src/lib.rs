#![deny(missing_docs)]

//! Persistence layer of the timetable engine: versioned request
//! fingerprints, schedule caches and the append-only run history.

pub mod blob;
pub mod cache;
pub mod directory;
pub mod fingerprint;
pub mod history;

pub use blob::{entry_from_bytes, entry_to_bytes, record_from_bytes, record_to_bytes};
pub use cache::{CacheEntry, MemoryCache, ScheduleCache};
pub use directory::DirectoryCache;
pub use fingerprint::{fingerprint, fingerprint_resolved, Fingerprint, FINGERPRINT_VERSION};
pub use history::{
    HistoryLog, HistoryRecord, JsonLinesHistory, MaterializedSchedule, MemoryHistory,
    NewHistoryRecord,
};
