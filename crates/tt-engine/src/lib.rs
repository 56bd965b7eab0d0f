#![deny(missing_docs)]

//! Timetable generation engine.
//!
//! [`generate_schedules`] is the pure entry point. [`Engine`] wraps it with a
//! fingerprint-keyed cache, configurable parallelism and deadlines, result
//! materialization and an append-only run history.

pub mod config;
pub mod engine;
pub mod materialize;

pub use config::{load_config, EngineConfig, NamingConfig, NamingStyle};
pub use engine::{generate_schedules, search_schedules, Engine, RunReport};
pub use materialize::{Materializer, Naming};

pub use tt_core::{
    Catalog, ClockTime, CourseRequirement, Criterion, ErrorInfo, RankedResult, Schedule,
    ScoringPolicy, SearchStatus, Section, SelectionRequest, TimeSlot, TimetableError, Weekday,
};
pub use tt_search::{CancelToken, SearchOptions, SearchOutcome, SearchProgress};
pub use tt_store::{
    fingerprint, DirectoryCache, Fingerprint, HistoryLog, HistoryRecord, JsonLinesHistory,
    MaterializedSchedule, MemoryCache, MemoryHistory, ScheduleCache,
};
