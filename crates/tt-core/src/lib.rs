#![deny(missing_docs)]
#![doc = "Core data model, errors and canonical encoding helpers for the timetable engine."]

pub mod errors;
pub mod hash;
pub mod model;
pub mod policy;
pub mod provenance;
pub mod request;
pub mod schedule;
pub mod serde;
pub mod time;
pub mod validation;

pub use errors::{ErrorInfo, TimetableError};
pub use hash::{schedule_digest, stable_hash_string};
pub use model::{Catalog, CourseId, CourseRequirement, Section, SectionId, SectionKey};
pub use policy::{Criterion, ScoringPolicy};
pub use provenance::{SchemaVersion, CURRENT_SCHEMA};
pub use request::{
    CourseSummary, RequestSummary, ResolvedRequest, ResolvedRequirement, SelectionRequest,
    DEFAULT_LIMIT,
};
pub use schedule::{RankedResult, Schedule, ScheduleMetrics, SearchStatus};
pub use crate::serde::{from_json_slice, to_canonical_json_bytes, to_canonical_json_line};
pub use time::{ClockTime, TimeSlot, Weekday, MINUTES_PER_DAY};
pub use validation::{find_internal_overlap, validate_section};
