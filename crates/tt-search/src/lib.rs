#![deny(missing_docs)]
#![doc = "Conflict detection, branch-and-bound generation and top-K ranking of timetables."]

pub mod cancel;
pub mod conflict;
pub mod generator;
pub mod score;
pub mod search;
pub mod topk;

pub use cancel::CancelToken;
pub use conflict::{conflicts, slots_overlap, PreparedSection};
pub use generator::{Assignment, CandidateGenerator, Candidates, GenerationOrder};
pub use score::{
    sub_score_for, AvoidedDayMeetings, CreditTotal, DayCount, EarlyStarts, GapHours,
    InstructorMatches, Scorer, SubScore,
};
pub use search::{prepare, search, ProgressFn, SearchOptions, SearchOutcome, SearchProgress};
pub use topk::{Ranked, TopK};
