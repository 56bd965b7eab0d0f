//! Scoring policy configuration.
//!
//! The policy is plain data: an ordered list of weighted criteria drawn from a
//! fixed set. The matching sub-score functions live in `tt-search`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TimetableError};
use crate::time::{ClockTime, Weekday};

/// One recognised scoring criterion together with its weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Criterion {
    /// Penalises idle time between same-day meetings (per hour).
    MinimizeGaps {
        /// Linear weight.
        weight: f64,
    },
    /// Rewards total credit weight.
    MaximizeCredit {
        /// Linear weight.
        weight: f64,
    },
    /// Rewards sections taught by one of the listed instructors.
    PreferredInstructors {
        /// Linear weight.
        weight: f64,
        /// Instructor labels, compared exactly.
        instructors: BTreeSet<String>,
    },
    /// Penalises every meeting held on one of the listed days.
    AvoidDays {
        /// Linear weight.
        weight: f64,
        /// Days to keep free.
        days: BTreeSet<Weekday>,
    },
    /// Penalises every distinct day with at least one meeting.
    CompactDays {
        /// Linear weight.
        weight: f64,
    },
    /// Penalises meetings starting before a given time.
    AvoidEarlyStarts {
        /// Linear weight.
        weight: f64,
        /// Earliest acceptable start.
        before: ClockTime,
    },
}

impl Criterion {
    /// Stable snake_case name of the criterion.
    pub fn name(&self) -> &'static str {
        match self {
            Criterion::MinimizeGaps { .. } => "minimize_gaps",
            Criterion::MaximizeCredit { .. } => "maximize_credit",
            Criterion::PreferredInstructors { .. } => "preferred_instructors",
            Criterion::AvoidDays { .. } => "avoid_days",
            Criterion::CompactDays { .. } => "compact_days",
            Criterion::AvoidEarlyStarts { .. } => "avoid_early_starts",
        }
    }

    /// Linear weight applied to the criterion's sub-score.
    pub fn weight(&self) -> f64 {
        match self {
            Criterion::MinimizeGaps { weight }
            | Criterion::MaximizeCredit { weight }
            | Criterion::PreferredInstructors { weight, .. }
            | Criterion::AvoidDays { weight, .. }
            | Criterion::CompactDays { weight }
            | Criterion::AvoidEarlyStarts { weight, .. } => *weight,
        }
    }
}

/// Weighted linear combination of criteria used to rank schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Criteria in evaluation order.
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

impl ScoringPolicy {
    /// Creates a policy without criteria; every schedule then scores zero and
    /// ranking falls back to generation order.
    pub fn empty() -> Self {
        Self {
            criteria: Vec::new(),
        }
    }

    /// Appends a gap-minimising criterion.
    pub fn minimize_gaps(mut self, weight: f64) -> Self {
        self.criteria.push(Criterion::MinimizeGaps { weight });
        self
    }

    /// Appends a credit-maximising criterion.
    pub fn maximize_credit(mut self, weight: f64) -> Self {
        self.criteria.push(Criterion::MaximizeCredit { weight });
        self
    }

    /// Appends a preferred-instructor criterion.
    pub fn prefer_instructors<I, S>(mut self, weight: f64, instructors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria.push(Criterion::PreferredInstructors {
            weight,
            instructors: instructors.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Appends an avoided-days criterion.
    pub fn avoid_days<I>(mut self, weight: f64, days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        self.criteria.push(Criterion::AvoidDays {
            weight,
            days: days.into_iter().collect(),
        });
        self
    }

    /// Appends a compact-week criterion.
    pub fn compact_days(mut self, weight: f64) -> Self {
        self.criteria.push(Criterion::CompactDays { weight });
        self
    }

    /// Appends an early-start criterion.
    pub fn avoid_early_starts(mut self, weight: f64, before: ClockTime) -> Self {
        self.criteria
            .push(Criterion::AvoidEarlyStarts { weight, before });
        self
    }

    /// Rejects non-finite weights.
    pub fn validate(&self) -> Result<(), TimetableError> {
        for (index, criterion) in self.criteria.iter().enumerate() {
            if !criterion.weight().is_finite() {
                return Err(TimetableError::Data(
                    ErrorInfo::new("policy-weight", "criterion weight must be finite")
                        .with_context("criterion", criterion.name())
                        .with_context("index", index.to_string()),
                ));
            }
        }
        Ok(())
    }
}

impl Default for ScoringPolicy {
    /// Credits first, then a light preference for fewer idle hours.
    fn default() -> Self {
        ScoringPolicy::empty().maximize_credit(1.0).minimize_gaps(0.1)
    }
}
