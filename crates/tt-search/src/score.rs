//! Sub-score strategies and the weighted scorer built from a policy.

use std::collections::BTreeSet;

use tt_core::{ClockTime, Criterion, ScheduleMetrics, ScoringPolicy, Weekday};

/// A pure, deterministic sub-score over schedule metrics. Higher is better.
pub trait SubScore: Send + Sync {
    /// Stable name used in score breakdowns.
    fn name(&self) -> &str;

    /// Evaluates the sub-score.
    fn evaluate(&self, metrics: &ScheduleMetrics<'_>) -> f64;
}

/// Negated idle hours between same-day meetings.
#[derive(Debug, Clone, Copy, Default)]
pub struct GapHours;

impl SubScore for GapHours {
    fn name(&self) -> &str {
        "minimize_gaps"
    }

    fn evaluate(&self, metrics: &ScheduleMetrics<'_>) -> f64 {
        -(f64::from(metrics.gap_minutes) / 60.0)
    }
}

/// Total credit weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditTotal;

impl SubScore for CreditTotal {
    fn name(&self) -> &str {
        "maximize_credit"
    }

    fn evaluate(&self, metrics: &ScheduleMetrics<'_>) -> f64 {
        metrics.total_credit
    }
}

/// Number of chosen sections taught by a preferred instructor.
#[derive(Debug, Clone, Default)]
pub struct InstructorMatches {
    instructors: BTreeSet<String>,
}

impl InstructorMatches {
    /// Matches the listed instructor labels exactly.
    pub fn new(instructors: BTreeSet<String>) -> Self {
        Self { instructors }
    }
}

impl SubScore for InstructorMatches {
    fn name(&self) -> &str {
        "preferred_instructors"
    }

    fn evaluate(&self, metrics: &ScheduleMetrics<'_>) -> f64 {
        metrics
            .sections
            .iter()
            .filter(|section| self.instructors.contains(&section.instructor))
            .count() as f64
    }
}

/// Negated number of meetings held on avoided days.
#[derive(Debug, Clone, Default)]
pub struct AvoidedDayMeetings {
    days: BTreeSet<Weekday>,
}

impl AvoidedDayMeetings {
    /// Penalises meetings on `days`.
    pub fn new(days: BTreeSet<Weekday>) -> Self {
        Self { days }
    }
}

impl SubScore for AvoidedDayMeetings {
    fn name(&self) -> &str {
        "avoid_days"
    }

    fn evaluate(&self, metrics: &ScheduleMetrics<'_>) -> f64 {
        -(metrics
            .slots
            .iter()
            .filter(|slot| self.days.contains(&slot.day))
            .count() as f64)
    }
}

/// Negated number of distinct meeting days.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayCount;

impl SubScore for DayCount {
    fn name(&self) -> &str {
        "compact_days"
    }

    fn evaluate(&self, metrics: &ScheduleMetrics<'_>) -> f64 {
        -(metrics.days.len() as f64)
    }
}

/// Negated number of meetings starting before a cut-off.
#[derive(Debug, Clone, Copy)]
pub struct EarlyStarts {
    before: ClockTime,
}

impl EarlyStarts {
    /// Penalises meetings starting strictly before `before`.
    pub fn new(before: ClockTime) -> Self {
        Self { before }
    }
}

impl SubScore for EarlyStarts {
    fn name(&self) -> &str {
        "avoid_early_starts"
    }

    fn evaluate(&self, metrics: &ScheduleMetrics<'_>) -> f64 {
        -(metrics
            .slots
            .iter()
            .filter(|slot| slot.start < self.before)
            .count() as f64)
    }
}

/// Returns the strategy implementing `criterion`.
pub fn sub_score_for(criterion: &Criterion) -> Box<dyn SubScore> {
    match criterion {
        Criterion::MinimizeGaps { .. } => Box::new(GapHours),
        Criterion::MaximizeCredit { .. } => Box::new(CreditTotal),
        Criterion::PreferredInstructors { instructors, .. } => {
            Box::new(InstructorMatches::new(instructors.clone()))
        }
        Criterion::AvoidDays { days, .. } => Box::new(AvoidedDayMeetings::new(days.clone())),
        Criterion::CompactDays { .. } => Box::new(DayCount),
        Criterion::AvoidEarlyStarts { before, .. } => Box::new(EarlyStarts::new(*before)),
    }
}

/// Weighted linear combination of sub-scores.
pub struct Scorer {
    terms: Vec<(f64, Box<dyn SubScore>)>,
}

impl Scorer {
    /// Builds the scorer for a policy, keeping criterion order.
    pub fn from_policy(policy: &ScoringPolicy) -> Self {
        Self {
            terms: policy
                .criteria
                .iter()
                .map(|criterion| (criterion.weight(), sub_score_for(criterion)))
                .collect(),
        }
    }

    /// Appends an extra weighted term evaluated after the policy criteria.
    pub fn push(&mut self, weight: f64, term: Box<dyn SubScore>) {
        self.terms.push((weight, term));
    }

    /// Total score: the weighted sum, accumulated in term order.
    pub fn score(&self, metrics: &ScheduleMetrics<'_>) -> f64 {
        self.terms
            .iter()
            .fold(0.0, |acc, (weight, term)| acc + weight * term.evaluate(metrics))
    }

    /// Weighted contribution of every term, in term order.
    pub fn breakdown(&self, metrics: &ScheduleMetrics<'_>) -> Vec<(String, f64)> {
        self.terms
            .iter()
            .map(|(weight, term)| (term.name().to_string(), weight * term.evaluate(metrics)))
            .collect()
    }

    /// Number of weighted terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when no term is configured.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.terms.iter().map(|(_, term)| term.name()).collect();
        f.debug_struct("Scorer").field("terms", &names).finish()
    }
}
