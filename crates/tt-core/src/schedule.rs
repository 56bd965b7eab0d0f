//! Schedules, their derived metrics and ranked results.

use serde::{Deserialize, Serialize};

use crate::hash::schedule_digest;
use crate::model::{Section, SectionKey};
use crate::time::{TimeSlot, Weekday};

/// Derived figures of a set of chosen sections, computed in one pass.
///
/// Borrowing keeps scoring cheap: the search evaluates metrics for every
/// feasible assignment and only clones sections for the ones it keeps.
#[derive(Debug, Clone)]
pub struct ScheduleMetrics<'a> {
    /// Chosen sections in requirement order.
    pub sections: Vec<&'a Section>,
    /// All meetings sorted by day then start time.
    pub slots: Vec<TimeSlot>,
    /// Sum of section credit weights.
    pub total_credit: f64,
    /// Total weekly meeting time in minutes.
    pub weekly_minutes: u32,
    /// Idle minutes between consecutive same-day meetings.
    pub gap_minutes: u32,
    /// Distinct meeting days in week order.
    pub days: Vec<Weekday>,
}

impl<'a> ScheduleMetrics<'a> {
    /// Computes the metrics of the provided sections.
    pub fn compute<I>(sections: I) -> Self
    where
        I: IntoIterator<Item = &'a Section>,
    {
        let sections: Vec<&'a Section> = sections.into_iter().collect();
        let mut slots: Vec<TimeSlot> = sections
            .iter()
            .flat_map(|section| section.slots.iter().copied())
            .collect();
        slots.sort();

        let total_credit = sections.iter().map(|section| section.credit).sum();
        let weekly_minutes = slots.iter().map(TimeSlot::duration_minutes).sum();

        let mut gap_minutes = 0u32;
        let mut days = Vec::new();
        for pair in slots.windows(2) {
            if pair[0].day == pair[1].day && pair[1].start > pair[0].end {
                gap_minutes += u32::from(pair[1].start.minutes() - pair[0].end.minutes());
            }
        }
        for slot in &slots {
            if days.last() != Some(&slot.day) {
                days.push(slot.day);
            }
        }

        Self {
            sections,
            slots,
            total_credit,
            weekly_minutes,
            gap_minutes,
            days,
        }
    }
}

/// One complete, conflict-free assignment: a section per requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Chosen sections in requirement order.
    pub sections: Vec<Section>,
    /// Sum of credit weights.
    pub total_credit: f64,
    /// Total weekly occupied time in minutes.
    pub weekly_minutes: u32,
    /// Idle minutes between same-day meetings.
    pub gap_minutes: u32,
    /// Distinct meeting days.
    pub days: Vec<Weekday>,
}

impl Schedule {
    /// Materialises a schedule from its metrics, cloning the chosen sections.
    pub fn from_metrics(metrics: &ScheduleMetrics<'_>) -> Self {
        Self {
            sections: metrics.sections.iter().map(|section| (*section).clone()).collect(),
            total_credit: metrics.total_credit,
            weekly_minutes: metrics.weekly_minutes,
            gap_minutes: metrics.gap_minutes,
            days: metrics.days.clone(),
        }
    }

    /// Global keys of the chosen sections in requirement order.
    pub fn keys(&self) -> Vec<SectionKey> {
        self.sections.iter().map(Section::key).collect()
    }

    /// Stable identifier derived from the chosen section keys.
    pub fn digest(&self) -> String {
        schedule_digest(self.sections.iter().map(|section| (&section.course, &section.section)))
    }
}

/// A ranked schedule as returned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// 1-based rank; ties are broken by generation order.
    pub rank: usize,
    /// Policy score; higher is better.
    pub score: f64,
    /// Stable identifier of the schedule content.
    pub id: String,
    /// The schedule itself.
    pub schedule: Schedule,
}

/// How a search finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// The whole search space was explored.
    Complete,
    /// No conflict-free schedule exists; results are empty.
    Infeasible,
    /// The caller stopped the search; results are the best found so far.
    CancelledEarly,
}

impl SearchStatus {
    /// True when the results cover the full search space.
    pub fn is_complete(self) -> bool {
        !matches!(self, SearchStatus::CancelledEarly)
    }
}
