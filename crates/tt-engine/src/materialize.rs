//! Turns ranked results into addressable records and logs runs.

use log::info;
use tt_core::{RankedResult, SearchStatus, SelectionRequest, TimetableError};
use tt_store::{Fingerprint, HistoryLog, HistoryRecord, MaterializedSchedule, NewHistoryRecord};

/// Identifier scheme for materialized schedules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Naming {
    /// `<rank>`.
    RankOnly,
    /// `<label>_<rank>`, with the label restricted to `[A-Za-z0-9._-]`.
    Label(String),
    /// `credits-<total credit>_<rank>`.
    Credits,
}

/// Assigns stable identifiers to ranked results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materializer {
    naming: Naming,
}

impl Materializer {
    /// Creates a materializer using `naming`.
    pub fn new(naming: Naming) -> Self {
        Self { naming }
    }

    /// The active scheme.
    pub fn naming(&self) -> &Naming {
        &self.naming
    }

    /// Identifier of `result`; depends only on the result itself, so the
    /// same rank always maps to the same identifier.
    pub fn identifier(&self, result: &RankedResult) -> String {
        match &self.naming {
            Naming::RankOnly => result.rank.to_string(),
            Naming::Label(label) => format!("{}_{}", sanitize_label(label), result.rank),
            Naming::Credits => format!(
                "credits-{}_{}",
                format_credit(result.schedule.total_credit),
                result.rank
            ),
        }
    }

    /// Materializes `results` in order. Pure.
    pub fn materialize(&self, results: &[RankedResult]) -> Vec<MaterializedSchedule> {
        results
            .iter()
            .map(|result| MaterializedSchedule {
                id: self.identifier(result),
                rank: result.rank,
                score: result.score,
                schedule_id: result.id.clone(),
                schedule: result.schedule.clone(),
            })
            .collect()
    }

    /// Materializes `results` and appends exactly one history record.
    pub fn record<L: HistoryLog + ?Sized>(
        &self,
        log: &mut L,
        fingerprint: &Fingerprint,
        request: &SelectionRequest,
        status: SearchStatus,
        cache_hit: bool,
        results: &[RankedResult],
    ) -> Result<HistoryRecord, TimetableError> {
        let record = log.append(NewHistoryRecord {
            fingerprint: fingerprint.clone(),
            request: request.summary(),
            status,
            cache_hit,
            schedules: self.materialize(results),
        })?;
        info!(
            "recorded run {} ({} schedules, cache_hit={cache_hit})",
            record.sequence,
            record.schedules.len()
        );
        Ok(record)
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(Naming::Credits)
    }
}

fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "schedule".to_string()
    } else {
        cleaned
    }
}

// f64 Display already drops a trailing ".0".
fn format_credit(credit: f64) -> String {
    format!("{credit}")
}
