//! Defensive re-checks of loader-supplied data.

use std::collections::BTreeSet;

use crate::errors::{ErrorInfo, TimetableError};
use crate::model::Section;
use crate::time::TimeSlot;

/// Returns the first pair of mutually overlapping slots, if any.
pub fn find_internal_overlap(slots: &[TimeSlot]) -> Option<(TimeSlot, TimeSlot)> {
    let mut sorted: Vec<TimeSlot> = slots.to_vec();
    sorted.sort();
    sorted
        .windows(2)
        .find(|pair| pair[0].overlaps(&pair[1]))
        .map(|pair| (pair[0], pair[1]))
}

/// Checks the section invariants: valid non-empty slots that do not overlap
/// one another and a finite, non-negative credit weight.
pub fn validate_section(section: &Section) -> Result<(), TimetableError> {
    let key = section.key().to_string();
    if section.course.as_str().is_empty() || section.section.as_str().is_empty() {
        return Err(TimetableError::Data(
            ErrorInfo::new("section-id", "course and section identifiers must be non-empty")
                .with_context("section", key),
        ));
    }
    if section.slots.is_empty() {
        return Err(TimetableError::Data(
            ErrorInfo::new("section-no-slots", "section has no meeting slots")
                .with_context("section", key)
                .with_hint("sections without fixed meetings cannot be placed on a timetable"),
        ));
    }
    for slot in &section.slots {
        slot.validate().map_err(|err| match err {
            TimetableError::Data(info) => TimetableError::Data(info.with_context("section", key.clone())),
            other => other,
        })?;
    }
    if let Some((first, second)) = find_internal_overlap(&section.slots) {
        return Err(TimetableError::Data(
            ErrorInfo::new("section-self-overlap", "section meetings overlap each other")
                .with_context("section", key)
                .with_context("first", first.to_string())
                .with_context("second", second.to_string()),
        ));
    }
    if !section.credit.is_finite() || section.credit < 0.0 {
        return Err(TimetableError::Data(
            ErrorInfo::new("section-credit", "credit weight must be finite and non-negative")
                .with_context("section", key)
                .with_context("credit", section.credit.to_string()),
        ));
    }
    Ok(())
}

/// Returns the first duplicate among `items`.
pub(crate) fn first_duplicate<'a, T: Ord + 'a>(items: impl IntoIterator<Item = &'a T>) -> Option<&'a T> {
    let mut seen = BTreeSet::new();
    items.into_iter().find(|item| !seen.insert(*item))
}
