//! Pairwise conflict detection between sections.

use tt_core::{Section, TimeSlot};

/// True iff some slot of `a` overlaps some slot of `b` on the same day.
///
/// Intervals are half-open, so a meeting ending at 10:00 does not collide
/// with one starting at 10:00.
pub fn conflicts(a: &Section, b: &Section) -> bool {
    a.slots
        .iter()
        .any(|left| b.slots.iter().any(|right| left.overlaps(right)))
}

/// True iff any slot of `a` overlaps any slot of `b`.
pub fn slots_overlap(a: &[TimeSlot], b: &[TimeSlot]) -> bool {
    a.iter().any(|left| b.iter().any(|right| left.overlaps(right)))
}

/// A borrowed section with its slots cached in `(day, start)` order.
#[derive(Debug, Clone)]
pub struct PreparedSection<'c> {
    section: &'c Section,
    slots: Vec<TimeSlot>,
}

impl<'c> PreparedSection<'c> {
    /// Sorts the section's slots once for repeated conflict checks.
    pub fn new(section: &'c Section) -> Self {
        let mut slots = section.slots.clone();
        slots.sort();
        Self { section, slots }
    }

    /// The underlying catalog section.
    pub fn section(&self) -> &'c Section {
        self.section
    }

    /// Slots sorted by day then start time.
    pub fn sorted_slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Same answer as [`conflicts`], walking both sorted slot lists in step
    /// so that days present on only one side are skipped without comparisons.
    pub fn conflicts_with(&self, other: &PreparedSection<'_>) -> bool {
        let (left, right) = (&self.slots, &other.slots);
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            let (a, b) = (&left[i], &right[j]);
            if a.day < b.day {
                i += 1;
            } else if b.day < a.day {
                j += 1;
            } else if a.start < b.end && b.start < a.end {
                return true;
            } else if a.end <= b.end {
                i += 1;
            } else {
                j += 1;
            }
        }
        false
    }
}
