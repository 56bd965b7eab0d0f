#![allow(dead_code)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use tt_core::{Catalog, CourseRequirement, ResolvedRequest, Section, SelectionRequest, TimeSlot};

pub fn slot(day: u8, range: &str) -> TimeSlot {
    TimeSlot::parse(day, range).expect("valid slot")
}

pub fn section(course: &str, id: &str, slots: Vec<TimeSlot>, credit: f64) -> Section {
    Section::new(course, id, slots, format!("Instructor {course}{id}"), credit)
}

/// Three courses with {2, 2, 3} candidates of which exactly four
/// combinations are conflict-free:
/// A1 B1 C3, A1 B2 C2, A2 B1 C1, A2 B1 C3 (in generation order).
pub fn four_feasible_catalog() -> (Catalog, SelectionRequest) {
    let catalog = Catalog::from_sections([
        section("A", "1", vec![slot(1, "09:00-10:00")], 3.0),
        section("A", "2", vec![slot(2, "09:00-10:00")], 3.0),
        section("B", "1", vec![slot(3, "09:00-10:00")], 4.0),
        section("B", "2", vec![slot(2, "09:30-10:30")], 3.0),
        section("C", "1", vec![slot(1, "09:00-10:00")], 2.0),
        section("C", "2", vec![slot(3, "09:00-10:00")], 3.0),
        section("C", "3", vec![slot(2, "10:00-11:00")], 4.0),
    ])
    .expect("valid catalog");
    let request = SelectionRequest::new(vec![
        CourseRequirement::new("A", ["1", "2"]),
        CourseRequirement::new("B", ["1", "2"]),
        CourseRequirement::new("C", ["1", "2", "3"]),
    ])
    .with_limit(10);
    (catalog, request)
}

pub fn resolve<'c>(catalog: &'c Catalog, request: &SelectionRequest) -> ResolvedRequest<'c> {
    request.resolve(catalog).expect("resolvable request")
}

/// Randomly shaped section: distinct days, so its own slots never overlap.
pub type SectionShape = (BTreeMap<u8, (u16, u16)>, u8);

pub fn section_shape() -> impl Strategy<Value = SectionShape> {
    (
        prop::collection::btree_map(1u8..=5, (8u16..18, prop::sample::select(vec![60u16, 90, 120])), 1..3),
        0u8..6,
    )
}

pub fn catalog_shape() -> impl Strategy<Value = Vec<Vec<SectionShape>>> {
    prop::collection::vec(prop::collection::vec(section_shape(), 1..5), 1..5)
}

pub fn build_catalog(shape: &[Vec<SectionShape>]) -> (Catalog, SelectionRequest) {
    let mut sections = Vec::new();
    let mut requirements = Vec::new();
    for (course_index, candidates) in shape.iter().enumerate() {
        let course = format!("C{course_index}");
        let mut ids = Vec::new();
        for (section_index, (days, credit)) in candidates.iter().enumerate() {
            let id = format!("S{section_index}");
            let slots = days
                .iter()
                .map(|(&day, &(hour, length))| {
                    let start = hour * 60;
                    TimeSlot::new(
                        tt_core::Weekday::from_number(day).expect("day"),
                        tt_core::ClockTime::from_minutes(start).expect("start"),
                        tt_core::ClockTime::from_minutes(start + length).expect("end"),
                    )
                    .expect("slot")
                })
                .collect();
            sections.push(Section::new(
                course.clone(),
                id.clone(),
                slots,
                format!("T{}", section_index % 2),
                f64::from(*credit),
            ));
            ids.push(id);
        }
        requirements.push(CourseRequirement::new(course, ids));
    }
    let catalog = Catalog::from_sections(sections).expect("generated catalog is valid");
    (catalog, SelectionRequest::new(requirements))
}

/// Every full combination that is pairwise conflict-free, by brute force.
pub fn brute_force_count(resolved: &ResolvedRequest<'_>) -> usize {
    fn walk<'a>(resolved: &ResolvedRequest<'a>, depth: usize, chosen: &mut Vec<&'a Section>) -> usize {
        if depth == resolved.requirements.len() {
            return 1;
        }
        let mut total = 0;
        for &candidate in &resolved.requirements[depth].sections {
            if chosen.iter().any(|c| tt_search::conflicts(c, candidate)) {
                continue;
            }
            chosen.push(candidate);
            total += walk(resolved, depth + 1, chosen);
            chosen.pop();
        }
        total
    }
    walk(resolved, 0, &mut Vec::new())
}
