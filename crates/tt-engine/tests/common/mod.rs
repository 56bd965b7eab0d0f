#![allow(dead_code)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use tt_engine::{Catalog, ClockTime, CourseRequirement, RankedResult, Section, SelectionRequest, TimeSlot, Weekday};

pub fn slot(day: u8, range: &str) -> TimeSlot {
    TimeSlot::parse(day, range).expect("slot")
}

/// Candidate counts {2, 2, 3}; exactly four combinations are conflict-free.
pub fn four_feasible_catalog() -> (Catalog, SelectionRequest) {
    let section = |course: &str, id: &str, day: u8, range: &str, credit: f64| {
        Section::new(course, id, vec![slot(day, range)], format!("Staff {course}"), credit)
    };
    let catalog = Catalog::from_sections([
        section("A", "1", 1, "09:00-10:00", 3.0),
        section("A", "2", 2, "09:00-10:00", 3.0),
        section("B", "1", 3, "09:00-10:00", 4.0),
        section("B", "2", 2, "09:30-10:30", 3.0),
        section("C", "1", 1, "09:00-10:00", 2.0),
        section("C", "2", 3, "09:00-10:00", 3.0),
        section("C", "3", 2, "10:00-11:00", 4.0),
    ])
    .expect("catalog");
    let request = SelectionRequest::new(vec![
        CourseRequirement::new("A", ["1", "2"]),
        CourseRequirement::new("B", ["1", "2"]),
        CourseRequirement::new("C", ["1", "2", "3"]),
    ])
    .with_limit(10);
    (catalog, request)
}

pub fn labels(results: &[RankedResult]) -> Vec<String> {
    results
        .iter()
        .map(|result| {
            result
                .schedule
                .sections
                .iter()
                .map(|section| format!("{}{}", section.course, section.section))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

pub type SectionShape = (BTreeMap<u8, (u16, u16)>, u8);

pub fn catalog_shape() -> impl Strategy<Value = Vec<Vec<SectionShape>>> {
    let section = (
        prop::collection::btree_map(1u8..=5, (8u16..18, prop::sample::select(vec![60u16, 90])), 1..3),
        0u8..6,
    );
    prop::collection::vec(prop::collection::vec(section, 1..4), 1..5)
}

pub fn build_catalog(shape: &[Vec<SectionShape>], limit: usize) -> (Catalog, SelectionRequest) {
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
                        Weekday::from_number(day).expect("day"),
                        ClockTime::from_minutes(start).expect("start"),
                        ClockTime::from_minutes(start + length).expect("end"),
                    )
                    .expect("slot")
                })
                .collect();
            sections.push(Section::new(
                course.clone(),
                id.clone(),
                slots,
                "Staff",
                f64::from(*credit) * 0.5,
            ));
            ids.push(id);
        }
        requirements.push(CourseRequirement::new(course, ids));
    }
    let catalog = Catalog::from_sections(sections).expect("catalog");
    (catalog, SelectionRequest::new(requirements).with_limit(limit))
}
