#![allow(dead_code)]

use tt_core::{
    Catalog, CourseRequirement, RankedResult, RequestSummary, Schedule, ScheduleMetrics, ScoringPolicy,
    SearchStatus, Section, SelectionRequest, TimeSlot,
};
use tt_store::{Fingerprint, MaterializedSchedule, NewHistoryRecord};

pub fn slot(day: u8, range: &str) -> TimeSlot {
    TimeSlot::parse(day, range).expect("slot")
}

pub fn sections() -> Vec<Section> {
    vec![
        Section::new("MAT101", "1", vec![slot(1, "08:30-10:00"), slot(3, "08:30-10:00")], "Rivera", 4.0),
        Section::new("MAT101", "2", vec![slot(2, "10:00-11:30"), slot(4, "10:00-11:30")], "Okafor", 4.0),
        Section::new("PHY110", "1", vec![slot(1, "10:00-11:30")], "Lindqvist", 3.0),
        Section::new("PHY110", "2", vec![slot(2, "10:30-12:00")], "Lindqvist", 3.0),
        Section::new("HIS200", "1", vec![slot(5, "13:00-15:00")], "Nakamura", 2.0),
    ]
}

pub fn catalog() -> Catalog {
    Catalog::from_sections(sections()).expect("catalog")
}

pub fn request() -> SelectionRequest {
    SelectionRequest::new(vec![
        CourseRequirement::new("MAT101", ["1", "2"]),
        CourseRequirement::new("PHY110", ["1", "2"]),
    ])
    .with_policy(ScoringPolicy::default())
    .with_limit(10)
}

pub fn ranked(catalog: &Catalog, keys: &[(&str, &str)], rank: usize, score: f64) -> RankedResult {
    let chosen: Vec<&Section> = keys
        .iter()
        .map(|(course, section)| {
            catalog
                .iter()
                .find(|candidate| candidate.course.as_str() == *course && candidate.section.as_str() == *section)
                .expect("section in catalog")
        })
        .collect();
    let schedule = Schedule::from_metrics(&ScheduleMetrics::compute(chosen));
    RankedResult {
        rank,
        score,
        id: schedule.digest(),
        schedule,
    }
}

pub fn results(catalog: &Catalog) -> Vec<RankedResult> {
    vec![
        ranked(catalog, &[("MAT101", "1"), ("PHY110", "2")], 1, 7.0),
        ranked(catalog, &[("MAT101", "2"), ("PHY110", "1")], 2, 6.85),
    ]
}

pub fn fingerprint_of(byte: char) -> Fingerprint {
    Fingerprint::from_hex(&byte.to_string().repeat(64)).expect("fingerprint")
}

pub fn new_record(fingerprint: Fingerprint, cache_hit: bool) -> NewHistoryRecord {
    let catalog = catalog();
    let schedules = results(&catalog)
        .into_iter()
        .map(|result| MaterializedSchedule {
            id: result.rank.to_string(),
            rank: result.rank,
            score: result.score,
            schedule_id: result.id.clone(),
            schedule: result.schedule,
        })
        .collect();
    NewHistoryRecord {
        fingerprint,
        request: RequestSummary {
            courses: Vec::new(),
            criteria: vec!["maximize_credit".into()],
            limit: 10,
        },
        status: SearchStatus::Complete,
        cache_hit,
        schedules,
    }
}
