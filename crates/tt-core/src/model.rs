//! Course catalog model: sections, requirements and the catalog slice.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TimetableError};
use crate::time::TimeSlot;
use crate::validation::validate_section;

/// Identifier of a course (e.g. a catalog code).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    /// Wraps a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a section within its course.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Wraps a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Globally unique address of a section: `(course, section)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionKey {
    /// Owning course.
    pub course: CourseId,
    /// Section within the course.
    pub section: SectionId,
}

impl Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.course, self.section)
    }
}

/// One offered instance of a course with its own weekly meetings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Owning course.
    pub course: CourseId,
    /// Section identifier within the course.
    pub section: SectionId,
    /// Weekly meetings; non-empty and mutually non-overlapping.
    pub slots: Vec<TimeSlot>,
    /// Instructor label as shown to students.
    pub instructor: String,
    /// Credit weight; finite and non-negative.
    pub credit: f64,
    /// Arbitrary display metadata (course name, room, department, ...).
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Section {
    /// Creates a section without metadata.
    pub fn new(
        course: impl Into<String>,
        section: impl Into<String>,
        slots: Vec<TimeSlot>,
        instructor: impl Into<String>,
        credit: f64,
    ) -> Self {
        Self {
            course: CourseId::new(course),
            section: SectionId::new(section),
            slots,
            instructor: instructor.into(),
            credit,
            metadata: BTreeMap::new(),
        }
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the global address of the section.
    pub fn key(&self) -> SectionKey {
        SectionKey {
            course: self.course.clone(),
            section: self.section.clone(),
        }
    }

    /// Total weekly meeting time in minutes.
    pub fn weekly_minutes(&self) -> u32 {
        self.slots.iter().map(TimeSlot::duration_minutes).sum()
    }
}

/// The constraint "exactly one section of this course must be chosen".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRequirement {
    /// Course the requirement refers to.
    pub course: CourseId,
    /// Candidate sections in preference order.
    pub candidates: Vec<SectionId>,
}

impl CourseRequirement {
    /// Creates a requirement over the provided candidate section ids.
    pub fn new<I, S>(course: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            course: CourseId::new(course),
            candidates: candidates.into_iter().map(SectionId::new).collect(),
        }
    }

    /// Creates a requirement that admits a single section, pinning it into
    /// every generated schedule.
    pub fn locked(course: impl Into<String>, section: impl Into<String>) -> Self {
        Self::new(course, [section.into()])
    }

    /// Returns true when exactly one candidate is allowed.
    pub fn is_locked(&self) -> bool {
        self.candidates.len() == 1
    }

    /// Iterates over the global keys of all candidates.
    pub fn candidate_keys(&self) -> impl Iterator<Item = SectionKey> + '_ {
        self.candidates.iter().map(|section| SectionKey {
            course: self.course.clone(),
            section: section.clone(),
        })
    }
}

/// Immutable slice of the course catalog a request is resolved against.
///
/// Every section is validated on construction; the engine only ever borrows
/// a catalog and never mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    sections: BTreeMap<SectionKey, Section>,
}

impl Catalog {
    /// Builds a catalog, validating each section and rejecting duplicate keys.
    pub fn from_sections<I>(sections: I) -> Result<Self, TimetableError>
    where
        I: IntoIterator<Item = Section>,
    {
        let mut map = BTreeMap::new();
        for section in sections {
            validate_section(&section)?;
            let key = section.key();
            if map.contains_key(&key) {
                return Err(TimetableError::Data(
                    ErrorInfo::new("catalog-duplicate", "section listed twice in catalog")
                        .with_context("section", key.to_string()),
                ));
            }
            map.insert(key, section);
        }
        Ok(Self { sections: map })
    }

    /// Looks up a section by its global key.
    pub fn get(&self, key: &SectionKey) -> Option<&Section> {
        self.sections.get(key)
    }

    /// Looks up a section, failing with a data error when it is missing.
    pub fn resolve(&self, key: &SectionKey) -> Result<&Section, TimetableError> {
        self.get(key).ok_or_else(|| {
            TimetableError::Data(
                ErrorInfo::new("catalog-unknown-section", "requested section is not in the catalog")
                    .with_context("section", key.to_string()),
            )
        })
    }

    /// Returns all sections of a course in section-id order.
    pub fn sections_of<'a>(&'a self, course: &'a CourseId) -> impl Iterator<Item = &'a Section> + 'a {
        self.sections
            .values()
            .filter(move |section| &section.course == course)
    }

    /// Builds a requirement listing every catalog section of `course`.
    pub fn requirement_for(&self, course: &CourseId) -> CourseRequirement {
        CourseRequirement {
            course: course.clone(),
            candidates: self
                .sections_of(course)
                .map(|section| section.section.clone())
                .collect(),
        }
    }

    /// Number of sections in the catalog.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true when the catalog holds no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Iterates over all sections in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }
}
