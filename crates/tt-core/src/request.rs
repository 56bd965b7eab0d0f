//! The engine input: ordered course requirements, a policy and a result limit.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TimetableError};
use crate::model::{Catalog, CourseId, CourseRequirement, Section, SectionId};
use crate::policy::ScoringPolicy;
use crate::validation::{first_duplicate, validate_section};

/// Default number of ranked schedules returned per request.
pub const DEFAULT_LIMIT: usize = 5;

/// A scheduling request. Requirement order is the student's intent order and
/// drives generation order, which in turn breaks score ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    /// Courses to schedule, one section each.
    pub requirements: Vec<CourseRequirement>,
    /// Ranking policy.
    #[serde(default)]
    pub policy: ScoringPolicy,
    /// Maximum number of ranked schedules to return (K).
    pub limit: usize,
}

impl SelectionRequest {
    /// Creates a request with the default policy and limit.
    pub fn new(requirements: Vec<CourseRequirement>) -> Self {
        Self {
            requirements,
            policy: ScoringPolicy::default(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Replaces the scoring policy.
    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Checks the request shape: a positive limit, no course requested twice,
    /// no candidate listed twice and a valid policy.
    pub fn validate(&self) -> Result<(), TimetableError> {
        if self.limit == 0 {
            return Err(TimetableError::Data(
                ErrorInfo::new("request-limit", "result limit must be at least 1")
                    .with_hint("ask for K >= 1 ranked schedules"),
            ));
        }
        if let Some(course) = first_duplicate(self.requirements.iter().map(|req| &req.course)) {
            return Err(TimetableError::Data(
                ErrorInfo::new("request-duplicate-course", "course requested more than once")
                    .with_context("course", course.to_string()),
            ));
        }
        for requirement in &self.requirements {
            if let Some(section) = first_duplicate(requirement.candidates.iter()) {
                return Err(TimetableError::Data(
                    ErrorInfo::new(
                        "request-duplicate-candidate",
                        "section listed twice for the same requirement",
                    )
                    .with_context("course", requirement.course.to_string())
                    .with_context("section", section.to_string()),
                ));
            }
        }
        self.policy.validate()
    }

    /// Validates the request and resolves every candidate against `catalog`,
    /// re-validating each resolved section.
    pub fn resolve<'c>(&self, catalog: &'c Catalog) -> Result<ResolvedRequest<'c>, TimetableError> {
        self.validate()?;
        let mut requirements = Vec::with_capacity(self.requirements.len());
        for requirement in &self.requirements {
            let mut sections = Vec::with_capacity(requirement.candidates.len());
            for key in requirement.candidate_keys() {
                let section = catalog.resolve(&key)?;
                validate_section(section)?;
                sections.push(section);
            }
            requirements.push(ResolvedRequirement {
                course: requirement.course.clone(),
                sections,
            });
        }
        Ok(ResolvedRequest { requirements })
    }

    /// Short description used in history records.
    pub fn summary(&self) -> RequestSummary {
        RequestSummary {
            courses: self
                .requirements
                .iter()
                .map(|req| CourseSummary {
                    course: req.course.clone(),
                    candidates: req.candidates.clone(),
                })
                .collect(),
            criteria: self
                .policy
                .criteria
                .iter()
                .map(|criterion| criterion.name().to_string())
                .collect(),
            limit: self.limit,
        }
    }
}

/// A requirement whose candidates have been resolved to catalog sections.
#[derive(Debug, Clone)]
pub struct ResolvedRequirement<'c> {
    /// Course the requirement refers to.
    pub course: CourseId,
    /// Candidate sections in request order.
    pub sections: Vec<&'c Section>,
}

/// A validated request borrowing its sections from a catalog.
#[derive(Debug, Clone)]
pub struct ResolvedRequest<'c> {
    /// Requirements in request order.
    pub requirements: Vec<ResolvedRequirement<'c>>,
}

impl ResolvedRequest<'_> {
    /// Returns the first requirement without any candidate, if one exists.
    pub fn first_empty(&self) -> Option<&CourseId> {
        self.requirements
            .iter()
            .find(|req| req.sections.is_empty())
            .map(|req| &req.course)
    }

    /// Upper bound on the number of complete assignments (saturating).
    pub fn combinations(&self) -> u128 {
        self.requirements
            .iter()
            .fold(1u128, |acc, req| acc.saturating_mul(req.sections.len() as u128))
    }
}

/// Requirement description stored in history records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    /// Requested course.
    pub course: CourseId,
    /// Candidate sections offered to the engine.
    pub candidates: Vec<SectionId>,
}

/// Request description stored in history records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    /// Requested courses in intent order.
    pub courses: Vec<CourseSummary>,
    /// Names of the active scoring criteria.
    pub criteria: Vec<String>,
    /// Result limit.
    pub limit: usize,
}
