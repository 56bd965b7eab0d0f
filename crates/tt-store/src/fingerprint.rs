//! Versioned fingerprints of selection requests.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tt_core::{
    stable_hash_string, Catalog, CourseId, ErrorInfo, ResolvedRequest, ScoringPolicy, Section,
    SelectionRequest, TimetableError,
};

/// Version tag mixed into every fingerprint. Bump it whenever the set of
/// hashed fields changes so stale entries can never be hit.
pub const FINGERPRINT_VERSION: u32 = 1;

/// Hex-encoded SHA-256 digest identifying a request's inputs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Parses a fingerprint from its 64-digit lowercase hex form.
    pub fn from_hex(raw: &str) -> Result<Self, TimetableError> {
        let valid = raw.len() == 64
            && raw
                .bytes()
                .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));
        if !valid {
            return Err(TimetableError::Data(
                ErrorInfo::new("fingerprint-format", "fingerprint must be 64 lowercase hex digits")
                    .with_context("value", raw),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    version: u32,
    requirements: Vec<FingerprintRequirement<'a>>,
    policy: &'a ScoringPolicy,
    limit: usize,
}

#[derive(Serialize)]
struct FingerprintRequirement<'a> {
    course: &'a CourseId,
    candidates: Vec<&'a Section>,
}

/// Fingerprints `request` against `catalog`.
///
/// The digest covers every requirement in order, the full content of each
/// candidate section, the scoring policy and the limit. It never depends on
/// computed results.
pub fn fingerprint(catalog: &Catalog, request: &SelectionRequest) -> Result<Fingerprint, TimetableError> {
    let resolved = request.resolve(catalog)?;
    fingerprint_resolved(&resolved, request)
}

/// Fingerprints an already resolved request.
pub fn fingerprint_resolved(
    resolved: &ResolvedRequest<'_>,
    request: &SelectionRequest,
) -> Result<Fingerprint, TimetableError> {
    let input = FingerprintInput {
        version: FINGERPRINT_VERSION,
        requirements: resolved
            .requirements
            .iter()
            .map(|requirement| FingerprintRequirement {
                course: &requirement.course,
                candidates: requirement.sections.clone(),
            })
            .collect(),
        policy: &request.policy,
        limit: request.limit,
    };
    stable_hash_string(&input).map(Fingerprint)
}
