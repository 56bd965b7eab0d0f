//! Lazy depth-first enumeration of conflict-free assignments.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::conflict::PreparedSection;

/// Number of expansions between two deadline checks; flags are checked on
/// every expansion.
const DEADLINE_CHECK_INTERVAL: u64 = 64;

/// Position of an assignment in sequential depth-first order.
///
/// `branch` is the candidate index chosen for the first requirement and
/// `ordinal` counts assignments within that branch, so the ordering is the
/// same whether branches are explored sequentially or on separate workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GenerationOrder {
    /// Candidate index of the first requirement.
    pub branch: usize,
    /// Index of the assignment within its branch.
    pub ordinal: u64,
}

/// A complete, conflict-free assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Chosen candidate index per requirement, in requirement order.
    pub choice: Vec<usize>,
    /// Position in generation order.
    pub order: GenerationOrder,
}

/// Branch-and-bound generator over prepared requirements.
///
/// The generator holds no iteration state; each call to
/// [`iter`](CandidateGenerator::iter) starts a fresh traversal.
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator<'p, 'c> {
    requirements: &'p [Vec<PreparedSection<'c>>],
}

impl<'p, 'c> CandidateGenerator<'p, 'c> {
    /// Wraps requirements whose candidates are listed in preference order.
    pub fn new(requirements: &'p [Vec<PreparedSection<'c>>]) -> Self {
        Self { requirements }
    }

    /// Number of first-level branches.
    pub fn branch_count(&self) -> usize {
        self.requirements.first().map(Vec::len).unwrap_or(0)
    }

    /// Enumerates every conflict-free assignment.
    pub fn iter(&self) -> Candidates<'p, 'c> {
        self.iter_with(&CancelToken::new())
    }

    /// Enumerates assignments until `cancel` fires.
    pub fn iter_with(&self, cancel: &CancelToken) -> Candidates<'p, 'c> {
        Candidates::new(self.requirements, 0..self.branch_count(), cancel.clone())
    }

    /// Enumerates only the subtree whose first requirement uses candidate `branch`.
    pub fn iter_branch(&self, branch: usize, cancel: &CancelToken) -> Candidates<'p, 'c> {
        let end = branch.saturating_add(1).min(self.branch_count());
        Candidates::new(self.requirements, branch..end, cancel.clone())
    }
}

/// Iterator returned by [`CandidateGenerator`].
#[derive(Debug)]
pub struct Candidates<'p, 'c> {
    requirements: &'p [Vec<PreparedSection<'c>>],
    first: Range<usize>,
    // cursor[d] is the next candidate to try at depth d; always one longer
    // than `chosen` while the traversal is live.
    cursor: Vec<usize>,
    chosen: Vec<usize>,
    branch: Option<usize>,
    ordinal: u64,
    expansions: u64,
    cancel: CancelToken,
    cancelled: bool,
    done: bool,
}

impl<'p, 'c> Candidates<'p, 'c> {
    fn new(
        requirements: &'p [Vec<PreparedSection<'c>>],
        first: Range<usize>,
        cancel: CancelToken,
    ) -> Self {
        let done = requirements.is_empty()
            || first.is_empty()
            || requirements.iter().any(Vec::is_empty);
        Self {
            requirements,
            cursor: vec![first.start],
            first,
            chosen: Vec::with_capacity(requirements.len()),
            branch: None,
            ordinal: 0,
            expansions: 0,
            cancel,
            cancelled: false,
            done,
        }
    }

    /// Candidate expansions performed so far (each is one conflict check
    /// against the committed prefix).
    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    /// True when the traversal stopped because the token fired.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    fn limit(&self, depth: usize) -> usize {
        if depth == 0 {
            self.first.end
        } else {
            self.requirements[depth].len()
        }
    }

    fn should_stop(&self) -> bool {
        self.cancel.is_flagged()
            || (self.expansions % DEADLINE_CHECK_INTERVAL == 0 && self.cancel.deadline_passed())
    }

    fn emit(&mut self) -> Assignment {
        let branch = self.chosen[0];
        if self.branch != Some(branch) {
            self.branch = Some(branch);
            self.ordinal = 0;
        }
        let assignment = Assignment {
            choice: self.chosen.clone(),
            order: GenerationOrder {
                branch,
                ordinal: self.ordinal,
            },
        };
        self.ordinal += 1;
        assignment
    }
}

impl Iterator for Candidates<'_, '_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        if self.done {
            return None;
        }
        loop {
            let depth = self.chosen.len();
            let index = self.cursor[depth];
            if index >= self.limit(depth) {
                self.cursor.pop();
                if self.chosen.pop().is_none() {
                    self.done = true;
                    return None;
                }
                continue;
            }
            // Only a stop that abandons pending work counts as a cancellation.
            if self.should_stop() {
                self.cancelled = true;
                self.done = true;
                return None;
            }
            self.cursor[depth] = index + 1;
            self.expansions += 1;

            let candidate = &self.requirements[depth][index];
            let clashes = self
                .chosen
                .iter()
                .enumerate()
                .any(|(level, &pick)| self.requirements[level][pick].conflicts_with(candidate));
            if clashes {
                continue;
            }

            self.chosen.push(index);
            if self.chosen.len() == self.requirements.len() {
                let assignment = self.emit();
                self.chosen.pop();
                return Some(assignment);
            }
            self.cursor.push(0);
        }
    }
}
