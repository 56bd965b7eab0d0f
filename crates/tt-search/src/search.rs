//! Search driver: generation, scoring and top-K selection, sequential or
//! fanned out over first-level branches.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use rayon::prelude::*;
use tt_core::{
    ErrorInfo, RankedResult, ResolvedRequest, Schedule, ScheduleMetrics, SearchStatus,
    TimetableError,
};

use crate::cancel::CancelToken;
use crate::conflict::PreparedSection;
use crate::generator::CandidateGenerator;
use crate::score::Scorer;
use crate::topk::TopK;

/// Branch completion reported while a search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProgress {
    /// First-level branches fully explored or abandoned.
    pub completed_branches: usize,
    /// First-level branches in the search.
    pub total_branches: usize,
}

impl SearchProgress {
    /// Completion in whole percent, `0..=100`.
    pub fn percent(&self) -> u8 {
        if self.total_branches == 0 {
            return 100;
        }
        let done = self.completed_branches.min(self.total_branches);
        (done * 100 / self.total_branches) as u8
    }
}

/// Progress callback; may be invoked from worker threads.
pub type ProgressFn = Arc<dyn Fn(SearchProgress) + Send + Sync>;

/// Knobs controlling one search.
#[derive(Clone)]
pub struct SearchOptions {
    /// Worker threads; `1` searches on the calling thread.
    pub threads: usize,
    /// Stop once more than this many feasible schedules exist; exactly this
    /// many are scored.
    pub max_feasible: Option<u64>,
    /// Host-controlled stop signal, optionally carrying a deadline.
    pub cancel: CancelToken,
    /// Called with 0% before generation starts and again after each branch
    /// that is explored; a cancelled search stops reporting.
    pub progress: Option<ProgressFn>,
}

impl fmt::Debug for SearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchOptions")
            .field("threads", &self.threads)
            .field("max_feasible", &self.max_feasible)
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            max_feasible: None,
            cancel: CancelToken::new(),
            progress: None,
        }
    }
}

impl SearchOptions {
    /// Sequential search without budget.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Uses `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Stops after `max` feasible schedules.
    pub fn with_max_feasible(mut self, max: u64) -> Self {
        self.max_feasible = Some(max);
        self
    }

    /// Uses the provided cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Reports branch completion to `progress`.
    pub fn with_progress(mut self, progress: impl Fn(SearchProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }
}

struct ProgressTracker<'a> {
    callback: Option<&'a ProgressFn>,
    completed: AtomicUsize,
    total: usize,
}

impl ProgressTracker<'_> {
    fn report(&self, completed_branches: usize) {
        if let Some(callback) = self.callback {
            callback(SearchProgress {
                completed_branches,
                total_branches: self.total,
            });
        }
    }

    fn branch_done(&self) {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        self.report(completed);
    }
}

/// Ranked results and counters of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Ranked schedules, best first.
    pub results: Vec<RankedResult>,
    /// How the search finished.
    pub status: SearchStatus,
    /// Candidate expansions performed.
    pub explored: u64,
    /// Feasible schedules scored.
    pub feasible: u64,
}

impl SearchOutcome {
    fn infeasible() -> Self {
        Self {
            results: Vec::new(),
            status: SearchStatus::Infeasible,
            explored: 0,
            feasible: 0,
        }
    }
}

/// Sorts every candidate's slots once for the whole search.
pub fn prepare<'c>(request: &ResolvedRequest<'c>) -> Vec<Vec<PreparedSection<'c>>> {
    request
        .requirements
        .iter()
        .map(|requirement| {
            requirement
                .sections
                .iter()
                .map(|&section| PreparedSection::new(section))
                .collect()
        })
        .collect()
}

struct BranchResult {
    top: TopK<Vec<usize>>,
    explored: u64,
    feasible: u64,
    cancelled: bool,
}

struct Budget<'a> {
    max_feasible: Option<u64>,
    seen: &'a AtomicU64,
    stop: &'a CancelToken,
}

impl Budget<'_> {
    /// Counts one feasible schedule. Returns false, and stops the search,
    /// for the first schedule beyond the budget.
    fn admit(&self) -> bool {
        let seen = self.seen.fetch_add(1, Ordering::Relaxed) + 1;
        match self.max_feasible {
            Some(max) if seen > max => {
                self.stop.cancel();
                false
            }
            _ => true,
        }
    }
}

fn run_branch(
    generator: CandidateGenerator<'_, '_>,
    prepared: &[Vec<PreparedSection<'_>>],
    branch: usize,
    limit: usize,
    scorer: &Scorer,
    budget: &Budget<'_>,
) -> BranchResult {
    let mut top = TopK::new(limit);
    let mut feasible = 0u64;
    let mut over_budget = false;
    let mut candidates = generator.iter_branch(branch, budget.stop);
    for assignment in candidates.by_ref() {
        if !budget.admit() {
            over_budget = true;
            break;
        }
        feasible += 1;
        let metrics = ScheduleMetrics::compute(
            assignment
                .choice
                .iter()
                .enumerate()
                .map(|(level, &pick)| prepared[level][pick].section()),
        );
        let score = scorer.score(&metrics);
        top.offer(score, assignment.order, assignment.choice);
    }
    BranchResult {
        top,
        explored: candidates.expansions(),
        feasible,
        cancelled: over_budget || candidates.was_cancelled(),
    }
}

/// Searches `request` and returns up to `limit` ranked schedules.
///
/// A requirement without candidates makes the request infeasible without
/// any generation. With `threads > 1` each first-level branch keeps its own
/// top-K which are merged at the end; the merged ranking is identical to the
/// sequential one unless the search is cancelled.
///
/// `max_feasible` only reports [`SearchStatus::CancelledEarly`] when a
/// feasible schedule beyond the budget actually exists.
pub fn search(
    request: &ResolvedRequest<'_>,
    limit: usize,
    scorer: &Scorer,
    options: &SearchOptions,
) -> Result<SearchOutcome, TimetableError> {
    if let Some(course) = request.first_empty() {
        debug!("course {course} has no candidate sections; request is infeasible");
        return Ok(SearchOutcome::infeasible());
    }
    if request.requirements.is_empty() {
        return Ok(SearchOutcome::infeasible());
    }

    let started = Instant::now();
    let prepared = prepare(request);
    let generator = CandidateGenerator::new(&prepared);
    let stop = options.cancel.child();
    let seen = AtomicU64::new(0);
    let budget = Budget {
        max_feasible: options.max_feasible,
        seen: &seen,
        stop: &stop,
    };

    let progress = ProgressTracker {
        callback: options.progress.as_ref(),
        completed: AtomicUsize::new(0),
        total: generator.branch_count(),
    };
    progress.report(0);

    let branches: Vec<BranchResult> = if options.threads > 1 && generator.branch_count() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()
            .map_err(|err| {
                TimetableError::Search(
                    ErrorInfo::new("thread-pool", err.to_string())
                        .with_context("threads", options.threads.to_string()),
                )
            })?;
        pool.install(|| {
            (0..generator.branch_count())
                .into_par_iter()
                .map(|branch| {
                    let result = run_branch(generator, &prepared, branch, limit, scorer, &budget);
                    progress.branch_done();
                    result
                })
                .collect()
        })
    } else {
        let mut results = Vec::with_capacity(generator.branch_count());
        for branch in 0..generator.branch_count() {
            let result = run_branch(generator, &prepared, branch, limit, scorer, &budget);
            let cancelled = result.cancelled;
            results.push(result);
            progress.branch_done();
            if cancelled {
                break;
            }
        }
        results
    };

    let mut top = TopK::new(limit);
    let mut explored = 0u64;
    let mut feasible = 0u64;
    let mut cancelled = false;
    for branch in branches {
        explored += branch.explored;
        feasible += branch.feasible;
        cancelled |= branch.cancelled;
        top.merge(branch.top);
    }

    let results = top
        .into_sorted()
        .into_iter()
        .enumerate()
        .map(|(index, ranked)| {
            let metrics = ScheduleMetrics::compute(
                ranked
                    .item
                    .iter()
                    .enumerate()
                    .map(|(level, &pick)| prepared[level][pick].section()),
            );
            let schedule = Schedule::from_metrics(&metrics);
            RankedResult {
                rank: index + 1,
                score: ranked.score,
                id: schedule.digest(),
                schedule,
            }
        })
        .collect::<Vec<_>>();

    let status = if cancelled {
        SearchStatus::CancelledEarly
    } else if feasible == 0 {
        SearchStatus::Infeasible
    } else {
        SearchStatus::Complete
    };
    debug!(
        "search finished: status={status:?} explored={explored} feasible={feasible} kept={} elapsed_ms={}",
        results.len(),
        started.elapsed().as_millis()
    );
    Ok(SearchOutcome {
        results,
        status,
        explored,
        feasible,
    })
}
