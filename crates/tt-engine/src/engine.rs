//! Request orchestration: cache fast path, search, write path and history.

use log::{debug, info};
use tt_core::{Catalog, RankedResult, SearchStatus, SelectionRequest, TimetableError};
use tt_search::{search, CancelToken, Scorer, SearchOptions, SearchOutcome};
use tt_store::{
    fingerprint_resolved, CacheEntry, Fingerprint, HistoryLog, MaterializedSchedule, ScheduleCache,
};

use crate::config::EngineConfig;
use crate::materialize::Materializer;

/// Ranks every conflict-free schedule of `request` and returns the best
/// `request.limit` of them. Sequential, uncached and side-effect free; an
/// infeasible request yields an empty list.
pub fn generate_schedules(
    catalog: &Catalog,
    request: &SelectionRequest,
) -> Result<Vec<RankedResult>, TimetableError> {
    Ok(search_schedules(catalog, request, &SearchOptions::sequential())?.results)
}

/// Like [`generate_schedules`] with cancellation, parallelism and counters.
pub fn search_schedules(
    catalog: &Catalog,
    request: &SelectionRequest,
    options: &SearchOptions,
) -> Result<SearchOutcome, TimetableError> {
    let resolved = request.resolve(catalog)?;
    let scorer = Scorer::from_policy(&request.policy);
    search(&resolved, request.limit, &scorer, options)
}

/// Outcome of [`Engine::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Fingerprint of the request.
    pub fingerprint: Fingerprint,
    /// Ranked results, best first.
    pub results: Vec<RankedResult>,
    /// The same results under their external identifiers.
    pub schedules: Vec<MaterializedSchedule>,
    /// How the producing search finished.
    pub status: SearchStatus,
    /// True when the search was skipped.
    pub cache_hit: bool,
    /// Sequence of the appended history record, if one was appended.
    pub history_sequence: Option<u64>,
}

/// Runs requests against a cache and a history log.
#[derive(Debug)]
pub struct Engine<C, H> {
    config: EngineConfig,
    materializer: Materializer,
    cache: C,
    history: H,
}

impl<C: ScheduleCache, H: HistoryLog> Engine<C, H> {
    /// Builds an engine after validating `config`.
    pub fn new(config: EngineConfig, cache: C, history: H) -> Result<Self, TimetableError> {
        config.validate()?;
        let materializer = Materializer::new(config.naming.naming()?);
        Ok(Self {
            config,
            materializer,
            cache,
            history,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Materializer used for reports and history.
    pub fn materializer(&self) -> &Materializer {
        &self.materializer
    }

    /// The cache backend.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Mutable access to the cache backend, e.g. for invalidation.
    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    /// The history log.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Releases the backends.
    pub fn into_parts(self) -> (C, H) {
        (self.cache, self.history)
    }

    /// Serves `request`, from the cache when an entry for its fingerprint
    /// exists and by searching otherwise.
    ///
    /// Only complete searches are cached. A history record is appended for
    /// every run, except cache hits when `history_on_cache_hit` is off.
    pub fn run(
        &mut self,
        catalog: &Catalog,
        request: &SelectionRequest,
        cancel: &CancelToken,
    ) -> Result<RunReport, TimetableError> {
        let resolved = request.resolve(catalog)?;
        let fingerprint = fingerprint_resolved(&resolved, request)?;

        let (results, status, cache_hit) = match self.cache.get(&fingerprint)? {
            Some(entry) => {
                info!("cache hit for {fingerprint}: {} results", entry.results.len());
                let status = if entry.results.is_empty() {
                    SearchStatus::Infeasible
                } else {
                    SearchStatus::Complete
                };
                (entry.results, status, true)
            }
            None => {
                info!("cache miss for {fingerprint}; searching");
                let scorer = Scorer::from_policy(&request.policy);
                let options = self.config.search_options(cancel);
                let outcome = search(&resolved, request.limit, &scorer, &options)?;
                if outcome.status.is_complete() {
                    self.cache
                        .put(CacheEntry::new(fingerprint.clone(), outcome.results.clone()))?;
                } else {
                    debug!("not caching partial results for {fingerprint}");
                }
                (outcome.results, outcome.status, false)
            }
        };

        let history_sequence = if cache_hit && !self.config.history_on_cache_hit {
            None
        } else {
            let record = self.materializer.record(
                &mut self.history,
                &fingerprint,
                request,
                status,
                cache_hit,
                &results,
            )?;
            Some(record.sequence)
        };

        Ok(RunReport {
            schedules: self.materializer.materialize(&results),
            fingerprint,
            results,
            status,
            cache_hit,
            history_sequence,
        })
    }
}
