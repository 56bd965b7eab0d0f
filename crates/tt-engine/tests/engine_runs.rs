mod common;

use std::fs;

use common::{four_feasible_catalog, labels};
use tempfile::tempdir;
use tt_engine::{
    fingerprint, generate_schedules, CancelToken, DirectoryCache, Engine, EngineConfig, HistoryLog,
    JsonLinesHistory, MemoryCache, MemoryHistory, NamingConfig, NamingStyle, ScheduleCache,
    SearchStatus,
};

fn memory_engine(config: EngineConfig) -> Engine<MemoryCache, MemoryHistory> {
    Engine::new(config, MemoryCache::new(), MemoryHistory::new()).expect("engine")
}

#[test]
fn second_identical_run_is_served_from_the_cache() {
    let (catalog, request) = four_feasible_catalog();
    let mut engine = memory_engine(EngineConfig::default());
    let cancel = CancelToken::new();

    let cold = engine.run(&catalog, &request, &cancel).expect("cold run");
    assert!(!cold.cache_hit);
    assert_eq!(cold.status, SearchStatus::Complete);
    assert_eq!(engine.cache().len(), 1);

    let warm = engine.run(&catalog, &request, &cancel).expect("warm run");
    assert!(warm.cache_hit);
    assert_eq!(warm.fingerprint, cold.fingerprint);
    assert_eq!(warm.results, cold.results);
    assert_eq!(warm.results, generate_schedules(&catalog, &request).expect("generate"));

    let history = engine.history().records().expect("records");
    assert_eq!(history.len(), 2);
    assert_eq!((history[0].sequence, history[0].cache_hit), (1, false));
    assert_eq!((history[1].sequence, history[1].cache_hit), (2, true));
    assert_eq!(warm.history_sequence, Some(2));
}

#[test]
fn cache_hits_can_skip_history() {
    let (catalog, request) = four_feasible_catalog();
    let config = EngineConfig {
        history_on_cache_hit: false,
        ..EngineConfig::default()
    };
    let mut engine = memory_engine(config);
    let cancel = CancelToken::new();
    engine.run(&catalog, &request, &cancel).expect("cold run");
    let warm = engine.run(&catalog, &request, &cancel).expect("warm run");
    assert!(warm.cache_hit);
    assert_eq!(warm.history_sequence, None);
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn smaller_limit_misses_a_warm_cache() {
    let (catalog, request) = four_feasible_catalog();
    let mut engine = memory_engine(EngineConfig::default());
    let cancel = CancelToken::new();
    let ten = engine.run(&catalog, &request, &cancel).expect("k=10");

    let two = engine
        .run(&catalog, &request.clone().with_limit(2), &cancel)
        .expect("k=2");
    assert!(!two.cache_hit);
    assert_ne!(two.fingerprint, ten.fingerprint);
    assert_eq!(two.results, ten.results[..2].to_vec());
    assert_eq!(engine.cache().len(), 2);
}

#[test]
fn cancelled_runs_are_recorded_but_never_cached() {
    let (catalog, request) = four_feasible_catalog();
    let mut engine = memory_engine(EngineConfig::default());
    let cancel = CancelToken::new();
    cancel.cancel();

    let report = engine.run(&catalog, &request, &cancel).expect("run");
    assert_eq!(report.status, SearchStatus::CancelledEarly);
    assert!(engine.cache().is_empty());
    let latest = engine.history().latest().expect("latest").expect("record");
    assert_eq!(latest.status, SearchStatus::CancelledEarly);

    let retry = engine.run(&catalog, &request, &CancelToken::new()).expect("retry");
    assert!(!retry.cache_hit);
    assert_eq!(retry.status, SearchStatus::Complete);
    assert_eq!(retry.results.len(), 4);
}

#[test]
fn feasible_cap_reports_cancelled_early() {
    let (catalog, request) = four_feasible_catalog();
    let config = EngineConfig {
        max_feasible: Some(2),
        ..EngineConfig::default()
    };
    let mut engine = memory_engine(config);
    let report = engine.run(&catalog, &request, &CancelToken::new()).expect("run");
    assert_eq!(report.status, SearchStatus::CancelledEarly);
    assert_eq!(labels(&report.results), vec!["A1 B1 C3", "A1 B2 C2"]);
    assert!(engine.cache().is_empty());
}

#[test]
fn feasible_cap_matching_the_total_is_cached() {
    let (catalog, request) = four_feasible_catalog();
    let config = EngineConfig {
        max_feasible: Some(4),
        ..EngineConfig::default()
    };
    let mut engine = memory_engine(config);
    let report = engine.run(&catalog, &request, &CancelToken::new()).expect("run");
    assert_eq!(report.status, SearchStatus::Complete);
    assert_eq!(report.results.len(), 4);
    assert!(!engine.cache().is_empty());
}

#[test]
fn infeasible_results_are_cached_as_empty() {
    let (catalog, _) = four_feasible_catalog();
    let request = tt_engine::SelectionRequest::new(vec![
        tt_engine::CourseRequirement::locked("A", "1"),
        tt_engine::CourseRequirement::locked("C", "1"),
    ]);
    let mut engine = memory_engine(EngineConfig::default());
    let cold = engine.run(&catalog, &request, &CancelToken::new()).expect("cold");
    assert_eq!(cold.status, SearchStatus::Infeasible);
    let warm = engine.run(&catalog, &request, &CancelToken::new()).expect("warm");
    assert!(warm.cache_hit);
    assert_eq!(warm.status, SearchStatus::Infeasible);
    assert!(warm.schedules.is_empty());
}

#[test]
fn reports_use_the_configured_naming() {
    let (catalog, request) = four_feasible_catalog();
    let mut engine = memory_engine(EngineConfig::default());
    let report = engine.run(&catalog, &request, &CancelToken::new()).expect("run");
    let ids: Vec<&str> = report.schedules.iter().map(|schedule| schedule.id.as_str()).collect();
    assert_eq!(ids, vec!["credits-11_1", "credits-11_2", "credits-9_3", "credits-9_4"]);

    let labelled = EngineConfig {
        naming: NamingConfig {
            style: NamingStyle::Label,
            label: Some("fall term".into()),
        },
        ..EngineConfig::default()
    };
    let mut engine = memory_engine(labelled);
    let report = engine.run(&catalog, &request, &CancelToken::new()).expect("run");
    assert_eq!(report.schedules[0].id, "fall_term_1");
    let recorded = engine.history().latest().expect("latest").expect("record");
    assert_eq!(recorded.schedules, report.schedules);
}

#[test]
fn invalid_configuration_is_rejected() {
    let config = EngineConfig {
        threads: 0,
        ..EngineConfig::default()
    };
    let err = Engine::new(config, MemoryCache::new(), MemoryHistory::new()).unwrap_err();
    assert_eq!(err.info().code, "config-threads");
}

#[test]
fn threaded_engine_matches_sequential_results() {
    let (catalog, request) = four_feasible_catalog();
    let config = EngineConfig {
        threads: 3,
        ..EngineConfig::default()
    };
    let mut engine = memory_engine(config);
    let report = engine.run(&catalog, &request, &CancelToken::new()).expect("run");
    assert_eq!(report.results, generate_schedules(&catalog, &request).expect("generate"));
}

#[test]
fn persistent_backends_survive_a_restart() {
    let dir = tempdir().expect("tempdir");
    let cache_dir = dir.path().join("cache");
    let history_path = dir.path().join("history.jsonl");
    let (catalog, request) = four_feasible_catalog();

    let cold = {
        let mut engine = Engine::new(
            EngineConfig::default(),
            DirectoryCache::open(&cache_dir).expect("cache"),
            JsonLinesHistory::open(&history_path).expect("history"),
        )
        .expect("engine");
        engine.run(&catalog, &request, &CancelToken::new()).expect("cold")
    };

    let mut engine = Engine::new(
        EngineConfig::default(),
        DirectoryCache::open(&cache_dir).expect("cache"),
        JsonLinesHistory::open(&history_path).expect("history"),
    )
    .expect("engine");
    let warm = engine.run(&catalog, &request, &CancelToken::new()).expect("warm");
    assert!(warm.cache_hit);
    assert_eq!(warm.results, cold.results);
    assert_eq!(warm.history_sequence, Some(2));
    assert_eq!(engine.cache().fingerprints().expect("list"), vec![cold.fingerprint.clone()]);
}

#[test]
fn corrupt_cache_entry_is_recomputed_and_repaired() {
    let dir = tempdir().expect("tempdir");
    let (catalog, request) = four_feasible_catalog();
    let key = fingerprint(&catalog, &request).expect("fingerprint");

    let cache = DirectoryCache::open(dir.path()).expect("cache");
    fs::write(cache.entry_path(&key), b"\x00garbage").expect("write");

    let mut engine = Engine::new(EngineConfig::default(), cache, MemoryHistory::new()).expect("engine");
    let report = engine.run(&catalog, &request, &CancelToken::new()).expect("run");
    assert!(!report.cache_hit);
    assert_eq!(report.results.len(), 4);

    let (cache, _) = engine.into_parts();
    let repaired = cache.get(&key).expect("get").expect("entry");
    assert_eq!(repaired.results, report.results);
}
