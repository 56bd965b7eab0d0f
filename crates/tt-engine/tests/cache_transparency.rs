mod common;

use common::{build_catalog, catalog_shape};
use proptest::prelude::*;
use tt_core::to_canonical_json_bytes;
use tt_engine::{
    generate_schedules, CancelToken, Engine, EngineConfig, MemoryCache, MemoryHistory,
    ScoringPolicy,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn warm_cache_returns_the_uncached_results(shape in catalog_shape(), limit in 1usize..8, gaps in 0.0f64..2.0) {
        let (catalog, request) = build_catalog(&shape, limit);
        let request = request.with_policy(ScoringPolicy::default().minimize_gaps(gaps));
        let expected = generate_schedules(&catalog, &request).expect("generate");

        let mut engine = Engine::new(EngineConfig::default(), MemoryCache::new(), MemoryHistory::new())
            .expect("engine");
        let cold = engine.run(&catalog, &request, &CancelToken::new()).expect("cold");
        let warm = engine.run(&catalog, &request, &CancelToken::new()).expect("warm");

        prop_assert!(!cold.cache_hit);
        prop_assert!(warm.cache_hit);
        prop_assert_eq!(&cold.results, &expected);
        prop_assert_eq!(&warm.results, &expected);
        prop_assert_eq!(&warm.schedules, &cold.schedules);
    }

    #[test]
    fn uncached_runs_serialize_identically(shape in catalog_shape(), limit in 1usize..8) {
        let (catalog, request) = build_catalog(&shape, limit);
        let first = generate_schedules(&catalog, &request).expect("generate");
        let second = generate_schedules(&catalog, &request).expect("generate");
        prop_assert_eq!(
            to_canonical_json_bytes(&first).expect("json"),
            to_canonical_json_bytes(&second).expect("json")
        );
    }
}
