//! End-to-end runs of the GA stream and the baseline searches.

use proptest::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use u_tsp::aco::AcoConfig;
use u_tsp::fitness::fitness;
use u_tsp::ga::{select_parents, Crossover, GaConfig, GaRunner, StopReason};
use u_tsp::random::create_rng;
use u_tsp::sa::SaConfig;
use u_tsp::search::{SearchConfig, SearchRunner};
use u_tsp::{DistanceMatrix, ProgressRecord, RouteLayout, TspError};

fn line4() -> DistanceMatrix {
    DistanceMatrix::new(vec![
        vec![0.0, 1.0, 2.0, 3.0],
        vec![1.0, 0.0, 1.0, 2.0],
        vec![2.0, 1.0, 0.0, 1.0],
        vec![3.0, 2.0, 1.0, 0.0],
    ])
    .unwrap()
}

fn matrix_strategy() -> impl Strategy<Value = DistanceMatrix> {
    (2usize..9).prop_flat_map(|n| {
        proptest::collection::vec(0.5f64..50.0, n * n).prop_map(move |raw| {
            let rows = (0..n)
                .map(|i| (0..n).map(|j| if i == j { 0.0 } else { raw[i * n + j] }).collect())
                .collect();
            DistanceMatrix::new(rows).unwrap()
        })
    })
}

fn crossover_strategy() -> impl Strategy<Value = Crossover> {
    prop_oneof![Just(Crossover::None), Just(Crossover::Pmx), Just(Crossover::Ox)]
}

// ---- Concrete scenarios ----

#[test]
fn four_city_fitness_is_one_sixth() {
    let f = fitness(&[0, 1, 2, 3], &line4()).unwrap();
    assert!((f - 1.0 / 6.0).abs() < 1e-12);
}

#[test]
fn select_two_parents_from_four() {
    let population = vec![vec![0, 1, 2, 3], vec![0, 2, 1, 3], vec![0, 3, 2, 1], vec![0, 1, 3, 2]];
    let mut rng = create_rng(5);
    let parents = select_parents(&population, &[1.0, 2.0, 3.0, 4.0], 2, &mut rng).unwrap();
    assert_eq!(parents.len(), 2);
    for p in &parents {
        assert!(population.contains(p));
    }
}

#[test]
fn zero_fitness_sum_is_invalid_state() {
    let population = vec![vec![0, 1], vec![1, 0]];
    let mut rng = create_rng(5);
    let err = select_parents(&population, &[0.0, 0.0], 2, &mut rng).unwrap_err();
    assert!(matches!(err, TspError::InvalidState(_)));
}

#[test]
fn malformed_matrix_rejected() {
    assert!(matches!(
        DistanceMatrix::new(vec![vec![0.0, 1.0], vec![1.0, 1.0]]),
        Err(TspError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        DistanceMatrix::new(vec![vec![0.0, -1.0], vec![1.0, 0.0]]),
        Err(TspError::InvalidConfiguration(_))
    ));
}

#[test]
fn both_crossover_flags_rejected() {
    assert!(matches!(
        Crossover::from_flags(true, true),
        Err(TspError::InvalidConfiguration(_))
    ));
}

#[test]
fn comparison_suite_runs() {
    let matrix = line4();
    for (name, config) in GaConfig::comparison_suite() {
        let config = config
            .with_population_size(10)
            .with_max_generations(30)
            .with_parallel(false)
            .with_seed(11);
        let result = GaRunner::run(&matrix, &config).unwrap();
        assert!(result.best.is_some(), "{name} produced no record");
    }
}

#[test]
fn ga_never_beats_exhaustive_search() {
    let matrix = DistanceMatrix::new(vec![
        vec![0.0, 3.0, 8.0, 2.0, 7.0, 5.0],
        vec![4.0, 0.0, 1.0, 9.0, 5.0, 6.0],
        vec![6.0, 2.0, 0.0, 4.0, 3.0, 2.0],
        vec![1.0, 7.0, 5.0, 0.0, 6.0, 4.0],
        vec![2.0, 8.0, 4.0, 3.0, 0.0, 1.0],
        vec![5.0, 3.0, 6.0, 2.0, 4.0, 0.0],
    ])
    .unwrap();
    let optimal = SearchRunner::run(SearchRunner::a_star(&matrix, &SearchConfig::default()).unwrap())
        .best
        .unwrap()
        .distance;
    let uniform = SearchRunner::run(SearchRunner::best_first(&matrix, &SearchConfig::default()).unwrap())
        .best
        .unwrap()
        .distance;
    assert!((optimal - uniform).abs() < 1e-9);

    let config = GaConfig::default()
        .with_population_size(30)
        .with_crossover(Crossover::Ox)
        .with_elitism(true)
        .with_max_generations(100)
        .with_seed(3);
    let ga = GaRunner::run(&matrix, &config).unwrap().best.unwrap();
    assert!(ga.distance >= optimal - 1e-9);
}

#[test]
fn cancelled_run_reports_cancel() {
    let matrix = line4();
    let cancel = Arc::new(AtomicBool::new(true));
    let result = GaRunner::run_with_cancel(&matrix, &GaConfig::default(), Some(cancel)).unwrap();
    assert_eq!(result.stop_reason, StopReason::Cancelled);
    assert!(result.best.is_none());
}

// ---- Run invariants ----

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ga_records_are_valid_and_monotone(
        matrix in matrix_strategy(),
        crossover in crossover_strategy(),
        elitism in any::<bool>(),
        aco in any::<bool>(),
        sa in any::<bool>(),
        anchored in any::<bool>(),
        k in 1usize..6,
        seed in any::<u64>(),
    ) {
        let n = matrix.size();
        let layout = if anchored { RouteLayout::Anchored { home: 0 } } else { RouteLayout::Cycle };
        let mut config = GaConfig::default()
            .with_population_size(8)
            .with_mutation_rate(0.1)
            .with_crossover(crossover)
            .with_elitism(elitism)
            .with_no_improvement_generations(k)
            .with_max_generations(60)
            .with_home_city(layout.home())
            .with_parallel(false)
            .with_seed(seed);
        if aco {
            config = config.with_aco(AcoConfig::default());
        }
        if sa {
            config = config.with_sa(SaConfig::default().with_iterations(20));
        }

        let mut stream = GaRunner::stream(&matrix, &config).unwrap();
        let records: Vec<ProgressRecord> = stream.by_ref().map(|r| r.unwrap()).collect();
        prop_assert!(!records.is_empty());

        for rec in &records {
            prop_assert!(layout.validate(&rec.route, n).is_ok());
            prop_assert!(rec.fitness > 0.0);
        }
        for w in records.windows(2) {
            prop_assert!(w[1].fitness >= w[0].fitness);
            prop_assert_eq!(w[1].generation, w[0].generation + 1);
        }

        // The trailing non-improving run never exceeds k.
        let trailing = records
            .windows(2)
            .rev()
            .take_while(|w| w[1].fitness <= w[0].fitness)
            .count();
        prop_assert!(trailing <= k);
        prop_assert!(stream.stop_reason().is_some());
    }

    #[test]
    fn a_star_matches_best_first(matrix in matrix_strategy(), start in 0usize..8) {
        let start = start % matrix.size();
        let config = SearchConfig::default().with_start_city(start);
        let a = SearchRunner::run(SearchRunner::a_star(&matrix, &config).unwrap());
        let b = SearchRunner::run(SearchRunner::best_first(&matrix, &config).unwrap());
        let (a, b) = (a.best.unwrap(), b.best.unwrap());
        prop_assert!((a.distance - b.distance).abs() < 1e-9);
        let layout = RouteLayout::Anchored { home: start };
        prop_assert!(layout.validate(&a.route, matrix.size()).is_ok());
    }
}
