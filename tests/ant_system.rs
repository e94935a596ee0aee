use aco_tsp::{
    AcoConfig, DistanceMatrix, OptimizerState, Termination, Tour, solve, solve_with_rng,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn from_points(points: &[(f64, f64)]) -> DistanceMatrix {
    let rows = points
        .iter()
        .map(|a| {
            points
                .iter()
                .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                .collect()
        })
        .collect();
    DistanceMatrix::new(rows).unwrap()
}

fn unit_square() -> DistanceMatrix {
    from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
}

fn brute_force_optimum(dist: &DistanceMatrix) -> f64 {
    fn extend(dist: &DistanceMatrix, tour: &mut Vec<usize>, used: &mut [bool], best: &mut f64) {
        let n = used.len();
        if tour.len() == n {
            *best = best.min(Tour::new(tour.clone()).length(dist));
            return;
        }
        for city in 1..n {
            if !used[city] {
                used[city] = true;
                tour.push(city);
                extend(dist, tour, used, best);
                tour.pop();
                used[city] = false;
            }
        }
    }
    let n = dist.len();
    let mut used = vec![false; n];
    used[0] = true;
    let mut best = f64::INFINITY;
    extend(dist, &mut vec![0], &mut used, &mut best);
    best
}

/// Stable-iteration counter after each entry of a convergence history.
fn stable_counts(history: &[f64]) -> Vec<usize> {
    let mut counts = Vec::with_capacity(history.len());
    let mut stable = 0;
    for (t, &h) in history.iter().enumerate() {
        if t == 0 || h < history[t - 1] {
            stable = 0;
        } else {
            stable += 1;
        }
        counts.push(stable);
    }
    counts
}

#[test]
fn unit_square_finds_perimeter_tour() {
    let config = AcoConfig {
        num_ants: Some(4),
        alpha: 1.0,
        beta: 2.0,
        rho: 0.5,
        q: 1.0,
        max_iterations: 50,
        seed: Some(1),
        ..AcoConfig::default()
    };
    let solution = solve(&unit_square(), &config).unwrap();

    assert!((solution.best_length - 4.0).abs() < 1e-9);
    assert_eq!(solution.best_tour.canonical(), Tour::new(vec![0, 1, 2, 3]));
    assert_eq!(solution.history.last().copied(), Some(solution.best_length));
}

#[test]
fn fixed_seed_is_reproducible() {
    let points: Vec<(f64, f64)> = (0..12)
        .map(|k| ((k * 37 % 11) as f64, (k * 53 % 13) as f64))
        .collect();
    let dist = from_points(&points);
    let config = AcoConfig {
        max_iterations: 40,
        convergence_threshold: 15,
        ..AcoConfig::default().with_seed(2024)
    };

    let first = solve(&dist, &config).unwrap();
    let second = solve(&dist, &config).unwrap();
    assert_eq!(first.best_tour, second.best_tour);
    assert_eq!(first.best_length, second.best_length);
    assert_eq!(first.history, second.history);
}

#[test]
fn stops_exactly_after_threshold_stable_iterations() {
    let dist = unit_square();
    for threshold in [1, 3, 10] {
        let config = AcoConfig {
            max_iterations: 1000,
            convergence_threshold: threshold,
            ..AcoConfig::default().with_seed(7)
        };
        let solution = solve(&dist, &config).unwrap();
        assert_eq!(solution.termination, Termination::Converged);

        let counts = stable_counts(&solution.history);
        assert_eq!(counts.last().copied(), Some(threshold));
        assert!(counts[..counts.len() - 1].iter().all(|&c| c < threshold));
        assert_eq!(solution.iterations, solution.history.len());
    }
}

#[test]
fn history_is_bounded_by_optimum() {
    let points = [
        (0.0, 0.0),
        (3.0, 1.0),
        (6.0, 0.0),
        (7.0, 4.0),
        (4.0, 6.0),
        (1.0, 5.0),
        (2.0, 3.0),
        (5.0, 3.0),
    ];
    let dist = from_points(&points);
    let optimum = brute_force_optimum(&dist);
    let config = AcoConfig {
        max_iterations: 100,
        convergence_threshold: 30,
        beta: 3.0,
        ..AcoConfig::default().with_seed(5)
    };
    let solution = solve(&dist, &config).unwrap();

    for pair in solution.history.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
    for &h in &solution.history {
        assert!(h >= optimum - 1e-9, "{} below optimum {}", h, optimum);
    }
}

#[test]
fn injected_generator_drives_the_run() {
    let dist = unit_square();
    let config = AcoConfig {
        max_iterations: 10,
        ..AcoConfig::default()
    };
    let a = solve_with_rng(&dist, &config, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
    let b = solve_with_rng(&dist, &config, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn zero_distances_do_not_break_the_run() {
    // cities 0 and 1 coincide
    let dist = from_points(&[(0.0, 0.0), (0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
    let config = AcoConfig {
        max_iterations: 30,
        ..AcoConfig::default().with_seed(9)
    };
    let solution = solve(&dist, &config).unwrap();
    assert!(solution.best_tour.is_permutation_of(5));
    assert!(solution.best_length.is_finite());
    assert!((solution.best_length - 8.0).abs() < 1e-9);
}

fn matrix_strategy() -> impl Strategy<Value = DistanceMatrix> {
    (2usize..9).prop_flat_map(|n| {
        prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), n)
            .prop_map(|points| from_points(&points))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: returned tours are permutations and their reported length matches.
    #[test]
    fn prop_best_tour_is_valid(dist in matrix_strategy(), seed in any::<u64>()) {
        let config = AcoConfig {
            max_iterations: 15,
            convergence_threshold: 5,
            ..AcoConfig::default().with_seed(seed)
        };
        let solution = solve(&dist, &config).unwrap();
        prop_assert!(solution.best_tour.is_permutation_of(dist.len()));
        let recomputed = solution.best_tour.length(&dist);
        prop_assert!((recomputed - solution.best_length).abs() <= 1e-9 * recomputed.max(1.0));
        prop_assert_eq!(solution.history.len(), solution.iterations);
    }

    /// Property: pheromone trails stay symmetric and positive after every iteration.
    #[test]
    fn prop_pheromone_symmetric_and_positive(
        dist in matrix_strategy(),
        seed in any::<u64>(),
        rho in 0.05f64..=1.0,
        steps in 1usize..25,
    ) {
        let config = AcoConfig { rho, ..AcoConfig::default() };
        let mut state = OptimizerState::new(dist.len(), config.initial_pheromone);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..steps {
            let batch = state.step(&dist, &config, &mut rng).unwrap();
            for tour in &batch.tours {
                prop_assert!(tour.is_permutation_of(dist.len()));
            }
            prop_assert!(state.pheromone.is_symmetric());
            prop_assert!(state.pheromone.min_value() > 0.0);
        }
    }

    /// Property: the convergence history never increases.
    #[test]
    fn prop_history_non_increasing(dist in matrix_strategy(), seed in any::<u64>()) {
        let config = AcoConfig {
            max_iterations: 20,
            ..AcoConfig::default().with_seed(seed)
        };
        let solution = solve(&dist, &config).unwrap();
        for pair in solution.history.windows(2) {
            prop_assert!(pair[1] <= pair[0]);
        }
    }
}
