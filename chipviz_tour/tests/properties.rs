use chipviz_tour::{nearest_neighbor_order, path_length, TourBuilder, TourOptions};

/// Deterministic scattered points, a small LCG keeps the tests reproducible.
fn scattered(n: usize, seed: u64) -> Vec<[f64; 2]> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64 * 100.0
    };
    (0..n).map(|_| [next(), next()]).collect()
}

fn is_permutation(order: &[usize], n: usize) -> bool {
    let mut seen = vec![false; n];
    order.len() == n
        && order.iter().all(|&i| i < n && !std::mem::replace(&mut seen[i], true))
}

#[test]
fn tours_are_permutations() {
    for (n, seed) in [(1, 1), (2, 2), (3, 3), (4, 4), (17, 5), (60, 6)] {
        let points = scattered(n, seed);
        let tour = TourBuilder::default().build(&points);
        assert!(is_permutation(tour.as_slice(), n), "n = {n}");
        assert_eq!(tour[0], 0);
    }
}

#[test]
fn refinement_never_lengthens_the_route() {
    for seed in 10..20 {
        let points = scattered(35, seed);
        let initial = path_length(&nearest_neighbor_order(&points), &points);
        let (tour, stats) = TourBuilder::default().build_with_stats(&points);
        assert_eq!(stats.initial_length, initial);
        assert!(tour.length(&points) <= initial);
        assert!((tour.length(&points) - stats.refined_length).abs() < 1e-9);
    }
}

#[test]
fn result_is_a_local_optimum() {
    for seed in 30..36 {
        let points = scattered(30, seed);
        let tour = TourBuilder::default().build(&points);
        let route = tour.as_slice().to_vec();
        let best = path_length(&route, &points);
        let n = route.len();
        for i in 1..=n - 3 {
            for j in i + 2..n {
                let mut candidate = route.clone();
                candidate[i..j].reverse();
                assert!(
                    path_length(&candidate, &points) >= best - 1e-9,
                    "reversing {i}..{j} still improves"
                );
            }
        }
    }
}

#[test]
fn refinement_keeps_both_ends_of_the_route() {
    for seed in 40..60 {
        let points = scattered(12, seed);
        let initial = nearest_neighbor_order(&points);
        let tour = TourBuilder::default().build(&points);
        assert_eq!(tour[0], initial[0]);
        assert_eq!(tour[tour.len() - 1], initial[initial.len() - 1], "seed {seed}");
    }
}

#[test]
fn building_is_deterministic() {
    let points = scattered(50, 99);
    let a = TourBuilder::default().build(&points);
    let b = TourBuilder::default().build(&points);
    assert_eq!(a, b);
}

#[test]
fn capped_refinement_is_best_so_far() {
    let points = scattered(80, 7);
    let full = TourBuilder::default().build_with_stats(&points).1;
    let (capped_tour, capped) = TourBuilder::new(TourOptions {
        max_passes: Some(1),
    })
    .build_with_stats(&points);
    assert!(is_permutation(capped_tour.as_slice(), points.len()));
    assert!(capped.refined_length <= capped.initial_length);
    assert!(capped.passes <= 1);
    if full.passes > 1 {
        assert!(!capped.converged);
    }
}
