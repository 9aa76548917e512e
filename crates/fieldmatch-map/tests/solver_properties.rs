use fieldmatch_map::similarity;
use fieldmatch_map::solver::{
    AssignmentSolver, CostMatrix, GreedySolver, HungarianSolver, is_valid_assignment,
};
use proptest::prelude::*;

fn cost_matrix(max_side: usize) -> impl Strategy<Value = CostMatrix> {
    (1..=max_side, 1..=max_side).prop_flat_map(|(rows, cols)| {
        let cell = prop_oneof![3 => (-1.0_f64..0.0).prop_map(Some), 1 => Just(None)];
        prop::collection::vec(cell, rows * cols).prop_map(move |cells| {
            let mut matrix = CostMatrix::forbidden(rows, cols);
            for (index, cell) in cells.into_iter().enumerate() {
                if let Some(cost) = cell {
                    matrix.set(index / cols, index % cols, cost);
                }
            }
            matrix
        })
    })
}

/// Cheapest partial assignment by exhaustive search.
fn brute_force(cost: &CostMatrix, row: usize, used: &mut [bool]) -> f64 {
    if row == cost.rows() {
        return 0.0;
    }
    let mut best = brute_force(cost, row + 1, used);
    for col in 0..cost.cols() {
        if used[col] || !cost.is_allowed(row, col) {
            continue;
        }
        used[col] = true;
        best = best.min(cost.get(row, col) + brute_force(cost, row + 1, used));
        used[col] = false;
    }
    best
}

proptest! {
    #[test]
    fn assignments_respect_the_contract(cost in cost_matrix(7)) {
        let exact = HungarianSolver.solve(&cost);
        let greedy = GreedySolver.solve(&cost);
        prop_assert!(is_valid_assignment(&cost, &exact));
        prop_assert!(is_valid_assignment(&cost, &greedy));
    }

    #[test]
    fn exact_never_loses_to_greedy(cost in cost_matrix(7)) {
        let exact = cost.total_cost(&HungarianSolver.solve(&cost));
        let greedy = cost.total_cost(&GreedySolver.solve(&cost));
        prop_assert!(exact <= greedy + 1e-9, "exact {exact} greedy {greedy}");
    }

    #[test]
    fn exact_is_optimal_on_small_matrices(cost in cost_matrix(4)) {
        let exact = cost.total_cost(&HungarianSolver.solve(&cost));
        let optimum = brute_force(&cost, 0, &mut vec![false; cost.cols()]);
        prop_assert!((exact - optimum).abs() < 1e-9, "exact {exact} optimum {optimum}");
    }

    #[test]
    fn similarity_is_reflexive(s in "\\PC{0,12}") {
        prop_assert_eq!(similarity(&s, &s), 1.0);
    }

    #[test]
    fn similarity_is_symmetric_and_bounded(s in "[a-zA-Z_]{0,10}", t in "[a-zA-Z_]{0,10}") {
        let forward = similarity(&s, &t);
        prop_assert_eq!(forward, similarity(&t, &s));
        prop_assert!((0.0..=1.0).contains(&forward));
    }
}
