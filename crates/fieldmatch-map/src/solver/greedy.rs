use super::{Assignment, AssignmentSolver, CostMatrix};

/// Takes the cheapest remaining allowed pair until none is left.
///
/// `O(nm log nm)`. Pairs with equal cost keep row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl AssignmentSolver for GreedySolver {
    fn solve(&self, cost: &CostMatrix) -> Assignment {
        let (rows, cols) = (cost.rows(), cost.cols());
        let mut candidates: Vec<(usize, usize, f64)> = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .filter(|&(row, col)| cost.is_allowed(row, col))
            .map(|(row, col)| (row, col, cost.get(row, col)))
            .collect();
        candidates.sort_by(|a, b| a.2.total_cmp(&b.2));

        let mut assignment = vec![None; rows];
        let mut taken = vec![false; cols];
        for (row, col, _) in candidates {
            if assignment[row].is_none() && !taken[col] {
                assignment[row] = Some(col);
                taken[col] = true;
            }
        }
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_resolve_in_row_major_order() {
        let cost = CostMatrix::from_rows(vec![vec![-0.5, -0.5], vec![-0.5, -0.5]]);
        assert_eq!(GreedySolver.solve(&cost), vec![Some(0), Some(1)]);
    }

    #[test]
    fn contested_column_goes_to_cheapest_row() {
        let cost = CostMatrix::from_rows(vec![vec![-0.6], vec![-0.8]]);
        assert_eq!(GreedySolver.solve(&cost), vec![None, Some(0)]);
    }
}
