use tracing::trace;

use super::{Assignment, AssignmentSolver, CostMatrix};

/// Cost of leaving a row unmatched. Forbidden cells and the padding that
/// squares the matrix both carry it, so the optimal perfect matching of the
/// padded square is the cheapest partial matching of the input.
const UNMATCHED_COST: f64 = 0.0;

/// Exact minimum-cost assignment (Kuhn–Munkres with potentials).
///
/// Runs in `O(k³)` where `k = max(rows, cols)`. The total cost of its result
/// is never higher than what [`GreedySolver`](super::GreedySolver) returns for
/// the same matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl AssignmentSolver for HungarianSolver {
    fn solve(&self, cost: &CostMatrix) -> Assignment {
        let (rows, cols) = (cost.rows(), cost.cols());
        if rows == 0 || cols == 0 {
            return vec![None; rows];
        }

        let size = rows.max(cols);
        let padded = |row: usize, col: usize| -> f64 {
            if row < rows && col < cols && cost.is_allowed(row, col) {
                cost.get(row, col)
            } else {
                UNMATCHED_COST
            }
        };

        // 1-indexed; index 0 is the virtual column used while augmenting.
        let mut u = vec![0.0_f64; size + 1];
        let mut v = vec![0.0_f64; size + 1];
        let mut p = vec![0_usize; size + 1];
        let mut way = vec![0_usize; size + 1];

        for row in 1..=size {
            p[0] = row;
            let mut j0 = 0;
            let mut minv = vec![f64::INFINITY; size + 1];
            let mut used = vec![false; size + 1];
            let mut reached_free_column = true;

            loop {
                used[j0] = true;
                let i0 = p[j0];
                let mut delta = f64::INFINITY;
                let mut j1 = 0;
                for j in 1..=size {
                    if used[j] {
                        continue;
                    }
                    let reduced = padded(i0 - 1, j - 1) - u[i0] - v[j];
                    if reduced < minv[j] {
                        minv[j] = reduced;
                        way[j] = j0;
                    }
                    if minv[j] < delta {
                        delta = minv[j];
                        j1 = j;
                    }
                }
                if j1 == 0 || !delta.is_finite() {
                    reached_free_column = false;
                    break;
                }
                for j in 0..=size {
                    if used[j] {
                        u[p[j]] += delta;
                        v[j] -= delta;
                    } else {
                        minv[j] -= delta;
                    }
                }
                j0 = j1;
                if p[j0] == 0 {
                    break;
                }
            }

            if !reached_free_column {
                trace!(row, "no augmenting path, row left unassigned");
                continue;
            }
            loop {
                let j1 = way[j0];
                p[j0] = p[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }

        let mut assignment = vec![None; rows];
        for col in 1..=size {
            let row = p[col];
            if row == 0 || row > rows || col > cols {
                continue;
            }
            if cost.is_allowed(row - 1, col - 1) {
                assignment[row - 1] = Some(col - 1);
            }
        }
        assignment
    }
}
