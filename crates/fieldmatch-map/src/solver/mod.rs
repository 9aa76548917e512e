//! Weighted bipartite assignment.
//!
//! Both solvers share one contract: given an `n × m` cost matrix where lower
//! is better and a non-finite entry forbids the pair, return for every row
//! either the column it is assigned to or `None`. No column is used twice, no
//! forbidden pair is ever returned, and a row whose costs are all forbidden is
//! always left unassigned.

mod greedy;
mod hungarian;

pub use greedy::GreedySolver;
pub use hungarian::HungarianSolver;

use fieldmatch_model::SolverKind;

/// Row-to-column assignment; `None` marks an unassigned row.
pub type Assignment = Vec<Option<usize>>;

/// Solves the assignment problem for one cost matrix.
pub trait AssignmentSolver {
    fn solve(&self, cost: &CostMatrix) -> Assignment;
}

/// Returns the solver selected by configuration.
pub fn solver_for(kind: SolverKind) -> &'static dyn AssignmentSolver {
    match kind {
        SolverKind::Greedy => &GreedySolver,
        SolverKind::Hungarian => &HungarianSolver,
    }
}

/// Dense row-major cost matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// A matrix in which every pair is forbidden.
    pub fn forbidden(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![f64::INFINITY; rows * cols],
        }
    }

    /// Builds a matrix from rows of equal length.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|row| row.len() == cols),
            "cost matrix rows must have equal length"
        );
        Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, cost: f64) {
        self.data[row * self.cols + col] = cost;
    }

    /// True when the pair may appear in an assignment.
    pub fn is_allowed(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_finite()
    }

    /// Sum of the costs of all assigned pairs.
    pub fn total_cost(&self, assignment: &[Option<usize>]) -> f64 {
        assignment
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|col| self.get(row, col)))
            .sum()
    }
}

/// Checks the shared solver contract. Used by tests of both solvers.
pub fn is_valid_assignment(cost: &CostMatrix, assignment: &[Option<usize>]) -> bool {
    if assignment.len() != cost.rows() {
        return false;
    }
    let mut used = vec![false; cost.cols()];
    for (row, col) in assignment.iter().enumerate() {
        let Some(col) = *col else { continue };
        if col >= cost.cols() || used[col] || !cost.is_allowed(row, col) {
            return false;
        }
        used[col] = true;
    }
    true
}
