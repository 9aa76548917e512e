//! Solver selection passed explicitly to every matching run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Assignment algorithm used to turn pair scores into a one-to-one matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Sort candidate pairs by score and take them greedily. Fast, not always optimal.
    #[default]
    Greedy,
    /// Hungarian (Munkres) algorithm. Optimal total score, O(n³).
    Hungarian,
}

impl SolverKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Hungarian => "hungarian",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-call solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub solver: SolverKind,
}

impl SolverConfig {
    #[must_use]
    pub fn exact() -> Self {
        Self {
            solver: SolverKind::Hungarian,
        }
    }

    #[must_use]
    pub fn greedy() -> Self {
        Self {
            solver: SolverKind::Greedy,
        }
    }

    /// Builds the config from the boolean switch used by callers.
    #[must_use]
    pub fn from_exact_flag(use_exact_solver: bool) -> Self {
        if use_exact_solver {
            Self::exact()
        } else {
            Self::greedy()
        }
    }

    #[must_use]
    pub fn use_exact_solver(&self) -> bool {
        self.solver == SolverKind::Hungarian
    }
}
