//! Match records produced by a matching run.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::{FieldDescriptor, TargetDescriptor};
use crate::ids::FieldPath;
use crate::options::SolverKind;

/// Scoring heuristic that produced a pair's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    ExactPath,
    ExactName,
    UserAlias,
    DefaultMapping,
    FormerName,
    NameSimilarity,
}

impl StrategyKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ExactPath => "exact path",
            Self::ExactName => "exact name",
            Self::UserAlias => "user alias",
            Self::DefaultMapping => "default mapping",
            Self::FormerName => "former name",
            Self::NameSimilarity => "name similarity",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A source field paired with a target field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub source: FieldDescriptor,
    pub target: TargetDescriptor,
    /// Score in (0.1, 1.0] that won this pairing.
    pub score: f32,
    pub strategy: StrategyKind,
}

/// Confidence buckets used when presenting matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Weak match, most likely from name similarity alone.
    Low,
    /// Plausible match that deserves a look.
    Medium,
    /// Near-certain match.
    High,
}

impl ConfidenceLevel {
    /// Buckets a score: `>= 0.95` high, `>= 0.80` medium, anything else low.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        if score >= 0.95 {
            Self::High
        } else if score >= 0.80 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Outcome of one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Solver that produced the assignment.
    pub solver: SolverKind,
    /// Matches sorted by descending score.
    pub matches: Vec<Match>,
    /// Source paths left without a target, in capture order.
    pub unmatched_sources: Vec<FieldPath>,
    /// Target paths no source was assigned to, in declaration order.
    pub unmatched_targets: Vec<FieldPath>,
}

impl MatchReport {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Sum of the scores of all matches.
    #[must_use]
    pub fn total_score(&self) -> f32 {
        self.matches.iter().map(|m| m.score).sum()
    }

    #[must_use]
    pub fn min_score(&self) -> Option<f32> {
        self.matches
            .iter()
            .map(|m| m.score)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    #[must_use]
    pub fn mean_score(&self) -> Option<f32> {
        if self.matches.is_empty() {
            return None;
        }
        Some(self.total_score() / self.matches.len() as f32)
    }

    /// Number of matches in each confidence bucket.
    #[must_use]
    pub fn count_by_level(&self) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for m in &self.matches {
            *counts.entry(ConfidenceLevel::from_score(m.score)).or_insert(0) += 1;
        }
        counts
    }

    /// Finds the match for a source path.
    pub fn match_for_source(&self, path: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.source.path.as_str() == path)
    }
}
