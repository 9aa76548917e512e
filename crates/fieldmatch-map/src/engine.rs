//! Matching coordinator.
//!
//! A run scores every (source, target) pair through the strategy chain,
//! drops noise, builds a cost matrix from the surviving scores, hands it to
//! the configured solver and turns the assignment back into [`Match`]es.

use std::cmp::Ordering;

use tracing::{debug, info_span, trace};

use fieldmatch_model::{
    CapturedFieldSet, FieldDescriptor, Match, MatchReport, SolverConfig, TargetDescriptor,
    TargetSet, TypeName,
};

use crate::compat::TypeCompatibility;
use crate::lookup::{AliasLookup, DefaultMappingLookup};
use crate::solver::{CostMatrix, solver_for};
use crate::strategy::{PairScore, ScoringContext, score_pair};

/// Runs matching with injected lookups and a per-call solver choice.
///
/// The engine only reads its lookups; it holds no state between runs, so one
/// engine can serve any number of runs.
pub struct MatchingEngine<'a> {
    types: &'a dyn TypeCompatibility,
    aliases: Option<&'a dyn AliasLookup>,
    defaults: Option<&'a dyn DefaultMappingLookup>,
    config: SolverConfig,
}

impl<'a> MatchingEngine<'a> {
    pub fn new(types: &'a dyn TypeCompatibility, config: SolverConfig) -> Self {
        Self {
            types,
            aliases: None,
            defaults: None,
            config,
        }
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: &'a dyn AliasLookup) -> Self {
        self.aliases = Some(aliases);
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: &'a dyn DefaultMappingLookup) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn config(&self) -> SolverConfig {
        self.config
    }

    /// Scores a single pair without solving.
    pub fn score(
        &self,
        source: &FieldDescriptor,
        target: &TargetDescriptor,
        source_owner: &TypeName,
        target_owner: Option<&TypeName>,
    ) -> PairScore {
        score_pair(&ScoringContext {
            source,
            target,
            source_owner,
            target_owner,
            aliases: self.aliases,
            defaults: self.defaults,
            types: self.types,
        })
    }

    /// Matches captured sources against candidate targets.
    ///
    /// Matches come back sorted by descending score; equal scores keep source
    /// order. Running twice on the same input yields the same result.
    pub fn find_matches(&self, sources: &CapturedFieldSet, targets: &TargetSet) -> Vec<Match> {
        let span = info_span!(
            "match_run",
            owner = %sources.owner_type(),
            sources = sources.len(),
            targets = targets.len(),
            solver = %self.config.solver,
        );
        let _guard = span.enter();

        if sources.is_empty() || targets.is_empty() {
            debug!("nothing to match");
            return Vec::new();
        }

        let (scores, cost) = self.score_all(sources, targets);
        let assignment = solver_for(self.config.solver).solve(&cost);

        let mut matches: Vec<Match> = assignment
            .iter()
            .enumerate()
            .filter_map(|(row, col)| {
                let col = (*col)?;
                let pair = scores[row][col]?;
                Some(Match {
                    source: sources.fields()[row].clone(),
                    target: targets.fields()[col].clone(),
                    score: pair.score,
                    strategy: pair.strategy,
                })
            })
            .collect();
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        debug!(matched = matches.len(), "matching finished");
        matches
    }

    /// Like [`find_matches`](Self::find_matches) but also reports what stayed
    /// unmatched on either side.
    pub fn run(&self, sources: &CapturedFieldSet, targets: &TargetSet) -> MatchReport {
        let matches = self.find_matches(sources, targets);
        let unmatched_sources = sources
            .fields()
            .iter()
            .filter(|f| !matches.iter().any(|m| m.source.path == f.path))
            .map(|f| f.path.clone())
            .collect();
        let unmatched_targets = targets
            .fields()
            .iter()
            .filter(|t| !matches.iter().any(|m| m.target.path == t.path))
            .map(|t| t.path.clone())
            .collect();
        MatchReport {
            solver: self.config.solver,
            matches,
            unmatched_sources,
            unmatched_targets,
        }
    }

    /// Scores all pairs. Noise pairs are kept out of both the score table and
    /// the cost matrix.
    fn score_all(
        &self,
        sources: &CapturedFieldSet,
        targets: &TargetSet,
    ) -> (Vec<Vec<Option<PairScore>>>, CostMatrix) {
        let mut cost = CostMatrix::forbidden(sources.len(), targets.len());
        let mut scores = vec![vec![None; targets.len()]; sources.len()];
        let mut kept = 0_usize;

        for (row, source) in sources.fields().iter().enumerate() {
            for (col, target) in targets.fields().iter().enumerate() {
                let pair = self.score(source, target, sources.owner_type(), targets.owner_type());
                trace!(
                    source = %source.path,
                    target = %target.path,
                    score = pair.score,
                    strategy = %pair.strategy,
                    "scored pair"
                );
                if pair.is_signal() {
                    cost.set(row, col, -f64::from(pair.score));
                    scores[row][col] = Some(pair);
                    kept += 1;
                }
            }
        }

        debug!(
            kept,
            discarded = sources.len() * targets.len() - kept,
            "pair scoring finished"
        );
        (scores, cost)
    }
}

/// One-shot entry point: matches `sources` against `targets` with the given
/// lookups.
pub fn match_fields(
    sources: &CapturedFieldSet,
    targets: &TargetSet,
    aliases: Option<&dyn AliasLookup>,
    defaults: Option<&dyn DefaultMappingLookup>,
    types: &dyn TypeCompatibility,
    use_exact_solver: bool,
) -> Vec<Match> {
    let engine = MatchingEngine {
        types,
        aliases,
        defaults,
        config: SolverConfig::from_exact_flag(use_exact_solver),
    };
    engine.find_matches(sources, targets)
}

#[cfg(test)]
mod tests {
    use fieldmatch_model::{EncodedValue, FieldPath, StrategyKind};

    use super::*;
    use crate::compat::TypeHierarchy;

    fn ty(name: &str) -> TypeName {
        TypeName::new(name).unwrap()
    }

    fn source(path: &str, type_name: &str) -> FieldDescriptor {
        FieldDescriptor::new(
            FieldPath::new(path).unwrap(),
            path,
            ty(type_name),
            EncodedValue::null(ty(type_name)),
        )
    }

    fn target(path: &str, type_name: &str) -> TargetDescriptor {
        TargetDescriptor::new(FieldPath::new(path).unwrap(), path, ty(type_name))
    }

    #[test]
    fn empty_inputs_yield_no_matches() {
        let types = TypeHierarchy::new();
        let engine = MatchingEngine::new(&types, SolverConfig::exact());
        let sources = CapturedFieldSet::new(ty("A"), vec![source("x", "int")]).unwrap();
        let targets = TargetSet::new(None, Vec::new()).unwrap();
        assert!(engine.find_matches(&sources, &targets).is_empty());

        let report = engine.run(&sources, &targets);
        assert_eq!(report.unmatched_sources, vec![FieldPath::new("x").unwrap()]);
    }

    #[test]
    fn target_owner_upgrades_exact_name() {
        let types = TypeHierarchy::new();
        let engine = MatchingEngine::new(&types, SolverConfig::greedy());
        let sources = CapturedFieldSet::new(ty("Player"), vec![source("armor", "int")]).unwrap();
        let targets =
            TargetSet::new(Some(ty("Player")), vec![target("stats.armor", "int")]).unwrap();

        let matches = engine.find_matches(&sources, &targets);
        assert_eq!(matches.len(), 1);
        // display names are the paths here, so exact name cannot fire
        assert_eq!(matches[0].strategy, StrategyKind::NameSimilarity);

        let pair = engine.score(
            &sources.fields()[0],
            &TargetDescriptor::new(FieldPath::new("stats.armor").unwrap(), "armor", ty("int")),
            &ty("Player"),
            Some(&ty("Player")),
        );
        assert_eq!(pair.strategy, StrategyKind::ExactName);
        assert_eq!(pair.score, 1.0);
    }
}
