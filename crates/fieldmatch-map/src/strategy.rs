//! Ordered chain of scoring heuristics for one (source, target) pair.
//!
//! Each strategy either answers with a definitive score or declines. The chain
//! is evaluated in priority order and the first answer wins; scores are never
//! summed or averaged across strategies.

use fieldmatch_model::{
    FieldDescriptor, StrategyKind, TargetDescriptor, TypeName, eq_ignore_case,
};

use crate::compat::TypeCompatibility;
use crate::lookup::{AliasLookup, DefaultMappingLookup};
use crate::similarity::similarity;

/// Pairs scoring at or below this value are noise and never reach the solver.
pub const NOISE_THRESHOLD: f32 = 0.1;

/// Highest score any strategy other than exact path may produce.
pub const MAX_FUZZY_SCORE: f32 = 0.99;

const NAME_SIMILARITY_WEIGHT: f32 = 0.80;
const COMPATIBLE_TYPE_BONUS: f32 = 0.10;
const INCOMPATIBLE_TYPE_FACTOR: f32 = 0.10;

/// Everything a strategy may look at when scoring one pair.
pub struct ScoringContext<'a> {
    pub source: &'a FieldDescriptor,
    pub target: &'a TargetDescriptor,
    /// Owning type of the captured source object.
    pub source_owner: &'a TypeName,
    /// Owning type of the target object, when known.
    pub target_owner: Option<&'a TypeName>,
    pub aliases: Option<&'a dyn AliasLookup>,
    pub defaults: Option<&'a dyn DefaultMappingLookup>,
    pub types: &'a dyn TypeCompatibility,
}

impl ScoringContext<'_> {
    fn types_compatible(&self, allow_numeric_widening: bool) -> bool {
        self.types.are_compatible(
            &self.source.type_name,
            &self.target.type_name,
            allow_numeric_widening,
        )
    }

    fn same_owner_type(&self) -> bool {
        self.target_owner == Some(self.source_owner)
    }
}

/// Result of asking one strategy about a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrategyOutcome {
    Decline,
    Score(f32),
}

/// Score of a pair together with the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    pub score: f32,
    pub strategy: StrategyKind,
}

impl PairScore {
    /// True when the pair clears the noise threshold.
    pub fn is_signal(&self) -> bool {
        self.score > NOISE_THRESHOLD
    }
}

type StrategyFn = fn(&ScoringContext<'_>) -> StrategyOutcome;

/// Strategies in priority order.
pub const STRATEGY_CHAIN: &[(StrategyKind, StrategyFn)] = &[
    (StrategyKind::ExactPath, exact_path),
    (StrategyKind::ExactName, exact_name),
    (StrategyKind::UserAlias, user_alias),
    (StrategyKind::DefaultMapping, default_mapping),
    (StrategyKind::FormerName, former_name),
    (StrategyKind::NameSimilarity, name_similarity),
];

/// Runs the chain and returns the first answer.
pub fn score_pair(ctx: &ScoringContext<'_>) -> PairScore {
    for (kind, strategy) in STRATEGY_CHAIN {
        if let StrategyOutcome::Score(score) = strategy(ctx) {
            return PairScore {
                score,
                strategy: *kind,
            };
        }
    }
    // name_similarity never declines
    PairScore {
        score: 0.0,
        strategy: StrategyKind::NameSimilarity,
    }
}

/// Shared shape of the name-equivalence strategies: decline unless the
/// condition holds, then answer with the compatible or incompatible score.
fn score_if(
    ctx: &ScoringContext<'_>,
    condition: bool,
    compatible: f32,
    incompatible: f32,
    allow_numeric_widening: bool,
) -> StrategyOutcome {
    if !condition {
        return StrategyOutcome::Decline;
    }
    if ctx.types_compatible(allow_numeric_widening) {
        StrategyOutcome::Score(compatible)
    } else {
        StrategyOutcome::Score(incompatible)
    }
}

/// Identical paths: a perfect match regardless of types.
pub fn exact_path(ctx: &ScoringContext<'_>) -> StrategyOutcome {
    if ctx.source.path == ctx.target.path {
        StrategyOutcome::Score(1.0)
    } else {
        StrategyOutcome::Decline
    }
}

pub fn exact_name(ctx: &ScoringContext<'_>) -> StrategyOutcome {
    let condition = eq_ignore_case(&ctx.source.display_name, &ctx.target.display_name);
    let compatible = if ctx.same_owner_type() { 1.0 } else { 0.98 };
    score_if(ctx, condition, compatible, 0.90, false)
}

pub fn user_alias(ctx: &ScoringContext<'_>) -> StrategyOutcome {
    let condition = ctx.aliases.is_some_and(|aliases| {
        aliases
            .alias_for(ctx.source_owner, &ctx.source.display_name)
            .is_some_and(|alias| eq_ignore_case(&alias, &ctx.target.display_name))
    });
    score_if(ctx, condition, 0.95, 0.75, true)
}

pub fn default_mapping(ctx: &ScoringContext<'_>) -> StrategyOutcome {
    let condition = ctx.defaults.is_some_and(|defaults| {
        defaults.is_default_mapping(&ctx.source.display_name, &ctx.target.display_name)
    });
    score_if(ctx, condition, 0.92, 0.70, true)
}

pub fn former_name(ctx: &ScoringContext<'_>) -> StrategyOutcome {
    let target_path = ctx.target.path.as_str();
    let bare_name = ctx.target.bare_name();
    let condition = ctx
        .source
        .former_names
        .iter()
        .filter(|name| !name.is_empty())
        .any(|name| bare_name == name || target_path.ends_with(name.as_str()));
    score_if(ctx, condition, 0.90, 0.65, false)
}

/// Fallback that always answers: weighted name similarity with a type bonus
/// or penalty, capped below a perfect score.
pub fn name_similarity(ctx: &ScoringContext<'_>) -> StrategyOutcome {
    let mut score =
        similarity(&ctx.source.display_name, &ctx.target.display_name) * NAME_SIMILARITY_WEIGHT;
    if ctx.types_compatible(false) {
        score += COMPATIBLE_TYPE_BONUS;
    } else {
        score *= INCOMPATIBLE_TYPE_FACTOR;
    }
    StrategyOutcome::Score(score.min(MAX_FUZZY_SCORE))
}
