use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, info_span};

use fieldmatch_map::{
    AliasStore, ApplyReport, MatcherSettings, MatchingEngine, Schema, SynonymTable, TypeHierarchy,
    ValueCodec, apply_matches, capture, describe_targets,
};
use fieldmatch_model::{MatchReport, SolverConfig, SolverKind, TypeName};

use crate::cli::{AliasArgs, AliasCommand, DefaultsArgs, MatchArgs};

/// Result of a `match` run.
pub struct MatchOutcome {
    pub report: MatchReport,
    /// Apply report and the file the target document was written to.
    pub applied: Option<(ApplyReport, PathBuf)>,
}

impl MatchOutcome {
    pub fn has_skipped(&self) -> bool {
        self.applied
            .as_ref()
            .is_some_and(|(report, _)| !report.is_complete())
    }
}

pub fn run_match(args: &MatchArgs) -> Result<MatchOutcome> {
    let settings = match &args.settings {
        Some(path) => MatcherSettings::load(path)?,
        None => MatcherSettings::default(),
    };
    let schema = Schema::load(&args.schema)?;
    let source_type = TypeName::new(args.source_type.as_str())?;
    let target_type = TypeName::new(args.target_type.as_str())?;

    let run_span = info_span!("match", source = %source_type, target = %target_type);
    let _run_guard = run_span.enter();

    let source = read_json(&args.source)?;
    let captured = capture(&schema, &source_type, &source)?;
    let targets = describe_targets(&schema, &target_type)?;
    debug!(
        sources = captured.len(),
        targets = targets.len(),
        "described fields"
    );

    let solver = if args.exact {
        SolverKind::Hungarian
    } else if args.greedy {
        SolverKind::Greedy
    } else {
        settings.solver
    };
    let types = TypeHierarchy::from_schema(&schema);
    let defaults = if args.no_defaults {
        None
    } else {
        settings.default_mappings()
    };
    let aliases = args
        .aliases
        .clone()
        .or_else(|| settings.aliases_path.clone())
        .map(AliasStore::open)
        .transpose()?;

    let mut engine = MatchingEngine::new(&types, SolverConfig { solver });
    if let Some(aliases) = &aliases {
        engine = engine.with_aliases(aliases);
    }
    if let Some(defaults) = &defaults {
        engine = engine.with_defaults(defaults);
    }
    let report = engine.run(&captured, &targets);
    info!(
        matched = report.matches.len(),
        unmatched = report.unmatched_sources.len(),
        "matching complete"
    );

    let applied = match (&args.target, &args.output) {
        (None, None) => None,
        (target, output) => {
            let mut document = match target {
                Some(path) => read_json(path)?,
                None => Value::Object(serde_json::Map::new()),
            };
            let apply_report = apply_matches(&report.matches, &ValueCodec::default(), &mut document);
            let destination = output
                .clone()
                .or_else(|| target.clone())
                .context("no output file for the updated target")?;
            write_json(&destination, &document)?;
            Some((apply_report, destination))
        }
    };

    Ok(MatchOutcome { report, applied })
}

pub fn run_alias(args: &AliasArgs) -> Result<()> {
    let mut store = AliasStore::open(args.store.as_path())?;
    match &args.action {
        AliasCommand::Add {
            owner,
            source,
            target,
        } => {
            let owner = TypeName::new(owner.as_str())?;
            match store.add(owner.clone(), source.as_str(), target.as_str()) {
                Some(previous) => {
                    println!("{owner}.{source}: {previous} -> {target}");
                }
                None => println!("{owner}.{source} -> {target}"),
            }
            store.save()?;
        }
        AliasCommand::Remove { owner, source } => {
            let owner = TypeName::new(owner.as_str())?;
            if store.remove(&owner, source) {
                store.save()?;
                println!("Removed alias for {owner}.{source}");
            } else {
                println!("No alias for {owner}.{source}");
            }
        }
        AliasCommand::List => fieldmatch_cli::summary::print_aliases(store.list()),
    }
    Ok(())
}

pub fn run_defaults(args: &DefaultsArgs) {
    let table = if args.one_way {
        SynonymTable::builtin_one_way()
    } else {
        SynonymTable::builtin()
    };
    fieldmatch_cli::summary::print_defaults(&table);
}

fn read_json(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
