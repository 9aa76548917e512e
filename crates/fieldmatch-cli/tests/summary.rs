//! Rendering tests for match reports.

use fieldmatch_cli::summary::{render_plain, report_table};
use fieldmatch_model::{
    EncodedValue, FieldDescriptor, FieldPath, Match, MatchReport, SolverKind, StrategyKind,
    TargetDescriptor, TypeName,
};

fn path(value: &str) -> FieldPath {
    FieldPath::new(value).unwrap()
}

fn pair(source: &str, target: &str, score: f32, strategy: StrategyKind) -> Match {
    let ty = TypeName::new("float").unwrap();
    Match {
        source: FieldDescriptor::new(path(source), source, ty.clone(), EncodedValue::null(ty.clone())),
        target: TargetDescriptor::new(path(target), target, ty),
        score,
        strategy,
    }
}

fn sample_report() -> MatchReport {
    MatchReport {
        solver: SolverKind::Greedy,
        matches: vec![
            pair("armor", "defense", 0.95, StrategyKind::UserAlias),
            pair("speed", "velocity", 0.92, StrategyKind::DefaultMapping),
        ],
        unmatched_sources: vec![path("hp")],
        unmatched_targets: vec![path("look.material")],
    }
}

#[test]
fn plain_report_lists_matches_and_leftovers() {
    insta::assert_snapshot!(render_plain(&sample_report()).trim_end(), @r"
    Matched 2 of 3 source fields (greedy solver)
      armor -> defense (95.0%, user alias)
      speed -> velocity (92.0%, default mapping)
    Unmatched sources: hp
    Unmatched targets: look.material
    ");
}

#[test]
fn empty_report_renders_header_only() {
    let report = MatchReport {
        solver: SolverKind::Hungarian,
        matches: Vec::new(),
        unmatched_sources: Vec::new(),
        unmatched_targets: Vec::new(),
    };
    assert_eq!(
        render_plain(&report),
        "Matched 0 of 0 source fields (hungarian solver)\n"
    );
}

#[test]
fn table_has_a_row_per_source() {
    let table = report_table(&sample_report());
    assert_eq!(table.row_iter().count(), 3);
}
