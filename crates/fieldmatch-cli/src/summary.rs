//! Report rendering for the terminal.

use std::fmt::Write as _;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fieldmatch_map::{AliasEntry, ApplyReport, SynonymTable};
use fieldmatch_model::{ConfidenceLevel, MatchReport};

/// Plain-text report, one match per line.
pub fn render_plain(report: &MatchReport) -> String {
    let mut out = String::new();
    let total = report.matches.len() + report.unmatched_sources.len();
    let _ = writeln!(
        out,
        "Matched {} of {} source fields ({} solver)",
        report.matches.len(),
        total,
        report.solver
    );
    for m in &report.matches {
        let _ = writeln!(
            out,
            "  {} -> {} ({:.1}%, {})",
            m.source.path,
            m.target.path,
            f64::from(m.score) * 100.0,
            m.strategy
        );
    }
    if !report.unmatched_sources.is_empty() {
        let _ = writeln!(out, "Unmatched sources: {}", join(&report.unmatched_sources));
    }
    if !report.unmatched_targets.is_empty() {
        let _ = writeln!(out, "Unmatched targets: {}", join(&report.unmatched_targets));
    }
    out
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Match report as a styled table.
pub fn report_table(report: &MatchReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Score"),
        header_cell("Confidence"),
        header_cell("Strategy"),
    ]);
    apply_report_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for m in &report.matches {
        table.add_row(vec![
            Cell::new(&m.source.path),
            Cell::new(&m.target.path),
            Cell::new(format!("{:.1}%", f64::from(m.score) * 100.0)),
            confidence_cell(ConfidenceLevel::from_score(m.score)),
            Cell::new(m.strategy),
        ]);
    }
    for path in &report.unmatched_sources {
        table.add_row(vec![
            Cell::new(path),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("unmatched"),
            dim_cell("-"),
        ]);
    }
    table
}

pub fn print_report(report: &MatchReport) {
    println!("Solver: {}", report.solver);
    println!("{}", report_table(report));
    if let Some(mean) = report.mean_score() {
        println!(
            "Matched {} field(s), mean score {:.1}%",
            report.matches.len(),
            f64::from(mean) * 100.0
        );
    } else {
        println!("No fields matched");
    }
    if !report.unmatched_targets.is_empty() {
        println!("Unmatched targets: {}", join(&report.unmatched_targets));
    }
}

pub fn print_apply(report: &ApplyReport, output: &std::path::Path) {
    println!(
        "Applied {} value(s) to {}",
        report.applied.len(),
        output.display()
    );
    if !report.skipped.is_empty() {
        eprintln!("Skipped:");
        for skipped in &report.skipped {
            eprintln!("- {}: {}", skipped.path, skipped.reason);
        }
    }
}

pub fn print_aliases(aliases: &[AliasEntry]) {
    if aliases.is_empty() {
        println!("No aliases");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Owner"),
        header_cell("Source field"),
        header_cell("Target field"),
    ]);
    apply_list_table_style(&mut table);
    for alias in aliases {
        table.add_row(vec![
            Cell::new(&alias.owner_type),
            Cell::new(&alias.source_field),
            Cell::new(&alias.target_field),
        ]);
    }
    println!("{table}");
}

pub fn print_defaults(defaults: &SynonymTable) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Source"), header_cell("Maps to")]);
    apply_list_table_style(&mut table);
    for (source, targets) in defaults.rows() {
        table.add_row(vec![Cell::new(source), Cell::new(targets.join(", "))]);
    }
    println!("{table}");
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_list_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn confidence_cell(level: ConfidenceLevel) -> Cell {
    let color = match level {
        ConfidenceLevel::High => Color::Green,
        ConfidenceLevel::Medium => Color::Yellow,
        ConfidenceLevel::Low => Color::Red,
    };
    Cell::new(level.label()).fg(color)
}
