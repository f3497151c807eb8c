use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cosreg_cli::pipeline::RunResult;
use cosreg_core::MasterViewDiff;
use cosreg_model::{Jurisdiction, Status};
use cosreg_validate::{Diagnostic, Severity, ValidationReport};

/// Rows shown per issue table; the full report is on disk.
const MAX_ISSUE_ROWS: usize = 50;

pub fn print_run_summary(result: &RunResult) {
    println!("Output: {}", result.output_dir.display());
    println!("Snapshot version: {}", result.version);
    if let Some(manifest) = &result.manifest {
        println!("Artifacts: {}", manifest.artifacts.len());
    } else {
        println!("Artifacts: none (dry run)");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Jurisdiction"),
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Skipped"),
        header_cell("Records"),
        header_cell("Included"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 5, CellAlignment::Center);
    for source in &result.sources {
        table.add_row(vec![
            jurisdiction_cell(source.jurisdiction),
            Cell::new(source.table_type.as_str()),
            Cell::new(source.stats.rows_read),
            count_cell(source.stats.rows_skipped, Color::Yellow),
            Cell::new(source.stats.records_emitted),
            included_cell(source.included),
        ]);
    }
    for failure in &result.failures {
        table.add_row(vec![
            jurisdiction_cell(failure.jurisdiction),
            Cell::new(&failure.table),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new("unreadable").fg(Color::Red),
        ]);
    }
    let stats = result.parse_stats;
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(stats.rows_read).add_attribute(Attribute::Bold),
        count_cell(stats.rows_skipped, Color::Yellow).add_attribute(Attribute::Bold),
        Cell::new(stats.records_emitted).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");

    print_master_view_summary(result);
    for failure in &result.failures {
        eprintln!(
            "- {} {} skipped: {}",
            failure.jurisdiction, failure.table, failure.message
        );
    }
    print_report(&result.report);
}

fn print_master_view_summary(result: &RunResult) {
    let statistics = &result.statistics;
    println!();
    println!(
        "Master view: {} ingredients, {} conflicts resolved, {} placeholders",
        result.master_view.len(),
        statistics.conflicts_resolved,
        statistics.backfilled
    );
    let mut table = Table::new();
    let mut header = vec![header_cell("Jurisdiction"), header_cell("Records")];
    header.extend(Status::ALL.iter().map(|s| header_cell(s.as_str())));
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=Status::ALL.len() + 1 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for jurisdiction in Jurisdiction::ALL {
        let mut row = vec![
            jurisdiction_cell(jurisdiction),
            Cell::new(statistics.jurisdiction_total(jurisdiction)),
        ];
        row.extend(
            Status::ALL
                .iter()
                .map(|&s| Cell::new(statistics.resolved_count(jurisdiction, s))),
        );
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_report(report: &ValidationReport) {
    println!(
        "Validation: {} errors, {} warnings, {} info",
        report.errors.len(),
        report.warnings.len(),
        report.info.len()
    );
    if report.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Jurisdiction"),
        header_cell("Ingredient"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for diagnostic in report.iter().take(MAX_ISSUE_ROWS) {
        table.add_row(issue_row(diagnostic));
    }
    println!("{table}");
    if report.len() > MAX_ISSUE_ROWS {
        println!("... {} more", report.len() - MAX_ISSUE_ROWS);
    }
}

fn issue_row(diagnostic: &Diagnostic) -> Vec<Cell> {
    let jurisdiction = diagnostic
        .record_ref
        .jurisdiction
        .map_or_else(|| dim_cell("-"), jurisdiction_cell);
    vec![
        severity_cell(diagnostic.severity),
        Cell::new(&diagnostic.code),
        jurisdiction,
        Cell::new(&diagnostic.record_ref.name),
        Cell::new(&diagnostic.message),
    ]
}

pub fn print_diff(diff: &MasterViewDiff) {
    println!(
        "Added: {}  Removed: {}  Changed: {}",
        diff.added.len(),
        diff.removed.len(),
        diff.changed.len()
    );
    if diff.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Ingredient"),
        header_cell("Jurisdiction"),
        header_cell("Field"),
        header_cell("Old"),
        header_cell("New"),
    ]);
    apply_table_style(&mut table);
    for key in &diff.added {
        table.add_row(vec![
            Cell::new(key.to_string()),
            dim_cell("-"),
            Cell::new("added").fg(Color::Green),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    for key in &diff.removed {
        table.add_row(vec![
            Cell::new(key.to_string()),
            dim_cell("-"),
            Cell::new("removed").fg(Color::Red),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    for change in &diff.changed {
        for field in &change.changes {
            table.add_row(vec![
                Cell::new(&change.name),
                jurisdiction_cell(change.jurisdiction),
                Cell::new(field.field),
                optional_cell(field.old.as_deref()),
                optional_cell(field.new.as_deref()),
            ]);
        }
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn jurisdiction_cell(jurisdiction: Jurisdiction) -> Cell {
    Cell::new(jurisdiction.as_str())
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => Cell::new("INFO").fg(Color::DarkGrey),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn included_cell(included: bool) -> Cell {
    if included {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("excluded").fg(Color::Red)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or_else(|| dim_cell("-"), Cell::new)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
