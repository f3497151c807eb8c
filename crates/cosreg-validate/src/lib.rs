//! Data-quality validation over canonical records or a master view.
//!
//! Validation only reports; it never mutates its input and never blocks
//! integration.

pub mod checks;
pub mod issue;
pub mod report;

use cosreg_map::RowDiagnostic;
use cosreg_model::{CanonicalRecord, MasterView};
use tracing::{debug, info};

pub use issue::{Diagnostic, Issue, RecordRef, Severity};
pub use report::ValidationReport;

/// What to validate.
#[derive(Debug, Clone, Copy)]
pub enum ValidationTarget<'a> {
    Records(&'a [CanonicalRecord]),
    MasterView(&'a MasterView),
}

pub fn validate(target: ValidationTarget<'_>) -> ValidationReport {
    match target {
        ValidationTarget::Records(records) => validate_records(records),
        ValidationTarget::MasterView(view) => validate_master_view(view),
    }
}

/// Record-level checks plus cross-table duplicate detection.
pub fn validate_records(records: &[CanonicalRecord]) -> ValidationReport {
    let mut report = ValidationReport::new();
    for (index, record) in records.iter().enumerate() {
        for issue in checks::record_issues(record) {
            debug!(code = issue.code(), record = record.display_name(), "validation issue");
            report.add(&issue, RecordRef::record(record, Some(index)));
        }
    }
    for (index, issue) in checks::duplicates::check(records) {
        report.add(&issue, RecordRef::record(&records[index], Some(index)));
    }
    log_summary("records", &report);
    report
}

/// Row problems the parser recorded, as diagnostics in source order.
pub fn validate_source_rows<'a>(
    diagnostics: impl IntoIterator<Item = &'a RowDiagnostic>,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    for diagnostic in diagnostics {
        report.add(&Issue::from(&diagnostic.issue), RecordRef::source_row(diagnostic));
    }
    log_summary("source_rows", &report);
    report
}

/// Coverage, name variants, and record-level checks on every resolved
/// (non-placeholder) record.
pub fn validate_master_view(view: &MasterView) -> ValidationReport {
    let mut report = ValidationReport::new();
    for entry in &view.data {
        for issue in checks::coverage::check(entry) {
            report.add(&issue, RecordRef::entry(entry.display_name(), None));
        }
        for record in entry.regulations.values().filter(|r| !r.is_placeholder()) {
            for issue in checks::record_issues(record) {
                report.add(&issue, RecordRef::record(record, None));
            }
        }
    }
    for (index, issue) in checks::names::check(&view.data) {
        report.add(&issue, RecordRef::entry(view.data[index].display_name(), None));
    }
    log_summary("master_view", &report);
    report
}

fn log_summary(target: &str, report: &ValidationReport) {
    info!(
        target_kind = target,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        info = report.info.len(),
        "validation complete"
    );
}
