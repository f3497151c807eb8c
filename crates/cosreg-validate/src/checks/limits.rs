//! Concentration range and status/limit consistency.

use cosreg_model::{CanonicalRecord, Status};
use cosreg_normalize::Concentration;

use crate::issue::Issue;

pub fn check(record: &CanonicalRecord) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let Some(value) = record.max_conc_percent {
        if !(0.0..=100.0).contains(&value) {
            issues.push(Issue::ConcentrationOutOfRange { value });
        }
        if record.status == Status::Prohibited {
            issues.push(Issue::ProhibitedWithConcentration { value });
        }
    }

    if let Some(table_type) = record.table_type
        && table_type.is_positive_list()
        && matches!(record.status, Status::Restricted | Status::Allowed)
        && record.max_conc_percent.is_none()
        && record.conditions.as_deref().is_none_or(|c| c.trim().is_empty())
        && !declares_no_limit(record)
    {
        issues.push(Issue::RestrictedWithoutLimits {
            status: record.status,
            table_type,
        });
    }

    issues
}

/// A "No Limit" symbol in the source is an explicit declaration, not a
/// missing ceiling.
fn declares_no_limit(record: &CanonicalRecord) -> bool {
    let Some(marker) = Concentration::NoLimit.note() else {
        return false;
    };
    record
        .notes
        .as_deref()
        .is_some_and(|notes| notes.split(" | ").any(|n| n == marker))
}
