//! Statuses that are unusual for the table a record came from.

use cosreg_model::{CanonicalRecord, Status, TableType};

use crate::issue::Issue;

/// Statuses a table normally yields. Prohibited and restricted lists share
/// theirs because some jurisdictions publish one combined list.
fn expected_statuses(table_type: TableType) -> &'static [Status] {
    match table_type {
        TableType::Prohibited | TableType::Restricted => &[Status::Prohibited, Status::Restricted],
        TableType::Preservative | TableType::UvFilter | TableType::Colorant => {
            &[Status::Allowed, Status::Restricted]
        }
        TableType::Whitelist => &[Status::Listed, Status::Allowed],
    }
}

pub fn check(record: &CanonicalRecord) -> Vec<Issue> {
    match record.table_type {
        Some(table_type) if !expected_statuses(table_type).contains(&record.status) => {
            vec![Issue::StatusTableMismatch {
                status: record.status,
                table_type,
            }]
        }
        _ => Vec::new(),
    }
}
