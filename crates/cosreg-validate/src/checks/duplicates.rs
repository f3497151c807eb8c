//! Same ingredient in more than one table of a jurisdiction with differing
//! status. Resolution already happens during integration; this only
//! surfaces the overlap.

use std::collections::{BTreeMap, BTreeSet};

use cosreg_model::{CanonicalRecord, IdentityKey, Jurisdiction, Status, TableType};

use crate::issue::Issue;

/// Returns the index of the first record of each duplicated group with its
/// issue.
pub fn check(records: &[CanonicalRecord]) -> Vec<(usize, Issue)> {
    let mut groups: BTreeMap<(IdentityKey, Jurisdiction), (usize, Vec<(TableType, Status)>)> =
        BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        let (Some(key), Some(table_type)) = (record.identity_key(), record.table_type) else {
            continue;
        };
        let (_, entries) = groups
            .entry((key, record.jurisdiction))
            .or_insert_with(|| (index, Vec::new()));
        if !entries.contains(&(table_type, record.status)) {
            entries.push((table_type, record.status));
        }
    }

    let mut issues: Vec<(usize, Issue)> = groups
        .into_values()
        .filter(|(_, entries)| tables_disagree(entries))
        .map(|(index, entries)| (index, Issue::CrossTableDuplicate { entries }))
        .collect();
    issues.sort_by_key(|(index, _)| *index);
    issues
}

/// True when two tables share no status. Status variation inside a single
/// table does not count.
fn tables_disagree(entries: &[(TableType, Status)]) -> bool {
    let mut by_table: BTreeMap<TableType, BTreeSet<Status>> = BTreeMap::new();
    for (table_type, status) in entries {
        by_table.entry(*table_type).or_default().insert(*status);
    }
    let sets: Vec<&BTreeSet<Status>> = by_table.values().collect();
    sets.iter()
        .enumerate()
        .any(|(i, a)| sets[i + 1..].iter().any(|b| a.is_disjoint(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_within_one_table_is_not_cross_table() {
        let entries = [
            (TableType::Restricted, Status::Restricted),
            (TableType::Restricted, Status::Prohibited),
            (TableType::Preservative, Status::Restricted),
        ];
        assert!(!tables_disagree(&entries));
    }

    #[test]
    fn test_disjoint_tables_disagree() {
        let entries = [
            (TableType::Restricted, Status::Restricted),
            (TableType::Preservative, Status::Allowed),
        ];
        assert!(tables_disagree(&entries));
        assert!(!tables_disagree(&[(TableType::Restricted, Status::Restricted)]));
    }
}
