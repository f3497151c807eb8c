//! In-memory staging of parsed tables.

use std::collections::{BTreeMap, BTreeSet};

use cosreg_model::{CanonicalRecord, Jurisdiction, TableType};

/// Canonical records grouped by (jurisdiction, table type).
///
/// Iteration follows the key order, then insertion order within a
/// collection, so downstream consumers see the same sequence regardless of
/// which worker finished first.
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: BTreeMap<(Jurisdiction, TableType), Vec<CanonicalRecord>>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records to a collection, creating it if needed.
    pub fn append(
        &mut self,
        jurisdiction: Jurisdiction,
        table_type: TableType,
        records: impl IntoIterator<Item = CanonicalRecord>,
    ) {
        self.tables
            .entry((jurisdiction, table_type))
            .or_default()
            .extend(records);
    }

    pub fn table(&self, jurisdiction: Jurisdiction, table_type: TableType) -> &[CanonicalRecord] {
        self.tables
            .get(&(jurisdiction, table_type))
            .map_or(&[], Vec::as_slice)
    }

    /// Collections present for one jurisdiction, in table order.
    pub fn tables_for(
        &self,
        jurisdiction: Jurisdiction,
    ) -> impl Iterator<Item = (TableType, &[CanonicalRecord])> {
        self.tables
            .iter()
            .filter(move |((j, _), _)| *j == jurisdiction)
            .map(|((_, table_type), records)| (*table_type, records.as_slice()))
    }

    pub fn collections(
        &self,
    ) -> impl Iterator<Item = (Jurisdiction, TableType, &[CanonicalRecord])> {
        self.tables
            .iter()
            .map(|((jurisdiction, table_type), records)| {
                (*jurisdiction, *table_type, records.as_slice())
            })
    }

    /// Every record, in deterministic order.
    pub fn records(&self) -> impl Iterator<Item = &CanonicalRecord> {
        self.tables.values().flatten()
    }

    pub fn to_vec(&self) -> Vec<CanonicalRecord> {
        self.records().cloned().collect()
    }

    pub fn jurisdictions(&self) -> BTreeSet<Jurisdiction> {
        self.tables.keys().map(|(jurisdiction, _)| *jurisdiction).collect()
    }

    /// Drops every collection of a jurisdiction.
    pub fn remove_jurisdiction(&mut self, jurisdiction: Jurisdiction) -> usize {
        let before = self.len();
        self.tables.retain(|(j, _), _| *j != jurisdiction);
        before - self.len()
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosreg_model::Status;

    fn record(jurisdiction: Jurisdiction, table_type: TableType, name: &str) -> CanonicalRecord {
        CanonicalRecord::new(jurisdiction, table_type, table_type.default_status())
            .with_inci_name(name)
    }

    #[test]
    fn test_records_are_ordered_by_key_then_insertion() {
        let mut store = TableStore::new();
        store.append(
            Jurisdiction::Jp,
            TableType::Prohibited,
            [record(Jurisdiction::Jp, TableType::Prohibited, "b")],
        );
        store.append(
            Jurisdiction::Eu,
            TableType::Restricted,
            [
                record(Jurisdiction::Eu, TableType::Restricted, "z"),
                record(Jurisdiction::Eu, TableType::Restricted, "a"),
            ],
        );
        let names: Vec<_> = store
            .records()
            .filter_map(|r| r.inci_name.as_deref())
            .collect();
        assert_eq!(names, vec!["z", "a", "b"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_tables_for_and_remove() {
        let mut store = TableStore::new();
        store.append(
            Jurisdiction::Cn,
            TableType::Whitelist,
            [record(Jurisdiction::Cn, TableType::Whitelist, "water")],
        );
        store.append(
            Jurisdiction::Cn,
            TableType::Prohibited,
            [record(Jurisdiction::Cn, TableType::Prohibited, "lead")],
        );
        store.append(
            Jurisdiction::Ca,
            TableType::Prohibited,
            [record(Jurisdiction::Ca, TableType::Prohibited, "lead")],
        );

        let cn: Vec<_> = store.tables_for(Jurisdiction::Cn).map(|(t, _)| t).collect();
        assert_eq!(cn, vec![TableType::Prohibited, TableType::Whitelist]);
        assert_eq!(
            store.table(Jurisdiction::Cn, TableType::Whitelist)[0].status,
            Status::Listed
        );

        assert_eq!(store.remove_jurisdiction(Jurisdiction::Cn), 2);
        assert_eq!(store.jurisdictions().len(), 1);
        assert!(store.table(Jurisdiction::Cn, TableType::Whitelist).is_empty());
    }
}
