//! Aggregate counts produced alongside a MasterView.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Jurisdiction, Status, TableType};

/// Counts for one table type across jurisdictions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub total: usize,
    pub by_jurisdiction: BTreeMap<Jurisdiction, usize>,
}

/// Counts for one jurisdiction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionStats {
    /// Canonical records contributed before resolution.
    pub total: usize,
    pub by_table: BTreeMap<TableType, usize>,
    /// MasterView entries per resolved status, placeholders included.
    pub resolved_by_status: BTreeMap<Status, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub generated_at: DateTime<Utc>,
    pub tables: BTreeMap<TableType, TableStats>,
    pub jurisdictions: BTreeMap<Jurisdiction, JurisdictionStats>,
    pub total_records: usize,
    pub total_ingredients: usize,
    /// Records discarded because a more restrictive status won.
    pub conflicts_resolved: usize,
    /// `NotSpecified` placeholders synthesized.
    pub backfilled: usize,
}

impl Statistics {
    /// Empty statistics with every table and jurisdiction present at zero.
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            tables: TableType::ALL
                .into_iter()
                .map(|t| (t, TableStats::default()))
                .collect(),
            jurisdictions: Jurisdiction::ALL
                .into_iter()
                .map(|j| (j, JurisdictionStats::default()))
                .collect(),
            total_records: 0,
            total_ingredients: 0,
            conflicts_resolved: 0,
            backfilled: 0,
        }
    }

    pub fn table_total(&self, table: TableType) -> usize {
        self.tables.get(&table).map_or(0, |s| s.total)
    }

    pub fn jurisdiction_total(&self, jurisdiction: Jurisdiction) -> usize {
        self.jurisdictions.get(&jurisdiction).map_or(0, |s| s.total)
    }

    pub fn resolved_count(&self, jurisdiction: Jurisdiction, status: Status) -> usize {
        self.jurisdictions
            .get(&jurisdiction)
            .and_then(|s| s.resolved_by_status.get(&status).copied())
            .unwrap_or(0)
    }
}
