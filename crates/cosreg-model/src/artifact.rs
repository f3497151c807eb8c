//! Envelope for per-jurisdiction table collections written to disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Jurisdiction, TableType};
use crate::record::CanonicalRecord;

/// One (jurisdiction, table type) collection as published to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCollection {
    pub jurisdiction: Jurisdiction,
    pub table_type: TableType,
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub records: Vec<CanonicalRecord>,
}

impl TableCollection {
    pub fn new(
        jurisdiction: Jurisdiction,
        table_type: TableType,
        version: impl Into<String>,
        generated_at: DateTime<Utc>,
        records: Vec<CanonicalRecord>,
    ) -> Self {
        Self {
            jurisdiction,
            table_type,
            version: version.into(),
            generated_at,
            total_records: records.len(),
            records,
        }
    }
}
