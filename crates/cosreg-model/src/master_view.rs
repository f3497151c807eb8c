//! The ingredient-centric merged view across all jurisdictions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Jurisdiction;
use crate::record::{CanonicalRecord, IdentityKey};

/// One ingredient with exactly one resolved record per jurisdiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterViewEntry {
    #[serde(rename = "Identity_Key")]
    pub identity_key: IdentityKey,
    #[serde(rename = "INCI_Name")]
    pub inci_name: Option<String>,
    #[serde(rename = "CAS_No")]
    pub cas_no: Option<String>,
    /// Alternative spellings and secondary-language names, first seen first.
    #[serde(rename = "Synonyms", default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(rename = "Regulations")]
    pub regulations: BTreeMap<Jurisdiction, CanonicalRecord>,
}

impl MasterViewEntry {
    pub fn regulation(&self, jurisdiction: Jurisdiction) -> Option<&CanonicalRecord> {
        self.regulations.get(&jurisdiction)
    }

    /// Jurisdictions from the fixed set with no resolved record.
    pub fn missing_jurisdictions(&self) -> Vec<Jurisdiction> {
        Jurisdiction::ALL
            .into_iter()
            .filter(|j| !self.regulations.contains_key(j))
            .collect()
    }

    pub fn display_name(&self) -> &str {
        self.inci_name
            .as_deref()
            .or(self.cas_no.as_deref())
            .unwrap_or_else(|| self.identity_key.value())
    }
}

/// A complete, immutable integration snapshot.
///
/// Entries are sorted by identity key so serialization is reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterView {
    pub generated_at: DateTime<Utc>,
    pub jurisdictions: Vec<Jurisdiction>,
    pub total_ingredients: usize,
    pub data: Vec<MasterViewEntry>,
}

impl MasterView {
    pub fn new(generated_at: DateTime<Utc>, data: Vec<MasterViewEntry>) -> Self {
        Self {
            generated_at,
            jurisdictions: Jurisdiction::ALL.to_vec(),
            total_ingredients: data.len(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Finds an entry by identity key. Relies on `data` being sorted.
    pub fn entry(&self, key: &IdentityKey) -> Option<&MasterViewEntry> {
        self.data
            .binary_search_by(|entry| entry.identity_key.cmp(key))
            .ok()
            .map(|idx| &self.data[idx])
    }
}
