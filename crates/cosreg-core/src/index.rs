//! Read-only lookup over one MasterView snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cosreg_model::{CanonicalRecord, Jurisdiction, MasterView, MasterViewEntry, Status, normalize_inci};
use cosreg_normalize::is_valid_cas_format;

/// Lookup tables built once per snapshot.
///
/// The index never changes after construction; a new run builds a new index
/// and the caller swaps it in. Share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RegulationIndex {
    view: Arc<MasterView>,
    by_cas: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl RegulationIndex {
    pub fn new(view: Arc<MasterView>) -> Self {
        let mut by_cas = HashMap::new();
        let mut by_name = HashMap::new();
        for (position, entry) in view.data.iter().enumerate() {
            if let Some(cas) = entry.cas_no.as_deref() {
                by_cas.entry(cas.trim().to_string()).or_insert(position);
            }
            let names = entry
                .inci_name
                .iter()
                .chain(entry.synonyms.iter())
                .map(|name| normalize_inci(name))
                .filter(|name| !name.is_empty());
            for name in names {
                by_name.entry(name).or_insert(position);
            }
        }
        Self {
            view,
            by_cas,
            by_name,
        }
    }

    pub fn snapshot(&self) -> &Arc<MasterView> {
        &self.view
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.view.generated_at
    }

    pub fn by_cas(&self, cas: &str) -> Option<&MasterViewEntry> {
        self.by_cas
            .get(cas.trim())
            .map(|&position| &self.view.data[position])
    }

    /// Matches the display name or any synonym, case and whitespace
    /// insensitive.
    pub fn by_inci(&self, name: &str) -> Option<&MasterViewEntry> {
        self.by_name
            .get(&normalize_inci(name))
            .map(|&position| &self.view.data[position])
    }

    /// Treats well-formed CAS numbers as CAS queries, everything else as a
    /// name.
    pub fn lookup(&self, query: &str) -> Option<&MasterViewEntry> {
        let query = query.trim();
        if is_valid_cas_format(query) {
            self.by_cas(query).or_else(|| self.by_inci(query))
        } else {
            self.by_inci(query)
        }
    }

    pub fn regulation(&self, query: &str, jurisdiction: Jurisdiction) -> Option<&CanonicalRecord> {
        self.lookup(query)?.regulation(jurisdiction)
    }

    pub fn status(&self, query: &str, jurisdiction: Jurisdiction) -> Option<Status> {
        self.regulation(query, jurisdiction).map(|r| r.status)
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }
}
