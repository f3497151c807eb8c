//! Cross-jurisdiction integration.
//!
//! Groups canonical records by identity key, resolves each (ingredient,
//! jurisdiction) group to a single record by status priority, backfills
//! `NotSpecified` placeholders and computes run statistics.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use chrono::{DateTime, Utc};
use cosreg_model::{
    CanonicalRecord, IdentityKey, Jurisdiction, MasterView, MasterViewEntry, Statistics,
};
use tracing::{debug, info, info_span};

use crate::error::IntegrationError;

/// Result of one integration run.
#[derive(Debug, Clone, PartialEq)]
pub struct Integration {
    pub master_view: MasterView,
    pub statistics: Statistics,
}

/// Builds a [`MasterView`] from a batch of canonical records.
///
/// The timestamp is supplied by the caller so identical input always
/// serializes to identical bytes.
#[derive(Debug, Clone)]
pub struct Integrator {
    generated_at: DateTime<Utc>,
}

impl Integrator {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self { generated_at }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn integrate(&self, records: &[CanonicalRecord]) -> Result<Integration, IntegrationError> {
        let span = info_span!("integrate", records = records.len());
        let _guard = span.enter();
        let start = Instant::now();

        let groups = group_by_identity(records)?;
        let mut statistics = Statistics::empty(self.generated_at);
        record_input_counts(&mut statistics, records);

        let mut data = Vec::with_capacity(groups.len());
        for (key, group) in groups {
            let entry = self.resolve_group(&key, group, &mut statistics);
            check_entry(&entry)?;
            data.push(entry);
        }

        for entry in &data {
            for (jurisdiction, record) in &entry.regulations {
                if let Some(stats) = statistics.jurisdictions.get_mut(jurisdiction) {
                    *stats.resolved_by_status.entry(record.status).or_default() += 1;
                }
            }
        }
        statistics.total_ingredients = data.len();

        let master_view = MasterView::new(self.generated_at, data);
        info!(
            ingredients = master_view.len(),
            conflicts_resolved = statistics.conflicts_resolved,
            backfilled = statistics.backfilled,
            duration_ms = start.elapsed().as_millis(),
            "integration complete"
        );
        Ok(Integration {
            master_view,
            statistics,
        })
    }

    fn resolve_group(
        &self,
        key: &IdentityKey,
        group: IngredientGroup<'_>,
        statistics: &mut Statistics,
    ) -> MasterViewEntry {
        let (inci_name, synonyms) = group.names();
        let cas_no = group.cas_no();

        let mut regulations = BTreeMap::new();
        for (jurisdiction, candidates) in &group.by_jurisdiction {
            statistics.conflicts_resolved += candidates.len().saturating_sub(1);
            if let Some(record) = resolve_jurisdiction(candidates) {
                regulations.insert(*jurisdiction, record);
            }
        }

        for jurisdiction in Jurisdiction::ALL {
            regulations.entry(jurisdiction).or_insert_with(|| {
                statistics.backfilled += 1;
                CanonicalRecord::not_specified(inci_name.clone(), cas_no.clone(), jurisdiction)
            });
        }

        debug!(key = %key, synonyms = synonyms.len(), "ingredient resolved");
        MasterViewEntry {
            identity_key: key.clone(),
            inci_name,
            cas_no,
            synonyms,
            regulations,
        }
    }
}

/// Integrates with the given timestamp.
pub fn integrate(
    records: &[CanonicalRecord],
    generated_at: DateTime<Utc>,
) -> Result<Integration, IntegrationError> {
    Integrator::new(generated_at).integrate(records)
}

/// Records sharing one identity key, in input order.
#[derive(Debug, Default)]
struct IngredientGroup<'a> {
    records: Vec<&'a CanonicalRecord>,
    by_jurisdiction: BTreeMap<Jurisdiction, Vec<&'a CanonicalRecord>>,
}

impl IngredientGroup<'_> {
    /// Display name plus the other spellings and local names, first seen
    /// first.
    fn names(&self) -> (Option<String>, Vec<String>) {
        let inci_names = self
            .records
            .iter()
            .filter_map(|r| r.inci_name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let local_names = self
            .records
            .iter()
            .filter_map(|r| r.local_name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty());

        let mut display = None;
        let mut seen = HashSet::new();
        let mut synonyms = Vec::new();
        for name in inci_names {
            if display.is_none() {
                display = Some(name.to_string());
                seen.insert(name);
                continue;
            }
            if seen.insert(name) {
                synonyms.push(name.to_string());
            }
        }
        for name in local_names {
            if seen.insert(name) {
                synonyms.push(name.to_string());
            }
        }
        (display, synonyms)
    }

    fn cas_no(&self) -> Option<String> {
        self.records
            .iter()
            .filter_map(|r| r.cas_no.as_deref())
            .map(str::trim)
            .find(|cas| !cas.is_empty())
            .map(str::to_string)
    }
}

fn group_by_identity(
    records: &[CanonicalRecord],
) -> Result<BTreeMap<IdentityKey, IngredientGroup<'_>>, IntegrationError> {
    let mut groups: BTreeMap<IdentityKey, IngredientGroup<'_>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        let key = record
            .identity_key()
            .ok_or_else(|| IntegrationError::missing_identity(record.jurisdiction, index))?;
        let group = groups.entry(key).or_default();
        group.records.push(record);
        group
            .by_jurisdiction
            .entry(record.jurisdiction)
            .or_default()
            .push(record);
    }
    Ok(groups)
}

/// Picks the most restrictive record; the first one wins ties. Every
/// discarded record leaves a conflict note on the kept one.
fn resolve_jurisdiction(candidates: &[&CanonicalRecord]) -> Option<CanonicalRecord> {
    let (first, rest) = candidates.split_first()?;
    let mut kept = *first;
    let mut notes = Vec::new();
    for candidate in rest {
        if candidate.status.outranks(kept.status) {
            notes.push(superseded_note(kept, candidate));
            kept = candidate;
        } else if candidate.status == kept.status {
            notes.push(format!(
                "Conflict: duplicate {} entry from {} table ignored",
                candidate.status,
                table_label(candidate)
            ));
        } else {
            notes.push(superseded_note(candidate, kept));
        }
    }

    let mut resolved = kept.clone();
    for note in notes {
        resolved.append_note(note);
    }
    Some(resolved)
}

fn superseded_note(discarded: &CanonicalRecord, kept: &CanonicalRecord) -> String {
    format!(
        "Conflict: {} entry from {} table superseded by {} entry from {} table",
        discarded.status,
        table_label(discarded),
        kept.status,
        table_label(kept)
    )
}

fn table_label(record: &CanonicalRecord) -> &'static str {
    record.table_type.map_or("unspecified", |t| t.as_str())
}

fn record_input_counts(statistics: &mut Statistics, records: &[CanonicalRecord]) {
    statistics.total_records = records.len();
    for record in records {
        let jurisdiction = statistics
            .jurisdictions
            .entry(record.jurisdiction)
            .or_default();
        jurisdiction.total += 1;
        if let Some(table_type) = record.table_type {
            *jurisdiction.by_table.entry(table_type).or_default() += 1;
            let table = statistics.tables.entry(table_type).or_default();
            table.total += 1;
            *table.by_jurisdiction.entry(record.jurisdiction).or_default() += 1;
        }
    }
}

/// Every jurisdiction present exactly once and filed under its own key.
fn check_entry(entry: &MasterViewEntry) -> Result<(), IntegrationError> {
    for jurisdiction in Jurisdiction::ALL {
        match entry.regulations.get(&jurisdiction) {
            None => {
                return Err(IntegrationError::violation(
                    &entry.identity_key,
                    format!("no record for {jurisdiction} after backfill"),
                ));
            }
            Some(record) if record.jurisdiction != jurisdiction => {
                return Err(IntegrationError::violation(
                    &entry.identity_key,
                    format!(
                        "{} record filed under {jurisdiction}",
                        record.jurisdiction
                    ),
                ));
            }
            Some(_) => {}
        }
    }
    if entry.regulations.len() != Jurisdiction::ALL.len() {
        return Err(IntegrationError::violation(
            &entry.identity_key,
            format!("{} jurisdictions resolved", entry.regulations.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use cosreg_model::{Status, TableType};

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap()
    }

    fn record(
        jurisdiction: Jurisdiction,
        table_type: TableType,
        status: Status,
        cas: &str,
    ) -> CanonicalRecord {
        CanonicalRecord::new(jurisdiction, table_type, status)
            .with_inci_name("Triclosan")
            .with_cas_no(cas)
    }

    #[test]
    fn test_restrictive_record_wins_and_notes_conflict() {
        let records = vec![
            record(Jurisdiction::Eu, TableType::Restricted, Status::Restricted, "3380-34-5")
                .with_max_conc(0.3),
            record(Jurisdiction::Eu, TableType::Prohibited, Status::Prohibited, "3380-34-5"),
        ];
        let result = integrate(&records, ts()).unwrap();
        let entry = &result.master_view.data[0];
        let eu = entry.regulation(Jurisdiction::Eu).unwrap();
        assert_eq!(eu.status, Status::Prohibited);
        assert_eq!(
            eu.notes.as_deref(),
            Some(
                "Conflict: Restricted entry from Restricted table superseded by \
                 Prohibited entry from Prohibited table"
            )
        );
        assert_eq!(result.statistics.conflicts_resolved, 1);
    }

    #[test]
    fn test_tie_keeps_first_record() {
        let records = vec![
            record(Jurisdiction::Jp, TableType::Preservative, Status::Allowed, "3380-34-5")
                .with_max_conc(0.1),
            record(Jurisdiction::Jp, TableType::UvFilter, Status::Allowed, "3380-34-5")
                .with_max_conc(0.5),
        ];
        let result = integrate(&records, ts()).unwrap();
        let jp = result.master_view.data[0]
            .regulation(Jurisdiction::Jp)
            .unwrap();
        assert_eq!(jp.max_conc_percent, Some(0.1));
        assert_eq!(jp.table_type, Some(TableType::Preservative));
        assert_eq!(
            jp.notes.as_deref(),
            Some("Conflict: duplicate Allowed entry from UVFilter table ignored")
        );
    }

    #[test]
    fn test_missing_identity_is_invariant_violation() {
        let records = vec![CanonicalRecord::new(
            Jurisdiction::Ca,
            TableType::Prohibited,
            Status::Prohibited,
        )];
        let err = integrate(&records, ts()).unwrap_err();
        assert!(matches!(err, IntegrationError::InvariantViolation { .. }));
    }

    #[test]
    fn test_synonyms_collect_spellings_and_local_names() {
        let mut jp = record(Jurisdiction::Jp, TableType::Preservative, Status::Allowed, "3380-34-5")
            .with_inci_name("TRICLOSAN");
        jp.local_name = Some("トリクロサン".to_string());
        let records = vec![
            record(Jurisdiction::Eu, TableType::Preservative, Status::Allowed, "3380-34-5"),
            jp,
        ];
        let result = integrate(&records, ts()).unwrap();
        let entry = &result.master_view.data[0];
        assert_eq!(entry.inci_name.as_deref(), Some("Triclosan"));
        assert_eq!(entry.synonyms, vec!["TRICLOSAN", "トリクロサン"]);
        assert_eq!(result.statistics.backfilled, 3);
    }

    #[test]
    fn test_check_entry_rejects_misfiled_record() {
        let mut regulations = BTreeMap::new();
        for j in Jurisdiction::ALL {
            regulations.insert(j, CanonicalRecord::not_specified(None, Some("50-00-0".into()), j));
        }
        regulations.insert(
            Jurisdiction::Cn,
            CanonicalRecord::not_specified(None, Some("50-00-0".into()), Jurisdiction::Eu),
        );
        let entry = MasterViewEntry {
            identity_key: IdentityKey::Cas("50-00-0".into()),
            inci_name: None,
            cas_no: Some("50-00-0".into()),
            synonyms: Vec::new(),
            regulations,
        };
        assert!(check_entry(&entry).is_err());
    }
}
