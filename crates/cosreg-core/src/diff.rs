//! Comparison of two MasterView snapshots.

use std::collections::BTreeMap;

use cosreg_model::{CanonicalRecord, IdentityKey, Jurisdiction, MasterView, MasterViewEntry};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Changes to one ingredient in one jurisdiction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegulationChange {
    pub identity_key: IdentityKey,
    pub name: String,
    pub jurisdiction: Jurisdiction,
    pub changes: Vec<FieldChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MasterViewDiff {
    pub added: Vec<IdentityKey>,
    pub removed: Vec<IdentityKey>,
    pub changed: Vec<RegulationChange>,
}

impl MasterViewDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Added and removed ingredients, plus per-jurisdiction changes of status,
/// concentration, conditions and product type.
pub fn diff_master_views(old: &MasterView, new: &MasterView) -> MasterViewDiff {
    let old_entries = by_key(old);
    let new_entries = by_key(new);

    let mut diff = MasterViewDiff::default();
    for (key, new_entry) in &new_entries {
        let Some(old_entry) = old_entries.get(key) else {
            diff.added.push((*key).clone());
            continue;
        };
        for jurisdiction in Jurisdiction::ALL {
            let changes = compare(
                old_entry.regulation(jurisdiction),
                new_entry.regulation(jurisdiction),
            );
            if !changes.is_empty() {
                diff.changed.push(RegulationChange {
                    identity_key: (*key).clone(),
                    name: new_entry.display_name().to_string(),
                    jurisdiction,
                    changes,
                });
            }
        }
    }
    diff.removed = old_entries
        .keys()
        .filter(|key| !new_entries.contains_key(*key))
        .map(|key| (*key).clone())
        .collect();
    diff
}

fn by_key(view: &MasterView) -> BTreeMap<&IdentityKey, &MasterViewEntry> {
    view.data.iter().map(|e| (&e.identity_key, e)).collect()
}

fn compare(old: Option<&CanonicalRecord>, new: Option<&CanonicalRecord>) -> Vec<FieldChange> {
    let fields: [(&'static str, fn(&CanonicalRecord) -> Option<String>); 4] = [
        ("Status", |r| Some(r.status.to_string())),
        ("Max_Conc_Percent", |r| r.max_conc_percent.map(|v| v.to_string())),
        ("Conditions", |r| r.conditions.clone()),
        ("Product_Type", |r| r.product_type.map(|p| p.to_string())),
    ];
    fields
        .into_iter()
        .filter_map(|(field, extract)| {
            let old = old.and_then(extract);
            let new = new.and_then(extract);
            (old != new).then_some(FieldChange { field, old, new })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use cosreg_model::{Status, TableType};

    use crate::integrate::integrate;

    fn view(records: &[CanonicalRecord]) -> MasterView {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        integrate(records, ts).unwrap().master_view
    }

    fn triclosan(status: Status, max: Option<f64>) -> CanonicalRecord {
        let mut record = CanonicalRecord::new(Jurisdiction::Eu, TableType::Preservative, status)
            .with_inci_name("Triclosan")
            .with_cas_no("3380-34-5");
        record.max_conc_percent = max;
        record
    }

    #[test]
    fn test_identical_views_have_no_diff() {
        let records = [triclosan(Status::Allowed, Some(0.3))];
        assert!(diff_master_views(&view(&records), &view(&records)).is_empty());
    }

    #[test]
    fn test_status_and_limit_changes_are_reported() {
        let old = view(&[triclosan(Status::Allowed, Some(0.3))]);
        let new = view(&[
            triclosan(Status::Restricted, Some(0.2)),
            CanonicalRecord::new(Jurisdiction::Eu, TableType::Prohibited, Status::Prohibited)
                .with_cas_no("50-00-0"),
        ]);
        let diff = diff_master_views(&old, &new);
        assert_eq!(diff.added, vec![IdentityKey::Cas("50-00-0".into())]);
        assert!(diff.removed.is_empty());
        assert_eq!(diff.changed.len(), 1);
        let change = &diff.changed[0];
        assert_eq!(change.jurisdiction, Jurisdiction::Eu);
        let fields: Vec<_> = change.changes.iter().map(|c| c.field).collect();
        assert_eq!(fields, vec!["Status", "Max_Conc_Percent"]);
        assert_eq!(change.changes[1].new.as_deref(), Some("0.2"));
    }

    #[test]
    fn test_removed_ingredient() {
        let old = view(&[triclosan(Status::Allowed, None)]);
        let new = view(&[]);
        let diff = diff_master_views(&old, &new);
        assert_eq!(diff.removed, vec![IdentityKey::Cas("3380-34-5".into())]);
    }
}
