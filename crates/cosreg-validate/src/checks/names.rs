//! Near-duplicate INCI names across name-keyed entries, usually spelling
//! variants that kept two ingredients apart.

use std::collections::BTreeMap;

use cosreg_model::{MasterViewEntry, normalize_inci};
use rapidfuzz::distance::jaro_winkler;

use crate::issue::Issue;

pub const VARIANT_THRESHOLD: f64 = 0.97;

/// Compares entries sharing a leading character; Jaro-Winkler at this
/// threshold does not match names that differ there.
pub fn check(entries: &[MasterViewEntry]) -> Vec<(usize, Issue)> {
    let mut buckets: BTreeMap<char, Vec<(usize, String)>> = BTreeMap::new();
    for (index, entry) in entries.iter().enumerate() {
        if entry.identity_key.is_cas() {
            continue;
        }
        let name = normalize_inci(entry.identity_key.value());
        if let Some(first) = name.chars().next() {
            buckets.entry(first).or_default().push((index, name));
        }
    }

    let mut issues = Vec::new();
    for names in buckets.values() {
        for (i, (index, name)) in names.iter().enumerate() {
            for (other_index, other) in &names[i + 1..] {
                if name == other || name.len().abs_diff(other.len()) > 3 {
                    continue;
                }
                let similarity = jaro_winkler::similarity(name.chars(), other.chars());
                if similarity >= VARIANT_THRESHOLD {
                    issues.push((
                        *other_index,
                        Issue::InciNameVariant {
                            other: entries[*index].display_name().to_string(),
                            similarity,
                        },
                    ));
                }
            }
        }
    }
    issues.sort_by_key(|(index, _)| *index);
    issues
}
