//! CAS registry number format and check digit.

use cosreg_model::CanonicalRecord;
use cosreg_normalize::{cas_checksum_ok, is_valid_cas_format};

use crate::issue::Issue;

pub fn check(record: &CanonicalRecord) -> Vec<Issue> {
    let Some(cas) = record.cas_no.as_deref().map(str::trim).filter(|c| !c.is_empty()) else {
        return Vec::new();
    };
    if !is_valid_cas_format(cas) {
        return vec![Issue::InvalidCasFormat {
            cas: cas.to_string(),
        }];
    }
    if !cas_checksum_ok(cas) {
        return vec![Issue::CasChecksumMismatch {
            cas: cas.to_string(),
        }];
    }
    Vec::new()
}
