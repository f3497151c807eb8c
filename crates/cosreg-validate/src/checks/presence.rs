//! Identity presence: every record needs an INCI name or a well-formed CAS
//! number.

use cosreg_model::CanonicalRecord;

use crate::issue::Issue;

pub fn check(record: &CanonicalRecord) -> Vec<Issue> {
    if record.has_identity() {
        Vec::new()
    } else {
        vec![Issue::RequiredFieldMissing]
    }
}
