//! Every master view entry carries one record per jurisdiction, filed under
//! its own key.

use cosreg_model::{Jurisdiction, MasterViewEntry};

use crate::issue::Issue;

pub fn check(entry: &MasterViewEntry) -> Vec<Issue> {
    let mut issues = Vec::new();
    for jurisdiction in Jurisdiction::ALL {
        match entry.regulation(jurisdiction) {
            None => issues.push(Issue::JurisdictionMissing { jurisdiction }),
            Some(record) if record.jurisdiction != jurisdiction => {
                issues.push(Issue::JurisdictionMisfiled {
                    expected: jurisdiction,
                    found: record.jurisdiction,
                });
            }
            Some(_) => {}
        }
    }
    issues
}
