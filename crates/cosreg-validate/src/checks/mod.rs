//! Individual checks. Record-level checks look at one record at a time;
//! the others need the whole batch or master view.

pub mod cas;
pub mod coverage;
pub mod duplicates;
pub mod limits;
pub mod names;
pub mod presence;
pub mod status;

use cosreg_model::CanonicalRecord;

use crate::issue::Issue;

/// Every record-level check, in a fixed order.
pub fn record_issues(record: &CanonicalRecord) -> Vec<Issue> {
    let mut issues = presence::check(record);
    issues.extend(cas::check(record));
    issues.extend(limits::check(record));
    issues.extend(status::check(record));
    issues
}
