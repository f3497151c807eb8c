pub mod artifact;
pub mod enums;
pub mod master_view;
pub mod record;
pub mod statistics;

pub use artifact::TableCollection;
pub use enums::{Jurisdiction, ProductType, Status, TableType};
pub use master_view::{MasterView, MasterViewEntry};
pub use record::{CanonicalRecord, IdentityKey, is_valid_cas_format, normalize_inci};
pub use statistics::{JurisdictionStats, Statistics, TableStats};
