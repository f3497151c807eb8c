//! Output artifacts: per-table collections, the master view, statistics,
//! the validation and parse reports, and a SHA-256 manifest.

pub mod atomic;
pub mod error;
pub mod hash;
pub mod writer;

pub use atomic::write_atomic;
pub use error::OutputError;
pub use hash::sha256_hex;
pub use writer::{
    ArtifactWriter, MANIFEST_FILE, MASTER_VIEW_FILE, Manifest, ManifestEntry, PARSE_REPORT_FILE,
    PARSED_DIR, STATISTICS_FILE, VALIDATION_REPORT_FILE, table_artifact_path,
};
