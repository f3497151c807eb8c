//! Table staging, cross-jurisdiction integration and the parse runner.

pub mod diff;
pub mod error;
pub mod index;
pub mod integrate;
pub mod pipeline;
pub mod store;

pub use diff::{FieldChange, MasterViewDiff, RegulationChange, diff_master_views};
pub use error::IntegrationError;
pub use index::RegulationIndex;
pub use integrate::{Integration, Integrator, integrate};
pub use pipeline::{
    JobSource, ParseJob, ParseReport, ParseRun, RunOptions, SourceFailure, SourceStats,
    SourceSummary, UnreadableSource, discover_jobs, run_parse_jobs,
};
pub use store::TableStore;
