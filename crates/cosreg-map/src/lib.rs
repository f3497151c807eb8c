//! Declarative field mapping from raw regulation documents to canonical
//! records.

pub mod config;
pub mod document;
pub mod error;
pub mod legal_basis;
pub mod parser;
pub mod paths;
pub mod registry;

pub use config::{CanonicalField, JurisdictionMapping, MatrixColumn, TableMapping};
pub use document::RawDocument;
pub use error::{MappingError, RowIssue, SourceReadError};
pub use legal_basis::default_legal_basis;
pub use parser::{
    FieldMappingParser, ParseOutcome, ParseStats, RowDiagnostic, parse, parse_with_symbols,
};
pub use paths::{MAPPINGS_ENV_VAR, mappings_root};
pub use registry::{MappingRegistry, load_mapping_file};
