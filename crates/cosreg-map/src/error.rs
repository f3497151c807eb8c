use std::path::PathBuf;

use cosreg_model::Jurisdiction;
use cosreg_normalize::NormalizationError;

/// Failure loading mapping configuration.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("failed to read mapping file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML mapping {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid mapping {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("duplicate mapping for jurisdiction {jurisdiction}: {path}")]
    DuplicateJurisdiction {
        jurisdiction: Jurisdiction,
        path: PathBuf,
    },

    #[error("no mapping files found in {path}")]
    Empty { path: PathBuf },
}

impl MappingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A raw document that could not be read as a structured document at all.
///
/// Fatal for the contribution of the document's jurisdiction.
#[derive(Debug, thiserror::Error)]
pub enum SourceReadError {
    #[error("failed to read source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source {origin} is not valid JSON: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("source {origin} is not valid CSV: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported source format for {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("no record array at '{records_path}' in {origin}")]
    RecordsNotFound {
        origin: String,
        records_path: String,
    },
}

impl SourceReadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Row-scoped problem. The row (or only its flagged field) is affected;
/// the batch continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowIssue {
    #[error("row has neither INCI_Name nor CAS_No")]
    MissingIdentity,

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error("row is not a key-value record")]
    NotAnObject,

    #[error("malformed CAS number '{value}' kept and flagged")]
    MalformedCas { value: String },
}

impl RowIssue {
    /// Returns true when the row was dropped because of this issue.
    pub fn drops_row(&self) -> bool {
        !matches!(self, RowIssue::MalformedCas { .. })
    }

    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            RowIssue::MissingIdentity => "MISSING_IDENTITY",
            RowIssue::Normalization(_) => "NORMALIZATION_ERROR",
            RowIssue::NotAnObject => "NOT_AN_OBJECT",
            RowIssue::MalformedCas { .. } => "MALFORMED_CAS",
        }
    }
}
