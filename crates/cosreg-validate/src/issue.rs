//! Validation issue types.
//!
//! Each variant carries only the data its message needs; the stable code
//! and default severity are derived from the variant.

use cosreg_map::{RowDiagnostic, RowIssue};
use cosreg_model::{CanonicalRecord, Jurisdiction, Status, TableType};
use serde::{Deserialize, Serialize};

/// Issue severity level. None of them block integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Violates a record invariant
    Error,
    /// Should review
    Warning,
    /// Audit only
    Info,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Issue {
    // Presence
    /// Neither INCI_Name nor CAS_No
    RequiredFieldMissing,
    /// MasterView entry without a record for a jurisdiction
    JurisdictionMissing { jurisdiction: Jurisdiction },
    /// MasterView record filed under another jurisdiction's key
    JurisdictionMisfiled {
        expected: Jurisdiction,
        found: Jurisdiction,
    },

    // Format
    InvalidCasFormat { cas: String },
    CasChecksumMismatch { cas: String },
    ConcentrationOutOfRange { value: f64 },

    // Consistency
    ProhibitedWithConcentration { value: f64 },
    RestrictedWithoutLimits {
        status: Status,
        table_type: TableType,
    },
    StatusTableMismatch {
        status: Status,
        table_type: TableType,
    },
    /// Same ingredient in several tables of one jurisdiction with
    /// differing status
    CrossTableDuplicate { entries: Vec<(TableType, Status)> },
    InciNameVariant { other: String, similarity: f64 },

    // Source rows
    /// Neither a name nor a usable CAS number; row dropped
    RowMissingIdentity,
    RowNotAnObject,
    /// Concentration cell could not be normalized; row dropped
    RowNormalizationFailed { detail: String },
    /// Malformed CAS kept on the record
    RowMalformedCas { value: String },
}

impl From<&RowIssue> for Issue {
    fn from(issue: &RowIssue) -> Self {
        match issue {
            RowIssue::MissingIdentity => Issue::RowMissingIdentity,
            RowIssue::NotAnObject => Issue::RowNotAnObject,
            RowIssue::Normalization(error) => Issue::RowNormalizationFailed {
                detail: error.to_string(),
            },
            RowIssue::MalformedCas { value } => Issue::RowMalformedCas {
                value: value.clone(),
            },
        }
    }
}

impl Issue {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            Issue::RequiredFieldMissing => "REQUIRED_FIELD_MISSING",
            Issue::JurisdictionMissing { .. } => "JURISDICTION_MISSING",
            Issue::JurisdictionMisfiled { .. } => "JURISDICTION_MISSING",
            Issue::InvalidCasFormat { .. } => "INVALID_CAS_FORMAT",
            Issue::CasChecksumMismatch { .. } => "CAS_CHECKSUM_MISMATCH",
            Issue::ConcentrationOutOfRange { .. } => "CONCENTRATION_OUT_OF_RANGE",
            Issue::ProhibitedWithConcentration { .. } => "PROHIBITED_WITH_CONCENTRATION",
            Issue::RestrictedWithoutLimits { .. } => "RESTRICTED_WITHOUT_LIMITS",
            Issue::StatusTableMismatch { .. } => "STATUS_TABLE_MISMATCH",
            Issue::CrossTableDuplicate { .. } => "CROSS_TABLE_DUPLICATE",
            Issue::InciNameVariant { .. } => "INCI_NAME_VARIANT",
            Issue::RowMissingIdentity => "MISSING_IDENTITY",
            Issue::RowNotAnObject => "NOT_AN_OBJECT",
            Issue::RowNormalizationFailed { .. } => "NORMALIZATION_ERROR",
            Issue::RowMalformedCas { .. } => "MALFORMED_CAS",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Issue::RestrictedWithoutLimits { .. }
            | Issue::StatusTableMismatch { .. }
            | Issue::CasChecksumMismatch { .. }
            | Issue::RowMissingIdentity
            | Issue::RowNotAnObject => Severity::Warning,
            Issue::CrossTableDuplicate { .. }
            | Issue::InciNameVariant { .. }
            | Issue::RowMalformedCas { .. } => Severity::Info,
            _ => Severity::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Issue::RequiredFieldMissing => "Record has neither INCI_Name nor CAS_No".to_string(),
            Issue::JurisdictionMissing { jurisdiction } => {
                format!("No {jurisdiction} regulation in master view entry")
            }
            Issue::JurisdictionMisfiled { expected, found } => {
                format!("{found} record filed under {expected}")
            }
            Issue::InvalidCasFormat { cas } => {
                format!("CAS number '{cas}' is not in NNNNNNN-NN-N format")
            }
            Issue::CasChecksumMismatch { cas } => {
                format!("CAS number '{cas}' fails its check digit")
            }
            Issue::ConcentrationOutOfRange { value } => {
                format!("Max_Conc_Percent {value} is outside 0-100")
            }
            Issue::ProhibitedWithConcentration { value } => {
                format!("Prohibited entry carries Max_Conc_Percent {value}")
            }
            Issue::RestrictedWithoutLimits { status, table_type } => format!(
                "{status} entry in {table_type} table has neither a concentration ceiling nor conditions"
            ),
            Issue::StatusTableMismatch { status, table_type } => {
                format!("Status {status} is unusual for the {table_type} table")
            }
            Issue::CrossTableDuplicate { entries } => {
                let listed: Vec<String> = entries
                    .iter()
                    .map(|(table, status)| format!("{table} ({status})"))
                    .collect();
                format!(
                    "Listed in {} tables with differing status: {}",
                    entries.len(),
                    listed.join(", ")
                )
            }
            Issue::InciNameVariant { other, similarity } => {
                format!("INCI name is nearly identical to '{other}' (similarity {similarity:.3})")
            }
            Issue::RowMissingIdentity => {
                "Row dropped: neither INCI_Name nor a usable CAS_No".to_string()
            }
            Issue::RowNotAnObject => "Row dropped: not a key-value record".to_string(),
            Issue::RowNormalizationFailed { detail } => format!("Row dropped: {detail}"),
            Issue::RowMalformedCas { value } => {
                format!("Malformed CAS number '{value}' kept and flagged")
            }
        }
    }
}

/// Locates the record or entry a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<Jurisdiction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_type: Option<TableType>,
    /// Position in the validated record batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// 1-based row in the source table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl RecordRef {
    pub fn record(record: &CanonicalRecord, index: Option<usize>) -> Self {
        Self {
            name: record.display_name().to_string(),
            jurisdiction: Some(record.jurisdiction),
            table_type: record.table_type,
            index,
            row: None,
        }
    }

    pub fn entry(name: impl Into<String>, jurisdiction: Option<Jurisdiction>) -> Self {
        Self {
            name: name.into(),
            jurisdiction,
            table_type: None,
            index: None,
            row: None,
        }
    }

    pub fn source_row(diagnostic: &RowDiagnostic) -> Self {
        Self {
            name: format!("row {}", diagnostic.row),
            jurisdiction: Some(diagnostic.jurisdiction),
            table_type: Some(diagnostic.table_type),
            index: None,
            row: Some(diagnostic.row),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub record_ref: RecordRef,
}

impl Diagnostic {
    pub fn new(issue: &Issue, record_ref: RecordRef) -> Self {
        Self {
            code: issue.code().to_string(),
            severity: issue.severity(),
            message: issue.message(),
            record_ref,
        }
    }
}
