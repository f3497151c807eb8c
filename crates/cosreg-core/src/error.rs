use cosreg_model::{IdentityKey, Jurisdiction};

/// A broken integration invariant. Indicates a logic error, never a data
/// quality problem, and must stop the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrationError {
    #[error("integration invariant violated for {key}: {message}")]
    InvariantViolation { key: String, message: String },
}

impl IntegrationError {
    pub(crate) fn missing_identity(jurisdiction: Jurisdiction, index: usize) -> Self {
        Self::InvariantViolation {
            key: format!("record #{index}"),
            message: format!("{jurisdiction} record has neither INCI_Name nor CAS_No"),
        }
    }

    pub(crate) fn violation(key: &IdentityKey, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
