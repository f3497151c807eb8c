/// A concentration expression that could not be turned into a percentage.
///
/// Row-scoped: the parser drops the offending row and records a diagnostic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizationError {
    #[error("unrecognized unit '{unit}' in concentration '{value}'")]
    UnknownUnit { value: String, unit: String },

    #[error("unparseable concentration '{value}'")]
    Unparseable { value: String },

    #[error("concentration '{value}' converts to {percent}%, outside 0-100%")]
    OutOfRange { value: String, percent: f64 },
}

impl NormalizationError {
    /// The raw value that triggered the error.
    pub fn value(&self) -> &str {
        match self {
            Self::UnknownUnit { value, .. }
            | Self::Unparseable { value }
            | Self::OutOfRange { value, .. } => value,
        }
    }
}
