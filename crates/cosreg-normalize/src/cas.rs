//! CAS Registry Number parsing, repair and check-digit verification.

use std::sync::LazyLock;

pub use cosreg_model::is_valid_cas_format;
use regex::Regex;

static EMBEDDED_CAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{2,7}-\d{2}-\d\b").expect("Invalid CAS regex"));

/// Result of reading a CAS cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasNumber {
    /// Already in canonical form.
    Valid(String),
    /// Reformatted from free text or a bare digit run.
    Repaired { raw: String, cas: String },
    /// Kept as-is; flagged on the record.
    Malformed(String),
}

impl CasNumber {
    /// Value stored on the record.
    pub fn as_str(&self) -> &str {
        match self {
            CasNumber::Valid(cas) | CasNumber::Repaired { cas, .. } => cas,
            CasNumber::Malformed(raw) => raw,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            CasNumber::Valid(cas) | CasNumber::Repaired { cas, .. } => cas,
            CasNumber::Malformed(raw) => raw,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        !matches!(self, CasNumber::Malformed(_))
    }

    /// Note appended to `Notes`, if any.
    pub fn note(&self) -> Option<String> {
        match self {
            CasNumber::Valid(_) => None,
            CasNumber::Repaired { raw, .. } => Some(format!("CAS number reformatted from '{raw}'")),
            CasNumber::Malformed(raw) => Some(format!("Malformed CAS number: '{raw}'")),
        }
    }
}

/// Reads a CAS cell. Returns `None` for blank input.
pub fn parse_cas_number(raw: &str) -> Option<CasNumber> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_valid_cas_format(trimmed) {
        return Some(CasNumber::Valid(trimmed.to_string()));
    }
    if let Some(found) = EMBEDDED_CAS.find(trimmed) {
        return Some(CasNumber::Repaired {
            raw: trimmed.to_string(),
            cas: found.as_str().to_string(),
        });
    }
    if let Some(cas) = repair_digit_run(trimmed) {
        return Some(CasNumber::Repaired {
            raw: trimmed.to_string(),
            cas,
        });
    }
    Some(CasNumber::Malformed(trimmed.to_string()))
}

/// Formats a bare run of 5-10 digits (separators tolerated) as a CAS number.
fn repair_digit_run(value: &str) -> Option<String> {
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | ' ' | '.'))
    {
        return None;
    }
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if !(5..=10).contains(&digits.len()) {
        return None;
    }
    let (prefix, rest) = digits.split_at(digits.len() - 3);
    let (middle, check) = rest.split_at(2);
    let cas = format!("{prefix}-{middle}-{check}");
    is_valid_cas_format(&cas).then_some(cas)
}

/// Verifies the CAS check digit.
///
/// The check digit equals the sum of the other digits, each multiplied by
/// its position counted from the right, modulo 10. Returns false for
/// values not in canonical format.
pub fn cas_checksum_ok(cas: &str) -> bool {
    if !is_valid_cas_format(cas) {
        return false;
    }
    let digits: Vec<u32> = cas.chars().filter_map(|c| c.to_digit(10)).collect();
    let Some((check, body)) = digits.split_last() else {
        return false;
    };
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, digit)| (idx as u32 + 1) * digit)
        .sum();
    sum % 10 == *check
}
