//! Canonical regulation records and the identity key used to match them.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::enums::{Jurisdiction, ProductType, Status, TableType};

/// Canonical CAS format: 2-7 digits, 2 digits, 1 check digit.
static CAS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,7}-\d{2}-\d$").expect("Invalid CAS regex"));

/// Returns true when `value` matches the canonical CAS format.
pub fn is_valid_cas_format(value: &str) -> bool {
    CAS_PATTERN.is_match(value)
}

/// Normalizes an INCI name for identity matching.
///
/// Trims, collapses internal whitespace and lowercases. Display names keep
/// their original casing; only the key is normalized.
pub fn normalize_inci(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Key used to recognise the same ingredient across jurisdictions and tables.
///
/// A well-formed CAS number wins; otherwise the normalized INCI name.
/// Placeholder CAS text such as `-` never becomes a key, so unrelated
/// ingredients sharing it stay apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum IdentityKey {
    Cas(String),
    Inci(String),
}

impl IdentityKey {
    /// Builds the key from raw identity fields. Returns `None` when there is
    /// neither a well-formed CAS number nor a non-empty INCI name.
    pub fn from_parts(inci_name: Option<&str>, cas_no: Option<&str>) -> Option<Self> {
        if let Some(cas) = cas_no.map(str::trim).filter(|c| is_valid_cas_format(c)) {
            return Some(IdentityKey::Cas(cas.to_string()));
        }
        inci_name
            .map(normalize_inci)
            .filter(|name| !name.is_empty())
            .map(IdentityKey::Inci)
    }

    pub fn value(&self) -> &str {
        match self {
            IdentityKey::Cas(value) | IdentityKey::Inci(value) => value,
        }
    }

    pub fn is_cas(&self) -> bool {
        matches!(self, IdentityKey::Cas(_))
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Cas(cas) => write!(f, "CAS:{cas}"),
            IdentityKey::Inci(name) => write!(f, "INCI:{name}"),
        }
    }
}

/// One normalized regulation entry: one ingredient, one jurisdiction, one
/// source table.
///
/// Records are created by a parse run and never mutated afterwards, except
/// that the integrator annotates `Notes` on its own resolved copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(rename = "INCI_Name")]
    pub inci_name: Option<String>,
    #[serde(rename = "CAS_No")]
    pub cas_no: Option<String>,
    #[serde(rename = "Jurisdiction")]
    pub jurisdiction: Jurisdiction,
    /// Source table. `None` only on synthetic `NotSpecified` placeholders.
    #[serde(rename = "Table_Type")]
    pub table_type: Option<TableType>,
    #[serde(rename = "Status")]
    pub status: Status,
    #[serde(rename = "Product_Type")]
    pub product_type: Option<ProductType>,
    /// Ceiling in percent; `None` means no declared numeric ceiling.
    #[serde(rename = "Max_Conc_Percent")]
    pub max_conc_percent: Option<f64>,
    #[serde(rename = "Conditions")]
    pub conditions: Option<String>,
    #[serde(rename = "Legal_Basis")]
    pub legal_basis: Option<String>,
    #[serde(rename = "Update_Date")]
    pub update_date: Option<NaiveDate>,
    #[serde(rename = "Notes")]
    pub notes: Option<String>,
    /// Display name in the source's own language.
    #[serde(rename = "Local_Name", default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    #[serde(
        rename = "Label_Warnings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub label_warnings: Option<String>,
    #[serde(
        rename = "Colour_Index",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub colour_index: Option<String>,
    #[serde(rename = "Body_Area", default, skip_serializing_if = "Option::is_none")]
    pub body_area: Option<String>,
    #[serde(rename = "List_Name", default, skip_serializing_if = "Option::is_none")]
    pub list_name: Option<String>,
}

impl CanonicalRecord {
    /// Creates an empty record for a source table.
    pub fn new(jurisdiction: Jurisdiction, table_type: TableType, status: Status) -> Self {
        Self {
            inci_name: None,
            cas_no: None,
            jurisdiction,
            table_type: Some(table_type),
            status,
            product_type: None,
            max_conc_percent: None,
            conditions: None,
            legal_basis: None,
            update_date: None,
            notes: None,
            local_name: None,
            label_warnings: None,
            colour_index: None,
            body_area: None,
            list_name: None,
        }
    }

    /// Synthetic placeholder for a jurisdiction with no matching record.
    ///
    /// Identity fields are carried over and everything else is null.
    pub fn not_specified(
        inci_name: Option<String>,
        cas_no: Option<String>,
        jurisdiction: Jurisdiction,
    ) -> Self {
        Self {
            inci_name,
            cas_no,
            table_type: None,
            ..Self::new(jurisdiction, TableType::Prohibited, Status::NotSpecified)
        }
    }

    pub fn with_inci_name(mut self, name: impl Into<String>) -> Self {
        self.inci_name = Some(name.into());
        self
    }

    pub fn with_cas_no(mut self, cas: impl Into<String>) -> Self {
        self.cas_no = Some(cas.into());
        self
    }

    pub fn with_max_conc(mut self, percent: f64) -> Self {
        self.max_conc_percent = Some(percent);
        self
    }

    pub fn with_conditions(mut self, conditions: impl Into<String>) -> Self {
        self.conditions = Some(conditions.into());
        self
    }

    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = Some(product_type);
        self
    }

    /// Identity key, or `None` if the record carries neither INCI nor CAS.
    pub fn identity_key(&self) -> Option<IdentityKey> {
        IdentityKey::from_parts(self.inci_name.as_deref(), self.cas_no.as_deref())
    }

    /// A record needs an INCI name or a well-formed CAS number.
    pub fn has_identity(&self) -> bool {
        self.identity_key().is_some()
    }

    /// Appends to `Notes` using ` | ` as separator.
    pub fn append_note(&mut self, note: impl AsRef<str>) {
        let note = note.as_ref();
        match self.notes.as_mut() {
            Some(existing) if !existing.is_empty() => {
                existing.push_str(" | ");
                existing.push_str(note);
            }
            _ => self.notes = Some(note.to_string()),
        }
    }

    /// Best label for messages: INCI name, then CAS number.
    pub fn display_name(&self) -> &str {
        self.inci_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.cas_no.as_deref())
            .unwrap_or("<unnamed>")
    }

    pub fn is_placeholder(&self) -> bool {
        self.status == Status::NotSpecified && self.table_type.is_none()
    }
}
