//! Type-safe enumerations for regulation metadata.
//!
//! Source documents spell these concepts in many ways (English, Japanese,
//! Chinese, snake_case file names). The enums give them one canonical form
//! and one canonical wire name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A regulatory jurisdiction publishing cosmetics ingredient lists.
///
/// The declaration order is the fixed jurisdiction order used everywhere
/// output is enumerated (MasterView columns, statistics, backfill).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    /// European Union, Regulation (EC) No 1223/2009.
    Eu,
    /// ASEAN Cosmetic Directive.
    Asean,
    /// Japan, MHLW Standards for Cosmetics.
    Jp,
    /// Canada, Cosmetic Ingredient Hotlist.
    Ca,
    /// China, Safety and Technical Standards for Cosmetics.
    Cn,
}

impl Jurisdiction {
    /// Every supported jurisdiction, in canonical order.
    pub const ALL: [Jurisdiction; 5] = [
        Jurisdiction::Eu,
        Jurisdiction::Asean,
        Jurisdiction::Jp,
        Jurisdiction::Ca,
        Jurisdiction::Cn,
    ];

    /// Returns the short code (`EU`, `ASEAN`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::Eu => "EU",
            Jurisdiction::Asean => "ASEAN",
            Jurisdiction::Jp => "JP",
            Jurisdiction::Ca => "CA",
            Jurisdiction::Cn => "CN",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Jurisdiction::Eu => "European Union",
            Jurisdiction::Asean => "ASEAN",
            Jurisdiction::Jp => "Japan",
            Jurisdiction::Ca => "Canada",
            Jurisdiction::Cn => "China",
        }
    }

    /// The governing instrument, as cited in source documents.
    pub fn regulation(&self) -> &'static str {
        match self {
            Jurisdiction::Eu => "Regulation (EC) No 1223/2009",
            Jurisdiction::Asean => "ASEAN Cosmetic Directive",
            Jurisdiction::Jp => "Standards for Cosmetics (MHLW Notification No.331)",
            Jurisdiction::Ca => "Cosmetic Ingredient Hotlist",
            Jurisdiction::Cn => "Safety and Technical Standards for Cosmetics (2015)",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Jurisdiction {
    type Err = String;

    /// Parse a jurisdiction code (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EU" => Ok(Jurisdiction::Eu),
            "ASEAN" => Ok(Jurisdiction::Asean),
            "JP" | "JAPAN" => Ok(Jurisdiction::Jp),
            "CA" | "CANADA" => Ok(Jurisdiction::Ca),
            "CN" | "CHINA" => Ok(Jurisdiction::Cn),
            _ => Err(format!("Unknown jurisdiction: {s}")),
        }
    }
}

/// The six regulation tables every jurisdiction is normalized into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TableType {
    /// Substances that may not be used at all (EU Annex II, JP Appendix 1).
    Prohibited,
    /// Substances permitted only under limits or conditions (EU Annex III).
    Restricted,
    /// Positive list of preservatives (EU Annex V).
    Preservative,
    /// Positive list of UV filters (EU Annex VI).
    #[serde(rename = "UVFilter")]
    UvFilter,
    /// Positive list of colorants (EU Annex IV).
    Colorant,
    /// General inventory of used ingredients (CN IECIC).
    Whitelist,
}

impl TableType {
    /// Every table type, in canonical order.
    pub const ALL: [TableType; 6] = [
        TableType::Prohibited,
        TableType::Restricted,
        TableType::Preservative,
        TableType::UvFilter,
        TableType::Colorant,
        TableType::Whitelist,
    ];

    /// Returns the canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::Prohibited => "Prohibited",
            TableType::Restricted => "Restricted",
            TableType::Preservative => "Preservative",
            TableType::UvFilter => "UVFilter",
            TableType::Colorant => "Colorant",
            TableType::Whitelist => "Whitelist",
        }
    }

    /// File stem used for per-table artifacts and source discovery.
    pub fn file_stem(&self) -> &'static str {
        match self {
            TableType::Prohibited => "prohibited",
            TableType::Restricted => "restricted",
            TableType::Preservative => "preservatives",
            TableType::UvFilter => "uv_filters",
            TableType::Colorant => "colorants",
            TableType::Whitelist => "whitelist",
        }
    }

    /// Status a record from this table carries unless configured otherwise.
    pub fn default_status(&self) -> Status {
        match self {
            TableType::Prohibited => Status::Prohibited,
            TableType::Restricted => Status::Restricted,
            TableType::Preservative | TableType::UvFilter | TableType::Colorant => Status::Allowed,
            TableType::Whitelist => Status::Listed,
        }
    }

    /// Returns true for positive lists that normally declare a ceiling or
    /// conditions for each entry.
    pub fn is_positive_list(&self) -> bool {
        matches!(
            self,
            TableType::Preservative | TableType::UvFilter | TableType::Colorant
        )
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TableType {
    type Err = String;

    /// Parse a table type from its wire name, file stem or common aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");

        match normalized.as_str() {
            "prohibited" | "banned" => Ok(TableType::Prohibited),
            "restricted" => Ok(TableType::Restricted),
            "preservative" | "preservatives" => Ok(TableType::Preservative),
            "uvfilter" | "uv_filter" | "uv_filters" | "uvfilters" => Ok(TableType::UvFilter),
            "colorant" | "colorants" | "colourant" | "colourants" | "tar_colors" => {
                Ok(TableType::Colorant)
            }
            "whitelist" | "inventory" => Ok(TableType::Whitelist),
            _ => Err(format!("Unknown table type: {s}")),
        }
    }
}

/// Regulatory status of an ingredient in one jurisdiction.
///
/// Declaration order is the restrictiveness order, so the derived
/// `Ord` and [`Status::priority`] agree: lower is more restrictive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Status {
    /// Must not be used.
    Prohibited,
    /// Usable under a ceiling or conditions.
    Restricted,
    /// Explicitly permitted (positive lists).
    Allowed,
    /// Present in an inventory without further qualification.
    Listed,
    /// No record exists for the ingredient in the jurisdiction.
    NotSpecified,
}

impl Status {
    /// Every status, most restrictive first.
    pub const ALL: [Status; 5] = [
        Status::Prohibited,
        Status::Restricted,
        Status::Allowed,
        Status::Listed,
        Status::NotSpecified,
    ];

    /// Priority value when statuses compete (1 wins over 5).
    pub fn priority(&self) -> u8 {
        match self {
            Status::Prohibited => 1,
            Status::Restricted => 2,
            Status::Allowed => 3,
            Status::Listed => 4,
            Status::NotSpecified => 5,
        }
    }

    /// Returns true when `self` takes precedence over `other`.
    ///
    /// Equal statuses do not outrank each other; the caller keeps the first
    /// one encountered.
    pub fn outranks(&self, other: Status) -> bool {
        self.priority() < other.priority()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Prohibited => "Prohibited",
            Status::Restricted => "Restricted",
            Status::Allowed => "Allowed",
            Status::Listed => "Listed",
            Status::NotSpecified => "NotSpecified",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    /// Parse a status string, including the spellings used by source lists.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = trimmed.to_lowercase().replace(['-', ' '], "_");

        match normalized.as_str() {
            "prohibited" | "banned" | "forbidden" | "禁用" | "禁止" => Ok(Status::Prohibited),
            "restricted" | "limited" | "限用" | "制限" => Ok(Status::Restricted),
            "allowed" | "permitted" | "允用" | "許可" => Ok(Status::Allowed),
            "listed" | "已使用" => Ok(Status::Listed),
            "notspecified" | "not_specified" | "未规定" => Ok(Status::NotSpecified),
            _ => Err(format!("Unknown status: {trimmed}")),
        }
    }
}

/// Product category a limit applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ProductType {
    RinseOff,
    LeaveOn,
    Hair,
    Oral,
    EyeArea,
    Skin,
    Lip,
    Nail,
    /// Products that may contact mucous membranes.
    Mucosa,
    /// Products that never contact mucous membranes.
    NonMucosa,
    /// The limit applies to every product category.
    All,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::RinseOff => "RinseOff",
            ProductType::LeaveOn => "LeaveOn",
            ProductType::Hair => "Hair",
            ProductType::Oral => "Oral",
            ProductType::EyeArea => "EyeArea",
            ProductType::Skin => "Skin",
            ProductType::Lip => "Lip",
            ProductType::Nail => "Nail",
            ProductType::Mucosa => "Mucosa",
            ProductType::NonMucosa => "NonMucosa",
            ProductType::All => "All",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    /// Parse a canonical product type name (case and separator insensitive).
    ///
    /// Free-text labels from source documents go through the normalizer's
    /// alias table instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_', ' '], "");

        match normalized.as_str() {
            "rinseoff" => Ok(ProductType::RinseOff),
            "leaveon" => Ok(ProductType::LeaveOn),
            "hair" => Ok(ProductType::Hair),
            "oral" => Ok(ProductType::Oral),
            "eyearea" | "eye" => Ok(ProductType::EyeArea),
            "skin" => Ok(ProductType::Skin),
            "lip" | "lips" => Ok(ProductType::Lip),
            "nail" | "nails" => Ok(ProductType::Nail),
            "mucosa" => Ok(ProductType::Mucosa),
            "nonmucosa" => Ok(ProductType::NonMucosa),
            "all" => Ok(ProductType::All),
            _ => Err(format!("Unknown product type: {s}")),
        }
    }
}
