//! Declarative mapping configuration, one TOML file per jurisdiction.
//!
//! ```toml
//! jurisdiction = "JP"
//!
//! [symbols]
//! "※" = "not_applicable"
//!
//! [tables.preservative]
//! records_path = "/appendices/3"
//! default_status = "Allowed"
//! concentration_unit = "g/100g"
//! legal_basis = "Appendix 3"
//!
//! [tables.preservative.fields]
//! INCI_Name = ["INCI名", "INCI"]
//! CAS_No = "CAS番号"
//!
//! [[tables.preservative.matrix]]
//! source = "粘膜に使用されることがない化粧品のうち洗い流すもの"
//! product_type = "RinseOff"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use cosreg_model::{Jurisdiction, ProductType, Status, TableType};
use cosreg_normalize::{ConcentrationUnit, SymbolMeaning, SymbolTable};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical record fields a mapping can source from the raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    InciName,
    CasNo,
    Status,
    ProductType,
    MaxConcPercent,
    /// Unit of `MaxConcPercent` when given in its own column.
    ConcentrationUnit,
    Conditions,
    LegalBasis,
    UpdateDate,
    Notes,
    LocalName,
    LabelWarnings,
    ColourIndex,
    BodyArea,
    ListName,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 15] = [
        CanonicalField::InciName,
        CanonicalField::CasNo,
        CanonicalField::Status,
        CanonicalField::ProductType,
        CanonicalField::MaxConcPercent,
        CanonicalField::ConcentrationUnit,
        CanonicalField::Conditions,
        CanonicalField::LegalBasis,
        CanonicalField::UpdateDate,
        CanonicalField::Notes,
        CanonicalField::LocalName,
        CanonicalField::LabelWarnings,
        CanonicalField::ColourIndex,
        CanonicalField::BodyArea,
        CanonicalField::ListName,
    ];

    /// Wire name, also the fallback source-field candidate.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::InciName => "INCI_Name",
            CanonicalField::CasNo => "CAS_No",
            CanonicalField::Status => "Status",
            CanonicalField::ProductType => "Product_Type",
            CanonicalField::MaxConcPercent => "Max_Conc_Percent",
            CanonicalField::ConcentrationUnit => "Concentration_Unit",
            CanonicalField::Conditions => "Conditions",
            CanonicalField::LegalBasis => "Legal_Basis",
            CanonicalField::UpdateDate => "Update_Date",
            CanonicalField::Notes => "Notes",
            CanonicalField::LocalName => "Local_Name",
            CanonicalField::LabelWarnings => "Label_Warnings",
            CanonicalField::ColourIndex => "Colour_Index",
            CanonicalField::BodyArea => "Body_Area",
            CanonicalField::ListName => "List_Name",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown canonical field: {s}"))
    }
}

/// One configured candidate or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Candidates {
    One(String),
    Many(Vec<String>),
}

impl From<Candidates> for Vec<String> {
    fn from(candidates: Candidates) -> Self {
        match candidates {
            Candidates::One(name) => vec![name],
            Candidates::Many(names) => names,
        }
    }
}

/// A product-type column in a matrix table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixColumn {
    /// Source field holding the cell for this product type.
    pub source: String,
    pub product_type: ProductType,
}

/// How to read one source table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableMapping {
    /// JSON pointer to the row array inside the raw document.
    #[serde(default)]
    pub records_path: Option<String>,
    #[serde(default)]
    pub default_status: Option<Status>,
    #[serde(default)]
    pub default_product_type: Option<ProductType>,
    /// Unit assumed for cells that carry none.
    #[serde(default)]
    pub concentration_unit: ConcentrationUnit,
    /// Citation used when no source field supplies one.
    #[serde(default)]
    pub legal_basis: Option<String>,
    #[serde(default, deserialize_with = "deserialize_fields")]
    pub fields: BTreeMap<CanonicalField, Vec<String>>,
    #[serde(default)]
    pub matrix: Vec<MatrixColumn>,
}

impl TableMapping {
    /// Source-field candidates for a canonical field, in priority order.
    ///
    /// Unconfigured fields fall back to the canonical wire name.
    pub fn candidates(&self, field: CanonicalField) -> Vec<&str> {
        match self.fields.get(&field) {
            Some(names) if !names.is_empty() => names.iter().map(String::as_str).collect(),
            _ => vec![field.as_str()],
        }
    }

    pub fn status_for(&self, table_type: TableType) -> Status {
        self.default_status
            .unwrap_or_else(|| table_type.default_status())
    }

    pub fn is_matrix(&self) -> bool {
        !self.matrix.is_empty()
    }
}

/// Mapping configuration for one jurisdiction.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JurisdictionMapping {
    pub jurisdiction: Jurisdiction,
    /// Extra symbols on top of the jurisdiction's built-in ones.
    #[serde(default)]
    pub symbols: BTreeMap<String, SymbolMeaning>,
    #[serde(default, deserialize_with = "deserialize_tables")]
    pub tables: BTreeMap<TableType, TableMapping>,
}

impl JurisdictionMapping {
    /// Empty mapping: every table falls back to canonical field names.
    pub fn new(jurisdiction: Jurisdiction) -> Self {
        Self {
            jurisdiction,
            symbols: BTreeMap::new(),
            tables: BTreeMap::new(),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn table(&self, table_type: TableType) -> Option<&TableMapping> {
        self.tables.get(&table_type)
    }

    pub fn table_types(&self) -> impl Iterator<Item = TableType> + '_ {
        self.tables.keys().copied()
    }

    /// Built-in symbols for the jurisdiction plus configured ones.
    pub fn symbol_table(&self) -> SymbolTable {
        let mut table = SymbolTable::for_jurisdiction(self.jurisdiction);
        table.extend(&self.symbols);
        table
    }

    /// Consistency checks that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        for (table_type, mapping) in &self.tables {
            if let Some(pointer) = &mapping.records_path
                && !pointer.is_empty()
                && !pointer.starts_with('/')
            {
                return Err(format!(
                    "tables.{}: records_path '{pointer}' must be a JSON pointer starting with '/'",
                    table_type.file_stem()
                ));
            }
            for column in &mapping.matrix {
                if column.source.trim().is_empty() {
                    return Err(format!(
                        "tables.{}: matrix column with empty source",
                        table_type.file_stem()
                    ));
                }
            }
            if mapping.is_matrix() && mapping.fields.contains_key(&CanonicalField::MaxConcPercent)
            {
                return Err(format!(
                    "tables.{}: Max_Conc_Percent and matrix columns are mutually exclusive",
                    table_type.file_stem()
                ));
            }
        }
        Ok(())
    }
}

fn deserialize_fields<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<CanonicalField, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Candidates>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, candidates)| {
            let field = key.parse::<CanonicalField>().map_err(D::Error::custom)?;
            Ok((field, candidates.into()))
        })
        .collect()
}

fn deserialize_tables<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<TableType, TableMapping>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, TableMapping>::deserialize(deserializer)?;
    let mut tables = BTreeMap::new();
    for (key, mapping) in raw {
        let table_type = key.parse::<TableType>().map_err(D::Error::custom)?;
        if tables.insert(table_type, mapping).is_some() {
            return Err(D::Error::custom(format!(
                "table '{key}' configured more than once"
            )));
        }
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JP: &str = r#"
jurisdiction = "JP"

[symbols]
"※" = "not_applicable"

[tables.preservatives]
records_path = "/appendices/3"
concentration_unit = "g/100g"
legal_basis = "Appendix 3"

[tables.preservatives.fields]
INCI_Name = ["INCI名", "INCI"]
CAS_No = "CAS番号"

[[tables.preservatives.matrix]]
source = "洗い流すもの"
product_type = "RinseOff"
"#;

    #[test]
    fn test_parse_jurisdiction_mapping() {
        let mapping = JurisdictionMapping::from_toml_str(JP).expect("parse mapping");
        assert_eq!(mapping.jurisdiction, Jurisdiction::Jp);
        let table = mapping.table(TableType::Preservative).expect("table");
        assert_eq!(table.concentration_unit, ConcentrationUnit::GramsPer100Grams);
        assert_eq!(table.candidates(CanonicalField::InciName), vec!["INCI名", "INCI"]);
        assert_eq!(table.candidates(CanonicalField::CasNo), vec!["CAS番号"]);
        assert_eq!(table.candidates(CanonicalField::Conditions), vec!["Conditions"]);
        assert_eq!(table.status_for(TableType::Preservative), Status::Allowed);
        assert_eq!(table.matrix[0].product_type, ProductType::RinseOff);
        assert!(mapping.validate().is_ok());
        assert_eq!(
            mapping.symbol_table().lookup("※"),
            Some(SymbolMeaning::NotApplicable)
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = r#"
jurisdiction = "EU"
[tables.restricted.fields]
Max_Conc = ["Maximum concentration"]
"#;
        let err = JurisdictionMapping::from_toml_str(text).unwrap_err();
        assert!(err.to_string().contains("Unknown canonical field"));
    }

    #[test]
    fn test_unknown_table_rejected() {
        let text = r#"
jurisdiction = "EU"
[tables.annex_ix]
"#;
        assert!(JurisdictionMapping::from_toml_str(text).is_err());
    }

    #[test]
    fn test_validate_records_path() {
        let text = r#"
jurisdiction = "CA"
[tables.prohibited]
records_path = "hotlist"
"#;
        let mapping = JurisdictionMapping::from_toml_str(text).expect("parse mapping");
        assert!(mapping.validate().unwrap_err().contains("JSON pointer"));
    }
}
