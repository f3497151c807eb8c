//! Conversion of raw concentration cells into a canonical percentage.

use std::sync::LazyLock;

use cosreg_model::Jurisdiction;
use regex::Regex;
use tracing::debug;

use crate::error::NormalizationError;
use crate::symbol::{SymbolMeaning, SymbolTable};
use crate::unit::ConcentrationUnit;

/// A number with an optional trailing unit: `0.5`, `1,000 ppm`, `2.5 %`.
static VALUE_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?(?:\d[\d,]*(?:\.\d+)?|\.\d+)(?:[eE][+-]?\d+)?)\s*(.*)$")
        .expect("Invalid concentration regex")
});

/// Leading comparison markers that carry no information for a ceiling.
const CEILING_PREFIXES: &[&str] = &["maximum", "max.", "max", "up to", "<=", "≤", "<", "≦"];

/// Outcome of normalizing one concentration cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Concentration {
    /// A ceiling in percent, within `[0, 100]`.
    Percent(f64),
    NoLimit,
    NotApplicable,
    /// Blank cell or explicit "not permitted" symbol; no record is emitted.
    NotPermitted,
}

impl Concentration {
    pub fn value(&self) -> Option<f64> {
        match self {
            Concentration::Percent(value) => Some(*value),
            _ => None,
        }
    }

    /// Note carried into the record's `Notes` field.
    pub fn note(&self) -> Option<&'static str> {
        match self {
            Concentration::NoLimit => Some("No Limit"),
            Concentration::NotApplicable => Some("Not Applicable"),
            _ => None,
        }
    }

    /// `(value, note)` pair.
    pub fn into_pair(self) -> (Option<f64>, Option<&'static str>) {
        (self.value(), self.note())
    }

    pub fn is_permitted(&self) -> bool {
        !matches!(self, Concentration::NotPermitted)
    }
}

impl From<SymbolMeaning> for Concentration {
    fn from(meaning: SymbolMeaning) -> Self {
        match meaning {
            SymbolMeaning::NoLimit => Concentration::NoLimit,
            SymbolMeaning::NotApplicable => Concentration::NotApplicable,
            SymbolMeaning::NotPermitted => Concentration::NotPermitted,
        }
    }
}

/// Normalizer configured for one jurisdiction and source table.
#[derive(Debug, Clone)]
pub struct Normalizer {
    jurisdiction: Jurisdiction,
    symbols: SymbolTable,
    default_unit: ConcentrationUnit,
}

impl Normalizer {
    pub fn new(jurisdiction: Jurisdiction) -> Self {
        Self {
            jurisdiction,
            symbols: SymbolTable::for_jurisdiction(jurisdiction),
            default_unit: ConcentrationUnit::Percent,
        }
    }

    /// Unit assumed when neither the cell nor the unit field names one.
    pub fn with_default_unit(mut self, unit: ConcentrationUnit) -> Self {
        self.default_unit = unit;
        self
    }

    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Normalizes one cell.
    ///
    /// Unit precedence: a unit embedded in `raw`, then `unit`, then the
    /// default unit.
    pub fn normalize(
        &self,
        raw: &str,
        unit: Option<&str>,
    ) -> Result<Concentration, NormalizationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Concentration::NotPermitted);
        }
        if let Some(meaning) = self.symbols.lookup(trimmed) {
            return Ok(meaning.into());
        }

        let stripped = strip_ceiling_prefix(trimmed);
        let Some(caps) = VALUE_WITH_UNIT.captures(stripped) else {
            return Err(NormalizationError::Unparseable {
                value: trimmed.to_string(),
            });
        };

        let number_text = caps[1].replace(',', "");
        let number: f64 = number_text
            .parse()
            .map_err(|_| NormalizationError::Unparseable {
                value: trimmed.to_string(),
            })?;

        let embedded = caps[2].trim();
        let unit = if !embedded.is_empty() {
            parse_unit(trimmed, embedded)?
        } else {
            match unit.map(str::trim).filter(|u| !u.is_empty()) {
                Some(field) => parse_unit(trimmed, field)?,
                None => self.default_unit,
            }
        };

        let percent = unit.to_percent(number);
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(NormalizationError::OutOfRange {
                value: trimmed.to_string(),
                percent,
            });
        }

        debug!(
            jurisdiction = %self.jurisdiction,
            raw = trimmed,
            unit = %unit,
            percent,
            "normalized concentration"
        );
        Ok(Concentration::Percent(percent))
    }
}

/// Normalizes a concentration with the jurisdiction's built-in symbols and
/// percent as the default unit.
pub fn normalize_concentration(
    raw: &str,
    unit: Option<&str>,
    jurisdiction: Jurisdiction,
) -> Result<Concentration, NormalizationError> {
    Normalizer::new(jurisdiction).normalize(raw, unit)
}

fn parse_unit(value: &str, unit: &str) -> Result<ConcentrationUnit, NormalizationError> {
    unit.parse::<ConcentrationUnit>()
        .map_err(|_| NormalizationError::UnknownUnit {
            value: value.to_string(),
            unit: unit.to_string(),
        })
}

fn strip_ceiling_prefix(value: &str) -> &str {
    let lower = value.to_lowercase();
    for prefix in CEILING_PREFIXES {
        // Lowercasing keeps byte offsets for these ASCII and symbol prefixes.
        if lower.starts_with(prefix) && value.is_char_boundary(prefix.len()) {
            return value[prefix.len()..].trim_start();
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eu(raw: &str, unit: Option<&str>) -> Result<Concentration, NormalizationError> {
        normalize_concentration(raw, unit, Jurisdiction::Eu)
    }

    #[test]
    fn test_percent_passes_through() {
        assert_eq!(eu("0.3", Some("%")).unwrap(), Concentration::Percent(0.3));
        assert_eq!(eu("0.3%", None).unwrap(), Concentration::Percent(0.3));
        assert_eq!(eu("25", None).unwrap(), Concentration::Percent(25.0));
    }

    #[test]
    fn test_ppm_converts() {
        assert_eq!(eu("1000", Some("ppm")).unwrap().into_pair(), (Some(0.1), None));
        assert_eq!(eu("1,000 ppm", None).unwrap(), Concentration::Percent(0.1));
    }

    #[test]
    fn test_embedded_unit_wins_over_field() {
        assert_eq!(eu("1000 ppm", Some("%")).unwrap(), Concentration::Percent(0.1));
    }

    #[test]
    fn test_default_unit_applies_last() {
        let normalizer =
            Normalizer::new(Jurisdiction::Jp).with_default_unit(ConcentrationUnit::GramsPer100Grams);
        assert_eq!(normalizer.normalize("0.5", None).unwrap(), Concentration::Percent(0.5));
        assert_eq!(
            normalizer.normalize("10", Some("mg/kg")).unwrap(),
            Concentration::Percent(0.001)
        );
    }

    #[test]
    fn test_ceiling_prefixes() {
        assert_eq!(eu("max 0.5 %", None).unwrap(), Concentration::Percent(0.5));
        assert_eq!(eu("≤ 2%", None).unwrap(), Concentration::Percent(2.0));
        assert_eq!(eu("Up to 10", None).unwrap(), Concentration::Percent(10.0));
    }

    #[test]
    fn test_jp_symbols() {
        let jp = |raw: &str| normalize_concentration(raw, None, Jurisdiction::Jp).unwrap();
        assert_eq!(jp("○").into_pair(), (None, Some("No Limit")));
        assert_eq!(jp("-").into_pair(), (None, Some("Not Applicable")));
        assert_eq!(jp(""), Concentration::NotPermitted);
        assert_eq!(jp("   "), Concentration::NotPermitted);
    }

    #[test]
    fn test_unknown_unit_names_value_and_unit() {
        let err = eu("5", Some("mol/L")).unwrap_err();
        assert_eq!(
            err,
            NormalizationError::UnknownUnit {
                value: "5".to_string(),
                unit: "mol/L".to_string()
            }
        );
        assert!(err.to_string().contains("mol/L"));
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            eu("150", Some("%")),
            Err(NormalizationError::OutOfRange { .. })
        ));
        assert!(matches!(
            eu("-1", None),
            Err(NormalizationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_unparseable() {
        assert!(matches!(
            eu("see annex", None),
            Err(NormalizationError::Unparseable { .. })
        ));
    }
}
