//! Concentration units and their conversion to percent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A mass-per-mass unit found in regulation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConcentrationUnit {
    /// `%` and `w/w%`.
    #[default]
    Percent,
    /// `g/100g`, numerically identical to percent.
    GramsPer100Grams,
    /// `ppm`.
    Ppm,
    /// `mg/kg`, identical to ppm.
    MilligramsPerKilogram,
    /// `ppb`.
    Ppb,
    /// `g/kg`.
    GramsPerKilogram,
}

impl ConcentrationUnit {
    pub const ALL: [ConcentrationUnit; 6] = [
        ConcentrationUnit::Percent,
        ConcentrationUnit::GramsPer100Grams,
        ConcentrationUnit::Ppm,
        ConcentrationUnit::MilligramsPerKilogram,
        ConcentrationUnit::Ppb,
        ConcentrationUnit::GramsPerKilogram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConcentrationUnit::Percent => "%",
            ConcentrationUnit::GramsPer100Grams => "g/100g",
            ConcentrationUnit::Ppm => "ppm",
            ConcentrationUnit::MilligramsPerKilogram => "mg/kg",
            ConcentrationUnit::Ppb => "ppb",
            ConcentrationUnit::GramsPerKilogram => "g/kg",
        }
    }

    /// Divide a value in this unit by the divisor to get percent.
    ///
    /// Division by an exact power of ten keeps `1000 ppm` at exactly `0.1`.
    pub fn percent_divisor(&self) -> f64 {
        match self {
            ConcentrationUnit::Percent | ConcentrationUnit::GramsPer100Grams => 1.0,
            ConcentrationUnit::Ppm | ConcentrationUnit::MilligramsPerKilogram => 10_000.0,
            ConcentrationUnit::Ppb => 10_000_000.0,
            ConcentrationUnit::GramsPerKilogram => 10.0,
        }
    }

    pub fn to_percent(&self, value: f64) -> f64 {
        let divisor = self.percent_divisor();
        if divisor == 1.0 { value } else { value / divisor }
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConcentrationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase()
            .replace('％', "%");

        match compact.as_str() {
            "%" | "w/w%" | "%w/w" | "%(w/w)" | "percent" => Ok(ConcentrationUnit::Percent),
            "g/100g" => Ok(ConcentrationUnit::GramsPer100Grams),
            "ppm" => Ok(ConcentrationUnit::Ppm),
            "mg/kg" => Ok(ConcentrationUnit::MilligramsPerKilogram),
            "ppb" => Ok(ConcentrationUnit::Ppb),
            "g/kg" => Ok(ConcentrationUnit::GramsPerKilogram),
            _ => Err(format!("Unknown concentration unit: {s}")),
        }
    }
}

impl TryFrom<String> for ConcentrationUnit {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConcentrationUnit> for String {
    fn from(unit: ConcentrationUnit) -> Self {
        unit.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_aliases() {
        assert_eq!("w/w %".parse::<ConcentrationUnit>().unwrap(), ConcentrationUnit::Percent);
        assert_eq!("％".parse::<ConcentrationUnit>().unwrap(), ConcentrationUnit::Percent);
        assert_eq!("MG/KG".parse::<ConcentrationUnit>().unwrap(), ConcentrationUnit::MilligramsPerKilogram);
        assert_eq!("g / 100 g".parse::<ConcentrationUnit>().unwrap(), ConcentrationUnit::GramsPer100Grams);
        assert!("mol/L".parse::<ConcentrationUnit>().is_err());
    }

    #[test]
    fn test_as_str_parses_back() {
        for unit in ConcentrationUnit::ALL {
            assert_eq!(unit.as_str().parse::<ConcentrationUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_conversions() {
        assert_eq!(ConcentrationUnit::Ppm.to_percent(1000.0), 0.1);
        assert_eq!(ConcentrationUnit::MilligramsPerKilogram.to_percent(50.0), 0.005);
        assert_eq!(ConcentrationUnit::GramsPerKilogram.to_percent(5.0), 0.5);
        assert_eq!(ConcentrationUnit::GramsPer100Grams.to_percent(10.0), 10.0);
    }
}
