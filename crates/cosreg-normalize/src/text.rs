//! Ingredient-name cleaning and date parsing.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

/// Parenthetical provenance notes such as `(derived from coconut)`.
static PROVENANCE_NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\([^)]*\b(?:derived|origin)\b[^)]*\)")
        .expect("Invalid provenance regex")
});

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%d %B %Y",
    "%Y年%m月%d日",
    "%Y.%m.%d",
];

/// Cleans an INCI display name.
///
/// Collapses whitespace, removes provenance parentheticals and trailing
/// punctuation. Chemical notation in parentheses (`(CI 77491)`) is kept.
pub fn clean_inci_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let without_notes = PROVENANCE_NOTE.replace_all(&collapsed, "");
    without_notes
        .trim()
        .trim_end_matches(['.', ',', ';'])
        .trim_end()
        .to_string()
}

/// Parses a date in any of the formats seen in regulation sources.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_inci_name() {
        assert_eq!(clean_inci_name("  Cocamide   DEA. "), "Cocamide DEA");
        assert_eq!(
            clean_inci_name("Glycerin (derived from palm oil)"),
            "Glycerin"
        );
        assert_eq!(clean_inci_name("Iron Oxides (CI 77491)"), "Iron Oxides (CI 77491)");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 3, 15);
        assert_eq!(parse_date("2023-03-15"), expected);
        assert_eq!(parse_date("15/03/2023"), expected);
        assert_eq!(parse_date("2023/03/15"), expected);
        assert_eq!(parse_date("March 15, 2023"), expected);
        assert_eq!(parse_date("15 March 2023"), expected);
        assert_eq!(parse_date("2023年3月15日"), expected);
        assert_eq!(parse_date("2023-03-15T08:30:00Z"), expected);
        assert_eq!(parse_date("2023-03-15T08:30:00"), expected);
        assert_eq!(parse_date("soon"), None);
    }
}
