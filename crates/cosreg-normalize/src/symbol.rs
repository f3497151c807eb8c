//! Jurisdiction-specific symbols that stand in for a concentration value.

use std::collections::HashMap;

use cosreg_model::Jurisdiction;
use serde::{Deserialize, Serialize};

/// What a symbolic cell means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolMeaning {
    /// Permitted without a declared ceiling.
    NoLimit,
    /// The column does not apply to this ingredient.
    NotApplicable,
    /// Not permitted in this sub-category; the parser emits no record.
    NotPermitted,
}

const GENERIC_SYMBOLS: &[(&str, SymbolMeaning)] = &[
    ("no limit", SymbolMeaning::NoLimit),
    ("unlimited", SymbolMeaning::NoLimit),
    ("n/a", SymbolMeaning::NotApplicable),
    ("not applicable", SymbolMeaning::NotApplicable),
];

const JP_SYMBOLS: &[(&str, SymbolMeaning)] = &[
    ("○", SymbolMeaning::NoLimit),
    ("〇", SymbolMeaning::NoLimit),
    ("◯", SymbolMeaning::NoLimit),
    ("-", SymbolMeaning::NotApplicable),
    ("－", SymbolMeaning::NotApplicable),
    ("―", SymbolMeaning::NotApplicable),
    ("×", SymbolMeaning::NotPermitted),
];

/// Symbol lookup for one jurisdiction.
///
/// Keys are matched after trimming and lowercasing.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, SymbolMeaning>,
}

impl SymbolTable {
    /// Built-in symbols for a jurisdiction.
    pub fn for_jurisdiction(jurisdiction: Jurisdiction) -> Self {
        let mut table = Self::default();
        for (symbol, meaning) in GENERIC_SYMBOLS {
            table.insert(symbol, *meaning);
        }
        if jurisdiction == Jurisdiction::Jp {
            for (symbol, meaning) in JP_SYMBOLS {
                table.insert(symbol, *meaning);
            }
        }
        table
    }

    /// Adds or overrides a symbol.
    pub fn insert(&mut self, symbol: &str, meaning: SymbolMeaning) {
        self.symbols.insert(symbol_key(symbol), meaning);
    }

    pub fn extend<'a>(&mut self, symbols: impl IntoIterator<Item = (&'a String, &'a SymbolMeaning)>) {
        for (symbol, meaning) in symbols {
            self.insert(symbol, *meaning);
        }
    }

    pub fn lookup(&self, raw: &str) -> Option<SymbolMeaning> {
        self.symbols.get(&symbol_key(raw)).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn symbol_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jp_defaults() {
        let table = SymbolTable::for_jurisdiction(Jurisdiction::Jp);
        assert_eq!(table.lookup(" ○ "), Some(SymbolMeaning::NoLimit));
        assert_eq!(table.lookup("－"), Some(SymbolMeaning::NotApplicable));
        assert_eq!(table.lookup("×"), Some(SymbolMeaning::NotPermitted));
        assert_eq!(table.lookup("No Limit"), Some(SymbolMeaning::NoLimit));
    }

    #[test]
    fn test_jp_symbols_not_global() {
        let table = SymbolTable::for_jurisdiction(Jurisdiction::Eu);
        assert_eq!(table.lookup("○"), None);
        assert_eq!(table.lookup("N/A"), Some(SymbolMeaning::NotApplicable));
    }

    #[test]
    fn test_configured_override() {
        let mut table = SymbolTable::for_jurisdiction(Jurisdiction::Cn);
        table.insert("—", SymbolMeaning::NotApplicable);
        assert_eq!(table.lookup("—"), Some(SymbolMeaning::NotApplicable));
    }
}
