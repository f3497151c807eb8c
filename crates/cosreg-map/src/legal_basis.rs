use cosreg_model::{Jurisdiction, TableType};

/// Citation of the annex or list a table is published in, when the
/// jurisdiction publishes that table at all.
pub fn default_legal_basis(jurisdiction: Jurisdiction, table_type: TableType) -> Option<&'static str> {
    match (jurisdiction, table_type) {
        (Jurisdiction::Eu, TableType::Prohibited) => Some("Annex II"),
        (Jurisdiction::Eu, TableType::Restricted) => Some("Annex III"),
        (Jurisdiction::Eu, TableType::Colorant) => Some("Annex IV"),
        (Jurisdiction::Eu, TableType::Preservative) => Some("Annex V"),
        (Jurisdiction::Eu, TableType::UvFilter) => Some("Annex VI"),

        (Jurisdiction::Asean, TableType::Prohibited) => Some("Annex II"),
        (Jurisdiction::Asean, TableType::Restricted) => Some("Annex III"),
        (Jurisdiction::Asean, TableType::Colorant) => Some("Annex IV"),
        (Jurisdiction::Asean, TableType::Preservative) => Some("Annex VI"),
        (Jurisdiction::Asean, TableType::UvFilter) => Some("Annex VII"),

        (Jurisdiction::Jp, TableType::Prohibited) => Some("Appendix 1"),
        (Jurisdiction::Jp, TableType::Restricted) => Some("Appendix 2"),
        (Jurisdiction::Jp, TableType::Preservative) => Some("Appendix 3"),
        (Jurisdiction::Jp, TableType::UvFilter) => Some("Appendix 4"),

        (Jurisdiction::Ca, TableType::Prohibited) => Some("Hotlist - Prohibited"),
        (Jurisdiction::Ca, TableType::Restricted) => Some("Hotlist - Restricted"),

        (Jurisdiction::Cn, TableType::Prohibited) => Some("STSC Annex 2"),
        (Jurisdiction::Cn, TableType::Restricted) => Some("STSC Annex 3"),
        (Jurisdiction::Cn, TableType::Preservative) => Some("STSC Annex 4"),
        (Jurisdiction::Cn, TableType::UvFilter) => Some("STSC Annex 5"),
        (Jurisdiction::Cn, TableType::Colorant) => Some("STSC Annex 6"),
        (Jurisdiction::Cn, TableType::Whitelist) => Some("IECIC 2021"),

        _ => None,
    }
}
