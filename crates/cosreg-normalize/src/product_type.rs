//! Mapping of free-text product category labels to [`ProductType`].

use cosreg_model::ProductType;
use rapidfuzz::distance::jaro_winkler;
use tracing::debug;

/// Minimum Jaro-Winkler similarity for a fuzzy alias match.
pub const FUZZY_THRESHOLD: f64 = 0.92;

const ALIASES: &[(&str, ProductType)] = &[
    // English
    ("hair", ProductType::Hair),
    ("hair products", ProductType::Hair),
    ("skin", ProductType::Skin),
    ("eye", ProductType::EyeArea),
    ("eye area", ProductType::EyeArea),
    ("eye products", ProductType::EyeArea),
    ("lip", ProductType::Lip),
    ("lip products", ProductType::Lip),
    ("nail", ProductType::Nail),
    ("nail products", ProductType::Nail),
    ("oral", ProductType::Oral),
    ("oral hygiene", ProductType::Oral),
    ("oral care", ProductType::Oral),
    ("mucous membrane", ProductType::Mucosa),
    ("mucosa", ProductType::Mucosa),
    ("non-mucosa", ProductType::NonMucosa),
    ("non mucosa", ProductType::NonMucosa),
    ("rinse-off", ProductType::RinseOff),
    ("rinse off", ProductType::RinseOff),
    ("rinse-off products", ProductType::RinseOff),
    ("wash-off", ProductType::RinseOff),
    ("wash off", ProductType::RinseOff),
    ("leave-on", ProductType::LeaveOn),
    ("leave on", ProductType::LeaveOn),
    ("leave-on products", ProductType::LeaveOn),
    ("all", ProductType::All),
    ("all products", ProductType::All),
    ("all cosmetic products", ProductType::All),
    // Japanese
    ("洗い流す", ProductType::RinseOff),
    ("洗い流さない", ProductType::LeaveOn),
    ("粘膜", ProductType::Mucosa),
    ("粘膜に使用されることがない", ProductType::NonMucosa),
    ("粘膜に使用されることがある", ProductType::Mucosa),
    ("全ての化粧品", ProductType::All),
    // Chinese
    ("淋洗类", ProductType::RinseOff),
    ("冲洗类", ProductType::RinseOff),
    ("驻留类", ProductType::LeaveOn),
    ("头发", ProductType::Hair),
    ("发用", ProductType::Hair),
    ("皮肤", ProductType::Skin),
    ("眼部", ProductType::EyeArea),
    ("唇部", ProductType::Lip),
    ("指甲", ProductType::Nail),
    ("口腔", ProductType::Oral),
    ("非粘膜", ProductType::NonMucosa),
    ("所有产品", ProductType::All),
];

/// Resolves a product-type label from a source document.
///
/// Canonical names and exact aliases win; then the longest alias contained
/// in the label; then the closest alias above [`FUZZY_THRESHOLD`].
pub fn normalize_product_type(raw: &str) -> Option<ProductType> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(product_type) = trimmed.parse::<ProductType>() {
        return Some(product_type);
    }

    let label = trimmed.to_lowercase();
    if let Some((_, product_type)) = ALIASES.iter().find(|(alias, _)| *alias == label) {
        return Some(*product_type);
    }

    if let Some((_, product_type)) = ALIASES
        .iter()
        .filter(|(alias, _)| label.contains(alias))
        .max_by_key(|(alias, _)| alias.chars().count())
    {
        return Some(*product_type);
    }

    let best = ALIASES
        .iter()
        .map(|(alias, product_type)| {
            let score = jaro_winkler::similarity(label.chars(), alias.chars());
            (score, *product_type)
        })
        .max_by(|a, b| a.0.total_cmp(&b.0));

    match best {
        Some((score, product_type)) if score >= FUZZY_THRESHOLD => Some(product_type),
        _ => {
            debug!(label = trimmed, "unrecognized product type");
            None
        }
    }
}
