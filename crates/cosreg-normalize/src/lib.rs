//! Pure normalization functions used by the field-mapping parser.
//!
//! Everything here is stateless apart from the per-table [`Normalizer`]
//! configuration, and safe to call from any worker thread.

pub mod cas;
pub mod concentration;
pub mod error;
pub mod product_type;
pub mod symbol;
pub mod text;
pub mod unit;

pub use cas::{CasNumber, cas_checksum_ok, is_valid_cas_format, parse_cas_number};
pub use concentration::{Concentration, Normalizer, normalize_concentration};
pub use error::NormalizationError;
pub use product_type::normalize_product_type;
pub use symbol::{SymbolMeaning, SymbolTable};
pub use text::{clean_inci_name, parse_date};
pub use unit::ConcentrationUnit;
