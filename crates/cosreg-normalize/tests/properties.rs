//! Property tests for concentration normalization.

use cosreg_model::Jurisdiction;
use cosreg_normalize::{
    Concentration, ConcentrationUnit, NormalizationError, Normalizer, normalize_concentration,
};
use proptest::prelude::*;

fn jurisdiction() -> impl Strategy<Value = Jurisdiction> {
    prop::sample::select(Jurisdiction::ALL.to_vec())
}

fn unit() -> impl Strategy<Value = ConcentrationUnit> {
    prop::sample::select(ConcentrationUnit::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_percent_values_pass_through(value in 0.0f64..=100.0, jurisdiction in jurisdiction()) {
        let raw = value.to_string();
        let result = normalize_concentration(&raw, Some("%"), jurisdiction).unwrap();
        prop_assert_eq!(result.into_pair(), (Some(value), None));
    }

    #[test]
    fn test_embedded_percent_matches_unit_field(value in 0.0f64..=100.0) {
        let embedded = normalize_concentration(&format!("{value}%"), None, Jurisdiction::Eu).unwrap();
        let field = normalize_concentration(&value.to_string(), Some("%"), Jurisdiction::Eu).unwrap();
        prop_assert_eq!(embedded, field);
    }

    #[test]
    fn test_output_always_in_range(value in -1.0e9f64..1.0e9, unit in unit()) {
        let normalizer = Normalizer::new(Jurisdiction::Asean);
        match normalizer.normalize(&value.to_string(), Some(unit.as_str())) {
            Ok(Concentration::Percent(percent)) => {
                prop_assert!((0.0..=100.0).contains(&percent));
            }
            Ok(other) => prop_assert!(false, "unexpected {:?}", other),
            Err(NormalizationError::OutOfRange { percent, .. }) => {
                prop_assert!(!(0.0..=100.0).contains(&percent));
            }
            Err(err) => prop_assert!(false, "unexpected error {}", err),
        }
    }

    #[test]
    fn test_ppm_is_ten_thousandth_of_percent(value in 0u32..=1_000_000) {
        let result = normalize_concentration(&value.to_string(), Some("ppm"), Jurisdiction::Cn).unwrap();
        prop_assert_eq!(result.value(), Some(f64::from(value) / 10_000.0));
    }
}

#[test]
fn test_thousand_ppm_is_point_one_percent() {
    for jurisdiction in Jurisdiction::ALL {
        assert_eq!(
            normalize_concentration("1000", Some("ppm"), jurisdiction)
                .expect("normalize")
                .into_pair(),
            (Some(0.1), None)
        );
    }
}

#[test]
fn test_japanese_no_limit_symbol() {
    let result = normalize_concentration("○", None, Jurisdiction::Jp).expect("normalize");
    assert_eq!(result.into_pair(), (None, Some("No Limit")));
    assert!(result.is_permitted());
}

#[test]
fn test_blank_cell_is_not_permitted() {
    let result = normalize_concentration("", Some("g/100g"), Jurisdiction::Jp).expect("normalize");
    assert_eq!(result, Concentration::NotPermitted);
    assert!(!result.is_permitted());
}
