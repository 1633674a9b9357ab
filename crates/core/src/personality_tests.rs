use yare::parameterized;

use super::*;

#[test]
fn balanced_vector_validates() {
    assert!(PersonalityVector::balanced().validate().is_ok());
}

#[test]
fn nan_component_fails_validation() {
    let mut v = PersonalityVector::balanced();
    v.curiosity = f64::NAN;
    assert_eq!(
        v.validate(),
        Err(PersonalityError::NotFinite { name: "curiosity" })
    );
}

#[test]
fn out_of_range_component_fails_validation() {
    let mut v = PersonalityVector::balanced();
    v.aggression = 1.5;
    assert!(matches!(
        v.validate(),
        Err(PersonalityError::OutOfRange { name: "aggression", .. })
    ));
}

#[test]
fn clamped_repairs_out_of_range_and_non_finite() {
    let v = PersonalityVector {
        curiosity: 1.5,
        patience: -0.5,
        motivation: f64::NAN,
        empathy: 0.5,
        aggression: 0.0,
        creativity: 1.0,
        loyalty: 0.3,
    };
    let clamped = v.clamped();
    assert!(clamped.validate().is_ok());
    assert_eq!(clamped.curiosity, 1.0);
    assert_eq!(clamped.patience, 0.0);
    assert_eq!(clamped.motivation, 0.5);
}

#[parameterized(
    aggressive = { PersonalityVector { aggression: 0.9, empathy: 0.1, ..PersonalityVector::balanced() }, Archetype::Aggressive },
    cautious = { PersonalityVector { patience: 0.9, aggression: 0.1, ..PersonalityVector::balanced() }, Archetype::Cautious },
    supportive = { PersonalityVector { empathy: 0.9, loyalty: 0.9, aggression: 0.1, patience: 0.5, ..PersonalityVector::balanced() }, Archetype::Supportive },
    adventurous = { PersonalityVector { curiosity: 0.9, patience: 0.1, aggression: 0.1, empathy: 0.1, loyalty:0.1, ..PersonalityVector::balanced() }, Archetype::Adventurous },
    balanced = { PersonalityVector::balanced(), Archetype::Balanced },
)]
fn archetype_matches_expected(v: PersonalityVector, expected: Archetype) {
    assert_eq!(v.bundle().archetype, expected);
}

#[test]
fn dominant_traits_list_extreme_components_only() {
    let v = PersonalityVector {
        curiosity: 0.9,
        patience: 0.5,
        motivation: 0.5,
        empathy: 0.1,
        aggression: 0.5,
        creativity: 0.5,
        loyalty: 0.5,
    };
    let bundle = v.bundle();
    assert!(bundle.dominant_traits.contains(&"curiosity:very-high".to_string()));
    assert!(bundle.dominant_traits.contains(&"empathy:very-low".to_string()));
    assert_eq!(bundle.dominant_traits.len(), 2);
}
