use codestroke_core::dosing::{
    BodyWeight, alteplase_dose, dosing_summary, tenecteplase_dose_mg, to_kg, WeightUnit,
};

#[test]
fn seventy_kg_patient() {
    let dose = alteplase_dose(70.0);
    assert_eq!(dose.total_mg, 63.0);
    assert_eq!(dose.bolus_mg, 6.3);
    assert_eq!(dose.infusion_mg, 56.7);
    assert_eq!(tenecteplase_dose_mg(70.0), 20.0);
}

#[test]
fn alteplase_is_capped_at_ninety() {
    for kg in [100.0, 120.5, 180.0, 400.0] {
        let dose = alteplase_dose(kg);
        assert_eq!(dose.total_mg, 90.0);
        assert_eq!(dose.bolus_mg, 9.0);
        assert_eq!(dose.infusion_mg, 81.0);
    }
}

#[test]
fn alteplase_follows_point_nine_per_kg() {
    for tenths in 1..=1500 {
        let kg = f64::from(tenths) / 10.0;
        let expected = (kg * 0.9).min(90.0);
        let dose = alteplase_dose(kg);
        assert!((dose.total_mg - expected).abs() <= 0.051, "{kg} kg -> {}", dose.total_mg);
        assert!(dose.total_mg <= 90.0);
    }
}

#[test]
fn tenecteplase_bands() {
    assert_eq!(tenecteplase_dose_mg(45.0), 15.0);
    assert_eq!(tenecteplase_dose_mg(59.9), 15.0);
    assert_eq!(tenecteplase_dose_mg(60.0), 17.5);
    assert_eq!(tenecteplase_dose_mg(69.9), 17.5);
    assert_eq!(tenecteplase_dose_mg(79.9), 20.0);
    assert_eq!(tenecteplase_dose_mg(80.0), 22.5);
    assert_eq!(tenecteplase_dose_mg(90.0), 25.0);
    assert_eq!(tenecteplase_dose_mg(250.0), 25.0);
}

#[test]
fn tenecteplase_is_monotonic_and_capped() {
    let mut previous = 0.0;
    for tenths in 0..=2000 {
        let kg = f64::from(tenths) / 10.0;
        let dose = tenecteplase_dose_mg(kg);
        assert!(dose >= previous, "dose dropped at {kg} kg");
        assert!(dose <= 25.0);
        previous = dose;
    }
}

#[test]
fn non_positive_weight_yields_zero() {
    for kg in [0.0, -5.0, f64::NAN] {
        assert_eq!(alteplase_dose(kg).total_mg, 0.0);
        assert_eq!(tenecteplase_dose_mg(kg), 0.0);
    }
}

#[test]
fn pounds_are_converted_and_rounded_first() {
    assert_eq!(to_kg(154.0, WeightUnit::Lb), 69.9);
    let summary = dosing_summary(&BodyWeight::lb(154.0));
    assert_eq!(summary.weight_kg, 69.9);
    assert_eq!(summary.alteplase.total_mg, 62.9);
    assert_eq!(summary.tenecteplase_mg, 17.5);
}

#[test]
fn kilograms_round_to_one_decimal() {
    assert_eq!(BodyWeight::kg(70.04).in_kg(), 70.0);
    assert!(!BodyWeight::kg(0.0).is_positive());
}
