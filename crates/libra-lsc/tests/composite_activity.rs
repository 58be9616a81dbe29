use chrono::{NaiveDate, NaiveDateTime};
use libra_core::{Activity, ActivityUnit, LibraError};
use libra_lsc::{ActivityForm, CompositeSample, Sample};

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 12)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn corrected(values: &[f64], background: &Sample, label: &str) -> Sample {
    let mut sample = Sample::from_counts(values, ActivityUnit::Becquerel, label).unwrap();
    sample.subtract_background(background).unwrap();
    sample
}

#[test]
fn soluble_activity_of_two_single_count_vials() {
    let background = Sample::from_counts(&[20.0], ActivityUnit::Becquerel, "1L-BL-1").unwrap();
    let first = corrected(&[120.0], &background, "1L-IV_1-1-1");
    let second = corrected(&[80.0], &background, "1L-IV_1-1-2");
    assert_eq!(first.activity(), Activity::becquerel(100.0));
    assert_eq!(second.activity(), Activity::becquerel(60.0));
    assert_eq!(first.uncertainty().magnitude(), 0.0);

    let composite = CompositeSample::new(vec![first, second], at(10)).unwrap();
    let soluble = composite.soluble_activity();
    assert_eq!(soluble.value, Activity::becquerel(160.0));
    assert!(soluble.is_exact());
    assert_eq!(composite.insoluble_activity().value, Activity::becquerel(0.0));
    assert_eq!(composite.total_activity().value, Activity::becquerel(160.0));
}

#[test]
fn four_vials_split_positionally() {
    let background = Sample::from_activity(Activity::becquerel(1.0), "bg");
    let vials = vec![
        corrected(&[11.0, 13.0], &background, "1L-IV_1-1-1"),
        corrected(&[5.0], &background, "1L-IV_1-1-2"),
        corrected(&[3.0], &background, "1L-IV_1-1-3"),
        corrected(&[2.0, 4.0], &background, "1L-IV_1-1-4"),
    ];
    let sigma_first = vials[0].uncertainty().magnitude();
    let sigma_last = vials[3].uncertainty().magnitude();
    let composite = CompositeSample::new(vials, at(11)).unwrap();

    let soluble = composite.activity(ActivityForm::Soluble);
    let insoluble = composite.activity(ActivityForm::Insoluble);
    let total = composite.activity(ActivityForm::Total);
    assert!((soluble.value.magnitude() - 15.0).abs() < 1e-12);
    assert!((insoluble.value.magnitude() - 4.0).abs() < 1e-12);
    assert!((total.value.magnitude() - 19.0).abs() < 1e-12);

    assert!((soluble.uncertainty.magnitude() - sigma_first).abs() < 1e-12);
    assert!((insoluble.uncertainty.magnitude() - sigma_last).abs() < 1e-12);
    let expected_total = (sigma_first.powi(2) + sigma_last.powi(2)).sqrt();
    assert!((total.uncertainty.magnitude() - expected_total).abs() < 1e-12);
}

#[test]
fn aggregates_are_expressed_in_first_vial_unit() {
    let vials = vec![
        Sample::from_activity(Activity::new(1.0, ActivityUnit::Kilobecquerel), "a"),
        Sample::from_activity(Activity::becquerel(250.0), "b"),
    ];
    let composite = CompositeSample::new(vials, at(9)).unwrap();
    let total = composite.total_activity();
    assert_eq!(total.unit(), ActivityUnit::Kilobecquerel);
    assert!((total.value.magnitude() - 1.25).abs() < 1e-12);
}

#[test]
fn empty_composite_is_rejected() {
    let err = CompositeSample::new(Vec::new(), at(9)).unwrap_err();
    assert!(matches!(err, LibraError::Consistency(_)));
}

#[test]
fn more_than_four_vials_are_rejected() {
    let vials = |n: usize| {
        (1..=n)
            .map(|vial| Sample::from_activity(Activity::becquerel(1.0), format!("1L-IV_1-1-{vial}")))
            .collect::<Vec<_>>()
    };
    assert_eq!(CompositeSample::new(vials(4), at(9)).unwrap().vials().len(), 4);

    let err = CompositeSample::new(vials(5), at(9)).unwrap_err();
    assert!(matches!(err, LibraError::Consistency(_)));
    assert_eq!(err.code(), "too-many-vials");
    assert_eq!(err.info().context["vials"], "5");
}

#[test]
fn composite_background_subtraction_corrects_every_vial() {
    let vials = vec![
        Sample::from_activity(Activity::becquerel(10.0), "a"),
        Sample::from_activity(Activity::becquerel(2.0), "b"),
        Sample::from_activity(Activity::becquerel(6.0), "c"),
    ];
    let mut composite = CompositeSample::new(vials, at(12)).unwrap();
    assert!(!composite.is_background_subtracted());
    assert_eq!(composite.first_uncorrected().map(Sample::name), Some("a"));

    let background = Sample::from_activity(Activity::becquerel(3.0), "bg");
    let clipped = composite.subtract_background(&background).unwrap();
    assert_eq!(clipped.len(), 1);
    assert_eq!(clipped[0].sample, "b");
    assert!(composite.is_background_subtracted());
    assert_eq!(composite.total_activity().value, Activity::becquerel(10.0));

    let err = composite.subtract_background(&background).unwrap_err();
    assert!(matches!(err, LibraError::State(_)));
}

#[test]
fn relative_time_is_timestamp_minus_start() {
    let composite =
        CompositeSample::new(vec![Sample::from_activity(Activity::becquerel(1.0), "a")], at(15))
            .unwrap();
    assert_eq!(composite.relative_time(at(9)).num_hours(), 6);
    assert_eq!(composite.relative_time(at(18)).num_hours(), -3);
}
