use chrono::{Duration, NaiveDate};
use libra_core::{Activity, ActivityUnit};
use libra_lsc::{quadrature_sum, ActivityForm, CompositeSample, Sample, Stream};
use proptest::prelude::*;

fn bq(values: &[f64]) -> Vec<Activity> {
    values.iter().copied().map(Activity::becquerel).collect()
}

proptest! {
    #[test]
    fn quadrature_is_commutative_and_associative(a in 0.0f64..1e3, b in 0.0f64..1e3, c in 0.0f64..1e3) {
        let unit = ActivityUnit::Becquerel;
        let ab = quadrature_sum(&bq(&[a, b]), unit).magnitude();
        let ba = quadrature_sum(&bq(&[b, a]), unit).magnitude();
        prop_assert!((ab - ba).abs() <= 1e-9 * (1.0 + ab));

        let nested = quadrature_sum(&[Activity::becquerel(ab), Activity::becquerel(c)], unit).magnitude();
        let flat = quadrature_sum(&bq(&[a, b, c]), unit).magnitude();
        prop_assert!((nested - flat).abs() <= 1e-9 * (1.0 + flat));
    }

    #[test]
    fn single_counts_are_never_repeated(value in -1e4f64..1e4) {
        let sample = Sample::from_counts(&[value], ActivityUnit::Becquerel, "v").unwrap();
        prop_assert_eq!(sample.uncertainty().magnitude(), 0.0);
        prop_assert!(!sample.is_repeated());
    }

    #[test]
    fn identical_replicates_have_no_spread(value in 0.0f64..1e4, n in 2usize..8) {
        let counts = vec![value; n];
        let sample = Sample::from_counts(&counts, ActivityUnit::Becquerel, "v").unwrap();
        prop_assert!((sample.activity().magnitude() - value).abs() <= 1e-9 * (1.0 + value));
        prop_assert!(sample.uncertainty().magnitude() <= 1e-9 * (1.0 + value));
    }

    #[test]
    fn cumulative_activity_never_decreases(
        counts in prop::collection::vec(prop::collection::vec(0.0f64..500.0, 1..4), 1..12),
        background in 0.0f64..300.0,
    ) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let bg = Sample::from_activity(Activity::becquerel(background), "bg");
        let samples = counts
            .iter()
            .enumerate()
            .map(|(idx, vial_counts)| {
                let vials = vial_counts
                    .iter()
                    .enumerate()
                    .map(|(vial, value)| {
                        let mut sample = Sample::from_activity(
                            Activity::becquerel(*value),
                            format!("1L-IV_1-{}-{}", idx + 1, vial + 1),
                        );
                        sample.subtract_background(&bg).unwrap();
                        sample
                    })
                    .collect();
                CompositeSample::new(vials, start + Duration::hours(idx as i64)).unwrap()
            })
            .collect();
        let stream = Stream::new(samples, start);
        let series = stream.cumulative_activity(ActivityForm::Total).unwrap();
        prop_assert_eq!(series.len(), counts.len());
        for pair in series.windows(2) {
            prop_assert!(pair[1].value.magnitude() >= pair[0].value.magnitude());
            prop_assert!(pair[1].uncertainty.magnitude() >= pair[0].uncertainty.magnitude());
        }
    }

    #[test]
    fn raw_streams_refuse_cumulative_activity(n in 1usize..6) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let samples = (0..n)
            .map(|idx| {
                CompositeSample::new(
                    vec![Sample::from_activity(Activity::becquerel(1.0), format!("v{idx}"))],
                    start,
                )
                .unwrap()
            })
            .collect();
        let stream = Stream::new(samples, start);
        prop_assert!(stream.cumulative_activity(ActivityForm::Total).is_err());
    }
}
