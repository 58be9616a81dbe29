use chrono::{Duration, NaiveDate, NaiveDateTime};
use libra_core::{Activity, LibraError};
use libra_lsc::{
    build_run, build_streams, ActivityForm, DefaultLabelGrammar, PatternLabelGrammar, Sample,
    SampleKey, SampleTimestamps,
};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 4)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn vial(label: &str, bq: f64) -> Sample {
    let mut sample = Sample::from_activity(Activity::becquerel(bq), label);
    let background = Sample::from_activity(Activity::becquerel(1.0), "1L-BL-1");
    sample.subtract_background(&background).unwrap();
    sample
}

fn timestamps(entries: &[(&str, &str, i64)]) -> SampleTimestamps {
    entries
        .iter()
        .map(|(stream, number, hours)| {
            (
                SampleKey::new(*stream, *number),
                start() + Duration::hours(*hours),
            )
        })
        .collect()
}

#[test]
fn groups_by_stream_then_sample_number_in_first_seen_order() {
    let samples = vec![
        vial("1L-OV_1-1-1", 3.0),
        vial("1L-IV_1-2-1", 11.0),
        vial("1L-IV_1-1-1", 21.0),
        vial("1L-IV_1-2-2", 6.0),
        vial("1L-IV_1-1-2", 5.0),
        vial("1L-OV_1-1-2", 2.0),
    ];
    let times = timestamps(&[
        ("IV", "1", 24),
        ("IV", "2", 48),
        ("OV", "1", 24),
    ]);
    let streams = build_streams(samples, start(), &times, &DefaultLabelGrammar).unwrap();

    let names: Vec<&str> = streams.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["OV", "IV"]);

    let iv = &streams["IV"];
    assert_eq!(iv.name(), Some("IV"));
    assert_eq!(iv.start_time(), start());
    assert_eq!(iv.len(), 2);
    // Sample 2 was seen first, so it comes first even though it is later in time.
    assert_eq!(iv.samples()[0].timestamp(), start() + Duration::hours(48));
    let vial_names: Vec<&str> = iv.samples()[0].vials().iter().map(Sample::name).collect();
    assert_eq!(vial_names, vec!["1L-IV_1-2-1", "1L-IV_1-2-2"]);

    let cumulative = iv.cumulative_activity(ActivityForm::Soluble).unwrap();
    let values: Vec<f64> = cumulative.iter().map(|m| m.value.magnitude()).collect();
    assert_eq!(values, vec![15.0, 39.0]);

    let ov = &streams["OV"];
    assert_eq!(ov.samples()[0].total_activity().value, Activity::becquerel(3.0));
}

#[test]
fn mixed_run_numbers_fail_before_building() {
    let samples = vec![
        vial("1L-IV_1-1-1", 3.0),
        vial("1L-IV_1-1-2", 3.0),
        vial("1L-OV_2-1-1", 3.0),
    ];
    let times = timestamps(&[("IV", "1", 1), ("OV", "1", 1)]);
    let err = build_streams(samples, start(), &times, &DefaultLabelGrammar).unwrap_err();
    assert!(matches!(err, LibraError::Consistency(_)));
    assert_eq!(err.code(), "run-number-mismatch");
    assert_eq!(err.info().context["sample"], "1L-OV_2-1-1");
    assert_eq!(err.info().context["expected"], "1");
    assert_eq!(err.info().context["found"], "2");
}

#[test]
fn malformed_label_aborts_grouping() {
    let samples = vec![vial("1L-IV_1-1-1", 3.0), vial("1L-BL-1", 3.0)];
    let times = timestamps(&[("IV", "1", 1)]);
    let err = build_streams(samples, start(), &times, &DefaultLabelGrammar).unwrap_err();
    assert!(matches!(err, LibraError::Format(_)));
    assert_eq!(err.info().context["label"], "1L-BL-1");
}

#[test]
fn missing_timestamp_is_not_found() {
    let samples = vec![vial("1L-IV_3-1-1", 3.0), vial("1L-IV_3-2-1", 3.0)];
    let times = timestamps(&[("IV", "1", 1)]);
    let err = build_streams(samples, start(), &times, &DefaultLabelGrammar).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.info().context["stream"], "IV");
    assert_eq!(err.info().context["sample_number"], "2");
    assert_eq!(err.info().context["key"], "3-2-x");
}

#[test]
fn empty_input_builds_nothing() {
    let streams = build_streams(Vec::new(), start(), &SampleTimestamps::new(), &DefaultLabelGrammar)
        .unwrap();
    assert!(streams.is_empty());
}

#[test]
fn build_run_names_run_and_keeps_stream_order() {
    let samples = vec![
        vial("100mL-IV_7-1-1", 4.0),
        vial("100mL-OV_7-1-1", 2.0),
    ];
    let times = timestamps(&[("IV", "1", 5), ("OV", "1", 6)]);
    let run = build_run(samples, start(), &times, &DefaultLabelGrammar).unwrap();
    assert_eq!(run.name(), Some("run 7"));
    assert_eq!(run.start_time(), start());
    let names: Vec<_> = run.streams().iter().filter_map(|s| s.name()).collect();
    assert_eq!(names, vec!["IV", "OV"]);
    assert_eq!(run.stream("OV").unwrap().len(), 1);

    let err = run.stream("XV").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.info().context["known"], "IV,OV");
}

#[test]
fn grouping_accepts_a_pluggable_grammar() {
    let grammar = PatternLabelGrammar::new(
        r"(?P<stream>[A-Z]+)(?P<run>\d+)\.(?P<sample>\d+)\.(?P<vial>\d+)(?P<volume>)",
    )
    .unwrap();
    let samples = vec![vial("IV2.1.1", 5.0), vial("IV2.1.2", 7.0)];
    let times = timestamps(&[("IV", "1", 2)]);
    let streams = build_streams(samples, start(), &times, &grammar).unwrap();
    assert_eq!(streams["IV"].samples()[0].vials().len(), 2);
}
