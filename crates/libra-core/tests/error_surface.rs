use libra_core::errors::{ErrorInfo, LibraError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("label", "1L-IV_2-1-3")
        .with_context("expected", "2")
}

#[test]
fn format_error_surface() {
    let err = LibraError::Format(sample_info("label-format", "bad label"));
    assert_eq!(err.code(), "label-format");
    assert!(err.info().context.contains_key("label"));
}

#[test]
fn state_error_surface() {
    let err = LibraError::State(sample_info("background-already-subtracted", "twice"));
    assert_eq!(err.info().code, "background-already-subtracted");
    assert!(!err.is_not_found());
}

#[test]
fn consistency_error_surface() {
    let err = LibraError::Consistency(sample_info("run-number-mismatch", "mixed runs"));
    assert_eq!(err.info().context["expected"], "2");
}

#[test]
fn not_found_error_surface() {
    let err = LibraError::NotFound(sample_info("vial-missing", "no such vial"));
    assert!(err.is_not_found());
}

#[test]
fn display_lists_context_and_hint() {
    let err = LibraError::Serde(
        ErrorInfo::new("opts-yaml", "invalid options")
            .with_context("field", "time_unit")
            .with_hint("use one of second, minute, hour, day"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("serde error: invalid options (code: opts-yaml)"));
    assert!(rendered.contains("field=time_unit"));
    assert!(rendered.contains("hint: use one of"));
}
