//! Vial label grammars.
//!
//! The laboratory convention is `<volume>-<stream>_<run>-<sample>-<vial>`,
//! e.g. `1L-IV_2-1-3`. Alternate conventions can be supplied as a regular
//! expression exposing the same five named groups.

use libra_core::errors::{ErrorInfo, LibraError};
use libra_core::{Label, LabelParser};
use regex::Regex;

/// Human readable form of the default grammar, used in diagnostics.
pub const DEFAULT_GRAMMAR: &str = "[volume]-[stream]_[run nb]-[sample nb]-[vial nb] (eg. 1L-IV_1-1-1)";

/// Capture group names a [`PatternLabelGrammar`] must define.
pub const GROUP_NAMES: [&str; 5] = ["volume", "stream", "run", "sample", "vial"];

fn label_error(label: &str, message: impl Into<String>) -> LibraError {
    LibraError::Format(
        ErrorInfo::new("label-format", message.into())
            .with_context("label", label)
            .with_context("expected", DEFAULT_GRAMMAR),
    )
}

/// The fixed laboratory grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultLabelGrammar;

impl LabelParser for DefaultLabelGrammar {
    fn parse(&self, label: &str) -> Result<Label, LibraError> {
        let halves: Vec<&str> = label.split('_').collect();
        let [prefix, suffix] = halves.as_slice() else {
            return Err(label_error(label, "label must contain exactly one underscore"));
        };
        let prefix: Vec<&str> = prefix.split('-').collect();
        let [volume, stream] = prefix.as_slice() else {
            return Err(label_error(
                label,
                "prefix must be <volume>-<stream> separated by one hyphen",
            ));
        };
        let suffix: Vec<&str> = suffix.split('-').collect();
        let [run, sample, vial] = suffix.as_slice() else {
            return Err(label_error(
                label,
                "suffix must be <run>-<sample>-<vial> separated by two hyphens",
            ));
        };
        let tokens = [volume, stream, run, sample, vial];
        if tokens.iter().any(|token| token.is_empty()) {
            return Err(label_error(label, "label contains an empty field"));
        }
        Ok(Label {
            volume: volume.to_string(),
            stream: stream.to_string(),
            run_number: run.to_string(),
            sample_number: sample.to_string(),
            vial_number: vial.to_string(),
        })
    }
}

/// A caller-supplied grammar given as a regular expression.
///
/// The pattern is matched against the whole label and must define the named
/// groups listed in [`GROUP_NAMES`].
#[derive(Debug, Clone)]
pub struct PatternLabelGrammar {
    regex: Regex,
    source: String,
}

impl PatternLabelGrammar {
    /// Compiles `pattern` and checks its named groups.
    pub fn new(pattern: &str) -> Result<Self, LibraError> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|err| {
            LibraError::Format(
                ErrorInfo::new("label-pattern", "label pattern does not compile")
                    .with_context("pattern", pattern)
                    .with_hint(err.to_string()),
            )
        })?;
        let names: Vec<&str> = regex.capture_names().flatten().collect();
        if let Some(missing) = GROUP_NAMES.iter().find(|group| !names.contains(*group)) {
            return Err(LibraError::Format(
                ErrorInfo::new("label-pattern", "label pattern lacks a named group")
                    .with_context("pattern", pattern)
                    .with_context("missing", *missing),
            ));
        }
        Ok(Self {
            regex,
            source: pattern.to_string(),
        })
    }

    /// Pattern as supplied by the caller.
    pub fn pattern(&self) -> &str {
        &self.source
    }
}

impl LabelParser for PatternLabelGrammar {
    fn parse(&self, label: &str) -> Result<Label, LibraError> {
        let captures = self.regex.captures(label).ok_or_else(|| {
            LibraError::Format(
                ErrorInfo::new("label-format", "label does not match pattern")
                    .with_context("label", label)
                    .with_context("expected", self.source.clone()),
            )
        })?;
        let group = |name: &str| -> Result<String, LibraError> {
            match captures.name(name).map(|m| m.as_str()) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(LibraError::Format(
                    ErrorInfo::new("label-format", "label leaves a named group empty")
                        .with_context("label", label)
                        .with_context("missing", name)
                        .with_context("expected", self.source.clone()),
                )),
            }
        };
        Ok(Label {
            volume: group("volume")?,
            stream: group("stream")?,
            run_number: group("run")?,
            sample_number: group("sample")?,
            vial_number: group("vial")?,
        })
    }
}

/// Parses `label` with the default grammar.
pub fn parse_label(label: &str) -> Result<Label, LibraError> {
    DefaultLabelGrammar.parse(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_every_token_count_deviation() {
        for label in [
            "1L-IV-2-1-3",
            "1L-IV_2-1",
            "1L-IV_2-1-3-4",
            "1L_IV_2-1-3",
            "1L-X-IV_2-1-3",
            "1L-IV_2--3",
            "",
        ] {
            let err = parse_label(label).expect_err(label);
            assert_eq!(err.code(), "label-format", "{label}");
        }
    }

    #[test]
    fn pattern_requires_all_groups() {
        let err = PatternLabelGrammar::new(r"(?P<volume>\w+)-(?P<stream>\w+)").expect_err("groups");
        assert_eq!(err.info().context["missing"], "run");
        assert!(PatternLabelGrammar::new("(").is_err());
    }
}
