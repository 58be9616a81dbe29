//! Builds streams from a flat list of vials using their labels.
//!
//! Vials are grouped by stream, then by LIBRA sample number. Both levels keep
//! first-seen order, and that order becomes the sample order of each
//! [`Stream`], which cumulative activity and relative times depend on.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use libra_core::errors::{ErrorInfo, LibraError};
use libra_core::{Label, LabelParser};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::composite::CompositeSample;
use crate::run::Run;
use crate::sample::Sample;
use crate::stream::Stream;

/// Identifies one LIBRA sample within a run: its stream and sample number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SampleKey {
    /// Stream name, e.g. `IV`.
    pub stream: String,
    /// Sample number within the stream, e.g. `3`.
    pub sample_number: String,
}

impl SampleKey {
    /// Creates a key.
    pub fn new(stream: impl Into<String>, sample_number: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            sample_number: sample_number.into(),
        }
    }
}

/// Collection times of LIBRA samples.
pub type SampleTimestamps = HashMap<SampleKey, NaiveDateTime>;

struct Grouped {
    run_number: Option<String>,
    streams: IndexMap<String, Stream>,
}

fn check_run_numbers(samples: &[Sample], labels: &[Label]) -> Result<Option<String>, LibraError> {
    let Some(first) = labels.first() else {
        return Ok(None);
    };
    for (sample, label) in samples.iter().zip(labels) {
        if label.run_number != first.run_number {
            return Err(LibraError::Consistency(
                ErrorInfo::new(
                    "run-number-mismatch",
                    "all samples should have the same run number",
                )
                .with_context("sample", sample.name())
                .with_context("expected", first.run_number.clone())
                .with_context("found", label.run_number.clone()),
            ));
        }
    }
    Ok(Some(first.run_number.clone()))
}

fn group(
    samples: Vec<Sample>,
    start_time: NaiveDateTime,
    timestamps: &SampleTimestamps,
    parser: &dyn LabelParser,
) -> Result<Grouped, LibraError> {
    let labels = samples
        .iter()
        .map(|sample| parser.parse(sample.name()))
        .collect::<Result<Vec<_>, _>>()?;
    let run_number = check_run_numbers(&samples, &labels)?;

    let mut by_stream: IndexMap<String, IndexMap<String, Vec<Sample>>> = IndexMap::new();
    for (sample, label) in samples.into_iter().zip(labels) {
        by_stream
            .entry(label.stream)
            .or_default()
            .entry(label.sample_number)
            .or_default()
            .push(sample);
    }

    let mut streams = IndexMap::with_capacity(by_stream.len());
    for (stream_name, by_number) in by_stream {
        let mut composites = Vec::with_capacity(by_number.len());
        for (sample_number, vials) in by_number {
            let key = SampleKey::new(stream_name.clone(), sample_number);
            let Some(timestamp) = timestamps.get(&key) else {
                let mut info = ErrorInfo::new(
                    "timestamp-missing",
                    "no collection time recorded for LIBRA sample",
                )
                .with_context("stream", key.stream.clone())
                .with_context("sample_number", key.sample_number.clone());
                if let Some(run) = &run_number {
                    info = info.with_context("key", format!("{run}-{}-x", key.sample_number));
                }
                return Err(LibraError::NotFound(info));
            };
            debug!(
                "stream {} sample {}: {} vial(s) at {}",
                key.stream,
                key.sample_number,
                vials.len(),
                timestamp
            );
            composites.push(CompositeSample::new(vials, *timestamp)?);
        }
        let stream = Stream::new(composites, start_time).with_name(stream_name.clone());
        streams.insert(stream_name, stream);
    }
    debug!("built {} stream(s)", streams.len());
    Ok(Grouped {
        run_number,
        streams,
    })
}

/// Groups `samples` into named streams of LIBRA samples.
///
/// Fails on the first malformed label, on any run number disagreement and on
/// any LIBRA sample without a timestamp. No partial result is returned.
pub fn build_streams(
    samples: Vec<Sample>,
    start_time: NaiveDateTime,
    timestamps: &SampleTimestamps,
    parser: &dyn LabelParser,
) -> Result<IndexMap<String, Stream>, LibraError> {
    group(samples, start_time, timestamps, parser).map(|grouped| grouped.streams)
}

/// Like [`build_streams`], wrapping the streams in a [`Run`] named after the
/// shared run number.
pub fn build_run(
    samples: Vec<Sample>,
    start_time: NaiveDateTime,
    timestamps: &SampleTimestamps,
    parser: &dyn LabelParser,
) -> Result<Run, LibraError> {
    let grouped = group(samples, start_time, timestamps, parser)?;
    let run = Run::new(grouped.streams.into_values().collect(), start_time);
    Ok(match grouped.run_number {
        Some(number) => run.with_name(format!("run {number}")),
        None => run,
    })
}
