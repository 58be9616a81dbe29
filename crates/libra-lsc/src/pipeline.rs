//! End-to-end aggregation: counter exports in, release series out.

use chrono::NaiveDateTime;
use libra_core::errors::LibraError;
use libra_core::MeasurementReader;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::export::ReleaseSeries;
use crate::grouping::{build_run, SampleTimestamps};
use crate::opts::AggregationOpts;
use crate::reader::background_from_reader;
use crate::run::Run;
use crate::sample::{NegativeActivity, Sample};

/// Vials to pick out of one counter export.
pub struct CountSource<'a> {
    /// Export holding the counts and its own background vial.
    pub reader: &'a dyn MeasurementReader,
    /// Vial labels to read; replicate counts of a label are averaged.
    pub labels: Vec<String>,
}

/// Everything produced by [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// The grouped run, every vial background corrected.
    pub run: Run,
    /// One release series per stream, in stream order.
    pub series: Vec<ReleaseSeries>,
    /// Vials whose activity was clipped to zero.
    pub clipped: Vec<NegativeActivity>,
}

/// Reads, corrects, groups and accumulates the requested vials.
///
/// Each source's vials are corrected with the background found in that same
/// source. Series are reported in `opts.activity_unit` and `opts.time_unit`.
pub fn aggregate(
    sources: &[CountSource<'_>],
    start_time: NaiveDateTime,
    timestamps: &SampleTimestamps,
    opts: &AggregationOpts,
) -> Result<RunReport, LibraError> {
    let opts = opts.sanitised();
    let parser = opts.label_parser()?;
    let mut samples: Vec<Sample> = Vec::new();
    let mut clipped = Vec::new();

    for source in sources {
        let background = background_from_reader(source.reader, &opts.background_labels)?;
        debug!(
            "{}: background {} = {}",
            source.reader.source(),
            background.name(),
            background.activity()
        );
        for label in &source.labels {
            let mut sample = Sample::from_reader(source.reader, label)?;
            if let Some(record) = sample.subtract_background(&background)? {
                clipped.push(record);
            }
            samples.push(sample);
        }
    }
    if !clipped.is_empty() {
        warn!("{} vial(s) clipped to zero activity", clipped.len());
    }

    let run = build_run(samples, start_time, timestamps, parser.as_ref())?;
    let series = run
        .release_series(opts.form, opts.time_unit)?
        .into_iter()
        .map(|series| series.in_unit(opts.activity_unit))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RunReport {
        run,
        series,
        clipped,
    })
}
