#![deny(missing_docs)]
#![doc = "Liquid scintillation counting aggregation for LIBRA runs: background-corrected vials, LIBRA samples, gas streams and cumulative tritium release series with propagated uncertainty."]

/// LIBRA samples and their soluble/insoluble aggregates.
pub mod composite;
/// Release series export.
pub mod export;
/// Label driven grouping of vials into streams and runs.
pub mod grouping;
/// Canonical hashing helpers.
pub mod hash;
/// Vial label grammars.
pub mod label;
/// Aggregation options.
pub mod opts;
/// End-to-end aggregation from counter exports.
pub mod pipeline;
/// Sample extraction from counter exports.
pub mod reader;
/// Runs of several streams.
pub mod run;
/// Single-vial samples.
pub mod sample;
/// Canonical JSON and YAML helpers.
pub mod serde;
/// Gas streams and cumulative activity.
pub mod stream;
/// Statistics and uncertainty propagation.
pub mod uncertainty;

pub use composite::{
    parse_timestamp, ActivityForm, CompositeSample, DATE_FORMAT, MAX_VIALS, SOLUBLE_VIALS,
};
pub use export::ReleaseSeries;
pub use grouping::{build_run, build_streams, SampleKey, SampleTimestamps};
pub use label::{parse_label, DefaultLabelGrammar, PatternLabelGrammar};
pub use opts::AggregationOpts;
pub use pipeline::{aggregate, CountSource, RunReport};
pub use reader::{background_from_reader, corrected_sample_from_reader, NamedCountTable};
pub use run::Run;
pub use sample::{CorrectedVial, NegativeActivity, Sample, VialReading};
pub use stream::Stream;
pub use uncertainty::{mean, quadrature_sum, sample_std_dev, sum_measurements};
