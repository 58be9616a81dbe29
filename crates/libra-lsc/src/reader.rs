//! Helpers for pulling samples out of counter exports.

use libra_core::errors::{ErrorInfo, LibraError};
use libra_core::{CountTable, MeasurementReader, SourceRef};
use log::debug;

use crate::sample::{NegativeActivity, Sample};

/// A count table tagged with the export it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedCountTable {
    source: SourceRef,
    table: CountTable,
}

impl NamedCountTable {
    /// Pairs `table` with its `source`.
    pub fn new(source: SourceRef, table: CountTable) -> Self {
        Self { source, table }
    }

    /// The wrapped table.
    pub fn table(&self) -> &CountTable {
        &self.table
    }
}

impl MeasurementReader for NamedCountTable {
    fn source(&self) -> SourceRef {
        self.source.clone()
    }

    fn read_counts(&self) -> Result<CountTable, LibraError> {
        Ok(self.table.clone())
    }
}

/// Returns the background sample stored under the first candidate label the
/// reader knows.
///
/// Labs relabel background vials between campaigns, so callers pass every
/// label in use, in order of preference.
pub fn background_from_reader<R>(reader: &R, candidates: &[String]) -> Result<Sample, LibraError>
where
    R: MeasurementReader + ?Sized,
{
    for candidate in candidates {
        match Sample::from_reader(reader, candidate) {
            Ok(sample) => return Ok(sample),
            Err(err) if err.is_not_found() => {
                debug!("background {candidate} not in {}", reader.source());
            }
            Err(err) => return Err(err),
        }
    }
    Err(LibraError::NotFound(
        ErrorInfo::new("background-missing", "no background vial found")
            .with_context("candidates", candidates.join(","))
            .with_context("source", reader.source().to_string()),
    ))
}

/// Reads vial `label` and subtracts the export's own background vial.
pub fn corrected_sample_from_reader<R>(
    reader: &R,
    label: &str,
    background_candidates: &[String],
) -> Result<(Sample, Option<NegativeActivity>), LibraError>
where
    R: MeasurementReader + ?Sized,
{
    let mut sample = Sample::from_reader(reader, label)?;
    let background = background_from_reader(reader, background_candidates)?;
    let clipped = sample.subtract_background(&background)?;
    Ok((sample, clipped))
}
