//! Release series handed to downstream release models.

use libra_core::errors::{ErrorInfo, LibraError};
use libra_core::{ActivityUnit, Elapsed, Measurement, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::composite::ActivityForm;
use crate::hash::{round_f64, stable_hash_string};
use crate::serde::{from_json_str, to_json_string};

/// Schema of serialized [`ReleaseSeries`] payloads.
pub const SERIES_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Parallel sequences of relative sampling time and cumulative activity for
/// one stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSeries {
    /// Schema version of the payload.
    pub schema_version: SchemaVersion,
    /// Stream the series was computed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    /// Fraction the cumulative activity covers.
    pub form: ActivityForm,
    /// Sampling time of each point relative to the run start.
    pub times: Vec<Elapsed>,
    /// Cumulative activity at each point.
    pub cumulative: Vec<Measurement>,
    /// Stable hash over the content above.
    pub series_hash: String,
}

fn series_hash(
    stream: Option<&str>,
    form: ActivityForm,
    times: &[Elapsed],
    cumulative: &[Measurement],
) -> Result<String, LibraError> {
    let times = times
        .iter()
        .map(|t| (round_f64(t.magnitude()), t.unit()))
        .collect::<Vec<_>>();
    let points = cumulative
        .iter()
        .map(|m| {
            (
                round_f64(m.value.magnitude()),
                round_f64(m.uncertainty.magnitude()),
                m.unit(),
            )
        })
        .collect::<Vec<_>>();
    stable_hash_string(&(SERIES_SCHEMA, stream, form, times, points))
}

impl ReleaseSeries {
    /// Assembles a series; both sequences must have one entry per sample.
    pub fn new(
        stream: Option<String>,
        form: ActivityForm,
        times: Vec<Elapsed>,
        cumulative: Vec<Measurement>,
    ) -> Result<Self, LibraError> {
        if times.len() != cumulative.len() {
            return Err(LibraError::Consistency(
                ErrorInfo::new("series-length", "times and activities differ in length")
                    .with_context("times", times.len().to_string())
                    .with_context("cumulative", cumulative.len().to_string()),
            ));
        }
        let series_hash = series_hash(stream.as_deref(), form, &times, &cumulative)?;
        Ok(Self {
            schema_version: SERIES_SCHEMA,
            stream,
            form,
            times,
            cumulative,
            series_hash,
        })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns `true` when the series has no points.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Last cumulative value, i.e. the total collected activity.
    pub fn total(&self) -> Option<&Measurement> {
        self.cumulative.last()
    }

    /// The same series with every activity expressed in `unit`.
    pub fn in_unit(self, unit: ActivityUnit) -> Result<Self, LibraError> {
        let cumulative = self.cumulative.iter().map(|m| m.to(unit)).collect();
        Self::new(self.stream, self.form, self.times, cumulative)
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> Result<String, LibraError> {
        to_json_string(self)
    }

    /// Decodes a series and checks its hash against the content.
    pub fn from_json(data: &str) -> Result<Self, LibraError> {
        let series: ReleaseSeries = from_json_str(data)?;
        let expected = series_hash(
            series.stream.as_deref(),
            series.form,
            &series.times,
            &series.cumulative,
        )?;
        if expected != series.series_hash {
            return Err(LibraError::Consistency(
                ErrorInfo::new("series-hash-mismatch", "series content does not match its hash")
                    .with_context("expected", expected)
                    .with_context("found", series.series_hash.clone()),
            ));
        }
        Ok(series)
    }
}
