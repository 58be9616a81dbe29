//! Gas streams: LIBRA samples drawn repeatedly from one collection path.

use chrono::{Duration, NaiveDateTime};
use libra_core::errors::{ErrorInfo, LibraError};
use libra_core::{Activity, Elapsed, Measurement, TimeUnit};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::composite::{ActivityForm, CompositeSample};
use crate::export::ReleaseSeries;

/// Ordered LIBRA samples of one collection path (inner or outer vessel).
///
/// Samples are kept in the order given by the caller, which is taken as the
/// reporting order. Nothing is re-sorted by timestamp: the k-th cumulative
/// value always belongs to the k-th sample passed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    samples: Vec<CompositeSample>,
    start_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Stream {
    /// Creates an unnamed stream anchored at `start_time`.
    pub fn new(samples: Vec<CompositeSample>, start_time: NaiveDateTime) -> Self {
        Self {
            samples,
            start_time,
            name: None,
        }
    }

    /// Names the stream.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Stream name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// LIBRA samples in reporting order.
    pub fn samples(&self) -> &[CompositeSample] {
        &self.samples
    }

    /// Mutable access, e.g. to subtract backgrounds in place.
    pub fn samples_mut(&mut self) -> &mut [CompositeSample] {
        &mut self.samples
    }

    /// Reference time for relative sampling times.
    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// Number of LIBRA samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` when the stream holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Fails unless every vial of every sample is background corrected.
    pub fn ensure_background_subtracted(&self) -> Result<(), LibraError> {
        for (index, sample) in self.samples.iter().enumerate() {
            if let Some(vial) = sample.first_uncorrected() {
                let mut info = ErrorInfo::new(
                    "background-not-subtracted",
                    "background must be subtracted before calculating cumulative activity",
                )
                .with_context("sample", vial.name())
                .with_context("index", index.to_string());
                if let Some(name) = &self.name {
                    info = info.with_context("stream", name.clone());
                }
                return Err(LibraError::State(info));
            }
        }
        Ok(())
    }

    /// Running total of the requested activity over the samples.
    ///
    /// The k-th entry sums the first k per-sample values; its uncertainty is
    /// the quadrature sum of the first k per-sample uncertainties. Values are
    /// expressed in the unit of the first sample.
    pub fn cumulative_activity(&self, form: ActivityForm) -> Result<Vec<Measurement>, LibraError> {
        self.ensure_background_subtracted()?;
        let Some(first) = self.samples.first() else {
            return Ok(Vec::new());
        };
        let unit = first.unit();
        let mut running = Activity::zero(unit);
        let mut variance = 0.0;
        let mut series = Vec::with_capacity(self.samples.len());
        for sample in &self.samples {
            let step = sample.activity(form);
            running += step.value;
            variance += step.uncertainty.magnitude_in(unit).powi(2);
            let point = Measurement::new(running, Activity::new(variance.sqrt(), unit));
            trace!(
                "cumulative {:?} at {}: {} +/- {}",
                form,
                sample.timestamp(),
                point.value,
                point.uncertainty
            );
            series.push(point);
        }
        Ok(series)
    }

    /// Time of each sample relative to the start time, in sample order.
    pub fn relative_times(&self) -> Vec<Duration> {
        self.samples
            .iter()
            .map(|sample| sample.relative_time(self.start_time))
            .collect()
    }

    /// [`Stream::relative_times`] expressed in `unit`.
    pub fn relative_times_in(&self, unit: TimeUnit) -> Vec<Elapsed> {
        self.relative_times()
            .into_iter()
            .map(|duration| Elapsed::from_duration(duration, unit))
            .collect()
    }

    /// Cumulative activity paired with relative sampling times, ready for a
    /// release model.
    pub fn release_series(
        &self,
        form: ActivityForm,
        unit: TimeUnit,
    ) -> Result<ReleaseSeries, LibraError> {
        let cumulative = self.cumulative_activity(form)?;
        ReleaseSeries::new(
            self.name.clone(),
            form,
            self.relative_times_in(unit),
            cumulative,
        )
    }
}
