use chrono::NaiveDateTime;
use libra_core::errors::{ErrorInfo, LibraError};
use libra_core::TimeUnit;
use serde::{Deserialize, Serialize};

use crate::composite::ActivityForm;
use crate::export::ReleaseSeries;
use crate::stream::Stream;

/// One experimental run: every stream sampled from a shared start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    streams: Vec<Stream>,
    start_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Run {
    /// Collects `streams` under a common start time.
    pub fn new(streams: Vec<Stream>, start_time: NaiveDateTime) -> Self {
        Self {
            streams,
            start_time,
            name: None,
        }
    }

    /// Names the run.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Run name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Experiment start time.
    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// Streams in insertion order.
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Mutable access to the streams.
    pub fn streams_mut(&mut self) -> &mut [Stream] {
        &mut self.streams
    }

    /// Looks a stream up by name.
    pub fn stream(&self, name: &str) -> Result<&Stream, LibraError> {
        self.streams
            .iter()
            .find(|stream| stream.name() == Some(name))
            .ok_or_else(|| {
                let known = self
                    .streams
                    .iter()
                    .filter_map(Stream::name)
                    .collect::<Vec<_>>()
                    .join(",");
                LibraError::NotFound(
                    ErrorInfo::new("stream-missing", "run has no stream with this name")
                        .with_context("stream", name)
                        .with_context("known", known),
                )
            })
    }

    /// Release series of every stream, in stream order.
    pub fn release_series(
        &self,
        form: ActivityForm,
        unit: TimeUnit,
    ) -> Result<Vec<ReleaseSeries>, LibraError> {
        self.streams
            .iter()
            .map(|stream| stream.release_series(form, unit))
            .collect()
    }
}
