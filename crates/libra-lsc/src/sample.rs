//! Single-vial activities and their one-shot background correction.

use std::fmt::{self, Display};

use libra_core::errors::{ErrorInfo, LibraError};
use libra_core::{Activity, ActivityUnit, Measurement, MeasurementReader, SourceRef};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::uncertainty::{mean, quadrature_sum, sample_std_dev};

fn sample_error(code: &str, message: impl Into<String>) -> ErrorInfo {
    ErrorInfo::new(code, message.into())
}

/// Activity of one vial before or after background correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VialReading {
    name: String,
    measurement: Measurement,
    replicates: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    origin: Option<SourceRef>,
}

impl VialReading {
    /// Vial label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Activity and its uncertainty.
    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    /// Number of counts averaged into the measurement.
    pub fn replicates(&self) -> usize {
        self.replicates
    }

    /// Export the counts were read from.
    pub fn origin(&self) -> Option<&SourceRef> {
        self.origin.as_ref()
    }
}

/// Recorded when background subtraction drove an activity below zero and
/// the result was clipped to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeActivity {
    /// Label of the clipped vial.
    pub sample: String,
    /// Activity before subtraction.
    pub measured: Activity,
    /// Background activity that was subtracted.
    pub background: Activity,
    /// The negative difference that was discarded.
    pub unclipped: Activity,
}

impl Display for NegativeActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "activity of {} is negative after subtracting background ({} - {} = {}); set to zero",
            self.sample, self.measured, self.background, self.unclipped
        )
    }
}

/// A vial reading after its background has been removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectedVial {
    reading: VialReading,
    background: Measurement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clipped: Option<NegativeActivity>,
}

impl CorrectedVial {
    /// Reading after subtraction.
    pub fn reading(&self) -> &VialReading {
        &self.reading
    }
}

/// A single vial, either as counted or after background correction.
///
/// Correction happens exactly once; only corrected vials take part in
/// cumulative activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "vial", rename_all = "snake_case")]
pub enum Sample {
    /// Counted activity, background still included.
    Raw(VialReading),
    /// Background-subtracted activity.
    Corrected(CorrectedVial),
}

impl Sample {
    /// Builds a sample from the counts recorded for one vial.
    ///
    /// Two or more counts are averaged and their Bessel-corrected standard
    /// deviation becomes the uncertainty. A single count has zero uncertainty.
    /// NaN and infinite counts are rejected.
    pub fn from_counts(
        values: &[f64],
        unit: ActivityUnit,
        label: impl Into<String>,
    ) -> Result<Self, LibraError> {
        let name = label.into();
        if values.is_empty() {
            return Err(LibraError::Format(
                sample_error("no-counts", "a sample needs at least one count")
                    .with_context("label", name),
            ));
        }
        if let Some(bad) = values.iter().find(|value| !value.is_finite()) {
            return Err(LibraError::Format(
                sample_error("non-finite-count", "counts must be finite numbers")
                    .with_context("label", name)
                    .with_context("value", bad.to_string())
                    .with_hint("drop empty or NaN rows from the counter export"),
            ));
        }
        let measurement = Measurement::new(
            Activity::new(mean(values), unit),
            Activity::new(sample_std_dev(values), unit),
        );
        Ok(Sample::Raw(VialReading {
            name,
            measurement,
            replicates: values.len(),
            origin: None,
        }))
    }

    /// Builds a single-count sample.
    pub fn from_activity(activity: Activity, label: impl Into<String>) -> Self {
        Sample::Raw(VialReading {
            name: label.into(),
            measurement: Measurement::exact(activity),
            replicates: 1,
            origin: None,
        })
    }

    /// Reads every count labelled `label` from `reader` and builds the sample.
    ///
    /// Replicate counts sharing the label are averaged. The reader's source is
    /// recorded as the sample origin.
    pub fn from_reader<R>(reader: &R, label: &str) -> Result<Self, LibraError>
    where
        R: MeasurementReader + ?Sized,
    {
        let table = reader.read_counts()?;
        let values = table.values_for(label).map_err(|err| match err {
            LibraError::NotFound(info) => {
                LibraError::NotFound(info.with_context("source", reader.source().to_string()))
            }
            other => other,
        })?;
        Ok(Self::from_counts(&values, table.unit(), label)?.with_origin(reader.source()))
    }

    /// Attaches the export the counts were read from.
    pub fn with_origin(mut self, origin: SourceRef) -> Self {
        self.reading_mut().origin = Some(origin);
        self
    }

    fn reading(&self) -> &VialReading {
        match self {
            Sample::Raw(reading) => reading,
            Sample::Corrected(corrected) => &corrected.reading,
        }
    }

    fn reading_mut(&mut self) -> &mut VialReading {
        match self {
            Sample::Raw(reading) => reading,
            Sample::Corrected(corrected) => &mut corrected.reading,
        }
    }

    /// Vial label.
    pub fn name(&self) -> &str {
        &self.reading().name
    }

    /// Current activity and uncertainty, whatever the correction state.
    pub fn measurement(&self) -> &Measurement {
        &self.reading().measurement
    }

    /// Current activity.
    pub fn activity(&self) -> Activity {
        self.measurement().value
    }

    /// Current uncertainty.
    pub fn uncertainty(&self) -> Activity {
        self.measurement().uncertainty
    }

    /// Background-corrected activity; fails while the background is still
    /// included.
    pub fn corrected_measurement(&self) -> Result<&Measurement, LibraError> {
        match self {
            Sample::Corrected(corrected) => Ok(&corrected.reading.measurement),
            Sample::Raw(reading) => Err(LibraError::State(
                sample_error(
                    "background-not-subtracted",
                    "background must be subtracted before using the activity",
                )
                .with_context("sample", reading.name.clone()),
            )),
        }
    }

    /// Number of counts averaged into the activity.
    pub fn replicates(&self) -> usize {
        self.reading().replicates
    }

    /// Returns `true` when the activity is the mean of two or more counts.
    pub fn is_repeated(&self) -> bool {
        self.replicates() > 1
    }

    /// Returns `true` once the background has been subtracted.
    pub fn is_background_subtracted(&self) -> bool {
        matches!(self, Sample::Corrected(_))
    }

    /// Export the counts were read from.
    pub fn origin(&self) -> Option<&SourceRef> {
        self.reading().origin.as_ref()
    }

    /// Background measurement that was subtracted, if any.
    pub fn background(&self) -> Option<&Measurement> {
        match self {
            Sample::Corrected(corrected) => Some(&corrected.background),
            Sample::Raw(_) => None,
        }
    }

    /// Clipping record left by the background subtraction, if any.
    pub fn clipped(&self) -> Option<&NegativeActivity> {
        match self {
            Sample::Corrected(corrected) => corrected.clipped.as_ref(),
            Sample::Raw(_) => None,
        }
    }

    /// Subtracts `background` from this vial.
    ///
    /// Fails without touching the sample if the background was already
    /// subtracted. A negative difference is clipped to zero in the sample's
    /// unit; the returned [`NegativeActivity`] reports it. The uncertainty is
    /// the quadrature sum of both uncertainties in every case.
    pub fn subtract_background(
        &mut self,
        background: &Sample,
    ) -> Result<Option<NegativeActivity>, LibraError> {
        let reading = match self {
            Sample::Raw(reading) => reading.clone(),
            Sample::Corrected(corrected) => {
                return Err(LibraError::State(
                    sample_error(
                        "background-already-subtracted",
                        "background already subtracted",
                    )
                    .with_context("sample", corrected.reading.name.clone())
                    .with_context("background", background.name()),
                ))
            }
        };

        let bg = *background.measurement();
        let unit = reading.measurement.unit();
        let difference = reading.measurement.value - bg.value;
        let uncertainty = quadrature_sum(&[reading.measurement.uncertainty, bg.uncertainty], unit);

        let clipped = if difference.is_negative() {
            let record = NegativeActivity {
                sample: reading.name.clone(),
                measured: reading.measurement.value,
                background: bg.value.to(unit),
                unclipped: difference,
            };
            warn!("{record}");
            Some(record)
        } else {
            None
        };
        let value = if clipped.is_some() {
            Activity::zero(unit)
        } else {
            difference
        };

        let corrected = CorrectedVial {
            reading: VialReading {
                measurement: Measurement::new(value, uncertainty),
                ..reading
            },
            background: bg,
            clipped: clipped.clone(),
        };
        *self = Sample::Corrected(corrected);
        Ok(clipped)
    }
}

impl Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sample {}", self.name())
    }
}
