use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, LibraError};
use crate::units::{Activity, ActivityUnit};

/// An activity with its one-sigma uncertainty.
///
/// The uncertainty is always stored in the unit of the value. Single-count
/// measurements carry an uncertainty of exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Best estimate of the activity.
    pub value: Activity,
    /// Standard deviation of the estimate.
    pub uncertainty: Activity,
}

impl Measurement {
    /// Creates a measurement, expressing the uncertainty in the value's unit.
    pub fn new(value: Activity, uncertainty: Activity) -> Self {
        Self {
            value,
            uncertainty: uncertainty.to(value.unit()),
        }
    }

    /// A measurement without uncertainty.
    pub fn exact(value: Activity) -> Self {
        Self::new(value, Activity::zero(value.unit()))
    }

    /// The zero measurement in `unit`.
    pub fn zero(unit: ActivityUnit) -> Self {
        Self::exact(Activity::zero(unit))
    }

    /// Unit shared by value and uncertainty.
    pub fn unit(&self) -> ActivityUnit {
        self.value.unit()
    }

    /// Converts value and uncertainty to `unit`.
    pub fn to(&self, unit: ActivityUnit) -> Self {
        Self {
            value: self.value.to(unit),
            uncertainty: self.uncertainty.to(unit),
        }
    }

    /// Returns `true` when the uncertainty is zero.
    pub fn is_exact(&self) -> bool {
        self.uncertainty.magnitude() == 0.0
    }
}

/// Decoded fields of a vial label such as `1L-IV_2-1-3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    /// Reactor volume tag (`1L`, `100mL`).
    pub volume: String,
    /// Collection stream (`IV`, `OV`).
    pub stream: String,
    /// Experimental run number.
    pub run_number: String,
    /// LIBRA sample number within the run.
    pub sample_number: String,
    /// Vial position within the LIBRA sample.
    pub vial_number: String,
}

impl Label {
    /// Key under which experiment logbooks record the sampling time of the
    /// LIBRA sample this vial belongs to, e.g. `2-1-x`.
    pub fn timestamp_key(&self) -> String {
        format!("{}-{}-x", self.run_number, self.sample_number)
    }
}

/// Flat list of per-vial counts as delivered by a counter export.
///
/// Several entries may share a label when a vial was counted repeatedly; the
/// table keeps every entry in export order and never collapses replicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountTable {
    labels: Vec<String>,
    values: Vec<f64>,
    unit: ActivityUnit,
}

impl CountTable {
    /// Builds a table from parallel label and value columns.
    pub fn new(
        labels: Vec<String>,
        values: Vec<f64>,
        unit: ActivityUnit,
    ) -> Result<Self, LibraError> {
        if labels.len() != values.len() {
            return Err(LibraError::Consistency(
                ErrorInfo::new(
                    "count-table-length",
                    "label and value columns differ in length",
                )
                .with_context("labels", labels.len().to_string())
                .with_context("values", values.len().to_string())
                .with_hint("give a placeholder label for vials without one"),
            ));
        }
        Ok(Self {
            labels,
            values,
            unit,
        })
    }

    /// Builds a table from `(label, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I, unit: ActivityUnit) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let (labels, values) = pairs
            .into_iter()
            .map(|(label, value)| (label.into(), value))
            .unzip();
        Self {
            labels,
            values,
            unit,
        }
    }

    /// Labels in export order, replicates included.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Values in export order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Unit of every value in the table.
    pub fn unit(&self) -> ActivityUnit {
        self.unit
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` when at least one entry carries `label`.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|candidate| candidate == label)
    }

    /// Every value recorded under `label`, in export order.
    pub fn values_for(&self, label: &str) -> Result<Vec<f64>, LibraError> {
        let values: Vec<f64> = self
            .labels
            .iter()
            .zip(self.values.iter())
            .filter(|(candidate, _)| candidate.as_str() == label)
            .map(|(_, value)| *value)
            .collect();
        if values.is_empty() {
            return Err(LibraError::NotFound(
                ErrorInfo::new("vial-missing", "vial label not present in count table")
                    .with_context("label", label),
            ));
        }
        Ok(values)
    }
}
