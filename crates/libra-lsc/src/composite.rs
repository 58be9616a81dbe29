//! LIBRA samples: the vials collected together at one sampling time.

use chrono::{Duration, NaiveDateTime};
use libra_core::errors::{ErrorInfo, LibraError};
use libra_core::{ActivityUnit, Measurement};
use serde::{Deserialize, Serialize};

use crate::sample::{NegativeActivity, Sample};
use crate::uncertainty::sum_measurements;

/// Number of leading vial positions holding the soluble fraction.
pub const SOLUBLE_VIALS: usize = 2;

/// Vial positions of one LIBRA sample.
pub const MAX_VIALS: usize = 4;

/// Timestamp layout used by counter exports and run logbooks,
/// e.g. `07/12/2024 10:15 AM`.
pub const DATE_FORMAT: &str = "%m/%d/%Y %I:%M %p";

fn composite_error(code: &str, message: impl Into<String>) -> ErrorInfo {
    ErrorInfo::new(code, message.into())
}

/// Parses a timestamp written in [`DATE_FORMAT`].
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, LibraError> {
    NaiveDateTime::parse_from_str(text.trim(), DATE_FORMAT).map_err(|err| {
        LibraError::Format(
            composite_error("timestamp-format", "timestamp does not match the export layout")
                .with_context("timestamp", text)
                .with_context("expected", DATE_FORMAT)
                .with_hint(err.to_string()),
        )
    })
}

/// Which fraction of a LIBRA sample an activity query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityForm {
    /// Every vial.
    #[default]
    Total,
    /// The first [`SOLUBLE_VIALS`] vials.
    Soluble,
    /// Every vial after the soluble ones.
    Insoluble,
}

/// One sampling event: up to four vials collected at the same instant.
///
/// Vial order is the physical vial numbering; the soluble/insoluble split is
/// purely positional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSample {
    vials: Vec<Sample>,
    timestamp: NaiveDateTime,
}

impl CompositeSample {
    /// Groups `vials` collected at `timestamp`; one to [`MAX_VIALS`] vials.
    pub fn new(vials: Vec<Sample>, timestamp: NaiveDateTime) -> Result<Self, LibraError> {
        if vials.is_empty() {
            return Err(LibraError::Consistency(
                composite_error("empty-composite", "a LIBRA sample needs at least one vial")
                    .with_context("timestamp", timestamp.to_string()),
            ));
        }
        if vials.len() > MAX_VIALS {
            return Err(LibraError::Consistency(
                composite_error("too-many-vials", "a LIBRA sample holds at most four vials")
                    .with_context("timestamp", timestamp.to_string())
                    .with_context("vials", vials.len().to_string())
                    .with_context("first", vials[0].name()),
            ));
        }
        Ok(Self { vials, timestamp })
    }

    /// Vials in physical order.
    pub fn vials(&self) -> &[Sample] {
        &self.vials
    }

    /// Absolute collection time.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Unit of the first vial, used for every aggregate.
    pub fn unit(&self) -> ActivityUnit {
        self.vials
            .first()
            .map(|vial| vial.activity().unit())
            .unwrap_or_default()
    }

    fn sum(&self, vials: &[Sample]) -> Measurement {
        sum_measurements(vials.iter().map(Sample::measurement), self.unit())
    }

    /// Summed activity of the soluble vials.
    pub fn soluble_activity(&self) -> Measurement {
        let end = SOLUBLE_VIALS.min(self.vials.len());
        self.sum(&self.vials[..end])
    }

    /// Summed activity of the insoluble vials; zero when there are none.
    pub fn insoluble_activity(&self) -> Measurement {
        let start = SOLUBLE_VIALS.min(self.vials.len());
        self.sum(&self.vials[start..])
    }

    /// Summed activity of every vial.
    pub fn total_activity(&self) -> Measurement {
        self.sum(&self.vials)
    }

    /// Activity of the requested fraction.
    pub fn activity(&self, form: ActivityForm) -> Measurement {
        match form {
            ActivityForm::Total => self.total_activity(),
            ActivityForm::Soluble => self.soluble_activity(),
            ActivityForm::Insoluble => self.insoluble_activity(),
        }
    }

    /// Time elapsed between `start` and the collection of this sample.
    pub fn relative_time(&self, start: NaiveDateTime) -> Duration {
        self.timestamp - start
    }

    /// Subtracts `background` from every vial, in order.
    ///
    /// Stops at the first vial that fails; earlier vials stay corrected.
    /// Returns one record per clipped vial.
    pub fn subtract_background(
        &mut self,
        background: &Sample,
    ) -> Result<Vec<NegativeActivity>, LibraError> {
        let mut clipped = Vec::new();
        for vial in &mut self.vials {
            if let Some(record) = vial.subtract_background(background)? {
                clipped.push(record);
            }
        }
        Ok(clipped)
    }

    /// Returns `true` when every vial is background corrected.
    pub fn is_background_subtracted(&self) -> bool {
        self.vials.iter().all(Sample::is_background_subtracted)
    }

    /// First vial whose background is still included.
    pub fn first_uncorrected(&self) -> Option<&Sample> {
        self.vials
            .iter()
            .find(|vial| !vial.is_background_subtracted())
    }
}
