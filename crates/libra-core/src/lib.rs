#![deny(missing_docs)]
#![doc = "Core traits and data types for LIBRA tritium accounting: the error taxonomy, unit-tagged quantities and the reader/label seams consumed by the aggregation crate."]

pub mod errors;
pub mod provenance;
mod types;
pub mod units;

pub use errors::{ErrorInfo, LibraError};
pub use provenance::{SchemaVersion, SourceRef};
pub use types::{CountTable, Label, Measurement};
pub use units::{Activity, ActivityUnit, Elapsed, TimeUnit};

/// Source of raw per-vial counts, typically a counter export file.
///
/// Readers hand back every `(label, value)` pair they hold; grouping replicate
/// counts is left to the caller.
pub trait MeasurementReader {
    /// Identifies where the counts came from.
    fn source(&self) -> SourceRef;

    /// Reads the full count table.
    fn read_counts(&self) -> Result<CountTable, LibraError>;
}

/// Decodes a vial label into its structured fields.
pub trait LabelParser: Send + Sync {
    /// Parses `label`, failing with [`LibraError::Format`] on any deviation
    /// from the grammar.
    fn parse(&self, label: &str) -> Result<Label, LibraError>;
}

impl MeasurementReader for CountTable {
    fn source(&self) -> SourceRef {
        SourceRef::new("memory")
    }

    fn read_counts(&self) -> Result<CountTable, LibraError> {
        Ok(self.clone())
    }
}

impl<T: MeasurementReader + ?Sized> MeasurementReader for &T {
    fn source(&self) -> SourceRef {
        (**self).source()
    }

    fn read_counts(&self) -> Result<CountTable, LibraError> {
        (**self).read_counts()
    }
}
