//! Provenance and schema descriptors attached to counts and exported series.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Identifies the file or reader a count value came from.
///
/// Used for traceability only; two samples with different origins are not
/// treated differently by any aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SourceRef {
    /// Path or identifier of the originating export.
    pub path: String,
    /// Quench set reported in the export header, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quench_set: Option<String>,
}

impl SourceRef {
    /// Creates a source reference from a path or identifier.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            quench_set: None,
        }
    }

    /// Records the quench set used by the counter.
    pub fn with_quench_set(mut self, quench_set: impl Into<String>) -> Self {
        self.quench_set = Some(quench_set.into());
        self
    }
}

impl Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.quench_set {
            Some(quench) => write!(f, "{} [{}]", self.path, quench),
            None => write!(f, "{}", self.path),
        }
    }
}
