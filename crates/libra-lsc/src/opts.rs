use libra_core::errors::LibraError;
use libra_core::{ActivityUnit, LabelParser, TimeUnit};
use serde::{Deserialize, Serialize};

use crate::composite::ActivityForm;
use crate::label::{DefaultLabelGrammar, PatternLabelGrammar};
use crate::serde::{from_json_str, from_yaml_str};

fn default_background_labels() -> Vec<String> {
    vec!["1L-BL-1".to_string()]
}

/// Settings for turning counter exports into release series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationOpts {
    /// Alternate label grammar; the laboratory default is used when absent.
    #[serde(default)]
    pub label_pattern: Option<String>,
    /// Background vial labels, tried in order.
    #[serde(default = "default_background_labels")]
    pub background_labels: Vec<String>,
    /// Unit of relative sampling times.
    #[serde(default)]
    pub time_unit: TimeUnit,
    /// Unit counts are reported in.
    #[serde(default)]
    pub activity_unit: ActivityUnit,
    /// Fraction reported in cumulative series.
    #[serde(default)]
    pub form: ActivityForm,
}

impl Default for AggregationOpts {
    fn default() -> Self {
        Self {
            label_pattern: None,
            background_labels: default_background_labels(),
            time_unit: TimeUnit::default(),
            activity_unit: ActivityUnit::default(),
            form: ActivityForm::default(),
        }
    }
}

impl AggregationOpts {
    /// Loads options from YAML.
    pub fn from_yaml_str(data: &str) -> Result<Self, LibraError> {
        Ok(from_yaml_str::<Self>(data)?.sanitised())
    }

    /// Loads options from JSON.
    pub fn from_json_str(data: &str) -> Result<Self, LibraError> {
        Ok(from_json_str::<Self>(data)?.sanitised())
    }

    /// Returns a copy without blank background labels or blank patterns.
    pub fn sanitised(&self) -> Self {
        let background_labels = self
            .background_labels
            .iter()
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
        let label_pattern = self
            .label_pattern
            .as_deref()
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_string);
        Self {
            label_pattern,
            background_labels,
            ..self.clone()
        }
    }

    /// Label parser selected by [`AggregationOpts::label_pattern`].
    pub fn label_parser(&self) -> Result<Box<dyn LabelParser>, LibraError> {
        match &self.label_pattern {
            Some(pattern) => Ok(Box::new(PatternLabelGrammar::new(pattern)?)),
            None => Ok(Box::new(DefaultLabelGrammar)),
        }
    }
}
