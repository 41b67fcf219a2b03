//! Reshape configuration.
//!
//! Defaults match the conventional `variable` / `value` column names. A
//! configuration can be loaded from TOML or YAML:
//!
//! ```toml
//! label_name = "variable"
//! value_name = "value"
//! label_order = "lexicographic"
//! dummy_separator = "_"
//! unify = "strict"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Order of dynamically discovered names (unstack labels, dummy categories)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrder {
    /// Order of first occurrence in row order
    #[default]
    FirstSeen,
    /// Sorted by the values' natural ordering
    Lexicographic,
}

/// How the element types of several value columns are merged into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnifyPolicy {
    /// Numeric widening: uint8 -> int64 -> float64
    #[default]
    Widen,
    /// Every type must match exactly
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReshapeConfig {
    /// Default name of the label column written by `stack` and read by `unstack`
    pub label_name: String,
    /// Default name of the value column
    pub value_name: String,
    pub label_order: LabelOrder,
    pub category_order: LabelOrder,
    /// Separator placed between the source column name and the category
    pub dummy_separator: String,
    pub unify: UnifyPolicy,
    /// Row count above which grouping switches to sharded parallel folding
    pub parallel_threshold: usize,
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        Self {
            label_name: "variable".to_string(),
            value_name: "value".to_string(),
            label_order: LabelOrder::FirstSeen,
            category_order: LabelOrder::FirstSeen,
            dummy_separator: "_".to_string(),
            unify: UnifyPolicy::Widen,
            parallel_threshold: 100_000,
        }
    }
}

impl ReshapeConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file, choosing the format from its extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            other => Err(Error::Config(format!(
                "unsupported configuration format: {:?}",
                other.unwrap_or("")
            ))),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.label_name.is_empty() || self.value_name.is_empty() {
            return Err(Error::Config(
                "label_name and value_name must not be empty".to_string(),
            ));
        }
        if self.label_name == self.value_name {
            return Err(Error::Config(format!(
                "label_name and value_name must differ (both are {:?})",
                self.label_name
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(Error::Config(
                "parallel_threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
