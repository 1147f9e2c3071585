//! Rulebook configuration.
//!
//! The rulebook is a YAML tree addressed by dotted node paths
//! (`headings.level_1`, `abstract.chinese.chinese_title`). Each leaf is a
//! [`StyleFragment`]; `global_format` supplies defaults for fields a node
//! leaves out, and `warnings` is the per-field mask of enabled checks.

mod fragment;

pub use fragment::{Scalar, StyleFragment};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::diff::{FieldId, WarningMask};
use crate::error::{Error, Result};

/// Rulebook shipped with the crate.
pub const DEFAULT_RULES: &str = include_str!("../../rules/default.yaml");

const RESERVED_KEYS: &[&str] = &["global_format", "warnings", "promotion"];

/// A configured promotion pair, by category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionEntry {
    /// Category of the ancestor node
    pub ancestor: String,
    /// Category body descendants are reclassified to
    pub target: String,
}

/// A validated rulebook.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    root: Value,
    defaults: StyleFragment,
    warnings: WarningMask,
    promotion: Option<Vec<PromotionEntry>>,
}

impl RuleConfig {
    /// Parse a rulebook from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(yaml)?;
        if !root.is_mapping() {
            return Err(Error::config_invalid("", "rulebook must be a mapping"));
        }

        let defaults = match root.get("global_format") {
            Some(value) => parse_fragment("global_format", value)?,
            None => StyleFragment::default(),
        };

        let warnings = match root.get("warnings") {
            Some(value) => {
                let flags: BTreeMap<FieldId, bool> = serde_yaml::from_value(value.clone())
                    .map_err(|e| Error::config_invalid("warnings", e.to_string()))?;
                WarningMask::from_flags(flags)
            }
            None => WarningMask::all_enabled(),
        };

        let promotion = match root.get("promotion") {
            Some(value) => Some(
                serde_yaml::from_value(value.clone())
                    .map_err(|e| Error::config_invalid("promotion", e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            root,
            defaults,
            warnings,
            promotion,
        })
    }

    /// Load a rulebook file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// The rulebook embedded in the crate.
    pub fn default_rules() -> Result<Self> {
        Self::from_yaml_str(DEFAULT_RULES)
    }

    /// Raw value at a dotted path.
    pub fn value(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(&self.root, |node, segment| node.get(segment))
    }

    /// Whether a node path is configured.
    pub fn contains(&self, path: &str) -> bool {
        self.value(path).is_some()
    }

    /// The fragment configured for a node, without defaults.
    ///
    /// Missing paths fail with [`Error::ConfigMissing`], malformed ones with
    /// [`Error::ConfigInvalid`].
    pub fn fragment(&self, path: &str) -> Result<StyleFragment> {
        if RESERVED_KEYS.contains(&path) {
            return Err(Error::config_invalid(path, "reserved key is not a node path"));
        }
        let value = self
            .value(path)
            .ok_or_else(|| Error::ConfigMissing(path.to_string()))?;
        parse_fragment(path, value)
    }

    /// The node fragment merged over `global_format`.
    pub fn resolved_fragment(&self, path: &str) -> Result<StyleFragment> {
        Ok(self.fragment(path)?.merged_over(&self.defaults))
    }

    /// `global_format` defaults.
    pub fn defaults(&self) -> &StyleFragment {
        &self.defaults
    }

    /// The warning mask.
    pub fn warnings(&self) -> &WarningMask {
        &self.warnings
    }

    /// Replace the warning mask.
    pub fn with_warnings(mut self, warnings: WarningMask) -> Self {
        self.warnings = warnings;
        self
    }

    /// Configured promotion pairs, if the rulebook overrides the built-ins.
    pub fn promotion(&self) -> Option<&[PromotionEntry]> {
        self.promotion.as_deref()
    }
}

fn parse_fragment(path: &str, value: &Value) -> Result<StyleFragment> {
    if !value.is_mapping() {
        return Err(Error::config_invalid(path, "expected a mapping of style fields"));
    }
    serde_yaml::from_value(value.clone()).map_err(|e| Error::config_invalid(path, e.to_string()))
}
