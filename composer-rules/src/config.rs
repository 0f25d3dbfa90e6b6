//! Tunable thresholds for the compliance rules.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};

/// Minimum font sizes by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinFontSizes {
    /// Element with id `headline`.
    pub headline: u32,
    /// Element with id `subhead`.
    pub subhead: u32,
    /// Element with id `value`.
    pub value: u32,
    /// Any drinkaware notice.
    pub drinkaware: u32,
}

impl Default for MinFontSizes {
    fn default() -> Self {
        Self {
            headline: 48,
            subhead: 28,
            value: 36,
            drinkaware: 18,
        }
    }
}

impl MinFontSizes {
    /// Minimums keyed by the conventional element ids.
    #[must_use]
    pub fn by_element_id(&self) -> BTreeMap<&'static str, u32> {
        BTreeMap::from([
            ("headline", self.headline),
            ("subhead", self.subhead),
            ("value", self.value),
        ])
    }
}

/// Configuration for [`crate::RuleChecker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Maximum number of packshots per creative.
    pub packshot_limit: usize,
    /// Case-insensitive regular expressions for prohibited copy.
    pub banned_copy_patterns: Vec<String>,
    /// Text that marks an element as the drinkaware notice.
    pub drinkaware_text: String,
    /// Minimum font sizes.
    pub min_font_sizes: MinFontSizes,
    /// Drinkaware must start below this fraction of the canvas height.
    pub drinkaware_band: f64,
    /// Where the drinkaware notice is moved to, as a fraction of canvas height.
    pub drinkaware_target: f64,
    /// Font size from which text counts as large for contrast purposes.
    pub large_text_size: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            packshot_limit: 3,
            banned_copy_patterns: vec![
                r"\bfree\b".to_string(),
                r"\bwin\b|\bcompetition\b|\bcontest\b".to_string(),
                r"\bprice\b|\b£\s*\d|\d+\.\d{2}".to_string(),
                r"\bsustainable\b|\beco\b|\bgreen\b|\benvironment\b".to_string(),
                r"\bclinically\s+proven\b|\bguarantee\b".to_string(),
            ],
            drinkaware_text: "Drinkaware.co.uk".to_string(),
            min_font_sizes: MinFontSizes::default(),
            drinkaware_band: 0.85,
            drinkaware_target: 0.88,
            large_text_size: 24,
        }
    }
}

impl RuleConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> RulesResult<Self> {
        serde_json::from_str(json).map_err(RulesError::Config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> RulesResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
