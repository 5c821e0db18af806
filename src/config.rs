//! Classifier configuration.
//!
//! The defaults reproduce the built-in rule tables. A JSON file may override
//! any section; omitted sections and fields keep their defaults.
//!
//! ```json
//! {
//!   "title": { "top_fraction": 0.25 },
//!   "geometry": { "margin_ratio": 0.2 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{CenteringRules, HeadingRules, NormalizerRules, TextNormalizer, TitleRules};
use crate::error::{Error, Result};

/// Complete set of rule tables used to build an outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Text cleanup and ignore patterns
    pub normalizer: NormalizerRules,
    /// Heading profiles and fallbacks
    pub headings: HeadingRules,
    /// Centering thresholds
    pub geometry: CenteringRules,
    /// Title selection thresholds
    pub title: TitleRules,
}

impl OutlineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(format!("JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded outline config from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Check numeric ranges and compile every pattern once.
    pub fn validate(&self) -> Result<()> {
        for profile in &self.headings.profiles {
            if profile.max_size.is_some_and(|max| max < profile.min_size) {
                return Err(Error::InvalidConfig(format!(
                    "{} profile has max_size below min_size",
                    profile.level
                )));
            }
        }
        for rule in &self.headings.fallbacks {
            if rule.max_size.is_some_and(|max| max < rule.min_size) {
                return Err(Error::InvalidConfig(format!(
                    "{} fallback has max_size below min_size",
                    rule.level
                )));
            }
        }

        let ratios = [
            ("geometry.margin_ratio", self.geometry.margin_ratio),
            ("geometry.wide_ratio", self.geometry.wide_ratio),
            ("title.top_fraction", self.title.top_fraction),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        TextNormalizer::new(&self.normalizer).map(|_| ())
    }
}
