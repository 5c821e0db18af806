//! Line text cleanup and boilerplate filtering.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A pattern that, when found in a line, replaces the whole line with a
/// canonical string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialCase {
    /// Regular expression, matched case-insensitively anywhere in the line
    pub pattern: String,
    /// Replacement text returned verbatim
    pub replacement: String,
}

impl SpecialCase {
    /// Create a special case.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Pattern tables used by [`TextNormalizer`].
///
/// Both lists are evaluated in order; the first special case that matches
/// wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerRules {
    /// Whole-line replacements applied before any other cleanup
    pub special_cases: Vec<SpecialCase>,
    /// Patterns matched against the lowercased line; any match vetoes it
    pub ignore_patterns: Vec<String>,
}

impl Default for NormalizerRules {
    fn default() -> Self {
        Self {
            special_cases: vec![SpecialCase::new(r"hope.*see.*there", "HOPE TO SEE YOU THERE!")],
            ignore_patterns: vec![
                // punctuation only
                r"^[\W_]+$".to_string(),
                // page and list numbers
                r"^[0-9]{1,3}$".to_string(),
                r"^(http|www|\.com)".to_string(),
                // form labels
                r"\b(rsvp|date|time|address):?".to_string(),
                r"^\s*$".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledSpecialCase {
    pattern: Regex,
    replacement: String,
}

/// Cleans raw line text and recognizes lines that can never be headings.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    special_cases: Vec<CompiledSpecialCase>,
    ignore_patterns: Vec<Regex>,
    trailing_junk: Regex,
    space_before_punct: Regex,
}

impl TextNormalizer {
    /// Compile a normalizer from pattern tables.
    pub fn new(rules: &NormalizerRules) -> Result<Self> {
        let special_cases = rules
            .special_cases
            .iter()
            .map(|case| {
                let pattern = RegexBuilder::new(&case.pattern)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                    .map_err(|e| {
                        Error::InvalidConfig(format!("special case '{}': {}", case.pattern, e))
                    })?;
                Ok(CompiledSpecialCase {
                    pattern,
                    replacement: case.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let ignore_patterns = rules
            .ignore_patterns
            .iter()
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| Error::InvalidConfig(format!("ignore pattern '{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            special_cases,
            ignore_patterns,
            trailing_junk: Regex::new(r"[\s\-_]+$").unwrap(),
            space_before_punct: Regex::new(r"(\w)\s+([.,;!?])").unwrap(),
        })
    }

    /// Normalize one line of text.
    ///
    /// Trims the line, then either returns a special-case replacement or
    /// strips trailing dashes/underscores, collapses whitespace and pulls
    /// punctuation back onto the preceding word. Cleaning cleaned text is a
    /// no-op as long as every replacement string is itself clean.
    pub fn clean(&self, raw: &str) -> String {
        let text = raw.trim();

        if let Some(case) = self.special_cases.iter().find(|c| c.pattern.is_match(text)) {
            return case.replacement.clone();
        }

        let text = self.trailing_junk.replace(text, "");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        self.space_before_punct
            .replace_all(&text, "${1}${2}")
            .into_owned()
    }

    /// Whether a line is boilerplate that must never become a heading or
    /// title.
    pub fn is_ignored(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.ignore_patterns.iter().any(|re| re.is_match(&lower))
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(&NormalizerRules::default()).expect("built-in normalizer patterns compile")
    }
}
