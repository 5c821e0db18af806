//! Document title selection.

use serde::{Deserialize, Serialize};

use super::normalize::TextNormalizer;
use crate::model::TextLine;

/// Thresholds for title selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleRules {
    /// Candidates must start above this fraction of the page height
    pub top_fraction: f32,
    /// Shorter winners are discarded, leaving the title empty
    pub min_length: usize,
}

impl Default for TitleRules {
    fn default() -> Self {
        Self {
            top_fraction: 0.3,
            min_length: 5,
        }
    }
}

/// Picks the title from the first page.
#[derive(Debug, Clone)]
pub struct TitleDetector {
    rules: TitleRules,
    normalizer: TextNormalizer,
}

impl TitleDetector {
    /// Create a detector.
    pub fn new(rules: TitleRules, normalizer: TextNormalizer) -> Self {
        Self { rules, normalizer }
    }

    /// The largest centered line near the top of page 0.
    ///
    /// Ties on font size go to the earliest line. Returns an empty string
    /// when no line qualifies or the winner is too short.
    pub fn detect(&self, elements: &[TextLine]) -> String {
        let mut best: Option<&TextLine> = None;
        for element in elements.iter().filter(|e| self.is_candidate(e)) {
            if best.map_or(true, |b| element.font.size > b.font.size) {
                best = Some(element);
            }
        }

        match best {
            Some(line) if line.text.chars().count() >= self.rules.min_length => line.text.clone(),
            _ => String::new(),
        }
    }

    fn is_candidate(&self, element: &TextLine) -> bool {
        element.page == 0
            && element.is_centered
            && element.bbox.y0 < element.page_height * self.rules.top_fraction
            && !self.normalizer.is_ignored(&element.text)
    }
}

impl Default for TitleDetector {
    fn default() -> Self {
        Self::new(TitleRules::default(), TextNormalizer::default())
    }
}
