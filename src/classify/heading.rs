//! Rule-table heading classification.
//!
//! A line is tested against an ordered list of heading profiles; the first
//! profile it satisfies decides its level. Lines that satisfy none are tried
//! against a second, looser list of fallback rules. Both lists are plain
//! vectors because evaluation order decides overlaps: with the default
//! tables every bold line of 17.5pt or more is H1 before the H2 profile is
//! ever consulted.

use serde::{Deserialize, Serialize};

use super::normalize::TextNormalizer;
use crate::model::{FontProfile, HeadingLevel};

/// Font weight requirement of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weight {
    /// Line must be bold
    Bold,
    /// Line must not be bold
    Regular,
    /// No requirement
    Any,
}

impl Weight {
    fn accepts(self, is_bold: bool) -> bool {
        match self {
            Weight::Any => true,
            Weight::Bold => is_bold,
            Weight::Regular => !is_bold,
        }
    }
}

/// Letter-case shape of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    /// Every cased character is uppercase
    Upper,
    /// Each word starts uppercase and continues lowercase
    Title,
    /// Anything else; as a requirement, matches every line
    Any,
}

impl TextCase {
    /// Classify the case shape of `text`.
    ///
    /// Upper takes precedence, so a single capital letter is `Upper`.
    pub fn of(text: &str) -> TextCase {
        if is_upper(text) {
            TextCase::Upper
        } else if is_title(text) {
            TextCase::Title
        } else {
            TextCase::Any
        }
    }

    fn accepts(self, actual: TextCase) -> bool {
        self == TextCase::Any || self == actual
    }
}

/// At least one cased character and no lowercase ones.
fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

/// Uppercase letters only after uncased characters, lowercase letters only
/// after cased ones, and at least one cased character.
fn is_title(text: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}

/// Primary classification rule for one heading level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingProfile {
    /// Level assigned on match
    pub level: HeadingLevel,
    /// Inclusive lower size bound
    pub min_size: f32,
    /// Inclusive upper size bound; `None` is unbounded
    pub max_size: Option<f32>,
    /// Weight requirement
    pub weight: Weight,
    /// Case requirement
    pub case: TextCase,
    /// Minimum length in characters
    pub min_length: usize,
}

impl HeadingProfile {
    /// Whether a line satisfies every requirement of this profile.
    pub fn matches(&self, text: &str, case: TextCase, font: &FontProfile) -> bool {
        size_in_range(font.size, self.min_size, self.max_size)
            && self.weight.accepts(font.is_bold)
            && self.case.accepts(case)
            && text.chars().count() >= self.min_length
    }
}

/// Secondary rule consulted only when no profile matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackRule {
    /// Level assigned on match
    pub level: HeadingLevel,
    /// Inclusive lower size bound
    pub min_size: f32,
    /// Inclusive upper size bound; `None` is unbounded
    #[serde(default)]
    pub max_size: Option<f32>,
    /// Line must be bold
    #[serde(default)]
    pub require_bold: bool,
    /// Minimum whitespace-separated word count
    #[serde(default)]
    pub min_words: Option<usize>,
    /// Maximum whitespace-separated word count
    #[serde(default)]
    pub max_words: Option<usize>,
    /// Minimum length in characters
    #[serde(default)]
    pub min_length: Option<usize>,
}

impl FallbackRule {
    /// Whether a line satisfies this rule.
    pub fn matches(&self, text: &str, font: &FontProfile) -> bool {
        if !size_in_range(font.size, self.min_size, self.max_size) {
            return false;
        }
        if self.require_bold && !font.is_bold {
            return false;
        }

        let words = text.split_whitespace().count();
        if self.min_words.is_some_and(|min| words < min)
            || self.max_words.is_some_and(|max| words > max)
        {
            return false;
        }

        self.min_length
            .map_or(true, |min| text.chars().count() >= min)
    }
}

fn size_in_range(size: f32, min: f32, max: Option<f32>) -> bool {
    size >= min && max.map_or(true, |max| size <= max)
}

/// Ordered rule tables for heading classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingRules {
    /// Primary profiles, evaluated in order
    pub profiles: Vec<HeadingProfile>,
    /// Fallback rules, evaluated in order after every profile failed
    pub fallbacks: Vec<FallbackRule>,
}

impl Default for HeadingRules {
    fn default() -> Self {
        Self {
            profiles: vec![
                HeadingProfile {
                    level: HeadingLevel::H1,
                    min_size: 17.5,
                    max_size: None,
                    weight: Weight::Bold,
                    case: TextCase::Any,
                    min_length: 5,
                },
                HeadingProfile {
                    level: HeadingLevel::H2,
                    min_size: 18.0,
                    max_size: Some(23.9),
                    weight: Weight::Bold,
                    case: TextCase::Title,
                    min_length: 4,
                },
                HeadingProfile {
                    level: HeadingLevel::H3,
                    min_size: 14.0,
                    max_size: Some(17.9),
                    weight: Weight::Any,
                    case: TextCase::Any,
                    min_length: 3,
                },
            ],
            fallbacks: vec![
                // short bold subheadings
                FallbackRule {
                    level: HeadingLevel::H2,
                    min_size: 14.0,
                    max_size: Some(16.5),
                    require_bold: true,
                    min_words: Some(2),
                    max_words: Some(5),
                    min_length: None,
                },
                // large regular-weight banners
                FallbackRule {
                    level: HeadingLevel::H1,
                    min_size: 20.0,
                    max_size: None,
                    require_bold: false,
                    min_words: None,
                    max_words: None,
                    min_length: Some(10),
                },
                FallbackRule {
                    level: HeadingLevel::H3,
                    min_size: 13.5,
                    max_size: Some(16.5),
                    require_bold: false,
                    min_words: None,
                    max_words: Some(6),
                    min_length: None,
                },
            ],
        }
    }
}

/// Assigns heading levels to cleaned lines.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    rules: HeadingRules,
    normalizer: TextNormalizer,
}

impl HeadingClassifier {
    /// Create a classifier from rule tables and the normalizer whose ignore
    /// list vetoes lines.
    pub fn new(rules: HeadingRules, normalizer: TextNormalizer) -> Self {
        Self { rules, normalizer }
    }

    /// Classify one cleaned line, or return `None` for body text.
    pub fn classify(&self, text: &str, font: &FontProfile) -> Option<HeadingLevel> {
        if self.normalizer.is_ignored(text) {
            return None;
        }

        let case = TextCase::of(text);
        self.rules
            .profiles
            .iter()
            .find(|p| p.matches(text, case, font))
            .map(|p| p.level)
            .or_else(|| {
                self.rules
                    .fallbacks
                    .iter()
                    .find(|r| r.matches(text, font))
                    .map(|r| r.level)
            })
    }
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self::new(HeadingRules::default(), TextNormalizer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str, size: f32, bold: bool) -> Option<HeadingLevel> {
        HeadingClassifier::default().classify(text, &FontProfile::new(size, bold))
    }

    #[test]
    fn test_text_case() {
        assert_eq!(TextCase::of("INTRODUCTION"), TextCase::Upper);
        assert_eq!(TextCase::of("PART 2: SCOPE"), TextCase::Upper);
        assert_eq!(TextCase::of("Hello World"), TextCase::Title);
        assert_eq!(TextCase::of("Plan 2024 Review"), TextCase::Title);
        assert_eq!(TextCase::of("O'Neil Family"), TextCase::Title);
        assert_eq!(TextCase::of("Hello world"), TextCase::Any);
        assert_eq!(TextCase::of("McDonald Farm"), TextCase::Any);
        assert_eq!(TextCase::of("2024"), TextCase::Any);
        assert_eq!(TextCase::of("A"), TextCase::Upper);
    }

    #[test]
    fn test_upper_bold_h1() {
        assert_eq!(classify("INTRODUCTION", 19.0, true), Some(HeadingLevel::H1));
    }

    #[test]
    fn test_h1_shadows_h2_profile() {
        // Title case, bold, inside H2's 18-23.9 band: H1 is checked first.
        assert_eq!(classify("Project Overview", 19.0, true), Some(HeadingLevel::H1));
        assert_eq!(classify("Goals", 22.0, true), Some(HeadingLevel::H1));
    }

    #[test]
    fn test_h2_profile_reachable_only_below_h1_length() {
        // Four characters: too short for H1 (5), long enough for H2 (4).
        assert_eq!(classify("Plan", 19.0, true), Some(HeadingLevel::H2));
        assert_eq!(classify("PLAN", 19.0, true), None);
    }

    #[test]
    fn test_h3_profile() {
        assert_eq!(classify("Background", 14.0, false), Some(HeadingLevel::H3));
        assert_eq!(classify("Background", 17.9, false), Some(HeadingLevel::H3));
        assert_eq!(classify("Background information", 16.0, true), Some(HeadingLevel::H3));
    }

    #[test]
    fn test_h3_profile_preempts_h2_fallback() {
        // Any two-word line is at least three characters long, so the H3
        // profile claims every line the H2 fallback could.
        assert_eq!(classify("Venue Details", 15.0, true), Some(HeadingLevel::H3));
        assert_eq!(classify("A B", 14.0, true), Some(HeadingLevel::H3));
    }

    #[test]
    fn test_h1_fallback_regular_weight() {
        assert_eq!(
            classify("Quarterly results summary", 24.0, false),
            Some(HeadingLevel::H1)
        );
        assert_eq!(classify("Short one", 24.0, false), None);
    }

    #[test]
    fn test_h3_fallback() {
        // Below the H3 profile's 14pt floor.
        assert_eq!(classify("Venue and parking", 13.6, false), Some(HeadingLevel::H3));
        // Too short for the H3 profile, caught by the fallback.
        assert_eq!(classify("I", 15.0, true), Some(HeadingLevel::H3));
        assert_eq!(
            classify("one two three four five six seven", 13.6, false),
            None
        );
    }

    #[test]
    fn test_body_text() {
        assert_eq!(classify("This is ordinary body text.", 11.0, false), None);
        assert_eq!(classify("Bold body", 12.0, true), None);
    }

    #[test]
    fn test_ignored_lines_never_classify() {
        for text in ["42", "----", "www.example.com", "RSVP: soon", "Time: 6pm"] {
            for size in [12.0, 15.0, 19.0, 30.0] {
                for bold in [false, true] {
                    assert_eq!(classify(text, size, bold), None, "{text} {size} {bold}");
                }
            }
        }
    }

    #[test]
    fn test_numbered_marker_falls_to_size_rules() {
        // A trailing period is not a bare page number; length and size decide.
        assert_eq!(classify("1.", 12.0, false), None);
        assert_eq!(classify("12.", 15.0, false), Some(HeadingLevel::H3));
        assert_eq!(classify("12.", 19.0, true), None);
    }

    #[test]
    fn test_regular_weight_profile() {
        let rules = HeadingRules {
            profiles: vec![HeadingProfile {
                level: HeadingLevel::H2,
                min_size: 12.0,
                max_size: Some(16.0),
                weight: Weight::Regular,
                case: TextCase::Any,
                min_length: 3,
            }],
            fallbacks: Vec::new(),
        };
        let classifier = HeadingClassifier::new(rules, TextNormalizer::default());

        assert_eq!(
            classifier.classify("Opening remarks", &FontProfile::new(14.0, false)),
            Some(HeadingLevel::H2)
        );
        assert_eq!(
            classifier.classify("Opening remarks", &FontProfile::new(14.0, true)),
            None
        );
    }

    #[test]
    fn test_length_counts_characters() {
        // Five characters, ten bytes.
        assert_eq!(classify("ÉTUDE", 18.0, true), Some(HeadingLevel::H1));
    }

    #[test]
    fn test_deterministic() {
        let classifier = HeadingClassifier::default();
        let font = FontProfile::new(15.0, true);
        let first = classifier.classify("Venue Details", &font);
        for _ in 0..10 {
            assert_eq!(classifier.classify("Venue Details", &font), first);
        }
    }

    #[test]
    fn test_custom_fallback_order() {
        let mut rules = HeadingRules::default();
        rules.profiles.clear();
        let classifier = HeadingClassifier::new(rules, TextNormalizer::default());

        // With no profiles, the H2 fallback is reachable for bold 2-5 word lines.
        assert_eq!(
            classifier.classify("Venue Details", &FontProfile::new(15.0, true)),
            Some(HeadingLevel::H2)
        );
        assert_eq!(
            classifier.classify("Venue Details", &FontProfile::new(15.0, false)),
            Some(HeadingLevel::H3)
        );
    }
}
