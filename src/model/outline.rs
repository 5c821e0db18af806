//! Outline output types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading level assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
}

impl HeadingLevel {
    /// Numeric depth (1-3).
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Label used in the JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single heading in the outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Cleaned heading text
    pub text: String,
    /// Page index (0-based)
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Title and headings extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Document title, empty when none was found
    pub title: String,
    /// Headings in document order
    pub outline: Vec<OutlineEntry>,
}

impl DocumentStructure {
    /// Create an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a title was detected.
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    /// Number of headings at a given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|e| e.level == level).count()
    }
}
