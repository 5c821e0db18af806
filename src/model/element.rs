//! Enriched line elements fed to the classifiers.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// Typographic summary of one line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontProfile {
    /// Largest span size in the line
    pub size: f32,
    /// Whether any span uses a bold font
    pub is_bold: bool,
    /// Color of the first span (0xRRGGBB)
    pub color: u32,
}

impl FontProfile {
    /// Create a profile with the default (black) color.
    pub fn new(size: f32, is_bold: bool) -> Self {
        Self {
            size,
            is_bold,
            color: 0,
        }
    }
}

/// A cleaned source line with its font profile and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Normalized text
    pub text: String,
    /// Font profile
    pub font: FontProfile,
    /// Page index (0-based)
    pub page: u32,
    /// Line extent
    pub bbox: BoundingBox,
    /// Width of the page the line sits on
    pub page_width: f32,
    /// Height of the page the line sits on
    pub page_height: f32,
    /// Whether the line reads as horizontally centered
    pub is_centered: bool,
}
