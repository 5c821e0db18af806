//! Horizontal centering heuristic.

use serde::{Deserialize, Serialize};

use crate::model::BoundingBox;

/// Thresholds for the centering heuristic, as fractions of page width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenteringRules {
    /// Both side margins must exceed this fraction of the page width
    pub margin_ratio: f32,
    /// Lines at least this wide count as centered regardless of margins
    pub wide_ratio: f32,
}

impl Default for CenteringRules {
    fn default() -> Self {
        Self {
            margin_ratio: 0.15,
            wide_ratio: 0.6,
        }
    }
}

impl CenteringRules {
    /// Whether a line reads as visually centered on its page.
    ///
    /// This is a prominence proxy rather than true symmetry: a line clear of
    /// both margins passes, and so does any line spanning most of the page.
    pub fn is_centered(&self, bbox: &BoundingBox, page_width: f32) -> bool {
        let margin = page_width * self.margin_ratio;
        let clear_of_margins = bbox.x0 > margin && bbox.x1 < page_width - margin;
        clear_of_margins || bbox.width() >= page_width * self.wide_ratio
    }
}

/// [`CenteringRules::is_centered`] with the default thresholds.
pub fn is_centered(bbox: &BoundingBox, page_width: f32) -> bool {
    CenteringRules::default().is_centered(bbox, page_width)
}
