//! Page layout records produced by the PDF backend.
//!
//! These mirror what a layout engine hands to the outline builder: pages
//! containing blocks, text blocks containing lines, lines containing spans.
//! Coordinates use a top-left origin with y growing downward.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle `(x0, y0, x1, y1)` in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Smallest box containing every box in the iterator.
    pub fn enclosing<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Option<BoundingBox> {
        boxes.into_iter().fold(None, |acc, b| match acc {
            Some(a) => Some(a.union(b)),
            None => Some(*b),
        })
    }
}

/// A run of text within a line sharing one font, size and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font: String,
    /// Fill color as 0xRRGGBB
    pub color: u32,
    /// Span extent on the page
    pub bbox: BoundingBox,
}

impl Span {
    /// Create a span with no geometry.
    pub fn new(text: impl Into<String>, size: f32, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size,
            font: font.into(),
            color: 0,
            bbox: BoundingBox::default(),
        }
    }

    /// Set the fill color.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }
}

/// One visual text line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLine {
    /// Line extent on the page
    pub bbox: BoundingBox,
    /// Spans in reading order
    pub spans: Vec<Span>,
}

impl LayoutLine {
    /// Build a line whose box encloses its spans.
    pub fn from_spans(spans: Vec<Span>) -> Self {
        let bbox = BoundingBox::enclosing(spans.iter().map(|s| &s.bbox)).unwrap_or_default();
        Self { bbox, spans }
    }

    /// Concatenated span text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A block on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutBlock {
    /// A group of text lines
    Text {
        /// Block extent
        bbox: BoundingBox,
        /// Lines in reading order
        lines: Vec<LayoutLine>,
    },
    /// Non-text content (images, form XObjects)
    Graphic {
        /// Block extent
        bbox: BoundingBox,
    },
}

impl LayoutBlock {
    /// Build a text block whose box encloses its lines.
    pub fn text(lines: Vec<LayoutLine>) -> Self {
        let bbox = BoundingBox::enclosing(lines.iter().map(|l| &l.bbox)).unwrap_or_default();
        LayoutBlock::Text { bbox, lines }
    }

    /// Block extent.
    pub fn bbox(&self) -> &BoundingBox {
        match self {
            LayoutBlock::Text { bbox, .. } | LayoutBlock::Graphic { bbox } => bbox,
        }
    }

    /// Text lines, or `None` for non-text blocks.
    pub fn lines(&self) -> Option<&[LayoutLine]> {
        match self {
            LayoutBlock::Text { lines, .. } => Some(lines),
            LayoutBlock::Graphic { .. } => None,
        }
    }
}

/// A single page of laid-out content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page index (0-based)
    pub index: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Blocks in document order
    pub blocks: Vec<LayoutBlock>,
}

impl PageLayout {
    /// Create an empty page.
    pub fn new(index: u32, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Flatten text blocks into line records, in block then line order.
    /// Non-text blocks contribute nothing.
    pub fn line_records(&self) -> impl Iterator<Item = LineRecord> + '_ {
        self.blocks
            .iter()
            .filter_map(LayoutBlock::lines)
            .flatten()
            .map(move |line| LineRecord {
                page: self.index,
                page_width: self.width,
                page_height: self.height,
                bbox: line.bbox,
                spans: line.spans.clone(),
            })
    }
}

/// One source line as consumed by the outline builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Page index (0-based)
    pub page: u32,
    /// Width of the page the line sits on
    pub page_width: f32,
    /// Height of the page the line sits on
    pub page_height: f32,
    /// Line extent
    pub bbox: BoundingBox,
    /// Spans composing the line
    pub spans: Vec<Span>,
}

impl LineRecord {
    /// Concatenated span text, without any cleanup.
    pub fn raw_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}
