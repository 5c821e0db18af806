//! Layout analysis: spans to lines, lines to blocks.

use std::cmp::Ordering;

use super::content::{PageMarks, RawRect, RawSpan};
use crate::model::{BoundingBox, LayoutBlock, LayoutLine, PageLayout, Span};

/// Fraction of the font size above the baseline covered by a span box.
const ASCENT: f32 = 0.8;
/// Fraction of the font size below the baseline covered by a span box.
const DESCENT: f32 = 0.2;

/// The visible page area in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PageBox {
    /// US Letter, used when a page has no usable MediaBox.
    pub const LETTER: PageBox = PageBox {
        x0: 0.0,
        y0: 0.0,
        x1: 612.0,
        y1: 792.0,
    };

    /// Build from the four MediaBox numbers, in any corner order.
    pub fn from_corners(a: f32, b: f32, c: f32, d: f32) -> Option<Self> {
        let page = PageBox {
            x0: a.min(c),
            y0: b.min(d),
            x1: a.max(c),
            y1: b.max(d),
        };
        (page.width() > 0.0 && page.height() > 0.0).then_some(page)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Overlap of two boxes, `None` when they do not overlap.
    pub fn intersect(&self, other: &PageBox) -> Option<PageBox> {
        let page = PageBox {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        (page.width() > 0.0 && page.height() > 0.0).then_some(page)
    }

    /// User-space rectangle to top-left page coordinates.
    fn to_page(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> BoundingBox {
        BoundingBox::new(x0 - self.x0, self.y1 - y1, x1 - self.x0, self.y1 - y0)
    }
}

/// A span placed on the page, with its baseline kept for grouping.
#[derive(Debug, Clone)]
struct PlacedSpan {
    span: Span,
    baseline: f32,
}

impl PlacedSpan {
    fn new(raw: RawSpan, page: &PageBox) -> Self {
        let bbox = page.to_page(
            raw.x,
            raw.y - raw.size * DESCENT,
            raw.x + raw.width,
            raw.y + raw.size * ASCENT,
        );
        Self {
            baseline: page.y1 - raw.y,
            span: Span::new(raw.text, raw.size, raw.font)
                .with_color(raw.color)
                .with_bbox(bbox),
        }
    }
}

/// A grouped line with the values block splitting needs.
#[derive(Debug, Clone)]
struct Line {
    layout: LayoutLine,
    baseline: f32,
    font_size: f32,
}

impl Line {
    fn from_spans(mut spans: Vec<PlacedSpan>) -> Self {
        spans.sort_by(|a, b| {
            a.span
                .bbox
                .x0
                .partial_cmp(&b.span.bbox.x0)
                .unwrap_or(Ordering::Equal)
        });

        let baseline = spans[0].baseline;

        // Dominant font size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.span.text.chars().count()).sum();
        let weighted: f32 = spans
            .iter()
            .map(|s| s.span.size * s.span.text.chars().count() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted / total_chars as f32
        } else {
            spans[0].span.size
        };

        let mut out: Vec<Span> = Vec::with_capacity(spans.len());
        for placed in spans {
            let mut span = placed.span;
            if let Some(prev) = out.last() {
                if needs_space(prev, &span) {
                    span.text.insert(0, ' ');
                }
            }
            out.push(span);
        }

        Self {
            layout: LayoutLine::from_spans(out),
            baseline,
            font_size,
        }
    }

    fn x(&self) -> f32 {
        self.layout.bbox.x0
    }
}

/// Whether two horizontally adjacent spans need a separating space.
///
/// A gap wider than 20% of the average character width separates words,
/// except between characters of scripts written without spaces.
fn needs_space(prev: &Span, curr: &Span) -> bool {
    if prev.text.ends_with(char::is_whitespace) || curr.text.starts_with(char::is_whitespace) {
        return false;
    }

    let gap = curr.bbox.x0 - prev.bbox.x1;
    let char_count = curr.text.chars().count();
    let avg_char_width = if char_count > 0 && curr.bbox.width() > 0.0 {
        curr.bbox.width() / char_count as f32
    } else {
        curr.size * 0.5
    };
    if gap <= avg_char_width * 0.2 {
        return false;
    }

    let prev_spaceless = prev.text.chars().last().is_some_and(is_spaceless_script_char);
    let curr_spaceless = curr.text.chars().next().is_some_and(is_spaceless_script_char);
    !(prev_spaceless && curr_spaceless)
}

/// Check if a character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana
    || (0x3040..=0x309F).contains(&code)
    // Katakana
    || (0x30A0..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Groups one page's marks into a [`PageLayout`].
#[derive(Debug, Clone)]
pub struct LayoutAnalyzer {
    /// Baseline tolerance as a fraction of font size
    pub line_tolerance: f32,
    /// Spacing above this multiple of the average starts a new block
    pub paragraph_spacing: f32,
    /// Font size change that starts a new block
    pub size_change: f32,
    /// Left edge shift that starts a new block
    pub indent_change: f32,
}

impl Default for LayoutAnalyzer {
    fn default() -> Self {
        Self {
            line_tolerance: 0.3,
            paragraph_spacing: 1.5,
            size_change: 1.0,
            indent_change: 20.0,
        }
    }
}

impl LayoutAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out one page.
    pub fn analyze(&self, index: u32, page: &PageBox, marks: PageMarks) -> PageLayout {
        let mut layout = PageLayout::new(index, page.width(), page.height());

        let spans = marks
            .spans
            .into_iter()
            .map(|raw| PlacedSpan::new(raw, page))
            .collect();
        let lines = self.group_spans_into_lines(spans);
        layout.blocks = self.group_lines_into_blocks(lines);

        for rect in marks.graphics {
            self.insert_graphic(&mut layout.blocks, page, rect);
        }

        log::debug!(
            "Page {}: {} blocks, {:.0}x{:.0}",
            index,
            layout.blocks.len(),
            layout.width,
            layout.height
        );
        layout
    }

    /// Baseline grouping, top to bottom, then left to right within a line.
    fn group_spans_into_lines(&self, mut spans: Vec<PlacedSpan>) -> Vec<Line> {
        spans.sort_by(|a, b| {
            a.baseline
                .partial_cmp(&b.baseline)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    a.span
                        .bbox
                        .x0
                        .partial_cmp(&b.span.bbox.x0)
                        .unwrap_or(Ordering::Equal)
                })
        });

        let mut lines = Vec::new();
        let mut current: Vec<PlacedSpan> = Vec::new();
        let mut current_baseline: Option<f32> = None;

        for span in spans {
            let tolerance = span.span.size * self.line_tolerance;
            match current_baseline {
                Some(y) if (span.baseline - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        lines.push(Line::from_spans(std::mem::take(&mut current)));
                    }
                    current_baseline = Some(span.baseline);
                    current.push(span);
                }
            }
        }

        if !current.is_empty() {
            lines.push(Line::from_spans(current));
        }

        lines
    }

    /// Group lines into blocks based on spacing, size and indentation.
    fn group_lines_into_blocks(&self, lines: Vec<Line>) -> Vec<LayoutBlock> {
        let avg_spacing = average_line_spacing(&lines);

        let mut blocks = Vec::new();
        let mut current: Vec<Line> = Vec::new();

        for line in lines {
            if let Some(prev) = current.last() {
                if self.should_break_block(prev, &line, avg_spacing) {
                    blocks.push(text_block(std::mem::take(&mut current)));
                }
            }
            current.push(line);
        }

        if !current.is_empty() {
            blocks.push(text_block(current));
        }

        blocks
    }

    fn should_break_block(&self, prev: &Line, curr: &Line, avg_spacing: f32) -> bool {
        (curr.baseline - prev.baseline).abs() > avg_spacing * self.paragraph_spacing
            || (prev.font_size - curr.font_size).abs() > self.size_change
            || (prev.x() - curr.x()).abs() > self.indent_change
    }

    /// Place a graphic before the first block that starts below it.
    fn insert_graphic(&self, blocks: &mut Vec<LayoutBlock>, page: &PageBox, rect: RawRect) {
        let bbox = page.to_page(rect.x0, rect.y0, rect.x1, rect.y1);
        let at = blocks
            .iter()
            .position(|b| b.bbox().y0 > bbox.y0)
            .unwrap_or(blocks.len());
        blocks.insert(at, LayoutBlock::Graphic { bbox });
    }
}

fn text_block(lines: Vec<Line>) -> LayoutBlock {
    LayoutBlock::text(lines.into_iter().map(|l| l.layout).collect())
}

/// Average baseline distance between consecutive lines.
fn average_line_spacing(lines: &[Line]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[1].baseline - w[0].baseline).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}
