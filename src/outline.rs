//! Outline assembly.

use crate::classify::{font, CenteringRules, HeadingClassifier, TextNormalizer, TitleDetector};
use crate::config::OutlineConfig;
use crate::error::Result;
use crate::model::{DocumentStructure, LineRecord, OutlineEntry, TextLine};

/// Turns a document's line records into a title and heading outline.
///
/// Built once from an [`OutlineConfig`] and reused across documents; it
/// holds no per-document state.
#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    normalizer: TextNormalizer,
    centering: CenteringRules,
    headings: HeadingClassifier,
    title: TitleDetector,
}

impl OutlineBuilder {
    /// Create a builder with the built-in rule tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a configuration, compiling its patterns.
    pub fn with_config(config: &OutlineConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = TextNormalizer::new(&config.normalizer)?;
        Ok(Self {
            centering: config.geometry,
            headings: HeadingClassifier::new(config.headings.clone(), normalizer.clone()),
            title: TitleDetector::new(config.title, normalizer.clone()),
            normalizer,
        })
    }

    /// The heading classifier in use.
    pub fn heading_classifier(&self) -> &HeadingClassifier {
        &self.headings
    }

    /// Clean and enrich line records, dropping lines with no spans or no
    /// text left after cleanup. Order is preserved.
    pub fn elements<'a, I>(&self, lines: I) -> Vec<TextLine>
    where
        I: IntoIterator<Item = &'a LineRecord>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.element(line))
            .collect()
    }

    fn element(&self, line: &LineRecord) -> Option<TextLine> {
        let font = font::extract(&line.spans)?;
        let text = self.normalizer.clean(&line.raw_text());
        if text.is_empty() {
            return None;
        }

        let is_centered = self.centering.is_centered(&line.bbox, line.page_width);
        log::debug!(
            "TEXT: {} | SIZE: {:.2} | BOLD: {} | PAGE: {}",
            text,
            font.size,
            font.is_bold,
            line.page
        );

        Some(TextLine {
            text,
            font,
            page: line.page,
            bbox: line.bbox,
            page_width: line.page_width,
            page_height: line.page_height,
            is_centered,
        })
    }

    /// Build the outline for one document's lines, given in document order.
    pub fn build<'a, I>(&self, lines: I) -> DocumentStructure
    where
        I: IntoIterator<Item = &'a LineRecord>,
    {
        let elements = self.elements(lines);
        self.build_from_elements(&elements)
    }

    /// Build the outline from already-enriched elements.
    pub fn build_from_elements(&self, elements: &[TextLine]) -> DocumentStructure {
        let title = self.title.detect(elements);
        let outline = elements
            .iter()
            .filter_map(|e| {
                self.headings
                    .classify(&e.text, &e.font)
                    .map(|level| OutlineEntry::new(level, e.text.clone(), e.page))
            })
            .collect();

        DocumentStructure { title, outline }
    }
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        let normalizer = TextNormalizer::default();
        let config = OutlineConfig::default();
        Self {
            centering: config.geometry,
            headings: HeadingClassifier::new(config.headings, normalizer.clone()),
            title: TitleDetector::new(config.title, normalizer.clone()),
            normalizer,
        }
    }
}
