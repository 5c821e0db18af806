//! # pdfoutline
//!
//! Title and heading outline extraction for PDF documents.
//!
//! Pages are laid out into lines, each line is cleaned and measured, and a
//! set of ordered rule tables decides which lines are the document title and
//! which are H1, H2 or H3 headings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_file, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let outline = extract_file("flyer.pdf")?;
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Batch processing
//!
//! ```no_run
//! use pdfoutline::{process_directory, BatchOptions};
//!
//! let report = process_directory("app/input", "app/output", &BatchOptions::new())?;
//! println!("{} written, {} failed", report.succeeded(), report.failed());
//! # Ok::<(), pdfoutline::Error>(())
//! ```

pub mod batch;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{process_directory, BatchOptions, BatchReport, FileOutcome, FileResult};
pub use classify::{HeadingClassifier, TextNormalizer, TitleDetector};
pub use config::OutlineConfig;
pub use error::{Error, Result};
pub use model::{
    BoundingBox, DocumentStructure, FontProfile, HeadingLevel, LineRecord, OutlineEntry,
    PageLayout, Span, TextLine,
};
pub use outline::OutlineBuilder;
pub use parser::{ErrorMode, LopdfBackend, ParseOptions, PdfBackend};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Extract the outline of a PDF file with the default rules.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_file;
///
/// let outline = extract_file("document.pdf").unwrap();
/// println!("Title: {}", outline.title);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<DocumentStructure> {
    PdfOutline::new().extract(path)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_bytes(data: &[u8]) -> Result<DocumentStructure> {
    PdfOutline::new().extract_bytes(data)
}

/// Extract the outline of a PDF read from a reader.
pub fn extract_reader<R: Read>(reader: R) -> Result<DocumentStructure> {
    let backend = LopdfBackend::load_reader(reader)?;
    extract_with_backend(&backend, &OutlineBuilder::default(), &ParseOptions::default())
}

/// Convert a PDF file's outline to JSON.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{to_json, JsonFormat};
///
/// let json = to_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("document.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let outline = extract_file(path)?;
    render::to_json(&outline, format)
}

/// Read every page's lines from a backend, in document order.
pub fn read_lines<B: PdfBackend + ?Sized>(
    backend: &B,
    options: &ParseOptions,
) -> Result<Vec<LineRecord>> {
    let layouts = parser::read_layouts(backend, options)?;
    Ok(layouts.iter().flat_map(|page| page.line_records()).collect())
}

/// Extract an outline from any [`PdfBackend`].
pub fn extract_with_backend<B: PdfBackend + ?Sized>(
    backend: &B,
    builder: &OutlineBuilder,
    options: &ParseOptions,
) -> Result<DocumentStructure> {
    let lines = read_lines(backend, options)?;
    Ok(builder.build(&lines))
}

/// Builder for extracting outlines with custom rules or parse options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{OutlineConfig, PdfOutline};
///
/// let config = OutlineConfig::from_json_file("rules.json")?;
/// let outline = PdfOutline::new()
///     .with_config(config)
///     .lenient()
///     .extract("document.pdf")?;
/// # Ok::<(), pdfoutline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfOutline {
    parse_options: ParseOptions,
    config: OutlineConfig,
}

impl PdfOutline {
    /// Create a new builder with the default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Use a custom classifier configuration.
    pub fn with_config(mut self, config: OutlineConfig) -> Self {
        self.config = config;
        self
    }

    /// Extract the outline of a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<DocumentStructure> {
        let backend = LopdfBackend::load_file(path)?;
        self.extract_from(&backend)
    }

    /// Extract the outline of a PDF held in memory.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<DocumentStructure> {
        let backend = LopdfBackend::load_bytes(data)?;
        self.extract_from(&backend)
    }

    /// Extract the outline from any backend.
    pub fn extract_from<B: PdfBackend + ?Sized>(&self, backend: &B) -> Result<DocumentStructure> {
        let builder = OutlineBuilder::with_config(&self.config)?;
        extract_with_backend(backend, &builder, &self.parse_options)
    }

    /// The cleaned, measured lines of a PDF file, before classification.
    pub fn elements<P: AsRef<Path>>(&self, path: P) -> Result<Vec<TextLine>> {
        let backend = LopdfBackend::load_file(path)?;
        let builder = OutlineBuilder::with_config(&self.config)?;
        let lines = read_lines(&backend, &self.parse_options)?;
        Ok(builder.elements(&lines))
    }
}
