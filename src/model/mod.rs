//! Data model for outline extraction.
//!
//! Layout records describe what the PDF backend sees on a page; elements are
//! the cleaned, enriched lines the classifiers work on; the outline types are
//! what gets serialized.

mod element;
mod layout;
mod outline;

pub use element::{FontProfile, TextLine};
pub use layout::{BoundingBox, LayoutBlock, LayoutLine, LineRecord, PageLayout, Span};
pub use outline::{DocumentStructure, HeadingLevel, OutlineEntry};
