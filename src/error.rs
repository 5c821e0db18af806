//! Error types for the pdfoutline library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting an outline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version string we cannot read.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure or a page content stream.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error decoding text on a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error serializing an outline.
    #[error("Rendering error: {0}")]
    Render(String),

    /// A classifier configuration could not be loaded or compiled.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A batch input path is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::Render(err.to_string())
        }
    }
}
