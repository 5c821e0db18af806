//! PDF input recognition: header sniffing and file-name filtering.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Some writers put a few bytes of junk before the header; readers accept
/// the header anywhere in the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Find the `%PDF-x.y` header and return the version string.
///
/// # Example
/// ```
/// use pdfoutline::detect::sniff_version;
///
/// assert_eq!(sniff_version(b"%PDF-1.7\n").unwrap(), "1.7");
/// assert!(sniff_version(b"<html>").is_err());
/// ```
pub fn sniff_version(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version = data
        .get(start + PDF_MAGIC.len()..start + PDF_MAGIC.len() + 3)
        .ok_or(Error::UnknownFormat)?;
    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(String::from_utf8_lossy(version).into_owned())
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        )),
    }
}

/// Read the beginning of a file and sniff its PDF version.
pub fn sniff_file_version<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    File::open(path)?
        .take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)?;
    sniff_version(&head)
}

/// Whether a path names a PDF by extension (`.pdf`, any case).
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
