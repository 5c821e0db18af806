//! Directory-to-directory outline extraction.
//!
//! Every PDF in the input directory becomes a `<stem>.json` file in the
//! output directory. A file that cannot be read is reported in its
//! [`FileOutcome`] and the batch moves on.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutlineConfig;
use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::extract_with_backend;
use crate::model::DocumentStructure;
use crate::outline::OutlineBuilder;
use crate::parser::{LopdfBackend, ParseOptions};
use crate::render::{to_json, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Classifier rule tables
    pub config: OutlineConfig,
    /// Page error handling
    pub parse_options: ParseOptions,
    /// Output JSON layout
    pub format: JsonFormat,
}

impl BatchOptions {
    /// Create default batch options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom classifier configuration.
    pub fn with_config(mut self, config: OutlineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Skip unreadable pages instead of failing their document.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set the output JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileResult {
    /// The outline was written
    Written {
        /// Path of the JSON file
        output: PathBuf,
        /// Detected title, possibly empty
        title: String,
        /// Number of outline entries
        headings: usize,
    },
    /// The file could not be processed
    Failed {
        /// Error message
        reason: String,
    },
}

/// Result for one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    /// The input PDF
    pub input: PathBuf,
    /// Success or failure
    pub result: FileResult,
}

impl FileOutcome {
    /// Whether the outline was written.
    pub fn is_success(&self) -> bool {
        matches!(self.result, FileResult::Written { .. })
    }
}

/// Outcomes of a batch run, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Number of files written.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Whether no input files were found.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// PDF files directly inside `dir`, sorted by file name.
pub fn list_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Output path for an input PDF: `<output_dir>/<stem>.json`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".json");
    output_dir.join(name)
}

/// Process one PDF into its JSON file.
pub fn process_file(
    input: &Path,
    output_dir: &Path,
    builder: &OutlineBuilder,
    options: &BatchOptions,
) -> FileOutcome {
    let result = match write_outline(input, output_dir, builder, options) {
        Ok((output, doc)) => {
            log::info!("Processed {} -> {}", input.display(), output.display());
            FileResult::Written {
                output,
                title: doc.title,
                headings: doc.outline.len(),
            }
        }
        Err(e) => {
            log::warn!("Failed to process {}: {}", input.display(), e);
            FileResult::Failed {
                reason: e.to_string(),
            }
        }
    };

    FileOutcome {
        input: input.to_path_buf(),
        result,
    }
}

fn write_outline(
    input: &Path,
    output_dir: &Path,
    builder: &OutlineBuilder,
    options: &BatchOptions,
) -> Result<(PathBuf, DocumentStructure)> {
    let backend = LopdfBackend::load_file(input)?;
    let doc = extract_with_backend(&backend, builder, &options.parse_options)?;
    // Rendered in full before the file is touched, so a failure leaves no
    // partial output behind.
    let json = to_json(&doc, options.format)?;
    let output = output_path(input, output_dir);
    fs::write(&output, json)?;
    Ok((output, doc))
}

/// Process every PDF in `input_dir`, writing outlines to `output_dir`.
///
/// Fails only if the input directory cannot be listed, the output directory
/// cannot be created, or the configuration does not compile.
pub fn process_directory<P, Q>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    process_directory_with(input_dir, output_dir, options, |_| {})
}

/// Like [`process_directory`], calling `on_file` after each file.
pub fn process_directory_with<P, Q, F>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
    mut on_file: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(&FileOutcome),
{
    let output_dir = output_dir.as_ref();
    let builder = OutlineBuilder::with_config(&options.config)?;
    let inputs = list_pdfs(input_dir)?;
    fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    for input in inputs {
        let outcome = process_file(&input, output_dir, &builder, options);
        on_file(&outcome);
        report.outcomes.push(outcome);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path() {
        let out = output_path(Path::new("/in/Report.Final.PDF"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/Report.Final.json"));
    }

    #[test]
    fn test_list_pdfs_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt", "c.pdf.bak"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.pdf")).unwrap();

        let names: Vec<_> = list_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_missing_input_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let result = process_directory(&missing, dir.path().join("out"), &BatchOptions::new());
        assert!(matches!(result, Err(Error::NotADirectory(_))));
    }

    #[test]
    fn test_bad_file_does_not_abort() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("broken.pdf"), b"definitely not a pdf").unwrap();
        fs::write(input.join("empty.pdf"), b"").unwrap();

        let mut seen = 0;
        let report =
            process_directory_with(&input, &output, &BatchOptions::new(), |_| seen += 1).unwrap();

        assert_eq!(seen, 2);
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.failed(), 2);
        assert!(output.is_dir());
        assert!(!output.join("broken.json").exists());
    }
}
