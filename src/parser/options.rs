//! Parsing options.

/// Options for reading page layouts out of a PDF.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Whether unreadable pages should be skipped instead of failing.
    pub fn is_lenient(&self) -> bool {
        self.error_mode == ErrorMode::Lenient
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on the first unreadable page
    #[default]
    Strict,
    /// Log and skip unreadable pages
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new().lenient();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.is_lenient());

        let options = options.with_error_mode(ErrorMode::Strict);
        assert!(!options.is_lenient());
    }

    #[test]
    fn test_default_options() {
        assert_eq!(ParseOptions::default().error_mode, ErrorMode::Strict);
    }
}
