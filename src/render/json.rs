//! JSON rendering for document outlines.
//!
//! ```json
//! {
//!   "title": "Welcome Party",
//!   "outline": [
//!     { "level": "H1", "text": "Welcome Party", "page": 0 }
//!   ]
//! }
//! ```

use std::io::Write;

use crate::error::{Error, Result};
use crate::model::DocumentStructure;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON, two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON. Non-ASCII text is written as-is.
pub fn to_json(doc: &DocumentStructure, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write an outline as JSON to a writer.
pub fn write_json<W: Write>(doc: &DocumentStructure, format: JsonFormat, mut writer: W) -> Result<()> {
    match format {
        JsonFormat::Pretty => serde_json::to_writer_pretty(&mut writer, doc)?,
        JsonFormat::Compact => serde_json::to_writer(&mut writer, doc)?,
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};

    fn sample() -> DocumentStructure {
        DocumentStructure {
            title: "Café Night".to_string(),
            outline: vec![OutlineEntry::new(HeadingLevel::H2, "Menu", 1)],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        let expected = r#"{
  "title": "Café Night",
  "outline": [
    {
      "level": "H2",
      "text": "Menu",
      "page": 1
    }
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Café Night","outline":[{"level":"H2","text":"Menu","page":1}]}"#
        );
    }

    #[test]
    fn test_empty_outline() {
        let json = to_json(&DocumentStructure::new(), JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"title":"","outline":[]}"#);
    }

    #[test]
    fn test_write_json_matches_to_json() {
        let mut out = Vec::new();
        write_json(&sample(), JsonFormat::Pretty, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            to_json(&sample(), JsonFormat::Pretty).unwrap()
        );
    }
}
