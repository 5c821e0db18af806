//! Per-line font profile extraction.

use crate::model::{FontProfile, Span};

/// Collapse the spans of one line into a single font profile.
///
/// The largest span size wins so that superscripts and footnote markers do
/// not drag a heading's size down. The line is bold if any span's font name
/// contains "bold". Color comes from the first span. Returns `None` for a
/// line without spans.
pub fn extract(spans: &[Span]) -> Option<FontProfile> {
    let first = spans.first()?;
    let size = spans.iter().map(|s| s.size).fold(first.size, f32::max);
    let is_bold = spans.iter().any(|s| is_bold_font(&s.font));

    Some(FontProfile {
        size,
        is_bold,
        color: first.color,
    })
}

/// Whether a font name denotes a bold face.
pub fn is_bold_font(font: &str) -> bool {
    font.to_lowercase().contains("bold")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_max_size() {
        let spans = vec![
            Span::new("Heading", 18.0, "Arial"),
            Span::new("1", 9.0, "Arial"),
        ];
        let profile = extract(&spans).unwrap();
        assert_eq!(profile.size, 18.0);
        assert!(!profile.is_bold);
    }

    #[test]
    fn test_extract_any_bold() {
        let spans = vec![
            Span::new("Plain ", 12.0, "Times-Roman"),
            Span::new("strong", 12.0, "ABCDEF+Times-BOLD"),
        ];
        assert!(extract(&spans).unwrap().is_bold);
    }

    #[test]
    fn test_extract_first_color() {
        let spans = vec![
            Span::new("Red", 12.0, "Arial").with_color(0xFF0000),
            Span::new("Blue", 12.0, "Arial").with_color(0x0000FF),
        ];
        assert_eq!(extract(&spans).unwrap().color, 0xFF0000);
    }

    #[test]
    fn test_extract_empty() {
        assert!(extract(&[]).is_none());
    }

    #[test]
    fn test_bold_font_names() {
        assert!(is_bold_font("Helvetica-Bold"));
        assert!(is_bold_font("SemiBoldItalic"));
        assert!(!is_bold_font("Helvetica-Black"));
        assert!(!is_bold_font("Courier"));
    }
}
