//! PDF reading: content interpretation and page layout.

mod backend;
pub mod content;
mod layout;
mod options;

pub use backend::{LopdfBackend, PdfBackend};
pub use layout::{LayoutAnalyzer, PageBox};
pub use options::{ErrorMode, ParseOptions};

use crate::error::Result;
use crate::model::PageLayout;

/// Lay out every page of a document in order.
///
/// In strict mode the first unreadable page fails the whole document; in
/// lenient mode it is logged and skipped.
pub fn read_layouts<B: PdfBackend + ?Sized>(
    backend: &B,
    options: &ParseOptions,
) -> Result<Vec<PageLayout>> {
    let count = backend.page_count();
    let mut layouts = Vec::with_capacity(count as usize);

    for index in 0..count {
        match backend.page_layout(index) {
            Ok(layout) => layouts.push(layout),
            Err(e) => {
                if !options.is_lenient() {
                    return Err(e);
                }
                log::warn!("Skipping page {}: {}", index, e);
            }
        }
    }

    Ok(layouts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct FlakyBackend;

    impl PdfBackend for FlakyBackend {
        fn page_count(&self) -> u32 {
            3
        }

        fn page_layout(&self, index: u32) -> Result<PageLayout> {
            if index == 1 {
                Err(Error::PdfParse("bad stream".to_string()))
            } else {
                Ok(PageLayout::new(index, 612.0, 792.0))
            }
        }
    }

    #[test]
    fn test_strict_fails_document() {
        let result = read_layouts(&FlakyBackend, &ParseOptions::default());
        assert!(matches!(result, Err(Error::PdfParse(_))));
    }

    #[test]
    fn test_lenient_skips_page() {
        let layouts = read_layouts(&FlakyBackend, &ParseOptions::new().lenient()).unwrap();
        let indices: Vec<_> = layouts.iter().map(|l| l.index).collect();
        assert_eq!(indices, [0, 2]);
    }
}
