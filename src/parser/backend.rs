//! PDF backend abstraction layer.
//!
//! The outline builder only needs laid-out pages. [`PdfBackend`] is the seam
//! between it and the concrete PDF library (lopdf), so tests and other
//! layout engines can stand in for it.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use super::content::{self, decode_text_simple, ContentOp, FontMetrics, FontResolver, PdfValue};
use super::layout::{LayoutAnalyzer, PageBox};
use crate::detect;
use crate::error::{Error, Result};
use crate::model::PageLayout;

/// Page-level access to a loaded document.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Lay out the page at a 0-based index.
    fn page_layout(&self, index: u32) -> Result<PageLayout>;
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
///
/// The document is owned by the backend and released when it is dropped.
pub struct LopdfBackend {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
    version: String,
    analyzer: LayoutAnalyzer,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let version = detect::sniff_file_version(path)?;
        let doc = LopdfDocument::load(path)?;
        log::debug!("Loaded {} (PDF {})", path.display(), version);
        Self::from_document(doc, version)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let version = detect::sniff_version(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc, version)
    }

    /// Load from a reader.
    pub fn load_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    fn from_document(doc: LopdfDocument, version: String) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = doc.get_pages().into_values().collect();
        Ok(Self {
            doc,
            pages,
            version,
            analyzer: LayoutAnalyzer::default(),
        })
    }

    /// PDF version from the file header.
    pub fn version(&self) -> &str {
        &self.version
    }

    fn page_id(&self, index: u32) -> Result<ObjectId> {
        self.pages
            .get(index as usize)
            .copied()
            .ok_or(Error::PageOutOfRange(index, self.page_count()))
    }

    /// Visible page area: the CropBox clipped to the MediaBox, either of
    /// which may be inherited from an ancestor page-tree node.
    fn page_box(&self, page_id: ObjectId) -> PageBox {
        let mut media = None;
        let mut crop = None;
        let mut current = Some(page_id);
        let mut depth = 0;
        while let Some(id) = current {
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };
            if media.is_none() {
                media = dict.get(b"MediaBox").ok().and_then(|obj| self.rect(obj));
            }
            if crop.is_none() {
                crop = dict.get(b"CropBox").ok().and_then(|obj| self.rect(obj));
            }
            if media.is_some() && crop.is_some() {
                break;
            }

            depth += 1;
            if depth > 32 {
                break;
            }
            current = dict.get(b"Parent").ok().and_then(|p| p.as_reference().ok());
        }

        let media = media.unwrap_or(PageBox::LETTER);
        crop.and_then(|c| c.intersect(&media)).unwrap_or(media)
    }

    fn rect(&self, obj: &Object) -> Option<PageBox> {
        let Object::Array(values) = self.resolve(obj) else {
            return None;
        };
        let n: Vec<f32> = values
            .iter()
            .filter_map(|v| get_number(self.resolve(v)))
            .collect();
        match n[..] {
            [a, b, c, d] => PageBox::from_corners(a, b, c, d),
            _ => None,
        }
    }

    /// Raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        // A page without contents is blank
        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match self.resolve(contents) {
            Object::Stream(s) => stream_data(s),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Stream(s) = self.resolve(obj) {
                        content.extend_from_slice(&stream_data(s)?);
                        content.push(b' ');
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn page_fonts(&self, page_id: ObjectId) -> Result<PageFonts<'_>> {
        let dicts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::TextExtract(e.to_string()))?;

        let metrics = dicts
            .iter()
            .map(|(name, dict)| (name.clone(), self.font_metrics(dict)))
            .collect();

        Ok(PageFonts {
            doc: &self.doc,
            dicts,
            metrics,
        })
    }

    fn font_metrics(&self, font: &Dictionary) -> FontMetrics {
        let base_font = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let composite = font
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Type0");
        if composite {
            return self.composite_metrics(font, base_font);
        }

        let mut metrics = FontMetrics::fallback(base_font);
        metrics.first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| get_number(self.resolve(o)))
            .map_or(0, |n| n.max(0.0) as u32);
        if let Ok(widths) = font.get(b"Widths") {
            if let Object::Array(arr) = self.resolve(widths) {
                metrics.widths = arr
                    .iter()
                    .map(|w| get_number(self.resolve(w)).unwrap_or(0.0))
                    .collect();
            }
        }
        metrics
    }

    /// Two-byte codes at the descendant font's default width.
    fn composite_metrics(&self, font: &Dictionary, base_font: String) -> FontMetrics {
        let default_width = font
            .get(b"DescendantFonts")
            .ok()
            .map(|o| self.resolve(o))
            .and_then(|o| match o {
                Object::Array(arr) => arr.first(),
                _ => None,
            })
            .and_then(|o| match self.resolve(o) {
                Object::Dictionary(d) => d.get(b"DW").ok(),
                _ => None,
            })
            .and_then(|o| get_number(self.resolve(o)))
            .unwrap_or(1000.0);

        FontMetrics {
            base_font,
            first_char: 0,
            widths: Vec::new(),
            missing_width: default_width,
            two_byte: true,
        }
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_layout(&self, index: u32) -> Result<PageLayout> {
        let page_id = self.page_id(index)?;
        let page = self.page_box(page_id);
        let fonts = self.page_fonts(page_id)?;

        let data = self.page_content(page_id)?;
        let ops = decode_content(&data)?;
        let marks = content::interpret(&ops, &fonts);

        Ok(self.analyzer.analyze(index, &page, marks))
    }
}

/// Fonts of one page, decoding through lopdf's encodings.
struct PageFonts<'a> {
    doc: &'a LopdfDocument,
    dicts: BTreeMap<Vec<u8>, &'a Dictionary>,
    metrics: HashMap<Vec<u8>, FontMetrics>,
}

impl FontResolver for PageFonts<'_> {
    fn metrics(&self, resource: &[u8]) -> Option<&FontMetrics> {
        self.metrics.get(resource)
    }

    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String {
        self.dicts
            .get(resource)
            .and_then(|font| font.get_font_encoding(self.doc).ok())
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }
}

/// Parse raw content stream bytes into a sequence of operations.
fn decode_content(data: &[u8]) -> Result<Vec<ContentOp>> {
    let content =
        lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

    Ok(content
        .operations
        .into_iter()
        .map(|op| ContentOp {
            operator: op.operator,
            operands: op.operands.iter().map(convert_object).collect(),
        })
        .collect())
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Stream bytes with filters applied. Unfiltered streams are used as-is.
fn stream_data(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| Error::PdfParse(e.to_string()))
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
