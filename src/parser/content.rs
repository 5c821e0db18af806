//! Content stream interpretation.
//!
//! Walks the decoded operators of one page and records where text is shown
//! and where external objects are painted. Everything stays in PDF user
//! space (origin bottom-left); conversion to page coordinates happens in
//! [`super::layout`].

use std::collections::HashMap;

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value, if this operand is a number.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Create an operation.
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    fn number(&self, index: usize) -> Option<f32> {
        self.operands.get(index).and_then(PdfValue::as_f32)
    }

    fn numbers(&self) -> Vec<f32> {
        self.operands.iter().filter_map(PdfValue::as_f32).collect()
    }
}

/// Glyph advance widths of one font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Base font name (e.g., "Helvetica-Bold")
    pub base_font: String,
    /// Character code of the first entry in `widths`
    pub first_char: u32,
    /// Advance widths in thousandths of an em
    pub widths: Vec<f32>,
    /// Width used for codes outside `widths`
    pub missing_width: f32,
    /// Composite fonts use two-byte codes
    pub two_byte: bool,
}

impl FontMetrics {
    /// Half-em widths for every code.
    pub fn fallback(base_font: impl Into<String>) -> Self {
        Self {
            base_font: base_font.into(),
            first_char: 0,
            widths: Vec::new(),
            missing_width: 500.0,
            two_byte: false,
        }
    }

    fn codes<'a>(&self, bytes: &'a [u8]) -> impl Iterator<Item = u32> + 'a {
        let step = if self.two_byte { 2 } else { 1 };
        bytes.chunks(step).map(|c| {
            c.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
        })
    }

    fn width(&self, code: u32) -> f32 {
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(self.missing_width)
    }
}

/// Font lookup for the resources of one page.
pub trait FontResolver {
    /// Metrics for a font resource name, if the page defines it.
    fn metrics(&self, resource: &[u8]) -> Option<&FontMetrics>;

    /// Decode shown bytes to text using the font's encoding.
    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String;
}

/// Plain font table keyed by resource name. Text is decoded without
/// encoding information.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    fonts: HashMap<Vec<u8>, FontMetrics>,
}

impl FontTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: impl Into<Vec<u8>>, metrics: FontMetrics) {
        self.fonts.insert(resource.into(), metrics);
    }
}

impl FontResolver for FontTable {
    fn metrics(&self, resource: &[u8]) -> Option<&FontMetrics> {
        self.fonts.get(resource)
    }

    fn decode(&self, _resource: &[u8], bytes: &[u8]) -> String {
        decode_text_simple(bytes)
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32, // X translation
    pub f: f32, // Y translation
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn from_operands(op: &ContentOp) -> Option<Self> {
        let n = op.numbers();
        (n.len() >= 6).then(|| Matrix::new(n[0], n[1], n[2], n[3], n[4], n[5]))
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Matrix::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self` applied first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Map a point through the transform.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Length of the transformed unit y vector.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text shown by one operator, in user space.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    pub text: String,
    /// Baseline origin
    pub x: f32,
    pub y: f32,
    /// Horizontal advance of the whole string
    pub width: f32,
    /// Effective font size after both matrices
    pub size: f32,
    pub font: String,
    /// Fill color as 0xRRGGBB
    pub color: u32,
}

/// User-space rectangle painted by an external object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Everything recorded from one page's content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMarks {
    pub spans: Vec<RawSpan>,
    pub graphics: Vec<RawRect>,
}

/// TJ adjustments larger than this (in thousandths of an em) read as a
/// word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    fill: u32,
    font_resource: Vec<u8>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            fill: 0x000000,
            font_resource: Vec::new(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Interprets content operators against a page's fonts.
pub struct Interpreter<'a, F: FontResolver> {
    fonts: &'a F,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text: bool,
    marks: PageMarks,
}

impl<'a, F: FontResolver> Interpreter<'a, F> {
    pub fn new(fonts: &'a F) -> Self {
        Self {
            fonts,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text: false,
            marks: PageMarks::default(),
        }
    }

    /// Run every operation and return what was painted.
    pub fn run(mut self, ops: &[ContentOp]) -> PageMarks {
        for op in ops {
            self.step(op);
        }
        self.marks
    }

    fn step(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(op) {
                    self.state.ctm = m.then(&self.state.ctm);
                }
            }
            "g" => {
                if let Some(gray) = op.number(0) {
                    self.state.fill = rgb(gray, gray, gray);
                }
            }
            "rg" | "k" | "sc" | "scn" => self.set_fill(&op.numbers()),
            "BT" => {
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.state.font_resource = name.clone();
                }
                if let Some(size) = op.number(1) {
                    self.state.font_size = size;
                }
            }
            "Tc" => self.state.char_spacing = op.number(0).unwrap_or(0.0),
            "Tw" => self.state.word_spacing = op.number(0).unwrap_or(0.0),
            "Tz" => self.state.horizontal_scale = op.number(0).unwrap_or(100.0) / 100.0,
            "TL" => self.state.leading = op.number(0).unwrap_or(0.0),
            "Ts" => self.state.rise = op.number(0).unwrap_or(0.0),
            "Td" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    self.state.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(op) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (op.number(0), op.number(1)) {
                    self.state.word_spacing = aw;
                    self.state.char_spacing = ac;
                }
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "Do" => self.paint_object(),
            _ => {}
        }
    }

    fn set_fill(&mut self, components: &[f32]) {
        self.state.fill = match components {
            [gray] => rgb(*gray, *gray, *gray),
            [r, g, b] => rgb(*r, *g, *b),
            [c, m, y, k] => rgb(
                (1.0 - c) * (1.0 - k),
                (1.0 - m) * (1.0 - k),
                (1.0 - y) * (1.0 - k),
            ),
            _ => return,
        };
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        // Without TL, fall back to the font size as leading
        let leading = if self.state.leading != 0.0 {
            self.state.leading
        } else {
            self.state.font_size
        };
        self.move_line(0.0, -leading);
    }

    fn paint_object(&mut self) {
        let ctm = self.state.ctm;
        let corners = [
            ctm.apply(0.0, 0.0),
            ctm.apply(1.0, 0.0),
            ctm.apply(0.0, 1.0),
            ctm.apply(1.0, 1.0),
        ];
        let (mut x0, mut y0) = corners[0];
        let (mut x1, mut y1) = corners[0];
        for (x, y) in &corners[1..] {
            x0 = x0.min(*x);
            y0 = y0.min(*y);
            x1 = x1.max(*x);
            y1 = y1.max(*y);
        }
        self.marks.graphics.push(RawRect { x0, y0, x1, y1 });
    }

    /// Show strings with TJ-style adjustments and advance the text matrix.
    fn show(&mut self, items: &[PdfValue]) {
        if !self.in_text {
            return;
        }

        let fonts = self.fonts;
        let fallback;
        let metrics = match fonts.metrics(&self.state.font_resource) {
            Some(m) => m,
            None => {
                fallback =
                    FontMetrics::fallback(String::from_utf8_lossy(&self.state.font_resource));
                &fallback
            }
        };

        let font_size = self.state.font_size;
        let scale = self.state.horizontal_scale;
        let rise = Matrix::translation(0.0, self.state.rise);
        let start = rise.then(&self.text_matrix).then(&self.state.ctm);

        let mut text = String::new();
        let mut advance = 0.0f32;
        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    text.push_str(&fonts.decode(&self.state.font_resource, bytes));
                    for code in metrics.codes(bytes) {
                        let mut w = metrics.width(code) / 1000.0 * font_size
                            + self.state.char_spacing;
                        if !metrics.two_byte && code == 32 {
                            w += self.state.word_spacing;
                        }
                        advance += w * scale;
                    }
                }
                other => {
                    if let Some(adjustment) = other.as_f32() {
                        advance -= adjustment / 1000.0 * font_size * scale;
                        if -adjustment > TJ_SPACE_THRESHOLD
                            && !text.is_empty()
                            && !text.ends_with(char::is_whitespace)
                        {
                            text.push(' ');
                        }
                    }
                }
            }
        }

        self.text_matrix = Matrix::translation(advance, 0.0).then(&self.text_matrix);

        if text.trim().is_empty() {
            return;
        }

        let (x, y) = start.apply(0.0, 0.0);
        let (end_x, _) = rise.then(&self.text_matrix).then(&self.state.ctm).apply(0.0, 0.0);
        self.marks.spans.push(RawSpan {
            text,
            x: x.min(end_x),
            y,
            width: (end_x - x).abs(),
            size: font_size * start.vertical_scale(),
            font: metrics.base_font.clone(),
            color: self.state.fill,
        });
    }
}

fn rgb(r: f32, g: f32, b: f32) -> u32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

/// Interpret a page's operators against its fonts.
pub fn interpret<F: FontResolver>(ops: &[ContentOp], fonts: &F) -> PageMarks {
    Interpreter::new(fonts).run(ops)
}
