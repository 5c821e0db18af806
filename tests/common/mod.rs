//! In-memory PDF fixtures for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

/// One line of text, possibly mixing regular and bold runs.
pub struct TextItem {
    parts: Vec<(String, bool)>,
    size: f32,
    x: f32,
    y: f32,
}

/// A single-run line with its baseline at `(x, y)` in PDF user space.
pub fn line(text: &str, size: f32, bold: bool, x: f32, y: f32) -> TextItem {
    TextItem {
        parts: vec![(text.to_string(), bold)],
        size,
        x,
        y,
    }
}

/// A single-run line centered on the page. The base-14 fonts carry no
/// width table, so every glyph is half an em wide.
pub fn centered(text: &str, size: f32, bold: bool, y: f32) -> TextItem {
    let width = text.chars().count() as f32 * size * 0.5;
    line(text, size, bold, (PAGE_WIDTH - width) / 2.0, y)
}

/// A line made of several runs shown back to back.
pub fn runs(parts: &[(&str, bool)], size: f32, x: f32, y: f32) -> TextItem {
    TextItem {
        parts: parts.iter().map(|(t, b)| (t.to_string(), *b)).collect(),
        size,
        x,
        y,
    }
}

fn operations(item: &TextItem) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Td", vec![item.x.into(), item.y.into()]),
    ];
    for (text, bold) in &item.parts {
        let font = if *bold { "F2" } else { "F1" };
        ops.push(Operation::new("Tf", vec![font.into(), item.size.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(text.as_str())]));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// Build a US Letter PDF with one content stream per page.
pub fn build_pdf(pages: Vec<Vec<TextItem>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids = Vec::new();
    for items in &pages {
        let content: Content = Content {
            operations: items.iter().flat_map(operations).collect(),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// A two-page event flyer.
pub fn flyer_pdf() -> Vec<u8> {
    build_pdf(vec![
        vec![
            centered("Welcome Party", 28.0, true, 700.0),
            line("RSVP: by June 1", 12.0, false, 72.0, 640.0),
            line("Agenda", 14.0, false, 72.0, 600.0),
            line("Doors open at seven and dinner follows.", 11.0, false, 72.0, 580.0),
        ],
        vec![
            line("INTRODUCTION", 19.0, true, 72.0, 720.0),
            line("Venue Details", 15.0, true, 72.0, 680.0),
            line("Parking is available behind the hall.", 11.0, false, 72.0, 660.0),
            line("2", 10.0, false, 300.0, 40.0),
        ],
    ])
}

/// The same document with every stream Flate-compressed.
pub fn compressed(data: &[u8]) -> Vec<u8> {
    let mut doc = Document::load_mem(data).unwrap();
    doc.compress();
    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}
