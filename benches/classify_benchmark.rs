//! Benchmarks for outline extraction.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdfoutline::{
    BoundingBox, FontProfile, HeadingClassifier, LineRecord, OutlineBuilder, Span, TextNormalizer,
};

/// Synthetic lines: a heading every tenth line, body text otherwise.
fn create_lines(count: usize) -> Vec<LineRecord> {
    (0..count)
        .map(|i| {
            let (text, size, font) = if i % 10 == 0 {
                (format!("Section {}", i / 10 + 1), 19.0, "Helvetica-Bold")
            } else {
                (
                    format!("Body text line {} with a few ordinary words in it.", i),
                    11.0,
                    "Helvetica",
                )
            };
            let y0 = 40.0 + (i % 40) as f32 * 18.0;
            let bbox = BoundingBox::new(72.0, y0, 480.0, y0 + size);
            LineRecord {
                page: (i / 40) as u32,
                page_width: 612.0,
                page_height: 792.0,
                bbox,
                spans: vec![Span::new(text, size, font).with_bbox(bbox)],
            }
        })
        .collect()
}

/// A small PDF with one heading and a page of body text per page.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for page in 0..page_count {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 20.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new(
                "Tj",
                vec![Object::string_literal(format!("Chapter {}", page + 1))],
            ),
            Operation::new("Tf", vec!["F1".into(), 11.into()]),
            Operation::new("TL", vec![14.into()]),
        ];
        for line in 0..40 {
            operations.push(Operation::new("T*", vec![]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(format!("Benchmark body line {}", line))],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content: Content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Benchmark text cleanup.
fn bench_normalize(c: &mut Criterion) {
    let normalizer = TextNormalizer::default();

    c.bench_function("clean_line", |b| {
        b.iter(|| normalizer.clean(black_box("  Project   overview ,  goals and scope ---  ")));
    });

    c.bench_function("is_ignored", |b| {
        b.iter(|| normalizer.is_ignored(black_box("Venue address: 12 Main Street")));
    });
}

/// Benchmark heading classification of single lines.
fn bench_classify(c: &mut Criterion) {
    let classifier = HeadingClassifier::default();
    let heading = FontProfile::new(19.0, true);
    let body = FontProfile::new(11.0, false);

    c.bench_function("classify_heading", |b| {
        b.iter(|| classifier.classify(black_box("INTRODUCTION"), black_box(&heading)));
    });

    c.bench_function("classify_body", |b| {
        b.iter(|| classifier.classify(black_box("Ordinary body text."), black_box(&body)));
    });
}

/// Benchmark outline building at various document sizes.
fn bench_build(c: &mut Criterion) {
    let builder = OutlineBuilder::new();
    let mut group = c.benchmark_group("outline_build");

    for count in [100, 1_000, 10_000].iter() {
        let lines = create_lines(*count);
        group.bench_function(format!("{}_lines", count), |b| {
            b.iter(|| builder.build(black_box(&lines)));
        });
    }

    group.finish();
}

/// Benchmark end-to-end extraction from PDF bytes.
fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_bytes");

    for page_count in [1, 5, 10].iter() {
        let data = create_test_pdf(*page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| pdfoutline::extract_bytes(black_box(&data)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_classify, bench_build, bench_extract);
criterion_main!(benches);
