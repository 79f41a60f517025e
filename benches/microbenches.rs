//! Criterion microbenches for imgfind's pure hot paths.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure:
//! - reference/directive parsing (ImageReference::parse)
//! - scaled size computation (scaled_size)
//! - document parsing and writing (from_document_str, to_document_string)

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use imgfind::document::io_xml::{from_document_str, to_document_string};
use imgfind::resolve::ImageReference;
use imgfind::scale::scaled_size;

const REFERENCES: &[&str] = &[
    "photo",
    "photo:w200",
    "photo:h150",
    "photo:640x480",
    "photo:bogus",
    "a-rather-long-basename.with.dots:1920x1080",
];

fn document_fixture() -> String {
    let mut xml = String::from("<html xmlns=\"http://www.w3.org/1999/xhtml\"><body>");
    for i in 0..200 {
        xml.push_str(&format!(
            "<p>Paragraph {i} &amp; friends <img src=\"image{i}:w{}\" alt=\"#{i}\"/></p>",
            100 + i
        ));
    }
    xml.push_str("</body></html>");
    xml
}

/// Benchmark reference parsing.
fn bench_reference_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_parse");
    group.throughput(Throughput::Elements(REFERENCES.len() as u64));

    group.bench_function("ImageReference::parse", |b| {
        b.iter(|| {
            for raw in REFERENCES {
                black_box(ImageReference::parse(black_box(raw)));
            }
        })
    });

    group.finish();
}

/// Benchmark the dimension policy.
fn bench_scaled_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaled_size");

    group.bench_function("scaled_size", |b| {
        b.iter(|| {
            black_box(scaled_size(
                black_box(4032),
                black_box(3024),
                black_box(800),
                black_box(600),
            ))
        })
    });

    group.finish();
}

/// Benchmark document parsing and writing.
fn bench_document(c: &mut Criterion) {
    let xml = document_fixture();
    let root = from_document_str(&xml).expect("Failed to parse document fixture");

    let mut group = c.benchmark_group("document");
    group.throughput(Throughput::Bytes(xml.len() as u64));

    group.bench_function("from_document_str", |b| {
        b.iter(|| {
            let root = from_document_str(black_box(&xml)).unwrap();
            black_box(root)
        })
    });

    group.bench_function("to_document_string", |b| {
        b.iter(|| {
            let out = to_document_string(black_box(&root));
            black_box(out)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_reference_parse,
    bench_scaled_size,
    bench_document,
);
criterion_main!(benches);
