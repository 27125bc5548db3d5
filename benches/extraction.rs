//! Extraction Benchmarks
//!
//! Capture normalization and text rules on the request path.
//!
//! Run with: `cargo bench --bench extraction`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgb, RgbImage};
use std::time::Duration;

use fair_capture::capture::{
    capture_with, DisplayGeometry, RenderEngine, Rotation, SelectionRegion, SourceDocument,
    DEFAULT_JPEG_QUALITY,
};
use fair_capture::extraction::{cleanup_spoken, parse_operations_section, parse_part_header};

/// Scan-sized page with some structure so JPEG encoding has work to do
fn create_scan(width: u32, height: u32) -> DynamicImage {
    let image = RgbImage::from_fn(width, height, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgb([250, 250, 250])
        } else {
            Rgb([20, 20, 20])
        }
    });
    DynamicImage::ImageRgb8(image)
}

/// IPS text with `rows` operations and drawing refs
fn create_ips_text(rows: usize) -> String {
    let mut text = String::from("INSPECTION PLANNING SHEET\nPart No: FW1182-3\nOperations\n");
    for i in 0..rows {
        text.push_str(&format!("{}\n", (i + 1) * 10));
    }
    text.push_str("Feature number Class Dimension\nDrawing Ref\n");
    for i in 0..rows {
        text.push_str(&format!("Z{}-{} ", i / 4 + 1, (b'A' + (i % 4) as u8) as char));
    }
    text
}

fn bench_capture(c: &mut Criterion) {
    let engine = RenderEngine::new();
    engine.initialize();

    let mut group = c.benchmark_group("capture");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(30);

    let source = SourceDocument::raster(create_scan(2480, 3508), DisplayGeometry::new(620.0, 877.0));
    let region = SelectionRegion::new(100.0, 120.0, 300.0, 80.0);

    for rotation in [Rotation::Deg0, Rotation::Deg90] {
        group.bench_with_input(
            BenchmarkId::new("a4_300dpi", rotation.degrees()),
            &rotation,
            |b, rotation| {
                b.iter(|| {
                    let request = capture_with(
                        &engine,
                        black_box(&source),
                        black_box(&region),
                        *rotation,
                        DEFAULT_JPEG_QUALITY,
                    )
                    .unwrap();
                    black_box(request)
                })
            },
        );
    }

    group.finish();
}

fn bench_text_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_rules");

    group.bench_function("cleanup_spoken", |b| {
        b.iter(|| {
            black_box(cleanup_spoken(black_box(
                "part number hash one two hyphen three slash rev B dot two",
            )))
        })
    });

    for rows in [10, 200] {
        let text = create_ips_text(rows);
        group.bench_with_input(BenchmarkId::new("parse_operations", rows), &text, |b, text| {
            b.iter(|| black_box(parse_operations_section(black_box(text)).into_rows()))
        });
    }

    let drawing = create_ips_text(50);
    group.bench_function("parse_part_header", |b| {
        b.iter(|| black_box(parse_part_header(black_box(&drawing))))
    });

    group.finish();
}

criterion_group!(benches, bench_capture, bench_text_rules);
criterion_main!(benches);
