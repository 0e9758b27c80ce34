// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the docscan-document crate. Covers the quad crop
// that runs on every applied page, and the preview mapping the crop editor
// calls on every corner drag.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use docscan_core::types::{Point, Quad};
use docscan_document::corners::fallback_quad;
use docscan_document::{ImageProcessor, PreviewMapping};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Quad crop of a 640x480 synthetic photo with a slightly skewed page.
fn bench_crop_to_quad(c: &mut Criterion) {
    let (width, height) = (640u32, 480u32);
    let mut img = RgbImage::from_pixel(width, height, Rgb([40, 40, 40]));
    for y in 60..420 {
        for x in 80..560 {
            img.put_pixel(x, y, Rgb([235, 235, 230]));
        }
    }
    let dynamic = DynamicImage::ImageRgb8(img);
    let quad = Quad::new(
        Point::new(82.0, 58.0),
        Point::new(561.0, 65.0),
        Point::new(556.0, 421.0),
        Point::new(78.0, 417.0),
    );

    c.bench_function("crop_to_quad (640x480)", |b| {
        b.iter(|| {
            let processor = ImageProcessor::from_dynamic(black_box(dynamic.clone()));
            let cropped = processor.crop_to_quad(black_box(&quad));
            black_box(cropped.map(|p| p.into_dynamic()).ok());
        });
    });
}

/// Round trip of a fallback quad through a fitted preview mapping.
fn bench_preview_mapping(c: &mut Criterion) {
    let quad = fallback_quad(3024, 4032, 40.0);
    c.bench_function("preview round trip", |b| {
        b.iter(|| {
            let mapping = PreviewMapping::fit(3024, 4032, black_box(390.0), black_box(600.0));
            black_box(mapping.map(|m| m.to_original(&m.to_preview(&quad))).ok());
        });
    });
}

criterion_group!(benches, bench_crop_to_quad, bench_preview_mapping);
criterion_main!(benches);
