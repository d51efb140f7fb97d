// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the in-memory pixel operations of bildwerk-image.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use bildwerk_core::{BlurKind, ResampleFilter};
use bildwerk_image::ImageProcessor;

/// 640x480 gradient, large enough for the filters to dominate setup cost.
fn gradient() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(640, 480, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

fn bench_resize(c: &mut Criterion) {
    let source = gradient();
    let mut group = c.benchmark_group("resize 640x480 -> 320x240");
    for (name, filter) in [
        ("nearest", ResampleFilter::Nearest),
        ("triangle", ResampleFilter::Triangle),
        ("lanczos3", ResampleFilter::Lanczos3),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let processor = ImageProcessor::from_dynamic(black_box(source.clone()));
                black_box(processor.resize_exact(320, 240, filter))
            });
        });
    }
    group.finish();
}

fn bench_blur(c: &mut Criterion) {
    let source = gradient();
    let mut group = c.benchmark_group("blur 640x480 radius 5");
    for (name, kind) in [("box", BlurKind::Box), ("gaussian", BlurKind::Gaussian)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let processor = ImageProcessor::from_dynamic(black_box(source.clone()));
                black_box(processor.blur(kind, 5).into_dynamic())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resize, bench_blur);
criterion_main!(benches);
