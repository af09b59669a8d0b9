use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use pixelift::{
    composite_over_color, enhance, parse_hex_color, ColorRgb, EnhanceSettings, RasterImage,
};

fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    })
}

fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
            if x < width / 2 { 0 } else { 255 },
        ])
    })
}

fn bench_enhance_pipeline(c: &mut Criterion) {
    let settings = EnhanceSettings::default();
    let mut group = c.benchmark_group("enhance");

    for size in [64u32, 256, 512] {
        let rgb = RasterImage::Rgb(gradient_rgb(size, size));
        group.bench_with_input(BenchmarkId::new("rgb", size), &rgb, |b, image| {
            b.iter(|| enhance(black_box(image), black_box(&settings)));
        });

        let rgba = RasterImage::from_dynamic(&image::DynamicImage::ImageRgba8(gradient_rgba(
            size, size,
        )));
        group.bench_with_input(BenchmarkId::new("rgba", size), &rgba, |b, image| {
            b.iter(|| enhance(black_box(image), black_box(&settings)));
        });
    }

    group.finish();
}

fn bench_composite(c: &mut Criterion) {
    let cutout = RasterImage::from_dynamic(&image::DynamicImage::ImageRgba8(gradient_rgba(
        512, 512,
    )));
    let background = ColorRgb::WHITE;

    c.bench_function("composite_512", |b| {
        b.iter(|| composite_over_color(black_box(&cutout), black_box(background)).unwrap());
    });
}

fn bench_hex_parsing(c: &mut Criterion) {
    c.bench_function("parse_hex_color", |b| {
        b.iter(|| parse_hex_color(black_box("#a3b5c7")).unwrap());
    });
}

criterion_group!(
    benches,
    bench_enhance_pipeline,
    bench_composite,
    bench_hex_parsing
);
criterion_main!(benches);
