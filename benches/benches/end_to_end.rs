//! End-to-end compression/decompression benchmarks
//!
//! Run with: cargo bench --bench end_to_end

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use halftone_core::*;
use halftone_decoder::HalftoneDecoder;
use halftone_encoder::{EncoderOptions, HalftoneEncoder};
use halftone_transform::QuantPreset;

fn create_test_image(width: u32, height: u32) -> PixelGrid {
    let mut image = PixelGrid::new(Dimensions::new(width, height)).unwrap();

    // Gradient pattern
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255) / width) as u8;
            let g = ((y * 255) / height) as u8;
            image.set_pixel(x, y, Rgb::new(r, g, 128));
        }
    }

    image
}

fn bench_compress_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compress by Image Size");

    for &size in &[64u32, 128, 256, 512] {
        let image = create_test_image(size, size);

        group.throughput(Throughput::Elements(u64::from(size * size)));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                let encoder = HalftoneEncoder::default();
                b.iter(|| encoder.compress(black_box(&image)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_decompress_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decompress by Image Size");

    for &size in &[64u32, 128, 256, 512] {
        let image = create_test_image(size, size);
        let artifact = HalftoneEncoder::default().compress(&image).unwrap();

        group.throughput(Throughput::Elements(u64::from(size * size)));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                let decoder = HalftoneDecoder::default();
                b.iter(|| decoder.decode_bytes(black_box(&artifact)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_compress_by_preset(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compress by Preset");
    let image = create_test_image(256, 256);

    for preset in [QuantPreset::Standard, QuantPreset::Custom] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", preset)),
            &preset,
            |b, &preset| {
                let encoder = HalftoneEncoder::new(EncoderOptions::default().quant_preset(preset));
                b.iter(|| encoder.compress(black_box(&image)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_parallel_vs_serial(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parallel Tiles");
    let image = create_test_image(512, 512);

    for parallel in [true, false] {
        group.bench_with_input(
            BenchmarkId::from_parameter(if parallel { "rayon" } else { "serial" }),
            &parallel,
            |b, &parallel| {
                let encoder = HalftoneEncoder::new(EncoderOptions::default().parallel(parallel));
                b.iter(|| encoder.compress(black_box(&image)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compress_by_size,
    bench_decompress_by_size,
    bench_compress_by_preset,
    bench_parallel_vs_serial
);
criterion_main!(benches);
