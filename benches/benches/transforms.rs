//! Benchmarks for the spectral transforms and the block processor
//!
//! Run with: cargo bench --bench transforms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use halftone_core::{Complex64, ComplexMatrix, Direction};
use halftone_transform::{dct8x8, fft1d, fft2d, idct8x8, Block, BlockProcessor, QuantPreset};

fn bench_dct(c: &mut Criterion) {
    let mut group = c.benchmark_group("DCT Transform");

    let mut input: Block = [[0.0; 8]; 8];
    for (x, column) in input.iter_mut().enumerate() {
        for (y, sample) in column.iter_mut().enumerate() {
            *sample = ((x * 8 + y) * 4) as f64;
        }
    }

    group.bench_function("dct8x8", |b| b.iter(|| dct8x8(black_box(&input))));

    let coefficients = dct8x8(&input);
    group.bench_function("idct8x8", |b| b.iter(|| idct8x8(black_box(&coefficients))));

    group.finish();
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT");

    for &len in &[64usize, 1024, 16_384] {
        let signal: Vec<Complex64> = (0..len)
            .map(|i| Complex64::new((i as f64 * 0.1).sin(), 0.0))
            .collect();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("fft1d", len), &signal, |b, signal| {
            b.iter(|| fft1d(black_box(signal), Direction::Forward).unwrap())
        });
    }

    for &size in &[64usize, 256] {
        let matrix = ComplexMatrix::from_real_fn(size, size, |x, y| ((x ^ y) % 256) as f64);
        group.bench_with_input(BenchmarkId::new("fft2d", size), &matrix, |b, matrix| {
            b.iter(|| fft2d(black_box(matrix), Direction::Forward, true).unwrap())
        });
    }

    group.finish();
}

fn bench_block_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("Block Processor");
    let matrix = ComplexMatrix::from_real_fn(512, 512, |x, y| ((x * 3 + y * 5) % 256) as f64);
    group.throughput(Throughput::Elements(512 * 512));

    for parallel in [true, false] {
        let processor = BlockProcessor::new(QuantPreset::Standard).parallel(parallel);
        let name = if parallel { "forward_rayon" } else { "forward_serial" };
        group.bench_function(name, |b| {
            b.iter(|| processor.process(black_box(&matrix), Direction::Forward))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dct, bench_fft, bench_block_processor);
criterion_main!(benches);
