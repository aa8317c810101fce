//! Benchmarks for the Huffman codec
//!
//! Run with: cargo bench --bench entropy_coding

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use halftone_bitstream::{decode_symbols, encode_symbols, FrequencyTable, HuffmanTree};

/// Coefficient-like stream: mostly zeros, a few small values, sparse large DC terms
fn coefficient_stream(len: usize) -> Vec<i32> {
    (0..len)
        .map(|i| match i % 64 {
            0 => 40 + (i / 64 % 20) as i32,
            1..=3 => (i % 5) as i32 - 2,
            4..=9 => (i % 3) as i32 - 1,
            _ => 0,
        })
        .collect()
}

fn bench_tree_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Huffman Tree");

    for &alphabet in &[4i32, 64, 1024] {
        let symbols: Vec<i32> = (0..65_536).map(|i| (i * 7919) % alphabet).collect();
        let frequencies = FrequencyTable::from_symbols(&symbols);

        group.bench_with_input(
            BenchmarkId::new("build", alphabet),
            &frequencies,
            |b, frequencies| b.iter(|| HuffmanTree::build(black_box(frequencies))),
        );

        let tree = HuffmanTree::build(&frequencies);
        group.bench_with_input(BenchmarkId::new("code_table", alphabet), &tree, |b, tree| {
            b.iter(|| black_box(tree).code_table())
        });
    }

    group.finish();
}

fn bench_stream_coding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Huffman Stream");

    for &len in &[4_096usize, 65_536, 262_144] {
        let symbols = coefficient_stream(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("encode", len), &symbols, |b, symbols| {
            b.iter(|| {
                let mut output = Vec::new();
                encode_symbols(black_box(symbols), &mut output, 32).unwrap();
                output
            })
        });

        let mut encoded = Vec::new();
        encode_symbols(&symbols, &mut encoded, 32).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", len), &encoded, |b, encoded| {
            b.iter(|| decode_symbols(black_box(&encoded[..])).unwrap())
        });
    }

    group.finish();
}

fn bench_flush_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("Flush Threshold");
    let symbols = coefficient_stream(65_536);

    for &threshold in &[32usize, 1024, 65_536] {
        group.bench_with_input(
            BenchmarkId::from_parameter(threshold),
            &threshold,
            |b, &threshold| {
                b.iter(|| {
                    let mut output = Vec::new();
                    encode_symbols(black_box(&symbols), &mut output, threshold).unwrap();
                    output
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tree_construction,
    bench_stream_coding,
    bench_flush_threshold
);
criterion_main!(benches);
