//! Benchmarks for length-adaptive validation.
//!
//! Compares the dispatcher with the scalar and vectorized paths directly,
//! for both checks, at sizes from 10 bytes to 4 MiB. The crossover between
//! the `scalar` and `vectorized` lines is what the cutoff tables encode.
//!
//! ## Content Types
//!
//! - **ASCII**: Pure 7-bit ASCII content
//! - **Mostly ASCII**: ASCII with one multi-byte character per line
//! - **Japanese**: Predominantly 3-byte sequences
//!
//! Run a subset with e.g. `cargo bench --bench validate_bench -- utf8_japanese`.

use adaptive_utf8::{validate, Check};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SIZES: [usize; 10] = [
    10,
    32,
    64,
    100,
    256,
    1024,
    4 * 1024,
    64 * 1024,
    1024 * 1024,
    4 * 1024 * 1024,
];

/// Repeat `pattern` to exactly `size` bytes, padding with ASCII so no
/// multi-byte sequence is split.
fn fill(pattern: &str, pad: u8, size: usize) -> Vec<u8> {
    let bytes = pattern.as_bytes();
    let mut result = Vec::with_capacity(size);
    while result.len() + bytes.len() <= size {
        result.extend_from_slice(bytes);
    }
    result.resize(size, pad);
    result
}

fn generate_ascii(size: usize) -> Vec<u8> {
    fill(
        "The quick brown fox jumps over the lazy dog. 0123456789!@#$%^&*()\n",
        b'.',
        size,
    )
}

fn generate_mostly_ascii(size: usize) -> Vec<u8> {
    fill("Hello, world! naïve café résumé, plain text here.\n", b'A', size)
}

fn generate_japanese(size: usize) -> Vec<u8> {
    fill("日本語のテキストです。ひらがなとカタカナと漢字。", b'X', size)
}

fn bench_check(c: &mut Criterion, check: Check, content: &str, generate: fn(usize) -> Vec<u8>) {
    let mut group = c.benchmark_group(format!("{}_{}", check, content));
    let (scalar, vectorized) = (check.scalar(), check.vectorized());

    for size in SIZES {
        let data = generate(size);
        let size_name = format_size(size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("dispatch", &size_name), &data, |b, data| {
            b.iter(|| validate(check, black_box(data)));
        });
        group.bench_with_input(BenchmarkId::new("scalar", &size_name), &data, |b, data| {
            b.iter(|| scalar(black_box(data)));
        });
        group.bench_with_input(
            BenchmarkId::new("vectorized", &size_name),
            &data,
            |b, data| {
                b.iter(|| vectorized(black_box(data)));
            },
        );
    }

    group.finish();
}

fn bench_ascii(c: &mut Criterion) {
    bench_check(c, Check::Ascii, "ascii", generate_ascii);
    bench_check(c, Check::Ascii, "mostly_ascii", generate_mostly_ascii);
}

fn bench_utf8(c: &mut Criterion) {
    bench_check(c, Check::Utf8, "ascii", generate_ascii);
    bench_check(c, Check::Utf8, "mostly_ascii", generate_mostly_ascii);
    bench_check(c, Check::Utf8, "japanese", generate_japanese);
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{}mb", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{}kb", bytes / 1024)
    } else {
        format!("{}b", bytes)
    }
}

criterion_group!(benches, bench_ascii, bench_utf8);
criterion_main!(benches);
