//! Criterion benchmarks for the HDMI address codec.
//!
//! Run with:
//! ```bash
//! cargo bench --package cec-core --bench address_bench
//! ```

use cec_core::{Address, PhysicalAddress};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("address_parse");
    for input in ["1.0.0.0", "15.15.15.15", "tv", "tv.3", "av.12", "1.2.3.4.5"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, text| {
            b.iter(|| black_box(text).parse::<Address>())
        });
    }
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let addr = Address::Physical(PhysicalAddress::from_raw(0x3100));
    c.bench_function("address_format_physical", |b| {
        b.iter(|| black_box(addr).to_string())
    });
}

criterion_group!(benches, bench_parse, bench_format);
criterion_main!(benches);
