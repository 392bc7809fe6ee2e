//! Criterion benchmarks for the CEC button → input key table.
//!
//! The lookup sits on the consumer thread's hot path for every remote button
//! event, so it should stay a plain index.
//!
//! Run with:
//! ```bash
//! cargo bench --package cec-core --bench keymap_bench
//! ```

use cec_core::keymap::KeyMap;
use cec_core::protocol::UserControlCode;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Buttons a typical session presses most often, plus an unmapped one.
const BENCH_CODES: &[UserControlCode] = &[
    UserControlCode::SELECT,
    UserControlCode::UP,
    UserControlCode::DOWN,
    UserControlCode::LEFT_UP,
    UserControlCode::VOLUME_UP,
    UserControlCode::PLAY,
    UserControlCode::F2_RED,
    UserControlCode::UNKNOWN,
];

fn bench_lookup(c: &mut Criterion) {
    let map = KeyMap::standard();
    c.bench_function("keymap_lookup_common_buttons", |b| {
        b.iter(|| {
            for code in BENCH_CODES {
                black_box(map.keys(black_box(*code)));
            }
        })
    });
}

fn bench_full_range(c: &mut Criterion) {
    let map = KeyMap::standard();
    c.bench_function("keymap_lookup_all_256_codes", |b| {
        b.iter(|| {
            for byte in 0..=u8::MAX {
                black_box(map.keys(UserControlCode(black_box(byte))));
            }
        })
    });
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("keymap_build_standard", |b| b.iter(KeyMap::standard));
}

criterion_group!(benches, bench_lookup, bench_full_range, bench_build);
criterion_main!(benches);
