use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use audiostream::PanTable;

fn pan_table_benchmarks(c: &mut Criterion) {
    c.bench_function("quantized gain lookup", |bencher| {
        bencher.iter(|| {
            for step in 0..128 {
                let value = step as f32 / 127.0;
                black_box(PanTable::vol_left(black_box(value), black_box(value)));
                black_box(PanTable::vol_right(black_box(value), black_box(value)));
            }
        });
    });

    c.bench_function("unquantized reference law", |bencher| {
        bencher.iter(|| {
            for step in 0..128 {
                let value = step as f32 / 127.0;
                black_box(PanTable::left_right(black_box(value), black_box(value)));
            }
        });
    });
}

criterion_group!(benches, pan_table_benchmarks);

criterion_main!(benches);
