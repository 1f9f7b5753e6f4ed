#[macro_use]
extern crate criterion;
extern crate mandelpool;

use criterion::Criterion;
use mandelpool::{render, render_serial, IntegralPlane, RenderConfig};

fn config(workers: usize) -> RenderConfig {
    RenderConfig {
        plane: IntegralPlane(200, 150),
        workers,
        max_iterations: 256,
        ..RenderConfig::default()
    }
}

fn bench_serial(c: &mut Criterion) {
    c.bench_function("serial 200x150", |b| b.iter(|| render_serial(&config(1)).unwrap()));
}

fn bench_pool(c: &mut Criterion) {
    c.bench_function("pool of 2, 200x150", |b| b.iter(|| render(&config(2), &[]).unwrap()));
    c.bench_function("pool of 8, 200x150", |b| b.iter(|| render(&config(8), &[]).unwrap()));
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_serial, bench_pool
}
criterion_main!(benches);
