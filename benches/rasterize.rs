use criterion::{criterion_group, criterion_main, Criterion};
use bevy::prelude::*;
use metaballs::{MetaballsConfig, Session};

fn bench_rasterize(c: &mut Criterion) {
    let cfg = MetaballsConfig {
        seed: Some(1),
        ..Default::default()
    };
    let mut session = Session::new(&cfg, UVec2::new(640, 360)).expect("valid default config");
    c.bench_function("rasterize_640x360_6_balls", |b| {
        b.iter(|| session.rasterize());
    });

    let many = MetaballsConfig {
        number_of_balls: 32,
        ..cfg
    };
    let mut session = Session::new(&many, UVec2::new(640, 360)).expect("valid config");
    c.bench_function("frame_640x360_32_balls", |b| {
        b.iter(|| session.tick());
    });
}

criterion_group!(benches, bench_rasterize);
criterion_main!(benches);
