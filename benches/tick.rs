//! Benchmarks for the CPU side of a frame: particle updates and link search.
//!
//! Run with: `cargo bench`

use ambient_particles::{
    ConnectionGraph, FieldConfig, ParticleField, PointerState, RecordingSurface, Style, Vec2,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn seeded_field(width: u32, height: u32) -> ParticleField {
    ParticleField::new(
        FieldConfig::default().with_seed(42),
        Style::default(),
        width,
        height,
    )
    .unwrap()
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    group.bench_function("pointer_absent", |b| {
        let mut field = seeded_field(1920, 1080);
        let mut surface = RecordingSurface::new(1920, 1080);
        b.iter(|| field.tick(&mut surface, black_box(PointerState::Absent)))
    });

    group.bench_function("pointer_present", |b| {
        let mut field = seeded_field(1920, 1080);
        let mut surface = RecordingSurface::new(1920, 1080);
        let pointer = PointerState::Present(Vec2::new(960.0, 540.0));
        b.iter(|| field.tick(&mut surface, black_box(pointer)))
    });

    group.finish();
}

fn bench_links(c: &mut Criterion) {
    let mut group = c.benchmark_group("links");

    for (width, height) in [(400, 300), (800, 600), (1920, 1080)] {
        let field = seeded_field(width, height);
        let graph = ConnectionGraph::new(field.config());
        group.bench_with_input(
            BenchmarkId::new("particles", field.len()),
            &field,
            |b, field| b.iter(|| black_box(graph.links(field.particles()).count())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_tick, bench_links);
criterion_main!(benches);
