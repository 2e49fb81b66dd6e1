use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use area_slicer::{
    distribution::compute_distribution,
    intersection::{intersect_plane, Plane, Segments1D},
    primitives, Pos,
};

pub fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mesh Intersections");

    for resolution in [32, 128, 512] {
        let mesh = primitives::uv_sphere(1.0, resolution, resolution / 2);
        let segments = Segments1D::from_mesh(&mesh, Pos::z(), 100, 1e-9);
        let plane = Plane::new(Pos::new(0.0, 0.0, 0.1), Pos::z()).unwrap();

        group.bench_with_input(BenchmarkId::new("Linear", resolution), &mesh, |b, i| {
            b.iter(|| intersect_plane(i, &plane, 1e-9))
        });

        group.bench_with_input(
            BenchmarkId::new("Segments", resolution),
            &(segments, mesh),
            |b, (segments, mesh)| b.iter(|| segments.intersect_plane(mesh, 0.1)),
        );
    }
    group.finish();

    let mut group = c.benchmark_group("Distributions");
    group.sample_size(10);
    for resolution in [64, 256] {
        let mesh = primitives::uv_sphere(1.0, resolution, resolution / 2);
        group.bench_with_input(BenchmarkId::new("Sphere", resolution), &mesh, |b, i| {
            b.iter(|| compute_distribution(i, Pos::z(), 100).unwrap())
        });
    }
}

criterion_group!(benches, bench);
criterion_main!(benches);
