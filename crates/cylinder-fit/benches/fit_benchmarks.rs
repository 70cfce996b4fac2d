//! Criterion benchmarks for cylinder fitting.
//!
//! Run with: `cargo bench -p cylinder-fit`

use std::f64::consts::TAU;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cylinder_fit::{default_axis, fit_cylinder, lateral_distances, FitParams};
use nalgebra::Point3;

fn lateral_cloud(n: usize) -> Vec<Point3<f64>> {
    let rings = 8;
    let per_ring = n / rings;
    let mut points = Vec::with_capacity(rings * per_ring);
    for k in 0..rings {
        let y = -0.75 + 1.5 * k as f64 / (rings - 1) as f64;
        for i in 0..per_ring {
            let theta = i as f64 / per_ring as f64 * TAU;
            points.push(Point3::new(theta.cos(), y, theta.sin()));
        }
    }
    points
}

fn bench_fit_cylinder(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_cylinder");
    for &n in &[256_usize, 1024, 4096] {
        let points = lateral_cloud(n);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| fit_cylinder(black_box(points), &FitParams::default()).unwrap());
        });
    }
    group.finish();
}

fn bench_lateral_distances(c: &mut Criterion) {
    let mut group = c.benchmark_group("lateral_distances");
    for &n in &[1024_usize, 16384] {
        let points = lateral_cloud(n);
        let mut out = Vec::with_capacity(points.len());
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| {
                lateral_distances(
                    black_box(points),
                    &Point3::origin(),
                    &default_axis(),
                    1.0,
                    1.5,
                    &mut out,
                );
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fit_cylinder, bench_lateral_distances);
criterion_main!(benches);
