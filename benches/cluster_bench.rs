//! Benchmarks for the fiber clustering pipeline
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use fiber_cluster::{
    distance::fiber_distance, pairwise, FiberCollection, SpectralClusterConfig, SpectralClusterer,
};

/// Generate a synthetic collection of gently curved fibers spread over a few
/// spatial bundles.
fn synthetic_fibers(n: usize, points: usize) -> FiberCollection {
    let fibers: Vec<Vec<[f64; 3]>> = (0..n)
        .map(|i| {
            let bundle = (i % 4) as f64 * 40.0;
            let jitter = (i as f64 * 0.37).sin();
            (0..points)
                .map(|p| {
                    let t = p as f64 / points as f64;
                    [
                        t * 80.0 + jitter,
                        bundle + 5.0 * (t * std::f64::consts::PI).sin(),
                        jitter * 2.0,
                    ]
                })
                .collect()
        })
        .collect();
    FiberCollection::from_points(&fibers).expect("valid synthetic fibers")
}

fn bench_fiber_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("fiber_distance");

    for &n in &[100, 500, 1000] {
        let collection = synthetic_fibers(n, 20);
        let fiber = collection.fiber(0);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &collection, |b, coll| {
            b.iter(|| fiber_distance(black_box(&fiber), black_box(coll)));
        });
    }

    group.finish();
}

fn bench_similarity_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_matrix");
    group.sample_size(20);

    for &n in &[100, 300] {
        let collection = synthetic_fibers(n, 20);

        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &collection, |b, coll| {
            b.iter(|| pairwise::similarity_matrix(black_box(coll), 60.0, 4).unwrap());
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectral_clustering");
    group.sample_size(10);

    for &n in &[100, 200] {
        let collection = synthetic_fibers(n, 20);
        let config = SpectralClusterConfig::builder()
            .k_clusters(4)
            .num_eigenvectors(10)
            .sigma(60.0)
            .num_jobs(4)
            .build();
        let clusterer = SpectralClusterer::new(config).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &collection, |b, coll| {
            b.iter(|| clusterer.cluster(black_box(coll)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_fiber_distance,
    bench_similarity_matrix,
    bench_full_pipeline
);
criterion_main!(benches);
