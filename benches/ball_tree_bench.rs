use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use ugrid_geo::geometry::coordinates::lonlat_to_xyz;
use ugrid_geo::spatial::ball_tree::{BallTree, BallTreeOptions};
use ugrid_geo::spatial::metric::{Euclidean, Haversine};

fn random_lonlat(n: usize, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|_| [rng.gen_range(-180.0..180.0), rng.gen_range(-90.0..90.0)])
        .collect()
}

fn bench_ball_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("ball_tree");

    for &n in &[10_000usize, 100_000usize] {
        let points = random_lonlat(n, 42);
        let xyz: Vec<[f64; 3]> = points.iter().map(|p| lonlat_to_xyz(p[0], p[1])).collect();
        let queries = random_lonlat(1_000, 7);

        group.bench_with_input(BenchmarkId::new("build_haversine", n), &n, |b, _| {
            b.iter(|| {
                let tree = BallTree::build(Haversine, &points, BallTreeOptions::default()).unwrap();
                black_box(tree);
            });
        });

        group.bench_with_input(BenchmarkId::new("build_euclidean", n), &n, |b, _| {
            b.iter(|| {
                let tree = BallTree::build(Euclidean, &xyz, BallTreeOptions::default()).unwrap();
                black_box(tree);
            });
        });

        let spherical = BallTree::build(Haversine, &points, BallTreeOptions::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("query_haversine", n), &n, |b, _| {
            b.iter(|| {
                for q in &queries {
                    black_box(spherical.query_nearest(q));
                }
            });
        });

        let cartesian = BallTree::build(Euclidean, &xyz, BallTreeOptions::default()).unwrap();
        let query_xyz: Vec<[f64; 3]> = queries.iter().map(|p| lonlat_to_xyz(p[0], p[1])).collect();
        group.bench_with_input(BenchmarkId::new("query_euclidean", n), &n, |b, _| {
            b.iter(|| {
                for q in &query_xyz {
                    black_box(cartesian.query_nearest(q));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ball_tree);
criterion_main!(benches);
