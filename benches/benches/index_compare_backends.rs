// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use playfield_index::{
    Diagonal, Direction, FlatVec, KdTree, Point, QuadTree, Rect, SpatialIndex,
};

const FIELD: Rect = Rect::DEFAULT_FIELD;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn coord(&mut self, max: i64) -> i64 {
        (self.next_u64() % (max as u64 + 1)) as i64
    }
}

/// `count` distinct points spread uniformly over the field.
fn gen_random_points(count: usize) -> Vec<Point> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut seen = std::collections::HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let p = Point::new(rng.coord(FIELD.max_x), rng.coord(FIELD.max_y));
        if seen.insert(p) {
            out.push(p);
        }
    }
    out
}

/// `count` distinct points packed into a few tight clusters.
fn gen_clustered_points(n_clusters: usize, per_cluster: usize, spread: i64) -> Vec<Point> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let (cx, cy) = (rng.coord(FIELD.max_x - spread), rng.coord(FIELD.max_y - spread));
        let mut placed = 0;
        while placed < per_cluster {
            let p = Point::new(cx + rng.coord(spread), cy + rng.coord(spread));
            if seen.insert(p) {
                out.push(p);
                placed += 1;
            }
        }
    }
    out
}

/// Every point sorted along x: the worst insertion order for an unbalanced 2-D tree.
fn gen_sorted_points(count: usize) -> Vec<Point> {
    let mut pts = gen_random_points(count);
    pts.sort_unstable();
    pts
}

fn fill<I: SpatialIndex<u32>>(mut idx: I, pts: &[Point]) -> I {
    for (i, p) in pts.iter().copied().enumerate() {
        let _ = idx.insert(i as u32, p);
    }
    idx
}

/// One game tick: every entity tries a single step.
fn tick<I: SpatialIndex<u32>>(idx: &mut I, pts: &[Point], rng: &mut Rng) -> usize {
    let mut moved = 0;
    for name in 0..pts.len() as u32 {
        let dir = Direction::ALL[(rng.next_u64() % 4) as usize];
        if let Ok(Some(_)) = idx.move_named(&name, dir, 1 + (rng.next_u64() % 3) as u32) {
            moved += 1;
        }
    }
    moved
}

fn range_sweep<I: SpatialIndex<u32>>(idx: &I, pts: &[Point]) -> usize {
    pts.iter()
        .step_by(16)
        .zip(Diagonal::ALL.iter().cycle())
        .map(|(p, d)| idx.names_in_range(*p, *d, 25).len())
        .sum()
}

fn bench_build_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_query");
    for &n in &[256usize, 1024, 4096] {
        let pts = gen_random_points(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("flatvec_n{}", n), |b| {
            b.iter_batched(
                || FlatVec::<u32>::new(FIELD),
                |idx| black_box(range_sweep(&fill(idx, &pts), &pts)),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("quadtree_n{}", n), |b| {
            b.iter_batched(
                || QuadTree::<u32>::with_field(FIELD),
                |idx| black_box(range_sweep(&fill(idx, &pts), &pts)),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("kdtree_n{}", n), |b| {
            b.iter_batched(
                || KdTree::<u32>::with_field(FIELD),
                |idx| black_box(range_sweep(&fill(idx, &pts), &pts)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for &n in &[256usize, 1024] {
        let pts = gen_random_points(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("flatvec_n{}", n), |b| {
            b.iter_batched(
                || (fill(FlatVec::<u32>::new(FIELD), &pts), Rng::new(7)),
                |(mut idx, mut rng)| black_box(tick(&mut idx, &pts, &mut rng)),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("quadtree_n{}", n), |b| {
            b.iter_batched(
                || (fill(QuadTree::<u32>::with_field(FIELD), &pts), Rng::new(7)),
                |(mut idx, mut rng)| black_box(tick(&mut idx, &pts, &mut rng)),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("kdtree_n{}", n), |b| {
            b.iter_batched(
                || (fill(KdTree::<u32>::with_field(FIELD), &pts), Rng::new(7)),
                |(mut idx, mut rng)| black_box(tick(&mut idx, &pts, &mut rng)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_clustered_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustered_query");
    let pts = gen_clustered_points(16, 128, 40);
    group.throughput(Throughput::Elements(pts.len() as u64));
    let quad = fill(QuadTree::<u32>::with_field(FIELD), &pts);
    let kd = fill(KdTree::<u32>::with_field(FIELD), &pts);
    group.bench_function("quadtree", |b| b.iter(|| black_box(range_sweep(&quad, &pts))));
    group.bench_function("kdtree", |b| b.iter(|| black_box(range_sweep(&kd, &pts))));
    group.finish();
}

fn bench_kdtree_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("kdtree_balance");
    for &n in &[1024usize, 4096] {
        let pts = gen_sorted_points(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("rebuild_n{}", n), |b| {
            b.iter_batched(
                || fill(KdTree::<u32>::with_field(FIELD), &pts),
                |mut idx| {
                    idx.balance();
                    black_box(idx.height())
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("query_unbalanced_n{}", n), |b| {
            let idx = fill(KdTree::<u32>::with_field(FIELD), &pts);
            b.iter(|| black_box(range_sweep(&idx, &pts)))
        });
        group.bench_function(format!("query_balanced_n{}", n), |b| {
            let mut idx = fill(KdTree::<u32>::with_field(FIELD), &pts);
            idx.balance();
            b.iter(|| black_box(range_sweep(&idx, &pts)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build_query,
    bench_tick,
    bench_clustered_query,
    bench_kdtree_balance
);
criterion_main!(benches);
