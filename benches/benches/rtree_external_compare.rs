// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use playfield_index::{KdTree, Point, QuadTree, Rect, SpatialIndex};

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

type Named = GeomWithData<[i64; 2], u32>;

fn gen_grid_points(n: usize, step: i64) -> Vec<Point> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(Point::new(x as i64 * step, y as i64 * step));
        }
    }
    out
}

fn to_rstar_points(v: &[Point]) -> Vec<Named> {
    v.iter()
        .enumerate()
        .map(|(i, p)| GeomWithData::new([p.x, p.y], i as u32))
        .collect()
}

fn build<I: SpatialIndex<u32>>(mut idx: I, pts: &[Point]) -> I {
    for (i, p) in pts.iter().copied().enumerate() {
        let _ = idx.insert(i as u32, p);
    }
    idx
}

fn bench_rtree_external_compare_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare_i64");
    for &n in &[32usize, 64] {
        let pts = gen_grid_points(n, 7);
        let field = Rect::new(0, 0, 7 * n as i64, 7 * n as i64);
        let query = Rect::new(40, 40, 160, 160);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("quadtree_build_query_n{}", n), |b| {
            b.iter_batched(
                || QuadTree::<u32>::with_field(field),
                |idx| black_box(build(idx, &pts).names_in_rect(query).len()),
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("kdtree_build_balance_query_n{}", n), |b| {
            b.iter_batched(
                || KdTree::<u32>::with_field(field),
                |idx| {
                    let mut idx = build(idx, &pts);
                    idx.balance();
                    black_box(idx.names_in_rect(query).len())
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_points(&pts),
                |points| {
                    let tree = RTree::bulk_load(points);
                    let aabb = AABB::from_corners(
                        [query.min_x, query.min_y],
                        [query.max_x, query.max_y],
                    );
                    black_box(tree.locate_in_envelope(&aabb).count())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare_i64);
criterion_main!(benches);
