// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seeded random workloads replayed against [`FlatVec`] as the reference answer.

use alloc::vec::Vec;

use crate::backends::flatvec::FlatVec;
use crate::index::SpatialIndex;
use crate::types::{Diagonal, Direction, Entry, Point, Rect};

/// Xorshift generator; deterministic across platforms.
#[derive(Clone, Debug)]
pub(crate) struct Rng(u64);

impl Rng {
    pub(crate) fn new(seed: u64) -> Self {
        // Xorshift never leaves zero.
        Self(seed | 1)
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform-ish value in `0..n`.
    pub(crate) fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Value in `lo..=hi`.
    pub(crate) fn between(&mut self, lo: i64, hi: i64) -> i64 {
        let span = u64::try_from(hi - lo + 1).unwrap();
        lo + i64::try_from(self.below(span)).unwrap()
    }

    pub(crate) fn small(&mut self, n: u32) -> u32 {
        u32::try_from(self.below(u64::from(n))).unwrap()
    }

    /// A point in `field` grown by two on every side, so some fall outside.
    pub(crate) fn point_near(&mut self, field: &Rect) -> Point {
        Point::new(
            self.between(field.min_x - 2, field.max_x + 2),
            self.between(field.min_y - 2, field.max_y + 2),
        )
    }

    pub(crate) fn direction(&mut self) -> Direction {
        Direction::ALL[usize::try_from(self.below(4)).unwrap()]
    }

    pub(crate) fn diagonal(&mut self) -> Diagonal {
        Diagonal::ALL[usize::try_from(self.below(4)).unwrap()]
    }
}

pub(crate) fn sorted<T: Ord>(mut v: Vec<T>) -> Vec<T> {
    v.sort_unstable();
    v
}

fn sorted_entries(mut v: Vec<Entry<u32>>) -> Vec<Entry<u32>> {
    v.sort_unstable_by_key(|e| e.point);
    v
}

/// Run `steps` random operations on `index` and on a [`FlatVec`] over the same
/// field, asserting after each one that both agree. `after_step` runs after every
/// step; callers assert structural invariants there or reshape the index.
pub(crate) fn replay<I>(index: &mut I, seed: u64, steps: usize, mut after_step: impl FnMut(&mut I))
where
    I: SpatialIndex<u32>,
{
    let field = index.field();
    let mut oracle = FlatVec::new(field);
    let mut rng = Rng::new(seed);
    for step in 0..steps {
        // Prefer points that are actually stored so moves and removals hit.
        let stored = oracle.entries();
        let known = if stored.is_empty() || rng.below(4) == 0 {
            rng.point_near(&field)
        } else {
            stored[usize::try_from(rng.below(stored.len() as u64)).unwrap()].point
        };
        let name = rng.small(64);
        match rng.below(6) {
            0 | 1 => {
                if oracle.contains_name(&name) {
                    continue;
                }
                let p = rng.point_near(&field);
                let got = index.insert(name, p);
                assert_eq!(got, oracle.insert(name, p), "step {step}: insert {name} at {p}");
            }
            2 => {
                assert_eq!(index.remove(&name), oracle.remove(&name), "step {step}: remove {name}");
            }
            3 => {
                assert_eq!(
                    index.remove_point(known),
                    oracle.remove_point(known),
                    "step {step}: remove_point {known}"
                );
            }
            4 => {
                let (dir, n) = (rng.direction(), rng.small(12));
                assert_eq!(
                    index.move_named(&name, dir, n),
                    oracle.move_named(&name, dir, n),
                    "step {step}: move {name} {dir:?} {n}"
                );
            }
            _ => {
                let (dir, n) = (rng.direction(), rng.small(12));
                assert_eq!(
                    index.move_point(known, dir, n),
                    oracle.move_point(known, dir, n),
                    "step {step}: move_point {known} {dir:?} {n}"
                );
            }
        }

        let (origin, diagonal, distance) =
            (rng.point_near(&field), rng.diagonal(), rng.small(20));
        assert_eq!(
            sorted(index.names_in_range(origin, diagonal, distance)),
            sorted(oracle.names_in_range(origin, diagonal, distance)),
            "step {step}: range {origin} {diagonal:?} {distance}"
        );
        let probe = rng.point_near(&field);
        assert_eq!(index.name_at(probe), oracle.name_at(probe), "step {step}: name_at {probe}");
        assert_eq!(
            sorted_entries(index.entries()),
            sorted_entries(oracle.entries()),
            "step {step}: stored pairs"
        );
        assert_eq!(index.len(), oracle.len());
        assert_eq!(index.is_empty(), oracle.is_empty());
        assert!(index.size() >= index.len().max(1));
        after_step(&mut *index);
    }
}
