// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets
//! and as a reference answer when checking the trees.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Result;
use crate::index::{MovePlan, SpatialIndex, plan_move};
use crate::types::{Direction, Entry, Point, Rect};

/// Flat vector backend with linear scans.
///
/// It is a single node: size and height are always 1 and [`depth`](SpatialIndex::depth)
/// never finds a subtree.
#[derive(Clone)]
pub struct FlatVec<N> {
    field: Rect,
    entries: Vec<Entry<N>>,
}

impl<N> FlatVec<N> {
    /// Create an empty index over `field`.
    pub const fn new(field: Rect) -> Self {
        Self {
            field,
            entries: Vec::new(),
        }
    }

    fn position(&self, point: Point) -> Option<usize> {
        self.entries.iter().position(|e| e.point == point)
    }
}

impl<N> Default for FlatVec<N> {
    fn default() -> Self {
        Self::new(Rect::DEFAULT_FIELD)
    }
}

impl<N: Debug> Debug for FlatVec<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatVec")
            .field("field", &self.field)
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<N: Clone + PartialEq + Debug> SpatialIndex<N> for FlatVec<N> {
    type Node = Self;

    fn field(&self) -> Rect {
        self.field
    }

    fn locate(&self, name: &N) -> Option<Point> {
        self.entries.iter().find(|e| e.name == *name).map(|e| e.point)
    }

    fn name_at(&self, point: Point) -> Option<&N> {
        self.entries.iter().find(|e| e.point == point).map(|e| &e.name)
    }

    fn insert(&mut self, name: N, point: Point) -> Result<()> {
        self.check_vacant(point)?;
        self.entries.push(Entry::new(name, point));
        Ok(())
    }

    fn remove_point(&mut self, point: Point) -> Option<N> {
        let i = self.position(point)?;
        Some(self.entries.swap_remove(i).name)
    }

    fn move_point(
        &mut self,
        point: Point,
        direction: Direction,
        steps: u32,
    ) -> Result<Option<Point>> {
        match plan_move(self, point, direction, steps)? {
            MovePlan::Absent => Ok(None),
            MovePlan::Stay(p) => Ok(Some(p)),
            MovePlan::To(to) => {
                if let Some(i) = self.position(point) {
                    self.entries[i].point = to;
                }
                Ok(Some(to))
            }
        }
    }

    fn names_in_rect(&self, rect: Rect) -> Vec<N> {
        let rect = rect.intersect(&self.field);
        let mut out = Vec::new();
        for e in &self.entries {
            if rect.contains(e.point) {
                out.push(e.name.clone());
            }
        }
        out
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries(&self) -> Vec<Entry<N>> {
        self.entries.clone()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn size(&self) -> usize {
        1
    }

    fn height(&self) -> usize {
        1
    }

    fn depth(&self, _subtree: &Self) -> Option<usize> {
        None
    }

    fn is_leaf(&self) -> bool {
        true
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
