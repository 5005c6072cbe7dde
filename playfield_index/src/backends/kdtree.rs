// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2-D tree backend.
//!
//! A binary search tree that stores one entry at every node and splits on the
//! node's own point. The split axis alternates by depth, starting with `x` at the
//! root. Points with a coordinate `<=` the split value go to `lt`, the rest to `gt`.
//!
//! Removing an internal entry promotes a replacement from below: the maximum along
//! the split axis from `lt`, or the minimum from `gt` when `lt` is absent.
//! [`KdTree::balance`] rebuilds the whole tree around medians.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Result;
use crate::index::{MovePlan, SpatialIndex, plan_move};
use crate::types::{Axis, Direction, Entry, Point, Rect};

/// A 2-D tree node.
#[derive(Clone, Debug)]
pub struct KdNode<N> {
    entry: Option<Entry<N>>,
    axis: Axis,
    lt: Option<Box<KdNode<N>>>,
    gt: Option<Box<KdNode<N>>>,
}

impl<N> KdNode<N> {
    const fn empty(axis: Axis) -> Self {
        Self {
            entry: None,
            axis,
            lt: None,
            gt: None,
        }
    }

    const fn leaf(entry: Entry<N>, axis: Axis) -> Self {
        Self {
            entry: Some(entry),
            axis,
            lt: None,
            gt: None,
        }
    }

    /// The axis this node splits on.
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// The entry stored here. Only an empty root has none.
    pub const fn entry(&self) -> Option<&Entry<N>> {
        self.entry.as_ref()
    }

    /// Subtree of points at or below this node's split value.
    pub fn lt(&self) -> Option<&Self> {
        self.lt.as_deref()
    }

    /// Subtree of points above this node's split value.
    pub fn gt(&self) -> Option<&Self> {
        self.gt.as_deref()
    }

    /// Whether this node has no children.
    pub const fn is_leaf(&self) -> bool {
        self.lt.is_none() && self.gt.is_none()
    }

    /// Whether this node has neither an entry nor children.
    pub const fn is_empty(&self) -> bool {
        self.entry.is_none() && self.is_leaf()
    }

    /// Nodes in this subtree, this one included.
    pub fn size(&self) -> usize {
        1 + self.lt().map_or(0, Self::size) + self.gt().map_or(0, Self::size)
    }

    /// Nodes on the longest path from this node down to a leaf.
    pub fn height(&self) -> usize {
        1 + self
            .lt()
            .map_or(0, Self::height)
            .max(self.gt().map_or(0, Self::height))
    }

    fn side_of(&self, here: Point, p: Point) -> bool {
        self.axis.coord(p) <= self.axis.coord(here)
    }

    /// A point of this subtree with the largest coordinate along `axis`.
    fn max_along(&self, axis: Axis) -> Option<Point> {
        let mut best = self.entry.as_ref()?.point;
        let mut consider = |child: Option<&Self>| {
            if let Some(p) = child.and_then(|c| c.max_along(axis))
                && axis.coord(p) > axis.coord(best)
            {
                best = p;
            }
        };
        // Along its own axis, `lt` never beats this node.
        if self.axis != axis {
            consider(self.lt());
        }
        consider(self.gt());
        Some(best)
    }

    /// A point of this subtree with the smallest coordinate along `axis`.
    fn min_along(&self, axis: Axis) -> Option<Point> {
        let mut best = self.entry.as_ref()?.point;
        let mut consider = |child: Option<&Self>| {
            if let Some(p) = child.and_then(|c| c.min_along(axis))
                && axis.coord(p) < axis.coord(best)
            {
                best = p;
            }
        };
        consider(self.lt());
        if self.axis != axis {
            consider(self.gt());
        }
        Some(best)
    }

    /// How many points of this subtree have `value` as their `axis` coordinate.
    fn count_at(&self, axis: Axis, value: i64) -> usize {
        let here = self
            .entry
            .as_ref()
            .is_some_and(|e| axis.coord(e.point) == value);
        usize::from(here)
            + self.lt().map_or(0, |c| c.count_at(axis, value))
            + self.gt().map_or(0, |c| c.count_at(axis, value))
    }

    fn collect_in(&self, rect: &Rect, out: &mut Vec<N>)
    where
        N: Clone,
    {
        let Some(e) = &self.entry else {
            return;
        };
        if rect.contains(e.point) {
            out.push(e.name.clone());
        }
        let split = self.axis.coord(e.point);
        let (lo, hi) = self.axis.span(rect);
        if lo <= split
            && let Some(lt) = self.lt()
        {
            lt.collect_in(rect, out);
        }
        if hi > split
            && let Some(gt) = self.gt()
        {
            gt.collect_in(rect, out);
        }
    }

    fn collect_all(&self, out: &mut Vec<Entry<N>>)
    where
        N: Clone,
    {
        if let Some(e) = &self.entry {
            out.push(e.clone());
        }
        if let Some(lt) = self.lt() {
            lt.collect_all(out);
        }
        if let Some(gt) = self.gt() {
            gt.collect_all(out);
        }
    }

    fn find_named(&self, name: &N) -> Option<&Entry<N>>
    where
        N: PartialEq,
    {
        if let Some(e) = &self.entry
            && e.name == *name
        {
            return Some(e);
        }
        self.lt()
            .and_then(|c| c.find_named(name))
            .or_else(|| self.gt().and_then(|c| c.find_named(name)))
    }
}

/// 2-D tree over a fixed field.
#[derive(Clone)]
pub struct KdTree<N> {
    field: Rect,
    root: KdNode<N>,
    len: usize,
}

impl<N: Clone + PartialEq + Debug> Default for KdTree<N> {
    fn default() -> Self {
        Self::with_field(Rect::DEFAULT_FIELD)
    }
}

impl<N: Clone + PartialEq + Debug> KdTree<N> {
    /// Create an empty tree over the field spanned by its north-west and
    /// south-east corners.
    pub fn new(nw: Point, se: Point) -> Self {
        Self::with_field(Rect::from_corners(nw, se))
    }

    /// Create an empty tree over `field`.
    pub const fn with_field(field: Rect) -> Self {
        Self {
            field,
            root: KdNode::empty(Axis::X),
            len: 0,
        }
    }

    /// The root node.
    pub const fn root(&self) -> &KdNode<N> {
        &self.root
    }

    /// Rebuild the tree so every node splits its points at the median.
    ///
    /// Afterwards the `lt` and `gt` subtrees of every node differ in size by at
    /// most one, provided no two points share a coordinate on the axis being
    /// split. Ties on that axis are kept on the `lt` side, which can unbalance
    /// the split. A leaf root and a root with two leaf children are left alone.
    pub fn balance(&mut self) {
        let both_leaves = self.root.lt().is_some_and(KdNode::is_leaf)
            && self.root.gt().is_some_and(KdNode::is_leaf);
        if self.root.is_leaf() || both_leaves {
            return;
        }
        let before = self.root.height();
        let mut slots: Vec<Option<Entry<N>>> =
            self.entries().into_iter().map(Some).collect();
        let points: Vec<Point> = slots.iter().flatten().map(|e| e.point).collect();
        let mut by_x: Vec<usize> = (0..points.len()).collect();
        by_x.sort_unstable_by_key(|&i| Axis::X.key(points[i]));
        let mut by_y = by_x.clone();
        by_y.sort_unstable_by_key(|&i| Axis::Y.key(points[i]));

        self.root = Self::build(&mut slots, &points, by_x, by_y, Axis::X)
            .unwrap_or_else(|| KdNode::empty(Axis::X));
        tracing::debug!(
            len = self.len,
            height_before = before,
            height_after = self.root.height(),
            "rebalanced 2-D tree"
        );
    }

    /// Build a subtree from index lists sorted by `axis` (`primary`) and by the
    /// other axis (`secondary`). Both lists hold the same indices.
    fn build(
        slots: &mut [Option<Entry<N>>],
        points: &[Point],
        mut primary: Vec<usize>,
        secondary: Vec<usize>,
        axis: Axis,
    ) -> Option<KdNode<N>> {
        if primary.is_empty() {
            return None;
        }
        let mut mid = primary.len() / 2;
        while mid + 1 < primary.len()
            && axis.coord(points[primary[mid + 1]]) == axis.coord(points[primary[mid]])
        {
            mid += 1;
        }
        let pivot = primary[mid];
        let key = axis.key(points[pivot]);
        let gt_secondary_sorted = primary.split_off(mid + 1);
        primary.truncate(mid);
        let lt_secondary_sorted = primary;
        let (lt_primary, gt_primary): (Vec<usize>, Vec<usize>) = secondary
            .into_iter()
            .filter(|&i| i != pivot)
            .partition(|&i| axis.key(points[i]) < key);

        let next = axis.flip();
        let lt = Self::build(slots, points, lt_primary, lt_secondary_sorted, next);
        let gt = Self::build(slots, points, gt_primary, gt_secondary_sorted, next);
        Some(KdNode {
            entry: slots[pivot].take(),
            axis,
            lt: lt.map(Box::new),
            gt: gt.map(Box::new),
        })
    }

    fn place(&mut self, entry: Entry<N>) {
        Self::insert_into(&mut self.root, entry);
        self.len += 1;
    }

    fn insert_into(node: &mut KdNode<N>, entry: Entry<N>) {
        let Some(here) = node.entry.as_ref().map(|e| e.point) else {
            node.entry = Some(entry);
            return;
        };
        let axis = node.axis.flip();
        let slot = if node.side_of(here, entry.point) {
            &mut node.lt
        } else {
            &mut node.gt
        };
        if let Some(child) = slot.as_deref_mut() {
            Self::insert_into(child, entry);
        } else {
            *slot = Some(Box::new(KdNode::leaf(entry, axis)));
        }
    }

    /// Remove the entry at `point` from the subtree rooted at `node`.
    ///
    /// `node.entry` is `None` afterwards only if `node` was a leaf holding `point`.
    fn remove_at(node: &mut KdNode<N>, point: Point) -> Option<Entry<N>> {
        let here = node.entry.as_ref()?.point;
        if here == point {
            return Self::take_entry(node);
        }
        let side = if node.side_of(here, point) {
            &mut node.lt
        } else {
            &mut node.gt
        };
        let child = side.as_deref_mut()?;
        let removed = Self::remove_at(child, point)?;
        if child.entry.is_none() {
            *side = None;
        }
        Some(removed)
    }

    /// Remove `node`'s own entry, promoting a replacement from below.
    fn take_entry(node: &mut KdNode<N>) -> Option<Entry<N>> {
        let axis = node.axis;
        let (to, from_lt) = if let Some(lt) = node.lt() {
            (lt.max_along(axis)?, true)
        } else if let Some(gt) = node.gt() {
            let min = gt.min_along(axis)?;
            if gt.count_at(axis, axis.coord(min)) == 1 {
                (min, false)
            } else {
                // Ties on the minimum: promote the maximum and let the rest
                // of `gt` become `lt`, where `<=` holds.
                node.lt = node.gt.take();
                (node.lt().and_then(|lt| lt.max_along(axis))?, true)
            }
        } else {
            return node.entry.take();
        };
        let slot = if from_lt { &mut node.lt } else { &mut node.gt };
        let child = slot.as_deref_mut()?;
        let promoted = Self::remove_at(child, to)?;
        if child.entry.is_none() {
            *slot = None;
        }
        tracing::trace!(x = to.x, y = to.y, ?axis, from_lt, "promoted replacement");
        node.entry.replace(promoted)
    }

    /// The node holding `from`, if moving it to `to` keeps every split valid.
    fn in_place_holder(node: &mut KdNode<N>, from: Point, to: Point) -> Option<&mut KdNode<N>> {
        let here = node.entry.as_ref()?.point;
        if here == from {
            // The node's own split value moves with it, so its children must
            // stay on their sides too.
            let fits = node.is_leaf() || node.axis.coord(from) == node.axis.coord(to);
            return fits.then_some(node);
        }
        let side = node.side_of(here, from);
        if side != node.side_of(here, to) {
            return None;
        }
        let next = if side {
            node.lt.as_deref_mut()
        } else {
            node.gt.as_deref_mut()
        };
        Self::in_place_holder(next?, from, to)
    }
}

impl<N: Clone + PartialEq + Debug> SpatialIndex<N> for KdTree<N> {
    type Node = KdNode<N>;

    fn field(&self) -> Rect {
        self.field
    }

    fn locate(&self, name: &N) -> Option<Point> {
        self.root.find_named(name).map(|e| e.point)
    }

    fn name_at(&self, point: Point) -> Option<&N> {
        if !self.field.contains(point) {
            return None;
        }
        let mut node = &self.root;
        loop {
            let e = node.entry.as_ref()?;
            if e.point == point {
                return Some(&e.name);
            }
            node = if node.side_of(e.point, point) {
                node.lt()?
            } else {
                node.gt()?
            };
        }
    }

    fn insert(&mut self, name: N, point: Point) -> Result<()> {
        self.check_vacant(point)?;
        self.place(Entry::new(name, point));
        Ok(())
    }

    fn remove_point(&mut self, point: Point) -> Option<N> {
        if !self.field.contains(point) {
            return None;
        }
        let removed = Self::remove_at(&mut self.root, point)?;
        self.len -= 1;
        Some(removed.name)
    }

    fn move_point(
        &mut self,
        point: Point,
        direction: Direction,
        steps: u32,
    ) -> Result<Option<Point>> {
        let to = match plan_move(self, point, direction, steps)? {
            MovePlan::Absent => return Ok(None),
            MovePlan::Stay(p) => return Ok(Some(p)),
            MovePlan::To(to) => to,
        };
        if let Some(holder) = Self::in_place_holder(&mut self.root, point, to) {
            if let Some(e) = holder.entry.as_mut() {
                e.point = to;
            }
            tracing::trace!(x = to.x, y = to.y, "moved without crossing a split");
            return Ok(Some(to));
        }
        if let Some(name) = self.remove_point(point) {
            self.place(Entry::new(name, to));
        }
        Ok(Some(to))
    }

    fn names_in_rect(&self, rect: Rect) -> Vec<N> {
        let mut out = Vec::new();
        let rect = rect.intersect(&self.field);
        if !rect.is_empty() {
            self.root.collect_in(&rect, &mut out);
        }
        out
    }

    fn len(&self) -> usize {
        self.len
    }

    fn entries(&self) -> Vec<Entry<N>> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_all(&mut out);
        out
    }

    fn clear(&mut self) {
        self.root = KdNode::empty(Axis::X);
        self.len = 0;
    }

    fn size(&self) -> usize {
        self.root.size()
    }

    fn height(&self) -> usize {
        self.root.height()
    }

    fn depth(&self, subtree: &KdNode<N>) -> Option<usize> {
        let target = subtree.entry.as_ref()?.point;
        let mut node = &self.root;
        let mut depth = 0;
        loop {
            let here = node.entry.as_ref()?.point;
            node = if node.side_of(here, target) {
                node.lt()?
            } else {
                node.gt()?
            };
            depth += 1;
            if core::ptr::eq(node, subtree) {
                return Some(depth);
            }
        }
    }

    fn is_leaf(&self) -> bool {
        self.root.is_leaf()
    }

    fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl<N: Clone + PartialEq + Debug> Debug for KdTree<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KdTree")
            .field("field", &self.field)
            .field("len", &self.len)
            .field("nodes", &self.root.size())
            .field("height", &self.root.height())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl<N: Clone + PartialEq + Debug> KdTree<N> {
    /// Panic unless every structural invariant holds.
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.root.axis, Axis::X, "root splits on x");
        if self.root.entry.is_none() {
            assert!(self.root.is_leaf(), "an empty root has no children");
            assert_eq!(self.len, 0);
            return;
        }
        let mut seen = Vec::new();
        Self::check_node(&self.root, &mut Vec::new(), &mut seen);
        for p in &seen {
            assert!(self.field.contains(*p), "{p} is outside the field");
        }
        assert_eq!(seen.len(), self.len, "len must match stored entries");
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), self.len, "stored points must be unique");
    }

    /// `bounds` lists every ancestor split as `(axis, value, went_lt)`.
    fn check_node(node: &KdNode<N>, bounds: &mut Vec<(Axis, i64, bool)>, seen: &mut Vec<Point>) {
        let Some(e) = &node.entry else {
            panic!("non-root nodes always hold an entry");
        };
        for &(axis, value, went_lt) in bounds.iter() {
            let c = axis.coord(e.point);
            assert_eq!(c <= value, went_lt, "{} is on the wrong side of a split", e.point);
        }
        seen.push(e.point);
        let split = node.axis.coord(e.point);
        for (child, went_lt) in [(node.lt(), true), (node.gt(), false)] {
            if let Some(child) = child {
                assert_eq!(child.axis, node.axis.flip(), "axes alternate");
                bounds.push((node.axis, split, went_lt));
                Self::check_node(child, bounds, seen);
                bounds.pop();
            }
        }
    }
}
