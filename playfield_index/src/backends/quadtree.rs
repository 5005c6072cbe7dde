// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region quadtree backend.
//!
//! Every node owns an inclusive integer region and splits it into four quadrants
//! around its floored midpoint. Entries live only in leaves. A leaf that receives a
//! second point splits, pushing its resident down one level and retrying. Removing
//! a point collapses any parent left with a single leaf child, so lone survivors
//! float back up to the shallowest node that can hold them.
//!
//! Regions are never stored. They are recomputed top-down from the field during each
//! descent and passed along as explicit context.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Result;
use crate::index::{MovePlan, SpatialIndex, plan_move};
use crate::types::{Direction, Entry, Point, Quadrant, Quadrants, Rect};

/// A quadtree node: a center, an optional entry, and four owned child slots.
#[derive(Clone, Debug)]
pub struct QuadNode<N> {
    center: Point,
    entry: Option<Entry<N>>,
    children: [Option<Box<QuadNode<N>>>; 4],
}

impl<N> QuadNode<N> {
    const fn empty(center: Point) -> Self {
        Self {
            center,
            entry: None,
            children: [None, None, None, None],
        }
    }

    fn leaf(region: Rect, entry: Entry<N>) -> Self {
        Self {
            center: region.center(),
            entry: Some(entry),
            children: [None, None, None, None],
        }
    }

    /// The split point of this node's region.
    pub const fn center(&self) -> Point {
        self.center
    }

    /// The entry held here. Only leaves hold one.
    pub const fn entry(&self) -> Option<&Entry<N>> {
        self.entry.as_ref()
    }

    /// The child covering `quadrant`, if materialized.
    pub fn child(&self, quadrant: Quadrant) -> Option<&Self> {
        self.children[quadrant.index()].as_deref()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Whether this node has neither an entry nor children.
    pub fn is_empty(&self) -> bool {
        self.entry.is_none() && self.is_leaf()
    }

    /// Nodes in this subtree, this one included.
    pub fn size(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|c| c.size())
            .sum::<usize>()
    }

    /// Nodes on the longest path from this node down to a leaf.
    pub fn height(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|c| c.height())
            .max()
            .unwrap_or(0)
    }

    /// Pull a lone leaf child up into this node.
    fn collapse(&mut self) {
        if self.children.iter().filter(|c| c.is_some()).count() != 1 {
            return;
        }
        let Some(slot) = self.children.iter_mut().find(|c| c.is_some()) else {
            return;
        };
        if !slot.as_ref().is_some_and(|c| c.is_leaf()) {
            return;
        }
        if let Some(child) = slot.take() {
            let Self { entry, .. } = *child;
            tracing::trace!(cx = self.center.x, cy = self.center.y, "collapsed lone leaf");
            self.entry = entry;
        }
    }

    fn collect_in(&self, rect: &Rect, out: &mut Vec<N>)
    where
        N: Clone,
    {
        if let Some(e) = &self.entry {
            if rect.contains(e.point) {
                out.push(e.name.clone());
            }
            return;
        }
        for q in Quadrants::overlapping(self.center, rect).quadrants() {
            if let Some(child) = self.child(q) {
                child.collect_in(rect, out);
            }
        }
    }

    fn collect_all(&self, out: &mut Vec<Entry<N>>)
    where
        N: Clone,
    {
        if let Some(e) = &self.entry {
            out.push(e.clone());
        }
        for child in self.children.iter().flatten() {
            child.collect_all(out);
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
        self.children.iter().flatten().find_map(|c| c.find_named(name))
    }
}

/// Region quadtree over a fixed field.
#[derive(Clone)]
pub struct QuadTree<N> {
    field: Rect,
    root: QuadNode<N>,
    len: usize,
}

impl<N: Clone + PartialEq + Debug> Default for QuadTree<N> {
    fn default() -> Self {
        Self::with_field(Rect::DEFAULT_FIELD)
    }
}

impl<N: Clone + PartialEq + Debug> QuadTree<N> {
    /// Create an empty tree over `[0, 2cx] × [0, 2cy]`, rooted at `center`.
    pub fn new(center: Point) -> Self {
        Self::with_field(Rect::around_center(center))
    }

    /// Create an empty tree over `field`. The root splits at the field's floored midpoint.
    pub fn with_field(field: Rect) -> Self {
        Self {
            field,
            root: QuadNode::empty(field.center()),
            len: 0,
        }
    }

    /// The root node.
    pub const fn root(&self) -> &QuadNode<N> {
        &self.root
    }

    fn place(&mut self, entry: Entry<N>) {
        Self::insert_into(&mut self.root, self.field, entry);
        self.len += 1;
    }

    fn insert_into(node: &mut QuadNode<N>, region: Rect, entry: Entry<N>) {
        if node.is_empty() {
            node.entry = Some(entry);
            return;
        }
        if let Some(resident) = node.entry.take() {
            let q = Quadrant::of(node.center, resident.point);
            tracing::trace!(
                cx = node.center.x,
                cy = node.center.y,
                quadrant = ?q,
                "split occupied leaf"
            );
            node.children[q.index()] = Some(Box::new(QuadNode::leaf(
                q.region(region, node.center),
                resident,
            )));
        }
        let q = Quadrant::of(node.center, entry.point);
        let sub = q.region(region, node.center);
        let slot = &mut node.children[q.index()];
        if let Some(child) = slot.as_deref_mut() {
            Self::insert_into(child, sub, entry);
        } else {
            *slot = Some(Box::new(QuadNode::leaf(sub, entry)));
        }
    }

    fn remove_from(node: &mut QuadNode<N>, point: Point) -> Option<Entry<N>> {
        if node.entry.as_ref().is_some_and(|e| e.point == point) {
            return node.entry.take();
        }
        let i = Quadrant::of(node.center, point).index();
        let child = node.children[i].as_deref_mut()?;
        let removed = Self::remove_from(child, point)?;
        if child.is_empty() {
            node.children[i] = None;
        }
        node.collapse();
        Some(removed)
    }

    /// The leaf holding `point` together with the region it owns.
    fn holder_mut(
        node: &mut QuadNode<N>,
        region: Rect,
        point: Point,
    ) -> Option<(&mut QuadNode<N>, Rect)> {
        if node.entry.as_ref().is_some_and(|e| e.point == point) {
            return Some((node, region));
        }
        let q = Quadrant::of(node.center, point);
        let sub = q.region(region, node.center);
        let child = node.children[q.index()].as_deref_mut()?;
        Self::holder_mut(child, sub, point)
    }
}

impl<N: Clone + PartialEq + Debug> SpatialIndex<N> for QuadTree<N> {
    type Node = QuadNode<N>;

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
            if let Some(e) = &node.entry {
                return (e.point == point).then_some(&e.name);
            }
            node = node.child(Quadrant::of(node.center, point))?;
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
        let removed = Self::remove_from(&mut self.root, point)?;
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
        if let Some((leaf, region)) = Self::holder_mut(&mut self.root, self.field, point)
            && region.contains(to)
        {
            if let Some(e) = leaf.entry.as_mut() {
                e.point = to;
            }
            tracing::trace!(x = to.x, y = to.y, "moved within leaf region");
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
        self.root = QuadNode::empty(self.field.center());
        self.len = 0;
    }

    fn size(&self) -> usize {
        self.root.size()
    }

    fn height(&self) -> usize {
        self.root.height()
    }

    fn depth(&self, subtree: &QuadNode<N>) -> Option<usize> {
        // A node's center lies inside its region, so it steers the descent.
        let mut node = &self.root;
        let mut depth = 0;
        loop {
            node = node.child(Quadrant::of(node.center, subtree.center))?;
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

impl<N: Clone + PartialEq + Debug> Debug for QuadTree<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("field", &self.field)
            .field("len", &self.len)
            .field("nodes", &self.root.size())
            .field("height", &self.root.height())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl<N: Clone + PartialEq + Debug> QuadTree<N> {
    /// Panic unless every structural invariant holds.
    pub(crate) fn assert_invariants(&self) {
        let mut seen = Vec::new();
        Self::check_node(&self.root, self.field, true, &mut seen);
        assert_eq!(seen.len(), self.len, "len must match stored entries");
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), self.len, "stored points must be unique");
    }

    fn check_node(node: &QuadNode<N>, region: Rect, is_root: bool, seen: &mut Vec<Point>) {
        assert_eq!(node.center, region.center(), "center must be the region midpoint");
        if node.is_leaf() {
            assert!(is_root || node.entry.is_some(), "only the root may be an empty leaf");
            if let Some(e) = &node.entry {
                assert!(region.contains(e.point), "{} escaped its region", e.point);
                seen.push(e.point);
            }
            return;
        }
        assert!(node.entry.is_none(), "internal nodes hold no entry");
        let kids: Vec<&QuadNode<N>> = node.children.iter().flatten().map(|c| &**c).collect();
        assert!(
            !(kids.len() == 1 && kids[0].is_leaf()),
            "a lone leaf child must be collapsed into its parent"
        );
        for q in Quadrant::ALL {
            if let Some(c) = node.child(q) {
                Self::check_node(c, q.region(region, node.center), false, seen);
            }
        }
    }
}
