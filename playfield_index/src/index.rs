// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`SpatialIndex`] contract shared by every backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::{OutOfBounds, Result};
use crate::types::{Diagonal, Direction, Entry, Point, Rect};

/// Positions of named entities on a bounded integer field.
///
/// Every backend answers these operations identically; only structure and cost differ.
/// Game code should be written against this trait.
///
/// ## Failure model
///
/// - Placement (`insert`, `move_point`, `move_named`) fails with [`OutOfBounds`] when the
///   destination is outside [`field`](Self::field) or already occupied. The check runs
///   before any mutation, so a failed call leaves the index untouched.
/// - Anything addressed by a name or point that is not stored is a silent no-op:
///   removals return `None`, moves return `Ok(None)`.
///
/// ## Structure
///
/// `size`, `height`, `depth`, `is_leaf`, and `is_empty` describe the tree shape.
/// A fresh index is a single empty node, so it has size 1 and height 1.
pub trait SpatialIndex<N: Clone + PartialEq + Debug> {
    /// Node type that [`depth`](Self::depth) accepts.
    type Node;

    /// The rectangle of valid points.
    fn field(&self) -> Rect;

    /// Whether an entity named `name` is stored. O(n).
    fn contains_name(&self, name: &N) -> bool {
        self.locate(name).is_some()
    }

    /// Whether an entity stands on `point`. O(log n).
    fn contains_point(&self, point: Point) -> bool {
        self.name_at(point).is_some()
    }

    /// Where the entity named `name` stands. O(n).
    fn locate(&self, name: &N) -> Option<Point>;

    /// The name of the entity standing on `point`. O(log n).
    fn name_at(&self, point: Point) -> Option<&N>;

    /// Store `name` at `point`.
    fn insert(&mut self, name: N, point: Point) -> Result<()>;

    /// Remove the entity named `name`, returning where it stood.
    fn remove(&mut self, name: &N) -> Option<Point> {
        let point = self.locate(name)?;
        self.remove_point(point).map(|_| point)
    }

    /// Remove the entity standing on `point`, returning its name.
    fn remove_point(&mut self, point: Point) -> Option<N>;

    /// Move the entity on `point` by `steps` in `direction`.
    ///
    /// Returns the new location, or `Ok(None)` when nothing stands on `point`.
    /// Zero steps return `point` without touching the structure.
    fn move_point(&mut self, point: Point, direction: Direction, steps: u32)
    -> Result<Option<Point>>;

    /// Move the entity named `name` by `steps` in `direction`.
    ///
    /// Same contract as [`move_point`](Self::move_point), addressed by name.
    fn move_named(&mut self, name: &N, direction: Direction, steps: u32) -> Result<Option<Point>> {
        match self.locate(name) {
            Some(point) => self.move_point(point, direction, steps),
            None => Ok(None),
        }
    }

    /// Names of all entities inside `rect` (edges included).
    fn names_in_rect(&self, rect: Rect) -> Vec<N>;

    /// Names of all entities in the square from `point` reaching `distance` steps
    /// toward `diagonal`, corners included and clipped to the field.
    ///
    /// Order is unspecified; each name appears once.
    fn names_in_range(&self, point: Point, diagonal: Diagonal, distance: u32) -> Vec<N> {
        let rect = Rect::range_in(&self.field(), point, diagonal, distance);
        if rect.is_empty() {
            return Vec::new();
        }
        self.names_in_rect(rect)
    }

    /// Fail unless an entity could be placed on `point` right now.
    fn check_vacant(&self, point: Point) -> Result<()> {
        if !self.field().contains(point) {
            tracing::debug!(x = point.x, y = point.y, "placement outside the field");
            return Err(OutOfBounds::outside(point));
        }
        if self.contains_point(point) {
            tracing::debug!(x = point.x, y = point.y, "placement on an occupied point");
            return Err(OutOfBounds::occupied(point));
        }
        Ok(())
    }

    /// Number of stored entities.
    fn len(&self) -> usize;

    /// Snapshot of every stored pair, in no particular order.
    fn entries(&self) -> Vec<Entry<N>>;

    /// Drop every entity, leaving a single empty node.
    fn clear(&mut self);

    /// Number of nodes, internal ones included. Never less than 1.
    fn size(&self) -> usize;

    /// Number of nodes on the longest root-to-leaf path. Never less than 1.
    fn height(&self) -> usize;

    /// Depth of `subtree` below the root, or `None` if it is the root itself or
    /// does not belong to this index.
    fn depth(&self, subtree: &Self::Node) -> Option<usize>;

    /// Whether the root has no children.
    fn is_leaf(&self) -> bool;

    /// Whether no entity is stored.
    fn is_empty(&self) -> bool;
}

/// Outcome of validating a move before any mutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MovePlan {
    /// Nothing stands on the source point.
    Absent,
    /// Zero steps; the entity stays where it is.
    Stay(Point),
    /// The destination is inside the field and vacant.
    To(Point),
}

/// Validate a move of the entity on `from`. Shared by every backend's `move_point`.
pub(crate) fn plan_move<N, I>(
    index: &I,
    from: Point,
    direction: Direction,
    steps: u32,
) -> Result<MovePlan>
where
    N: Clone + PartialEq + Debug,
    I: SpatialIndex<N> + ?Sized,
{
    if !index.contains_point(from) {
        return Ok(MovePlan::Absent);
    }
    if steps == 0 {
        return Ok(MovePlan::Stay(from));
    }
    let to = from.offset(direction, steps);
    index.check_vacant(to)?;
    Ok(MovePlan::To(to))
}
