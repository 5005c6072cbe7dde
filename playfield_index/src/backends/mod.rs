// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations of [`SpatialIndex`](crate::SpatialIndex).
//!
//! - `quadtree`: region quadtree. Splits space at fixed midpoints; entries live in leaves.
//! - `kdtree`: 2-D tree. Splits on stored points with alternating axes; can be rebalanced.
//! - `flatvec`: flat vector with linear scans (small, simple, always correct).
//!
//! Split rules
//! -----------
//! Both trees send a point that lies exactly on a split line to the "lower" side:
//! the quadtree's west/north quadrants take `x <= cx` / `y <= cy`, and the 2-D tree's
//! `lt` child takes coordinates `<=` the split value.
//!
//! Moves
//! -----
//! A move that does not cross any split the entry depends on is applied in place.
//! Anything else is a removal followed by an insertion, which yields the same
//! stored pairs.

pub mod flatvec;
pub mod kdtree;
pub mod quadtree;
