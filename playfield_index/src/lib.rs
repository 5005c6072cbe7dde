// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Playfield Index: positions of named entities on a bounded 2D integer field.
//!
//! Playfield Index is the spatial core of a turn-based game where every entity
//! moves on every tick.
//!
//! - Insert, remove, and move named points; look them up by name or by point.
//! - Query the square reaching a given distance from a point toward one of the
//!   four diagonals.
//! - Placement is checked before anything changes: a destination outside the field
//!   or on an occupied point is refused with [`OutOfBounds`] and the index is untouched.
//! - Removing or moving something that is not there is a quiet no-op.
//!
//! Backends implement one trait, [`SpatialIndex`], so game code can swap the
//! structure without API churn.
//!
//! # Example
//!
//! ```rust
//! use playfield_index::{Diagonal, Direction, Point, QuadTree, SpatialIndex};
//!
//! let mut tree = QuadTree::new(Point::new(100, 100));
//! tree.insert("it", Point::new(90, 90))?;
//! tree.insert("runner", Point::new(150, 150))?;
//!
//! // Runner steps north; the tree reorganizes only if it has to.
//! let to = tree.move_named(&"runner", Direction::North, 55)?;
//! assert_eq!(to, Some(Point::new(150, 95)));
//!
//! // Who is within 50 steps south-east of the tagger?
//! let near = tree.names_in_range(Point::new(90, 90), Diagonal::SouthEast, 50);
//! assert_eq!(near, vec!["it"]);
//!
//! // Placing onto an occupied point is refused and changes nothing.
//! assert!(tree.insert("late", Point::new(150, 95)).is_err());
//! assert_eq!(tree.len(), 2);
//! # Ok::<(), playfield_index::OutOfBounds>(())
//! ```
//!
//! Code written against the trait runs on any backend:
//!
//! ```rust
//! use playfield_index::{KdTree, Point, QuadTree, SpatialIndex};
//!
//! fn crowd<I: SpatialIndex<u32>>(index: &mut I) -> usize {
//!     for i in 0..10 {
//!         index.insert(i, Point::new(i64::from(i) * 40, 7 + i64::from(i) * 3)).unwrap();
//!     }
//!     index.len()
//! }
//!
//! let mut kd = KdTree::new(Point::new(0, 0), Point::new(500, 500));
//! assert_eq!(crowd(&mut kd), 10);
//! kd.balance();
//! assert!(kd.height() <= 5);
//! assert_eq!(crowd(&mut QuadTree::new(Point::new(250, 250))), 10);
//! ```
//!
//! ## Choosing a backend
//!
//! - [`QuadTree`]: splits the field at fixed midpoints. Its shape depends only on which
//!   points are stored, not on insertion order, so it stays shallow under churn.
//! - [`KdTree`]: splits on stored points with alternating axes. Cheap to update, but
//!   insertion order shapes it; call [`KdTree::balance`] after bulk loads.
//! - [`FlatVec`]: linear scans. Useful for tiny sets and as a reference answer.
//!
//! ## Logging
//!
//! Structural changes (splits, collapses, promotions, in-place moves) are reported
//! through [`tracing`] at `trace` level; refused placements and rebalancing at `debug`.
//! The crate never installs a subscriber.
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to `thiserror` and `tracing`.
//! - `kurbo`: conversions between [`Point`]/[`Rect`] and Kurbo geometry.

#![no_std]

extern crate alloc;

pub mod backends;
pub mod error;
pub mod index;
pub mod types;

#[cfg(test)]
mod testing;

pub use backends::flatvec::FlatVec;
pub use backends::kdtree::{KdNode, KdTree};
pub use backends::quadtree::{QuadNode, QuadTree};
pub use error::{OutOfBounds, ParseDirectionError, Rejection, Result};
pub use index::SpatialIndex;
pub use types::{Axis, Diagonal, Direction, Entry, Point, Quadrant, Quadrants, Rect};
