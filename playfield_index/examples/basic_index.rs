// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Playfield Index: insert, move, query, and remove on both trees.

use playfield_index::{Diagonal, Direction, KdTree, Point, QuadTree, Rect, SpatialIndex};

fn tour<I: SpatialIndex<&'static str>>(label: &str, index: &mut I) {
    index.insert("a", Point::new(90, 90)).unwrap();
    index.insert("b", Point::new(150, 150)).unwrap();
    println!("{label}: size={} height={}", index.size(), index.height());

    // Move b north across the middle of the field
    let to = index.move_named(&"b", Direction::North, 55).unwrap();
    println!("{label}: b moved to {to:?}");

    // Refused: a is already there
    let err = index.insert("c", Point::new(90, 90)).unwrap_err();
    println!("{label}: {err}");

    // Query a square south-east of the origin
    let hits = index.names_in_range(Point::new(80, 80), Diagonal::SouthEast, 80);
    println!("{label}: hits in range: {hits:?}");

    index.remove(&"a");
    println!("{label}: after removing a: size={} len={}", index.size(), index.len());
}

fn main() {
    let mut quad = QuadTree::new(Point::new(100, 100));
    tour("quadtree", &mut quad);

    let mut kd = KdTree::with_field(Rect::new(0, 0, 200, 200));
    tour("kdtree", &mut kd);
    kd.balance();
    println!("kdtree: {kd:?}");
}
