// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One round of elimination tag, played on either tree.
//!
//! Players wander the 500×500 field one step at a time. Whoever is "it" removes
//! every player inside a small square on any diagonal from them. The game layer
//! only talks to the index through `SpatialIndex`.
//!
//! Run:
//! - `cargo run -p playfield_demos --example tag_round` (quadtree)
//! - `cargo run -p playfield_demos --example tag_round -- kd`
//! - `RUST_LOG=playfield_index=trace cargo run -p playfield_demos --example tag_round`

use std::error::Error;

use playfield_index::{Diagonal, Direction, KdTree, Point, QuadTree, Rect, SpatialIndex};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const PLAYERS: u32 = 40;
const TICKS: u32 = 500;
const STEP: u32 = 8;
const TAG_REACH: u32 = 12;
const COMPASS: [&str; 4] = ["N", "S", "E", "W"];

struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn point_in(&mut self, field: &Rect) -> Point {
        let w = (field.max_x - field.min_x + 1) as u64;
        let h = (field.max_y - field.min_y + 1) as u64;
        Point::new(
            field.min_x + self.below(w) as i64,
            field.min_y + self.below(h) as i64,
        )
    }
}

/// Play until one player is left or time runs out; return how many survived.
fn play<I>(
    index: &mut I,
    rng: &mut Rng,
    mut between_ticks: impl FnMut(&mut I),
) -> Result<usize, Box<dyn Error>>
where
    I: SpatialIndex<u32>,
{
    let field = index.field();
    let mut placed = 0;
    while placed < PLAYERS {
        if index.insert(placed, rng.point_in(&field)).is_ok() {
            placed += 1;
        }
    }
    let it = 0;

    for tick in 0..TICKS {
        for player in 0..PLAYERS {
            let direction: Direction = COMPASS[rng.below(4) as usize].parse()?;
            if let Err(err) = index.move_named(&player, direction, STEP) {
                debug!(tick, player, %err, "move refused");
            }
        }

        let Some(at) = index.locate(&it) else {
            break;
        };
        for diagonal in Diagonal::ALL {
            for caught in index.names_in_range(at, diagonal, TAG_REACH) {
                if caught == it {
                    continue;
                }
                if let Some(from) = index.remove(&caught) {
                    info!(tick, caught, x = from.x, y = from.y, "tagged out");
                }
            }
        }

        between_ticks(index);
        if index.len() <= 1 {
            info!(tick, "only the tagger is left");
            break;
        }
    }
    info!(
        survivors = index.len() - 1,
        nodes = index.size(),
        height = index.height(),
        "round over"
    );
    Ok(index.len() - 1)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut rng = Rng(0x7A6_D00D);
    let backend = std::env::args().nth(1).unwrap_or_else(|| "quad".to_owned());
    let survivors = match backend.as_str() {
        "kd" => {
            let mut tree = KdTree::<u32>::with_field(Rect::DEFAULT_FIELD);
            let mut ticks = 0_u32;
            play(&mut tree, &mut rng, |t| {
                ticks += 1;
                if ticks % 50 == 0 {
                    t.balance();
                }
            })?
        }
        _ => {
            let mut tree = QuadTree::<u32>::new(Point::new(250, 250));
            play(&mut tree, &mut rng, |_| {})?
        }
    };
    info!(%backend, survivors, "done");
    Ok(())
}
