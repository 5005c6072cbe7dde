// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::fmt;
use core::str::FromStr;

use crate::error::ParseDirectionError;

/// Integer point on the field.
///
/// `x` grows to the east and `y` grows to the south, so "north" is `-y`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate (south is positive).
    pub y: i64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The point `steps` away in `direction`. Saturates instead of overflowing.
    pub fn offset(self, direction: Direction, steps: u32) -> Self {
        let d = i64::from(steps);
        match direction {
            Direction::North => Self::new(self.x, self.y.saturating_sub(d)),
            Direction::South => Self::new(self.x, self.y.saturating_add(d)),
            Direction::East => Self::new(self.x.saturating_add(d), self.y),
            Direction::West => Self::new(self.x.saturating_sub(d), self.y),
        }
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive axis-aligned integer rectangle.
///
/// Both corners belong to the rectangle, so `Rect::new(0, 0, 0, 0)` holds exactly
/// one point. A rectangle with `max < min` on either axis is empty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Minimum x (west edge).
    pub min_x: i64,
    /// Minimum y (north edge).
    pub min_y: i64,
    /// Maximum x (east edge).
    pub max_x: i64,
    /// Maximum y (south edge).
    pub max_y: i64,
}

impl Rect {
    /// The 500×500 field used by the tag games.
    pub const DEFAULT_FIELD: Self = Self::new(0, 0, 500, 500);

    /// Create a rectangle from min/max coordinates.
    pub const fn new(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a rectangle from any two opposite corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// The field `[0, 2cx] × [0, 2cy]` whose center is `center`.
    pub fn around_center(center: Point) -> Self {
        Self::new(
            0,
            0,
            center.x.saturating_mul(2),
            center.y.saturating_mul(2),
        )
    }

    /// North-west corner.
    pub const fn nw(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// South-east corner.
    pub const fn se(&self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    /// Whether the point lies inside (edges and corners included).
    pub fn contains(&self, p: Point) -> bool {
        self.min_x <= p.x && p.x <= self.max_x && self.min_y <= p.y && p.y <= self.max_y
    }

    /// The intersection of two rectangles. May be empty.
    pub fn intersect(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        )
    }

    /// Return true if the rectangle holds no integer point.
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    /// Midpoint, rounded toward negative infinity on both axes.
    pub fn center(&self) -> Point {
        Point::new(mid(self.min_x, self.max_x), mid(self.min_y, self.max_y))
    }

    /// The square with one corner at `origin` reaching `distance` steps
    /// toward `diagonal` on both axes. Not clipped.
    pub fn toward(origin: Point, diagonal: Diagonal, distance: u32) -> Self {
        let d = i64::from(distance);
        let x = if diagonal.is_east() {
            origin.x.saturating_add(d)
        } else {
            origin.x.saturating_sub(d)
        };
        let y = if diagonal.is_south() {
            origin.y.saturating_add(d)
        } else {
            origin.y.saturating_sub(d)
        };
        Self::from_corners(origin, Point::new(x, y))
    }

    /// [`Rect::toward`] clipped to `field`.
    pub fn range_in(field: &Self, origin: Point, diagonal: Diagonal, distance: u32) -> Self {
        Self::toward(origin, diagonal, distance).intersect(field)
    }
}

/// Floored average without overflow.
#[inline]
pub(crate) const fn mid(a: i64, b: i64) -> i64 {
    (a & b) + ((a ^ b) >> 1)
}

/// A stored `(name, point)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<N> {
    /// Name of the entity.
    pub name: N,
    /// Where it stands.
    pub point: Point,
}

impl<N> Entry<N> {
    /// Pair a name with a point.
    pub const fn new(name: N, point: Point) -> Self {
        Self { name, point }
    }
}

/// Compass direction for linear movement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward smaller `y`.
    North,
    /// Toward larger `y`.
    South,
    /// Toward larger `x`.
    East,
    /// Toward smaller `x`.
    West,
}

impl Direction {
    /// All four directions, in `N`, `S`, `E`, `W` order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Self::North),
            "S" => Ok(Self::South),
            "E" => Ok(Self::East),
            "W" => Ok(Self::West),
            _ => Err(ParseDirectionError::new(s)),
        }
    }
}

/// Diagonal direction for range queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Diagonal {
    /// `+x`, `-y`.
    NorthEast,
    /// `-x`, `-y`.
    NorthWest,
    /// `+x`, `+y`.
    SouthEast,
    /// `-x`, `+y`.
    SouthWest,
}

impl Diagonal {
    /// All four diagonals.
    pub const ALL: [Self; 4] = [
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    const fn is_east(self) -> bool {
        matches!(self, Self::NorthEast | Self::SouthEast)
    }

    const fn is_south(self) -> bool {
        matches!(self, Self::SouthEast | Self::SouthWest)
    }
}

impl FromStr for Diagonal {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NE" => Ok(Self::NorthEast),
            "NW" => Ok(Self::NorthWest),
            "SE" => Ok(Self::SouthEast),
            "SW" => Ok(Self::SouthWest),
            _ => Err(ParseDirectionError::new(s)),
        }
    }
}

/// Split axis of a 2-D tree node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Compare x coordinates.
    X,
    /// Compare y coordinates.
    Y,
}

impl Axis {
    /// The other axis.
    pub const fn flip(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// The coordinate of `p` along this axis.
    pub const fn coord(self, p: Point) -> i64 {
        match self {
            Self::X => p.x,
            Self::Y => p.y,
        }
    }

    /// Sort key ordering by this axis first, then the other one.
    /// Total on distinct points.
    pub(crate) const fn key(self, p: Point) -> (i64, i64) {
        match self {
            Self::X => (p.x, p.y),
            Self::Y => (p.y, p.x),
        }
    }

    /// Lower and upper bound of `rect` along this axis.
    pub(crate) const fn span(self, rect: &Rect) -> (i64, i64) {
        match self {
            Self::X => (rect.min_x, rect.max_x),
            Self::Y => (rect.min_y, rect.max_y),
        }
    }
}

/// One of the four children of a quadtree node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// `x <= cx`, `y <= cy`.
    Nw = 0,
    /// `x > cx`, `y <= cy`.
    Ne = 1,
    /// `x <= cx`, `y > cy`.
    Sw = 2,
    /// `x > cx`, `y > cy`.
    Se = 3,
}

impl Quadrant {
    /// All quadrants in slot order.
    pub const ALL: [Self; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    /// The quadrant of `center` that `p` falls in.
    pub const fn of(center: Point, p: Point) -> Self {
        match (p.x <= center.x, p.y <= center.y) {
            (true, true) => Self::Nw,
            (false, true) => Self::Ne,
            (true, false) => Self::Sw,
            (false, false) => Self::Se,
        }
    }

    /// Slot index of this quadrant.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The part of `region` this quadrant owns when `region` is split at `center`.
    pub fn region(self, region: Rect, center: Point) -> Rect {
        let (min_x, max_x) = match self {
            Self::Nw | Self::Sw => (region.min_x, center.x),
            Self::Ne | Self::Se => (center.x.saturating_add(1), region.max_x),
        };
        let (min_y, max_y) = match self {
            Self::Nw | Self::Ne => (region.min_y, center.y),
            Self::Sw | Self::Se => (center.y.saturating_add(1), region.max_y),
        };
        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// The matching flag in [`Quadrants`].
    pub const fn flag(self) -> Quadrants {
        match self {
            Self::Nw => Quadrants::NW,
            Self::Ne => Quadrants::NE,
            Self::Sw => Quadrants::SW,
            Self::Se => Quadrants::SE,
        }
    }
}

bitflags::bitflags! {
    /// A set of quadrants.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Quadrants: u8 {
        /// North-west.
        const NW = 0b0001;
        /// North-east.
        const NE = 0b0010;
        /// South-west.
        const SW = 0b0100;
        /// South-east.
        const SE = 0b1000;
    }
}

impl Quadrants {
    /// Quadrants of a node centered at `center` whose region can overlap `rect`.
    pub fn overlapping(center: Point, rect: &Rect) -> Self {
        let west = rect.min_x <= center.x;
        let east = rect.max_x > center.x;
        let north = rect.min_y <= center.y;
        let south = rect.max_y > center.y;
        let mut out = Self::empty();
        out.set(Self::NW, west && north);
        out.set(Self::NE, east && north);
        out.set(Self::SW, west && south);
        out.set(Self::SE, east && south);
        out
    }

    /// Iterate the quadrants in the set, in slot order.
    pub fn quadrants(self) -> impl Iterator<Item = Quadrant> {
        Quadrant::ALL
            .into_iter()
            .filter(move |q| self.contains(q.flag()))
    }
}

#[cfg(feature = "kurbo")]
mod kurbo_conv {
    use super::{Point, Rect};

    impl From<Point> for kurbo::Point {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Field coordinates are far below 2^53."
        )]
        fn from(p: Point) -> Self {
            Self::new(p.x as f64, p.y as f64)
        }
    }

    impl From<Rect> for kurbo::Rect {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Field coordinates are far below 2^53."
        )]
        fn from(r: Rect) -> Self {
            Self::new(r.min_x as f64, r.min_y as f64, r.max_x as f64, r.max_y as f64)
        }
    }

    impl Rect {
        /// The smallest integer rectangle covering `rect`.
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Values are rounded first; out-of-range floats saturate."
        )]
        pub fn from_kurbo(rect: kurbo::Rect) -> Self {
            let r = rect.abs().expand();
            Self::new(r.x0 as i64, r.y0 as i64, r.x1 as i64, r.y1 as i64)
        }
    }
}
