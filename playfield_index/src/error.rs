// Copyright 2025 the Playfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only placement can fail. Looking up, removing, or moving an entity that is not
//! in the index is a no-op reported through `Option`, never through an error.

use alloc::string::{String, ToString};
use core::fmt;

use crate::types::Point;

/// A placement was refused; the index is unchanged.
///
/// Returned by `insert`, `move_point`, and `move_named` when the destination lies
/// outside the field or is already occupied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot place an entity at {point}: {reason}")]
pub struct OutOfBounds {
    /// The rejected destination.
    pub point: Point,
    /// Why it was rejected.
    pub reason: Rejection,
}

impl OutOfBounds {
    pub(crate) const fn outside(point: Point) -> Self {
        Self {
            point,
            reason: Rejection::OutsideField,
        }
    }

    pub(crate) const fn occupied(point: Point) -> Self {
        Self {
            point,
            reason: Rejection::Occupied,
        }
    }
}

/// Cause of an [`OutOfBounds`] error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The point lies outside the field rectangle.
    OutsideField,
    /// Another entity already stands on the point.
    Occupied,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OutsideField => "outside the field",
            Self::Occupied => "already occupied",
        })
    }
}

/// Result alias for placement operations.
pub type Result<T, E = OutOfBounds> = core::result::Result<T, E>;

/// A string was not one of the compass codes (`N`, `S`, `E`, `W`, `NE`, `NW`, `SE`, `SW`).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction {input:?}")]
pub struct ParseDirectionError {
    input: String,
}

impl ParseDirectionError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// The string that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}
