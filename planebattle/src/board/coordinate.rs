use std::{fmt, str::FromStr};

use thiserror::Error;

/// The coordinates of a cell in the grid. Coordinates are signed so that projections
/// of a plane hanging off the edge of the grid can still be represented; the
/// [`Dimensions`][crate::board::Dimensions] decide what is in bounds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Column of the cell, labelled with a letter.
    pub x: i32,
    /// Row of the cell, labelled with a 1-based number.
    pub y: i32,
}

impl Coordinate {
    /// Construct a [`Coordinate`] from the given `x` and `y`.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get the coordinate displaced by `(dx, dy)`, clamped to the range of `i32`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Human readable label of the cell: column letter then 1-based row, so `(1, 4)` is
    /// `"B5"`. Coordinates without a column letter fall back to `"(x,y)"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if (0..26).contains(&self.x) && self.y >= 0 {
            let col = (b'A' + self.x as u8) as char;
            write!(f, "{}{}", col, i64::from(self.y) + 1)
        } else {
            write!(f, "({},{})", self.x, self.y)
        }
    }
}

/// Error returned when a cell label such as `"B5"` cannot be parsed.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("invalid cell label {0:?}, expected a column letter followed by a row number")]
pub struct ParseCoordinateError(String);

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    /// Parse a label produced by [`Coordinate::label`]. The column letter is case
    /// insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError(s.to_owned());
        let s = s.trim();
        let mut chars = s.chars();
        let col = chars
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(err)?
            .to_ascii_uppercase();
        let row: i32 = chars.as_str().parse().map_err(|_| err())?;
        if row < 1 {
            return Err(err());
        }
        Ok(Self::new(i32::from(col as u8 - b'A'), row - 1))
    }
}
