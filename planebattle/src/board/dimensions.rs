//! Square board dimensions.
use std::borrow::Borrow;

use crate::board::Coordinate;

/// Dimensions of a square board. Every column must have a letter label, so the side
/// length is limited to [`Dimensions::MAX_SIZE`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
    /// Side length of the board, along both `x` and `y`.
    size: usize,
}

impl Dimensions {
    /// Largest supported side length, one column per letter of the alphabet.
    pub const MAX_SIZE: usize = 26;

    /// Create new [`Dimensions`] with the given side length.
    /// Panics if `size` is 0 or greater than [`Dimensions::MAX_SIZE`].
    pub fn new(size: usize) -> Self {
        match Self::try_new(size) {
            Some(dim) => dim,
            None => panic!(
                "Dimensions must be in 1..={}, got {}",
                Self::MAX_SIZE,
                size
            ),
        }
    }

    /// Create new [`Dimensions`] with the given side length.
    /// Returns `None` if `size` is 0 or greater than [`Dimensions::MAX_SIZE`].
    pub fn try_new(size: usize) -> Option<Self> {
        if size == 0 || size > Self::MAX_SIZE {
            None
        } else {
            Some(Self { size })
        }
    }

    /// Get the side length of these [`Dimensions`].
    pub fn size(&self) -> usize {
        self.size
    }

    /// Compute the linear total size of these [`Dimensions`].
    pub fn total_size(&self) -> usize {
        self.size * self.size
    }

    /// Check if the given [`Coordinate`] lies in `[0, size)` on both axes.
    pub fn contains<B: Borrow<Coordinate>>(&self, coord: B) -> bool {
        let c = coord.borrow();
        let size = self.size as i32;
        (0..size).contains(&c.x) && (0..size).contains(&c.y)
    }

    /// Convert a coordinate to a linear index within this dimension.
    /// Returns `None` if the coordinate is out of range for the dimension.
    pub fn try_linearize(&self, coord: &Coordinate) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y as usize * self.size + coord.x as usize)
        } else {
            None
        }
    }

    /// Get an iterator over rows of this grid. Each row is an iterator over the coordinates of
    /// that row.
    pub fn iter_coordinates(&self) -> impl Iterator<Item = impl Iterator<Item = Coordinate>> {
        let size = self.size as i32;
        (0..size).map(move |y| (0..size).map(move |x| Coordinate::new(x, y)))
    }
}

impl Default for Dimensions {
    /// Construct the default dimensions, a 10x10 board.
    fn default() -> Self {
        Self { size: 10 }
    }
}
