//! Placement validity: bounds and overlap checks for a candidate plane.
use enumflags2::BitFlags;

use crate::{board::Dimensions, planes::Plane};

/// Ways in which a plane placement can be invalid.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Violation {
    /// At least one cell lies outside the board.
    OutOfBounds = 0b01,
    /// At least one cell is shared with another plane.
    Overlap = 0b10,
}

/// Collect every way in which `candidate` is an invalid placement among `existing`.
/// A plane in `existing` with the same id as the candidate is the candidate's own
/// previous position and is ignored.
pub fn violations(candidate: &Plane, existing: &[Plane], dim: &Dimensions) -> BitFlags<Violation> {
    let mut found = BitFlags::empty();
    if !candidate.in_bounds(dim) {
        found.insert(Violation::OutOfBounds);
    }
    if existing
        .iter()
        .filter(|other| other.id() != candidate.id())
        .any(|other| candidate.overlaps(other))
    {
        found.insert(Violation::Overlap);
    }
    found
}

/// Returns true if `candidate` lies fully on the board and does not share a cell with
/// any other plane in `existing`.
pub fn is_valid(candidate: &Plane, existing: &[Plane], dim: &Dimensions) -> bool {
    violations(candidate, existing, dim).is_empty()
}
